//! Capability probing.
//!
//! A capability is proven usable by concrete artifacts on disk (headers,
//! runtime libraries, SDK directories) or by modules the scanner discovered.
//!
//! # Modules
//!
//! - [`types`] - Artifact checks, probe inputs and outcomes
//! - [`prober`] - The verdict and the import-library lookup

pub mod prober;
pub mod types;

pub use prober::{locate_libraries, probe, LibraryLookup, LibrarySearch};
pub use types::{ArtifactCheck, ArtifactKind, CapabilityProbe, ProbeOutcome};
