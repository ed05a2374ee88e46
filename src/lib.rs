//! sdkgate - Build-time capability resolution for native plugins.
//!
//! A plugin with optional third-party acceleration (an image codec library,
//! a hardware video encoder SDK) declares its capabilities in a YAML table.
//! sdkgate decides which of them are actually installed, turns that into
//! compile-time definitions and module dependencies, and copies the runtime
//! libraries the final binary needs next to it.
//!
//! # Modules
//!
//! - [`scanner`] - Module descriptor discovery in vendor trees
//! - [`probe`] - Artifact checks and capability verdicts
//! - [`assembler`] - Verdicts to [`ResolvedConfig`](assembler::ResolvedConfig)
//! - [`stager`] - Best-effort staging of runtime libraries
//! - [`resolver`] - One pass through all of the above
//! - [`config`] - Capability table loading, parsing, and validation
//! - [`report`] - Human, JSON and `NAME=value` renderings
//! - [`cli`] - Command-line interface and argument parsing
//! - [`ui`] - Terminal output
//! - [`error`] - Error types and result aliases
//!
//! # Example
//!
//! ```
//! use sdkgate::config::CapabilityTable;
//! use sdkgate::platform::PlatformId;
//! use sdkgate::resolver::{ResolveContext, Resolver};
//! use std::fs;
//! use tempfile::TempDir;
//!
//! let sdk = TempDir::new().unwrap();
//! let plugin = TempDir::new().unwrap();
//! fs::write(
//!     sdk.path().join("FooBar.Build.cs"),
//!     "public class FooBar : ModuleRules {}",
//! )
//! .unwrap();
//!
//! let table: CapabilityTable = serde_yaml::from_str(
//!     "capabilities:\n  - id: foo\n    definition: WITH_FOO\n    modules:\n      prefixes: [Foo]\n",
//! )
//! .unwrap();
//!
//! let context = ResolveContext::new(PlatformId::Linux, plugin.path()).with_sdk_root(sdk.path());
//! let outcome = Resolver::new(table, context).run().unwrap();
//! assert_eq!(outcome.config.definitions["WITH_FOO"], 1);
//! assert_eq!(outcome.config.extra_dependencies, vec!["FooBar"]);
//! ```

pub mod assembler;
pub mod cli;
pub mod config;
pub mod error;
pub mod platform;
pub mod probe;
pub mod report;
pub mod resolver;
pub mod scanner;
pub mod stager;
pub mod ui;

pub use error::{Result, SdkgateError};
