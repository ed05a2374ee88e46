//! Artifact checks and probe result types.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// What kind of filesystem entry an artifact check expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// A directory (SDK root, include directory, runtime directory).
    Directory,
    /// A regular file (header, import library, shared library).
    File,
}

impl ArtifactKind {
    /// Check whether `path` exists as this kind of entry.
    pub fn exists(&self, path: &Path) -> bool {
        match self {
            ArtifactKind::Directory => path.is_dir(),
            ArtifactKind::File => path.is_file(),
        }
    }
}

/// A single piece of evidence that a capability is usable.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactCheck {
    /// Expected entry kind.
    pub kind: ArtifactKind,
    /// Absolute path of the expected entry.
    pub path: PathBuf,
    /// Human-readable name used in diagnostics.
    pub description: String,
    /// Mandatory checks decide the verdict; optional ones only warn.
    pub mandatory: bool,
}

impl ArtifactCheck {
    /// A mandatory directory check.
    pub fn directory(path: impl Into<PathBuf>, description: &str) -> Self {
        Self {
            kind: ArtifactKind::Directory,
            path: path.into(),
            description: description.to_string(),
            mandatory: true,
        }
    }

    /// A mandatory file check.
    pub fn file(path: impl Into<PathBuf>, description: &str) -> Self {
        Self {
            kind: ArtifactKind::File,
            path: path.into(),
            description: description.to_string(),
            mandatory: true,
        }
    }

    /// Mark this check as optional.
    pub fn optional(mut self) -> Self {
        self.mandatory = false;
        self
    }

    /// Whether the artifact is present on disk.
    pub fn is_present(&self) -> bool {
        self.kind.exists(&self.path)
    }

    /// Diagnostic line for a missing artifact.
    pub fn missing_message(&self) -> String {
        format!("{} (expected at {})", self.description, self.path.display())
    }
}

/// Everything needed to decide whether one capability is usable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapabilityProbe {
    /// Capability identifier from the capability table.
    pub capability_id: String,
    /// Artifact checks, evaluated in declared order.
    pub required_artifacts: Vec<ArtifactCheck>,
    /// Module names found by the scanner for this capability.
    pub discovered_modules: BTreeSet<String>,
    /// When set, the capability needs at least one discovered module and this
    /// text describes what was looked for.
    pub module_requirement: Option<String>,
}

impl CapabilityProbe {
    /// Create an empty probe for a capability.
    pub fn new(capability_id: &str) -> Self {
        Self {
            capability_id: capability_id.to_string(),
            ..Default::default()
        }
    }

    /// Append an artifact check.
    pub fn with_artifact(mut self, check: ArtifactCheck) -> Self {
        self.required_artifacts.push(check);
        self
    }

    /// Require at least one discovered module.
    pub fn with_modules<I>(mut self, requirement: &str, modules: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.module_requirement = Some(requirement.to_string());
        self.discovered_modules.extend(modules);
        self
    }
}

/// Verdict for one capability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    /// Whether every mandatory artifact was found.
    pub enabled: bool,
    /// Missing mandatory artifacts, in declared order.
    pub missing: Vec<String>,
    /// Missing optional artifacts.
    pub warnings: Vec<String>,
}

impl ProbeOutcome {
    /// Outcome for a capability that is not probed on this platform.
    pub fn gated() -> Self {
        Self::default()
    }
}
