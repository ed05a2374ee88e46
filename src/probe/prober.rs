//! Capability verdicts and import-library lookup.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::types::{ArtifactKind, CapabilityProbe, ProbeOutcome};

/// Decide whether a capability is usable.
///
/// Every mandatory check is evaluated and every failure reported, so the
/// operator sees the whole gap at once. A check whose path lies beneath a
/// mandatory directory that was already found missing is not reported on its
/// own. An optional directory never hides the checks beneath it.
pub fn probe(capability: &CapabilityProbe) -> ProbeOutcome {
    let mut missing = Vec::new();
    let mut warnings = Vec::new();
    let mut absent_dirs: Vec<&Path> = Vec::new();

    for check in &capability.required_artifacts {
        if let Some(parent) = absent_dirs.iter().find(|d| check.path.starts_with(d)) {
            tracing::debug!(
                "[{}] {} skipped, {} is missing",
                capability.capability_id,
                check.description,
                parent.display()
            );
            continue;
        }

        if check.is_present() {
            tracing::debug!(
                "[{}] found {} at {}",
                capability.capability_id,
                check.description,
                check.path.display()
            );
            continue;
        }

        if check.mandatory && check.kind == ArtifactKind::Directory {
            absent_dirs.push(&check.path);
        }

        if check.mandatory {
            missing.push(check.missing_message());
        } else {
            tracing::debug!(
                "[{}] optional {} not found",
                capability.capability_id,
                check.description
            );
            warnings.push(check.missing_message());
        }
    }

    if let Some(requirement) = &capability.module_requirement {
        if capability.discovered_modules.is_empty() {
            missing.push(requirement.clone());
        }
    }

    ProbeOutcome {
        enabled: missing.is_empty(),
        missing,
        warnings,
    }
}

/// Where to look for linkable import libraries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibrarySearch {
    /// Candidate directories, highest priority first.
    pub candidates: Vec<PathBuf>,
    /// Library file names to look for.
    pub names: Vec<String>,
}

/// Result of an import-library lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LibraryLookup {
    /// Candidate directory that satisfied the search.
    pub directory: Option<PathBuf>,
    /// Libraries found there, in declared name order.
    pub libraries: Vec<PathBuf>,
}

impl LibraryLookup {
    /// Whether any library was found.
    pub fn found(&self) -> bool {
        !self.libraries.is_empty()
    }
}

/// Find import libraries in the first candidate directory that has any.
///
/// Candidates are tried in declared order; the first one that exists and
/// contains at least one named library wins. Later candidates are never
/// consulted once a directory has matched.
pub fn locate_libraries(search: &LibrarySearch) -> LibraryLookup {
    for directory in &search.candidates {
        if !directory.is_dir() {
            continue;
        }

        let libraries: Vec<PathBuf> = search
            .names
            .iter()
            .map(|name| directory.join(name))
            .filter(|path| path.is_file())
            .collect();

        if !libraries.is_empty() {
            tracing::debug!(
                "Found {} import librar{} in {}",
                libraries.len(),
                if libraries.len() == 1 { "y" } else { "ies" },
                directory.display()
            );
            return LibraryLookup {
                directory: Some(directory.clone()),
                libraries,
            };
        }
    }

    LibraryLookup::default()
}
