//! Turning per-capability verdicts into build configuration.
//!
//! The assembler is pure: it never touches the filesystem, and the same
//! reports for the same platform always produce the same [`ResolvedConfig`]
//! (including its fingerprint).

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::config::{CapabilityTable, PlatformExtras};
use crate::platform::PlatformId;
use crate::probe::{LibraryLookup, ProbeOutcome};

/// What an enabled capability adds to the build.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Contributions {
    /// Module dependencies (declared, then discovered, then companions).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include_paths: Vec<PathBuf>,
    /// Libraries linked unconditionally.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub libraries: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub delay_load: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub runtime_dependencies: Vec<PathBuf>,
}

/// Everything known about one capability after probing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapabilityReport {
    pub capability_id: String,
    /// Definitions that follow this capability's verdict, primary first.
    pub definitions: Vec<String>,
    /// True when the capability does not apply to the target platform.
    pub gated: bool,
    pub outcome: ProbeOutcome,
    /// Modules found by the scanner.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<String>,
    pub contributions: Contributions,
    /// Import libraries located for explicit linking.
    pub libraries: LibraryLookup,
}

impl CapabilityReport {
    /// Report for a capability that is not probed on this platform.
    pub fn gated(capability_id: &str, definitions: Vec<String>) -> Self {
        Self {
            capability_id: capability_id.to_string(),
            definitions,
            gated: true,
            outcome: ProbeOutcome::gated(),
            modules: Vec::new(),
            contributions: Contributions::default(),
            libraries: LibraryLookup::default(),
        }
    }

    pub fn enabled(&self) -> bool {
        !self.gated && self.outcome.enabled
    }

    /// Value emitted for this capability's definitions.
    pub fn definition_value(&self) -> u8 {
        u8::from(self.enabled())
    }
}

/// Final build configuration of one resolve pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    pub platform: PlatformId,
    pub enabled_capabilities: BTreeSet<String>,
    /// Every definition with its value, 0 or 1.
    pub definitions: BTreeMap<String, u8>,
    pub extra_dependencies: Vec<String>,
    pub extra_include_paths: Vec<PathBuf>,
    pub extra_libraries: Vec<PathBuf>,
    pub system_libraries: Vec<String>,
    pub delay_load_libraries: Vec<String>,
    pub runtime_dependencies: Vec<PathBuf>,
    /// Content hash of everything above.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub fingerprint: String,
}

impl ResolvedConfig {
    fn empty(platform: PlatformId) -> Self {
        Self {
            platform,
            enabled_capabilities: BTreeSet::new(),
            definitions: BTreeMap::new(),
            extra_dependencies: Vec::new(),
            extra_include_paths: Vec::new(),
            extra_libraries: Vec::new(),
            system_libraries: Vec::new(),
            delay_load_libraries: Vec::new(),
            runtime_dependencies: Vec::new(),
            fingerprint: String::new(),
        }
    }

    /// Whether a definition is emitted with value 1.
    pub fn is_defined(&self, name: &str) -> bool {
        self.definitions.get(name) == Some(&1)
    }

    /// First 16 hex digits of the SHA-256 of the canonical JSON form,
    /// computed without the fingerprint itself.
    pub fn compute_fingerprint(&self) -> String {
        let unsigned = Self {
            fingerprint: String::new(),
            ..self.clone()
        };
        let canonical = serde_json::to_vec(&unsigned).unwrap_or_default();
        let hash = Sha256::digest(&canonical);
        hex::encode(&hash[..8])
    }
}

/// Folds capability reports into a [`ResolvedConfig`].
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    constants: BTreeMap<String, u8>,
    platforms: BTreeMap<PlatformId, PlatformExtras>,
}

impl Assembler {
    /// Assembler with no constants and no platform extras.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take constants and platform extras from a capability table.
    ///
    /// Platform sections with unknown names are ignored; the validator
    /// rejects them before a resolve gets this far.
    pub fn from_table(table: &CapabilityTable) -> Self {
        let platforms = table
            .platforms
            .iter()
            .filter_map(|(name, extras)| Some((name.parse().ok()?, extras.clone())))
            .collect();

        Self {
            constants: table.definitions.clone(),
            platforms,
        }
    }

    /// Add a constant definition.
    pub fn with_constant(mut self, name: &str, value: u8) -> Self {
        self.constants.insert(name.to_string(), value);
        self
    }

    /// Add unconditional extras for a platform.
    pub fn with_platform_extras(mut self, platform: PlatformId, extras: PlatformExtras) -> Self {
        self.platforms.insert(platform, extras);
        self
    }

    /// Build the configuration for `platform` from reports in declared order.
    ///
    /// Constants and platform extras come first. Each capability then sets
    /// its definitions to 1 or 0, and enabled capabilities append their
    /// contributions. Lists keep the first occurrence of every entry.
    pub fn assemble(&self, reports: &[CapabilityReport], platform: PlatformId) -> ResolvedConfig {
        let mut config = ResolvedConfig::empty(platform);

        config.definitions.extend(self.constants.clone());

        if let Some(extras) = self.platforms.get(&platform) {
            for dependency in &extras.dependencies {
                push_unique(&mut config.extra_dependencies, dependency.clone());
            }
            for library in &extras.system_libraries {
                push_unique(&mut config.system_libraries, library.clone());
            }
        }

        for report in reports {
            let value = report.definition_value();
            for name in &report.definitions {
                config.definitions.insert(name.clone(), value);
            }

            if !report.enabled() {
                continue;
            }
            config
                .enabled_capabilities
                .insert(report.capability_id.clone());

            let contributions = &report.contributions;
            for dependency in &contributions.dependencies {
                push_unique(&mut config.extra_dependencies, dependency.clone());
            }
            for path in &contributions.include_paths {
                push_unique(&mut config.extra_include_paths, path.clone());
            }
            for library in contributions.libraries.iter().chain(&report.libraries.libraries) {
                push_unique(&mut config.extra_libraries, library.clone());
            }
            for library in &contributions.delay_load {
                push_unique(&mut config.delay_load_libraries, library.clone());
            }
            for path in &contributions.runtime_dependencies {
                push_unique(&mut config.runtime_dependencies, path.clone());
            }
        }

        config.fingerprint = config.compute_fingerprint();
        config
    }
}

fn push_unique<T: PartialEq>(list: &mut Vec<T>, item: T) {
    if !list.contains(&item) {
        list.push(item);
    }
}
