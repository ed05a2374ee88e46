//! Capability table schema.
//!
//! These structs map one-to-one onto the YAML capability table. Path-like
//! values are kept as raw strings here; `${var}` references are expanded by
//! the resolver once the builtin variables of a resolve pass are known.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::probe::ArtifactKind;

/// Root of a capability table (`sdkgate.yml`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityTable {
    /// Plugin name, used as a label in diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,

    /// Descriptor suffix for module scanning (default `.Build.cs`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descriptor_suffix: Option<String>,

    /// User variables, usable as `${name}` in any path value.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,

    /// Definitions emitted unconditionally with a fixed 0/1 value.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub definitions: BTreeMap<String, u8>,

    /// Unconditional per-platform extras, keyed by platform name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub platforms: BTreeMap<String, PlatformExtras>,

    /// Optional capabilities, in priority order.
    pub capabilities: Vec<CapabilityDef>,
}

impl CapabilityTable {
    /// Look up a capability by id.
    pub fn capability(&self, id: &str) -> Option<&CapabilityDef> {
        self.capabilities.iter().find(|c| c.id == id)
    }

    /// Label used in diagnostics.
    pub fn label(&self) -> &str {
        self.plugin.as_deref().unwrap_or("sdkgate")
    }
}

/// Dependencies a platform always gets, regardless of capabilities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformExtras {
    /// Extra module dependencies.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,

    /// System libraries to link (by name).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub system_libraries: Vec<String>,

    /// Output directories that must exist before linking.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ensure_directories: Vec<String>,
}

/// One optional capability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityDef {
    /// Unique identifier.
    pub id: String,

    /// Primary compile-time definition (e.g. `WITH_FOO`).
    pub definition: String,

    /// Further definitions that follow the same verdict.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub also_define: Vec<String>,

    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Owning platforms; empty means every platform.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<String>,

    /// Artifacts that prove the capability usable.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<ArtifactDef>,

    /// Module discovery for capabilities shipped as vendor modules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modules: Option<ModuleSourceDef>,

    /// Extra module dependencies when enabled.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,

    /// Include search paths when enabled.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include_paths: Vec<String>,

    /// Library files linked unconditionally when enabled.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub libraries: Vec<String>,

    /// Shared libraries to delay-load when enabled.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub delay_load: Vec<String>,

    /// Runtime artifacts that must accompany the binary when enabled.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub runtime_dependencies: Vec<String>,

    /// Optional import libraries searched in candidate directories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_libraries: Option<ImportLibrariesDef>,

    /// Runtime library to copy next to the binaries when enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<StageDef>,
}

impl CapabilityDef {
    /// Every definition this capability controls, primary first.
    pub fn definition_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.definition.as_str())
            .chain(self.also_define.iter().map(String::as_str))
    }
}

/// An artifact check as written in the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactDef {
    /// `directory` or `file`.
    pub kind: ArtifactKind,

    /// Path template.
    pub path: String,

    /// Name shown when the artifact is missing.
    pub description: String,

    /// Optional artifacts never disable the capability.
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub mandatory: bool,
}

/// Where and how to discover vendor modules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleSourceDef {
    /// Tree to scan; defaults to `${sdk_root}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,

    /// Descriptor name prefixes; results are unioned.
    pub prefixes: Vec<String>,

    /// Prefixes of companion modules, added only when the capability is enabled.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub companions: Vec<String>,
}

impl ModuleSourceDef {
    /// Root template, falling back to the SDK root.
    pub fn root_template(&self) -> &str {
        self.root.as_deref().unwrap_or("${sdk_root}")
    }
}

/// Candidate directories for optional import libraries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportLibrariesDef {
    /// Directory templates, highest priority first.
    pub candidates: Vec<String>,

    /// Library file names.
    pub names: Vec<String>,
}

/// A runtime library to stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageDef {
    /// Source file template.
    pub source: String,

    /// Destination directory templates.
    pub destinations: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_table() {
        let table: CapabilityTable = serde_yaml::from_str(
            r#"
capabilities:
  - id: foo
    definition: WITH_FOO
    modules:
      prefixes: [Foo]
"#,
        )
        .unwrap();

        assert_eq!(table.capabilities.len(), 1);
        let foo = table.capability("foo").unwrap();
        assert_eq!(foo.definition, "WITH_FOO");
        assert_eq!(foo.modules.as_ref().unwrap().root_template(), "${sdk_root}");
        assert_eq!(table.label(), "sdkgate");
    }

    #[test]
    fn artifacts_default_to_mandatory() {
        let table: CapabilityTable = serde_yaml::from_str(
            r#"
capabilities:
  - id: nvenc
    definition: WITH_NVENC
    artifacts:
      - kind: directory
        path: ${nvenc_dir}
        description: NVENC root directory
      - kind: file
        path: ${nvenc_dir}/Lib/nvencodeapi.lib
        description: Import library
        mandatory: false
"#,
        )
        .unwrap();

        let artifacts = &table.capabilities[0].artifacts;
        assert_eq!(artifacts[0].kind, ArtifactKind::Directory);
        assert!(artifacts[0].mandatory);
        assert_eq!(artifacts[1].kind, ArtifactKind::File);
        assert!(!artifacts[1].mandatory);
    }

    #[test]
    fn parses_platform_extras_and_constants() {
        let table: CapabilityTable = serde_yaml::from_str(
            r#"
plugin: OmniCapture
definitions:
  WITH_OMNI_NVENC: 1
platforms:
  win64:
    dependencies: [D3D11RHI, D3D12RHI]
    system_libraries: [d3d11.lib]
"#,
        )
        .unwrap();

        assert_eq!(table.label(), "OmniCapture");
        assert_eq!(table.definitions["WITH_OMNI_NVENC"], 1);
        assert_eq!(
            table.platforms["win64"].dependencies,
            vec!["D3D11RHI", "D3D12RHI"]
        );
    }

    #[test]
    fn definition_names_lists_primary_first() {
        let def = CapabilityDef {
            definition: "WITH_NVENC".to_string(),
            also_define: vec!["WITH_D3D11".to_string(), "WITH_D3D12".to_string()],
            ..Default::default()
        };
        let names: Vec<_> = def.definition_names().collect();
        assert_eq!(names, vec!["WITH_NVENC", "WITH_D3D11", "WITH_D3D12"]);
    }

    #[test]
    fn unknown_artifact_kind_is_rejected() {
        let result: Result<CapabilityTable, _> = serde_yaml::from_str(
            r#"
capabilities:
  - id: x
    definition: WITH_X
    artifacts:
      - kind: symlink
        path: /x
        description: x
"#,
        );
        assert!(result.is_err());
    }
}
