//! One resolve pass: scan, probe, assemble, stage.
//!
//! The [`Resolver`] threads a capability table through the pipeline for a
//! single target platform. Everything it produces is a fresh value; nothing
//! is cached between passes.
//!
//! # Example
//!
//! ```
//! use sdkgate::config::CapabilityTable;
//! use sdkgate::platform::PlatformId;
//! use sdkgate::resolver::{ResolveContext, Resolver};
//! use tempfile::TempDir;
//!
//! let plugin = TempDir::new().unwrap();
//! let table: CapabilityTable = serde_yaml::from_str(
//!     "capabilities:\n  - id: foo\n    definition: WITH_FOO\n    modules:\n      prefixes: [Foo]\n",
//! )
//! .unwrap();
//!
//! // No SDK root: the capability is disabled, the resolve still succeeds.
//! let context = ResolveContext::new(PlatformId::Linux, plugin.path());
//! let outcome = Resolver::new(table, context).run().unwrap();
//! assert_eq!(outcome.config.definitions["WITH_FOO"], 0);
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::assembler::{Assembler, CapabilityReport, Contributions, ResolvedConfig};
use crate::config::{
    references_unset, resolve_string, validate, CapabilityDef, CapabilityTable,
    InterpolationContext,
};
use crate::error::Result;
use crate::platform::PlatformId;
use crate::probe::{
    locate_libraries, probe, ArtifactCheck, CapabilityProbe, LibraryLookup, LibrarySearch,
};
use crate::scanner::{module_names, ModuleScanner};
use crate::stager::{ensure_directory, stage, DirectoryStatus, StageReport, StagingTask};

/// Inputs of a resolve pass besides the table.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveContext {
    /// Target platform.
    pub platform: PlatformId,
    /// Third-party SDK tree; `None` means no SDKs are installed.
    pub sdk_root: Option<PathBuf>,
    /// Plugin directory.
    pub plugin_dir: PathBuf,
    /// Host project directory, if known.
    pub project_dir: Option<PathBuf>,
}

impl ResolveContext {
    pub fn new(platform: PlatformId, plugin_dir: &Path) -> Self {
        Self {
            platform,
            sdk_root: None,
            plugin_dir: plugin_dir.to_path_buf(),
            project_dir: None,
        }
    }

    pub fn with_sdk_root(mut self, sdk_root: &Path) -> Self {
        self.sdk_root = Some(sdk_root.to_path_buf());
        self
    }

    pub fn with_project_dir(mut self, project_dir: &Path) -> Self {
        self.project_dir = Some(project_dir.to_path_buf());
        self
    }

    /// Builtin variables for path templates. Unsupplied directories are empty.
    pub fn interpolation(&self) -> InterpolationContext {
        let display = |path: &Option<PathBuf>| {
            path.as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };

        InterpolationContext::new()
            .with_builtin("sdk_root", &display(&self.sdk_root))
            .with_builtin("plugin_dir", &self.plugin_dir.display().to_string())
            .with_builtin("project_dir", &display(&self.project_dir))
            .with_builtin("platform", self.platform.as_str())
    }
}

/// Result of creating one output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: DirectoryStatus,
}

/// Everything a resolve pass produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolveOutcome {
    /// Plugin label from the table.
    pub plugin: String,
    pub config: ResolvedConfig,
    /// Per-capability verdicts, in declared order.
    pub reports: Vec<CapabilityReport>,
    pub staging: Vec<StageReport>,
    pub directories: Vec<DirectoryReport>,
}

impl ResolveOutcome {
    /// Number of staging destinations or directories that failed.
    pub fn side_effect_failures(&self) -> usize {
        let staging: usize = self.staging.iter().map(|r| r.failures().count()).sum();
        let directories = self
            .directories
            .iter()
            .filter(|d| matches!(d.status, DirectoryStatus::Failed { .. }))
            .count();
        staging + directories
    }
}

/// Runs resolve passes over a capability table.
#[derive(Debug, Clone)]
pub struct Resolver {
    table: CapabilityTable,
    context: ResolveContext,
    stage: bool,
}

impl Resolver {
    pub fn new(table: CapabilityTable, context: ResolveContext) -> Self {
        Self {
            table,
            context,
            stage: true,
        }
    }

    /// Skip directory creation and staging; the pass becomes read-only.
    pub fn without_staging(mut self) -> Self {
        self.stage = false;
        self
    }

    pub fn table(&self) -> &CapabilityTable {
        &self.table
    }

    pub fn context(&self) -> &ResolveContext {
        &self.context
    }

    /// Run one pass.
    ///
    /// # Errors
    ///
    /// Fails before anything is probed when the table is invalid or a path
    /// template references an unknown variable. Missing SDKs and staging
    /// failures are never errors.
    pub fn run(&self) -> Result<ResolveOutcome> {
        validate(&self.table)?;
        let variables = self
            .context
            .interpolation()
            .with_variables(&self.table.variables)?;

        let scanner = match &self.table.descriptor_suffix {
            Some(suffix) => ModuleScanner::with_suffix(suffix),
            None => ModuleScanner::new(),
        };
        let platform = self.context.platform;

        tracing::debug!(
            "Resolving {} capabilities of {} for {}",
            self.table.capabilities.len(),
            self.table.label(),
            platform
        );

        let mut reports = Vec::with_capacity(self.table.capabilities.len());
        for capability in &self.table.capabilities {
            let report = if applies_to(capability, platform) {
                evaluate(capability, &variables, &scanner)?
            } else {
                tracing::info!(
                    "[{}] not applicable on {}, {}=0",
                    capability.id,
                    platform,
                    capability.definition
                );
                CapabilityReport::gated(&capability.id, definition_names(capability))
            };
            reports.push(report);
        }

        let config = Assembler::from_table(&self.table).assemble(&reports, platform);

        let (staging, directories) = if self.stage {
            (
                self.stage_libraries(&reports, &variables)?,
                self.ensure_directories(&variables)?,
            )
        } else {
            (Vec::new(), Vec::new())
        };

        Ok(ResolveOutcome {
            plugin: self.table.label().to_string(),
            config,
            reports,
            staging,
            directories,
        })
    }

    fn stage_libraries(
        &self,
        reports: &[CapabilityReport],
        variables: &InterpolationContext,
    ) -> Result<Vec<StageReport>> {
        let mut staged = Vec::new();

        for report in reports.iter().filter(|r| r.enabled()) {
            let Some(stage_def) = self
                .table
                .capability(&report.capability_id)
                .and_then(|c| c.stage.as_ref())
            else {
                continue;
            };

            let task = StagingTask {
                capability_id: report.capability_id.clone(),
                source_artifact: PathBuf::from(resolve_string(&stage_def.source, variables)?),
                destination_directories: resolve_set_paths(&stage_def.destinations, variables)?,
            };
            staged.push(stage(&task));
        }

        Ok(staged)
    }

    fn ensure_directories(&self, variables: &InterpolationContext) -> Result<Vec<DirectoryReport>> {
        let Some(extras) = self
            .table
            .platforms
            .iter()
            .find(|(name, _)| name.parse::<PlatformId>().ok() == Some(self.context.platform))
            .map(|(_, extras)| extras)
        else {
            return Ok(Vec::new());
        };

        Ok(resolve_set_paths(&extras.ensure_directories, variables)?
            .into_iter()
            .map(|path| DirectoryReport {
                status: ensure_directory(&path),
                path,
            })
            .collect())
    }
}

fn applies_to(capability: &CapabilityDef, platform: PlatformId) -> bool {
    capability.platforms.is_empty()
        || capability
            .platforms
            .iter()
            .any(|name| name.parse::<PlatformId>().ok() == Some(platform))
}

fn definition_names(capability: &CapabilityDef) -> Vec<String> {
    capability
        .definition_names()
        .map(str::to_string)
        .collect()
}

fn resolve_paths(templates: &[String], variables: &InterpolationContext) -> Result<Vec<PathBuf>> {
    templates
        .iter()
        .map(|t| resolve_string(t, variables).map(PathBuf::from))
        .collect()
}

/// Resolve output locations, dropping those built on an unset builtin.
fn resolve_set_paths(
    templates: &[String],
    variables: &InterpolationContext,
) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for template in templates {
        if references_unset(template, variables) {
            tracing::debug!("Skipping {}, it references an unset directory", template);
            continue;
        }
        paths.push(PathBuf::from(resolve_string(template, variables)?));
    }
    Ok(paths)
}

/// Probe one capability that applies to the target platform.
fn evaluate(
    capability: &CapabilityDef,
    variables: &InterpolationContext,
    scanner: &ModuleScanner,
) -> Result<CapabilityReport> {
    let id = capability.id.as_str();
    let mut probe_input = CapabilityProbe::new(id);

    for artifact in &capability.artifacts {
        probe_input = probe_input.with_artifact(ArtifactCheck {
            kind: artifact.kind,
            path: PathBuf::from(resolve_string(&artifact.path, variables)?),
            description: artifact.description.clone(),
            mandatory: artifact.mandatory,
        });
    }

    let mut modules = Vec::new();
    let mut module_root = PathBuf::new();
    if let Some(source) = &capability.modules {
        module_root = PathBuf::from(resolve_string(source.root_template(), variables)?);
        modules = module_names(&scanner.scan_variants(&module_root, &source.prefixes));

        let searched = if module_root.as_os_str().is_empty() {
            "no SDK root supplied".to_string()
        } else {
            format!("searched {}", module_root.display())
        };
        let requirement = format!(
            "{} modules (*{} descriptors, {})",
            source.prefixes.join("/"),
            scanner.suffix(),
            searched
        );
        probe_input = probe_input.with_modules(&requirement, modules.iter().cloned());
    }

    let outcome = probe(&probe_input);
    for warning in &outcome.warnings {
        tracing::warn!("[{}] optional artifact missing: {}", id, warning);
    }

    let mut contributions = Contributions::default();
    let mut libraries = LibraryLookup::default();

    if outcome.enabled {
        tracing::info!("[{}] enabled, {}=1", id, capability.definition);

        contributions.dependencies = capability.dependencies.clone();
        contributions.dependencies.extend(modules.iter().cloned());
        if let Some(source) = &capability.modules {
            if !source.companions.is_empty() {
                let companions = scanner.scan_variants(&module_root, &source.companions);
                contributions.dependencies.extend(module_names(&companions));
            }
        }
        contributions.include_paths = resolve_paths(&capability.include_paths, variables)?;
        contributions.libraries = resolve_paths(&capability.libraries, variables)?;
        contributions.delay_load = capability.delay_load.clone();
        contributions.runtime_dependencies =
            resolve_paths(&capability.runtime_dependencies, variables)?;

        if let Some(import) = &capability.import_libraries {
            let search = LibrarySearch {
                candidates: resolve_paths(&import.candidates, variables)?,
                names: import.names.clone(),
            };
            libraries = locate_libraries(&search);
            if !libraries.found() && !search.names.is_empty() {
                tracing::warn!(
                    "[{}] import libraries not found, relying on runtime exports only",
                    id
                );
            }
        }
    } else {
        tracing::info!(
            "[{}] disabled, {}=0 (missing: {})",
            id,
            capability.definition,
            outcome.missing.join("; ")
        );
    }

    Ok(CapabilityReport {
        capability_id: id.to_string(),
        definitions: definition_names(capability),
        gated: false,
        outcome,
        modules,
        contributions,
        libraries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TABLE: &str = r#"
plugin: Omni
variables:
  nvenc_dir: ${plugin_dir}/ThirdParty/NVENC
definitions:
  WITH_OMNI_NVENC: 1
platforms:
  win64:
    dependencies: [D3D11RHI]
    ensure_directories:
      - ${project_dir}/Binaries/Win64
capabilities:
  - id: openexr
    definition: WITH_OPENEXR
    modules:
      prefixes: [OpenEXR, OpenExr]
      companions: [Imath]
  - id: nvenc
    definition: WITH_NVENC
    also_define: [WITH_D3D11]
    platforms: [win64]
    artifacts:
      - kind: directory
        path: ${nvenc_dir}
        description: NVENC root directory
      - kind: file
        path: ${nvenc_dir}/Interface/nvEncodeAPI.h
        description: Header nvEncodeAPI.h
    include_paths:
      - ${nvenc_dir}/Interface
    import_libraries:
      candidates:
        - ${nvenc_dir}/Lib/Win64
        - ${nvenc_dir}/Lib/x64
      names: [nvencodeapi.lib]
    stage:
      source: ${nvenc_dir}/Win64/nvEncodeAPI64.dll
      destinations:
        - ${plugin_dir}/Binaries/Win64
"#;

    fn table() -> CapabilityTable {
        serde_yaml::from_str(TABLE).unwrap()
    }

    fn install_nvenc(plugin: &Path) {
        let root = plugin.join("ThirdParty/NVENC");
        fs::create_dir_all(root.join("Interface")).unwrap();
        fs::create_dir_all(root.join("Win64")).unwrap();
        fs::create_dir_all(root.join("Lib/x64")).unwrap();
        fs::write(root.join("Interface/nvEncodeAPI.h"), "// header").unwrap();
        fs::write(root.join("Win64/nvEncodeAPI64.dll"), "dll").unwrap();
        fs::write(root.join("Lib/x64/nvencodeapi.lib"), "lib").unwrap();
    }

    #[test]
    fn interpolation_leaves_unsupplied_builtins_empty() {
        let ctx = ResolveContext::new(PlatformId::Mac, Path::new("/p")).interpolation();
        assert_eq!(ctx.resolve("sdk_root"), Some(""));
        assert_eq!(ctx.resolve("project_dir"), Some(""));
        assert_eq!(ctx.resolve("plugin_dir"), Some("/p"));
        assert_eq!(ctx.resolve("platform"), Some("mac"));
    }

    #[test]
    fn gated_capability_emits_zero_off_platform() {
        let plugin = TempDir::new().unwrap();
        install_nvenc(plugin.path());

        let context = ResolveContext::new(PlatformId::Linux, plugin.path());
        let outcome = Resolver::new(table(), context).run().unwrap();

        let nvenc = &outcome.reports[1];
        assert!(nvenc.gated);
        assert_eq!(outcome.config.definitions["WITH_NVENC"], 0);
        assert_eq!(outcome.config.definitions["WITH_D3D11"], 0);
        assert!(outcome.staging.is_empty());
        assert!(outcome.config.extra_dependencies.is_empty());
    }

    #[test]
    fn installed_nvenc_is_enabled_and_staged() {
        let plugin = TempDir::new().unwrap();
        install_nvenc(plugin.path());

        let context = ResolveContext::new(PlatformId::Win64, plugin.path());
        let outcome = Resolver::new(table(), context).run().unwrap();

        assert!(outcome.config.is_defined("WITH_NVENC"));
        assert!(outcome.config.is_defined("WITH_D3D11"));
        assert!(outcome.config.is_defined("WITH_OMNI_NVENC"));
        assert_eq!(
            outcome.config.extra_libraries,
            vec![plugin.path().join("ThirdParty/NVENC/Lib/x64/nvencodeapi.lib")]
        );
        assert_eq!(outcome.staging.len(), 1);
        assert_eq!(outcome.staging[0].copies(), 1);
        assert!(plugin
            .path()
            .join("Binaries/Win64/nvEncodeAPI64.dll")
            .is_file());
    }

    #[test]
    fn project_directories_are_skipped_without_project_dir() {
        let plugin = TempDir::new().unwrap();
        let context = ResolveContext::new(PlatformId::Win64, plugin.path());
        let outcome = Resolver::new(table(), context).run().unwrap();
        assert!(outcome.directories.is_empty());
    }

    #[test]
    fn variables_built_on_project_dir_are_skipped_without_project_dir() {
        let mut table = table();
        table
            .variables
            .insert("proj_bin".to_string(), "${project_dir}/Binaries".to_string());
        if let Some(extras) = table.platforms.get_mut("win64") {
            extras.ensure_directories = vec!["${proj_bin}/Win64".to_string()];
        }
        let plugin = TempDir::new().unwrap();

        let context = ResolveContext::new(PlatformId::Win64, plugin.path());
        let outcome = Resolver::new(table.clone(), context).run().unwrap();
        assert!(outcome.directories.is_empty());

        let project = TempDir::new().unwrap();
        let context =
            ResolveContext::new(PlatformId::Win64, plugin.path()).with_project_dir(project.path());
        let outcome = Resolver::new(table, context).run().unwrap();
        assert_eq!(outcome.directories.len(), 1);
        assert!(project.path().join("Binaries/Win64").is_dir());
    }

    #[test]
    fn project_directories_are_created() {
        let plugin = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        let context =
            ResolveContext::new(PlatformId::Win64, plugin.path()).with_project_dir(project.path());

        let outcome = Resolver::new(table(), context).run().unwrap();
        assert_eq!(outcome.directories.len(), 1);
        assert_eq!(outcome.directories[0].status, DirectoryStatus::Created);
        assert!(project.path().join("Binaries/Win64").is_dir());
    }

    #[test]
    fn without_staging_touches_nothing() {
        let plugin = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        install_nvenc(plugin.path());
        let context =
            ResolveContext::new(PlatformId::Win64, plugin.path()).with_project_dir(project.path());

        let outcome = Resolver::new(table(), context)
            .without_staging()
            .run()
            .unwrap();
        assert!(outcome.config.is_defined("WITH_NVENC"));
        assert!(outcome.staging.is_empty());
        assert!(!plugin.path().join("Binaries").exists());
        assert!(!project.path().join("Binaries").exists());
    }

    #[test]
    fn companions_are_added_only_when_enabled() {
        let plugin = TempDir::new().unwrap();
        let sdk = TempDir::new().unwrap();
        fs::create_dir_all(sdk.path().join("Imath")).unwrap();
        fs::write(
            sdk.path().join("Imath/Imath.Build.cs"),
            "public class Imath : ModuleRules {}",
        )
        .unwrap();

        let context = ResolveContext::new(PlatformId::Linux, plugin.path()).with_sdk_root(sdk.path());
        let outcome = Resolver::new(table(), context.clone()).run().unwrap();
        assert!(!outcome.config.is_defined("WITH_OPENEXR"));
        assert!(outcome.config.extra_dependencies.is_empty());

        fs::write(
            sdk.path().join("OpenEXR.Build.cs"),
            "public class OpenEXR : ModuleRules {}",
        )
        .unwrap();
        let outcome = Resolver::new(table(), context).run().unwrap();
        assert!(outcome.config.is_defined("WITH_OPENEXR"));
        assert_eq!(outcome.config.extra_dependencies, vec!["OpenEXR", "Imath"]);
    }

    #[test]
    fn invalid_table_fails_before_probing() {
        let mut table = table();
        table.capabilities[0].definition = "not valid".to_string();
        let plugin = TempDir::new().unwrap();

        let context = ResolveContext::new(PlatformId::Linux, plugin.path());
        assert!(Resolver::new(table, context).run().is_err());
    }
}
