//! Resolve command implementation.
//!
//! The `sdkgate resolve` command runs a full pass over the capability table
//! and prints the resulting configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::cli::args::ResolveArgs;
use crate::config::{load_merged_table, TablePaths};
use crate::error::Result;
use crate::platform::PlatformId;
use crate::report::{render, ReportFormat};
use crate::resolver::{ResolveContext, Resolver};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The resolve command implementation.
pub struct ResolveCommand {
    plugin_dir: PathBuf,
    table: Option<PathBuf>,
    args: ResolveArgs,
}

impl ResolveCommand {
    pub fn new(plugin_dir: &Path, table: Option<&Path>, args: ResolveArgs) -> Self {
        Self {
            plugin_dir: plugin_dir.to_path_buf(),
            table: table.map(Path::to_path_buf),
            args,
        }
    }

    pub fn args(&self) -> &ResolveArgs {
        &self.args
    }

    fn context(&self) -> Result<ResolveContext> {
        let platform = match &self.args.platform {
            Some(name) => name.parse::<PlatformId>()?,
            None => PlatformId::current(),
        };

        let mut context = ResolveContext::new(platform, &self.plugin_dir);
        if let Some(root) = &self.args.sdk_root {
            context = context.with_sdk_root(root);
        }
        if let Some(project) = &self.args.project_dir {
            context = context.with_project_dir(project);
        }
        Ok(context)
    }
}

impl Command for ResolveCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let context = self.context()?;
        let format = ReportFormat::from_str(&self.args.format).unwrap_or_default();

        let paths = TablePaths::discover(&self.plugin_dir, self.table.as_deref());
        if ui.output_mode().shows_detail() {
            ui.message(&format!("Capability table: {}", paths.table.display()));
            if let Some(local) = &paths.local {
                ui.message(&format!("Local overrides: {}", local.display()));
            }
        }
        let table = load_merged_table(&paths)?;

        let mut resolver = Resolver::new(table, context);
        if self.args.no_stage {
            resolver = resolver.without_staging();
        }
        let outcome = resolver.run()?;

        let mut buffer = Vec::new();
        render(format, &outcome, ui.use_color(), &mut buffer)?;
        ui.print(&String::from_utf8_lossy(&buffer));

        let failures = outcome.side_effect_failures();
        if failures > 0 && format != ReportFormat::Human {
            ui.warning(&format!(
                "{} staging or directory step(s) failed; the configuration is unaffected",
                failures
            ));
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SdkgateError;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    const TABLE: &str = r#"
plugin: Foo
capabilities:
  - id: foo
    definition: WITH_FOO
    modules:
      prefixes: [Foo]
"#;

    fn args(format: &str) -> ResolveArgs {
        ResolveArgs {
            platform: Some("linux".to_string()),
            format: format.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn prints_defines_for_discovered_module() {
        let plugin = TempDir::new().unwrap();
        let sdk = TempDir::new().unwrap();
        fs::write(plugin.path().join("sdkgate.yml"), TABLE).unwrap();
        fs::write(
            sdk.path().join("FooBar.Build.cs"),
            "public class FooBar : ModuleRules\n{\n}\n",
        )
        .unwrap();

        let mut args = args("defines");
        args.sdk_root = Some(sdk.path().to_path_buf());
        let mut ui = MockUI::new();
        let result = ResolveCommand::new(plugin.path(), None, args)
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert_eq!(ui.printed(), "WITH_FOO=1\n");
    }

    #[test]
    fn missing_table_is_reported() {
        let plugin = TempDir::new().unwrap();
        let mut ui = MockUI::new();
        let err = ResolveCommand::new(plugin.path(), None, args("human"))
            .execute(&mut ui)
            .unwrap_err();
        assert!(matches!(err, SdkgateError::TableNotFound { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn invalid_platform_is_fatal() {
        let plugin = TempDir::new().unwrap();
        fs::write(plugin.path().join("sdkgate.yml"), TABLE).unwrap();

        let mut args = args("human");
        args.platform = Some("amiga".to_string());
        let err = ResolveCommand::new(plugin.path(), None, args)
            .execute(&mut MockUI::new())
            .unwrap_err();
        assert!(matches!(err, SdkgateError::InvalidPlatform { .. }));
    }
}
