//! Check command implementation.
//!
//! The `sdkgate check` command loads the capability table (with its local
//! overlay) and reports every structural problem at once.

use std::path::{Path, PathBuf};

use serde_json::json;

use crate::cli::args::CheckArgs;
use crate::config::{load_merged_table, validate_table, TablePaths, ValidationError};
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The check command implementation.
pub struct CheckCommand {
    plugin_dir: PathBuf,
    table: Option<PathBuf>,
    args: CheckArgs,
}

impl CheckCommand {
    pub fn new(plugin_dir: &Path, table: Option<&Path>, args: CheckArgs) -> Self {
        Self {
            plugin_dir: plugin_dir.to_path_buf(),
            table: table.map(Path::to_path_buf),
            args,
        }
    }

    fn format_json(&self, errors: &[ValidationError]) -> String {
        let errors: Vec<_> = errors
            .iter()
            .map(|e| {
                json!({
                    "rule": e.rule,
                    "message": e.message,
                    "capability": e.capability,
                })
            })
            .collect();
        let output = json!({ "valid": errors.is_empty(), "errors": errors });
        format!("{:#}\n", output)
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let paths = TablePaths::discover(&self.plugin_dir, self.table.as_deref());
        let table = load_merged_table(&paths)?;
        let errors = validate_table(&table);

        if self.args.json {
            ui.print(&self.format_json(&errors));
        } else if errors.is_empty() {
            ui.success(&format!(
                "{}: {} capabilit{} valid",
                paths.table.display(),
                table.capabilities.len(),
                if table.capabilities.len() == 1 { "y" } else { "ies" }
            ));
        } else {
            for error in &errors {
                ui.error(&format!("[{}] {}", error.rule, error.message));
            }
        }

        if errors.is_empty() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}
