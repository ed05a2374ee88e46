//! Scan command implementation.
//!
//! The `sdkgate scan` command lists the modules the scanner finds for one or
//! more descriptor prefixes, without loading a capability table.

use crate::cli::args::ScanArgs;
use crate::error::Result;
use crate::scanner::ModuleScanner;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The scan command implementation.
pub struct ScanCommand {
    args: ScanArgs,
}

impl ScanCommand {
    pub fn new(args: ScanArgs) -> Self {
        Self { args }
    }
}

impl Command for ScanCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let scanner = ModuleScanner::with_suffix(&self.args.suffix);
        let modules = scanner.scan_variants(&self.args.root, &self.args.prefixes);

        if self.args.json {
            let json = serde_json::to_string_pretty(&modules)
                .map_err(|e| anyhow::anyhow!("Failed to serialize modules: {}", e))?;
            ui.print(&format!("{}\n", json));
            return Ok(CommandResult::success());
        }

        if modules.is_empty() {
            ui.warning(&format!(
                "No {}*{} descriptors declare a module under {}",
                self.args.prefixes.join("|"),
                scanner.suffix(),
                self.args.root.display()
            ));
            return Ok(CommandResult::success());
        }

        let detail = ui.output_mode().shows_detail();
        let mut listing = String::new();
        for module in &modules {
            if detail {
                listing.push_str(&format!(
                    "{}\t{}\n",
                    module.name,
                    module.source_path.display()
                ));
            } else {
                listing.push_str(&format!("{}\n", module.name));
            }
        }
        ui.print(&listing);

        Ok(CommandResult::success())
    }
}
