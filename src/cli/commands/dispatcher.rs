//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::ui::UserInterface;

use super::check::CheckCommand;
use super::completions::CompletionsCommand;
use super::resolve::ResolveCommand;
use super::scan::ScanCommand;
use super::schema::SchemaCommand;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: u8,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: u8) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    plugin_dir: PathBuf,
    table: Option<PathBuf>,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given plugin directory.
    pub fn new(plugin_dir: PathBuf) -> Self {
        Self {
            plugin_dir,
            table: None,
        }
    }

    /// Use an explicit capability table instead of `sdkgate.yml`.
    pub fn with_table(mut self, table: Option<PathBuf>) -> Self {
        self.table = table;
        self
    }

    pub fn plugin_dir(&self) -> &Path {
        &self.plugin_dir
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let table = self.table.as_deref();
        match &cli.command {
            Commands::Resolve(args) => {
                ResolveCommand::new(&self.plugin_dir, table, args.clone()).execute(ui)
            }
            Commands::Scan(args) => ScanCommand::new(args.clone()).execute(ui),
            Commands::Check(args) => {
                CheckCommand::new(&self.plugin_dir, table, args.clone()).execute(ui)
            }
            Commands::Schema => SchemaCommand::new().execute(ui),
            Commands::Completions(args) => CompletionsCommand::new(args.clone()).execute(ui),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn command_result_codes() {
        assert_eq!(CommandResult::success().exit_code, 0);
        let failed = CommandResult::failure(1);
        assert!(!failed.success);
        assert_eq!(failed.exit_code, 1);
    }

    #[test]
    fn dispatches_schema() {
        let cli = Cli::parse_from(["sdkgate", "schema"]);
        let mut ui = MockUI::new();
        let result = CommandDispatcher::new(PathBuf::from("."))
            .dispatch(&cli, &mut ui)
            .unwrap();
        assert!(result.success);
        assert!(ui.printed().contains("draft-07"));
    }

    #[test]
    fn dispatches_check_with_explicit_table() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("caps.yml"),
            "capabilities:\n  - id: a\n    definition: WITH_A\n    modules:\n      prefixes: [A]\n",
        )
        .unwrap();

        let cli = Cli::parse_from(["sdkgate", "check"]);
        let mut ui = MockUI::new();
        let dispatcher = CommandDispatcher::new(temp.path().to_path_buf())
            .with_table(Some(PathBuf::from("caps.yml")));
        assert_eq!(dispatcher.plugin_dir(), temp.path());

        let result = dispatcher.dispatch(&cli, &mut ui).unwrap();
        assert!(result.success);
    }
}
