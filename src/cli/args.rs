//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// sdkgate - Build-time capability resolution for native plugins.
#[derive(Debug, Parser)]
#[command(name = "sdkgate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the capability table (default: <plugin-dir>/sdkgate.yml)
    #[arg(short, long, global = true)]
    pub table: Option<PathBuf>,

    /// Plugin directory (default: current directory)
    #[arg(short, long, global = true, env = "SDKGATE_PLUGIN_DIR")]
    pub plugin_dir: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve capabilities, print the configuration and stage runtime libraries
    Resolve(ResolveArgs),

    /// List modules declared by descriptor files under a tree
    Scan(ScanArgs),

    /// Validate the capability table
    Check(CheckArgs),

    /// Print the JSON Schema of the capability table
    Schema,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `resolve` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ResolveArgs {
    /// Target platform: win64, linux, linuxarm64, mac (default: host)
    #[arg(long, env = "SDKGATE_PLATFORM")]
    pub platform: Option<String>,

    /// Third-party SDK tree (absent means no SDKs are installed)
    #[arg(long, env = "SDKGATE_SDK_ROOT")]
    pub sdk_root: Option<PathBuf>,

    /// Host project directory
    #[arg(long, env = "SDKGATE_PROJECT_DIR")]
    pub project_dir: Option<PathBuf>,

    /// Output format: human, json, defines
    #[arg(long, default_value = "human", value_parser = ["human", "json", "defines"])]
    pub format: String,

    /// Do not create directories or stage runtime libraries
    #[arg(long)]
    pub no_stage: bool,
}

/// Arguments for the `scan` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ScanArgs {
    /// Tree to scan
    #[arg(long, env = "SDKGATE_SDK_ROOT")]
    pub root: PathBuf,

    /// Descriptor name prefix (repeatable; results are unioned)
    #[arg(long = "prefix", required = true)]
    pub prefixes: Vec<String>,

    /// Descriptor file suffix
    #[arg(long, default_value = ".Build.cs")]
    pub suffix: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_resolve_flags() {
        let cli = Cli::parse_from([
            "sdkgate",
            "resolve",
            "--platform",
            "win64",
            "--sdk-root",
            "/sdk",
            "--format",
            "defines",
            "--no-stage",
        ]);
        let Commands::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(args.platform.as_deref(), Some("win64"));
        assert_eq!(args.sdk_root, Some(PathBuf::from("/sdk")));
        assert_eq!(args.format, "defines");
        assert!(args.no_stage);
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["sdkgate", "resolve", "--format", "xml"]).is_err());
    }

    #[test]
    fn scan_collects_repeated_prefixes() {
        let cli = Cli::parse_from([
            "sdkgate", "scan", "--root", "/sdk", "--prefix", "OpenEXR", "--prefix", "OpenExr",
        ]);
        let Commands::Scan(args) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(args.prefixes, vec!["OpenEXR", "OpenExr"]);
        assert_eq!(args.suffix, ".Build.cs");
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["sdkgate", "check", "--plugin-dir", "/p", "--quiet"]);
        assert_eq!(cli.plugin_dir, Some(PathBuf::from("/p")));
        assert!(cli.quiet);
    }
}
