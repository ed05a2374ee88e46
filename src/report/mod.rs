//! Resolve report formatters.
//!
//! A resolve pass can be rendered for people (per-capability verdicts with
//! the itemised missing artifacts), as JSON for tooling, or as `NAME=value`
//! lines a build script can feed straight into compiler definitions.

pub mod defines;
pub mod human;
pub mod json;

use crate::resolver::ResolveOutcome;
use std::io::Write;
use std::str::FromStr;

/// Output format for resolve results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Human,
    Json,
    Defines,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "defines" => Ok(Self::Defines),
            _ => Err(format!("unknown report format: {}", s)),
        }
    }
}

/// Trait for formatting resolve output.
pub trait ReportFormatter {
    /// Format a resolve outcome to the given writer.
    fn format<W: Write>(&self, outcome: &ResolveOutcome, writer: &mut W) -> std::io::Result<()>;
}

/// Render an outcome in the requested format.
pub fn render<W: Write>(
    format: ReportFormat,
    outcome: &ResolveOutcome,
    use_color: bool,
    writer: &mut W,
) -> std::io::Result<()> {
    match format {
        ReportFormat::Human => HumanFormatter::new(use_color).format(outcome, writer),
        ReportFormat::Json => JsonFormatter::new().format(outcome, writer),
        ReportFormat::Defines => DefinesFormatter::new().format(outcome, writer),
    }
}

pub use defines::DefinesFormatter;
pub use human::HumanFormatter;
pub use json::JsonFormatter;
