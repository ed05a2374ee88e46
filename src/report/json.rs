//! JSON output formatter.
//!
//! Emits the whole resolve outcome: the resolved configuration, the
//! per-capability verdicts and every staging and directory result.

use super::ReportFormatter;
use crate::resolver::ResolveOutcome;
use std::io::Write;

/// Formats resolve output as pretty-printed JSON.
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format<W: Write>(&self, outcome: &ResolveOutcome, writer: &mut W) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut *writer, outcome)?;
        writeln!(writer)
    }
}
