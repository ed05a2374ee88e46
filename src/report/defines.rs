//! `NAME=value` output formatter.
//!
//! One definition per line, sorted by name, nothing else. Suitable for
//! `-D` flags or an env file consumed by the build.

use super::ReportFormatter;
use crate::resolver::ResolveOutcome;
use std::io::Write;

/// Formats resolve output as definition assignments.
pub struct DefinesFormatter;

impl DefinesFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DefinesFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for DefinesFormatter {
    fn format<W: Write>(&self, outcome: &ResolveOutcome, writer: &mut W) -> std::io::Result<()> {
        for (name, value) in &outcome.config.definitions {
            writeln!(writer, "{}={}", name, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures;

    #[test]
    fn writes_sorted_assignments_only() {
        let mut output = Vec::new();
        DefinesFormatter::new()
            .format(&fixtures::outcome(), &mut output)
            .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "WITH_D3D11=0\nWITH_NVENC=0\nWITH_OMNI_NVENC=1\nWITH_OPENEXR=1\n"
        );
    }
}
