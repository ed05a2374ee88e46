//! Human-readable output formatter.

use super::ReportFormatter;
use crate::assembler::CapabilityReport;
use crate::resolver::ResolveOutcome;
use crate::stager::{DirectoryStatus, StageStatus};
use crate::ui::SdkgateTheme;
use std::io::Write;

/// Formats resolve output for terminal display.
pub struct HumanFormatter {
    theme: SdkgateTheme,
}

impl HumanFormatter {
    pub fn new(use_color: bool) -> Self {
        Self {
            theme: SdkgateTheme::for_color(use_color),
        }
    }

    fn assignments(&self, report: &CapabilityReport) -> String {
        let value = report.definition_value();
        report
            .definitions
            .iter()
            .map(|name| format!("{}={}", self.theme.highlight.apply_to(name), value))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn write_capability<W: Write>(
        &self,
        report: &CapabilityReport,
        platform: &str,
        writer: &mut W,
    ) -> std::io::Result<()> {
        let id = &report.capability_id;

        if report.gated {
            let line = format!("{} not applicable on {}", id, platform);
            return writeln!(
                writer,
                "{}  {}",
                self.theme.format_skipped(&line),
                self.assignments(report)
            );
        }

        if report.enabled() {
            writeln!(
                writer,
                "{}  {}",
                self.theme.format_success(&format!("{} enabled", id)),
                self.assignments(report)
            )?;
            if !report.modules.is_empty() {
                writeln!(
                    writer,
                    "    {} {}",
                    self.theme.key.apply_to("modules:"),
                    report.modules.join(", ")
                )?;
            }
            if let Some(directory) = &report.libraries.directory {
                writeln!(
                    writer,
                    "    {} {}",
                    self.theme.key.apply_to("import libraries:"),
                    self.theme.dim.apply_to(directory.display())
                )?;
            }
        } else {
            writeln!(
                writer,
                "{}  {}",
                self.theme
                    .format_error(&format!("{} support disabled, missing dependencies:", id)),
                self.assignments(report)
            )?;
            for missing in &report.outcome.missing {
                writeln!(writer, "    - {}", missing)?;
            }
        }

        for warning in &report.outcome.warnings {
            writeln!(writer, "    {}", self.theme.format_warning(warning))?;
        }

        Ok(())
    }
}

impl ReportFormatter for HumanFormatter {
    fn format<W: Write>(&self, outcome: &ResolveOutcome, writer: &mut W) -> std::io::Result<()> {
        let config = &outcome.config;
        let platform = config.platform.as_str();

        writeln!(
            writer,
            "{} {}",
            self.theme.format_header(&outcome.plugin),
            self.theme.dim.apply_to(format!("({})", platform))
        )?;
        writeln!(writer)?;

        for report in &outcome.reports {
            self.write_capability(report, platform, writer)?;
        }

        let staged: usize = outcome.staging.iter().map(|r| r.copies()).sum();
        for report in &outcome.staging {
            if report.source_missing {
                writeln!(
                    writer,
                    "{}",
                    self.theme.format_warning(&format!(
                        "{}: nothing to stage, {} is missing",
                        report.capability_id,
                        report.source_artifact.display()
                    ))
                )?;
            }
            for destination in &report.destinations {
                if let StageStatus::Failed { error } = &destination.status {
                    writeln!(
                        writer,
                        "{}",
                        self.theme.format_warning(&format!(
                            "could not stage {}: {}",
                            destination.target.display(),
                            error
                        ))
                    )?;
                }
            }
        }
        for directory in &outcome.directories {
            if let DirectoryStatus::Failed { error } = &directory.status {
                writeln!(
                    writer,
                    "{}",
                    self.theme.format_warning(&format!(
                        "could not create {}: {}",
                        directory.path.display(),
                        error
                    ))
                )?;
            }
        }

        writeln!(writer)?;
        writeln!(writer, "{}", self.theme.key.apply_to("Definitions:"))?;
        for (name, value) in &config.definitions {
            writeln!(writer, "  {}={}", name, value)?;
        }

        if !config.extra_dependencies.is_empty() {
            writeln!(
                writer,
                "{} {}",
                self.theme.key.apply_to("Dependencies:"),
                config.extra_dependencies.join(", ")
            )?;
        }
        if staged > 0 {
            writeln!(
                writer,
                "{} {} file(s)",
                self.theme.key.apply_to("Staged:"),
                staged
            )?;
        }
        writeln!(
            writer,
            "{} {}",
            self.theme.key.apply_to("Fingerprint:"),
            self.theme.dim.apply_to(&config.fingerprint)
        )?;

        Ok(())
    }
}
