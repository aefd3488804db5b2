//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use ownergraph_domain::{BuildDiagnostics, OwnershipReport};
use ownergraph_ingest::LoadReport;
use tabled::{
    builder::Builder,
    settings::{object::Columns, object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format an ownership report.
    pub fn format_report(&self, report: &OwnershipReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Table => Ok(self.format_report_table(report)),
            OutputFormat::Quiet => Ok(format_report_quiet(report)),
        }
    }

    fn format_report_table(&self, report: &OwnershipReport) -> String {
        let heading = self.colorize(
            &format!(
                "Final owners of {} ({})",
                report.target.name, report.target.type_label
            ),
            "cyan",
        );

        let heading = match report.shadowed_by {
            Some(id) => format!(
                "{}\n{}",
                heading,
                self.warning(&format!(
                    "Relations naming '{}' refer to entity {}; shares may be incomplete",
                    report.target.name, id
                ))
            ),
            None => heading,
        };

        if report.is_empty() {
            return format!("{}\n{}", heading, self.colorize("No final owners found.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Share", "Owner", "Type", "ID"]);
        for owner in &report.owners {
            builder.push_record([
                format!("{:.2}%", owner.percent),
                owner.name.clone(),
                owner.type_label.clone(),
                owner.id.to_string(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Columns::first()).with(Alignment::right()))
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        format!("{}\n{}", heading, table)
    }

    /// Format load reports and graph diagnostics.
    pub fn format_diagnostics(
        &self,
        entity_report: &LoadReport,
        relation_report: &LoadReport,
        diagnostics: &BuildDiagnostics,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "entities": entity_report,
                "relations": relation_report,
                "graph": diagnostics,
            }))?),
            OutputFormat::Quiet => Ok(format!(
                "{} {} {}",
                entity_report.total_skipped(),
                relation_report.total_skipped(),
                diagnostics.total_skipped()
            )),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record([
                    "File",
                    "Rows",
                    "Loaded",
                    "Short",
                    "Bad id",
                    "Defaulted",
                    "Replaced",
                ]);
                let files = [("entities", entity_report), ("relations", relation_report)];
                for (label, report) in files {
                    builder.push_record([
                        label.to_string(),
                        report.rows_read.to_string(),
                        report.records_loaded.to_string(),
                        report.skipped_short_rows.to_string(),
                        report.skipped_bad_ids.to_string(),
                        report.defaulted_numbers.to_string(),
                        report.replaced_ids.to_string(),
                    ]);
                }
                let mut table = builder.build();
                table.with(Style::rounded());

                let status = if diagnostics.has_warnings() {
                    self.warning("Data-quality issues found")
                } else {
                    self.success("No data-quality issues")
                };

                Ok(format!("{}\n\n{}\n\n{}", table, diagnostics.summary(), status))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// One `NN.NN% par Name (Type)` line per owner.
fn format_report_quiet(report: &OwnershipReport) -> String {
    report
        .owners
        .iter()
        .map(|o| format!("{:.2}% par {} ({})", o.percent, o.name, o.type_label))
        .collect::<Vec<_>>()
        .join("\n")
}
