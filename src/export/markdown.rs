//! Markdown export implementation.
//!
//! Exports check results in Markdown format for documentation and reporting.

use super::{ExportData, Exporter};
use std::io::{self, Write};

/// Markdown exporter implementation.
pub struct MarkdownExporter;

impl MarkdownExporter {
    fn write_name_list<W: Write>(writer: &mut W, title: &str, names: &[String]) -> io::Result<()> {
        if names.is_empty() {
            return Ok(());
        }
        writeln!(writer, "### {} ({})", title, names.len())?;
        writeln!(writer)?;
        for name in names {
            writeln!(writer, "- `{}`", name)?;
        }
        writeln!(writer)
    }
}

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        let report = &data.report;

        // Title
        writeln!(writer, "# Dependency Check Report")?;
        writeln!(writer)?;
        writeln!(
            writer,
            "**Project:** {} v{}",
            data.project_name, data.project_version
        )?;
        writeln!(writer)?;

        if data.incomplete {
            writeln!(
                writer,
                "> **Incomplete:** the check was cancelled before every file was analyzed."
            )?;
            writeln!(writer)?;
        }

        // Summary section
        writeln!(writer, "## Summary")?;
        writeln!(writer)?;
        writeln!(writer, "| Metric | Count |")?;
        writeln!(writer, "|--------|-------|")?;
        writeln!(writer, "| Files Analyzed | {} |", data.files_analyzed)?;
        writeln!(writer, "| Missing | {} |", data.missing_count())?;
        writeln!(
            writer,
            "| Unused | {} |",
            report.unused_dependencies.len()
        )?;
        writeln!(
            writer,
            "| Unused (dev) | {} |",
            report.unused_dev_dependencies.len()
        )?;
        writeln!(writer, "| Used | {} |", data.using_count())?;
        writeln!(writer, "| Warnings | {} |", data.warnings.len())?;
        writeln!(writer)?;

        // Issues section (missing and unused)
        if data.missing_count() > 0 || data.unused_count() > 0 {
            writeln!(writer, "## Issues")?;
            writeln!(writer)?;
        }

        if !report.missing_dependencies.is_empty() {
            writeln!(
                writer,
                "### Missing Dependencies ({})",
                report.missing_dependencies.len()
            )?;
            writeln!(writer)?;
            writeln!(writer, "| Package | Used In |")?;
            writeln!(writer, "|---------|---------|")?;
            for (name, files) in &report.missing_dependencies {
                writeln!(writer, "| {} | {} |", name, files.join(", "))?;
            }
            writeln!(writer)?;
        }

        Self::write_name_list(writer, "Unused Dependencies", &report.unused_dependencies)?;
        Self::write_name_list(
            writer,
            "Unused Dev Dependencies",
            &report.unused_dev_dependencies,
        )?;

        // Used dependencies
        if !report.using_dependencies.is_empty() {
            writeln!(writer, "## Used Dependencies")?;
            writeln!(writer)?;
            writeln!(writer, "| Package | Files |")?;
            writeln!(writer, "|---------|-------|")?;
            for (name, files) in &report.using_dependencies {
                writeln!(writer, "| {} | {} |", name, files.len())?;
            }
            writeln!(writer)?;
        }

        // Warnings
        if !data.warnings.is_empty() {
            writeln!(writer, "## Warnings")?;
            writeln!(writer)?;
            writeln!(writer, "The following files could not be analyzed:")?;
            writeln!(writer)?;
            for warning in &data.warnings {
                writeln!(writer, "- `{}`: {}", warning.file, warning.message)?;
            }
            writeln!(writer)?;
        }

        // Footer
        writeln!(writer, "---")?;
        writeln!(writer, "*Generated by depcheck*")?;

        Ok(())
    }
}
