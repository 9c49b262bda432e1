//! Export functionality for dependency check results.
//!
//! This module provides exporters for outputting a check outcome in
//! various formats: JSON and Markdown.

pub mod json;
pub mod markdown;

use crate::check::{CheckOutcome, FileParseWarning, Report};
use std::io::{self, Write};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// JSON format - the four-key report, machine-readable
    #[default]
    Json,
    /// Markdown format - documentation/reporting
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Data container for export operations.
#[derive(Debug, Clone)]
pub struct ExportData {
    /// Project name (`"unnamed"` when the manifest has none)
    pub project_name: String,
    /// Project version (`"0.0.0"` when the manifest has none)
    pub project_version: String,
    pub report: Report,
    pub warnings: Vec<FileParseWarning>,
    pub incomplete: bool,
    pub files_analyzed: usize,
}

impl ExportData {
    /// Create export data from a check outcome.
    pub fn new(outcome: &CheckOutcome) -> Self {
        Self {
            project_name: outcome
                .project_name
                .clone()
                .unwrap_or_else(|| "unnamed".to_string()),
            project_version: outcome
                .project_version
                .clone()
                .unwrap_or_else(|| "0.0.0".to_string()),
            report: outcome.report.clone(),
            warnings: outcome.warnings.clone(),
            incomplete: outcome.incomplete,
            files_analyzed: outcome.files_analyzed,
        }
    }

    /// Get count of missing dependencies
    pub fn missing_count(&self) -> usize {
        self.report.missing_dependencies.len()
    }

    /// Get count of unused production and development dependencies
    pub fn unused_count(&self) -> usize {
        self.report.unused_dependencies.len() + self.report.unused_dev_dependencies.len()
    }

    /// Get count of used declared dependencies
    pub fn using_count(&self) -> usize {
        self.report.using_dependencies.len()
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the data to the given writer.
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()>;
}

/// Export data in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    data: &ExportData,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Json => json::JsonExporter.export(data, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export(data, writer),
    }
}

/// Export data to a string.
pub fn export_to_string(format: ExportFormat, data: &ExportData) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, data, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!(
            "markdown".parse::<ExportFormat>().unwrap(),
            ExportFormat::Markdown
        );
        assert_eq!(
            "md".parse::<ExportFormat>().unwrap(),
            ExportFormat::Markdown
        );
        assert!("csv".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_display() {
        assert_eq!(format!("{}", ExportFormat::Json), "json");
        assert_eq!(format!("{}", ExportFormat::Markdown), "markdown");
    }

    #[test]
    fn test_export_data_defaults() {
        let data = ExportData::new(&CheckOutcome::default());
        assert_eq!(data.project_name, "unnamed");
        assert_eq!(data.project_version, "0.0.0");
        assert_eq!(data.missing_count(), 0);
        assert_eq!(data.unused_count(), 0);
    }
}
