//! JSON export implementation.
//!
//! Writes the report with exactly its four keys. Warnings and the
//! incomplete flag stay out of the document; they are logged instead.

use super::{ExportData, Exporter};
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        let json = data
            .report
            .to_pretty_json()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{CheckOutcome, FileParseWarning};

    fn create_test_data() -> ExportData {
        let mut outcome = CheckOutcome::default();
        let report = &mut outcome.report;
        report
            .missing_dependencies
            .insert("express".to_string(), vec!["src/server.js".to_string()]);
        report.unused_dependencies.push("left-pad".to_string());
        report.unused_dev_dependencies.push("jest".to_string());
        report.using_dependencies.insert(
            "react".to_string(),
            vec!["src/app.jsx".to_string(), "src/index.js".to_string()],
        );
        outcome
            .warnings
            .push(FileParseWarning::new("src/broken.js", "Syntax error"));

        ExportData::new(&outcome)
    }

    #[test]
    fn test_json_export_keys() {
        let data = create_test_data();
        let mut output = Vec::new();

        JsonExporter.export(&data, &mut output).unwrap();

        let json_str = String::from_utf8(output).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json_str).unwrap();
        let keys: Vec<_> = parsed.as_object().unwrap().keys().cloned().collect();

        assert_eq!(keys.len(), 4);
        assert_eq!(parsed["missingDependencies"]["express"][0], "src/server.js");
        assert_eq!(parsed["unusedDependencies"][0], "left-pad");
        assert_eq!(parsed["unusedDevDependencies"][0], "jest");
        assert_eq!(parsed["usingDependencies"]["react"][1], "src/index.js");
    }

    #[test]
    fn test_json_export_omits_warnings() {
        let data = create_test_data();
        let mut output = Vec::new();

        JsonExporter.export(&data, &mut output).unwrap();

        let json_str = String::from_utf8(output).unwrap();
        assert!(!json_str.contains("broken.js"));
    }
}
