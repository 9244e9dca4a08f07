//! Export functionality for extracted dependencies.
//!
//! This module provides exporters for writing lockfile analysis results
//! in various formats: JSON, CSV, and Markdown.

pub mod csv;
pub mod json;
pub mod markdown;

use crate::parser::{FoundDependency, Manifest, Transitivity};
use crate::scan::LockfileReport;
use std::io::{self, Write};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON format - machine-readable, full data
    Json,
    /// CSV format - spreadsheet-friendly
    Csv,
    /// Markdown format - documentation/reporting
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: json, csv, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Data container for export operations.
///
/// Holds the records extracted from one lockfile along with the project
/// they belong to.
#[derive(Debug, Clone)]
pub struct ExportData {
    /// Project name
    pub project_name: String,
    /// Project version
    pub project_version: String,
    /// Lockfile the records came from
    pub lockfile: String,
    /// Extracted dependencies in lockfile order
    pub dependencies: Vec<FoundDependency>,
}

impl ExportData {
    /// Create new export data from extracted records.
    pub fn new(
        project_name: String,
        project_version: String,
        lockfile: String,
        dependencies: Vec<FoundDependency>,
    ) -> Self {
        Self {
            project_name,
            project_version,
            lockfile,
            dependencies,
        }
    }

    /// Create export data for a scanned lockfile, naming the project from
    /// its manifest when one was read.
    pub fn from_report(report: LockfileReport, manifest: Option<&Manifest>) -> Self {
        let project_name = manifest
            .and_then(|m| m.name.clone())
            .or_else(|| {
                report
                    .lockfile
                    .parent()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| "unknown".to_string());
        let project_version = manifest
            .and_then(|m| m.version.clone())
            .unwrap_or_else(|| "0.0.0".to_string());

        Self::new(
            project_name,
            project_version,
            report.lockfile.display().to_string(),
            report.dependencies,
        )
    }

    fn count(&self, transitivity: Transitivity) -> usize {
        self.dependencies
            .iter()
            .filter(|d| d.transitivity == transitivity)
            .count()
    }

    /// Get count of direct dependencies
    pub fn direct_count(&self) -> usize {
        self.count(Transitivity::Direct)
    }

    /// Get count of transitive dependencies
    pub fn transitive_count(&self) -> usize {
        self.count(Transitivity::Transitive)
    }

    /// Get count of dependencies with unknown transitivity
    pub fn unknown_count(&self) -> usize {
        self.count(Transitivity::Unknown)
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the data to the given writer.
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()>;

    /// Export several lockfiles to one writer.
    ///
    /// The default writes each one in turn.
    fn export_many<W: Write>(&self, data: &[ExportData], writer: &mut W) -> io::Result<()> {
        for item in data {
            self.export(item, writer)?;
        }
        Ok(())
    }
}

/// Export data in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    data: &ExportData,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Json => json::JsonExporter.export(data, writer),
        ExportFormat::Csv => csv::CsvExporter.export(data, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export(data, writer),
    }
}

/// Export several lockfiles in the specified format.
pub fn export_many<W: Write>(
    format: ExportFormat,
    data: &[ExportData],
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Json => json::JsonExporter.export_many(data, writer),
        ExportFormat::Csv => csv::CsvExporter.export_many(data, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export_many(data, writer),
    }
}

/// Export data to a string.
pub fn export_to_string(format: ExportFormat, data: &ExportData) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, data, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Joins allowed hashes as `algo:digest` pairs separated by `;`.
pub(crate) fn format_hashes(dep: &FoundDependency) -> String {
    dep.allowed_hashes
        .iter()
        .flat_map(|(algorithm, digests)| {
            digests
                .iter()
                .map(move |digest| format!("{}:{}", algorithm, digest))
        })
        .collect::<Vec<_>>()
        .join(";")
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(
            "markdown".parse::<ExportFormat>().unwrap(),
            ExportFormat::Markdown
        );
        assert_eq!(
            "md".parse::<ExportFormat>().unwrap(),
            ExportFormat::Markdown
        );
        assert!("invalid".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_display() {
        assert_eq!(format!("{}", ExportFormat::Json), "json");
        assert_eq!(format!("{}", ExportFormat::Csv), "csv");
        assert_eq!(format!("{}", ExportFormat::Markdown), "markdown");
    }

    #[test]
    fn test_counts() {
        let data = create_test_data();
        assert_eq!(data.direct_count(), 1);
        assert_eq!(data.transitive_count(), 2);
        assert_eq!(data.unknown_count(), 0);
    }

    #[test]
    fn test_format_hashes() {
        let data = create_test_data();
        assert_eq!(format_hashes(&data.dependencies[0]), "sha512:aa;sha512:bb");
        assert_eq!(format_hashes(&data.dependencies[1]), "");
    }

    #[test]
    fn test_from_report_names_project() {
        let report = LockfileReport {
            lockfile: PathBuf::from("repo/web/yarn.lock"),
            manifest: None,
            dependencies: Vec::new(),
        };
        let data = ExportData::from_report(report.clone(), None);
        assert_eq!(data.project_name, "web");
        assert_eq!(data.project_version, "0.0.0");

        let manifest = Manifest {
            name: Some("web-app".to_string()),
            version: Some("2.0.0".to_string()),
            ..Manifest::default()
        };
        let data = ExportData::from_report(report, Some(&manifest));
        assert_eq!(data.project_name, "web-app");
        assert_eq!(data.project_version, "2.0.0");
    }

    #[test]
    fn test_export_to_string_all_formats() {
        let data = create_test_data();
        for format in [ExportFormat::Json, ExportFormat::Csv, ExportFormat::Markdown] {
            let out = export_to_string(format, &data).unwrap();
            assert!(out.contains("loose-envify"), "{} output missing record", format);
        }
    }
}
