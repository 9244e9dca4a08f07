//! CSV export implementation.
//!
//! Exports extracted dependencies in CSV format for spreadsheet use.

use super::{format_hashes, ExportData, Exporter};
use std::io::{self, Write};

/// CSV exporter implementation.
pub struct CsvExporter;

const HEADER: &str = "lockfile,name,version,transitivity,line,resolved,hashes";

impl CsvExporter {
    /// Escape a field value for CSV format.
    ///
    /// Wraps the value in quotes if it contains commas, quotes, or newlines.
    fn escape_field(value: &str) -> String {
        if value.contains(',') || value.contains('"') || value.contains('\n') {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }

    fn write_rows<W: Write>(data: &ExportData, writer: &mut W) -> io::Result<()> {
        for dep in &data.dependencies {
            writeln!(
                writer,
                "{},{},{},{},{},{},{}",
                Self::escape_field(&data.lockfile),
                Self::escape_field(&dep.package),
                Self::escape_field(&dep.version),
                dep.transitivity.label(),
                dep.line_number,
                Self::escape_field(dep.resolved_url.as_deref().unwrap_or("")),
                Self::escape_field(&format_hashes(dep)),
            )?;
        }

        Ok(())
    }
}

impl Exporter for CsvExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)?;
        Self::write_rows(data, writer)
    }

    /// Writes one header followed by the rows of every lockfile.
    fn export_many<W: Write>(&self, data: &[ExportData], writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)?;
        for item in data {
            Self::write_rows(item, writer)?;
        }
        Ok(())
    }
}
