//! JSON export implementation.
//!
//! Exports extracted dependencies in JSON format for machine-readable output.

use super::{ExportData, Exporter};
use crate::parser::FoundDependency;
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    total_dependencies: usize,
    direct: usize,
    transitive: usize,
    unknown: usize,
}

/// Project info for JSON output.
#[derive(Serialize)]
struct JsonProject<'a> {
    name: &'a str,
    version: &'a str,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport<'a> {
    project: JsonProject<'a>,
    lockfile: &'a str,
    summary: JsonSummary,
    dependencies: &'a [FoundDependency],
}

impl<'a> From<&'a ExportData> for JsonExport<'a> {
    fn from(data: &'a ExportData) -> Self {
        JsonExport {
            project: JsonProject {
                name: &data.project_name,
                version: &data.project_version,
            },
            lockfile: &data.lockfile,
            summary: JsonSummary {
                total_dependencies: data.dependencies.len(),
                direct: data.direct_count(),
                transitive: data.transitive_count(),
                unknown: data.unknown_count(),
            },
            dependencies: &data.dependencies,
        }
    }
}

fn write_json<W: Write, T: Serialize>(value: &T, writer: &mut W) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    writeln!(writer, "{}", json)
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        write_json(&JsonExport::from(data), writer)
    }

    /// Writes a single JSON array with one object per lockfile.
    fn export_many<W: Write>(&self, data: &[ExportData], writer: &mut W) -> io::Result<()> {
        let exports: Vec<JsonExport<'_>> = data.iter().map(JsonExport::from).collect();
        write_json(&exports, writer)
    }
}
