//! Markdown export implementation.
//!
//! Exports extracted dependencies in Markdown format for documentation and reporting.

use super::{ExportData, Exporter};
use crate::parser::{FoundDependency, Transitivity};
use std::io::{self, Write};

/// Markdown exporter implementation.
pub struct MarkdownExporter;

impl MarkdownExporter {
    fn write_section<W: Write>(
        writer: &mut W,
        title: &str,
        deps: &[&FoundDependency],
    ) -> io::Result<()> {
        if deps.is_empty() {
            return Ok(());
        }

        writeln!(writer, "### {} ({})", title, deps.len())?;
        writeln!(writer)?;
        writeln!(writer, "| Package | Version | Line | Resolved |")?;
        writeln!(writer, "|---------|---------|------|----------|")?;
        for dep in deps {
            writeln!(
                writer,
                "| {} | {} | {} | {} |",
                dep.package,
                dep.version,
                dep.line_number,
                dep.resolved_url.as_deref().unwrap_or("-")
            )?;
        }
        writeln!(writer)
    }
}

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        // Title
        writeln!(writer, "# Lockfile Dependency Report")?;
        writeln!(writer)?;
        writeln!(
            writer,
            "**Project:** {} v{}",
            data.project_name, data.project_version
        )?;
        writeln!(writer, "**Lockfile:** `{}`", data.lockfile)?;
        writeln!(writer)?;

        // Summary section
        writeln!(writer, "## Summary")?;
        writeln!(writer)?;
        writeln!(writer, "| Metric | Count |")?;
        writeln!(writer, "|--------|-------|")?;
        writeln!(
            writer,
            "| Total Dependencies | {} |",
            data.dependencies.len()
        )?;
        writeln!(writer, "| Direct | {} |", data.direct_count())?;
        writeln!(writer, "| Transitive | {} |", data.transitive_count())?;
        writeln!(writer, "| Unknown | {} |", data.unknown_count())?;
        writeln!(writer)?;

        writeln!(writer, "## Dependencies")?;
        writeln!(writer)?;

        for (transitivity, title) in [
            (Transitivity::Direct, "Direct Dependencies"),
            (Transitivity::Transitive, "Transitive Dependencies"),
            (Transitivity::Unknown, "Unclassified Dependencies"),
        ] {
            let deps: Vec<_> = data
                .dependencies
                .iter()
                .filter(|d| d.transitivity == transitivity)
                .collect();
            Self::write_section(writer, title, &deps)?;
        }

        // Footer
        writeln!(writer, "---")?;
        writeln!(writer, "*Generated by lockscope*")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::{create_test_data, dependency};

    fn render(data: &ExportData) -> String {
        let mut output = Vec::new();
        MarkdownExporter.export(data, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_markdown_export_basic() {
        let md_str = render(&create_test_data());

        // Check title
        assert!(md_str.contains("# Lockfile Dependency Report"));

        // Check project info
        assert!(md_str.contains("**Project:** test-project v1.0.0"));
        assert!(md_str.contains("**Lockfile:** `yarn.lock`"));

        // Check summary table
        assert!(md_str.contains("| Total Dependencies | 3 |"));
        assert!(md_str.contains("| Direct | 1 |"));
        assert!(md_str.contains("| Transitive | 2 |"));
    }

    #[test]
    fn test_markdown_export_sections() {
        let md_str = render(&create_test_data());

        assert!(md_str.contains("## Summary"));
        assert!(md_str.contains("## Dependencies"));
        assert!(md_str.contains("### Direct Dependencies (1)"));
        assert!(md_str.contains("### Transitive Dependencies (2)"));
        // Empty groups are omitted
        assert!(!md_str.contains("### Unclassified Dependencies"));
    }

    #[test]
    fn test_markdown_export_dependency_tables() {
        let md_str = render(&create_test_data());

        assert!(md_str.contains(
            "| react | 18.2.0 | 4 | https://registry.yarnpkg.com/react/-/react-18.2.0.tgz |"
        ));
        assert!(md_str.contains("| loose-envify | 1.4.0 | 10 | - |"));
    }

    #[test]
    fn test_markdown_export_unknown_section() {
        let data = ExportData::new(
            "test".to_string(),
            "1.0.0".to_string(),
            "yarn.lock".to_string(),
            vec![dependency("colors", "1.4.0", Transitivity::Unknown, 4)],
        );
        let md_str = render(&data);

        assert!(md_str.contains("### Unclassified Dependencies (1)"));
        assert!(!md_str.contains("### Direct Dependencies"));
    }

    #[test]
    fn test_markdown_export_footer() {
        let md_str = render(&create_test_data());

        assert!(md_str.contains("---"));
        assert!(md_str.contains("*Generated by lockscope*"));
    }
}
