//! Parser for npm package.json manifests.
//!
//! Only the pieces needed to classify lockfile entries are extracted: the
//! project name and version for report headers, and the direct
//! `dependencies` declarations used to decide transitivity.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::diagnostics::{Diagnostic, DiagnosticSink};

/// Errors that can occur during package.json parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to read the file from disk.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse JSON content.
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The package.json structure is invalid.
    #[error("Invalid package.json: {0}")]
    InvalidPackage(String),
}

/// Result type alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// The set of `(name, constraint)` pairs a manifest declares directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectDependencies {
    entries: HashSet<(String, String)>,
}

impl DirectDependencies {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if exactly this name and constraint are declared.
    pub fn contains(&self, name: &str, constraint: &str) -> bool {
        self.entries
            .contains(&(name.to_string(), constraint.to_string()))
    }

    /// Number of declared dependencies.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the manifest declares no dependencies.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the declared `(name, constraint)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), c.as_str()))
    }
}

impl FromIterator<(String, String)> for DirectDependencies {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// The parts of a package.json relevant to lockfile analysis.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    /// The name of the package.
    pub name: Option<String>,

    /// The version of the package.
    pub version: Option<String>,

    /// Production dependencies declared directly by the project.
    pub direct: DirectDependencies,
}

/// Parses a package.json file from a file path.
pub fn parse_file(path: &Path) -> ParseResult<Manifest> {
    let content = fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parses a package.json from a string.
///
/// A missing or malformed `dependencies` section yields an empty set
/// rather than an error; only non-JSON input or a non-object document fails.
///
/// # Example
///
/// ```
/// use lockscope::parser::package_json::parse_str;
///
/// let json = r#"{"name": "my-app", "dependencies": {"react": "^18.0.0"}}"#;
/// let manifest = parse_str(json).unwrap();
/// assert_eq!(manifest.name, Some("my-app".to_string()));
/// assert!(manifest.direct.contains("react", "^18.0.0"));
/// ```
pub fn parse_str(content: &str) -> ParseResult<Manifest> {
    let value: Value = serde_json::from_str(content)?;
    let object = value.as_object().ok_or_else(|| {
        ParseError::InvalidPackage("top level is not a JSON object".to_string())
    })?;

    let string_field = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);

    let direct: DirectDependencies = object
        .get("dependencies")
        .and_then(Value::as_object)
        .map(|deps| {
            deps.iter()
                .filter_map(|(name, constraint)| {
                    constraint
                        .as_str()
                        .map(|c| (name.clone(), c.to_string()))
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(Manifest {
        name: string_field("name"),
        version: string_field("version"),
        direct,
    })
}

/// Loads the direct dependencies of an optional manifest.
///
/// Returns `None` when no manifest is given or when it cannot be read or
/// parsed, in which case a [`Diagnostic::ManifestUnreadable`] is reported.
/// A manifest without a `dependencies` section yields `Some` of an empty set.
pub fn load_direct_dependencies(
    path: Option<&Path>,
    sink: &mut dyn DiagnosticSink,
) -> Option<DirectDependencies> {
    let path = path?;
    match parse_file(path) {
        Ok(manifest) => Some(manifest.direct),
        Err(e) => {
            sink.report(Diagnostic::ManifestUnreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_PACKAGE_JSON: &str = r#"{
        "name": "test-app",
        "version": "1.0.0",
        "dependencies": {
            "react": "^18.2.0",
            "lodash": "^4.17.21",
            "local-lib": "file:../local-lib"
        },
        "devDependencies": {
            "typescript": "^5.0.0"
        }
    }"#;

    #[test]
    fn test_parse_str_valid() {
        let manifest = parse_str(SAMPLE_PACKAGE_JSON).unwrap();

        assert_eq!(manifest.name, Some("test-app".to_string()));
        assert_eq!(manifest.version, Some("1.0.0".to_string()));
        assert_eq!(manifest.direct.len(), 3);
        assert!(manifest.direct.contains("react", "^18.2.0"));
        assert!(manifest.direct.contains("local-lib", "file:../local-lib"));
    }

    #[test]
    fn test_dev_dependencies_are_not_direct() {
        let manifest = parse_str(SAMPLE_PACKAGE_JSON).unwrap();
        assert!(!manifest.direct.contains("typescript", "^5.0.0"));
    }

    #[test]
    fn test_constraint_must_match_exactly() {
        let manifest = parse_str(SAMPLE_PACKAGE_JSON).unwrap();
        assert!(!manifest.direct.contains("react", "^18.0.0"));
    }

    #[test]
    fn test_missing_dependencies_is_empty_set() {
        let manifest = parse_str(r#"{"name": "minimal"}"#).unwrap();
        assert!(manifest.direct.is_empty());
    }

    #[test]
    fn test_odd_dependencies_shape_is_empty_set() {
        let manifest = parse_str(r#"{"dependencies": ["react"]}"#).unwrap();
        assert!(manifest.direct.is_empty());

        let manifest = parse_str(r#"{"dependencies": {"react": 18, "vue": "^3.0.0"}}"#).unwrap();
        assert_eq!(manifest.direct.len(), 1);
        assert!(manifest.direct.contains("vue", "^3.0.0"));
    }

    #[test]
    fn test_parse_str_invalid_json() {
        let result = parse_str("{ invalid json }");

        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ParseError::JsonError(_)));
    }

    #[test]
    fn test_parse_str_not_an_object() {
        let result = parse_str("[1, 2, 3]");
        assert!(matches!(result.unwrap_err(), ParseError::InvalidPackage(_)));
    }

    #[test]
    fn test_load_without_manifest_is_unknown() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        assert!(load_direct_dependencies(None, &mut sink).is_none());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_load_unreadable_manifest_reports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        let mut sink: Vec<Diagnostic> = Vec::new();

        assert!(load_direct_dependencies(Some(&path), &mut sink).is_none());
        assert_eq!(sink.len(), 1);
        assert!(matches!(sink[0], Diagnostic::ManifestUnreadable { .. }));
    }

    #[test]
    fn test_load_manifest_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE_PACKAGE_JSON).unwrap();
        let mut sink: Vec<Diagnostic> = Vec::new();

        let direct = load_direct_dependencies(Some(file.path()), &mut sink).unwrap();
        assert_eq!(direct.len(), 3);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_parse_error_display() {
        let io_err = ParseError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        assert!(io_err.to_string().contains("Failed to read file"));

        let invalid_err = ParseError::InvalidPackage("not an object".to_string());
        assert!(invalid_err.to_string().contains("Invalid package.json"));
    }
}
