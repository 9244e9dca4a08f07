//! Shared types for lockfile parsing.
//!
//! This module defines the intermediate structures produced by the lockfile
//! grammars and the normalized dependency records handed to reporting.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Package ecosystem a dependency belongs to.
///
/// Yarn lockfiles only ever describe npm-family packages, so this is a
/// single-variant tag kept for the benefit of downstream matchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    /// npm registry packages (also consumed by yarn and pnpm).
    #[default]
    Npm,
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ecosystem::Npm => write!(f, "npm"),
        }
    }
}

/// Whether a dependency is declared by the project manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transitivity {
    /// One of the block's constraints is declared in the manifest.
    Direct,

    /// The manifest was checked and declares none of the block's constraints.
    Transitive,

    /// No manifest was available, so the relationship is not known.
    Unknown,
}

impl Transitivity {
    /// Returns a short label for the transitivity.
    pub fn label(&self) -> &'static str {
        match self {
            Transitivity::Direct => "direct",
            Transitivity::Transitive => "transitive",
            Transitivity::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Transitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One `name@constraint` reference from a lockfile block header.
///
/// Several specs may share a block when a single resolved install
/// satisfies all of their constraints.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceSpec {
    /// The package name, including any `@scope/` prefix.
    pub name: String,

    /// The version constraint as written (e.g. "^1.0.0", "file:../lib").
    pub constraint: String,
}

impl SourceSpec {
    /// Creates a new SourceSpec instance.
    pub fn new(name: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: constraint.into(),
        }
    }
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.constraint)
    }
}

/// One parsed lockfile stanza: a header of source specs plus the flat
/// key/value fields found at the first indentation level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyBlock {
    /// 1-based line number of the block's header line.
    pub line_number: usize,

    /// Source specs in header order.
    pub sources: Vec<SourceSpec>,

    /// First-level fields; nested sub-blocks are never included.
    pub fields: HashMap<String, String>,
}

impl DependencyBlock {
    /// Returns the first source spec, which names the block.
    pub fn first_source(&self) -> Option<&SourceSpec> {
        self.sources.first()
    }

    /// Looks up a first-level field.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

/// Hash algorithm name mapped to the hex digests allowed for it.
pub type AllowedHashes = BTreeMap<String, Vec<String>>;

/// A dependency extracted from a lockfile.
///
/// This is the normalized record consumed by the exporters and by any
/// downstream vulnerability or SBOM tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoundDependency {
    /// The package name taken from the block's first source spec.
    pub package: String,

    /// The resolved version, unvalidated.
    pub version: String,

    /// The ecosystem tag, always npm for yarn lockfiles.
    pub ecosystem: Ecosystem,

    /// Integrity digests the installed artifact must match.
    pub allowed_hashes: AllowedHashes,

    /// Download URL with any trailing `#fragment` removed.
    pub resolved_url: Option<String>,

    /// Direct, transitive, or unknown.
    pub transitivity: Transitivity,

    /// 1-based line number of the block header.
    pub line_number: usize,
}

impl FoundDependency {
    /// Returns true if the manifest declares this dependency directly.
    pub fn is_direct(&self) -> bool {
        self.transitivity == Transitivity::Direct
    }
}

impl fmt::Display for FoundDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} ({})",
            self.package, self.version, self.transitivity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dependency(transitivity: Transitivity) -> FoundDependency {
        FoundDependency {
            package: "lodash".to_string(),
            version: "4.17.21".to_string(),
            ecosystem: Ecosystem::Npm,
            allowed_hashes: AllowedHashes::new(),
            resolved_url: None,
            transitivity,
            line_number: 5,
        }
    }

    #[test]
    fn test_transitivity_label() {
        assert_eq!(Transitivity::Direct.label(), "direct");
        assert_eq!(Transitivity::Transitive.label(), "transitive");
        assert_eq!(Transitivity::Unknown.label(), "unknown");
    }

    #[test]
    fn test_source_spec_display() {
        let spec = SourceSpec::new("@babel/core", "^7.0.0");
        assert_eq!(format!("{}", spec), "@babel/core@^7.0.0");
    }

    #[test]
    fn test_dependency_block_accessors() {
        let mut fields = HashMap::new();
        fields.insert("version".to_string(), "1.0.0".to_string());
        let block = DependencyBlock {
            line_number: 4,
            sources: vec![SourceSpec::new("a", "^1.0.0"), SourceSpec::new("a", "^1.1.0")],
            fields,
        };

        assert_eq!(block.first_source().unwrap().constraint, "^1.0.0");
        assert_eq!(block.field("version"), Some("1.0.0"));
        assert_eq!(block.field("resolved"), None);
    }

    #[test]
    fn test_found_dependency_display() {
        let dep = sample_dependency(Transitivity::Transitive);
        assert_eq!(format!("{}", dep), "lodash@4.17.21 (transitive)");
        assert!(!dep.is_direct());
        assert!(sample_dependency(Transitivity::Direct).is_direct());
    }

    #[test]
    fn test_found_dependency_serializes_tags_lowercase() {
        let value = serde_json::to_value(sample_dependency(Transitivity::Unknown)).unwrap();
        assert_eq!(value["ecosystem"], "npm");
        assert_eq!(value["transitivity"], "unknown");
        assert_eq!(value["line_number"], 5);
        assert!(value["resolved_url"].is_null());
    }
}
