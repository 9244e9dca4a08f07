//! The two yarn lockfile dialects and the details that set them apart.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Banner that opens every yarn classic (v1) lockfile.
pub const YARN1_BANNER: &str = "# THIS IS AN AUTOGENERATED FILE. DO NOT EDIT THIS FILE DIRECTLY.\n# yarn lockfile v1\n\n";

/// Banner that opens every yarn berry (v2 and later) lockfile.
pub const YARN2_BANNER: &str = "# This file is generated by running \"yarn install\" inside your project.\n# Manual changes might be lost - proceed with caution!\n";

const YARN2_METADATA: &str = r"^\n__metadata:\n  version: \d+\n  cacheKey: \d+\n";

/// A yarn lockfile text format.
///
/// Both dialects share one grammar; each variant only answers the handful
/// of questions where their syntax differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// yarn classic: unquoted or individually quoted specs, `key value` fields.
    V1,
    /// yarn berry: one quoted spec list per header, `key: value` fields.
    V2,
}

impl Dialect {
    /// Picks the dialect from the opening bytes of a lockfile.
    ///
    /// Anything that does not start with the v1 banner is treated as v2.
    ///
    /// ```
    /// use lockscope::parser::yarn::{Dialect, YARN1_BANNER};
    ///
    /// assert_eq!(Dialect::detect(YARN1_BANNER), Dialect::V1);
    /// assert_eq!(Dialect::detect("# yarn lockfile v1\n"), Dialect::V2);
    /// ```
    pub fn detect(text: &str) -> Self {
        if text.starts_with(YARN1_BANNER) {
            Dialect::V1
        } else {
            Dialect::V2
        }
    }

    /// The literal every document of this dialect starts with.
    pub fn banner(&self) -> &'static str {
        match self {
            Dialect::V1 => YARN1_BANNER,
            Dialect::V2 => YARN2_BANNER,
        }
    }

    /// Pattern for the metadata stanza allowed right after the banner.
    pub fn metadata_pattern(&self) -> Option<&'static Regex> {
        static METADATA: OnceLock<Regex> = OnceLock::new();
        match self {
            Dialect::V1 => None,
            Dialect::V2 => Some(METADATA.get_or_init(|| {
                Regex::new(YARN2_METADATA).expect("metadata pattern is a valid regex")
            })),
        }
    }

    /// Characters that end a source spec's constraint.
    ///
    /// Unquoted v1 specs cannot contain `:` or `,`, so those end the
    /// constraint as well; quoted specs only end at the closing quote.
    pub fn constraint_terminators(&self, quoted: bool) -> &'static [char] {
        match (self, quoted) {
            (Dialect::V1, true) => &['"'],
            (Dialect::V1, false) => &['"', ':', ','],
            (Dialect::V2, _) => &['"', ','],
        }
    }

    /// Whether a leading `npm:` protocol tag is dropped from constraints.
    ///
    /// package.json writes `^1.0.0` where berry writes `npm:^1.0.0`.
    pub fn strips_npm_protocol(&self) -> bool {
        matches!(self, Dialect::V2)
    }

    /// Characters that end a field key.
    pub fn key_terminators(&self) -> &'static [char] {
        match self {
            Dialect::V1 => &[' ', ':'],
            Dialect::V2 => &[':'],
        }
    }

    /// Short name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::V1 => "yarn1",
            Dialect::V2 => "yarn2",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
