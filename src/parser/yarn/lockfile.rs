//! Turning a yarn.lock into [`FoundDependency`] records.
//!
//! The dialect is picked from the file's banner, the matching grammar runs
//! once over the whole text, and each surviving block is normalized into a
//! record. A document that does not parse yields no records at all.

use std::fs;
use std::path::{Path, PathBuf};

use super::dialect::Dialect;
use super::grammar::parse_document;
use super::integrity::decode_integrity;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::parser::package_json::{load_direct_dependencies, DirectDependencies};
use crate::parser::types::{
    AllowedHashes, DependencyBlock, Ecosystem, FoundDependency, SourceSpec, Transitivity,
};

/// Errors that abort extraction for a lockfile.
///
/// Grammar failures are not errors; they are reported to the diagnostics
/// sink and produce an empty record list.
#[derive(Debug, thiserror::Error)]
pub enum LockfileError {
    /// The lockfile itself could not be read.
    #[error("Failed to read lockfile {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Parses a yarn.lock from disk, classifying entries against an optional
/// package.json.
///
/// Only a failure to read the lockfile is returned as an error. An
/// unreadable manifest makes every record [`Transitivity::Unknown`].
pub fn parse_yarn(
    lockfile_path: &Path,
    manifest_path: Option<&Path>,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<FoundDependency>, LockfileError> {
    let text = fs::read_to_string(lockfile_path).map_err(|source| LockfileError::Io {
        path: lockfile_path.to_path_buf(),
        source,
    })?;
    let direct = load_direct_dependencies(manifest_path, sink);

    Ok(extract_dependencies(
        &text,
        Some(lockfile_path),
        direct.as_ref(),
        sink,
    ))
}

/// Parses yarn.lock text that is already in memory.
///
/// # Example
///
/// ```
/// use lockscope::diagnostics::Diagnostic;
/// use lockscope::parser::yarn::{parse_yarn_str, YARN1_BANNER};
/// use lockscope::parser::Transitivity;
///
/// let text = format!("{}left-pad@^1.3.0:\n  version \"1.3.0\"\n", YARN1_BANNER);
/// let mut diagnostics: Vec<Diagnostic> = Vec::new();
/// let deps = parse_yarn_str(&text, None, &mut diagnostics);
///
/// assert_eq!(deps.len(), 1);
/// assert_eq!(deps[0].package, "left-pad");
/// assert_eq!(deps[0].transitivity, Transitivity::Unknown);
/// ```
pub fn parse_yarn_str(
    text: &str,
    direct: Option<&DirectDependencies>,
    sink: &mut dyn DiagnosticSink,
) -> Vec<FoundDependency> {
    extract_dependencies(text, None, direct, sink)
}

/// Runs the grammar over `text` and assembles records in document order.
///
/// `source` only labels diagnostics.
pub fn extract_dependencies(
    text: &str,
    source: Option<&Path>,
    direct: Option<&DirectDependencies>,
    sink: &mut dyn DiagnosticSink,
) -> Vec<FoundDependency> {
    let dialect = Dialect::detect(text);
    tracing::debug!("Parsing {} lockfile ({} bytes)", dialect, text.len());

    let blocks = match parse_document(text, dialect) {
        Ok(blocks) => blocks,
        Err(error) => {
            sink.report(Diagnostic::LockfileUnparseable {
                path: source.map(Path::to_path_buf),
                dialect,
                error,
            });
            return Vec::new();
        }
    };

    let deps: Vec<FoundDependency> = blocks
        .iter()
        .filter_map(|block| assemble(block, dialect, direct))
        .collect();
    tracing::debug!("Extracted {} of {} blocks", deps.len(), blocks.len());
    deps
}

/// Normalizes one parsed block into a record.
///
/// Returns `None` for blocks with no sources or no `version` field.
pub fn assemble(
    block: &DependencyBlock,
    dialect: Dialect,
    direct: Option<&DirectDependencies>,
) -> Option<FoundDependency> {
    let first = block.first_source()?;
    let version = block.field("version")?;

    let allowed_hashes = match dialect {
        Dialect::V1 => block
            .field("integrity")
            .map(decode_integrity)
            .unwrap_or_default(),
        Dialect::V2 => block
            .field("checksum")
            .filter(|checksum| !checksum.is_empty())
            .map(|checksum| {
                AllowedHashes::from([("sha512".to_string(), vec![checksum.to_string()])])
            })
            .unwrap_or_default(),
    };

    Some(FoundDependency {
        package: first.name.clone(),
        version: version.to_string(),
        ecosystem: Ecosystem::Npm,
        allowed_hashes,
        resolved_url: block
            .field("resolved")
            .map(|url| strip_fragment(url).to_string()),
        transitivity: classify(&block.sources, direct),
        line_number: block.line_number,
    })
}

/// Drops the last `#fragment` (usually a commit ref) from a URL.
///
/// ```
/// use lockscope::parser::yarn::strip_fragment;
///
/// assert_eq!(strip_fragment("https://host/pkg.tgz#abcdef"), "https://host/pkg.tgz");
/// assert_eq!(strip_fragment("a#b#c"), "a#b");
/// assert_eq!(strip_fragment("plain"), "plain");
/// ```
pub fn strip_fragment(url: &str) -> &str {
    url.rsplit_once('#').map_or(url, |(before, _)| before)
}

/// Decides whether a block is declared by the manifest.
///
/// Matching is on the exact `(name, constraint)` pair of any of the
/// block's specs, so two ranges of one package can classify differently.
pub fn classify(sources: &[SourceSpec], direct: Option<&DirectDependencies>) -> Transitivity {
    match direct {
        None => Transitivity::Unknown,
        Some(direct) => {
            if sources
                .iter()
                .any(|spec| direct.contains(&spec.name, &spec.constraint))
            {
                Transitivity::Direct
            } else {
                Transitivity::Transitive
            }
        }
    }
}
