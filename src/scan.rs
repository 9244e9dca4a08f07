//! Project discovery for repositories containing several yarn projects.
//!
//! Every lockfile is analyzed on its own, paired with the package.json that
//! sits next to it. Nothing is shared between lockfiles.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::diagnostics::DiagnosticSink;
use crate::parser::types::FoundDependency;
use crate::parser::yarn::{extract_dependencies, LockfileError};
use crate::parser::load_direct_dependencies;

/// File name of a yarn lockfile.
pub const LOCKFILE_NAME: &str = "yarn.lock";

/// File name of an npm manifest.
pub const MANIFEST_NAME: &str = "package.json";

/// The dependencies extracted from one lockfile.
#[derive(Debug, Clone)]
pub struct LockfileReport {
    /// Path of the lockfile.
    pub lockfile: PathBuf,
    /// Manifest used for classification, if any.
    pub manifest: Option<PathBuf>,
    /// Extracted records in lockfile order.
    pub dependencies: Vec<FoundDependency>,
}

/// Returns the package.json next to `lockfile`, if one exists.
pub fn sibling_manifest(lockfile: &Path) -> Option<PathBuf> {
    let candidate = lockfile.parent()?.join(MANIFEST_NAME);
    candidate.is_file().then_some(candidate)
}

/// Converts CRLF line endings to LF.
///
/// The lockfile grammars only understand `\n`, so callers reading files
/// from disk normalize before parsing.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains("\r\n") {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Reads, normalizes and parses one lockfile.
pub fn analyze_lockfile(
    lockfile: &Path,
    manifest: Option<&Path>,
    sink: &mut dyn DiagnosticSink,
) -> Result<LockfileReport, LockfileError> {
    let raw = fs::read_to_string(lockfile).map_err(|source| LockfileError::Io {
        path: lockfile.to_path_buf(),
        source,
    })?;
    let text = normalize_line_endings(&raw);
    let direct = load_direct_dependencies(manifest, sink);

    let dependencies = extract_dependencies(&text, Some(lockfile), direct.as_ref(), sink);
    tracing::debug!(
        "{}: {} dependencies",
        lockfile.display(),
        dependencies.len()
    );

    Ok(LockfileReport {
        lockfile: lockfile.to_path_buf(),
        manifest: manifest.map(Path::to_path_buf),
        dependencies,
    })
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name == "node_modules" || name.starts_with('.')
}

/// Finds every yarn.lock under `root`, in sorted path order.
///
/// `node_modules` and hidden directories are not descended into.
pub fn find_lockfiles(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|e| e.file_type().is_file() && e.file_name() == LOCKFILE_NAME)
        .map(DirEntry::into_path)
        .collect()
}

/// Analyzes every lockfile under `root` with its sibling manifest.
///
/// An unparseable lockfile contributes an empty report; an unreadable one
/// stops the scan.
pub fn scan_directory(
    root: &Path,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<LockfileReport>, LockfileError> {
    find_lockfiles(root)
        .iter()
        .map(|lockfile| {
            let manifest = sibling_manifest(lockfile);
            analyze_lockfile(lockfile, manifest.as_deref(), sink)
        })
        .collect()
}
