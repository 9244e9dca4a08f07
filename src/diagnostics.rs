//! Diagnostics reported while extracting dependencies.
//!
//! Parse entry points never log through global state on their own; they
//! hand a [`Diagnostic`] to the [`DiagnosticSink`] supplied by the caller.
//! The CLI uses [`TracingSink`], tests collect into a `Vec<Diagnostic>`.

use std::fmt;
use std::path::PathBuf;

use crate::parser::yarn::{Dialect, GrammarError};

/// A non-fatal problem encountered while reading a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A lockfile did not match its dialect's grammar; no records were extracted.
    LockfileUnparseable {
        /// The lockfile path, when parsing from disk.
        path: Option<PathBuf>,
        /// The dialect the lockfile was parsed as.
        dialect: Dialect,
        /// Where the grammar stopped matching.
        error: GrammarError,
    },

    /// A manifest could not be read or parsed; transitivity is unknown.
    ManifestUnreadable {
        /// The manifest path.
        path: PathBuf,
        /// Human readable cause.
        reason: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::LockfileUnparseable {
                path,
                dialect,
                error,
            } => {
                let shown = path
                    .as_ref()
                    .map_or_else(|| "<input>".to_string(), |p| p.display().to_string());
                write!(f, "failed to parse {} as {}: {}", shown, dialect, error)
            }
            Diagnostic::ManifestUnreadable { path, reason } => {
                write!(f, "failed to read manifest {}: {}", path.display(), reason)
            }
        }
    }
}

/// Receiver for diagnostics produced during a parse.
pub trait DiagnosticSink {
    /// Record one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Forwards diagnostics to `tracing` at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{}", diagnostic);
    }
}
