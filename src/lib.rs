//! lockscope - yarn lockfile dependency extractor
//!
//! This crate reads yarn.lock files (classic v1 and berry v2+), extracts
//! every resolved package with its version, integrity hashes, download URL
//! and source line, and classifies each one as a direct or transitive
//! dependency of the project's package.json.

pub mod diagnostics;
pub mod export;
pub mod parser;
pub mod scan;
