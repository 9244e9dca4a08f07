//! Parser module for lockscope.
//!
//! This module provides parsers for the files a JavaScript project uses to
//! pin its dependencies.
//!
//! # Supported Formats
//!
//! - **package.json** (npm/Node.js) - direct dependency declarations
//! - **yarn.lock** v1 (yarn classic) - Fully supported
//! - **yarn.lock** v2+ (yarn berry) - Fully supported
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use lockscope::diagnostics::TracingSink;
//! use lockscope::parser::{yarn, Transitivity};
//!
//! let deps = yarn::parse_yarn(Path::new("yarn.lock"), Some(Path::new("package.json")), &mut TracingSink)?;
//!
//! let direct: Vec<_> = deps.iter()
//!     .filter(|d| d.transitivity == Transitivity::Direct)
//!     .collect();
//!
//! println!("Found {} direct dependencies", direct.len());
//! ```

pub mod package_json;
pub mod types;
pub mod yarn;

// Re-export commonly used types for convenience
pub use package_json::{
    load_direct_dependencies, parse_file, parse_str, DirectDependencies, Manifest, ParseError,
    ParseResult,
};

pub use types::{
    AllowedHashes, DependencyBlock, Ecosystem, FoundDependency, SourceSpec, Transitivity,
};
