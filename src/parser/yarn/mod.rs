//! yarn.lock parsing for both the classic (v1) and berry (v2+) formats.
//!
//! Neither format has a published grammar; the rules here follow what real
//! lockfiles look like. Both dialects share one recursive-descent grammar
//! ([`grammar`]) configured by a [`Dialect`].
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use lockscope::diagnostics::TracingSink;
//! use lockscope::parser::yarn::parse_yarn;
//!
//! let deps = parse_yarn(
//!     Path::new("yarn.lock"),
//!     Some(Path::new("package.json")),
//!     &mut TracingSink,
//! )?;
//! for dep in &deps {
//!     println!("{} (line {})", dep, dep.line_number);
//! }
//! ```

mod cursor;
mod dialect;
pub mod grammar;
mod integrity;
mod lockfile;

pub use cursor::{Cursor, GrammarError, GrammarResult, Mark};
pub use dialect::{Dialect, YARN1_BANNER, YARN2_BANNER};
pub use integrity::decode_integrity;
pub use lockfile::{
    assemble, classify, extract_dependencies, parse_yarn, parse_yarn_str, strip_fragment,
    LockfileError,
};
