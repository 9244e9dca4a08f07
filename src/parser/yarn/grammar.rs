//! Recursive-descent grammar shared by both yarn lockfile dialects.
//!
//! Every rule takes the cursor and the [`Dialect`] being parsed. Rules may
//! leave the cursor anywhere on failure; the alternation points
//! (`separated` and the quoted/unquoted v1 spec) reset it themselves.

use std::collections::HashMap;

use super::cursor::{Cursor, GrammarResult};
use super::dialect::Dialect;
use crate::parser::types::{DependencyBlock, SourceSpec};

/// Parses a whole lockfile as `dialect`.
///
/// All-or-nothing: any text outside the grammar fails the document.
pub fn parse_document(text: &str, dialect: Dialect) -> GrammarResult<Vec<DependencyBlock>> {
    let mut cursor = Cursor::new(text);
    document(&mut cursor, dialect)
}

/// Banner, optional metadata stanza, then blocks separated by blank lines.
pub fn document(cursor: &mut Cursor<'_>, dialect: Dialect) -> GrammarResult<Vec<DependencyBlock>> {
    if !cursor.eat(dialect.banner()) {
        return Err(cursor.error(format!("the {} banner", dialect)));
    }
    if let Some(pattern) = dialect.metadata_pattern() {
        cursor.eat_regex(pattern);
    }
    cursor.eat("\n");

    let blocks = separated(cursor, "\n\n", |c| dependency_block(c, dialect));

    cursor.eat("\n");
    if !cursor.at_end() {
        return Err(cursor.error("a dependency block or end of input"));
    }
    Ok(blocks)
}

/// One stanza: the source list header line followed by its field lines.
///
/// ```text
/// "@babel/generator@npm:^7.17.0, @babel/generator@npm:^7.7.2":
///   version: 7.17.0
///   dependencies:
///     jsesc: ^2.5.1
///   checksum: 2987dbeb...
/// ```
pub fn dependency_block(
    cursor: &mut Cursor<'_>,
    dialect: Dialect,
) -> GrammarResult<DependencyBlock> {
    let line_number = cursor.line();
    let sources = multi_source(cursor, dialect)?;
    cursor.expect(":\n")?;
    let fields = fields(cursor, dialect);

    Ok(DependencyBlock {
        line_number,
        sources,
        fields,
    })
}

/// The comma-separated list of specs that share one resolved entry.
///
/// v1 quotes each spec on its own (or not at all); v2 quotes the whole list.
pub fn multi_source(cursor: &mut Cursor<'_>, dialect: Dialect) -> GrammarResult<Vec<SourceSpec>> {
    match dialect {
        Dialect::V1 => Ok(separated(cursor, ", ", source_v1)),
        Dialect::V2 => {
            cursor.expect("\"")?;
            let sources = separated(cursor, ", ", |c| source_spec(c, Dialect::V2, true));
            cursor.expect("\"")?;
            Ok(sources)
        }
    }
}

fn source_v1(cursor: &mut Cursor<'_>) -> GrammarResult<SourceSpec> {
    let start = cursor.mark();
    if cursor.eat("\"") {
        if let Ok(spec) = source_spec(cursor, Dialect::V1, true) {
            if cursor.eat("\"") {
                return Ok(spec);
            }
        }
        cursor.reset(start);
    }
    source_spec(cursor, Dialect::V1, false)
}

/// A single `name@constraint` reference.
///
/// The name may start with `@scope/`; it runs to the next `@`, which is
/// consumed. The constraint runs to the dialect's terminator, which is not.
pub fn source_spec(
    cursor: &mut Cursor<'_>,
    dialect: Dialect,
    quoted: bool,
) -> GrammarResult<SourceSpec> {
    let scope = if cursor.eat("@") { "@" } else { "" };
    let name = format!("{}{}", scope, cursor.take_until(&['@'])?);
    cursor.expect("@")?;

    let raw = cursor.take_until(dialect.constraint_terminators(quoted))?;
    let constraint = if dialect.strips_npm_protocol() {
        raw.strip_prefix("npm:").unwrap_or(raw)
    } else {
        raw
    };

    Ok(SourceSpec::new(name, constraint))
}

/// The first-level fields of a block, one per line.
///
/// Later duplicate keys overwrite earlier ones.
pub fn fields(cursor: &mut Cursor<'_>, dialect: Dialect) -> HashMap<String, String> {
    separated(cursor, "\n", |c| key_value(c, dialect))
        .into_iter()
        .flatten()
        .collect()
}

/// One field line.
///
/// Produces `None` for lines that are not first-level data: any indentation
/// other than two spaces, and headers of nested sub-blocks such as
/// `dependencies:`. Fails on a line with nothing after its indentation,
/// which ends the block.
pub fn key_value(
    cursor: &mut Cursor<'_>,
    dialect: Dialect,
) -> GrammarResult<Option<(String, String)>> {
    let indent = cursor.eat_many(' ');
    if indent != 2 {
        let rest = cursor.rest_of_line();
        if rest.is_empty() {
            return Err(cursor.error("a field line"));
        }
        return Ok(None);
    }

    let key = cursor.take_until(dialect.key_terminators())?;
    match dialect {
        Dialect::V1 => {
            if cursor.peek() == Some(':') {
                cursor.rest_of_line();
                return Ok(None);
            }
        }
        Dialect::V2 => {
            cursor.expect(":")?;
            if matches!(cursor.peek(), Some('\n') | None) {
                return Ok(None);
            }
        }
    }
    cursor.expect(" ")?;
    let value = cursor.rest_of_line();

    Ok(Some((unquote(key).to_string(), unquote(value).to_string())))
}

/// Zero or more `item`s separated by `separator`.
///
/// Never fails: parsing stops before the first separator that is not
/// followed by a valid item.
fn separated<'a, T>(
    cursor: &mut Cursor<'a>,
    separator: &str,
    mut item: impl FnMut(&mut Cursor<'a>) -> GrammarResult<T>,
) -> Vec<T> {
    let mut items = Vec::new();

    let start = cursor.mark();
    match item(cursor) {
        Ok(first) => items.push(first),
        Err(_) => {
            cursor.reset(start);
            return items;
        }
    }

    loop {
        let before = cursor.mark();
        if !cursor.eat(separator) {
            break;
        }
        match item(cursor) {
            Ok(next) => items.push(next),
            Err(_) => {
                cursor.reset(before);
                break;
            }
        }
    }

    items
}

/// Strips one layer of surrounding double quotes.
fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(s)
}
