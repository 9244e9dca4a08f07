//! Text cursor used by the lockfile grammars.
//!
//! A cursor is a byte offset into the input plus a 1-based line counter kept
//! in step with it. Grammar rules backtrack by taking a [`Mark`] before an
//! alternative and resetting to it when the alternative fails.

use regex::Regex;

/// Where and why a grammar rule stopped matching.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}, column {column}: expected {expected}")]
pub struct GrammarError {
    /// 1-based line of the failure.
    pub line: usize,
    /// 1-based column (in bytes) of the failure.
    pub column: usize,
    /// Description of what the rule was looking for.
    pub expected: String,
}

impl GrammarError {
    /// Creates a new GrammarError instance.
    pub fn new(line: usize, column: usize, expected: impl Into<String>) -> Self {
        Self {
            line,
            column,
            expected: expected.into(),
        }
    }
}

/// Result type alias for grammar rules.
pub type GrammarResult<T> = Result<T, GrammarError>;

/// A saved cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pos: usize,
    line: usize,
    line_start: usize,
}

/// Position-tracking view over lockfile text.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    line_start: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of `input`, on line 1.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            line_start: 0,
        }
    }

    /// The current 1-based line.
    pub fn line(&self) -> usize {
        self.line
    }

    /// The unconsumed input.
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            line: self.line,
            line_start: self.line_start,
        }
    }

    pub fn reset(&mut self, mark: Mark) {
        self.pos = mark.pos;
        self.line = mark.line;
        self.line_start = mark.line_start;
    }

    /// Builds an error at the current position.
    pub fn error(&self, expected: impl Into<String>) -> GrammarError {
        GrammarError::new(self.line, self.pos - self.line_start + 1, expected)
    }

    /// Consumes `len` bytes, keeping the line counter in step.
    fn advance(&mut self, len: usize) -> &'a str {
        let taken = &self.input[self.pos..self.pos + len];
        for (offset, byte) in taken.bytes().enumerate() {
            if byte == b'\n' {
                self.line += 1;
                self.line_start = self.pos + offset + 1;
            }
        }
        self.pos += len;
        taken
    }

    /// Consumes `literal` if the input continues with it.
    pub fn eat(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal) {
            self.advance(literal.len());
            true
        } else {
            false
        }
    }

    /// Consumes `literal` or fails without moving.
    pub fn expect(&mut self, literal: &str) -> GrammarResult<()> {
        if self.eat(literal) {
            Ok(())
        } else {
            Err(self.error(format!("{:?}", literal)))
        }
    }

    /// Consumes a run of `c`, returning how many were eaten.
    pub fn eat_many(&mut self, c: char) -> usize {
        let count = self.rest().chars().take_while(|&x| x == c).count();
        self.advance(count * c.len_utf8());
        count
    }

    /// Consumes text up to, but not including, the first terminator.
    ///
    /// Fails without moving if the end of the line or of the input comes
    /// first, unless `'\n'` is itself one of the terminators.
    pub fn take_until(&mut self, terminators: &[char]) -> GrammarResult<&'a str> {
        let rest = self.rest();
        match rest.find(|c: char| terminators.contains(&c) || c == '\n') {
            Some(idx) if terminators.contains(&rest[idx..].chars().next().unwrap_or('\n')) => {
                Ok(self.advance(idx))
            }
            _ => Err(self.error(format!("one of {:?}", terminators))),
        }
    }

    /// Consumes everything up to the next newline (or the end of input).
    pub fn rest_of_line(&mut self) -> &'a str {
        let len = self.rest().find('\n').unwrap_or(self.rest().len());
        self.advance(len)
    }

    /// Consumes the match of `pattern` if it matches right at the cursor.
    pub fn eat_regex(&mut self, pattern: &Regex) -> bool {
        match pattern.find(self.rest()) {
            Some(m) if m.start() == 0 => {
                self.advance(m.end());
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eat_tracks_lines() {
        let mut cursor = Cursor::new("a\nb\nc");
        assert!(cursor.eat("a\n"));
        assert_eq!(cursor.line(), 2);
        assert!(cursor.eat("b\n"));
        assert_eq!(cursor.line(), 3);
        assert!(!cursor.eat("x"));
        assert!(cursor.eat("c"));
        assert!(cursor.at_end());
    }

    #[test]
    fn test_mark_and_reset() {
        let mut cursor = Cursor::new("one\ntwo\n");
        let start = cursor.mark();
        cursor.rest_of_line();
        cursor.expect("\n").unwrap();
        assert_eq!(cursor.line(), 2);

        cursor.reset(start);
        assert_eq!(cursor.line(), 1);
        assert_eq!(cursor.rest(), "one\ntwo\n");
    }

    #[test]
    fn test_take_until_stops_before_terminator() {
        let mut cursor = Cursor::new("left-pad@^1.0.0:\n");
        assert_eq!(cursor.take_until(&['@']).unwrap(), "left-pad");
        assert_eq!(cursor.peek(), Some('@'));
    }

    #[test]
    fn test_take_until_does_not_cross_lines() {
        let mut cursor = Cursor::new("no terminator here\n@");
        let err = cursor.take_until(&['@']).unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(cursor.rest(), "no terminator here\n@");
    }

    #[test]
    fn test_take_until_newline_terminator() {
        let mut cursor = Cursor::new("value\nnext");
        assert_eq!(cursor.take_until(&['\n']).unwrap(), "value");
    }

    #[test]
    fn test_take_until_fails_at_end_of_input() {
        let mut cursor = Cursor::new("abc");
        assert!(cursor.take_until(&[':']).is_err());
    }

    #[test]
    fn test_eat_many_counts() {
        let mut cursor = Cursor::new("    x");
        assert_eq!(cursor.eat_many(' '), 4);
        assert_eq!(cursor.peek(), Some('x'));
        assert_eq!(cursor.eat_many(' '), 0);
    }

    #[test]
    fn test_eat_regex_is_anchored() {
        let pattern = Regex::new(r"\d+").unwrap();
        let mut cursor = Cursor::new("abc123");
        assert!(!cursor.eat_regex(&pattern));

        let mut cursor = Cursor::new("123abc");
        assert!(cursor.eat_regex(&pattern));
        assert_eq!(cursor.rest(), "abc");
    }

    #[test]
    fn test_error_reports_column() {
        let mut cursor = Cursor::new("ab\ncd");
        cursor.eat("ab\nc");
        let err = cursor.error("\"x\"");
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 2);
        assert_eq!(err.to_string(), "line 2, column 2: expected \"x\"");
    }
}
