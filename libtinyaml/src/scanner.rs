//! Line cursor.
//!
//! The cursor walks the source text one `\n`-terminated line at a time and
//! never steps back. Carriage-return/line-feed pairs are folded to `\n`
//! before the first line is read.

use crate::scalar::{is_space, trim_end};
use std::borrow::Cow;

/// A consumed line of source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    /// Line content without trailing spaces or tabs.
    pub text: String,
    /// Leading whitespace characters divided by two.
    pub indent: usize,
    /// One-based line number.
    pub number: usize,
}

impl Line {
    pub fn new(raw: &str, number: usize) -> Self {
        let text = trim_end(raw);
        Self {
            text: text.to_string(),
            indent: count_indent(text) / 2,
            number,
        }
    }

    /// Byte at `col`, or `None` past the end of the line.
    pub fn at(&self, col: usize) -> Option<u8> {
        self.text.as_bytes().get(col).copied()
    }

    /// Text from `col` to the end of the line.
    ///
    /// A column that lands inside a multibyte character is moved back to the
    /// start of that character, so `-é` stepped into at column 2 reads `é`.
    pub fn rest(&self, col: usize) -> &str {
        if col >= self.text.len() {
            return "";
        }
        let mut start = col;
        while !self.text.is_char_boundary(start) {
            start -= 1;
        }
        &self.text[start..]
    }
}

/// Forward-only reader over the lines of a document.
#[derive(Debug)]
pub struct Cursor<'a> {
    text: Cow<'a, str>,
    pos: usize,
    line_num: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut cursor = Self {
            text: Cow::Borrowed(""),
            pos: 0,
            line_num: 0,
        };
        cursor.reset(source);
        cursor
    }

    /// Position the cursor at the start of `source`.
    pub fn reset(&mut self, source: &'a str) {
        self.text = normalize(source);
        self.pos = 0;
        self.line_num = 0;
    }

    pub fn at_end(&self) -> bool {
        self.pos == self.text.len()
    }

    /// Read up to the next `\n` and move past it.
    ///
    /// At end of input this keeps returning an empty line.
    pub fn read_line(&mut self) -> Line {
        let rest = &self.text[self.pos..];
        let (raw, advance) = match rest.find('\n') {
            Some(n) => (&rest[..n], n + 1),
            None => (rest, rest.len()),
        };
        if advance > 0 {
            self.line_num += 1;
        }
        let line = Line::new(raw, self.line_num.max(1));
        self.pos += advance;
        line
    }

    /// Number of lines read so far.
    pub fn line_num(&self) -> usize {
        self.line_num
    }
}

/// Fold `\r\n` to `\n`, borrowing when there is nothing to fold.
fn normalize(source: &str) -> Cow<'_, str> {
    if source.contains("\r\n") {
        Cow::Owned(source.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(source)
    }
}

/// Count leading spaces and tabs.
fn count_indent(line: &str) -> usize {
    line.bytes().take_while(|&b| is_space(b)).count()
}
