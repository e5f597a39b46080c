//! Block parser.
//!
//! A recursive-descent walk over the line cursor. Every call shares one
//! `Parser`; the only mutation points are `next_line`/`advance` (which move
//! the cursor forward) and the indent bump that steps into a list item.
//!
//! Dispatch looks at the byte in the marker column (`indent * 2`) of the
//! current line:
//! - `-` starts a list block
//! - `{` / `[` is a standalone inline object / array
//! - a run of ASCII letters and digits followed by `:` starts an object block
//! - anything else is a scalar

use crate::error::{ParseContext, ParseError, Result};
use crate::inline::{parse_inline_array, parse_inline_object};
use crate::options::ParseOptions;
use crate::scalar::{coerce_scalar, is_letter_or_digit, trim};
use crate::scanner::{Cursor, Line};
use crate::value::{Map, Value};
use tracing::{debug, trace};

/// How the value after a `name:` boundary is written.
enum Property {
    /// Nothing after the colon; the value is the block on the following lines.
    Nested,
    /// `name: {…}`, fragment starting at the given byte.
    InlineObject(usize),
    /// `name: […]`, fragment starting at the given byte.
    InlineArray(usize),
    /// `name: token`.
    Scalar,
}

pub(crate) struct Parser<'a> {
    cursor: Cursor<'a>,
    line: Line,
    indent: usize,
    done: bool,
    depth: usize,
    max_depth: usize,
    reject_trailing_content: bool,
    ctx: ParseContext,
}

/// Parse a whole document into a value.
pub(crate) fn parse_document(source: &str, options: &ParseOptions) -> Result<Value> {
    let mut parser = Parser::new(source, options);
    parser.parse()
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, options: &ParseOptions) -> Self {
        Self {
            cursor: Cursor::new(source),
            line: Line::default(),
            indent: 0,
            done: false,
            depth: 0,
            max_depth: options.max_depth,
            reject_trailing_content: options.reject_trailing_content,
            ctx: ParseContext::new(options.filename.as_deref()),
        }
    }

    fn parse(&mut self) -> Result<Value> {
        if self.cursor.at_end() {
            debug!("empty document");
            return Ok(Value::Null);
        }

        self.next_line();
        let value = self.parse_value()?;

        if !self.done {
            if self.reject_trailing_content {
                return Err(self.fail(ParseError::TrailingContent));
            }
            debug!(line = self.line.number, "ignoring lines after root value");
        }

        debug!(
            kind = value.kind(),
            lines = self.cursor.line_num(),
            "parsed document"
        );
        Ok(value)
    }

    // ------------------------------------------------------------------------
    // Cursor movement
    // ------------------------------------------------------------------------

    fn next_line(&mut self) {
        self.line = self.cursor.read_line();
        self.indent = self.line.indent;
    }

    /// Move to the next line, or mark the input as exhausted.
    fn advance(&mut self) {
        if self.cursor.at_end() {
            self.done = true;
        } else {
            self.next_line();
        }
    }

    /// Indent of the current line, or `None` once input is exhausted.
    fn current_indent(&self) -> Option<usize> {
        if self.done {
            None
        } else {
            Some(self.indent)
        }
    }

    fn fail(&self, kind: fn(usize, String) -> ParseError) -> ParseError {
        self.ctx.fail(kind, self.line.number)
    }

    // ------------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------------

    /// Parse the value whose marker column is `self.indent * 2` on the
    /// current line.
    fn parse_value(&mut self) -> Result<Value> {
        if self.depth >= self.max_depth {
            let limit = self.max_depth;
            let line = self.line.number;
            return Err(ParseError::NestingTooDeep(
                line,
                limit,
                self.ctx.loc_suffix(line),
            ));
        }

        self.depth += 1;
        let result = self.dispatch();
        self.depth -= 1;
        result
    }

    fn dispatch(&mut self) -> Result<Value> {
        let indent = self.indent;
        let col = indent * 2;
        let marker = match self.line.at(col) {
            Some(c) if !self.done => c,
            _ => return Err(self.fail(ParseError::UnexpectedEndOfLine)),
        };

        match marker {
            b'-' => self.parse_list(indent),
            b'{' => {
                let value =
                    parse_inline_object(self.line.rest(col), self.line.number, &self.ctx)?;
                self.advance();
                Ok(value)
            }
            b'[' => {
                let value =
                    parse_inline_array(self.line.rest(col), self.line.number, &self.ctx)?;
                self.advance();
                Ok(value)
            }
            _ if find_property_colon(&self.line.text, col).is_some() => self.parse_object(indent),
            _ => self.parse_scalar_line(col),
        }
    }

    // ------------------------------------------------------------------------
    // Blocks
    // ------------------------------------------------------------------------

    /// Consume `- item` lines at `indent`. Each item is parsed one level
    /// deeper, starting on the dash line itself.
    fn parse_list(&mut self, indent: usize) -> Result<Value> {
        trace!(indent, line = self.line.number, "list block");
        let mut items = Vec::new();

        loop {
            match self.line.at(indent * 2) {
                Some(b'-') => {}
                Some(_) => return Err(self.fail(ParseError::ExpectedListItem)),
                None => return Err(self.fail(ParseError::UnexpectedEndOfLine)),
            }

            self.indent = indent + 1;
            items.push(self.parse_value()?);

            if self.current_indent() != Some(indent) {
                break;
            }
        }

        Ok(Value::Array(items))
    }

    /// Consume `name: value` lines at `indent`. A repeated name replaces the
    /// earlier value and keeps its position.
    fn parse_object(&mut self, indent: usize) -> Result<Value> {
        trace!(indent, line = self.line.number, "object block");
        let mut obj = Map::new();
        let col = indent * 2;

        loop {
            if self.line.at(col).is_none() {
                return Err(self.fail(ParseError::UnexpectedEndOfLine));
            }
            let colon = find_property_colon(&self.line.text, col)
                .ok_or_else(|| self.fail(ParseError::ExpectedKey))?;
            let key = self.line.text[col..colon].to_string();

            let value = match classify_property(&self.line.text, colon) {
                Property::Nested => self.parse_nested(indent)?,
                Property::InlineObject(open) => {
                    let value =
                        parse_inline_object(self.line.rest(open), self.line.number, &self.ctx)?;
                    self.advance();
                    value
                }
                Property::InlineArray(open) => {
                    let value =
                        parse_inline_array(self.line.rest(open), self.line.number, &self.ctx)?;
                    self.advance();
                    value
                }
                Property::Scalar => {
                    let value = coerce_scalar(self.line.rest(colon + 1));
                    self.advance();
                    value
                }
            };

            obj.insert(key, value);

            if self.current_indent() != Some(indent) {
                break;
            }
        }

        Ok(Value::Object(obj))
    }

    /// Parse the block that follows a bare `name:` line. It must start on the
    /// next line and sit deeper than `parent_indent`.
    fn parse_nested(&mut self, parent_indent: usize) -> Result<Value> {
        if self.cursor.at_end() {
            return Err(self.fail(ParseError::UnexpectedEndOfLine));
        }
        self.next_line();
        if self.indent <= parent_indent {
            return Err(self.fail(ParseError::InconsistentIndentation));
        }
        self.parse_value()
    }

    fn parse_scalar_line(&mut self, col: usize) -> Result<Value> {
        let value = coerce_scalar(trim(self.line.rest(col)));
        self.advance();
        Ok(value)
    }
}

/// Byte offset of the colon ending a property name that starts at `col`.
///
/// The name is the (possibly empty) run of ASCII letters and digits at `col`;
/// it must be followed directly by `:`.
fn find_property_colon(text: &str, col: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = col;
    while i < bytes.len() && is_letter_or_digit(bytes[i]) {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b':' {
        Some(i)
    } else {
        None
    }
}

fn classify_property(text: &str, colon: usize) -> Property {
    let bytes = text.as_bytes();
    if colon + 1 == bytes.len() {
        return Property::Nested;
    }

    let after = bytes.get(colon + 2).copied();
    if text.ends_with('}') && after == Some(b'{') {
        if let Some(open) = text[colon..].find('{') {
            return Property::InlineObject(colon + open);
        }
    }
    if text.ends_with(']') && after == Some(b'[') {
        if let Some(open) = text[colon..].find('[') {
            return Property::InlineArray(colon + open);
        }
    }
    Property::Scalar
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Value> {
        parse_document(source, &ParseOptions::default())
    }

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    fn i(n: i64) -> Value {
        Value::from(n)
    }

    #[test]
    fn test_find_property_colon() {
        assert_eq!(find_property_colon("name: Bob", 0), Some(4));
        assert_eq!(find_property_colon("  age: 20", 2), Some(5));
        assert_eq!(find_property_colon("a b: c", 0), None);
        assert_eq!(find_property_colon("name", 0), None);
        assert_eq!(find_property_colon(": x", 0), Some(0));
        assert_eq!(find_property_colon("snake_case: 1", 0), None);
    }

    #[test]
    fn test_classify_property() {
        assert!(matches!(classify_property("a:", 1), Property::Nested));
        assert!(matches!(classify_property("a: {b: 1}", 1), Property::InlineObject(3)));
        assert!(matches!(classify_property("a: [1]", 1), Property::InlineArray(3)));
        assert!(matches!(classify_property("a:{b}", 1), Property::Scalar));
        assert!(matches!(classify_property("a:}", 1), Property::Scalar));
        assert!(matches!(classify_property("a: b", 1), Property::Scalar));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(parse("").unwrap(), Value::Null);
    }

    #[test]
    fn test_root_scalars() {
        assert_eq!(parse("hello world").unwrap(), s("hello world"));
        assert_eq!(parse("42").unwrap(), i(42));
        assert_eq!(parse("'quoted'").unwrap(), s("quoted"));
        assert_eq!(parse("  indented").unwrap(), s("indented"));
    }

    #[test]
    fn test_flat_object() {
        let v = parse("name: Bob\nage: 20").unwrap();
        assert_eq!(v, Value::from_iter([("name", s("Bob")), ("age", i(20))]));
    }

    #[test]
    fn test_flat_list() {
        let v = parse("- Bob\n- Alice\n- Eve\n").unwrap();
        assert_eq!(v, Value::Array(vec![s("Bob"), s("Alice"), s("Eve")]));
    }

    #[test]
    fn test_nested_blocks() {
        let v = parse("first:\n  - 1\n  - 2\n  - 3\nsecond:\n  name: Bob\n  age: 20\n").unwrap();
        assert_eq!(v["first"], Value::Array(vec![i(1), i(2), i(3)]));
        assert_eq!(
            v["second"],
            Value::from_iter([("name", s("Bob")), ("age", i(20))])
        );
    }

    #[test]
    fn test_list_of_objects() {
        let v = parse("- name: Bob\n  age: 20\n- name: Eve\n  age: 30").unwrap();
        assert_eq!(
            v,
            Value::Array(vec![
                Value::from_iter([("name", s("Bob")), ("age", i(20))]),
                Value::from_iter([("name", s("Eve")), ("age", i(30))]),
            ])
        );
    }

    #[test]
    fn test_list_of_lists() {
        let v = parse("- - 1\n  - 2\n- 3").unwrap();
        assert_eq!(
            v,
            Value::Array(vec![Value::Array(vec![i(1), i(2)]), i(3)])
        );
    }

    #[test]
    fn test_non_ascii_content() {
        assert_eq!(parse("-é").unwrap(), Value::Array(vec![s("é")]));
        assert_eq!(parse("- é").unwrap(), Value::Array(vec![s("é")]));
        assert_eq!(parse("name: café").unwrap()["name"], s("café"));
        assert_eq!(
            parse("letters: ['ü', \"ß\"]").unwrap()["letters"],
            Value::Array(vec![s("ü"), s("ß")])
        );
        assert_eq!(
            parse("items:\n  - a\n  -ñb").unwrap()["items"],
            Value::Array(vec![s("a"), s("ñb")])
        );
    }

    #[test]
    fn test_non_ascii_after_inline_delimiter() {
        assert_eq!(parse("[é, ñ]").unwrap(), Value::Array(vec![s("é"), s("ñ")]));
        assert_eq!(parse("{ü: ß}").unwrap(), Value::from_iter([("ü", s("ß"))]));
        assert_eq!(
            parse("tags: [ø]\nmeta: {é: 1}").unwrap(),
            Value::from_iter([
                ("tags", Value::Array(vec![s("ø")])),
                ("meta", Value::from_iter([("é", i(1))])),
            ])
        );
        assert_eq!(parse("- [日本]").unwrap(), Value::Array(vec![Value::Array(vec![s("日本")])]));
    }

    #[test]
    fn test_non_ascii_name_is_not_a_key() {
        assert_eq!(parse("café: 1").unwrap(), s("café: 1"));
    }

    #[test]
    fn test_inline_values_in_object() {
        let v = parse("friends: ['Alice', 'Eve']\nobject: {'name': 'Bob', 'age': 20}").unwrap();
        assert_eq!(v["friends"], Value::Array(vec![s("Alice"), s("Eve")]));
        assert_eq!(v["object"]["name"], s("Bob"));
        assert_eq!(v["object"]["age"], i(20));
    }

    #[test]
    fn test_standalone_inline_values() {
        assert_eq!(parse("[1, 2]").unwrap(), Value::Array(vec![i(1), i(2)]));
        assert_eq!(parse("{a: b}").unwrap(), Value::from_iter([("a", s("b"))]));
        assert_eq!(
            parse("- [1]\n- {}").unwrap(),
            Value::Array(vec![Value::Array(vec![i(1)]), Value::Object(Map::new())])
        );
    }

    #[test]
    fn test_scalar_property_forms() {
        let v = parse("a: \"x: y\"\nb: -5\nc: 3.14\nd:{x}\ne: true").unwrap();
        assert_eq!(v["a"], s("x: y"));
        assert_eq!(v["b"], s("-5"));
        assert_eq!(v["c"], s("3.14"));
        assert_eq!(v["d"], s("{x}"));
        assert_eq!(v["e"], s("true"));
    }

    #[test]
    fn test_key_order_and_duplicates() {
        let v = parse("b: 1\na: 2\nb: 3").unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.keys().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(obj["b"], i(3));
    }

    #[test]
    fn test_tabs_count_as_indent() {
        let v = parse("a:\n\t\tb: 1").unwrap();
        assert_eq!(v["a"]["b"], i(1));
    }

    #[test]
    fn test_crlf_input() {
        let v = parse("a: 1\r\nb: 2\r\n").unwrap();
        assert_eq!(v, Value::from_iter([("a", i(1)), ("b", i(2))]));
    }

    #[test]
    fn test_trailing_whitespace_ignored() {
        let v = parse("a:   \n  - x  \t\n").unwrap();
        assert_eq!(v["a"], Value::Array(vec![s("x")]));
    }

    #[test]
    fn test_block_ends_at_dedent() {
        let v = parse("a:\n  b:\n    c: 1\n  d: 2\ne: 3").unwrap();
        assert_eq!(v["a"]["b"]["c"], i(1));
        assert_eq!(v["a"]["d"], i(2));
        assert_eq!(v["e"], i(3));
    }

    #[test]
    fn test_lines_after_root_are_ignored() {
        let v = parse("a: 1\n    b: 2").unwrap();
        assert_eq!(v, Value::from_iter([("a", i(1))]));
    }

    #[test]
    fn test_trailing_content_rejected_when_strict() {
        let opts = ParseOptions::new().reject_trailing_content(true);
        let err = parse_document("a: 1\n    b: 2", &opts).unwrap_err();
        assert!(matches!(err, ParseError::TrailingContent(2, _)));
    }

    #[test]
    fn test_unexpected_end_of_line() {
        assert!(matches!(
            parse("a: 1\n\nb: 2").unwrap_err(),
            ParseError::UnexpectedEndOfLine(2, _)
        ));
        assert!(matches!(
            parse("- a\n-").unwrap_err(),
            ParseError::UnexpectedEndOfLine(2, _)
        ));
        assert!(matches!(
            parse("a:").unwrap_err(),
            ParseError::UnexpectedEndOfLine(1, _)
        ));
    }

    #[test]
    fn test_inconsistent_indentation() {
        assert!(matches!(
            parse("a:\nb: 1").unwrap_err(),
            ParseError::InconsistentIndentation(2, _)
        ));
        assert!(matches!(
            parse("- a:\n  - 1").unwrap_err(),
            ParseError::InconsistentIndentation(2, _)
        ));
    }

    #[test]
    fn test_expected_key() {
        assert!(matches!(
            parse("a: 1\nplain text").unwrap_err(),
            ParseError::ExpectedKey(2, _)
        ));
    }

    #[test]
    fn test_expected_list_item() {
        assert!(matches!(
            parse("- a\nb").unwrap_err(),
            ParseError::ExpectedListItem(2, _)
        ));
    }

    #[test]
    fn test_inline_errors_carry_line() {
        assert!(matches!(
            parse("a: 1\nb: {x: 'y}").unwrap_err(),
            ParseError::UnterminatedQuote(2, _)
        ));
        assert!(matches!(
            parse("{unterminated: 'oops\n").unwrap_err(),
            ParseError::UnterminatedQuote(1, _)
        ));
        assert!(matches!(
            parse("x: {a: 1, b}").unwrap_err(),
            ParseError::MalformedInlineField(1, _)
        ));
    }

    #[test]
    fn test_depth_limit() {
        let mut doc = String::new();
        for level in 0..10 {
            doc.push_str(&"  ".repeat(level));
            doc.push_str("k:\n");
        }
        doc.push_str(&"  ".repeat(10));
        doc.push_str("leaf");

        let opts = ParseOptions::new().max_depth(5);
        assert!(matches!(
            parse_document(&doc, &opts).unwrap_err(),
            ParseError::NestingTooDeep(_, 5, _)
        ));

        let v = parse(&doc).unwrap();
        let mut cur = &v;
        for _ in 0..10 {
            cur = &cur["k"];
        }
        assert_eq!(cur, &s("leaf"));
    }

    #[test]
    fn test_deep_list_depth_limit() {
        let doc = "- ".repeat(300) + "x";
        assert!(matches!(
            parse(&doc).unwrap_err(),
            ParseError::NestingTooDeep(1, 128, _)
        ));
    }
}
