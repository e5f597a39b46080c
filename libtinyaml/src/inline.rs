//! Inline fragments: single-line `{…}` objects and `[…]` arrays.
//!
//! Fields are split on commas outside quotes. Nested brackets are not
//! recognised; they stay part of the field text.

use crate::error::{ParseContext, ParseError, Result};
use crate::scalar::{coerce_scalar, strip_quotes, trim};
use crate::value::{Map, Value};

/// Tracks whether a scan position sits inside a quoted run.
#[derive(Default)]
struct QuoteState {
    open: Option<u8>,
}

impl QuoteState {
    fn feed(&mut self, c: u8) {
        match self.open {
            Some(q) if q == c => self.open = None,
            Some(_) => {}
            None if c == b'"' || c == b'\'' => self.open = Some(c),
            None => {}
        }
    }

    fn inside(&self) -> bool {
        self.open.is_some()
    }
}

fn quotes_balanced(s: &str) -> bool {
    let mut state = QuoteState::default();
    for c in s.bytes() {
        state.feed(c);
    }
    !state.inside()
}

/// Split on commas that are not inside quotes.
fn split_top_level(body: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut state = QuoteState::default();
    let mut start = 0;
    for (i, c) in body.bytes().enumerate() {
        state.feed(c);
        if c == b',' && !state.inside() {
            fields.push(&body[start..i]);
            start = i + 1;
        }
    }
    fields.push(&body[start..]);
    fields
}

/// First colon outside quotes.
fn find_colon_outside_quotes(s: &str) -> Option<usize> {
    let mut state = QuoteState::default();
    for (i, c) in s.bytes().enumerate() {
        state.feed(c);
        if c == b':' && !state.inside() {
            return Some(i);
        }
    }
    None
}

/// Check quotes and the closing delimiter, then return the text between
/// the delimiters.
fn fragment_body<'a>(
    fragment: &'a str,
    close: char,
    unmatched: fn(usize, String) -> ParseError,
    line: usize,
    ctx: &ParseContext,
) -> Result<&'a str> {
    let fragment = trim(fragment);
    if !quotes_balanced(fragment) {
        return Err(ctx.fail(ParseError::UnterminatedQuote, line));
    }
    if fragment.len() < 2 || !fragment.ends_with(close) {
        return Err(ctx.fail(unmatched, line));
    }
    Ok(&fragment[1..fragment.len() - 1])
}

/// Parse `{name: value, …}`. Names are quote-stripped strings; values go
/// through scalar coercion.
pub(crate) fn parse_inline_object(fragment: &str, line: usize, ctx: &ParseContext) -> Result<Value> {
    let body = fragment_body(fragment, '}', ParseError::UnmatchedBrace, line, ctx)?;
    let mut obj = Map::new();
    if trim(body).is_empty() {
        return Ok(Value::Object(obj));
    }

    for field in split_top_level(body) {
        let field = trim(field);
        let colon = find_colon_outside_quotes(field)
            .ok_or_else(|| ctx.fail(ParseError::MalformedInlineField, line))?;
        let name = trim(&field[..colon]);
        let name = strip_quotes(name).unwrap_or(name);
        obj.insert(name.to_string(), coerce_scalar(&field[colon + 1..]));
    }

    Ok(Value::Object(obj))
}

/// Parse `[item, …]`, coercing each item.
pub(crate) fn parse_inline_array(fragment: &str, line: usize, ctx: &ParseContext) -> Result<Value> {
    let body = fragment_body(fragment, ']', ParseError::UnmatchedBracket, line, ctx)?;
    if trim(body).is_empty() {
        return Ok(Value::Array(Vec::new()));
    }

    Ok(Value::Array(
        split_top_level(body).into_iter().map(coerce_scalar).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ParseContext {
        ParseContext::new(None)
    }

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    #[test]
    fn test_split_respects_quotes() {
        assert_eq!(split_top_level("a, 'b, c', d"), ["a", " 'b, c'", " d"]);
        assert_eq!(split_top_level(r#""x,y",z"#), [r#""x,y""#, "z"]);
        assert_eq!(split_top_level(r#"'it"s', b"#), [r#"'it"s'"#, " b"]);
        assert_eq!(split_top_level("solo"), ["solo"]);
    }

    #[test]
    fn test_inline_array() {
        let v = parse_inline_array("['Alice', 'Eve']", 1, &ctx()).unwrap();
        assert_eq!(v, Value::Array(vec![s("Alice"), s("Eve")]));
    }

    #[test]
    fn test_inline_array_coerces_integers() {
        let v = parse_inline_array("[1, \"2\", x3]", 1, &ctx()).unwrap();
        assert_eq!(v, Value::Array(vec![Value::from(1i64), s("2"), s("x3")]));
    }

    #[test]
    fn test_inline_array_keeps_nested_brackets_as_text() {
        let v = parse_inline_array("[1, [2, 3]]", 1, &ctx()).unwrap();
        assert_eq!(v, Value::Array(vec![Value::from(1i64), s("[2"), s("3]")]));
    }

    #[test]
    fn test_empty_fragments() {
        assert_eq!(parse_inline_array("[]", 1, &ctx()).unwrap(), Value::Array(vec![]));
        assert_eq!(parse_inline_array("[  ]", 1, &ctx()).unwrap(), Value::Array(vec![]));
        assert_eq!(parse_inline_object("{}", 1, &ctx()).unwrap(), Value::Object(Map::new()));
    }

    #[test]
    fn test_empty_array_field_is_empty_string() {
        let v = parse_inline_array("[a, , b,]", 1, &ctx()).unwrap();
        assert_eq!(v, Value::Array(vec![s("a"), s(""), s("b"), s("")]));
    }

    #[test]
    fn test_inline_object() {
        let v = parse_inline_object("{'name': 'Bob', 'age': 20}", 1, &ctx()).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.keys().collect::<Vec<_>>(), ["name", "age"]);
        assert_eq!(obj["name"], s("Bob"));
        assert_eq!(obj["age"], Value::from(20i64));
    }

    #[test]
    fn test_inline_object_without_space_after_colon() {
        let v = parse_inline_object("{a:1,b:two}", 1, &ctx()).unwrap();
        assert_eq!(v["a"], Value::from(1i64));
        assert_eq!(v["b"], s("two"));
    }

    #[test]
    fn test_inline_object_quoted_colon_in_name() {
        let v = parse_inline_object("{'a:b': 'c, d'}", 1, &ctx()).unwrap();
        assert_eq!(v["a:b"], s("c, d"));
    }

    #[test]
    fn test_inline_object_duplicate_key_last_wins() {
        let v = parse_inline_object("{a: 1, b: 2, a: 3}", 1, &ctx()).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(obj["a"], Value::from(3i64));
    }

    #[test]
    fn test_unterminated_quote() {
        let err = parse_inline_object("{unterminated: 'oops", 4, &ctx()).unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedQuote(4, _)));
        let err = parse_inline_array("[\"a, b]", 1, &ctx()).unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedQuote(1, _)));
    }

    #[test]
    fn test_missing_colon() {
        let err = parse_inline_object("{a: 1, b}", 2, &ctx()).unwrap_err();
        assert!(matches!(err, ParseError::MalformedInlineField(2, _)));
    }

    #[test]
    fn test_missing_closing_delimiter() {
        let err = parse_inline_object("{a: 1", 1, &ctx()).unwrap_err();
        assert!(matches!(err, ParseError::UnmatchedBrace(1, _)));
        let err = parse_inline_array("[1, 2", 1, &ctx()).unwrap_err();
        assert!(matches!(err, ParseError::UnmatchedBracket(1, _)));
        let err = parse_inline_array("[", 1, &ctx()).unwrap_err();
        assert!(matches!(err, ParseError::UnmatchedBracket(1, _)));
    }
}
