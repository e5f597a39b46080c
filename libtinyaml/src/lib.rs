//! Tinyaml parser implementation.
//!
//! Tinyaml is a restricted, YAML-like notation: `key: value` objects and
//! `- item` lists nested by two-column indentation, single-line `{…}` and
//! `[…]` fragments, and scalars that are either integers or strings.
//!
//! # Parsing Pipeline
//!
//! 1. **Line cursor**: walks the source one line at a time, folding `\r\n`,
//!    stripping trailing whitespace and measuring indentation.
//!
//! 2. **Block parser**: recursive descent over the cursor. The character in
//!    each line's marker column selects a list, object, inline fragment or
//!    scalar.
//!
//! 3. **Inline fragments and scalar coercion**: quote-aware comma splitting
//!    and the integer/string decision for individual tokens.

mod encode;
mod error;
mod inline;
mod options;
mod parser;
mod scalar;
mod scanner;
mod value;

pub use encode::{encode, Format};
pub use error::{EncodeError, ParseContext, ParseError, Result};
pub use options::{ParseOptions, DEFAULT_MAX_DEPTH};
pub use scalar::coerce_scalar;
pub use scanner::{Cursor, Line};
pub use value::{Map, Value};

/// Parse a tinyaml document from a string.
///
/// An empty document is `Null`.
///
/// # Example
///
/// ```
/// use libtinyaml::{parse, Value};
///
/// let value = parse("name: Bob\nage: 20").unwrap();
/// assert_eq!(value["name"], Value::from("Bob"));
/// assert_eq!(value["age"], Value::from(20i64));
/// ```
pub fn parse(input: &str) -> Result<Value> {
    parse_with_options(input, &ParseOptions::default())
}

/// Parse a tinyaml document from a string with a filename for error messages.
pub fn parse_with_filename(input: &str, filename: Option<&str>) -> Result<Value> {
    let mut options = ParseOptions::default();
    options.filename = filename.map(String::from);
    parse_with_options(input, &options)
}

/// Parse a tinyaml document with explicit options.
pub fn parse_with_options(input: &str, options: &ParseOptions) -> Result<Value> {
    parser::parse_document(input, options)
}
