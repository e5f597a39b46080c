//! Scalar coercion and character classification.
//!
//! Only ASCII is classified: letters and digits form property names, space
//! and tab are the only whitespace.

use crate::value::Value;
use num_bigint::BigInt;

pub(crate) fn is_space(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

pub(crate) fn is_letter_or_digit(c: u8) -> bool {
    c.is_ascii_alphanumeric()
}

fn is_quote(c: u8) -> bool {
    c == b'"' || c == b'\''
}

/// Strip leading and trailing spaces and tabs.
pub(crate) fn trim(s: &str) -> &str {
    s.trim_matches(|c: char| c == ' ' || c == '\t')
}

/// Strip trailing spaces and tabs.
pub(crate) fn trim_end(s: &str) -> &str {
    s.trim_end_matches(|c: char| c == ' ' || c == '\t')
}

/// Return the text between one matching pair of outer quotes, if any.
pub(crate) fn strip_quotes(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 && is_quote(bytes[0]) && bytes[bytes.len() - 1] == bytes[0] {
        Some(&s[1..s.len() - 1])
    } else {
        None
    }
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Map a raw token to a value.
///
/// A token wrapped in `"…"` or `'…'` becomes the string between the quotes,
/// verbatim (no escapes). A digit-only token becomes an integer of any size.
/// Anything else is a string, trimmed.
pub fn coerce_scalar(token: &str) -> Value {
    let token = trim(token);

    if let Some(inner) = strip_quotes(token) {
        return Value::String(inner.to_string());
    }

    if is_all_digits(token) {
        if let Ok(n) = token.parse::<BigInt>() {
            return Value::Integer(n);
        }
    }

    Value::String(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_become_integers() {
        assert_eq!(coerce_scalar("20"), Value::Integer(20.into()));
        assert_eq!(coerce_scalar("007"), Value::Integer(7.into()));
    }

    #[test]
    fn test_long_digit_run_is_integer() {
        let digits = "123456789012345678901234567890123456789";
        let expected: BigInt = digits.parse().unwrap();
        assert_eq!(coerce_scalar(digits), Value::Integer(expected));
    }

    #[test]
    fn test_non_digits_stay_strings() {
        assert_eq!(coerce_scalar("3.14"), Value::String("3.14".into()));
        assert_eq!(coerce_scalar("-5"), Value::String("-5".into()));
        assert_eq!(coerce_scalar("true"), Value::String("true".into()));
        assert_eq!(coerce_scalar("null"), Value::String("null".into()));
        assert_eq!(coerce_scalar("12a"), Value::String("12a".into()));
    }

    #[test]
    fn test_quotes_are_stripped_once() {
        assert_eq!(coerce_scalar("\"Bob\""), Value::String("Bob".into()));
        assert_eq!(coerce_scalar("'Alice'"), Value::String("Alice".into()));
        assert_eq!(coerce_scalar("\"\"x\"\""), Value::String("\"x\"".into()));
        assert_eq!(coerce_scalar("'20'"), Value::String("20".into()));
    }

    #[test]
    fn test_mismatched_quotes_are_kept() {
        assert_eq!(coerce_scalar("'Bob\""), Value::String("'Bob\"".into()));
        assert_eq!(coerce_scalar("\""), Value::String("\"".into()));
    }

    #[test]
    fn test_no_escape_processing() {
        assert_eq!(coerce_scalar(r#""a\nb""#), Value::String(r"a\nb".into()));
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(coerce_scalar(" \t42\t "), Value::Integer(42.into()));
        assert_eq!(coerce_scalar("  Bob  "), Value::String("Bob".into()));
        assert_eq!(coerce_scalar(""), Value::String(String::new()));
    }

    #[test]
    fn test_trim_is_idempotent() {
        for s in ["  a b  ", "\tx\t", "", "plain", " \t "] {
            assert_eq!(trim(trim(s)), trim(s));
        }
    }

    #[test]
    fn test_classification() {
        assert!(is_space(b' '));
        assert!(is_space(b'\t'));
        assert!(!is_space(b'\n'));
        assert!(is_letter_or_digit(b'z'));
        assert!(is_letter_or_digit(b'7'));
        assert!(!is_letter_or_digit(b'_'));
        assert!(!is_letter_or_digit(b'-'));
    }
}
