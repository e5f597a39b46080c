//! Encode tinyaml values to text.
//!
//! `Format::Tinyaml` writes a document that parses back to the same value.
//! The notation cannot spell every value (nested nulls, negative integers,
//! floating numbers, multi-line strings, keys outside `[A-Za-z0-9]`), so the
//! encoder reports those instead of writing something that would read back
//! differently.

use crate::error::EncodeError;
use crate::value::{Map, Value};
use num_traits::Signed;

/// Output format for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Tinyaml block notation
    Tinyaml,
    /// JSON (standard, pretty-printed)
    Json,
}

/// Encode a value to a string in the specified format.
pub fn encode(value: &Value, format: Format) -> Result<String, EncodeError> {
    match format {
        Format::Tinyaml => encode_tinyaml(value),
        Format::Json => Ok(encode_json(value, 0)),
    }
}

// =============================================================================
// Tinyaml Encoder
// =============================================================================

fn encode_tinyaml(value: &Value) -> Result<String, EncodeError> {
    if value.is_null() {
        return Ok(String::new());
    }
    let mut lines = Vec::new();
    emit(value, 0, String::new(), &mut lines)?;
    Ok(lines.join("\n"))
}

/// Append the lines for `value` as a block at `indent`. The first line
/// starts with `lead` (which already spans `indent * 2` columns) and every
/// following line with plain padding.
fn emit(
    value: &Value,
    indent: usize,
    lead: String,
    lines: &mut Vec<String>,
) -> Result<(), EncodeError> {
    match value {
        Value::Array(arr) if !arr.is_empty() => {
            let pad = "  ".repeat(indent);
            let mut lead = Some(lead);
            for item in arr {
                let prefix = format!("{}- ", lead.take().unwrap_or_else(|| pad.clone()));
                emit(item, indent + 1, prefix, lines)?;
            }
            Ok(())
        }
        Value::Object(obj) if !obj.is_empty() => emit_object(obj, indent, lead, lines),
        _ => {
            lines.push(format!("{}{}", lead, encode_tinyaml_inline(value)?));
            Ok(())
        }
    }
}

fn emit_object(
    obj: &Map,
    indent: usize,
    lead: String,
    lines: &mut Vec<String>,
) -> Result<(), EncodeError> {
    let pad = "  ".repeat(indent);
    let mut lead = Some(lead);
    for (k, v) in obj {
        let key = encode_tinyaml_key(k)?;
        let start = lead.take().unwrap_or_else(|| pad.clone());
        if is_block_value(v) {
            lines.push(format!("{}{}:", start, key));
            emit(v, indent + 1, "  ".repeat(indent + 1), lines)?;
        } else {
            lines.push(format!("{}{}: {}", start, key, encode_tinyaml_inline(v)?));
        }
    }
    Ok(())
}

fn is_block_value(v: &Value) -> bool {
    match v {
        Value::Array(arr) => !arr.is_empty(),
        Value::Object(obj) => !obj.is_empty(),
        _ => false,
    }
}

/// Spell a value that fits on the rest of a line.
fn encode_tinyaml_inline(value: &Value) -> Result<String, EncodeError> {
    match value {
        Value::Null => Err(EncodeError::Unrepresentable("nested null".to_string())),
        Value::Integer(n) if n.is_negative() => Err(EncodeError::Unrepresentable(
            format!("negative integer {}", n),
        )),
        Value::Integer(n) => Ok(n.to_string()),
        Value::Number(f) => Err(EncodeError::Unrepresentable(format!("number {}", f))),
        Value::String(s) => encode_tinyaml_string(s),
        Value::Array(_) => Ok("[]".to_string()),
        Value::Object(_) => Ok("{}".to_string()),
    }
}

fn encode_tinyaml_string(s: &str) -> Result<String, EncodeError> {
    if s.contains('\n') || s.contains('\r') {
        return Err(EncodeError::Unrepresentable(format!(
            "multi-line string {:?}",
            s
        )));
    }
    if is_plain_string(s) {
        Ok(s.to_string())
    } else {
        Ok(format!("\"{}\"", s))
    }
}

/// Whether `s` reads back as itself without quotes in any position.
fn is_plain_string(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return false;
    };
    let blank = |c: char| c == ' ' || c == '\t';
    if first == '-' || blank(first) || s.ends_with(blank) {
        return false;
    }
    if s.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    !s.chars()
        .any(|c| c.is_control() || matches!(c, ':' | '"' | '\'' | '{' | '}' | '[' | ']' | ','))
}

fn encode_tinyaml_key(key: &str) -> Result<&str, EncodeError> {
    if key.bytes().all(|b| b.is_ascii_alphanumeric()) {
        Ok(key)
    } else {
        Err(EncodeError::Unrepresentable(format!("key {:?}", key)))
    }
}

// =============================================================================
// JSON Encoder
// =============================================================================

fn encode_json(value: &Value, indent: usize) -> String {
    let pad = "  ".repeat(indent);
    let pad1 = "  ".repeat(indent + 1);

    match value {
        Value::Null => "null".to_string(),
        Value::Integer(n) => n.to_string(),
        Value::Number(f) => {
            if f.is_nan() || f.is_infinite() {
                "null".to_string() // JSON doesn't support NaN/Infinity
            } else {
                format!("{}", f)
            }
        }
        Value::String(s) => json_quote(s),
        Value::Array(arr) => {
            if arr.is_empty() {
                "[]".to_string()
            } else {
                let items: Vec<String> = arr
                    .iter()
                    .map(|v| format!("{}{}", pad1, encode_json(v, indent + 1)))
                    .collect();
                format!("[\n{}\n{}]", items.join(",\n"), pad)
            }
        }
        Value::Object(obj) => {
            if obj.is_empty() {
                "{}".to_string()
            } else {
                let items: Vec<String> = obj
                    .iter()
                    .map(|(k, v)| {
                        format!(
                            "{}{}: {}",
                            pad1,
                            json_quote(k),
                            encode_json(v, indent + 1)
                        )
                    })
                    .collect();
                format!("{{\n{}\n{}}}", items.join(",\n"), pad)
            }
        }
    }
}

/// JSON string literal. Control characters other than newline, carriage
/// return and tab become `\u` escapes; everything else, non-ASCII included,
/// is written as is.
fn json_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
