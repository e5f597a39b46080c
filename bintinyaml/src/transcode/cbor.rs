//! CBOR transcoding: convert tinyaml values to CBOR binary data.
//!
//! Mapping from tinyaml to CBOR:
//!   - Value::Null    -> CBOR null (simple value 22)
//!   - Value::Integer -> CBOR integer (smallest encoding that fits)
//!   - Value::Number  -> CBOR float64 (always 9 bytes, never downgraded)
//!   - Value::String  -> CBOR text string (determinate length)
//!   - Value::Array   -> CBOR array (determinate length)
//!   - Value::Object  -> CBOR map (determinate length, text string keys,
//!                       document order)
//!
//! Integers that exceed CBOR's native integer range (-2^64 to 2^64-1)
//! produce an error rather than using bignum tags.

use ciborium::value::Value as CborValue;
use libtinyaml::Value;
use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;
use std::fmt::Write as FmtWrite;

// ---------------------------------------------------------------------------
// Encode (tinyaml -> CBOR)
//
// Written by hand rather than through ciborium's Value type, which would
// shrink float64 payloads to float16/float32 when they fit.
// ---------------------------------------------------------------------------

/// Encode a tinyaml Value as CBOR bytes.
pub fn encode(value: &Value) -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    write_value(&mut buf, value)?;
    Ok(buf)
}

fn write_value(buf: &mut Vec<u8>, value: &Value) -> Result<(), String> {
    match value {
        Value::Null => {
            buf.push(0xf6);
            Ok(())
        }
        Value::Integer(n) => write_integer(buf, n),
        Value::Number(f) => {
            // major 7, info 27
            buf.push(0xfb);
            buf.extend_from_slice(&f.to_be_bytes());
            Ok(())
        }
        Value::String(s) => {
            write_text(buf, s);
            Ok(())
        }
        Value::Array(arr) => {
            write_type_and_length(buf, 4, arr.len() as u64);
            for item in arr {
                write_value(buf, item)?;
            }
            Ok(())
        }
        Value::Object(obj) => {
            write_type_and_length(buf, 5, obj.len() as u64);
            for (k, v) in obj {
                write_text(buf, k);
                write_value(buf, v)?;
            }
            Ok(())
        }
    }
}

fn write_text(buf: &mut Vec<u8>, s: &str) {
    let bytes = s.as_bytes();
    write_type_and_length(buf, 3, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Write a CBOR major type + length/value argument.
///
/// The major type sits in the high 3 bits; the low 5 bits hold the argument
/// when it is below 24, otherwise 24..=27 announce a 1, 2, 4 or 8-byte
/// argument that follows.
fn write_type_and_length(buf: &mut Vec<u8>, major: u8, val: u64) {
    let high = major << 5;
    match val {
        0..=23 => {
            buf.push(high | val as u8);
        }
        24..=0xff => {
            buf.push(high | 24);
            buf.push(val as u8);
        }
        0x100..=0xffff => {
            buf.push(high | 25);
            buf.extend_from_slice(&(val as u16).to_be_bytes());
        }
        0x10000..=0xffff_ffff => {
            buf.push(high | 26);
            buf.extend_from_slice(&(val as u32).to_be_bytes());
        }
        _ => {
            buf.push(high | 27);
            buf.extend_from_slice(&val.to_be_bytes());
        }
    }
}

/// Major 0 carries n, major 1 carries -1 - n.
fn write_integer(buf: &mut Vec<u8>, n: &BigInt) -> Result<(), String> {
    let out_of_range = || {
        format!(
            "integer {} exceeds CBOR's native integer range (-2^64 to 2^64-1)",
            n
        )
    };
    if n.sign() == Sign::Minus {
        let abs_minus_1 = (-n) - BigInt::from(1);
        let val = abs_minus_1.to_u64().ok_or_else(out_of_range)?;
        write_type_and_length(buf, 1, val);
    } else {
        let val = n.to_u64().ok_or_else(out_of_range)?;
        write_type_and_length(buf, 0, val);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Diagnostic notation (RFC 8949 §8)
// ---------------------------------------------------------------------------

/// Render CBOR bytes as diagnostic notation.
///
/// The text is produced from the decoded wire bytes so it shows what was
/// actually written, float width included.
pub fn diagnostic(input: &[u8]) -> Result<String, String> {
    let decoded: CborValue =
        ciborium::de::from_reader(input).map_err(|e| format!("CBOR decode error: {}", e))?;
    let mut out = String::new();
    render(&mut out, &decoded, 0)?;
    out.push('\n');
    Ok(out)
}

fn render(out: &mut String, val: &CborValue, depth: usize) -> Result<(), String> {
    match val {
        CborValue::Null => out.push_str("null"),
        CborValue::Integer(i) => push_fmt(out, format_args!("{}", i128::from(*i)))?,
        CborValue::Float(f) => render_float(out, *f)?,
        CborValue::Text(s) => render_text(out, s)?,
        CborValue::Array(items) if items.is_empty() => out.push_str("[]"),
        CborValue::Array(items) if items.len() <= 5 && items.iter().all(is_leaf) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render(out, item, depth)?;
            }
            out.push(']');
        }
        CborValue::Array(items) => {
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                pad(out, depth + 1);
                render(out, item, depth + 1)?;
                close_entry(out, i + 1 < items.len());
            }
            pad(out, depth);
            out.push(']');
        }
        CborValue::Map(pairs) if pairs.is_empty() => out.push_str("{}"),
        CborValue::Map(pairs) => {
            out.push_str("{\n");
            for (i, (k, v)) in pairs.iter().enumerate() {
                pad(out, depth + 1);
                render(out, k, depth + 1)?;
                out.push_str(": ");
                render(out, v, depth + 1)?;
                close_entry(out, i + 1 < pairs.len());
            }
            pad(out, depth);
            out.push('}');
        }
        // Never produced by the encoder above.
        other => push_fmt(out, format_args!("<?unsupported {:?}>", other))?,
    }
    Ok(())
}

fn render_float(out: &mut String, f: f64) -> Result<(), String> {
    if f.is_nan() {
        out.push_str("NaN");
    } else if f.is_infinite() {
        out.push_str(if f > 0.0 { "Infinity" } else { "-Infinity" });
    } else if f.fract() == 0.0 && f.abs() < 1e18 {
        push_fmt(out, format_args!("{:.1}", f))?;
    } else {
        let s = f.to_string();
        out.push_str(&s);
        if !s.contains(['.', 'e', 'E']) {
            out.push_str(".0");
        }
    }
    Ok(())
}

fn render_text(out: &mut String, s: &str) -> Result<(), String> {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => push_fmt(out, format_args!("\\u{:04x}", c as u32))?,
            c => out.push(c),
        }
    }
    out.push('"');
    Ok(())
}

fn push_fmt(out: &mut String, args: std::fmt::Arguments<'_>) -> Result<(), String> {
    out.write_fmt(args).map_err(|e| e.to_string())
}

fn pad(out: &mut String, depth: usize) {
    out.extend(std::iter::repeat("  ").take(depth));
}

fn close_entry(out: &mut String, more: bool) {
    if more {
        out.push(',');
    }
    out.push('\n');
}

fn is_leaf(val: &CborValue) -> bool {
    matches!(
        val,
        CborValue::Null | CborValue::Integer(_) | CborValue::Float(_) | CborValue::Text(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use libtinyaml::parse;

    #[test]
    fn test_small_values() {
        assert_eq!(encode(&parse("1").unwrap()).unwrap(), [0x01]);
        assert_eq!(encode(&parse("a").unwrap()).unwrap(), [0x61, b'a']);
        assert_eq!(encode(&parse("").unwrap()).unwrap(), [0xf6]);
        assert_eq!(encode(&Value::from(-1i64)).unwrap(), [0x20]);
    }

    #[test]
    fn test_map_keeps_document_order() {
        let bytes = encode(&parse("b: 1\na: 500").unwrap()).unwrap();
        assert_eq!(
            bytes,
            [0xa2, 0x61, b'b', 0x01, 0x61, b'a', 0x19, 0x01, 0xf4]
        );
    }

    #[test]
    fn test_float_stays_wide() {
        let bytes = encode(&Value::Number(1.5)).unwrap();
        assert_eq!(bytes.len(), 9);
        assert_eq!(bytes[0], 0xfb);
    }

    #[test]
    fn test_integer_out_of_range() {
        let value = parse("n: 18446744073709551616").unwrap();
        assert!(encode(&value).is_err());
        let value = parse("n: 18446744073709551615").unwrap();
        assert!(encode(&value).is_ok());
    }

    #[test]
    fn test_diagnostic() {
        let value = parse("name: Bob\nnums: [1, 2]").unwrap();
        let diag = diagnostic(&encode(&value).unwrap()).unwrap();
        assert_eq!(diag, "{\n  \"name\": \"Bob\",\n  \"nums\": [1, 2]\n}\n");
    }
}
