//! TOML transcoding: convert tinyaml values to TOML text.
//!
//! Mapping from tinyaml to TOML:
//!   - Value::Null          -> error (TOML has no null)
//!   - Value::Integer       -> TOML integer (if fits in i64, otherwise error)
//!   - Value::Number        -> TOML float
//!   - Value::String        -> TOML string
//!   - Value::Array         -> TOML array (objects become inline tables)
//!   - Value::Object        -> TOML table
//!
//! TOML requires the top-level value to be a table; non-object documents
//! are rejected.

use libtinyaml::Value;
use num_traits::ToPrimitive;
use toml_edit::DocumentMut;

/// Encode a tinyaml Value as a TOML string.
pub fn encode(value: &Value) -> Result<String, String> {
    match value {
        Value::Object(_) => match value_to_toml(value)? {
            toml_edit::Item::Table(table) => {
                let mut doc = DocumentMut::new();
                for (key, item) in table.iter() {
                    doc[key] = item.clone();
                }
                Ok(doc.to_string())
            }
            _ => Err("Internal error: expected table".to_string()),
        },
        _ => Err("TOML requires the top-level value to be a table/object".to_string()),
    }
}

fn value_to_toml(value: &Value) -> Result<toml_edit::Item, String> {
    match value {
        Value::Object(obj) => {
            let mut table = toml_edit::Table::new();
            for (k, v) in obj {
                table.insert(k, value_to_toml(v)?);
            }
            Ok(toml_edit::Item::Table(table))
        }
        _ => Ok(toml_edit::Item::Value(value_to_toml_value(value)?)),
    }
}

/// Convert to a TOML value usable inside arrays and inline tables.
fn value_to_toml_value(value: &Value) -> Result<toml_edit::Value, String> {
    match value {
        Value::Null => Err("TOML has no null type".to_string()),
        Value::Integer(n) => {
            let i = n
                .to_i64()
                .ok_or_else(|| format!("Integer {} too large for TOML (i64)", n))?;
            Ok(toml_edit::Value::Integer(toml_edit::Formatted::new(i)))
        }
        Value::Number(f) => Ok(toml_edit::Value::Float(toml_edit::Formatted::new(*f))),
        Value::String(s) => Ok(toml_edit::Value::String(toml_edit::Formatted::new(
            s.clone(),
        ))),
        Value::Array(arr) => {
            let mut toml_arr = toml_edit::Array::new();
            for v in arr {
                toml_arr.push(value_to_toml_value(v)?);
            }
            Ok(toml_edit::Value::Array(toml_arr))
        }
        Value::Object(obj) => {
            let mut inline = toml_edit::InlineTable::new();
            for (k, v) in obj {
                inline.insert(k.as_str(), value_to_toml_value(v)?);
            }
            Ok(toml_edit::Value::InlineTable(inline))
        }
    }
}
