//! YAML transcoding: convert tinyaml values to YAML text.
//!
//! Mapping from tinyaml to YAML:
//!   - Value::Null     -> YAML null
//!   - Value::Integer  -> YAML integer (as a string if it overflows i64/u64)
//!   - Value::Number   -> YAML float (including .nan, .inf, -.inf)
//!   - Value::String   -> YAML string
//!   - Value::Array    -> YAML sequence
//!   - Value::Object   -> YAML mapping (key order kept)

use libtinyaml::Value;
use num_traits::ToPrimitive;

/// Encode a tinyaml Value as a YAML string.
pub fn encode(value: &Value) -> Result<String, String> {
    let yaml_value = value_to_yaml(value);
    serde_yaml::to_string(&yaml_value).map_err(|e| format!("YAML encode error: {}", e))
}

fn value_to_yaml(value: &Value) -> serde_yaml::Value {
    match value {
        Value::Null => serde_yaml::Value::Null,
        Value::Integer(n) => {
            // Try to fit in i64 first, then u64
            if let Some(i) = n.to_i64() {
                serde_yaml::Value::Number(serde_yaml::Number::from(i))
            } else if let Some(u) = n.to_u64() {
                serde_yaml::Value::Number(serde_yaml::Number::from(u))
            } else {
                // YAML doesn't have native arbitrary-precision integers
                serde_yaml::Value::String(n.to_string())
            }
        }
        Value::Number(f) => serde_yaml::Value::Number(serde_yaml::Number::from(*f)),
        Value::String(s) => serde_yaml::Value::String(s.clone()),
        Value::Array(arr) => serde_yaml::Value::Sequence(arr.iter().map(value_to_yaml).collect()),
        Value::Object(obj) => {
            let mut map = serde_yaml::Mapping::new();
            for (k, v) in obj {
                map.insert(serde_yaml::Value::String(k.clone()), value_to_yaml(v));
            }
            serde_yaml::Value::Mapping(map)
        }
    }
}
