//! Conversion between plain JSON (what a user types on the command line)
//! and `raftkv_core::AttributeValue` (the wire format the node expects).

use std::collections::BTreeMap;

use raftkv_core::AttributeValue;

/// Parse a `--item`/`--key`/`--partition-key` argument: a JSON object whose
/// values are plain strings, numbers, booleans, or null.
pub fn parse_attribute_map(raw: &str) -> Result<BTreeMap<String, AttributeValue>, String> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {}", e))?;
    let serde_json::Value::Object(map) = value else {
        return Err("expected a JSON object".to_string());
    };
    map.into_iter()
        .map(|(k, v)| plain_to_attribute(v).map(|av| (k, av)))
        .collect()
}

fn plain_to_attribute(v: serde_json::Value) -> Result<AttributeValue, String> {
    match v {
        serde_json::Value::String(s) => Ok(AttributeValue::S(s)),
        serde_json::Value::Number(n) => n
            .as_f64()
            .map(AttributeValue::N)
            .ok_or_else(|| format!("number {} is out of range", n)),
        serde_json::Value::Bool(b) => Ok(AttributeValue::Bool(b)),
        serde_json::Value::Null => Ok(AttributeValue::Null),
        other => Err(format!("unsupported attribute value: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_types() {
        let map = parse_attribute_map(r#"{"id": "alice", "age": 30, "active": true, "nickname": null}"#).unwrap();
        assert_eq!(map.get("id"), Some(&AttributeValue::S("alice".into())));
        assert_eq!(map.get("age"), Some(&AttributeValue::N(30.0)));
        assert_eq!(map.get("active"), Some(&AttributeValue::Bool(true)));
        assert_eq!(map.get("nickname"), Some(&AttributeValue::Null));
    }

    #[test]
    fn rejects_non_object_input() {
        assert!(parse_attribute_map("[1, 2, 3]").is_err());
    }

    #[test]
    fn rejects_nested_objects() {
        assert!(parse_attribute_map(r#"{"id": {"nested": true}}"#).is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse_attribute_map("{not json}").is_err());
    }
}
