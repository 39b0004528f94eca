//! The typed value held by a single item attribute.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single attribute value, DynamoDB-style.
///
/// Only `S` and `N` are valid key attribute types (see
/// [`crate::table::TableMeta`]); `Bool` and `Null` are valid for non-key
/// attributes only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum AttributeValue {
    /// UTF-8 string.
    S(String),
    /// Numeric value, stored as `f64`.
    N(f64),
    /// Boolean.
    Bool(bool),
    /// Explicit null.
    Null,
}

impl AttributeValue {
    /// True if this value is a valid type for a partition or sort key.
    pub fn is_key_type(&self) -> bool {
        matches!(self, AttributeValue::S(_) | AttributeValue::N(_))
    }

    /// Canonical string form used when deriving an item key from this value.
    ///
    /// Numbers are rendered with a round-trippable decimal form rather than
    /// `f64`'s `Display`, so `1.0` and `1` coerce to the same key string.
    pub fn key_string(&self) -> Option<String> {
        match self {
            AttributeValue::S(s) => Some(s.clone()),
            AttributeValue::N(n) => Some(canonical_number(*n)),
            AttributeValue::Bool(_) | AttributeValue::Null => None,
        }
    }
}

fn canonical_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        let mut s = format!("{}", n);
        if !s.contains('.') && !s.contains('e') {
            s.push_str(".0");
        }
        s
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::S(s) => write!(f, "{}", s),
            AttributeValue::N(n) => write!(f, "{}", canonical_number(*n)),
            AttributeValue::Bool(b) => write!(f, "{}", b),
            AttributeValue::Null => write!(f, "null"),
        }
    }
}
