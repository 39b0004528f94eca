//! Items and their derived storage keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{RaftKvError, RaftKvResult};
use crate::table::TableMeta;
use crate::value::AttributeValue;

/// A row: an unordered bag of named attributes.
///
/// Internally kept as a `BTreeMap` so two items with the same attributes
/// serialize identically, which matters for the on-disk record format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Item {
    /// Attribute name to value.
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl Item {
    /// Construct an item from its attribute map.
    pub fn new(attributes: BTreeMap<String, AttributeValue>) -> Self {
        Self { attributes }
    }

    /// Look up a single attribute by name.
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }
}

/// The key derived from an item's partition (and optional sort) key
/// attributes, used both as the FSM's lookup key and as the on-disk file
/// name component.
///
/// Path derivation: `<dataRoot>/<nodeId>/kv/<sanitized table>/<sanitized item key>`.
/// Sanitization replaces any byte outside `[A-Za-z0-9_.-]` with `_` so a
/// key attribute value can never escape its directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemKey(String);

impl ItemKey {
    /// Derive the item key for `item` under `schema`.
    ///
    /// Returns `RaftKvError::Validation` if a key attribute is missing or is
    /// not a valid key type (`S` or `N`).
    pub fn derive(schema: &TableMeta, item: &Item) -> RaftKvResult<Self> {
        let pk = item
            .get(&schema.partition_key)
            .ok_or_else(|| RaftKvError::validation(format!("missing partition key attribute '{}'", schema.partition_key)))?;
        let pk_str = pk
            .key_string()
            .ok_or_else(|| RaftKvError::validation(format!("partition key attribute '{}' must be S or N", schema.partition_key)))?;

        let sanitized_pk = sanitize(&pk_str);
        let key = match &schema.sort_key {
            None => sanitized_pk,
            Some(sk_name) => {
                let sk = item
                    .get(sk_name)
                    .ok_or_else(|| RaftKvError::validation(format!("missing sort key attribute '{}'", sk_name)))?;
                let sk_str = sk
                    .key_string()
                    .ok_or_else(|| RaftKvError::validation(format!("sort key attribute '{}' must be S or N", sk_name)))?;
                format!("{}_{}", sanitized_pk, sanitize(&sk_str))
            }
        };
        Ok(Self(key))
    }

    /// The sanitized key string, suitable for use as a file name component.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Sanitize a table name for use as a directory component.
pub fn sanitize_table_name(name: &str) -> String {
    sanitize(name)
}

/// Sanitize a single key attribute's string form the same way
/// [`ItemKey::derive`] does, for callers that need to build a matching
/// prefix (e.g. `Query`'s partition-key scan) without an `Item` to derive
/// a full key from.
pub fn sanitize_key_part(raw: &str) -> String {
    sanitize(raw)
}

fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(pairs: &[(&str, AttributeValue)]) -> Item {
        Item::new(pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect())
    }

    #[test]
    fn derives_partition_only_key() {
        let schema = TableMeta::new("Users", "user_id", None);
        let it = item(&[("user_id", AttributeValue::S("alice".into()))]);
        let key = ItemKey::derive(&schema, &it).unwrap();
        assert_eq!(key.as_str(), "alice");
    }

    #[test]
    fn derives_composite_key() {
        let schema = TableMeta::new("Orders", "customer_id", Some("order_id".into()));
        let it = item(&[
            ("customer_id", AttributeValue::S("c1".into())),
            ("order_id", AttributeValue::N(42.0)),
        ]);
        let key = ItemKey::derive(&schema, &it).unwrap();
        assert_eq!(key.as_str(), "c1_42");
    }

    #[test]
    fn missing_partition_key_is_validation_error() {
        let schema = TableMeta::new("Users", "user_id", None);
        let it = item(&[("other", AttributeValue::S("x".into()))]);
        let err = ItemKey::derive(&schema, &it).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn non_key_type_partition_key_is_validation_error() {
        let schema = TableMeta::new("Users", "user_id", None);
        let it = item(&[("user_id", AttributeValue::Bool(true))]);
        let err = ItemKey::derive(&schema, &it).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn sanitizes_path_unsafe_characters() {
        let schema = TableMeta::new("Users", "user_id", None);
        let it = item(&[("user_id", AttributeValue::S("../../etc/passwd".into()))]);
        let key = ItemKey::derive(&schema, &it).unwrap();
        assert!(!key.as_str().contains('/'));
        assert!(!key.as_str().contains(".."));
    }

    #[test]
    fn sanitize_table_name_strips_separators() {
        assert_eq!(sanitize_table_name("a/b\\c"), "a_b_c");
    }
}
