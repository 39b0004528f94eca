//! Table identity and schema.

use serde::{Deserialize, Serialize};

/// Schema for a table: its name and key attribute names.
///
/// The sort key is optional; a table with only a partition key has
/// single-attribute item keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMeta {
    /// Table name as given by the client.
    pub name: String,
    /// Name of the partition key attribute.
    pub partition_key: String,
    /// Name of the sort key attribute, if the table has one.
    pub sort_key: Option<String>,
}

impl TableMeta {
    /// Construct a new table schema.
    pub fn new(name: impl Into<String>, partition_key: impl Into<String>, sort_key: Option<String>) -> Self {
        Self {
            name: name.into(),
            partition_key: partition_key.into(),
            sort_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construct_with_and_without_sort_key() {
        let t1 = TableMeta::new("Users", "user_id", None);
        assert_eq!(t1.sort_key, None);

        let t2 = TableMeta::new("Orders", "customer_id", Some("order_id".to_string()));
        assert_eq!(t2.sort_key.as_deref(), Some("order_id"));
    }
}
