//! Raw records and the filters used to select them.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::{Result, StoreError};

/// A stored document: a JSON object.
pub type Record = serde_json::Map<String, Value>;

/// Internal identifier assigned by the backend. Never leaves the store layer.
pub const ID_FIELD: &str = "_id";

/// Field that carries the unique map name.
pub const NAME_FIELD: &str = "name";

/// Record selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Filter {
    All,
    Name(String),
}

impl Filter {
    pub fn name(name: impl Into<String>) -> Self {
        Filter::Name(name.into())
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Filter::All => true,
            Filter::Name(name) => record_name(record) == Some(name.as_str()),
        }
    }
}

/// The record's `name`, when it is a non-empty string.
pub fn record_name(record: &Record) -> Option<&str> {
    record
        .get(NAME_FIELD)
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
}

pub fn record_id(record: &Record) -> Option<u64> {
    record.get(ID_FIELD).and_then(Value::as_u64)
}

/// Removes backend-internal fields before a record is handed to callers.
pub fn strip_internal(mut record: Record) -> Record {
    record.remove(ID_FIELD);
    record
}

/// Fails with `DuplicateName` if a named record in `incoming` collides with
/// `taken` or with another incoming record.
pub(crate) fn ensure_unique<'a>(
    taken: impl IntoIterator<Item = &'a str>,
    incoming: &[Record],
) -> Result<()> {
    let mut names: HashSet<&str> = taken.into_iter().collect();
    for name in incoming.iter().filter_map(record_name) {
        if !names.insert(name) {
            return Err(StoreError::DuplicateName(name.to_owned()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn name_filter_matches_exact_name_only() {
        let filter = Filter::name("m1");

        assert!(filter.matches(&record(json!({"name": "m1"}))));
        assert!(!filter.matches(&record(json!({"name": "m10"}))));
        assert!(!filter.matches(&record(json!({"gridSize": {}}))));
        assert!(Filter::All.matches(&record(json!({}))));
    }

    #[test]
    fn empty_name_is_no_name() {
        assert_eq!(record_name(&record(json!({"name": ""}))), None);
        assert_eq!(record_name(&record(json!({"name": 3}))), None);
    }

    #[test]
    fn ensure_unique_checks_taken_and_batch() {
        let batch = vec![record(json!({"name": "a"})), record(json!({"name": "b"}))];
        assert!(ensure_unique(["c"], &batch).is_ok());
        assert!(matches!(
            ensure_unique(["b"], &batch),
            Err(StoreError::DuplicateName(name)) if name == "b"
        ));

        let repeated = vec![record(json!({"name": "a"})), record(json!({"name": "a"}))];
        assert!(ensure_unique([], &repeated).is_err());
    }

    #[test]
    fn strip_internal_drops_id() {
        let stripped = strip_internal(record(json!({"_id": 4, "name": "m1"})));
        assert_eq!(Value::Object(stripped), json!({"name": "m1"}));
    }
}
