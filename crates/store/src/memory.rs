//! In-memory DocumentStore implementation for tests and local runs.

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde_json::Value;

use crate::error::{Result, StoreError};
use crate::record::{Filter, ID_FIELD, Record, ensure_unique, record_name};
use crate::traits::{DocumentStore, RecordIter};

#[derive(Default)]
struct Collection {
    next_id: u64,
    records: Vec<Record>,
}

impl Collection {
    fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().filter_map(record_name)
    }
}

/// In-memory implementation of DocumentStore.
///
/// Collections come into existence on first insert. `find` hands out a
/// snapshot, so readers never hold the lock while iterating.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<BTreeMap<String, Collection>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn find(&self, collection: &str, filter: &Filter) -> Result<RecordIter> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;

        let snapshot: Vec<Record> = collections
            .get(collection)
            .map(|c| {
                c.records
                    .iter()
                    .filter(|record| filter.matches(record))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(Box::new(snapshot.into_iter().map(Ok)))
    }

    fn insert_many(&self, collection: &str, records: Vec<Record>) -> Result<usize> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        match collections.get(collection) {
            Some(existing) => ensure_unique(existing.names(), &records)?,
            None => ensure_unique([], &records)?,
        }
        if records.is_empty() {
            return Ok(0);
        }

        let target = collections.entry(collection.to_owned()).or_default();
        let inserted = records.len();
        for mut record in records {
            target.next_id += 1;
            record.insert(ID_FIELD.to_owned(), Value::from(target.next_id));
            target.records.push(record);
        }

        tracing::debug!("Inserted {} record(s) into '{}'", inserted, collection);
        Ok(inserted)
    }

    fn replace_one(&self, collection: &str, filter: &Filter, mut record: Record) -> Result<u64> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        let Some(target) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let Some(index) = target.records.iter().position(|r| filter.matches(r)) else {
            return Ok(0);
        };

        let others = target
            .records
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .filter_map(|(_, r)| record_name(r));
        ensure_unique(others, std::slice::from_ref(&record))?;

        if let Some(id) = target.records[index].get(ID_FIELD).cloned() {
            record.insert(ID_FIELD.to_owned(), id);
        }
        target.records[index] = record;

        tracing::debug!("Replaced record in '{}'", collection);
        Ok(1)
    }

    fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        let Some(target) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let before = target.records.len();
        target.records.retain(|record| !filter.matches(record));
        let deleted = (before - target.records.len()) as u64;

        tracing::debug!("Deleted {} record(s) from '{}'", deleted, collection);
        Ok(deleted)
    }

    fn collection_names(&self) -> Result<Vec<String>> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(collections.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let store = InMemoryDocumentStore::new();
        store
            .insert_many(
                "maps",
                vec![record(json!({"name": "a"})), record(json!({"name": "b"}))],
            )
            .unwrap();

        let ids: Vec<u64> = store
            .find("maps", &Filter::All)
            .unwrap()
            .map(|r| r.unwrap()[ID_FIELD].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn duplicate_batch_writes_nothing() {
        let store = InMemoryDocumentStore::new();
        store
            .insert_many("maps", vec![record(json!({"name": "a"}))])
            .unwrap();

        let result = store.insert_many(
            "maps",
            vec![record(json!({"name": "b"})), record(json!({"name": "a"}))],
        );

        assert!(matches!(result, Err(StoreError::DuplicateName(name)) if name == "a"));
        assert_eq!(store.find("maps", &Filter::All).unwrap().count(), 1);
    }

    #[test]
    fn rejected_or_empty_insert_creates_no_collection() {
        let store = InMemoryDocumentStore::new();

        assert_eq!(store.insert_many("maps", vec![]).unwrap(), 0);
        let repeated = vec![record(json!({"name": "a"})), record(json!({"name": "a"}))];
        assert!(store.insert_many("maps", repeated).is_err());

        assert!(store.collection_names().unwrap().is_empty());
    }

    #[test]
    fn replace_keeps_internal_id() {
        let store = InMemoryDocumentStore::new();
        store
            .insert_many("maps", vec![record(json!({"name": "a", "zoom": 1}))])
            .unwrap();

        let replaced = store
            .replace_one(
                "maps",
                &Filter::name("a"),
                record(json!({"name": "a", "zoom": 2})),
            )
            .unwrap();
        assert_eq!(replaced, 1);

        let stored = store.find_one("maps", &Filter::name("a")).unwrap().unwrap();
        assert_eq!(stored["zoom"], json!(2));
        assert_eq!(stored[ID_FIELD], json!(1));
    }

    #[test]
    fn missing_collection_behaves_as_empty() {
        let store = InMemoryDocumentStore::new();

        assert_eq!(store.find("nope", &Filter::All).unwrap().count(), 0);
        assert_eq!(store.delete_many("nope", &Filter::All).unwrap(), 0);
        assert_eq!(
            store
                .replace_one("nope", &Filter::All, Record::new())
                .unwrap(),
            0
        );
        assert!(store.collection_names().unwrap().is_empty());
    }
}
