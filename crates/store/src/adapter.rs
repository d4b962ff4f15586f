//! Map-level operations on top of a record store.
//!
//! [`MapDocuments`] is implemented for every [`DocumentStore`], so a
//! `dyn DocumentStore` handle can be used directly:
//!
//! ```ignore
//! let maps = store.fetch_all("maps")?;
//! ```
//!
//! Every document leaving this layer has the backend's internal id stripped,
//! and every document entering it has `cellCount` recomputed.

use map_core::MapDocument;
use serde_json::Value;

use crate::error::{Result, StoreError};
use crate::record::{Filter, Record, strip_internal};
use crate::traits::DocumentStore;

/// Lazy sequence of map documents. Each `fetch_all` call starts a new one.
pub type MapDocumentIter = Box<dyn Iterator<Item = Result<MapDocument>> + Send>;

pub trait MapDocuments {
    /// The document called `name`, or `None` if there is none.
    fn fetch_by_name(&self, collection: &str, name: &str) -> Result<Option<MapDocument>>;

    fn fetch_all(&self, collection: &str) -> Result<MapDocumentIter>;

    /// Inserts every document as a new record. Returns how many were written.
    fn save(&self, collection: &str, documents: Vec<MapDocument>) -> Result<usize>;

    /// Replaces the document called `name`. Returns `false` if it does not exist.
    fn update_by_name(&self, collection: &str, name: &str, document: MapDocument)
    -> Result<bool>;

    /// Removes every document called `name`. Zero is a valid answer.
    fn delete_by_name(&self, collection: &str, name: &str) -> Result<u64>;

    fn list_collections(&self) -> Result<Vec<String>>;
}

impl<S: DocumentStore + ?Sized> MapDocuments for S {
    fn fetch_by_name(&self, collection: &str, name: &str) -> Result<Option<MapDocument>> {
        self.find_one(collection, &Filter::name(name))?
            .map(from_record)
            .transpose()
    }

    fn fetch_all(&self, collection: &str) -> Result<MapDocumentIter> {
        let records = self.find(collection, &Filter::All)?;
        Ok(Box::new(records.map(|record| record.and_then(from_record))))
    }

    fn save(&self, collection: &str, documents: Vec<MapDocument>) -> Result<usize> {
        let records = documents
            .into_iter()
            .map(to_record)
            .collect::<Result<Vec<_>>>()?;
        self.insert_many(collection, records)
    }

    fn update_by_name(
        &self,
        collection: &str,
        name: &str,
        document: MapDocument,
    ) -> Result<bool> {
        let replaced = self.replace_one(collection, &Filter::name(name), to_record(document)?)?;
        Ok(replaced > 0)
    }

    fn delete_by_name(&self, collection: &str, name: &str) -> Result<u64> {
        self.delete_many(collection, &Filter::name(name))
    }

    fn list_collections(&self) -> Result<Vec<String>> {
        self.collection_names()
    }
}

/// Encodes a document for storage, recomputing its cell count.
pub fn to_record(mut document: MapDocument) -> Result<Record> {
    document.sync_cell_count();
    match serde_json::to_value(&document)? {
        Value::Object(record) => Ok(strip_internal(record)),
        other => Err(StoreError::Serialization(format!(
            "map document encoded as {other}, expected an object"
        ))),
    }
}

/// Decodes a stored record, dropping internal fields.
pub fn from_record(record: Record) -> Result<MapDocument> {
    serde_json::from_value(Value::Object(strip_internal(record)))
        .map_err(|err| StoreError::CorruptedData(err.to_string()))
}
