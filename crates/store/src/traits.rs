//! Record-level contract implemented by every backend.

use crate::error::Result;
use crate::record::{Filter, Record};

/// Lazy, finite sequence of records. Each `find` call starts a new one.
pub type RecordIter = Box<dyn Iterator<Item = Result<Record>> + Send>;

/// Named-collection document store.
///
/// Calls are synchronous and block until the backend answers. Implementations
/// must be safe to call from many threads at once; the only coordination they
/// provide is that names stay unique within a collection.
///
/// # Implementations
///
/// - `InMemoryDocumentStore`: process-local maps, for tests and development
/// - `FileDocumentStore`: one JSON file per record under a base directory
pub trait DocumentStore: Send + Sync {
    /// Records of `collection` matching `filter`, in insertion order.
    ///
    /// A collection that does not exist yields an empty sequence.
    fn find(&self, collection: &str, filter: &Filter) -> Result<RecordIter>;

    /// Inserts every record as a new document, assigning internal ids.
    ///
    /// All-or-nothing: if any record's name is already taken (or repeated
    /// within the batch) nothing is written and
    /// [`StoreError::DuplicateName`](crate::StoreError::DuplicateName) is
    /// returned. Returns the number of records inserted.
    fn insert_many(&self, collection: &str, records: Vec<Record>) -> Result<usize>;

    /// Replaces the first record matching `filter`, keeping its internal id.
    ///
    /// Returns the number of records replaced (0 or 1).
    fn replace_one(&self, collection: &str, filter: &Filter, record: Record) -> Result<u64>;

    /// Removes every record matching `filter` and returns how many went away.
    fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64>;

    /// Names of the collections that currently exist, sorted.
    fn collection_names(&self) -> Result<Vec<String>>;

    /// First record matching `filter`, if any.
    fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Record>> {
        self.find(collection, filter)?.next().transpose()
    }

    /// Releases backend resources. Called once on process shutdown.
    fn close(&self) -> Result<()> {
        Ok(())
    }
}
