//! Persistence layer for map documents.
//!
//! The store is a named-collection document database: each collection holds
//! JSON records, every record gets an internal `_id` assigned by the backend,
//! and map names are unique within a collection.
//!
//! Modules are organized by responsibility:
//! - [`traits`] defines the record-level [`DocumentStore`] contract
//! - [`memory`] and [`file`] provide the two backends
//! - [`adapter`] maps [`map_core::MapDocument`]s onto records ([`MapDocuments`])
//! - [`policy`] picks between a real save and the placeholder save
//! - [`location`] resolves a store URI into a live backend
pub mod adapter;
pub mod error;
pub mod file;
pub mod location;
pub mod memory;
pub mod policy;
pub mod record;
pub mod traits;

pub use adapter::{MapDocumentIter, MapDocuments};
pub use error::{Result, StoreError};
pub use file::FileDocumentStore;
pub use location::StoreLocation;
pub use memory::InMemoryDocumentStore;
pub use policy::{SaveController, SaveOutcome, SaveStrategy, placeholder_document};
pub use record::{Filter, ID_FIELD, NAME_FIELD, Record};
pub use traits::{DocumentStore, RecordIter};
