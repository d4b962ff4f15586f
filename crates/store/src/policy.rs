//! Save policy: real save versus placeholder save.
//!
//! Callers never special-case "nothing to save". [`SaveController::run`]
//! inspects the candidate documents and either persists them as they are or,
//! when they carry no content, persists a single canonical placeholder map.
//! Either way exactly one store write happens per call.

use map_core::{CellRecord, MapDimensions, MapDocument};

use crate::adapter::MapDocuments;
use crate::error::Result;
use crate::traits::DocumentStore;

/// Name given to the placeholder when no candidate carries one.
pub const PLACEHOLDER_NAME: &str = "default_map";
const PLACEHOLDER_TIMESTAMP: &str = "2025-10-25T13:25:51.522Z";
const PLACEHOLDER_WALL_COLOR: &str = "#6b7280";

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SaveStrategy {
    /// Persist the canonical placeholder instead of an empty payload.
    Default,
    /// Persist the candidate documents.
    Real,
}

impl SaveStrategy {
    fn run<S>(self, store: &S, collection: &str, documents: Vec<MapDocument>) -> Result<usize>
    where
        S: DocumentStore + ?Sized,
    {
        match self {
            SaveStrategy::Real => {
                tracing::info!(
                    "Saving {} map(s) to '{}'",
                    documents.len(),
                    collection
                );
                store.save(collection, documents)
            }
            SaveStrategy::Default => {
                let name = documents
                    .iter()
                    .map(|document| document.name.as_str())
                    .find(|name| !name.is_empty())
                    .unwrap_or(PLACEHOLDER_NAME);
                tracing::info!(
                    "Nothing to save, storing placeholder '{}' in '{}'",
                    name,
                    collection
                );
                store.save(collection, vec![placeholder_document(name)])
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaveOutcome {
    pub strategy: SaveStrategy,
    pub saved: usize,
}

/// Stateless selector between [`SaveStrategy::Real`] and [`SaveStrategy::Default`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SaveController;

impl SaveController {
    /// A set is empty when it has no documents, no document has cells, or no
    /// cell anywhere carries a tag.
    pub fn is_empty_set(documents: &[MapDocument]) -> bool {
        documents.iter().all(MapDocument::is_blank)
    }

    pub fn select(documents: &[MapDocument]) -> SaveStrategy {
        if Self::is_empty_set(documents) {
            SaveStrategy::Default
        } else {
            SaveStrategy::Real
        }
    }

    pub fn run<S>(store: &S, collection: &str, documents: Vec<MapDocument>) -> Result<SaveOutcome>
    where
        S: DocumentStore + ?Sized,
    {
        let strategy = Self::select(&documents);
        let saved = strategy.run(store, collection, documents)?;
        Ok(SaveOutcome { strategy, saved })
    }
}

/// The canonical "nothing to save" map: 30x20, one wall cell at (1, 1).
pub fn placeholder_document(name: &str) -> MapDocument {
    MapDocument {
        timestamp: Some(PLACEHOLDER_TIMESTAMP.to_owned()),
        ..MapDocument::new(name, MapDimensions::new(30, 20))
    }
    .with_cells(vec![
        CellRecord::new(1, 1, "wall").with_style(PLACEHOLDER_WALL_COLOR, ""),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryDocumentStore;

    fn doc(name: &str, kinds: &[&str]) -> MapDocument {
        let cells = kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| CellRecord::new(i as i32, 0, *kind))
            .collect();
        MapDocument::new(name, MapDimensions::DEFAULT).with_cells(cells)
    }

    #[test]
    fn emptiness_rule() {
        assert!(SaveController::is_empty_set(&[]));
        assert!(SaveController::is_empty_set(&[doc("a", &[]), doc("b", &[])]));
        assert!(SaveController::is_empty_set(&[doc("a", &["", ""]), doc("b", &[""])]));
        assert!(!SaveController::is_empty_set(&[doc("a", &[""]), doc("b", &["wall"])]));
    }

    #[test]
    fn empty_input_stores_exactly_one_placeholder() {
        let store = InMemoryDocumentStore::new();

        let outcome = SaveController::run(&store, "maps", vec![]).unwrap();

        assert_eq!(outcome.strategy, SaveStrategy::Default);
        assert_eq!(outcome.saved, 1);
        let stored: Vec<_> = store
            .fetch_all("maps")
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(stored, vec![placeholder_document(PLACEHOLDER_NAME)]);
    }

    #[test]
    fn blank_documents_store_named_placeholder() {
        let store = InMemoryDocumentStore::new();

        let outcome =
            SaveController::run(&store, "maps", vec![doc("first", &[""]), doc("second", &[])])
                .unwrap();

        assert_eq!(outcome.saved, 1);
        let stored = store.fetch_by_name("maps", "first").unwrap().unwrap();
        assert_eq!(stored.grid_size, MapDimensions::new(30, 20));
        assert_eq!(stored.cells, vec![
            CellRecord::new(1, 1, "wall").with_style("#6b7280", "")
        ]);
        assert_eq!(stored.cell_count, 1);
        assert_eq!(stored.zoom, 1.0);
        assert!(store.fetch_by_name("maps", "second").unwrap().is_none());
    }

    #[test]
    fn content_stores_all_documents_unchanged() {
        let store = InMemoryDocumentStore::new();
        let input = vec![doc("a", &["wall"]), doc("b", &[""])];

        let outcome = SaveController::run(&store, "maps", input.clone()).unwrap();

        assert_eq!(outcome.strategy, SaveStrategy::Real);
        assert_eq!(outcome.saved, 2);
        let stored: Vec<_> = store
            .fetch_all("maps")
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(stored, input);
    }
}
