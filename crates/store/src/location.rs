//! Store URIs.
//!
//! ```text
//! memory://            process-local store, lost on exit
//! file:///var/lib/maps one directory per namespace under the given path
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Result, StoreError};
use crate::file::FileDocumentStore;
use crate::memory::InMemoryDocumentStore;
use crate::traits::DocumentStore;

const MEMORY_SCHEME: &str = "memory://";
const FILE_SCHEME: &str = "file://";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    File(PathBuf),
}

impl StoreLocation {
    /// Connects to the backend. `namespace` selects the database within it.
    pub fn open(&self, namespace: &str) -> Result<Arc<dyn DocumentStore>> {
        match self {
            StoreLocation::Memory => {
                tracing::info!("Using in-memory document store ({})", namespace);
                Ok(Arc::new(InMemoryDocumentStore::new()))
            }
            StoreLocation::File(base) => {
                let store = FileDocumentStore::open(base.join(namespace))?;
                tracing::info!(
                    "Using file document store at {}",
                    store.base_dir().display()
                );
                Ok(Arc::new(store))
            }
        }
    }
}

impl FromStr for StoreLocation {
    type Err = StoreError;

    fn from_str(uri: &str) -> Result<Self> {
        let uri = uri.trim();
        if uri == MEMORY_SCHEME {
            return Ok(StoreLocation::Memory);
        }
        match uri.strip_prefix(FILE_SCHEME) {
            Some(path) if !path.is_empty() => Ok(StoreLocation::File(PathBuf::from(path))),
            _ => Err(StoreError::Unavailable(format!(
                "unsupported store URI '{uri}' (expected {MEMORY_SCHEME} or {FILE_SCHEME}<path>)"
            ))),
        }
    }
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreLocation::Memory => f.write_str(MEMORY_SCHEME),
            StoreLocation::File(path) => write!(f, "{FILE_SCHEME}{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_supported_schemes() {
        assert_eq!("memory://".parse::<StoreLocation>().unwrap(), StoreLocation::Memory);
        assert_eq!(
            "file:///tmp/maps".parse::<StoreLocation>().unwrap(),
            StoreLocation::File(PathBuf::from("/tmp/maps"))
        );
        assert!("mongodb://localhost:27017".parse::<StoreLocation>().is_err());
        assert!("file://".parse::<StoreLocation>().is_err());
    }

    #[test]
    fn file_location_opens_namespace_directory() {
        let temp_dir = TempDir::new().unwrap();
        let location = StoreLocation::File(temp_dir.path().to_path_buf());

        let store = location.open("dnd_dev").unwrap();
        store.insert_many("maps", vec![crate::Record::new()]).unwrap();

        assert!(temp_dir.path().join("dnd_dev").join("maps").is_dir());
    }
}
