//! Shared request state.
use std::sync::Arc;
use std::time::Duration;

use map_store::{DocumentStore, StoreError};

/// Handle given to every request handler.
///
/// The store is synchronous, so each call runs on the blocking pool and is
/// bounded by `timeout`. A call that overruns is reported as
/// [`StoreError::Unavailable`]; the blocking task itself is left to finish.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn DocumentStore>,
    collection: Arc<str>,
    timeout: Duration,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        collection: impl Into<Arc<str>>,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            collection: collection.into(),
            timeout,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Runs `op` against the store and the configured collection.
    pub async fn with_store<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&dyn DocumentStore, &str) -> map_store::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let collection = Arc::clone(&self.collection);
        let task = tokio::task::spawn_blocking(move || op(store.as_ref(), &collection));

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(StoreError::Unavailable(format!(
                "store call aborted: {join_error}"
            ))),
            Err(_) => Err(StoreError::Unavailable(format!(
                "store call timed out after {} ms",
                self.timeout.as_millis()
            ))),
        }
    }
}
