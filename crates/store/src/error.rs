//! Error types raised by document store implementations.

use thiserror::Error;

/// Errors surfaced by document store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a map named '{0}' already exists")]
    DuplicateName(String),

    #[error("document store unavailable: {0}")]
    Unavailable(String),

    #[error("document store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

impl StoreError {
    /// Returns a static string identifier for this error variant.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateName(_) => "STORE_DUPLICATE_NAME",
            Self::Unavailable(_) => "STORE_UNAVAILABLE",
            Self::LockPoisoned => "STORE_LOCK_POISONED",
            Self::Io(_) => "STORE_IO",
            Self::Serialization(_) => "STORE_SERIALIZATION",
            Self::CorruptedData(_) => "STORE_CORRUPTED_DATA",
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
