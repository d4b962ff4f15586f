//! HTTP surface of the map editor backend.
//!
//! The binary in `main.rs` loads [`ServerConfig`], opens the document store
//! and serves [`build_router`]. Tests build the same router over an
//! in-memory store.

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use routes::build_router;
pub use state::AppState;
