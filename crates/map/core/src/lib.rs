//! Domain model for the tabletop map editor.
//!
//! `map-core` defines the persisted map document (cells, grid size,
//! difficulty) and the in-memory grid model the editor works on. Everything
//! here is pure: persistence lives in `map-store`, the HTTP surface in
//! `map-server`.
//!
//! Modules are organized by responsibility:
//! - [`document`] holds the wire/persistence representation of a map
//! - [`grid`] hosts the spatial model ([`Map`], [`Cell`], [`GameObject`])
//! - [`difficulty`] scores a cell layout into a [`Difficulty`] level
//! - [`generator`] produces random dungeon layouts
pub mod difficulty;
pub mod document;
pub mod error;
pub mod generator;
pub mod grid;

pub use difficulty::{DifficultyAssessment, assess};
pub use document::{CellRecord, Difficulty, MapDocument};
pub use error::{GridError, Result};
pub use generator::{GeneratedLayout, generate};
pub use grid::{
    Cell, GameObject, GameObjectKind, Label, Map, MapDimensions, MapStatistics, ObjectCategory,
    ObjectId, Position, Room, Rooms,
};
