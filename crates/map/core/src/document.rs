//! Persisted representation of a map.
//!
//! A [`MapDocument`] is the unit of persistence: it is what clients POST, what
//! the store keeps, and what `GET /api/maps/{name}` returns. The JSON shape is
//! camelCase (`gridSize`, `cellCount`) to match the editor frontend.

use crate::grid::MapDimensions;

/// Difficulty bucket of a map.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    VeryHard,
}

/// One cell of a stored map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRecord {
    pub x: i32,
    pub y: i32,
    /// Terrain/object tag. Empty means "nothing here".
    #[cfg_attr(
        feature = "serde",
        serde(rename = "type", default, deserialize_with = "wire::cell_type")
    )]
    pub kind: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub color: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub icon: String,
}

impl CellRecord {
    pub fn new(x: i32, y: i32, kind: impl Into<String>) -> Self {
        Self {
            x,
            y,
            kind: kind.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_style(mut self, color: impl Into<String>, icon: impl Into<String>) -> Self {
        self.color = color.into();
        self.icon = icon.into();
        self
    }

    /// A cell is empty when it carries no terrain/object tag.
    ///
    /// Absent, `null`, `0` and `false` tags are normalized to `""` when a
    /// document is decoded, so an empty string covers all of them.
    pub fn is_empty(&self) -> bool {
        self.kind.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MapDocument {
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub grid_size: MapDimensions,
    #[cfg_attr(feature = "serde", serde(default = "default_zoom"))]
    pub zoom: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cells: Vec<CellRecord>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub timestamp: Option<String>,
    /// Denormalized `cells.len()`; see [`MapDocument::sync_cell_count`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub cell_count: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub difficulty: Option<Difficulty>,
}

fn default_zoom() -> f64 {
    1.0
}

impl Default for MapDocument {
    fn default() -> Self {
        Self {
            name: String::new(),
            grid_size: MapDimensions::DEFAULT,
            zoom: default_zoom(),
            cells: Vec::new(),
            timestamp: None,
            cell_count: 0,
            difficulty: None,
        }
    }
}

impl MapDocument {
    pub fn new(name: impl Into<String>, grid_size: MapDimensions) -> Self {
        Self {
            name: name.into(),
            grid_size,
            ..Self::default()
        }
    }

    /// Recomputes `cell_count` from `cells`. Writers call this before every
    /// store write; the client-supplied count is never trusted.
    pub fn sync_cell_count(&mut self) {
        self.cell_count = self.cells.len();
    }

    #[must_use]
    pub fn with_cells(mut self, cells: Vec<CellRecord>) -> Self {
        self.cells = cells;
        self.sync_cell_count();
        self
    }

    /// True when no cell carries a tag (including when there are no cells).
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CellRecord::is_empty)
    }
}

#[cfg(feature = "serde")]
mod wire {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCellType {
        Text(String),
        Flag(bool),
        Number(f64),
    }

    /// Accepts a string tag or one of the legacy falsy sentinels.
    pub(super) fn cell_type<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawCellType>::deserialize(deserializer)?;
        Ok(match raw {
            Some(RawCellType::Text(text)) => text,
            Some(RawCellType::Flag(false)) | None => String::new(),
            Some(RawCellType::Number(n)) if n == 0.0 => String::new(),
            Some(RawCellType::Flag(true)) => "true".to_owned(),
            Some(RawCellType::Number(n)) => n.to_string(),
        })
    }
}

