//! Placeable game objects.

use std::fmt;

use super::Position;

/// Handle to an object owned by a [`Map`](super::Map).
///
/// Handles are assigned on placement and never reused within a map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Something placed on the map: shared identity plus a per-kind payload.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameObject {
    pub name: String,
    /// Single glyph used when the map is drawn as text.
    pub symbol: char,
    pub position: Position,
    pub kind: GameObjectKind,
}

impl GameObject {
    pub fn new(
        name: impl Into<String>,
        symbol: char,
        position: Position,
        kind: GameObjectKind,
    ) -> Self {
        Self {
            name: name.into(),
            symbol,
            position,
            kind,
        }
    }

    pub fn monster(
        name: impl Into<String>,
        position: Position,
        level: u32,
        species: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            'M',
            position,
            GameObjectKind::Monster {
                level,
                species: species.into(),
            },
        )
    }

    pub fn character(name: impl Into<String>, position: Position, hp: u32) -> Self {
        Self::new(name, '@', position, GameObjectKind::Character { hp })
    }

    pub fn furniture(
        name: impl Into<String>,
        position: Position,
        width: u32,
        height: u32,
        material: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            'F',
            position,
            GameObjectKind::Furniture {
                width,
                height,
                material: material.into(),
            },
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum GameObjectKind {
    Monster {
        level: u32,
        species: String,
    },
    Character {
        hp: u32,
    },
    Furniture {
        width: u32,
        height: u32,
        material: String,
    },
}

impl GameObjectKind {
    pub fn category(&self) -> ObjectCategory {
        match self {
            Self::Monster { .. } => ObjectCategory::Monster,
            Self::Character { .. } => ObjectCategory::Character,
            Self::Furniture { .. } => ObjectCategory::Furniture,
        }
    }
}

/// Payload-free tag of a [`GameObjectKind`], used for counting.
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
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum ObjectCategory {
    Monster,
    Character,
    Furniture,
}
