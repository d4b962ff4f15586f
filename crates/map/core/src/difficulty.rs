//! Heuristic difficulty scoring of a cell layout.
//!
//! Score = 15 per monster + 2 per door + 1 per furniture piece
//!       + 50 x wall density + 30 x fill ratio,
//! where densities are relative to the grid area. Buckets: below 20 is
//! [`Difficulty::Easy`], below 50 [`Difficulty::Medium`], below 80
//! [`Difficulty::Hard`], anything else [`Difficulty::VeryHard`].

use std::collections::{BTreeMap, BTreeSet};

use crate::document::{CellRecord, Difficulty};
use crate::grid::{MapDimensions, is_wall};

const MONSTER_WEIGHT: f64 = 15.0;
const DOOR_WEIGHT: f64 = 2.0;
const FURNITURE_WEIGHT: f64 = 1.0;
const WALL_DENSITY_WEIGHT: f64 = 50.0;
const FILL_RATIO_WEIGHT: f64 = 30.0;

const FURNITURE: [&str; 4] = ["table", "chair", "bed", "chest"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DifficultyAssessment {
    pub level: Difficulty,
    pub score: u32,
}

impl Difficulty {
    pub fn from_score(score: f64) -> Self {
        if score < 20.0 {
            Difficulty::Easy
        } else if score < 50.0 {
            Difficulty::Medium
        } else if score < 80.0 {
            Difficulty::Hard
        } else {
            Difficulty::VeryHard
        }
    }
}

/// Scores `cells` laid out on a grid of `grid_size`.
///
/// Empty cells are ignored. When several records share a position only the
/// last one counts, matching how the editor keys cells by coordinate.
pub fn assess(cells: &[CellRecord], grid_size: MapDimensions) -> DifficultyAssessment {
    let mut latest = BTreeMap::new();
    for cell in cells {
        latest.insert((cell.x, cell.y), cell);
    }

    let mut monsters = 0u32;
    let mut doors = 0u32;
    let mut walls = 0u32;
    let mut furniture = 0u32;
    let mut filled = BTreeSet::new();

    for (position, cell) in latest {
        if cell.is_empty() {
            continue;
        }
        filled.insert(position);
        match cell.kind.as_str() {
            "monster" => monsters += 1,
            "door" => doors += 1,
            kind if is_wall(kind) => walls += 1,
            kind if FURNITURE.contains(&kind) => furniture += 1,
            _ => {}
        }
    }

    let area = grid_size.area().max(1) as f64;
    let score = f64::from(monsters) * MONSTER_WEIGHT
        + f64::from(doors) * DOOR_WEIGHT
        + f64::from(walls) / area * WALL_DENSITY_WEIGHT
        + f64::from(furniture) * FURNITURE_WEIGHT
        + filled.len() as f64 / area * FILL_RATIO_WEIGHT;

    DifficultyAssessment {
        level: Difficulty::from_score(score),
        score: score.round() as u32,
    }
}
