//! Aggregate views over the map collection.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::State;
use map_core::Difficulty;
use map_store::MapDocuments;
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct MapStats {
    pub total_maps: usize,
    /// Every level is present, possibly with a zero count.
    pub difficulty_counts: BTreeMap<Difficulty, usize>,
}

impl MapStats {
    fn empty() -> Self {
        Self {
            total_maps: 0,
            difficulty_counts: Difficulty::iter().map(|level| (level, 0)).collect(),
        }
    }

    fn record(&mut self, difficulty: Option<Difficulty>) {
        self.total_maps += 1;
        if let Some(level) = difficulty {
            *self.difficulty_counts.entry(level).or_default() += 1;
        }
    }
}

pub async fn map_stats(State(state): State<AppState>) -> ApiResult<Json<MapStats>> {
    let stats = state
        .with_store(|store, collection| {
            let mut stats = MapStats::empty();
            for document in store.fetch_all(collection)? {
                stats.record(document?.difficulty);
            }
            Ok(stats)
        })
        .await?;

    Ok(Json(stats))
}

pub async fn list_collections(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    let names = state
        .with_store(|store, _| store.list_collections())
        .await?;
    Ok(Json(names))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_without_difficulty_count_towards_total_only() {
        let mut stats = MapStats::empty();
        stats.record(Some(Difficulty::Hard));
        stats.record(None);

        assert_eq!(stats.total_maps, 2);
        assert_eq!(stats.difficulty_counts[&Difficulty::Hard], 1);
        assert_eq!(stats.difficulty_counts.values().sum::<usize>(), 1);
    }
}
