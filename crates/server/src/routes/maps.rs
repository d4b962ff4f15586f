//! CRUD handlers for map documents.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use map_core::{
    CellRecord, Difficulty, DifficultyAssessment, Map, MapDimensions, MapDocument, MapStatistics,
    assess,
};
use map_store::{MapDocuments, SaveController, SaveStrategy};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Entry of `GET /api/maps`.
#[derive(Debug, Serialize)]
pub struct MapSummary {
    pub name: String,
    pub difficulty: Option<Difficulty>,
}

/// Body of `PUT /api/maps/{name}`. Absent fields keep their stored value.
///
/// `difficulty` and `timestamp` are optional on the document, so an explicit
/// `null` clears them. For the other fields `null` is the same as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPatch {
    pub cells: Option<Vec<CellRecord>>,
    pub grid_size: Option<MapDimensions>,
    pub zoom: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub difficulty: Option<Option<Difficulty>>,
    #[serde(default, deserialize_with = "nullable")]
    pub timestamp: Option<Option<String>>,
}

/// Present fields decode to `Some`, including `Some(None)` for `null`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl MapPatch {
    fn validate(&self) -> ApiResult<()> {
        if let Some(grid_size) = self.grid_size {
            validate_grid_size(grid_size)?;
        }
        if let Some(zoom) = self.zoom {
            validate_zoom(zoom)?;
        }
        Ok(())
    }

    fn apply(self, document: &mut MapDocument) {
        if let Some(cells) = self.cells {
            document.cells = cells;
        }
        if let Some(grid_size) = self.grid_size {
            document.grid_size = grid_size;
        }
        if let Some(zoom) = self.zoom {
            document.zoom = zoom;
        }
        if let Some(difficulty) = self.difficulty {
            document.difficulty = difficulty;
        }
        if let Some(timestamp) = self.timestamp {
            document.timestamp = timestamp;
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MapAnalysis {
    pub name: String,
    pub difficulty: DifficultyAssessment,
    pub statistics: MapStatistics,
}

/// Largest side accepted for a stored map.
pub const MAX_GRID_SIDE: u32 = 1_000;

fn validate_grid_size(grid_size: MapDimensions) -> ApiResult<()> {
    if grid_size.width == 0 || grid_size.height == 0 {
        return Err(ApiError::InvalidInput(format!(
            "gridSize must be positive, got {grid_size}"
        )));
    }
    if grid_size.width > MAX_GRID_SIDE || grid_size.height > MAX_GRID_SIDE {
        return Err(ApiError::InvalidInput(format!(
            "gridSize is limited to {MAX_GRID_SIDE}x{MAX_GRID_SIDE}, got {grid_size}"
        )));
    }
    Ok(())
}

fn validate_zoom(zoom: f64) -> ApiResult<()> {
    if !zoom.is_finite() || zoom <= 0.0 {
        return Err(ApiError::InvalidInput(format!(
            "zoom must be a positive number, got {zoom}"
        )));
    }
    Ok(())
}

fn validate_document(document: &MapDocument) -> ApiResult<()> {
    if document.name.trim().is_empty() {
        return Err(ApiError::InvalidInput("Map name is required".to_owned()));
    }
    validate_grid_size(document.grid_size)?;
    validate_zoom(document.zoom)
}

fn message(text: String) -> Json<Value> {
    Json(json!({ "message": text }))
}

pub async fn list_maps(State(state): State<AppState>) -> ApiResult<Json<Vec<MapSummary>>> {
    let summaries = state
        .with_store(|store, collection| {
            store
                .fetch_all(collection)?
                .map(|document| {
                    document.map(|d| MapSummary {
                        name: d.name,
                        difficulty: d.difficulty,
                    })
                })
                .collect::<map_store::Result<Vec<_>>>()
        })
        .await?;

    Ok(Json(summaries))
}

pub async fn get_map(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<MapDocument>> {
    let document = state
        .with_store(move |store, collection| store.fetch_by_name(collection, &name))
        .await?
        .ok_or_else(ApiError::map_not_found)?;

    Ok(Json(document))
}

pub async fn create_map(
    State(state): State<AppState>,
    payload: Result<Json<MapDocument>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(document) = payload?;
    validate_document(&document)?;
    let name = document.name.clone();

    let lookup = name.clone();
    let exists = state
        .with_store(move |store, collection| store.fetch_by_name(collection, &lookup))
        .await?
        .is_some();
    if exists {
        return Err(ApiError::Conflict(format!("Map '{name}' already exists")));
    }

    // A concurrent create can still win the race; the store then reports
    // DuplicateName, which also maps to 409.
    state
        .with_store(move |store, collection| store.save(collection, vec![document]))
        .await?;

    tracing::info!("Created map '{}' in '{}'", name, state.collection());
    Ok((StatusCode::CREATED, message(format!("Map '{name}' created"))))
}

/// Response of `POST /api/save`.
#[derive(Debug, Serialize)]
pub struct SaveSummary {
    pub message: String,
    pub strategy: String,
    pub saved: usize,
}

/// Saves a batch of documents through the save policy. A batch without any
/// content is replaced by the placeholder map.
pub async fn save_maps(
    State(state): State<AppState>,
    payload: Result<Json<Vec<MapDocument>>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SaveSummary>)> {
    let Json(documents) = payload?;
    match SaveController::select(&documents) {
        SaveStrategy::Real => documents.iter().try_for_each(validate_document)?,
        SaveStrategy::Default => {}
    }

    let outcome = state
        .with_store(move |store, collection| SaveController::run(store, collection, documents))
        .await?;

    tracing::info!(
        strategy = %outcome.strategy,
        "Saved {} map(s) to '{}'",
        outcome.saved,
        state.collection()
    );
    Ok((
        StatusCode::CREATED,
        Json(SaveSummary {
            message: format!("Saved {} map(s)", outcome.saved),
            strategy: outcome.strategy.to_string(),
            saved: outcome.saved,
        }),
    ))
}

pub async fn update_map(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<MapPatch>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(patch) = payload?;
    patch.validate()?;

    let target = name.clone();
    let updated = state
        .with_store(move |store, collection| {
            let Some(mut document) = store.fetch_by_name(collection, &target)? else {
                return Ok(false);
            };
            patch.apply(&mut document);
            store.update_by_name(collection, &target, document)
        })
        .await?;

    if !updated {
        return Err(ApiError::map_not_found());
    }
    tracing::info!("Updated map '{}'", name);
    Ok(message(format!("Map '{name}' updated")))
}

pub async fn delete_map(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Value>> {
    let target = name.clone();
    let deleted = state
        .with_store(move |store, collection| store.delete_by_name(collection, &target))
        .await?;

    if deleted == 0 {
        return Err(ApiError::map_not_found());
    }
    tracing::info!("Deleted map '{}'", name);
    Ok(message(format!("Map '{name}' deleted")))
}

/// Difficulty score and layout statistics of a stored map.
pub async fn analyze_map(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<MapAnalysis>> {
    let document = state
        .with_store(move |store, collection| store.fetch_by_name(collection, &name))
        .await?
        .ok_or_else(ApiError::map_not_found)?;

    let map = Map::from_document(&document)?;
    Ok(Json(MapAnalysis {
        difficulty: assess(&document.cells, document.grid_size),
        statistics: map.statistics(),
        name: document.name,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_only_touches_present_fields() {
        let mut document = MapDocument::new("m1", MapDimensions::new(5, 5))
            .with_cells(vec![CellRecord::new(0, 0, "wall")]);
        document.difficulty = Some(Difficulty::Easy);

        let patch: MapPatch = serde_json::from_value(json!({"zoom": 2.5})).unwrap();
        patch.apply(&mut document);

        assert_eq!(document.zoom, 2.5);
        assert_eq!(document.cells.len(), 1);
        assert_eq!(document.difficulty, Some(Difficulty::Easy));
        assert_eq!(document.grid_size, MapDimensions::new(5, 5));
    }

    #[test]
    fn patch_null_clears_optional_fields() {
        let mut document = MapDocument {
            difficulty: Some(Difficulty::Hard),
            timestamp: Some("2026-01-01T00:00:00Z".to_owned()),
            zoom: 1.5,
            ..MapDocument::new("m1", MapDimensions::new(5, 5))
        };

        let patch: MapPatch =
            serde_json::from_value(json!({"difficulty": null, "timestamp": null, "zoom": null}))
                .unwrap();
        assert_eq!(patch.difficulty, Some(None));
        assert!(patch.zoom.is_none());
        patch.apply(&mut document);

        assert_eq!(document.difficulty, None);
        assert_eq!(document.timestamp, None);
        assert_eq!(document.zoom, 1.5);

        let replaced: MapPatch = serde_json::from_value(json!({"difficulty": "EASY"})).unwrap();
        assert_eq!(replaced.difficulty, Some(Some(Difficulty::Easy)));
        assert!(replaced.timestamp.is_none());
    }

    #[test]
    fn document_validation() {
        let valid = MapDocument::new("m1", MapDimensions::DEFAULT);
        assert!(validate_document(&valid).is_ok());

        let unnamed = MapDocument::new("  ", MapDimensions::DEFAULT);
        assert!(matches!(
            validate_document(&unnamed),
            Err(ApiError::InvalidInput(_))
        ));

        let flat = MapDocument::new("m1", MapDimensions::new(0, 4));
        assert!(validate_document(&flat).is_err());

        let sprawling = MapDocument::new("m1", MapDimensions::new(MAX_GRID_SIDE + 1, 4));
        assert!(validate_document(&sprawling).is_err());

        let zoomed_out = MapDocument {
            zoom: 0.0,
            ..MapDocument::new("m1", MapDimensions::DEFAULT)
        };
        assert!(validate_document(&zoomed_out).is_err());
    }
}
