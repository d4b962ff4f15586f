//! Random layout generation. Nothing is persisted.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use map_core::{CellRecord, DifficultyAssessment, MapDimensions, generate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// Largest side accepted by `POST /api/generate`.
pub const MAX_GENERATED_SIDE: u32 = 200;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub width: u32,
    pub height: u32,
    /// Fixed seed for a reproducible layout.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub grid_size: MapDimensions,
    pub rooms: usize,
    pub cells: Vec<CellRecord>,
    pub cell_count: usize,
    pub difficulty: DifficultyAssessment,
}

pub async fn generate_layout(
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> ApiResult<Json<GenerateResponse>> {
    let Json(request) = payload?;
    if request.width > MAX_GENERATED_SIDE || request.height > MAX_GENERATED_SIDE {
        return Err(ApiError::InvalidInput(format!(
            "generated maps are limited to {MAX_GENERATED_SIDE}x{MAX_GENERATED_SIDE}"
        )));
    }

    let layout = match request.seed {
        Some(seed) => generate(request.width, request.height, &mut StdRng::seed_from_u64(seed)),
        None => generate(request.width, request.height, &mut rand::rng()),
    }?;

    tracing::debug!(
        rooms = layout.rooms,
        "Generated {} layout with {} cells",
        layout.grid_size,
        layout.cells.len()
    );
    Ok(Json(GenerateResponse {
        grid_size: layout.grid_size,
        rooms: layout.rooms,
        cell_count: layout.cells.len(),
        cells: layout.cells,
        difficulty: layout.difficulty,
    }))
}
