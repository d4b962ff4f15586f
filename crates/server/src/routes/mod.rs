//! Router assembly.
//!
//! | Route | Handler |
//! |---|---|
//! | `GET /api/health` | [`health`] |
//! | `GET, POST /api/maps` | [`maps::list_maps`], [`maps::create_map`] |
//! | `GET, PUT, DELETE /api/maps/{name}` | [`maps::get_map`], [`maps::update_map`], [`maps::delete_map`] |
//! | `GET /api/maps/{name}/analysis` | [`maps::analyze_map`] |
//! | `POST /api/save` | [`maps::save_maps`] |
//! | `GET /api/stats` | [`stats::map_stats`] |
//! | `GET /api/collections` | [`stats::list_collections`] |
//! | `POST /api/generate` | [`generate::generate_layout`] |

pub mod generate;
pub mod maps;
pub mod stats;

use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/maps", get(maps::list_maps).post(maps::create_map))
        .route(
            "/api/maps/{name}",
            get(maps::get_map)
                .put(maps::update_map)
                .delete(maps::delete_map),
        )
        .route("/api/maps/{name}/analysis", get(maps::analyze_map))
        .route("/api/save", post(maps::save_maps))
        .route("/api/stats", get(stats::map_stats))
        .route("/api/collections", get(stats::list_collections))
        .route("/api/generate", post(generate::generate_layout))
        .with_state(state)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}
