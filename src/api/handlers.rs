//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use super::AppState;
use super::types::{ErrorResponse, FixtureResponse, WattageQuery, WattageResponse};
use crate::guard;
use crate::wattage::engine::{compute_wattage, format_wattage, max_wattage};
use crate::wattage::types::{ChannelPercentages, WattageCalculationResult};

/// `GET /fixture` → 200 + `FixtureResponse` JSON
pub async fn get_fixture(State(state): State<Arc<AppState>>) -> Json<FixtureResponse> {
    Json(FixtureResponse {
        max_wattage: max_wattage(),
        theoretical_max_wattage: state.table.theoretical_max_wattage(),
        table: state.table.clone(),
    })
}

/// `GET /wattage?red=R&green=G&blue=B&white=W` → 200 + `WattageResponse` JSON
///
/// Like the engine, this never rejects a level; use `/commands/check` for that.
pub async fn get_wattage(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WattageQuery>,
) -> Json<WattageResponse> {
    let channels = ChannelPercentages::from(query);
    let result = compute_wattage(&channels, &state.table);
    Json(WattageResponse {
        display: format_wattage(result.total_wattage),
        result,
    })
}

/// `POST /commands/check` with `ChannelPercentages` JSON
///
/// → 200 + `WattageCalculationResult` when the guard accepts the command,
/// → 422 + `ErrorResponse` when it refuses.
pub async fn check_command(
    State(state): State<Arc<AppState>>,
    Json(channels): Json<ChannelPercentages>,
) -> Result<Json<WattageCalculationResult>, (StatusCode, Json<ErrorResponse>)> {
    guard::check_command(&state.table, &channels, state.policy)
        .map(Json)
        .map_err(|e| {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
        })
}
