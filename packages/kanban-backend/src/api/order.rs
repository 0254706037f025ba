use axum::{extract::State, response::Json};
use kanban_core::order::{OrderMap, OrderPatch};

use super::{store_failure, ApiError};
use crate::state::AppState;

pub async fn get_order(State(state): State<AppState>) -> Result<Json<OrderMap>, ApiError> {
    state
        .store
        .load_order()
        .await
        .map(Json)
        .map_err(|e| store_failure("kanban.api.get_order", e))
}

pub async fn patch_order(
    State(state): State<AppState>,
    Json(patch): Json<OrderPatch>,
) -> Result<Json<OrderMap>, ApiError> {
    let merged = state
        .store
        .patch_order(&patch)
        .await
        .map_err(|e| store_failure("kanban.api.patch_order", e))?;
    log::debug!(
        target: "kanban.api.patch_order",
        "Merged {} key(s), order map now has {}",
        patch.len(),
        merged.len()
    );
    Ok(Json(merged))
}
