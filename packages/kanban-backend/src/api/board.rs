use axum::{
    extract::{Path, State},
    response::Json,
};
use kanban_core::types::{Card, CardId, ColumnRecord};

use super::{store_failure, ApiError};
use crate::state::AppState;

pub async fn list_columns(State(state): State<AppState>) -> Result<Json<Vec<ColumnRecord>>, ApiError> {
    state
        .store
        .load_columns()
        .await
        .map(Json)
        .map_err(|e| store_failure("kanban.api.list_columns", e))
}

pub async fn list_cards(State(state): State<AppState>) -> Result<Json<Vec<Card>>, ApiError> {
    state
        .store
        .load_cards()
        .await
        .map(Json)
        .map_err(|e| store_failure("kanban.api.list_cards", e))
}

pub async fn create_card(
    State(state): State<AppState>,
    Json(card): Json<Card>,
) -> Result<Json<Card>, ApiError> {
    let stored = state
        .store
        .create_card(&card)
        .await
        .map_err(|e| store_failure("kanban.api.create_card", e))?;
    log::info!(target: "kanban.api.create_card", "Stored card {}", stored.id);
    Ok(Json(stored))
}

pub async fn delete_card(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = CardId::new(card_id);
    state
        .store
        .delete_card(&id)
        .await
        .map_err(|e| store_failure("kanban.api.delete_card", e))?;
    log::info!(target: "kanban.api.delete_card", "Deleted card {}", id);
    Ok(Json(serde_json::json!({})))
}
