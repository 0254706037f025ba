use axum::{
    http::StatusCode,
    response::Json,
    routing::{delete, get},
    Router,
};
use kanban_core::StoreError;
use serde::Serialize;

mod board;
mod order;

use crate::state::AppState;

/// Axum REST API routes, mounted under `/api`.
///
///   GET    /v1/columns         -> all columns
///   GET    /v1/cards           -> all cards
///   POST   /v1/cards           -> store a card (upsert), echo it back
///   DELETE /v1/cards/{cardId}  -> remove a card (order map untouched)
///   GET    /v1/cardsOrder      -> full order map
///   PATCH  /v1/cardsOrder      -> merge a partial order map, return the full map
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/v1/columns", get(board::list_columns))
        .route("/v1/cards", get(board::list_cards).post(board::create_card))
        .route("/v1/cards/{card_id}", delete(board::delete_card))
        .route(
            "/v1/cardsOrder",
            get(order::get_order).patch(order::patch_order),
        )
}

// ── Shared types and helpers used across sub-modules ────────────────────

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn log_api_issue(status: StatusCode, target: &'static str, message: impl AsRef<str>) {
    let message = message.as_ref();
    if status.is_server_error() {
        log::error!(target: target, "{}", message);
    } else {
        log::warn!(target: target, "{}", message);
    }
}

fn store_error_status(error: &StoreError) -> StatusCode {
    match error {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Api { .. } | StoreError::Transport(_) => StatusCode::BAD_GATEWAY,
        StoreError::Serialization(_) | StoreError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Log a failed store call and turn it into an error response.
fn store_failure(target: &'static str, error: StoreError) -> ApiError {
    let status = store_error_status(&error);
    let error = error.to_string();
    log_api_issue(status, target, &error);
    (status, Json(ErrorResponse { error }))
}
