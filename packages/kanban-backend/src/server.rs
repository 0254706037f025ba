/// HTTP server: spawns axum on a background tokio task.
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::api_router;
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Cannot bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] kanban_core::StoreError),
}

/// The full application: `/api/v1/...` routes behind a permissive CORS layer.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api_router())
        .layer(cors)
        .with_state(state)
}

/// Bind and serve in the background. Returns the port actually bound, which
/// differs from `state.port` when that is 0.
pub async fn spawn_server(state: AppState) -> Result<u16, ServerError> {
    let addr = format!("{}:{}", state.bind_address, state.port);
    let bind_address = state.bind_address.clone();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    let actual_port = listener
        .local_addr()
        .map_err(|source| ServerError::Bind { addr, source })?
        .port();

    log::info!(
        "[kanban.server] Listening on http://{}:{}/api",
        bind_address,
        actual_port
    );

    let app = app(state);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            log::error!("[kanban.server] HTTP server exited with error: {}", e);
        }
    });

    Ok(actual_port)
}
