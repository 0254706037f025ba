use kanban_backend::config::{default_config_path, load_config};
use std::path::PathBuf;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);
    let config = load_config(&config_path);

    if let Err(e) = kanban_backend::start(&config).await {
        log::error!("[kanban.backend] Failed to start: {}", e);
        std::process::exit(1);
    }

    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("[kanban.backend] Shutting down"),
        Err(e) => log::error!("[kanban.backend] Cannot listen for shutdown signal: {}", e),
    }
}
