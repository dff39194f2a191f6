use std::sync::Arc;

use proofsheet_pipeline::dispatcher::GenerationDispatcher;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: proofsheet_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Spawns and tracks per-cell image generation.
    pub dispatcher: Arc<GenerationDispatcher>,
}
