pub mod health;
pub mod pages;
pub mod proofs;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /parameters              recognised axis parameters (GET)
/// /proofs                  list, create (GET, POST)
/// /proofs/{id}             proof with per-cell state (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/parameters", get(handlers::proofs::list_parameters))
        .nest("/proofs", proofs::router())
}
