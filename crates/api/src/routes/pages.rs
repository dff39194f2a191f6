//! Browser-facing routes, mounted at the root.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::pages;
use crate::state::AppState;

/// ```text
/// GET    /                                  -> home
/// POST   /create_proof                      -> create_proof
/// GET    /proofs/{proof_id}/image/{image_id} -> poll_cell
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/create_proof", post(pages::create_proof))
        .route("/proofs/{proof_id}/image/{image_id}", get(pages::poll_cell))
}
