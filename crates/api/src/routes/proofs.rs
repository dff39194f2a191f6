use axum::routing::get;
use axum::Router;

use crate::handlers::proofs;
use crate::state::AppState;

/// Proof routes mounted at `/api/v1/proofs`.
///
/// ```text
/// GET    /        -> list_proofs
/// POST   /        -> create_proof
/// GET    /{id}    -> get_proof
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(proofs::list_proofs).post(proofs::create_proof))
        .route("/{id}", get(proofs::get_proof))
}
