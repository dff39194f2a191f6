//! HTML handlers for the htmx front end.
//!
//! These respond with full pages or fragments. Validation failures and
//! unknown proofs render as fragments with a 200 status so htmx swaps them
//! in place.

use axum::extract::{Path, State};
use axum::response::Html;
use axum::Form;
use proofsheet_core::grid::{image_filename, image_id, parse_image_id, CellState};
use proofsheet_core::proof::ProofSubmission;
use proofsheet_db::models::proof::Proof;
use proofsheet_db::repositories::ProofRepo;
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::proofs::submit_proof;
use crate::state::AppState;
use crate::views::{self, form, grid, layout};

/// GET /
pub async fn home(State(state): State<AppState>) -> AppResult<Html<String>> {
    let proofs = ProofRepo::list(&state.pool).await?;
    let cards: Vec<String> = proofs.iter().map(render_card).collect();

    let body = format!(
        r#"<main class="container">{}{}</main>"#,
        form::proof_form(),
        grid::proofs_container(&cards),
    );
    Ok(Html(layout::page("Proofs", &body)))
}

/// POST /create_proof
///
/// Returns the new proof card, or the list of validation messages.
pub async fn create_proof(
    State(state): State<AppState>,
    Form(submission): Form<ProofSubmission>,
) -> AppResult<Html<String>> {
    let errors = submission.validation_errors();
    if !errors.is_empty() {
        return Ok(Html(views::error_messages(&errors)));
    }

    let proof = submit_proof(&state, submission).await?;
    Ok(Html(render_card(&proof)))
}

/// GET /proofs/{proof_id}/image/{image_id}
///
/// The final image once its file exists, otherwise a placeholder that polls
/// this route again.
pub async fn poll_cell(
    State(state): State<AppState>,
    Path((proof_id, raw_image_id)): Path<(String, String)>,
) -> AppResult<Html<String>> {
    let proof = match Uuid::parse_str(&proof_id) {
        Ok(id) => ProofRepo::find_by_id(&state.pool, id).await?,
        Err(_) => None,
    };
    let Some(proof) = proof else {
        return Ok(Html(views::not_found("Proof not found.")));
    };

    let Ok((row, col)) = parse_image_id(&raw_image_id, proof.size()?) else {
        return Ok(Html(views::not_found("Image not found.")));
    };

    let cell_id = image_id(row, col);
    let path = proof.folder_path().join(image_filename(row, col));
    let html = match CellState::resolve(&path) {
        CellState::Ready => grid::cell_image(proof.id, &cell_id),
        CellState::Pending => {
            grid::cell_placeholder(proof.id, &cell_id, state.config.poll_interval_ms)
        }
    };
    Ok(Html(html))
}

fn render_card(proof: &Proof) -> String {
    match proof.grid() {
        Ok(cells) => grid::proof_card(proof, &cells),
        Err(e) => {
            tracing::warn!(proof_id = %proof.id, error = %e, "Stored proof cannot be laid out");
            views::not_found("Proof could not be displayed.")
        }
    }
}
