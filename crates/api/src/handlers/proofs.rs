//! JSON handlers for proofs and the parameter registry.
//!
//! Routes:
//! - `GET   /parameters`    -- recognised axis parameters
//! - `GET   /proofs`        -- list proofs, newest first
//! - `POST  /proofs`        -- create a proof and start generation
//! - `GET   /proofs/{id}`   -- one proof with per-cell state

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use proofsheet_core::error::CoreError;
use proofsheet_core::grid::{CellState, GridCell};
use proofsheet_core::params::PARAMETERS;
use proofsheet_core::proof::{proof_folder, ProofSubmission};
use proofsheet_core::types::ProofId;
use proofsheet_db::models::proof::{CreateProof, Proof};
use proofsheet_db::models::proof_cell::ProofCell;
use proofsheet_db::repositories::{ProofCellRepo, ProofRepo};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::views::grid::image_url;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// One cell of a proof with both its file state and its job status.
#[derive(Debug, Serialize)]
pub struct CellDetail {
    pub row: usize,
    pub col: usize,
    pub image_id: String,
    pub caption: String,
    pub x_value: f64,
    pub y_value: f64,
    /// `pending` until the image file exists.
    pub state: CellState,
    /// Job status from `proof_cells`, if generation was dispatched.
    pub job_status: Option<&'static str>,
    pub error_message: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProofDetail {
    #[serde(flatten)]
    pub proof: Proof,
    pub cells: Vec<CellDetail>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/parameters
pub async fn list_parameters() -> impl IntoResponse {
    Json(DataResponse { data: PARAMETERS })
}

/// GET /api/v1/proofs
pub async fn list_proofs(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let proofs = ProofRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: proofs }))
}

/// POST /api/v1/proofs
///
/// Validates the submission, persists it, and dispatches generation.
/// Responds before any image is generated.
pub async fn create_proof(
    State(state): State<AppState>,
    Json(input): Json<ProofSubmission>,
) -> AppResult<impl IntoResponse> {
    let proof = submit_proof(&state, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: proof })))
}

/// GET /api/v1/proofs/{id}
pub async fn get_proof(
    State(state): State<AppState>,
    Path(proof_id): Path<ProofId>,
) -> AppResult<impl IntoResponse> {
    let proof = load_proof(&state, proof_id).await?;
    let jobs = ProofCellRepo::list_for_proof(&state.pool, proof_id).await?;
    let folder = proof.folder_path();

    let cells = proof
        .grid()?
        .into_iter()
        .map(|cell| {
            let job = jobs
                .iter()
                .find(|j| j.row_index == cell.row as i64 && j.col_index == cell.col as i64);
            cell_detail(proof_id, &folder, cell, job)
        })
        .collect();

    Ok(Json(DataResponse {
        data: ProofDetail { proof, cells },
    }))
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Validate, persist, and dispatch a new proof.
///
/// Shared by the JSON endpoint and the HTML form handler. Failure to
/// dispatch is logged but does not fail the request; the cells simply stay
/// pending.
pub(crate) async fn submit_proof(state: &AppState, input: ProofSubmission) -> AppResult<Proof> {
    let errors = input.validation_errors();
    if !errors.is_empty() {
        return Err(AppError::InvalidProof(errors));
    }

    let id = Uuid::new_v4();
    let folder = proof_folder(&state.config.data_dir, id);
    tokio::fs::create_dir_all(&folder).await.inspect_err(|e| {
        tracing::error!(folder = %folder.display(), error = %e, "Failed to create proof folder");
    })?;

    let create = CreateProof::from_submission(id, input, folder.to_string_lossy().into_owned());
    let proof = ProofRepo::create(&state.pool, &create).await?;
    tracing::info!(
        proof_id = %proof.id,
        grid_size = proof.grid_size,
        x_param = %proof.x_param,
        y_param = %proof.y_param,
        "Proof created",
    );

    if let Err(e) = state.dispatcher.dispatch(&proof).await {
        tracing::error!(proof_id = %proof.id, error = %e, "Failed to dispatch proof generation");
    }

    Ok(proof)
}

/// Load a proof or return a 404 error.
pub(crate) async fn load_proof(state: &AppState, proof_id: ProofId) -> AppResult<Proof> {
    ProofRepo::find_by_id(&state.pool, proof_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Proof",
                id: proof_id.to_string(),
            })
        })
}

fn cell_detail(
    proof_id: ProofId,
    folder: &std::path::Path,
    cell: GridCell,
    job: Option<&ProofCell>,
) -> CellDetail {
    let image_id = cell.image_id();
    let state = CellState::resolve(&cell.image_path(folder));
    CellDetail {
        row: cell.row,
        col: cell.col,
        caption: cell.caption(),
        x_value: cell.x_value,
        y_value: cell.y_value,
        state,
        job_status: job.and_then(|j| j.status()).map(|s| s.name()),
        error_message: job.and_then(|j| j.error_message.clone()),
        image_url: (state == CellState::Ready).then(|| image_url(proof_id, &image_id)),
        image_id,
    }
}
