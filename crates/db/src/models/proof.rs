//! Proof request model and DTOs.

use std::path::PathBuf;

use proofsheet_core::error::CoreError;
use proofsheet_core::grid::{assemble_grid, GridCell};
use proofsheet_core::proof::ProofSubmission;
use proofsheet_core::range::AxisRange;
use proofsheet_core::types::{ProofId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `proofs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Proof {
    pub id: ProofId,
    pub prompt: String,
    pub seed: i64,
    pub grid_size: i64,
    pub x_param: String,
    pub x_range_start: f64,
    pub x_range_end: f64,
    pub y_param: String,
    pub y_range_start: f64,
    pub y_range_end: f64,
    pub folder: String,
    pub created_at: Timestamp,
}

impl Proof {
    /// Grid size as an index type.
    pub fn size(&self) -> Result<usize, CoreError> {
        usize::try_from(self.grid_size)
            .map_err(|_| CoreError::Internal(format!("Invalid stored grid size {}", self.grid_size)))
    }

    pub fn x_axis(&self) -> Result<AxisRange, CoreError> {
        AxisRange::new(
            &self.x_param,
            self.x_range_start,
            self.x_range_end,
            self.size()?,
        )
    }

    pub fn y_axis(&self) -> Result<AxisRange, CoreError> {
        AxisRange::new(
            &self.y_param,
            self.y_range_start,
            self.y_range_end,
            self.size()?,
        )
    }

    /// Recompute the grid cells from the stored axis ranges.
    pub fn grid(&self) -> Result<Vec<GridCell>, CoreError> {
        let x_values = self.x_axis()?.values()?;
        let y_values = self.y_axis()?.values()?;
        assemble_grid(self.size()?, &x_values, &y_values)
    }

    pub fn folder_path(&self) -> PathBuf {
        PathBuf::from(&self.folder)
    }
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Input for inserting a new proof.
#[derive(Debug, Clone)]
pub struct CreateProof {
    pub id: ProofId,
    pub prompt: String,
    pub seed: i64,
    pub grid_size: i64,
    pub x_param: String,
    pub x_range_start: f64,
    pub x_range_end: f64,
    pub y_param: String,
    pub y_range_start: f64,
    pub y_range_end: f64,
    pub folder: String,
}

impl CreateProof {
    pub fn from_submission(id: ProofId, submission: ProofSubmission, folder: String) -> Self {
        Self {
            id,
            prompt: submission.prompt,
            seed: submission.seed,
            grid_size: submission.grid_size,
            x_param: submission.x_param,
            x_range_start: submission.x_range_start,
            x_range_end: submission.x_range_end,
            y_param: submission.y_param,
            y_range_start: submission.y_range_start,
            y_range_end: submission.y_range_end,
            folder,
        }
    }
}
