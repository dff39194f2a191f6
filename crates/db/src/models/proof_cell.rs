//! Per-cell generation job model.

use proofsheet_core::types::{ProofId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::status::{CellStatus, StatusId};

/// A row from the `proof_cells` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProofCell {
    pub proof_id: ProofId,
    pub row_index: i64,
    pub col_index: i64,
    pub status_id: StatusId,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProofCell {
    pub fn status(&self) -> Option<CellStatus> {
        CellStatus::from_id(self.status_id)
    }
}
