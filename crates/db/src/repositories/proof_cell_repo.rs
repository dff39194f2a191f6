//! Repository for the `proof_cells` table (per-cell generation jobs).

use chrono::Utc;
use proofsheet_core::types::ProofId;

use crate::models::proof_cell::ProofCell;
use crate::models::status::CellStatus;
use crate::DbPool;

/// Column list for proof_cells queries.
const COLUMNS: &str =
    "proof_id, row_index, col_index, status_id, error_message, created_at, updated_at";

/// Tracks the generation status of each cell of a proof.
pub struct ProofCellRepo;

impl ProofCellRepo {
    /// Insert a pending job for every `(row, col)` in one transaction.
    ///
    /// Cells that already have a job are left untouched. Returns the number
    /// of rows inserted.
    pub async fn create_pending(
        pool: &DbPool,
        proof_id: ProofId,
        cells: &[(i64, i64)],
    ) -> Result<u64, sqlx::Error> {
        let now = Utc::now();
        let mut tx = pool.begin().await?;
        let mut inserted = 0;
        for &(row, col) in cells {
            let result = sqlx::query(
                "INSERT OR IGNORE INTO proof_cells
                    (proof_id, row_index, col_index, status_id, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(proof_id)
            .bind(row)
            .bind(col)
            .bind(CellStatus::Pending.id())
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }
        tx.commit().await?;
        Ok(inserted)
    }

    /// All cell jobs for a proof, row-major.
    pub async fn list_for_proof(
        pool: &DbPool,
        proof_id: ProofId,
    ) -> Result<Vec<ProofCell>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM proof_cells
             WHERE proof_id = ?
             ORDER BY row_index, col_index"
        );
        sqlx::query_as::<_, ProofCell>(&query)
            .bind(proof_id)
            .fetch_all(pool)
            .await
    }

    /// Find a single cell job.
    pub async fn find(
        pool: &DbPool,
        proof_id: ProofId,
        row: i64,
        col: i64,
    ) -> Result<Option<ProofCell>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM proof_cells
             WHERE proof_id = ? AND row_index = ? AND col_index = ?"
        );
        sqlx::query_as::<_, ProofCell>(&query)
            .bind(proof_id)
            .bind(row)
            .bind(col)
            .fetch_optional(pool)
            .await
    }

    /// Every job still pending, across all proofs.
    pub async fn list_pending(pool: &DbPool) -> Result<Vec<ProofCell>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM proof_cells
             WHERE status_id = ?
             ORDER BY proof_id, row_index, col_index"
        );
        sqlx::query_as::<_, ProofCell>(&query)
            .bind(CellStatus::Pending.id())
            .fetch_all(pool)
            .await
    }

    /// Mark a cell's image as written. Returns `true` if a row was updated.
    pub async fn mark_ready(
        pool: &DbPool,
        proof_id: ProofId,
        row: i64,
        col: i64,
    ) -> Result<bool, sqlx::Error> {
        Self::set_status(pool, proof_id, row, col, CellStatus::Ready, None).await
    }

    /// Record a failed generation. Returns `true` if a row was updated.
    pub async fn mark_failed(
        pool: &DbPool,
        proof_id: ProofId,
        row: i64,
        col: i64,
        error_message: &str,
    ) -> Result<bool, sqlx::Error> {
        Self::set_status(
            pool,
            proof_id,
            row,
            col,
            CellStatus::Failed,
            Some(error_message),
        )
        .await
    }

    async fn set_status(
        pool: &DbPool,
        proof_id: ProofId,
        row: i64,
        col: i64,
        status: CellStatus,
        error_message: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE proof_cells SET
                status_id = ?,
                error_message = ?,
                updated_at = ?
             WHERE proof_id = ? AND row_index = ? AND col_index = ?",
        )
        .bind(status.id())
        .bind(error_message)
        .bind(Utc::now())
        .bind(proof_id)
        .bind(row)
        .bind(col)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
