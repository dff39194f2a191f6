//! Repository for the `proofs` table.

use chrono::Utc;
use proofsheet_core::types::ProofId;

use crate::models::proof::{CreateProof, Proof};
use crate::DbPool;

/// Column list for proofs queries.
const COLUMNS: &str = "id, prompt, seed, grid_size, x_param, x_range_start, x_range_end, \
    y_param, y_range_start, y_range_end, folder, created_at";

/// Provides insert and lookup operations for proofs. Proofs are immutable
/// once created.
pub struct ProofRepo;

impl ProofRepo {
    /// Insert a new proof, returning the created row.
    pub async fn create(pool: &DbPool, input: &CreateProof) -> Result<Proof, sqlx::Error> {
        let query = format!(
            "INSERT INTO proofs
                (id, prompt, seed, grid_size, x_param, x_range_start, x_range_end,
                 y_param, y_range_start, y_range_end, folder, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Proof>(&query)
            .bind(input.id)
            .bind(&input.prompt)
            .bind(input.seed)
            .bind(input.grid_size)
            .bind(&input.x_param)
            .bind(input.x_range_start)
            .bind(input.x_range_end)
            .bind(&input.y_param)
            .bind(input.y_range_start)
            .bind(input.y_range_end)
            .bind(&input.folder)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Find a proof by its id.
    pub async fn find_by_id(pool: &DbPool, id: ProofId) -> Result<Option<Proof>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM proofs WHERE id = ?");
        sqlx::query_as::<_, Proof>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all proofs, newest first.
    pub async fn list(pool: &DbPool) -> Result<Vec<Proof>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM proofs ORDER BY created_at DESC, rowid DESC");
        sqlx::query_as::<_, Proof>(&query).fetch_all(pool).await
    }
}
