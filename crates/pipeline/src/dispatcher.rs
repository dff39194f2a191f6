//! Background dispatch of per-cell generation tasks.
//!
//! Each cell of a proof becomes one tracked task. Tasks are independent and
//! unordered; a semaphore bounds how many call the image service at once.
//! Progress is written to `proof_cells` and the image file itself is the
//! signal the polling UI waits for.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use proofsheet_core::grid::{CellState, GridCell};
use proofsheet_core::params;
use proofsheet_core::types::ProofId;
use proofsheet_db::models::proof::Proof;
use proofsheet_db::repositories::{ProofCellRepo, ProofRepo};
use proofsheet_db::DbPool;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::error::GenerationError;
use crate::generator::ImageGenerator;
use crate::png::ensure_png;
use crate::storage::write_image_atomically;

/// Default cap on concurrent calls to the image service.
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Everything a single cell task needs, detached from the request.
#[derive(Debug, Clone)]
struct CellJob {
    proof_id: ProofId,
    prompt: String,
    seed: i64,
    folder: PathBuf,
    x_param: String,
    y_param: String,
    cell: GridCell,
}

impl CellJob {
    fn new(proof: &Proof, cell: GridCell) -> Self {
        Self {
            proof_id: proof.id,
            prompt: proof.prompt.clone(),
            seed: proof.seed,
            folder: proof.folder_path(),
            x_param: proof.x_param.clone(),
            y_param: proof.y_param.clone(),
            cell,
        }
    }

    /// The raw axis values for this cell, keyed by parameter name.
    fn raw_params(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut raw = serde_json::Map::new();
        raw.insert(self.x_param.clone(), serde_json::json!(self.cell.x_value));
        raw.insert(self.y_param.clone(), serde_json::json!(self.cell.y_value));
        raw
    }

    fn coords(&self) -> (i64, i64) {
        (self.cell.row as i64, self.cell.col as i64)
    }
}

/// Spawns and tracks per-cell generation tasks.
///
/// Constructed once at startup and shared through application state.
pub struct GenerationDispatcher {
    pool: DbPool,
    generator: Arc<dyn ImageGenerator>,
    limiter: Arc<Semaphore>,
    tracker: TaskTracker,
    cancel: CancellationToken,
}

impl GenerationDispatcher {
    /// Create a dispatcher allowing `max_concurrent` in-flight generations
    /// (at least one).
    pub fn new(pool: DbPool, generator: Arc<dyn ImageGenerator>, max_concurrent: usize) -> Self {
        Self {
            pool,
            generator,
            limiter: Arc::new(Semaphore::new(max_concurrent.max(1))),
            tracker: TaskTracker::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Record a pending job for every cell of `proof` and start generating.
    ///
    /// Returns as soon as the tasks are spawned. Returns the number of cells
    /// dispatched.
    pub async fn dispatch(&self, proof: &Proof) -> Result<usize, GenerationError> {
        let cells = proof.grid()?;
        let coords: Vec<(i64, i64)> = cells
            .iter()
            .map(|c| (c.row as i64, c.col as i64))
            .collect();
        ProofCellRepo::create_pending(&self.pool, proof.id, &coords).await?;

        let count = cells.len();
        for cell in cells {
            self.spawn_cell(CellJob::new(proof, cell));
        }

        tracing::info!(proof_id = %proof.id, cells = count, "Dispatched proof generation");
        Ok(count)
    }

    /// Restart cells left pending by a previous process.
    ///
    /// Cells whose image already exists are marked ready instead. Returns
    /// the number of cells re-dispatched.
    pub async fn resume_pending(&self) -> Result<usize, GenerationError> {
        let pending = ProofCellRepo::list_pending(&self.pool).await?;

        let mut by_proof: BTreeMap<ProofId, Vec<(i64, i64)>> = BTreeMap::new();
        for cell in pending {
            by_proof
                .entry(cell.proof_id)
                .or_default()
                .push((cell.row_index, cell.col_index));
        }

        let mut resumed = 0;
        for (proof_id, coords) in by_proof {
            let Some(proof) = ProofRepo::find_by_id(&self.pool, proof_id).await? else {
                tracing::warn!(%proof_id, "Pending cells reference a missing proof");
                continue;
            };
            let folder = proof.folder_path();

            for cell in proof.grid()? {
                let key = (cell.row as i64, cell.col as i64);
                if !coords.contains(&key) {
                    continue;
                }
                if CellState::resolve(&cell.image_path(&folder)) == CellState::Ready {
                    ProofCellRepo::mark_ready(&self.pool, proof_id, key.0, key.1).await?;
                    continue;
                }
                self.spawn_cell(CellJob::new(&proof, cell));
                resumed += 1;
            }
        }

        if resumed > 0 {
            tracing::info!(cells = resumed, "Resumed pending cell generation");
        }
        Ok(resumed)
    }

    /// Number of cell tasks still running or waiting for a permit.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Wait until every task spawned so far has finished.
    pub async fn wait_idle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    /// Cancel outstanding tasks and wait up to `timeout` for them to stop.
    ///
    /// Cancelled cells stay pending and are picked up by
    /// [`resume_pending`](Self::resume_pending) on the next start.
    pub async fn shutdown(&self, timeout: Duration) {
        tracing::info!(in_flight = self.in_flight(), "Stopping generation dispatcher");
        self.cancel.cancel();
        self.tracker.close();
        if tokio::time::timeout(timeout, self.tracker.wait()).await.is_err() {
            tracing::warn!(
                in_flight = self.in_flight(),
                "Timed out waiting for generation tasks to stop"
            );
        }
    }

    fn spawn_cell(&self, job: CellJob) {
        let pool = self.pool.clone();
        let generator = Arc::clone(&self.generator);
        let limiter = Arc::clone(&self.limiter);
        let cancel = self.cancel.clone();

        self.tracker.spawn(async move {
            let image_id = job.cell.image_id();
            let outcome = tokio::select! {
                _ = cancel.cancelled() => Err(GenerationError::Cancelled),
                result = async {
                    match limiter.acquire().await {
                        Ok(_permit) => generate_cell(&pool, generator.as_ref(), &job).await,
                        Err(_) => Err(GenerationError::Cancelled),
                    }
                } => result,
            };

            match outcome {
                Ok(path) => {
                    tracing::info!(
                        proof_id = %job.proof_id,
                        image_id = %image_id,
                        path = %path.display(),
                        "Cell image generated",
                    );
                }
                Err(GenerationError::Cancelled) => {
                    tracing::info!(proof_id = %job.proof_id, image_id = %image_id, "Cell generation cancelled");
                }
                Err(e) => {
                    tracing::warn!(
                        proof_id = %job.proof_id,
                        image_id = %image_id,
                        error = %e,
                        "Cell generation failed",
                    );
                    let (row, col) = job.coords();
                    if let Err(db_err) =
                        ProofCellRepo::mark_failed(&pool, job.proof_id, row, col, &e.to_string())
                            .await
                    {
                        tracing::error!(
                            proof_id = %job.proof_id,
                            image_id = %image_id,
                            error = %db_err,
                            "Failed to record cell failure",
                        );
                    }
                }
            }
        });
    }
}

/// Validate, generate, store, and mark one cell ready.
async fn generate_cell(
    pool: &DbPool,
    generator: &dyn ImageGenerator,
    job: &CellJob,
) -> Result<PathBuf, GenerationError> {
    let raw = job.raw_params();
    params::validate_params(&raw)?;
    let model_params = params::with_defaults(params::correct_param_types(&raw)?, job.seed);

    let bytes = generator.generate(&job.prompt, &model_params).await?;
    let png = ensure_png(bytes)?;
    let path = write_image_atomically(&job.folder, &job.cell.filename(), &png).await?;

    let (row, col) = job.coords();
    ProofCellRepo::mark_ready(pool, job.proof_id, row, col).await?;
    Ok(path)
}
