use std::path::PathBuf;
use std::time::Duration;

use proofsheet_pipeline::dispatcher::DEFAULT_MAX_CONCURRENT;
use proofsheet_replicate::api::{
    ReplicateConfig, DEFAULT_API_URL, DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_MODEL,
    DEFAULT_POLL_INTERVAL,
};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for in-flight generations (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// SQLite database URL (default: `sqlite:data/proofs.db`).
    pub database_url: String,
    /// Root for the database file and generated images (default: `data`).
    pub data_dir: PathBuf,
    /// Directory served under `/static` (default: `static`).
    pub static_dir: PathBuf,
    /// How often a pending cell re-polls, in milliseconds (default: `300`).
    pub poll_interval_ms: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `HOST`                  | `0.0.0.0`                |
    /// | `PORT`                  | `8000`                   |
    /// | `CORS_ORIGINS`          | `http://localhost:8000`  |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                     |
    /// | `DATABASE_URL`          | `sqlite:data/proofs.db`  |
    /// | `DATA_DIR`              | `data`                   |
    /// | `STATIC_DIR`            | `static`                 |
    /// | `POLL_INTERVAL_MS`      | `300`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:8000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:data/proofs.db".into());

        let data_dir = PathBuf::from(std::env::var("DATA_DIR").unwrap_or_else(|_| "data".into()));
        let static_dir =
            PathBuf::from(std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".into()));

        let poll_interval_ms: u64 = std::env::var("POLL_INTERVAL_MS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("POLL_INTERVAL_MS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            database_url,
            data_dir,
            static_dir,
            poll_interval_ms,
        }
    }
}

/// Image generation configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub replicate: ReplicateConfig,
    /// Cap on concurrent image service calls.
    pub max_concurrent: usize,
    /// Re-dispatch cells left pending by a previous run at startup.
    pub resume_pending_on_start: bool,
}

impl GenerationConfig {
    /// Load generation settings from the environment.
    ///
    /// `REPLICATE_API_TOKEN` is required; the server refuses to start
    /// without it.
    ///
    /// | Env Var                      | Default                          |
    /// |------------------------------|----------------------------------|
    /// | `REPLICATE_API_TOKEN`        | (required)                       |
    /// | `REPLICATE_API_URL`          | `https://api.replicate.com/v1`   |
    /// | `REPLICATE_MODEL`            | `black-forest-labs/flux-dev`     |
    /// | `REPLICATE_POLL_INTERVAL_MS` | `1000`                           |
    /// | `REPLICATE_MAX_POLLS`        | `300`                            |
    /// | `GENERATION_CONCURRENCY`     | `4`                              |
    /// | `RESUME_PENDING_ON_START`    | `true`                           |
    pub fn from_env() -> Self {
        let api_token = std::env::var("REPLICATE_API_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .expect("REPLICATE_API_TOKEN must be set");

        let api_url = std::env::var("REPLICATE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let model = std::env::var("REPLICATE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let poll_interval = std::env::var("REPLICATE_POLL_INTERVAL_MS")
            .ok()
            .map(|v| {
                v.parse::<u64>()
                    .expect("REPLICATE_POLL_INTERVAL_MS must be a valid u64")
            })
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        let max_poll_attempts: u32 = std::env::var("REPLICATE_MAX_POLLS")
            .ok()
            .map(|v| v.parse().expect("REPLICATE_MAX_POLLS must be a valid u32"))
            .unwrap_or(DEFAULT_MAX_POLL_ATTEMPTS);

        let max_concurrent: usize = std::env::var("GENERATION_CONCURRENCY")
            .ok()
            .map(|v| v.parse().expect("GENERATION_CONCURRENCY must be a valid usize"))
            .unwrap_or(DEFAULT_MAX_CONCURRENT);

        let resume_pending_on_start = std::env::var("RESUME_PENDING_ON_START")
            .map(|v| !matches!(v.trim(), "0" | "false" | "no"))
            .unwrap_or(true);

        Self {
            replicate: ReplicateConfig {
                api_url,
                api_token,
                model,
                poll_interval,
                max_poll_attempts,
            },
            max_concurrent,
            resume_pending_on_start,
        }
    }
}
