use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use proofsheet_api::config::{GenerationConfig, ServerConfig};
use proofsheet_api::router::build_app_router;
use proofsheet_api::state::AppState;
use proofsheet_pipeline::dispatcher::GenerationDispatcher;
use proofsheet_replicate::api::ReplicateClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "proofsheet_api=debug,proofsheet_pipeline=debug,proofsheet_replicate=info,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    let generation = GenerationConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        data_dir = %config.data_dir.display(),
        model = %generation.replicate.model,
        max_concurrent = generation.max_concurrent,
        "Loaded server configuration",
    );

    std::fs::create_dir_all(&config.data_dir).expect("Failed to create data directory");

    // --- Database ---
    let pool = proofsheet_db::create_pool(&config.database_url)
        .await
        .expect("Failed to open database");
    tracing::info!("Database connection pool created");

    proofsheet_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    proofsheet_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Generation dispatcher ---
    let client = ReplicateClient::new(generation.replicate.clone());
    let dispatcher = Arc::new(GenerationDispatcher::new(
        pool.clone(),
        Arc::new(client),
        generation.max_concurrent,
    ));

    if generation.resume_pending_on_start {
        match dispatcher.resume_pending().await {
            Ok(count) => tracing::info!(cells = count, "Pending cells resumed"),
            Err(e) => tracing::error!(error = %e, "Failed to resume pending cells"),
        }
    }

    // --- App state ---
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        dispatcher: Arc::clone(&dispatcher),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    dispatcher
        .shutdown(Duration::from_secs(config.shutdown_timeout_secs))
        .await;
    tracing::info!("Generation dispatcher stopped");

    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
