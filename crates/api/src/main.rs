use std::net::SocketAddr;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use myficdb_api::auth::reset::apply_startup_reset;
use myficdb_api::background::db_health;
use myficdb_api::config::ServerConfig;
use myficdb_api::router::build_app_router;
use myficdb_api::state::AppState;
use myficdb_api::update::UpdateChecker;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    // Loaded first: the log directory comes from it.
    let config = ServerConfig::from_env();

    // --- Tracing ---
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("myficdb")
        .filename_suffix("log")
        .build(&config.logs_dir)
        .expect("Failed to create log file appender");
    let (file_writer, _log_guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "myficdb_api=debug,myficdb_db=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .init();

    tracing::info!(
        host = %config.host,
        port = %config.port,
        data_dir = %config.data_dir.display(),
        logs_dir = %config.logs_dir.display(),
        version = config.build.version.as_deref().unwrap_or("unknown"),
        "Loaded server configuration"
    );

    // --- Database ---
    let pool = myficdb_db::create_pool(
        &config.database_path(),
        Duration::from_secs(config.sqlite_busy_timeout_secs),
    )
    .await
    .expect("Failed to open database");
    tracing::info!("Database connection pool created");

    myficdb_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    myficdb_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Startup password reset ---
    let outcome = apply_startup_reset(&pool, &config.reset_password).await;
    tracing::debug!(?outcome, "Startup password reset evaluated");

    // --- App state ---
    let updates = UpdateChecker::new(config.build.clone()).expect("Failed to build HTTP client");
    let state = AppState::new(pool.clone(), config.clone(), updates);

    // --- Database health job ---
    let health_cancel = CancellationToken::new();
    let health_handle = tokio::spawn(db_health::run(
        pool.clone(),
        state.health.clone(),
        Duration::from_secs(config.db_health_interval_hours * 3600),
        health_cancel.clone(),
    ));

    // --- Router ---
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

    health_cancel.cancel();
    let _ = tokio::time::timeout(
        Duration::from_secs(config.shutdown_timeout_secs),
        health_handle,
    )
    .await;
    tracing::info!("Database health job stopped");

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
