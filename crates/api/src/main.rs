use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use backoffice_api::config::ServerConfig;
use backoffice_api::router::build_app_router;
use backoffice_api::seed::{self, SeedAdmin};
use backoffice_api::state::AppState;
use backoffice_api::storage::LocalAttachmentStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backoffice_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = backoffice_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    backoffice_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    backoffice_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Bootstrap administrator ---
    if let Some(admin) = SeedAdmin::from_env() {
        let created = seed::ensure_admin(&pool, &admin)
            .await
            .expect("Failed to seed administrator account");
        if !created {
            tracing::debug!(username = %admin.username, "Seed administrator already exists");
        }
    }

    // --- Attachment storage ---
    tokio::fs::create_dir_all(&config.storage.root)
        .await
        .expect("Failed to create attachment storage directory");
    let attachments = Arc::new(LocalAttachmentStore::new(
        config.storage.root.clone(),
        config.storage.public_base_url.clone(),
    ));
    tracing::info!(root = %config.storage.root.display(), "Attachment storage ready");

    // --- Event bus ---
    let event_bus = Arc::new(backoffice_events::EventBus::default());

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus,
        attachments,
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

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or (on Unix) SIGTERM.
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
