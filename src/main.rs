use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sql_playground_server::db::{
    create_pool, ensure_database, PgHistoryStore, PgQueryRunner, QueryRunner,
};
use sql_playground_server::ingest::CommandOcr;
use sql_playground_server::{build_router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sql_playground_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting SQL Playground Server...");

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "Environment: {}, Server: {}",
        config.environment,
        config.server_address()
    );

    // Uploads directory and embedded store
    tokio::fs::create_dir_all(&config.uploads_dir).await?;
    ensure_database(&config.embedded_database_path()).await?;

    // History store
    let pool = create_pool(&config.history_database_url).await?;
    let history = PgHistoryStore::new(pool);
    history.migrate().await?;

    // Networked store used by run-query, checked once at startup
    let runner = PgQueryRunner::new(config.database_url.clone());
    runner.ping().await?;
    tracing::info!("Connected to query database");

    let ocr = CommandOcr::new(
        config.ocr_interpreter.clone(),
        config.ocr_script.clone(),
        config.ocr_timeout(),
    );

    let cors = cors_layer(&config.allowed_origins)?;

    let state = AppState::new(
        config.clone(),
        Arc::new(history),
        Arc::new(runner),
        Arc::new(ocr),
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = config.server_address().parse()?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `*` allows any origin, otherwise only the listed ones
fn cors_layer(allowed_origins: &[String]) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        return Ok(layer.allow_origin(Any));
    }

    let origins = allowed_origins
        .iter()
        .map(|o| o.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(layer.allow_origin(origins))
}
