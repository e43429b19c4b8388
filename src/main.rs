use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use registra_web::registration::DiskReceiptStore;
use registra_web::{admin, analytics, cache, pricing, registration, AppCache, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("registra_web=debug,tower_http=info")),
        )
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .context("failed to connect to database")?;

    let media_root = std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_string());
    let media_base = std::env::var("MEDIA_PUBLIC_BASE").unwrap_or_else(|_| "/media".to_string());

    let state = AppState {
        db: db.clone(),
        cache: AppCache::new(),
        receipts: Arc::new(DiskReceiptStore::new(&media_root, media_base)),
    };

    // Best-effort background poll keeping the catalog fresh for the form
    tokio::spawn(cache::start_catalog_refresher(state.cache.clone(), db));

    let app = Router::new()
        .merge(pricing::router())
        .merge(registration::router())
        .nest(
            "/api/admin",
            registration::admin_router()
                .merge(analytics::router())
                .merge(admin::router()),
        )
        .nest_service("/media", ServeDir::new(&media_root))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
