use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

mod auth;
mod config;
mod error;
mod extract;
mod handlers;
mod models;
mod store;
mod uploads;

use crate::config::Config;
use crate::store::ProductStore;
use crate::uploads::UploadDir;

/// Shared application state, cheap to clone (all heap behind Arc).
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ProductStore>,
    pub uploads: Arc<UploadDir>,
    pub api_key: Arc<str>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,catalog_service=debug".into()),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let uploads = UploadDir::open(&config.upload_dir).await?;
    info!(dir = %uploads.root().display(), "Upload directory ready");

    let store = ProductStore::new(&config.store_path);
    info!(path = %store.path().display(), "Using product store");

    let state = AppState {
        store: Arc::new(store),
        uploads: Arc::new(uploads),
        api_key: Arc::from(config.api_key.as_str()),
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))

        // ── Uploads ─────────────────────────────────────────────────────────
        .route(
            "/upload_file/",
            post(handlers::uploads::upload_files).layer(DefaultBodyLimit::disable()),
        )

        // ── Products ────────────────────────────────────────────────────────
        .route("/add_product/", post(handlers::products::create_product))
        .route("/product_spec/", get(handlers::products::get_product))
        .route("/update_product/:id", put(handlers::products::update_product))
        .route(
            "/partial_update/:id",
            patch(handlers::products::partial_update_product),
        )
        .route("/delete_product/", delete(handlers::products::delete_product))

        // ── Middleware ──────────────────────────────────────────────────────
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
