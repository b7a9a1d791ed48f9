//! HTTP service for the patient record store.
//!
//! Routes:
//!
//! | Method | Path            | Success | Failure                      |
//! |--------|-----------------|---------|------------------------------|
//! | GET    | `/`             | 200     |                              |
//! | GET    | `/about`        | 200     |                              |
//! | GET    | `/view`         | 200     |                              |
//! | GET    | `/patient/:id`  | 200     | 404 unknown id               |
//! | GET    | `/sort`         | 200     | 400 bad `sort_by` / `order`  |
//! | POST   | `/create`       | 201     | 400 duplicate id, 422 invalid|
//! | PUT    | `/edit/:id`     | 200     | 404 unknown id, 422 invalid  |
//! | DELETE | `/delete/:id`   | 200     | 404 unknown id               |

pub mod config;
pub mod error;
mod handlers;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{delete, get, post, put};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use patient_records_core::store::RecordStore;

pub use config::ServerConfig;
pub use error::ApiError;

/// Shared state for the Axum application.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
}

/// Build the application router over a record store.
pub fn router(store: Arc<RecordStore>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/about", get(handlers::about))
        .route("/view", get(handlers::view))
        .route("/patient/:id", get(handlers::get_patient))
        .route("/sort", get(handlers::sort_patients))
        .route("/create", post(handlers::create_patient))
        .route("/edit/:id", put(handlers::edit_patient))
        .route("/delete/:id", delete(handlers::delete_patient))
        .with_state(AppState { store })
        .layer(TraceLayer::new_for_http())
}

/// Open the configured store and apply the seed document, if any.
pub fn open_store(config: &ServerConfig) -> Result<RecordStore> {
    let store = match &config.database_path {
        Some(path) => RecordStore::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?,
        None => RecordStore::open_in_memory().context("Failed to open in-memory database")?,
    };

    if let Some(seed) = &config.seed_path {
        let json = std::fs::read_to_string(seed)
            .with_context(|| format!("Failed to read seed file {}", seed.display()))?;
        let summary = store
            .import_json(&json)
            .with_context(|| format!("Failed to import seed file {}", seed.display()))?;
        info!(
            seed = %seed.display(),
            imported = summary.imported,
            skipped = summary.skipped,
            "seeded patient records"
        );
    }

    Ok(store)
}

/// Serve the API until ctrl-c.
pub async fn serve(config: &ServerConfig, store: Arc<RecordStore>) -> Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to address: {}", addr))?;

    info!(%addr, "patient records API listening");

    axum::serve(listener, router(store).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Patient records API failed while running")?;

    info!("patient records API stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received shutdown signal"),
        Err(e) => {
            warn!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
