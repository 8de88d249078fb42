//! HTTP surface for lostfound.
//!
//! | Method | Path | |
//! |---|---|---|
//! | GET | `/` | landing page |
//! | GET | `/lost` | submission form |
//! | POST | `/lost` | store a report, redirect to `/found` |
//! | GET | `/found` | all reports |
//! | GET | `/detail/{id}` | one report |
//! | GET | `/static/*` | stored photos |

pub mod error;
mod form;
mod handlers;
pub mod pages;

use std::path::Path;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::{Config, STATIC_URL_PREFIX};
use crate::error::Result;
use crate::reports::ReportService;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Report operations.
    pub reports: Arc<ReportService>,
}

impl AppState {
    /// Wrap a report service for use as router state.
    #[must_use]
    pub fn new(reports: ReportService) -> Self {
        Self {
            reports: Arc::new(reports),
        }
    }
}

/// Build the application router.
///
/// Files under `static_dir` are served at `/static`. Request bodies larger
/// than `max_upload_bytes` are rejected.
pub fn build_router(state: AppState, static_dir: &Path, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index_handler))
        .route(
            "/lost",
            get(handlers::lost_form_handler).post(handlers::submit_lost_handler),
        )
        .route("/found", get(handlers::found_handler))
        .route("/detail/:id", get(handlers::detail_handler))
        .nest_service(STATIC_URL_PREFIX, ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Open the stores named by `config` and serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the stores cannot be opened, the address cannot be
/// bound, or the server fails.
pub async fn serve(config: &Config) -> Result<()> {
    let reports = ReportService::from_config(config).await?;
    let app = build_router(
        AppState::new(reports),
        &config.storage.static_dir,
        config.server.max_upload_bytes,
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr()?).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    info!(
        data_file = %config.storage.data_file.display(),
        upload_dir = %config.upload_dir().display(),
        "Serving reports"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C, shutdown only by kill: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
