//! Local HTTP layer: upload a review export, read back the analysis.

pub mod routes;
pub mod types;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, sync::RwLock};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::{config::Settings, insights::AnalysisReport, nlp::Pipeline};

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub pipeline: Arc<Pipeline>,
    /// Result of the most recent upload; replaced on every run.
    pub latest: Arc<RwLock<Option<AnalysisReport>>>,
}

impl AppState {
    pub fn new(settings: Settings, pipeline: Pipeline) -> Self {
        Self {
            settings,
            pipeline: Arc::new(pipeline),
            latest: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build the router over `state`.
pub fn router(state: AppState) -> Router {
    let body_limit = state.settings.max_upload_bytes;
    let router = Router::new()
        .route("/analyze", post(routes::analyze))
        .route("/summary", get(routes::summary))
        .route("/topics", get(routes::topics));
    #[cfg(feature = "askama")]
    let router = router.route("/", get(routes::index));
    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

pub async fn serve(settings: Settings, host: String, port: u16) -> Result<()> {
    let pipeline = Pipeline::from_settings(&settings)?;
    let state = AppState::new(settings, pipeline);

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!(%addr, "serving review-insights API");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received Ctrl+C, shutting down"),
        Err(err) => {
            warn!(%err, "could not listen for Ctrl+C; serving until killed");
            std::future::pending::<()>().await;
        }
    }
}
