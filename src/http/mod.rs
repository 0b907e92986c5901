//! # HTTP API
//!
//! The dashboard's JSON routes. Route names follow the dashboard frontend
//! (`/getAllCampaigns`, `/realTime`, ...). Every route accepts requests from
//! any origin.

mod error;
pub mod handlers;

use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::clients::CampaignClient;
use crate::dashboard::{DashboardService, Simulator};
use crate::predictor::PredictionService;

pub use error::ApiError;

/// Shared handler state. Every field is a cheap clone over channel senders.
#[derive(Clone)]
pub struct AppState {
    pub campaigns: CampaignClient,
    pub dashboard: DashboardService,
    pub predictions: PredictionService,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/getAllCampaigns", get(handlers::all_campaigns))
        .route("/getWeeklyTrends", get(handlers::weekly_trends))
        .route("/getDeviceDemographics", get(handlers::device_demographics))
        .route("/getKpiData", get(handlers::kpi_data))
        .route("/getCampaignPerformance", get(handlers::campaign_performance))
        .route("/getKpiSummary", get(handlers::kpi_summary))
        .route("/getPlatformPerformance", get(handlers::platform_performance))
        .route("/realTime", get(handlers::real_time))
        .route("/predictiveInsights", get(handlers::predictive_insights))
        .route("/campaigns", post(handlers::create_campaign))
        .route(
            "/campaigns/:ad_id",
            get(handlers::get_campaign)
                .patch(handlers::update_campaign)
                .delete(handlers::delete_campaign),
        )
        .route("/predict", post(handlers::predict))
        .route("/api/conversation", post(handlers::conversation))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the router until `shutdown` resolves.
pub async fn serve(
    addr: SocketAddr,
    state: AppState,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "HTTP server listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// [`serve`], then stops `simulator` whether the server shut down cleanly or
/// failed to start.
pub async fn serve_with_simulator(
    addr: SocketAddr,
    state: AppState,
    simulator: Option<Simulator>,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let served = serve(addr, state, shutdown).await;
    if let Some(simulator) = simulator {
        simulator.stop().await;
    }
    served
}
