use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{ApiError, AppState};
use crate::clients::ActorClient;
use crate::dashboard::{
    CampaignRow, DeviceRow, KpiPoint, KpiSummary, LiveSnapshot, PerformanceSlice, PlatformRow, TrendPoint,
    DEFAULT_KPI_LIMIT, DEFAULT_PERFORMANCE_LIMIT,
};
use crate::model::{Campaign, CampaignCreate, CampaignUpdate, Insight};
use crate::predictor::{PredictRequest, Prediction};

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<usize>,
}

fn limit(params: Result<Query<LimitParams>, QueryRejection>) -> Result<Option<usize>, ApiError> {
    Ok(params?.0.limit)
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub campaigns: usize,
    pub model_loaded: bool,
}

pub async fn health(State(state): State<AppState>) -> ApiResult<Health> {
    let campaigns = state.campaigns.count().await?;
    Ok(Json(Health {
        status: "ok",
        campaigns,
        model_loaded: state.predictions.is_loaded(),
    }))
}

pub async fn all_campaigns(
    State(state): State<AppState>,
    params: Result<Query<LimitParams>, QueryRejection>,
) -> ApiResult<Vec<CampaignRow>> {
    Ok(Json(state.dashboard.all_campaigns(limit(params)?).await?))
}

pub async fn weekly_trends(State(state): State<AppState>) -> ApiResult<Vec<TrendPoint>> {
    let today = chrono::Local::now().date_naive();
    Ok(Json(state.dashboard.weekly_trends(today).await?))
}

pub async fn device_demographics(State(state): State<AppState>) -> ApiResult<Vec<DeviceRow>> {
    Ok(Json(state.dashboard.device_demographics().await?))
}

pub async fn kpi_data(
    State(state): State<AppState>,
    params: Result<Query<LimitParams>, QueryRejection>,
) -> ApiResult<Vec<KpiPoint>> {
    let limit = limit(params)?.unwrap_or(DEFAULT_KPI_LIMIT);
    Ok(Json(state.dashboard.kpi_data(limit).await?))
}

pub async fn campaign_performance(
    State(state): State<AppState>,
    params: Result<Query<LimitParams>, QueryRejection>,
) -> ApiResult<Vec<PerformanceSlice>> {
    let limit = limit(params)?.unwrap_or(DEFAULT_PERFORMANCE_LIMIT);
    Ok(Json(state.dashboard.campaign_performance(limit).await?))
}

pub async fn kpi_summary(State(state): State<AppState>) -> ApiResult<KpiSummary> {
    Ok(Json(state.dashboard.kpi_summary().await?))
}

pub async fn platform_performance(State(state): State<AppState>) -> ApiResult<Vec<PlatformRow>> {
    Ok(Json(state.dashboard.platform_performance().await?))
}

pub async fn real_time(State(state): State<AppState>) -> ApiResult<LiveSnapshot> {
    Ok(Json(state.dashboard.real_time().await?))
}

pub async fn predictive_insights(State(state): State<AppState>) -> ApiResult<Vec<Insight>> {
    Ok(Json(state.dashboard.predictive_insights().await?))
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub ad_id: String,
}

pub async fn create_campaign(
    State(state): State<AppState>,
    body: Result<Json<CampaignCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    let Json(params) = body?;
    let ad_id = state.campaigns.ingest(params).await?;
    Ok((StatusCode::CREATED, Json(Created { ad_id })))
}

pub async fn get_campaign(State(state): State<AppState>, Path(ad_id): Path<String>) -> ApiResult<Campaign> {
    match state.campaigns.get(ad_id.clone()).await? {
        Some(campaign) => Ok(Json(campaign)),
        None => Err(ApiError::NotFound(format!("Campaign not found: {ad_id}"))),
    }
}

pub async fn update_campaign(
    State(state): State<AppState>,
    Path(ad_id): Path<String>,
    body: Result<Json<CampaignUpdate>, JsonRejection>,
) -> ApiResult<Campaign> {
    let Json(update) = body?;
    Ok(Json(state.campaigns.update_campaign(ad_id, update).await?))
}

pub async fn delete_campaign(
    State(state): State<AppState>,
    Path(ad_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.campaigns.delete(ad_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn predict(
    State(state): State<AppState>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> ApiResult<Prediction> {
    let Json(request) = body?;
    Ok(Json(state.predictions.predict(request).await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct ConversationRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ConversationReply {
    pub reply: String,
}

/// Placeholder assistant endpoint: echoes the message back.
pub async fn conversation(body: Result<Json<ConversationRequest>, JsonRejection>) -> ApiResult<ConversationReply> {
    let Json(request) = body?;
    info!(chars = request.message.len(), "Conversation message received");
    Ok(Json(ConversationReply {
        reply: format!("Received your message: {}", request.message),
    }))
}
