//! Mapping domain errors onto HTTP responses with a `{"error": "..."}` body.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::campaign_actor::CampaignError;
use crate::dashboard::DashboardError;
use crate::insight_actor::InsightError;
use crate::predictor::PredictError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error("{0}")]
    Unavailable(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<CampaignError> for ApiError {
    fn from(e: CampaignError) -> Self {
        match e {
            CampaignError::NotFound(_) => ApiError::NotFound(e.to_string()),
            CampaignError::AlreadyExists(_) => ApiError::Conflict(e.to_string()),
            CampaignError::ValidationError(_) => ApiError::BadRequest(e.to_string()),
            CampaignError::DatabaseError(_) | CampaignError::ActorCommunicationError(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<InsightError> for ApiError {
    fn from(e: InsightError) -> Self {
        match e {
            InsightError::NotFound(_) => ApiError::NotFound(e.to_string()),
            InsightError::ValidationError(_) => ApiError::BadRequest(e.to_string()),
            InsightError::DatabaseError(_) | InsightError::ActorCommunicationError(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<DashboardError> for ApiError {
    fn from(e: DashboardError) -> Self {
        match e {
            DashboardError::Campaign(e) => e.into(),
            DashboardError::Insight(e) => e.into(),
        }
    }
}

impl From<PredictError> for ApiError {
    fn from(e: PredictError) -> Self {
        match e {
            PredictError::ModelNotLoaded => ApiError::Unavailable(e.to_string()),
            PredictError::UnknownPlatform(_) => ApiError::Unprocessable(e.to_string()),
            PredictError::CampaignNotFound(_) => ApiError::NotFound(e.to_string()),
            PredictError::Campaign(inner) => inner.into(),
            PredictError::Artifacts(_) | PredictError::UndecodableOutput { .. } => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(CampaignError::NotFound("x".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(CampaignError::AlreadyExists("x".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(ApiError::from(PredictError::ModelNotLoaded).status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            ApiError::from(PredictError::UnknownPlatform("TikTok Ads".into())).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(DashboardError::Campaign(CampaignError::ActorCommunicationError("closed".into()))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
