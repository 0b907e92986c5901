//! # Prediction Pipeline
//!
//! `POST /predict` resolves its input (a stored campaign or a direct payload),
//! encodes the platform, builds the ten-feature vector, scales it and runs the
//! four-output model. Categorical outputs are decoded back to their labels and
//! binary outputs become `"Yes"` / `"No"` at a 0.5 threshold.

pub mod artifacts;
pub mod features;
pub mod model;

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::campaign_actor::CampaignError;
use crate::clients::CampaignClient;
use crate::model::yes_no;

pub use artifacts::{ArtifactBundle, LabelEncoder, StandardScaler};
pub use features::{FeatureInput, FeatureVector, FEATURE_COUNT};
pub use model::{LinearHeads, MultiOutputModel, RawOutputs};

/// Probability at or above which a binary output reads `"Yes"`.
pub const BINARY_THRESHOLD: f64 = 0.5;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Prediction model is not loaded")]
    ModelNotLoaded,
    #[error("Invalid model artifacts: {0}")]
    Artifacts(String),
    #[error("Unknown platform label '{0}'")]
    UnknownPlatform(String),
    #[error("No campaign named '{0}'")]
    CampaignNotFound(String),
    #[error("Model produced class {code} outside the {head} encoder")]
    UndecodableOutput { head: &'static str, code: usize },
    #[error(transparent)]
    Campaign(#[from] CampaignError),
}

/// Body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PredictRequest {
    /// Predict for the most recent stored row with this name.
    Stored { campaign_name: String },
    /// Predict for submitted figures.
    Direct(FeatureInput),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    #[serde(rename = "Budget Recommendation")]
    pub budget_recommendation: String,
    #[serde(rename = "Performance Alerts")]
    pub performance_alerts: String,
    #[serde(rename = "Audience Expansion", with = "yes_no")]
    pub audience_expansion: bool,
    #[serde(rename = "Creative Refresh", with = "yes_no")]
    pub creative_refresh: bool,
}

/// Preprocessing plus model, loaded once at start-up.
pub struct Predictor {
    platform_encoder: LabelEncoder,
    scaler: StandardScaler,
    budget_classes: LabelEncoder,
    alert_classes: LabelEncoder,
    model: Box<dyn MultiOutputModel>,
}

impl Predictor {
    /// Uses the bundle's own linear heads as the model.
    pub fn from_bundle(bundle: ArtifactBundle) -> Result<Self, PredictError> {
        let model = Box::new(LinearHeads::from(&bundle));
        Self::with_model(bundle, model)
    }

    /// Pairs the bundle's encoders and scaler with another model binding.
    pub fn with_model(bundle: ArtifactBundle, model: Box<dyn MultiOutputModel>) -> Result<Self, PredictError> {
        bundle.validate()?;
        Ok(Self {
            platform_encoder: bundle.platform_encoder,
            scaler: bundle.scaler,
            budget_classes: LabelEncoder {
                classes: bundle.budget_recommendation.classes,
            },
            alert_classes: LabelEncoder {
                classes: bundle.performance_alerts.classes,
            },
            model,
        })
    }

    pub fn load(path: &Path) -> Result<Self, PredictError> {
        let predictor = Self::from_bundle(ArtifactBundle::load(path)?)?;
        info!(path = %path.display(), platforms = predictor.platform_encoder.classes.len(), "Prediction model loaded");
        Ok(predictor)
    }

    /// Encoded platform plus the nine numeric features, before scaling.
    pub fn features(&self, input: &FeatureInput) -> Result<FeatureVector, PredictError> {
        let label = features::platform_label(&input.platform);
        let code = self
            .platform_encoder
            .encode(&label)
            .ok_or(PredictError::UnknownPlatform(label))?;
        Ok(input.vector(code as f64))
    }

    pub fn predict(&self, input: &FeatureInput) -> Result<Prediction, PredictError> {
        let raw_features = self.features(input)?;
        let scaled = self.scaler.transform(&raw_features);
        let out = self.model.predict(&scaled);
        debug!(?raw_features, ?out, "Model evaluated");

        let decode = |encoder: &LabelEncoder, head: &'static str, code: usize| {
            encoder
                .decode(code)
                .map(str::to_string)
                .ok_or(PredictError::UndecodableOutput { head, code })
        };
        Ok(Prediction {
            budget_recommendation: decode(&self.budget_classes, "budget_recommendation", out.budget_recommendation)?,
            performance_alerts: decode(&self.alert_classes, "performance_alerts", out.performance_alerts)?,
            audience_expansion: out.audience_expansion >= BINARY_THRESHOLD,
            creative_refresh: out.creative_refresh >= BINARY_THRESHOLD,
        })
    }
}

/// Resolves prediction requests against the campaign table.
#[derive(Clone)]
pub struct PredictionService {
    campaigns: CampaignClient,
    predictor: Option<Arc<Predictor>>,
}

impl PredictionService {
    pub fn new(campaigns: CampaignClient, predictor: Option<Predictor>) -> Self {
        Self {
            campaigns,
            predictor: predictor.map(Arc::new),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.predictor.is_some()
    }

    #[instrument(skip(self))]
    pub async fn predict(&self, request: PredictRequest) -> Result<Prediction, PredictError> {
        let predictor = self.predictor.as_ref().ok_or(PredictError::ModelNotLoaded)?;
        let input = match request {
            PredictRequest::Stored { campaign_name } => {
                let row = self
                    .campaigns
                    .latest_by_name(campaign_name.clone())
                    .await?
                    .ok_or(PredictError::CampaignNotFound(campaign_name))?;
                FeatureInput::from_campaign(&row)
            }
            PredictRequest::Direct(input) => input,
        };
        predictor.predict(&input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign_actor::CampaignQueryResult;
    use crate::framework::mock::MockClient;
    use crate::model::Campaign;
    use artifacts::{BinaryHead, CategoricalHead};

    /// Budget head picks class 1 when clicks (scaled) are positive; alert head
    /// always picks class 0; audience expansion follows spend; creative refresh is always off.
    pub(crate) fn bundle() -> ArtifactBundle {
        let mut clicks_row = vec![0.0; FEATURE_COUNT];
        clicks_row[2] = 1.0;
        let mut spend = vec![0.0; FEATURE_COUNT];
        spend[3] = 1.0;
        ArtifactBundle {
            platform_encoder: LabelEncoder {
                classes: vec!["Facebook Ads".into(), "Google Ads".into()],
            },
            scaler: StandardScaler {
                mean: vec![0.0; FEATURE_COUNT],
                scale: vec![1.0; FEATURE_COUNT],
            },
            budget_recommendation: CategoricalHead {
                classes: vec!["Decrease".into(), "Increase".into()],
                weights: vec![vec![0.0; FEATURE_COUNT], clicks_row],
                bias: vec![0.0, 0.0],
            },
            performance_alerts: CategoricalHead {
                classes: vec!["Stable".into(), "Declining".into()],
                weights: vec![vec![0.0; FEATURE_COUNT], vec![0.0; FEATURE_COUNT]],
                bias: vec![1.0, 0.0],
            },
            audience_expansion: BinaryHead { weights: spend, bias: -100.0 },
            creative_refresh: BinaryHead {
                weights: vec![0.0; FEATURE_COUNT],
                bias: -5.0,
            },
        }
    }

    fn direct(platform: &str, spend: f64) -> FeatureInput {
        FeatureInput {
            platform: platform.into(),
            impressions: 1000,
            clicks: 20,
            spend,
            conversions: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_predict_decodes_all_heads() {
        let predictor = Predictor::from_bundle(bundle()).unwrap();
        let p = predictor.predict(&direct("Google", 500.0)).unwrap();
        assert_eq!(p.budget_recommendation, "Increase");
        assert_eq!(p.performance_alerts, "Stable");
        assert!(p.audience_expansion);
        assert!(!p.creative_refresh);

        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["Audience Expansion"], "Yes");
        assert_eq!(json["Creative Refresh"], "No");
    }

    #[test]
    fn test_platform_code_is_encoder_index() {
        let predictor = Predictor::from_bundle(bundle()).unwrap();
        assert_eq!(predictor.features(&direct("Facebook Ads", 1.0)).unwrap()[0], 0.0);
        assert_eq!(predictor.features(&direct("Google", 1.0)).unwrap()[0], 1.0);
    }

    #[test]
    fn test_unknown_platform() {
        let predictor = Predictor::from_bundle(bundle()).unwrap();
        let err = predictor.predict(&direct("TikTok", 1.0)).unwrap_err();
        assert!(matches!(err, PredictError::UnknownPlatform(label) if label == "TikTok Ads"));
    }

    #[test]
    fn test_request_shapes() {
        let stored: PredictRequest = serde_json::from_str(r#"{"campaign_name":"Spring"}"#).unwrap();
        assert_eq!(stored, PredictRequest::Stored { campaign_name: "Spring".into() });

        let direct: PredictRequest =
            serde_json::from_str(r#"{"platform":"Google","impressions":10,"clicks":1,"spend":2,"conversions":0}"#)
                .unwrap();
        assert!(matches!(direct, PredictRequest::Direct(input) if input.platform == "Google"));
    }

    #[tokio::test]
    async fn test_service_without_model() {
        let mock = MockClient::<Campaign>::new();
        let service = PredictionService::new(CampaignClient::new(mock.client()), None);
        let err = service
            .predict(PredictRequest::Stored { campaign_name: "x".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, PredictError::ModelNotLoaded));
    }

    #[tokio::test]
    async fn test_service_uses_latest_stored_row() {
        let mock = MockClient::<Campaign>::new();
        let mut row = Campaign::new("ad_9", "Spring");
        row.platform = "Facebook".into();
        row.clicks = 0;
        mock.expect_query().return_ok(CampaignQueryResult::LatestByName(Some(row)));
        mock.expect_query().return_ok(CampaignQueryResult::LatestByName(None));

        let predictor = Predictor::from_bundle(bundle()).unwrap();
        let service = PredictionService::new(CampaignClient::new(mock.client()), Some(predictor));

        let p = service
            .predict(PredictRequest::Stored { campaign_name: "Spring".into() })
            .await
            .unwrap();
        assert_eq!(p.budget_recommendation, "Decrease");

        let missing = service
            .predict(PredictRequest::Stored { campaign_name: "Nope".into() })
            .await
            .unwrap_err();
        assert!(matches!(missing, PredictError::CampaignNotFound(name) if name == "Nope"));
        mock.verify();
    }
}
