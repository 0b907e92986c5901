//! The saved preprocessing and model artifacts, stored together as one JSON bundle.
//!
//! ```json
//! {
//!   "platform_encoder": { "classes": ["Facebook Ads", "Google Ads"] },
//!   "scaler": { "mean": [..10], "scale": [..10] },
//!   "budget_recommendation": { "classes": [..], "weights": [[..10], ..], "bias": [..] },
//!   "performance_alerts":    { "classes": [..], "weights": [[..10], ..], "bias": [..] },
//!   "audience_expansion":    { "weights": [..10], "bias": 0.0 },
//!   "creative_refresh":      { "weights": [..10], "bias": 0.0 }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::features::{FeatureVector, FEATURE_COUNT};
use super::PredictError;

/// Maps class labels to their integer codes (the label's index).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelEncoder {
    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == label)
    }

    pub fn decode(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }
}

/// Per-feature standardisation: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Returns the scaled copy of `features`. A zero scale is treated as one.
    pub fn transform(&self, features: &FeatureVector) -> FeatureVector {
        let mut out = *features;
        for ((x, mean), scale) in out.iter_mut().zip(&self.mean).zip(&self.scale) {
            let scale = if *scale == 0.0 { 1.0 } else { *scale };
            *x = (*x - mean) / scale;
        }
        out
    }
}

/// Linear head scored with softmax over its classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalHead {
    pub classes: Vec<String>,
    /// One row of [`FEATURE_COUNT`] weights per class.
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

/// Linear head scored with a sigmoid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryHead {
    pub weights: Vec<f64>,
    pub bias: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactBundle {
    pub platform_encoder: LabelEncoder,
    pub scaler: StandardScaler,
    pub budget_recommendation: CategoricalHead,
    pub performance_alerts: CategoricalHead,
    pub audience_expansion: BinaryHead,
    pub creative_refresh: BinaryHead,
}

impl ArtifactBundle {
    pub fn load(path: &Path) -> Result<Self, PredictError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| PredictError::Artifacts(format!("cannot read {}: {e}", path.display())))?;
        let bundle: Self = serde_json::from_str(&raw)
            .map_err(|e| PredictError::Artifacts(format!("cannot parse {}: {e}", path.display())))?;
        bundle.validate()?;
        Ok(bundle)
    }

    /// Checks that every vector has the shape the model expects.
    pub fn validate(&self) -> Result<(), PredictError> {
        if self.platform_encoder.classes.is_empty() {
            return Err(PredictError::Artifacts("platform encoder has no classes".into()));
        }
        check_width("scaler.mean", self.scaler.mean.len())?;
        check_width("scaler.scale", self.scaler.scale.len())?;
        check_categorical("budget_recommendation", &self.budget_recommendation)?;
        check_categorical("performance_alerts", &self.performance_alerts)?;
        check_width("audience_expansion.weights", self.audience_expansion.weights.len())?;
        check_width("creative_refresh.weights", self.creative_refresh.weights.len())
    }
}

fn check_width(name: &str, len: usize) -> Result<(), PredictError> {
    if len == FEATURE_COUNT {
        Ok(())
    } else {
        Err(PredictError::Artifacts(format!("{name} has {len} entries, expected {FEATURE_COUNT}")))
    }
}

fn check_categorical(name: &str, head: &CategoricalHead) -> Result<(), PredictError> {
    let classes = head.classes.len();
    if classes == 0 || head.weights.len() != classes || head.bias.len() != classes {
        return Err(PredictError::Artifacts(format!(
            "{name} needs one weight row and one bias per class ({classes} classes, {} rows, {} biases)",
            head.weights.len(),
            head.bias.len()
        )));
    }
    head.weights
        .iter()
        .try_for_each(|row| check_width(&format!("{name}.weights row"), row.len()))
}
