//! Multi-output model interface and the linear implementation loaded from the bundle.

use super::artifacts::{ArtifactBundle, BinaryHead, CategoricalHead};
use super::features::FeatureVector;

/// Undecoded model output for one input row.
#[derive(Debug, Clone, PartialEq)]
pub struct RawOutputs {
    /// Class index of the budget recommendation head.
    pub budget_recommendation: usize,
    /// Class index of the performance alert head.
    pub performance_alerts: usize,
    /// Probability in `[0, 1]`.
    pub audience_expansion: f64,
    /// Probability in `[0, 1]`.
    pub creative_refresh: f64,
}

/// A model producing two categorical and two binary outputs from scaled features.
pub trait MultiOutputModel: Send + Sync {
    fn predict(&self, scaled: &FeatureVector) -> RawOutputs;
}

fn dot(weights: &[f64], x: &FeatureVector) -> f64 {
    weights.iter().zip(x).map(|(w, v)| w * v).sum()
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Softmax over the logits, numerically stabilised by the max logit.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|z| (z - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best, best_v), (i, &v)| if v > best_v { (i, v) } else { (best, best_v) })
        .0
}

fn classify(head: &CategoricalHead, x: &FeatureVector) -> usize {
    let logits: Vec<f64> = head
        .weights
        .iter()
        .zip(&head.bias)
        .map(|(row, b)| dot(row, x) + b)
        .collect();
    argmax(&softmax(&logits))
}

fn probability(head: &BinaryHead, x: &FeatureVector) -> f64 {
    sigmoid(dot(&head.weights, x) + head.bias)
}

/// Four independent linear heads.
#[derive(Debug, Clone)]
pub struct LinearHeads {
    budget_recommendation: CategoricalHead,
    performance_alerts: CategoricalHead,
    audience_expansion: BinaryHead,
    creative_refresh: BinaryHead,
}

impl From<&ArtifactBundle> for LinearHeads {
    fn from(bundle: &ArtifactBundle) -> Self {
        Self {
            budget_recommendation: bundle.budget_recommendation.clone(),
            performance_alerts: bundle.performance_alerts.clone(),
            audience_expansion: bundle.audience_expansion.clone(),
            creative_refresh: bundle.creative_refresh.clone(),
        }
    }
}

impl MultiOutputModel for LinearHeads {
    fn predict(&self, scaled: &FeatureVector) -> RawOutputs {
        RawOutputs {
            budget_recommendation: classify(&self.budget_recommendation, scaled),
            performance_alerts: classify(&self.performance_alerts, scaled),
            audience_expansion: probability(&self.audience_expansion, scaled),
            creative_refresh: probability(&self.creative_refresh, scaled),
        }
    }
}
