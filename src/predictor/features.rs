//! Turning a campaign (stored or submitted) into the model's input vector.

use serde::Deserialize;

use crate::metrics;
use crate::model::{lenient, Campaign};

/// Width of the model input.
pub const FEATURE_COUNT: usize = 10;

/// Column order of the model input.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "platform",
    "impressions",
    "clicks",
    "spend",
    "conversions",
    "CTR",
    "ROAS",
    "budget_a",
    "budget_b",
    "budget_c",
];

pub type FeatureVector = [f64; FEATURE_COUNT];

const PLATFORM_SUFFIX: &str = " Ads";

/// The platform label as the encoder knows it: `"Google"` becomes `"Google Ads"`.
/// A label that already ends in "Ads" is kept as is.
pub fn platform_label(platform: &str) -> String {
    let trimmed = platform.trim();
    if trimmed.to_ascii_lowercase().ends_with(" ads") {
        trimmed.to_string()
    } else {
        format!("{trimmed}{PLATFORM_SUFFIX}")
    }
}

/// Parses a free-text percentage triplet such as `"40%, 35%, 25%"`.
///
/// Parts are split on commas, slashes, semicolons or whitespace. Unparseable
/// parts read as `0.0`; the result is padded with zeros or truncated to three.
pub fn parse_budget_triplet(raw: &str) -> [f64; 3] {
    let mut triplet = [0.0; 3];
    raw.split(|c: char| matches!(c, ',' | '/' | ';') || c.is_whitespace())
        .map(|part| part.trim().trim_end_matches('%').trim())
        .filter(|part| !part.is_empty())
        .take(3)
        .enumerate()
        .for_each(|(i, part)| triplet[i] = part.parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0));
    triplet
}

/// Raw (unscaled, unencoded) prediction inputs.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FeatureInput {
    pub platform: String,
    #[serde(default, deserialize_with = "lenient::i64_or_zero")]
    pub impressions: i64,
    #[serde(default, deserialize_with = "lenient::i64_or_zero")]
    pub clicks: i64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub spend: f64,
    #[serde(default, deserialize_with = "lenient::i64_or_zero")]
    pub conversions: i64,
    /// Supplied click-through rate; computed from clicks and impressions when absent.
    #[serde(default, alias = "CTR")]
    pub ctr: Option<f64>,
    /// Supplied return on ad spend; `0.0` when absent since no revenue is known.
    #[serde(default, alias = "ROAS")]
    pub roas: Option<f64>,
    #[serde(default, alias = "recommended_budget_distribution")]
    pub budget_distribution: Option<String>,
}

impl FeatureInput {
    /// Inputs for a stored row. CTR and ROAS are always derived from its counters.
    pub fn from_campaign(campaign: &Campaign) -> Self {
        Self {
            platform: campaign.platform.clone(),
            impressions: campaign.impressions,
            clicks: campaign.clicks,
            spend: campaign.cost,
            conversions: campaign.conversions,
            ctr: Some(metrics::ctr(campaign.clicks, campaign.impressions)),
            roas: Some(metrics::roas(campaign.sale_amount, campaign.cost)),
            budget_distribution: campaign.budget_distribution.clone(),
        }
    }

    pub fn ctr(&self) -> f64 {
        self.ctr.unwrap_or_else(|| metrics::ctr(self.clicks, self.impressions))
    }

    pub fn roas(&self) -> f64 {
        self.roas.unwrap_or(0.0)
    }

    /// The ten model inputs, with the platform already encoded.
    pub fn vector(&self, platform_code: f64) -> FeatureVector {
        let [a, b, c] = self
            .budget_distribution
            .as_deref()
            .map(parse_budget_triplet)
            .unwrap_or_default();
        [
            platform_code,
            self.impressions as f64,
            self.clicks as f64,
            self.spend,
            self.conversions as f64,
            self.ctr(),
            self.roas(),
            a,
            b,
            c,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_label() {
        assert_eq!(platform_label("Google"), "Google Ads");
        assert_eq!(platform_label(" Meta "), "Meta Ads");
        assert_eq!(platform_label("Google Ads"), "Google Ads");
    }

    #[test]
    fn test_budget_triplet_separators() {
        assert_eq!(parse_budget_triplet("40%, 35%, 25%"), [40.0, 35.0, 25.0]);
        assert_eq!(parse_budget_triplet("50/30/20"), [50.0, 30.0, 20.0]);
        assert_eq!(parse_budget_triplet("10; 20 30"), [10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_budget_triplet_pads_truncates_and_defaults() {
        assert_eq!(parse_budget_triplet("60%"), [60.0, 0.0, 0.0]);
        assert_eq!(parse_budget_triplet("1,2,3,4"), [1.0, 2.0, 3.0]);
        assert_eq!(parse_budget_triplet("abc, 20%"), [0.0, 20.0, 0.0]);
        assert_eq!(parse_budget_triplet(""), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_vector_from_stored_row() {
        let mut row = Campaign::new("ad_1", "Spring");
        row.platform = "Google".into();
        row.impressions = 1000;
        row.clicks = 50;
        row.cost = 100.0;
        row.sale_amount = 250.0;
        row.conversions = 5;
        row.budget_distribution = Some("40%, 35%, 25%".into());

        let v = FeatureInput::from_campaign(&row).vector(1.0);
        assert_eq!(v, [1.0, 1000.0, 50.0, 100.0, 5.0, 5.0, 2.5, 40.0, 35.0, 25.0]);
    }

    #[test]
    fn test_direct_payload_accepts_export_keys() {
        let input: FeatureInput = serde_json::from_str(
            r#"{"platform":"Meta","impressions":"2,000","clicks":40,"spend":80,"conversions":4,
                "CTR":2.5,"recommended_budget_distribution":"50/50"}"#,
        )
        .unwrap();
        assert_eq!(input.impressions, 2000);
        assert_eq!(input.ctr(), 2.5);
        assert_eq!(input.roas(), 0.0);
        assert_eq!(input.vector(0.0)[7..], [50.0, 50.0, 0.0]);
    }
}
