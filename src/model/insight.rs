/// A precomputed recommendation row from `predictive_insights`.
///
/// Rows are seeded, never derived at request time. See
/// [`insight_actor::seed`](crate::insight_actor::seed) for the sample set.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Serialized with the table's column names, which the insights page reads directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    #[serde(rename = "Insight_ID")]
    pub id: String,
    #[serde(rename = "Campaign_Name")]
    pub campaign_name: String,
    #[serde(rename = "Spend")]
    pub spend: f64,
    #[serde(rename = "Status")]
    pub status: InsightStatus,
    #[serde(rename = "CPC")]
    pub cpc: f64,
    #[serde(rename = "Bidding_Strategy")]
    pub bidding_strategy: String,
    #[serde(rename = "Conversions")]
    pub conversions: i64,
    #[serde(rename = "Revenue")]
    pub revenue: f64,
    #[serde(rename = "Profitable", with = "yes_no")]
    pub profitable: bool,
    #[serde(rename = "Recommendation")]
    pub recommendation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsightStatus {
    Active,
    Paused,
    Ended,
}

impl fmt::Display for InsightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InsightStatus::Active => "Active",
            InsightStatus::Paused => "Paused",
            InsightStatus::Ended => "Ended",
        };
        f.write_str(s)
    }
}

impl FromStr for InsightStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(InsightStatus::Active),
            "paused" => Ok(InsightStatus::Paused),
            "ended" => Ok(InsightStatus::Ended),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// DTO for creating an insight row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightCreate {
    pub campaign_name: String,
    pub spend: f64,
    pub status: InsightStatus,
    pub cpc: f64,
    pub bidding_strategy: String,
    pub conversions: i64,
    pub revenue: f64,
    #[serde(with = "yes_no")]
    pub profitable: bool,
    pub recommendation: String,
}

/// DTO for insight updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightUpdate {
    pub spend: Option<f64>,
    pub cpc: Option<f64>,
    pub bidding_strategy: Option<String>,
    pub conversions: Option<i64>,
    pub revenue: Option<f64>,
    pub profitable: Option<bool>,
    pub recommendation: Option<String>,
}

/// `true`/`false` on the wire as `"Yes"`/`"No"`, the way the table stores it.
pub mod yes_no {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn as_str(value: bool) -> &'static str {
        if value {
            "Yes"
        } else {
            "No"
        }
    }

    pub fn parse(raw: &str) -> Option<bool> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" | "1" => Some(true),
            "no" | "false" | "0" => Some(false),
            _ => None,
        }
    }

    pub fn serialize<S: Serializer>(value: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(as_str(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("expected Yes/No, got {raw:?}")))
    }
}
