/// One row of the `campaigns` fact table.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](crate::framework::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](crate::framework::ResourceActor).
///
/// See [`impl ActorEntity for Campaign`](#impl-ActorEntity-for-Campaign) for details on:
/// - Creation parameters ([`CampaignCreate`])
/// - Update parameters ([`CampaignUpdate`])
/// - Custom actions ([`CampaignAction`](crate::campaign_actor::CampaignAction))
/// - Queries ([`CampaignQuery`](crate::campaign_actor::CampaignQuery))
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::lenient;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Campaign {
    pub ad_id: String,
    pub campaign_name: String,
    pub platform: String,
    pub device: String,
    pub keyword: String,
    pub location: String,
    pub ad_date: Option<NaiveDate>,
    pub cost: f64,
    pub sale_amount: f64,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub leads: i64,
    pub conversion_rate: f64,
    /// Free-text percentage triplet, e.g. `"40%, 35%, 25%"`.
    pub budget_distribution: Option<String>,
}

impl Campaign {
    /// Creates a campaign with the given id and name and every metric at zero.
    pub fn new(ad_id: impl Into<String>, campaign_name: impl Into<String>) -> Self {
        Self {
            ad_id: ad_id.into(),
            campaign_name: campaign_name.into(),
            platform: String::new(),
            device: String::new(),
            keyword: String::new(),
            location: String::new(),
            ad_date: None,
            cost: 0.0,
            sale_amount: 0.0,
            impressions: 0,
            clicks: 0,
            conversions: 0,
            leads: 0,
            conversion_rate: 0.0,
            budget_distribution: None,
        }
    }
}

/// Ingest payload for a campaign row.
///
/// Accepts both snake_case keys and the export column headers (`Ad_ID`,
/// `Sale_Amount`, `Conversion Rate`, ...), so the same type serves the JSON
/// endpoint and the CSV loader. Missing values fall back to zero / empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignCreate {
    #[serde(default, alias = "Ad_ID", deserialize_with = "lenient::opt_string")]
    pub ad_id: Option<String>,
    #[serde(default, alias = "Campaign_Name", deserialize_with = "lenient::opt_string")]
    pub campaign_name: Option<String>,
    #[serde(default, alias = "Platform")]
    pub platform: String,
    #[serde(default, alias = "Device")]
    pub device: String,
    #[serde(default, alias = "Keyword")]
    pub keyword: String,
    #[serde(default, alias = "Location")]
    pub location: String,
    #[serde(default, alias = "Ad_Date", deserialize_with = "lenient::opt_date")]
    pub ad_date: Option<NaiveDate>,
    #[serde(default, alias = "Cost", deserialize_with = "lenient::f64_or_zero")]
    pub cost: f64,
    #[serde(default, alias = "Sale_Amount", deserialize_with = "lenient::f64_or_zero")]
    pub sale_amount: f64,
    #[serde(default, alias = "Impressions", deserialize_with = "lenient::i64_or_zero")]
    pub impressions: i64,
    #[serde(default, alias = "Clicks", deserialize_with = "lenient::i64_or_zero")]
    pub clicks: i64,
    #[serde(default, alias = "Conversions", deserialize_with = "lenient::i64_or_zero")]
    pub conversions: i64,
    #[serde(default, alias = "Leads", deserialize_with = "lenient::i64_or_zero")]
    pub leads: i64,
    #[serde(default, alias = "Conversion Rate", deserialize_with = "lenient::f64_or_zero")]
    pub conversion_rate: f64,
    #[serde(
        default,
        alias = "Budget_Distribution",
        alias = "recommended_budget_distribution",
        deserialize_with = "lenient::opt_string"
    )]
    pub budget_distribution: Option<String>,
}

/// Partial update for a campaign row. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignUpdate {
    pub campaign_name: Option<String>,
    pub platform: Option<String>,
    pub device: Option<String>,
    pub keyword: Option<String>,
    pub location: Option<String>,
    pub ad_date: Option<NaiveDate>,
    pub cost: Option<f64>,
    pub sale_amount: Option<f64>,
    pub impressions: Option<i64>,
    pub clicks: Option<i64>,
    pub conversions: Option<i64>,
    pub leads: Option<i64>,
    pub conversion_rate: Option<f64>,
    pub budget_distribution: Option<String>,
}
