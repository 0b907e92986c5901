//! ActorEntity trait implementation for the Campaign domain type.
//!
//! Validation lives here: money columns may not be negative, counters stay
//! within `0..=MAX_COUNT`, and traffic deltas keep
//! `conversions <= clicks <= impressions`.

use async_trait::async_trait;

use super::actions::{CampaignAction, CampaignActionResult, TrafficDelta};
use super::queries::{CampaignQuery, CampaignQueryResult};
use crate::framework::ActorEntity;
use crate::model::{Campaign, CampaignCreate, CampaignUpdate};

pub const DEFAULT_CAMPAIGN_NAME: &str = "Unknown";

/// Upper bound for every counter column, so row arithmetic and table-wide
/// `SUM()`s stay inside `i64`.
pub const MAX_COUNT: i64 = 1_000_000_000_000;

fn non_negative_f64(field: &str, value: f64) -> Result<f64, String> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("{field} must be a non-negative number, got {value}"))
    }
}

fn count(field: &str, value: i64) -> Result<i64, String> {
    if (0..=MAX_COUNT).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{field} must be between 0 and {MAX_COUNT}, got {value}"))
    }
}

fn grow(field: &str, current: i64, by: i64) -> Result<i64, String> {
    current
        .checked_add(by)
        .filter(|total| *total <= MAX_COUNT)
        .ok_or_else(|| format!("{field} would exceed {MAX_COUNT}"))
}

impl Campaign {
    /// Builds a validated row from an ingest payload.
    pub fn from_ingest(ad_id: String, params: CampaignCreate) -> Result<Self, String> {
        if ad_id.trim().is_empty() {
            return Err("Ad_ID must not be empty".into());
        }
        Ok(Self {
            ad_id,
            campaign_name: params
                .campaign_name
                .unwrap_or_else(|| DEFAULT_CAMPAIGN_NAME.to_string()),
            platform: params.platform.trim().to_string(),
            device: params.device.trim().to_string(),
            keyword: params.keyword.trim().to_string(),
            location: params.location.trim().to_string(),
            ad_date: params.ad_date,
            cost: non_negative_f64("Cost", params.cost)?,
            sale_amount: non_negative_f64("Sale_Amount", params.sale_amount)?,
            impressions: count("Impressions", params.impressions)?,
            clicks: count("Clicks", params.clicks)?,
            conversions: count("Conversions", params.conversions)?,
            leads: count("Leads", params.leads)?,
            conversion_rate: non_negative_f64("Conversion Rate", params.conversion_rate)?,
            budget_distribution: params.budget_distribution,
        })
    }

    /// Adds a traffic delta, clamping so conversions never exceed clicks
    /// and clicks never exceed impressions.
    ///
    /// The row is left untouched when the delta is negative or would push a
    /// counter past [`MAX_COUNT`].
    pub fn apply_traffic(&mut self, delta: TrafficDelta) -> Result<(), String> {
        count("impressions delta", delta.impressions)?;
        count("clicks delta", delta.clicks)?;
        count("conversions delta", delta.conversions)?;
        non_negative_f64("cost delta", delta.cost)?;
        non_negative_f64("sale amount delta", delta.sale_amount)?;

        let impressions = grow("Impressions", self.impressions, delta.impressions)?;
        let clicks = grow("Clicks", self.clicks, delta.clicks)?.min(impressions.max(self.clicks));
        let conversions = grow("Conversions", self.conversions, delta.conversions)?.min(clicks.max(self.conversions));

        self.impressions = impressions;
        self.clicks = clicks;
        self.conversions = conversions;
        self.cost += delta.cost;
        self.sale_amount += delta.sale_amount;
        Ok(())
    }
}

#[async_trait]
impl ActorEntity for Campaign {
    type Id = String;
    type CreateParams = CampaignCreate;
    type UpdateParams = CampaignUpdate;
    type Action = CampaignAction;
    type ActionResult = CampaignActionResult;
    type Query = CampaignQuery;
    type QueryResult = CampaignQueryResult;
    type Context = ();

    /// Rows keep the `Ad_ID` they were ingested with.
    fn requested_id(params: &CampaignCreate) -> Option<String> {
        params.ad_id.clone()
    }

    fn from_create_params(id: String, params: CampaignCreate) -> Result<Self, String> {
        Self::from_ingest(id, params)
    }

    async fn on_update(&mut self, update: CampaignUpdate, _ctx: &()) -> Result<(), String> {
        if let Some(name) = update.campaign_name {
            let name = name.trim();
            if name.is_empty() {
                return Err("Campaign_Name must not be empty".into());
            }
            self.campaign_name = name.to_string();
        }
        if let Some(platform) = update.platform {
            self.platform = platform.trim().to_string();
        }
        if let Some(device) = update.device {
            self.device = device.trim().to_string();
        }
        if let Some(keyword) = update.keyword {
            self.keyword = keyword.trim().to_string();
        }
        if let Some(location) = update.location {
            self.location = location.trim().to_string();
        }
        if let Some(date) = update.ad_date {
            self.ad_date = Some(date);
        }
        if let Some(cost) = update.cost {
            self.cost = non_negative_f64("Cost", cost)?;
        }
        if let Some(sale_amount) = update.sale_amount {
            self.sale_amount = non_negative_f64("Sale_Amount", sale_amount)?;
        }
        if let Some(impressions) = update.impressions {
            self.impressions = count("Impressions", impressions)?;
        }
        if let Some(clicks) = update.clicks {
            self.clicks = count("Clicks", clicks)?;
        }
        if let Some(conversions) = update.conversions {
            self.conversions = count("Conversions", conversions)?;
        }
        if let Some(leads) = update.leads {
            self.leads = count("Leads", leads)?;
        }
        if let Some(rate) = update.conversion_rate {
            self.conversion_rate = non_negative_f64("Conversion Rate", rate)?;
        }
        if let Some(split) = update.budget_distribution {
            self.budget_distribution = Some(split).filter(|s| !s.trim().is_empty());
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: CampaignAction, _ctx: &()) -> Result<CampaignActionResult, String> {
        match action {
            CampaignAction::ApplyTraffic(delta) => {
                self.apply_traffic(delta)?;
                Ok(CampaignActionResult::ApplyTraffic(self.clone()))
            }
        }
    }
}
