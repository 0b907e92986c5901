//! ActorEntity trait implementation for the Insight domain type.

use async_trait::async_trait;

use super::actions::{InsightAction, InsightActionResult, InsightQuery, InsightQueryResult};
use crate::framework::ActorEntity;
use crate::model::{Insight, InsightCreate, InsightUpdate};

fn check_amount(field: &str, value: f64) -> Result<f64, String> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("{field} must be a non-negative number, got {value}"))
    }
}

impl Insight {
    /// Builds a validated insight row.
    pub fn from_params(id: String, params: InsightCreate) -> Result<Self, String> {
        let campaign_name = params.campaign_name.trim().to_string();
        if campaign_name.is_empty() {
            return Err("Campaign_Name must not be empty".into());
        }
        if params.conversions < 0 {
            return Err(format!("Conversions must not be negative, got {}", params.conversions));
        }
        Ok(Self {
            id,
            campaign_name,
            spend: check_amount("Spend", params.spend)?,
            status: params.status,
            cpc: check_amount("CPC", params.cpc)?,
            bidding_strategy: params.bidding_strategy,
            conversions: params.conversions,
            revenue: check_amount("Revenue", params.revenue)?,
            profitable: params.profitable,
            recommendation: params.recommendation,
        })
    }
}

#[async_trait]
impl ActorEntity for Insight {
    type Id = String;
    type CreateParams = InsightCreate;
    type UpdateParams = InsightUpdate;
    type Action = InsightAction;
    type ActionResult = InsightActionResult;
    type Query = InsightQuery;
    type QueryResult = InsightQueryResult;
    type Context = ();

    fn from_create_params(id: String, params: InsightCreate) -> Result<Self, String> {
        Self::from_params(id, params)
    }

    async fn on_update(&mut self, update: InsightUpdate, _ctx: &()) -> Result<(), String> {
        if let Some(spend) = update.spend {
            self.spend = check_amount("Spend", spend)?;
        }
        if let Some(cpc) = update.cpc {
            self.cpc = check_amount("CPC", cpc)?;
        }
        if let Some(revenue) = update.revenue {
            self.revenue = check_amount("Revenue", revenue)?;
        }
        if let Some(conversions) = update.conversions {
            if conversions < 0 {
                return Err(format!("Conversions must not be negative, got {conversions}"));
            }
            self.conversions = conversions;
        }
        if let Some(strategy) = update.bidding_strategy {
            self.bidding_strategy = strategy;
        }
        if let Some(profitable) = update.profitable {
            self.profitable = profitable;
        }
        if let Some(recommendation) = update.recommendation {
            self.recommendation = recommendation;
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: InsightAction, _ctx: &()) -> Result<InsightActionResult, String> {
        match action {
            InsightAction::SetStatus(status) => {
                let previous = std::mem::replace(&mut self.status, status);
                Ok(InsightActionResult::SetStatus(previous))
            }
        }
    }
}
