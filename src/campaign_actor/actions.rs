//! Custom actions for the Campaign actor.
//!
//! Actions mutate a single stored row beyond plain field updates. They are
//! handled by [`ActorEntity::handle_action`](crate::framework::ActorEntity::handle_action)
//! and the mutated row is written back by the actor.

use crate::model::Campaign;

/// Counters added to a campaign row by simulated live traffic.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrafficDelta {
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub cost: f64,
    pub sale_amount: f64,
}

/// Custom actions for Campaign entities.
#[derive(Debug, Clone)]
pub enum CampaignAction {
    /// Adds the delta to the row's counters.
    ///
    /// # Errors
    /// Fails if any component of the delta is negative.
    ApplyTraffic(TrafficDelta),
}

/// Results from CampaignActions - variants match 1:1 with CampaignAction
#[derive(Debug, Clone)]
pub enum CampaignActionResult {
    /// The row after the delta was applied.
    ApplyTraffic(Campaign),
}
