//! Collection-level queries for the Campaign actor.
//!
//! Each query maps to one SQL aggregate (or bulk write) executed by
//! [`SqliteCampaignStore`](super::SqliteCampaignStore) inside the actor task.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::Campaign;

#[derive(Debug, Clone)]
pub enum CampaignQuery {
    /// Sums over the whole table.
    Totals,
    /// Sums grouped by campaign name, highest revenue first.
    PerCampaign { limit: Option<usize> },
    /// Sums grouped by device, most impressions first.
    ByDevice,
    /// Sums grouped by platform, highest revenue first.
    ByPlatform,
    /// Daily sums for `from..=to`, oldest first. Days without rows are absent.
    DailyTotals { from: NaiveDate, to: NaiveDate },
    /// The most recent row for a campaign name.
    LatestByName(String),
    /// Up to `limit` random row ids.
    SampleIds { limit: usize },
    /// Inserts prepared rows in one transaction; rows whose id already exists are skipped.
    BulkInsert(Vec<Campaign>),
}

/// Results from CampaignQueries - variants match 1:1 with CampaignQuery
#[derive(Debug, Clone)]
pub enum CampaignQueryResult {
    Totals(CampaignTotals),
    PerCampaign(Vec<GroupTotals>),
    ByDevice(Vec<GroupTotals>),
    ByPlatform(Vec<GroupTotals>),
    DailyTotals(Vec<DailyTotals>),
    LatestByName(Option<Campaign>),
    SampleIds(Vec<String>),
    /// Number of rows actually inserted.
    BulkInsert(usize),
}

/// Table-wide sums.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CampaignTotals {
    pub rows: i64,
    pub campaigns: i64,
    pub cost: f64,
    pub sale_amount: f64,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub leads: i64,
}

/// Sums for one group (campaign name, device or platform).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupTotals {
    pub key: String,
    pub rows: i64,
    pub cost: f64,
    pub sale_amount: f64,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
}

/// Sums for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
}
