//! JSON shapes returned by the dashboard routes.

use serde::Serialize;

use crate::campaign_actor::{CampaignTotals, GroupTotals};
use crate::metrics::{self, round2, DerivedMetrics};

/// Slice colours for the campaign-performance pie chart, reused cyclically.
pub const PERFORMANCE_PALETTE: [&str; 5] = ["#8884d8", "#82ca9d", "#ffc658", "#ff7c7c", "#8dd1e1"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignRow {
    pub campaign_name: String,
    pub cost: f64,
    pub sale_amount: f64,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub ctr: f64,
    pub cpc: f64,
    pub roas: f64,
}

impl From<GroupTotals> for CampaignRow {
    fn from(g: GroupTotals) -> Self {
        Self {
            ctr: round2(metrics::ctr(g.clicks, g.impressions)),
            cpc: round2(metrics::cpc(g.cost, g.clicks)),
            roas: round2(metrics::roas(g.sale_amount, g.cost)),
            cost: round2(g.cost),
            sale_amount: round2(g.sale_amount),
            campaign_name: g.key,
            impressions: g.impressions,
            clicks: g.clicks,
            conversions: g.conversions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceRow {
    pub device: String,
    pub impressions: i64,
    pub conversions: i64,
}

impl From<GroupTotals> for DeviceRow {
    fn from(g: GroupTotals) -> Self {
        Self {
            device: g.key,
            impressions: g.impressions,
            conversions: g.conversions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiPoint {
    pub name: String,
    pub roi: f64,
    pub ctr: f64,
}

impl From<GroupTotals> for KpiPoint {
    fn from(g: GroupTotals) -> Self {
        Self {
            roi: round2(metrics::roi(g.sale_amount, g.cost)),
            ctr: round2(metrics::ctr(g.clicks, g.impressions)),
            name: g.key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSlice {
    pub name: String,
    /// Share of the listed campaigns' revenue, in percent.
    pub value: f64,
    pub color: &'static str,
}

/// Turns per-campaign revenue into pie slices that sum to ~100.
pub fn performance_slices(groups: Vec<GroupTotals>) -> Vec<PerformanceSlice> {
    let total: f64 = groups.iter().map(|g| g.sale_amount).sum();
    groups
        .into_iter()
        .enumerate()
        .map(|(i, g)| PerformanceSlice {
            value: if total > 0.0 { round2(g.sale_amount / total * 100.0) } else { 0.0 },
            color: PERFORMANCE_PALETTE[i % PERFORMANCE_PALETTE.len()],
            name: g.key,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    #[serde(flatten)]
    pub totals: CampaignTotals,
    #[serde(flatten)]
    pub metrics: DerivedMetrics,
}

impl From<CampaignTotals> for KpiSummary {
    fn from(totals: CampaignTotals) -> Self {
        let metrics = DerivedMetrics::compute(
            totals.cost,
            totals.sale_amount,
            totals.impressions,
            totals.clicks,
            totals.conversions,
        )
        .rounded();
        Self { totals, metrics }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformRow {
    pub platform: String,
    pub rows: i64,
    pub cost: f64,
    pub sale_amount: f64,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub ctr: f64,
    pub roas: f64,
    pub roi: f64,
}

impl From<GroupTotals> for PlatformRow {
    fn from(g: GroupTotals) -> Self {
        Self {
            ctr: round2(metrics::ctr(g.clicks, g.impressions)),
            roas: round2(metrics::roas(g.sale_amount, g.cost)),
            roi: round2(metrics::roi(g.sale_amount, g.cost)),
            cost: round2(g.cost),
            sale_amount: round2(g.sale_amount),
            platform: g.key,
            rows: g.rows,
            impressions: g.impressions,
            clicks: g.clicks,
            conversions: g.conversions,
        }
    }
}

/// Figures reported by `/realTime`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveSnapshot {
    pub total_campaigns: i64,
    pub total_impressions: i64,
    pub avg_ctr: f64,
    pub total_clicks: i64,
    /// Mean conversions per stored row.
    pub avg_conversions: f64,
    pub total_cpc: f64,
}

impl From<&CampaignTotals> for LiveSnapshot {
    fn from(t: &CampaignTotals) -> Self {
        let avg_conversions = if t.rows > 0 {
            t.conversions as f64 / t.rows as f64
        } else {
            0.0
        };
        Self {
            total_campaigns: t.campaigns,
            total_impressions: t.impressions,
            avg_ctr: round2(metrics::ctr(t.clicks, t.impressions)),
            total_clicks: t.clicks,
            avg_conversions: round2(avg_conversions),
            total_cpc: round2(metrics::cpc(t.cost, t.clicks)),
        }
    }
}
