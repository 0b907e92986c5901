//! Derived campaign metrics.
//!
//! Every ratio is zero-guarded: a zero (or negative) denominator yields `0.0`
//! rather than `NaN` or infinity, so the values always serialise as JSON numbers.

/// `numerator / denominator`, or `0.0` when the denominator is not positive.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Return on investment in percent: `((revenue - cost) / cost) * 100`.
pub fn roi(revenue: f64, cost: f64) -> f64 {
    ratio(revenue - cost, cost) * 100.0
}

/// Click-through rate in percent: `(clicks / impressions) * 100`.
pub fn ctr(clicks: i64, impressions: i64) -> f64 {
    ratio(clicks as f64, impressions as f64) * 100.0
}

/// Conversion rate in percent: `(conversions / clicks) * 100`.
pub fn conversion_rate(conversions: i64, clicks: i64) -> f64 {
    ratio(conversions as f64, clicks as f64) * 100.0
}

/// Cost per click.
pub fn cpc(cost: f64, clicks: i64) -> f64 {
    ratio(cost, clicks as f64)
}

/// Return on ad spend: `revenue / cost`.
pub fn roas(revenue: f64, cost: f64) -> f64 {
    ratio(revenue, cost)
}

/// Mean of ROI, CTR and conversion rate.
pub fn campaign_score(roi: f64, ctr: f64, conversion_rate: f64) -> f64 {
    (roi + ctr + conversion_rate) / 3.0
}

/// Rounds to two decimals for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The headline ratios for one set of summed counters.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct DerivedMetrics {
    pub roi: f64,
    pub ctr: f64,
    pub conversion_rate: f64,
    pub campaign_score: f64,
    pub cpc: f64,
    pub roas: f64,
}

impl DerivedMetrics {
    pub fn compute(cost: f64, revenue: f64, impressions: i64, clicks: i64, conversions: i64) -> Self {
        let roi = roi(revenue, cost);
        let ctr = ctr(clicks, impressions);
        let conversion_rate = conversion_rate(conversions, clicks);
        Self {
            roi,
            ctr,
            conversion_rate,
            campaign_score: campaign_score(roi, ctr, conversion_rate),
            cpc: cpc(cost, clicks),
            roas: roas(revenue, cost),
        }
    }

    /// The same metrics rounded to two decimals.
    pub fn rounded(self) -> Self {
        Self {
            roi: round2(self.roi),
            ctr: round2(self.ctr),
            conversion_rate: round2(self.conversion_rate),
            campaign_score: round2(self.campaign_score),
            cpc: round2(self.cpc),
            roas: round2(self.roas),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roi() {
        assert_eq!(roi(1500.0, 1000.0), 50.0);
        assert_eq!(roi(500.0, 1000.0), -50.0);
        assert_eq!(roi(1500.0, 0.0), 0.0);
    }

    #[test]
    fn test_rates_are_zero_guarded() {
        assert_eq!(ctr(30, 1000), 3.0);
        assert_eq!(ctr(30, 0), 0.0);
        assert_eq!(conversion_rate(5, 50), 10.0);
        assert_eq!(conversion_rate(5, 0), 0.0);
        assert_eq!(cpc(100.0, 0), 0.0);
        assert_eq!(roas(100.0, 0.0), 0.0);
    }

    #[test]
    fn test_campaign_score_is_mean_of_three() {
        let m = DerivedMetrics::compute(1000.0, 1500.0, 1000, 30, 3);
        assert_eq!(m.roi, 50.0);
        assert_eq!(m.ctr, 3.0);
        assert_eq!(m.conversion_rate, 10.0);
        assert_eq!(m.campaign_score, 21.0);
        assert_eq!(m.roas, 1.5);
        assert!((m.cpc - 33.333).abs() < 0.001);
        assert_eq!(m.rounded().cpc, 33.33);
    }
}
