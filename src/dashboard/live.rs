//! Random traffic for the "real-time" view.

use rand::Rng;

use crate::campaign_actor::TrafficDelta;

/// Default number of rows touched per `/realTime` request.
pub const DEFAULT_LIVE_SAMPLE: usize = 25;

/// Draws one delta: up to 500 impressions, 25 clicks and 5 conversions, with
/// a per-click price between 0.20 and 1.50.
pub fn random_delta<R: Rng + ?Sized>(rng: &mut R) -> TrafficDelta {
    let clicks: i64 = rng.gen_range(0..=25);
    let cost = clicks as f64 * rng.gen_range(0.2..1.5);
    TrafficDelta {
        impressions: rng.gen_range(0..=500),
        clicks,
        conversions: rng.gen_range(0..=5),
        cost,
        sale_amount: 0.0,
    }
}
