//! # Dashboard
//!
//! Read models for the dashboard routes. [`DashboardService`] turns the
//! campaign actor's aggregates into the JSON shapes in [`views`], applying the
//! formulas from [`crate::metrics`] and the weekly back-fill from [`trend`].

pub mod live;
pub mod trend;
pub mod views;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::campaign_actor::CampaignError;
use crate::clients::{CampaignClient, InsightClient};
use crate::insight_actor::InsightError;
use crate::model::Insight;

pub use live::DEFAULT_LIVE_SAMPLE;
pub use trend::{BackfillPolicy, TrendPoint};
pub use views::*;

/// Default row limit for `/getKpiData`.
pub const DEFAULT_KPI_LIMIT: usize = 6;
/// Default row limit for `/getCampaignPerformance`.
pub const DEFAULT_PERFORMANCE_LIMIT: usize = 5;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DashboardError {
    #[error(transparent)]
    Campaign(#[from] CampaignError),
    #[error(transparent)]
    Insight(#[from] InsightError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardSettings {
    pub backfill: BackfillPolicy,
    /// Rows mutated per `/realTime` call.
    pub live_sample: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            backfill: BackfillPolicy::default(),
            live_sample: DEFAULT_LIVE_SAMPLE,
        }
    }
}

#[derive(Clone)]
pub struct DashboardService {
    campaigns: CampaignClient,
    insights: InsightClient,
    settings: DashboardSettings,
    simulator_started: Arc<AtomicBool>,
}

impl DashboardService {
    pub fn new(campaigns: CampaignClient, insights: InsightClient, settings: DashboardSettings) -> Self {
        Self {
            campaigns,
            insights,
            settings,
            simulator_started: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn settings(&self) -> DashboardSettings {
        self.settings
    }

    /// Per-campaign sums with CTR, CPC and ROAS, highest revenue first.
    #[instrument(skip(self))]
    pub async fn all_campaigns(&self, limit: Option<usize>) -> Result<Vec<CampaignRow>, DashboardError> {
        let groups = self.campaigns.per_campaign(limit).await?;
        Ok(groups.into_iter().map(CampaignRow::from).collect())
    }

    /// Seven points ending on `today`, oldest first.
    #[instrument(skip(self))]
    pub async fn weekly_trends(&self, today: NaiveDate) -> Result<Vec<TrendPoint>, DashboardError> {
        let days = self.campaigns.daily_totals(trend::window_start(today), today).await?;
        let points = trend::weekly_trend(today, &days, self.settings.backfill);
        debug!(
            stored = points.iter().filter(|p| !p.synthetic).count(),
            policy = %self.settings.backfill,
            "Weekly trend built"
        );
        Ok(points)
    }

    #[instrument(skip(self))]
    pub async fn device_demographics(&self) -> Result<Vec<DeviceRow>, DashboardError> {
        let groups = self.campaigns.by_device().await?;
        Ok(groups.into_iter().map(DeviceRow::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn kpi_data(&self, limit: usize) -> Result<Vec<KpiPoint>, DashboardError> {
        let groups = self.campaigns.per_campaign(Some(limit)).await?;
        Ok(groups.into_iter().map(KpiPoint::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn campaign_performance(&self, limit: usize) -> Result<Vec<PerformanceSlice>, DashboardError> {
        let groups = self.campaigns.per_campaign(Some(limit)).await?;
        Ok(views::performance_slices(groups))
    }

    #[instrument(skip(self))]
    pub async fn kpi_summary(&self) -> Result<KpiSummary, DashboardError> {
        Ok(KpiSummary::from(self.campaigns.totals().await?))
    }

    #[instrument(skip(self))]
    pub async fn platform_performance(&self) -> Result<Vec<PlatformRow>, DashboardError> {
        let groups = self.campaigns.by_platform().await?;
        Ok(groups.into_iter().map(PlatformRow::from).collect())
    }

    /// Adds random traffic to a sample of rows, then reports the new totals.
    ///
    /// A sampled row deleted before its delta lands is skipped, as is a row
    /// whose counters cannot grow any further.
    #[instrument(skip(self))]
    pub async fn real_time(&self) -> Result<LiveSnapshot, DashboardError> {
        let ids = self.campaigns.sample_ids(self.settings.live_sample).await?;
        let deltas: Vec<_> = {
            let mut rng = rand::thread_rng();
            ids.iter().map(|_| live::random_delta(&mut rng)).collect()
        };

        for (ad_id, delta) in ids.into_iter().zip(deltas) {
            match self.campaigns.apply_traffic(ad_id, delta).await {
                Ok(_) => {}
                Err(CampaignError::NotFound(ad_id)) => debug!(%ad_id, "Sampled row vanished"),
                Err(CampaignError::ValidationError(reason)) => warn!(%reason, "Traffic delta rejected"),
                Err(e) => return Err(e.into()),
            }
        }

        let totals = self.campaigns.totals().await?;
        Ok(LiveSnapshot::from(&totals))
    }

    #[instrument(skip(self))]
    pub async fn predictive_insights(&self) -> Result<Vec<Insight>, DashboardError> {
        Ok(self.insights.list().await?)
    }

    /// Applies live traffic every `every` in a background task.
    ///
    /// Returns `None` if a simulator was already started for this service.
    /// The task stops once the campaign actor has shut down, or when the
    /// returned [`Simulator`] is stopped or dropped.
    pub fn start_simulator(&self, every: Duration) -> Option<Simulator> {
        if self
            .simulator_started
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Traffic simulator already running");
            return None;
        }

        info!(interval_ms = every.as_millis() as u64, "Starting traffic simulator");
        let service = self.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + every, every);
            loop {
                ticker.tick().await;
                match service.real_time().await {
                    Ok(snapshot) => debug!(impressions = snapshot.total_impressions, "Simulated traffic"),
                    Err(DashboardError::Campaign(CampaignError::ActorCommunicationError(reason))) => {
                        info!(%reason, "Traffic simulator stopped");
                        break;
                    }
                    Err(e) => warn!(error = %e, "Simulated traffic failed"),
                }
            }
        });
        Some(Simulator { handle })
    }
}

/// The running traffic simulator. It holds a campaign client, so the campaign
/// actor cannot shut down until the simulator is gone; dropping it aborts the task.
pub struct Simulator {
    handle: JoinHandle<()>,
}

impl Simulator {
    /// Aborts the task and waits until it has released its clients.
    pub async fn stop(mut self) {
        self.handle.abort();
        let _ = (&mut self.handle).await;
        info!("Traffic simulator stopped");
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
