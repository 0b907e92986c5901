//! # Campaign Client
//!
//! High-level API for the campaign actor. Every dashboard figure is built from
//! the typed queries exposed here; callers never see SQL or channel plumbing.

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info, instrument};

use crate::campaign_actor::{
    CampaignAction, CampaignActionResult, CampaignError, CampaignQuery, CampaignQueryResult, CampaignTotals,
    DailyTotals, GroupTotals, TrafficDelta,
};
use crate::clients::actor_client::ActorClient;
use crate::framework::ResourceClient;
use crate::model::{Campaign, CampaignCreate, CampaignUpdate};

/// Outcome of a bulk ingest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkInsertSummary {
    pub inserted: usize,
    /// Rows skipped because their `Ad_ID` already existed.
    pub duplicates: usize,
    /// Rows rejected by validation before reaching the store.
    pub invalid: usize,
}

fn unexpected(query: &str) -> CampaignError {
    CampaignError::ActorCommunicationError(format!("unexpected response to {query}"))
}

/// Client for interacting with the Campaign actor.
#[derive(Clone)]
pub struct CampaignClient {
    inner: ResourceClient<Campaign>,
}

impl CampaignClient {
    pub fn new(inner: ResourceClient<Campaign>) -> Self {
        Self { inner }
    }

    /// Stores one campaign row, returning its `Ad_ID`.
    #[instrument(skip(self, params))]
    pub async fn ingest(&self, params: CampaignCreate) -> Result<String, CampaignError> {
        debug!(?params, "ingest called");
        let ad_id = self.inner.create(params).await?;
        info!(%ad_id, "Campaign stored");
        Ok(ad_id)
    }

    #[instrument(skip(self))]
    pub async fn update_campaign(&self, ad_id: String, update: CampaignUpdate) -> Result<Campaign, CampaignError> {
        debug!("Sending request");
        Ok(self.inner.update(ad_id, update).await?)
    }

    /// Adds simulated traffic to one row and returns the updated row.
    #[instrument(skip(self))]
    pub async fn apply_traffic(&self, ad_id: String, delta: TrafficDelta) -> Result<Campaign, CampaignError> {
        match self.inner.perform_action(ad_id, CampaignAction::ApplyTraffic(delta)).await? {
            CampaignActionResult::ApplyTraffic(campaign) => Ok(campaign),
        }
    }

    #[instrument(skip(self))]
    pub async fn totals(&self) -> Result<CampaignTotals, CampaignError> {
        match self.inner.query(CampaignQuery::Totals).await? {
            CampaignQueryResult::Totals(totals) => Ok(totals),
            _ => Err(unexpected("Totals")),
        }
    }

    #[instrument(skip(self))]
    pub async fn per_campaign(&self, limit: Option<usize>) -> Result<Vec<GroupTotals>, CampaignError> {
        match self.inner.query(CampaignQuery::PerCampaign { limit }).await? {
            CampaignQueryResult::PerCampaign(groups) => Ok(groups),
            _ => Err(unexpected("PerCampaign")),
        }
    }

    #[instrument(skip(self))]
    pub async fn by_device(&self) -> Result<Vec<GroupTotals>, CampaignError> {
        match self.inner.query(CampaignQuery::ByDevice).await? {
            CampaignQueryResult::ByDevice(groups) => Ok(groups),
            _ => Err(unexpected("ByDevice")),
        }
    }

    #[instrument(skip(self))]
    pub async fn by_platform(&self) -> Result<Vec<GroupTotals>, CampaignError> {
        match self.inner.query(CampaignQuery::ByPlatform).await? {
            CampaignQueryResult::ByPlatform(groups) => Ok(groups),
            _ => Err(unexpected("ByPlatform")),
        }
    }

    #[instrument(skip(self))]
    pub async fn daily_totals(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DailyTotals>, CampaignError> {
        match self.inner.query(CampaignQuery::DailyTotals { from, to }).await? {
            CampaignQueryResult::DailyTotals(days) => Ok(days),
            _ => Err(unexpected("DailyTotals")),
        }
    }

    /// The most recent row recorded for `name`.
    #[instrument(skip(self))]
    pub async fn latest_by_name(&self, name: String) -> Result<Option<Campaign>, CampaignError> {
        match self.inner.query(CampaignQuery::LatestByName(name)).await? {
            CampaignQueryResult::LatestByName(campaign) => Ok(campaign),
            _ => Err(unexpected("LatestByName")),
        }
    }

    #[instrument(skip(self))]
    pub async fn sample_ids(&self, limit: usize) -> Result<Vec<String>, CampaignError> {
        match self.inner.query(CampaignQuery::SampleIds { limit }).await? {
            CampaignQueryResult::SampleIds(ids) => Ok(ids),
            _ => Err(unexpected("SampleIds")),
        }
    }

    /// Validates and inserts a batch in one transaction. Invalid rows are
    /// counted and dropped; rows missing an `Ad_ID` get a fresh UUID.
    #[instrument(skip(self, batch), fields(rows = batch.len()))]
    pub async fn bulk_insert(&self, batch: Vec<CampaignCreate>) -> Result<BulkInsertSummary, CampaignError> {
        let mut invalid = 0;
        let mut rows = Vec::with_capacity(batch.len());
        for params in batch {
            let ad_id = params
                .ad_id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            match Campaign::from_ingest(ad_id, params) {
                Ok(row) => rows.push(row),
                Err(reason) => {
                    debug!(%reason, "Rejected row");
                    invalid += 1;
                }
            }
        }
        let submitted = rows.len();
        let inserted = match self.inner.query(CampaignQuery::BulkInsert(rows)).await? {
            CampaignQueryResult::BulkInsert(n) => n,
            _ => return Err(unexpected("BulkInsert")),
        };
        Ok(BulkInsertSummary {
            inserted,
            duplicates: submitted - inserted,
            invalid,
        })
    }
}

#[async_trait]
impl ActorClient<Campaign> for CampaignClient {
    type Error = CampaignError;

    fn inner(&self) -> &ResourceClient<Campaign> {
        &self.inner
    }
}
