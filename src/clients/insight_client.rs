use async_trait::async_trait;
use tracing::{info, instrument};

use crate::clients::actor_client::ActorClient;
use crate::framework::ResourceClient;
use crate::insight_actor::{InsightAction, InsightActionResult, InsightError, InsightQuery, InsightQueryResult};
use crate::model::{Insight, InsightCreate, InsightStatus};

/// Client for interacting with the Insight actor.
#[derive(Clone)]
pub struct InsightClient {
    inner: ResourceClient<Insight>,
}

impl InsightClient {
    pub fn new(inner: ResourceClient<Insight>) -> Self {
        Self { inner }
    }

    /// Every stored insight, ordered by campaign name.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Insight>, InsightError> {
        match self.inner.query(InsightQuery::All).await? {
            InsightQueryResult::All(rows) => Ok(rows),
            _ => Err(InsightError::ActorCommunicationError("unexpected response to All".into())),
        }
    }

    /// Replaces the whole table with `rows`, returning how many were written.
    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    pub async fn replace_all(&self, rows: Vec<InsightCreate>) -> Result<usize, InsightError> {
        let insights = rows
            .into_iter()
            .map(|params| Insight::from_params(uuid::Uuid::new_v4().to_string(), params))
            .collect::<Result<Vec<_>, _>>()
            .map_err(InsightError::ValidationError)?;
        match self.inner.query(InsightQuery::ReplaceAll(insights)).await? {
            InsightQueryResult::ReplaceAll(n) => {
                info!(rows = n, "Insights replaced");
                Ok(n)
            }
            _ => Err(InsightError::ActorCommunicationError("unexpected response to ReplaceAll".into())),
        }
    }

    /// Changes an insight's status, returning the previous status.
    #[instrument(skip(self))]
    pub async fn set_status(&self, id: String, status: InsightStatus) -> Result<InsightStatus, InsightError> {
        match self.inner.perform_action(id, InsightAction::SetStatus(status)).await? {
            InsightActionResult::SetStatus(previous) => Ok(previous),
        }
    }
}

#[async_trait]
impl ActorClient<Insight> for InsightClient {
    type Error = InsightError;

    fn inner(&self) -> &ResourceClient<Insight> {
        &self.inner
    }
}
