use tracing::{error, info};

use crate::campaign_actor::SqliteCampaignStore;
use crate::clients::{CampaignClient, InsightClient};
use crate::config::Settings;
use crate::db;
use crate::framework::StoreError;
use crate::insight_actor::SqliteInsightStore;

/// The running table actors of the dashboard.
///
/// `DashboardSystem` is responsible for:
/// - **Storage**: opening one connection per table and creating the schema
/// - **Lifecycle**: spawning the campaign and insight actors, and joining them on shutdown
///
/// # Example
///
/// ```ignore
/// let system = DashboardSystem::start(&settings)?;
/// let totals = system.campaign_client.totals().await?;
/// system.shutdown().await?;
/// ```
pub struct DashboardSystem {
    /// Client for the `campaigns` table actor
    pub campaign_client: CampaignClient,

    /// Client for the `predictive_insights` table actor
    pub insight_client: InsightClient,

    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl DashboardSystem {
    /// Opens the database and starts both actors. Must be called inside a Tokio runtime.
    ///
    /// Tables are created if missing, so this doubles as `init-db`.
    pub fn start(settings: &Settings) -> Result<Self, StoreError> {
        let campaign_store = SqliteCampaignStore::new(db::open(&settings.database)?)?;
        let insight_store = SqliteInsightStore::new(db::open(&settings.database)?)?;

        let (campaign_actor, campaign_client) = crate::campaign_actor::new(campaign_store, settings.actor_buffer);
        let (insight_actor, insight_client) = crate::insight_actor::new(insight_store, settings.actor_buffer);

        // Neither table depends on the other (Context = ())
        let handles = vec![
            tokio::spawn(campaign_actor.run(())),
            tokio::spawn(insight_actor.run(())),
        ];
        info!(database = %settings.database, "Dashboard system started");

        Ok(Self {
            campaign_client,
            insight_client,
            handles,
        })
    }

    /// Both tables in private in-memory databases.
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::start(&Settings::in_memory())
    }

    /// Drops the clients held here and waits for both actors to exit.
    ///
    /// Actors stop once *every* clone of their client is gone, so callers must
    /// drop (or abort the tasks holding) any clones they handed out first.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.campaign_client);
        drop(self.insight_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ActorClient;
    use crate::model::CampaignCreate;

    #[tokio::test]
    async fn test_start_and_shutdown() {
        let system = DashboardSystem::in_memory().unwrap();
        let ad_id = system
            .campaign_client
            .ingest(CampaignCreate {
                ad_id: Some("A1".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(ad_id, "A1");
        assert_eq!(system.campaign_client.count().await.unwrap(), 1);
        assert_eq!(system.insight_client.count().await.unwrap(), 0);
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_file_database_is_shared_between_starts() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            database: db::DatabaseLocation::File(dir.path().join("nested").join("ads.db")),
            actor_buffer: 8,
        };

        let system = DashboardSystem::start(&settings).unwrap();
        system.campaign_client.ingest(CampaignCreate::default()).await.unwrap();
        system.shutdown().await.unwrap();

        let system = DashboardSystem::start(&settings).unwrap();
        assert_eq!(system.campaign_client.count().await.unwrap(), 1);
        system.shutdown().await.unwrap();
    }
}
