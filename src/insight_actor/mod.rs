//! Insight-specific resource logic: the seeded `predictive_insights` table.

mod actions;
pub mod entity;
pub mod error;
pub mod seed;
pub mod store;

pub use actions::*;
pub use error::*;
pub use store::SqliteInsightStore;

use crate::clients::InsightClient;
use crate::framework::ResourceActor;
use crate::model::Insight;

/// Creates a new Insight actor over `store` and its client.
pub fn new(store: SqliteInsightStore, buffer_size: usize) -> (ResourceActor<Insight, SqliteInsightStore>, InsightClient) {
    let next_insight_id = || uuid::Uuid::new_v4().to_string();
    let (actor, generic_client) = ResourceActor::new(buffer_size, store, next_insight_id);
    (actor, InsightClient::new(generic_client))
}
