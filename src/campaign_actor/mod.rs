//! Campaign-specific resource logic: the `campaigns` table, its aggregate
//! queries and the live-traffic action.

mod actions;
pub mod entity;
pub mod error;
mod queries;
pub mod store;

pub use actions::*;
pub use entity::MAX_COUNT;
pub use error::*;
pub use queries::*;
pub use store::SqliteCampaignStore;

use crate::clients::CampaignClient;
use crate::framework::ResourceActor;
use crate::model::Campaign;

/// Creates a new Campaign actor over `store` and its client.
///
/// Rows ingested without an `Ad_ID` get a random UUID.
pub fn new(store: SqliteCampaignStore, buffer_size: usize) -> (ResourceActor<Campaign, SqliteCampaignStore>, CampaignClient) {
    let next_ad_id = || uuid::Uuid::new_v4().to_string();
    let (actor, generic_client) = ResourceActor::new(buffer_size, store, next_ad_id);
    (actor, CampaignClient::new(generic_client))
}
