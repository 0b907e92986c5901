//! Type-safe wrappers around [`ResourceClient`](crate::framework::ResourceClient).

pub mod actor_client;
pub mod campaign_client;
pub mod insight_client;

pub use actor_client::*;
pub use campaign_client::*;
pub use insight_client::*;
