//! # Resource Stores
//!
//! A [`ResourceStore`] is the persistence half of a [`ResourceActor`](super::ResourceActor).
//! The actor owns its store exclusively, so implementations can hold
//! non-`Sync` handles such as a `rusqlite::Connection` without any locking.
//!
//! Every method is synchronous: a store call runs inside the actor's message
//! loop and completes before the next message is taken off the channel.

use super::core::ActorEntity;

/// Errors raised by a store implementation.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum StoreError {
    #[error("Duplicate key: {0}")]
    Duplicate(String),
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::SqliteFailure(ref code, ref msg)
                if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                    || code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                StoreError::Duplicate(msg.clone().unwrap_or_else(|| e.to_string()))
            }
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Persistence contract for a single entity type.
///
/// Besides the per-entity CRUD calls, a store answers collection-level
/// [`ActorEntity::Query`] requests (aggregates, bulk writes) which have no
/// natural home on a single entity.
pub trait ResourceStore<T: ActorEntity>: Send + 'static {
    /// Persist a newly created entity. Fails with [`StoreError::Duplicate`] if the id exists.
    fn insert(&mut self, item: &T) -> Result<(), StoreError>;

    /// Load an entity by id.
    fn fetch(&self, id: &T::Id) -> Result<Option<T>, StoreError>;

    /// Overwrite an existing entity.
    fn save(&mut self, item: &T) -> Result<(), StoreError>;

    /// Remove an entity, returning whether it existed.
    fn remove(&mut self, id: &T::Id) -> Result<bool, StoreError>;

    /// Number of stored entities.
    fn count(&self) -> Result<usize, StoreError>;

    /// Run a collection-level query.
    fn query(&mut self, query: T::Query) -> Result<T::QueryResult, StoreError>;
}
