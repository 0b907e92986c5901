//! Error types for the Campaign actor.

use thiserror::Error;

use crate::framework::{FrameworkError, StoreError};

/// Errors that can occur during campaign operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CampaignError {
    /// The requested campaign row was not found.
    #[error("Campaign not found: {0}")]
    NotFound(String),

    /// A row with the same `Ad_ID` already exists.
    #[error("Campaign already exists: {0}")]
    AlreadyExists(String),

    /// The campaign data provided is invalid.
    #[error("Campaign validation error: {0}")]
    ValidationError(String),

    /// An underlying database error occurred.
    #[error("Campaign database error: {0}")]
    DatabaseError(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for CampaignError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => CampaignError::NotFound(id),
            FrameworkError::Custom(msg) => CampaignError::ValidationError(msg),
            FrameworkError::Store(StoreError::Duplicate(id)) => CampaignError::AlreadyExists(id),
            FrameworkError::Store(other) => CampaignError::DatabaseError(other.to_string()),
            other @ (FrameworkError::ActorClosed | FrameworkError::ActorDropped) => {
                CampaignError::ActorCommunicationError(other.to_string())
            }
        }
    }
}
