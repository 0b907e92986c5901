//! Error types for the Insight actor.

use thiserror::Error;

use crate::framework::{FrameworkError, StoreError};

/// Errors that can occur during insight operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InsightError {
    /// The requested insight was not found.
    #[error("Insight not found: {0}")]
    NotFound(String),

    /// The insight data provided is invalid.
    #[error("Insight validation error: {0}")]
    ValidationError(String),

    /// An underlying database error occurred.
    #[error("Insight database error: {0}")]
    DatabaseError(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for InsightError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => InsightError::NotFound(id),
            FrameworkError::Custom(msg) => InsightError::ValidationError(msg),
            FrameworkError::Store(StoreError::Duplicate(id)) => {
                InsightError::ValidationError(format!("duplicate insight id {id}"))
            }
            FrameworkError::Store(other) => InsightError::DatabaseError(other.to_string()),
            other @ (FrameworkError::ActorClosed | FrameworkError::ActorDropped) => {
                InsightError::ActorCommunicationError(other.to_string())
            }
        }
    }
}
