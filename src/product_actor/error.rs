use thiserror::Error;
use uuid::Uuid;

use crate::actor_framework::FrameworkError;
use crate::validation::ValidationReport;

/// Errors that can occur during product operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(Uuid),
    #[error("Product validation error: {0}")]
    ValidationError(ValidationReport),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl ProductError {
    /// Maps a framework error for a request that targeted `id`.
    pub fn for_id(id: Uuid) -> impl FnOnce(FrameworkError) -> ProductError {
        move |err| match err {
            FrameworkError::NotFound(_) => ProductError::NotFound(id),
            other => other.into(),
        }
    }
}

impl From<FrameworkError> for ProductError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::Validation(report) => ProductError::ValidationError(report),
            // Only id-targeted requests can miss; those go through `for_id`.
            FrameworkError::NotFound(raw) => match raw.parse() {
                Ok(id) => ProductError::NotFound(id),
                Err(_) => ProductError::ActorCommunicationError(format!("Item not found: {}", raw)),
            },
            other => ProductError::ActorCommunicationError(other.to_string()),
        }
    }
}
