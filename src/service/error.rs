use crate::authorization::{Operation, ResourceType};
use crate::db::DatabaseError;
use crate::identity::IdentityError;

/// Outcome taxonomy of the access-controlled service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Access denied: {operation} on {resource}")]
    Forbidden {
        resource: ResourceType,
        operation: Operation,
    },

    #[error("{0} not found")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(resource: ResourceType, key: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{resource} {key}"))
    }
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Duplicate { .. } | DatabaseError::ConstraintViolation(_) => {
                Self::Conflict(err.to_string())
            }
            DatabaseError::UnresolvedReference { .. }
            | DatabaseError::InvalidField { .. }
            | DatabaseError::InvalidEnum { .. }
            | DatabaseError::MissingDiscriminator { .. } => Self::BadRequest(err.to_string()),
            DatabaseError::NotFound { entity_type, id } => {
                Self::NotFound(format!("{entity_type} {id}"))
            }
            DatabaseError::Sqlite(_) | DatabaseError::MigrationFailed { .. } => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<IdentityError> for ServiceError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidCredentials => Self::Unauthenticated,
            IdentityError::Database(e) => e.into(),
        }
    }
}
