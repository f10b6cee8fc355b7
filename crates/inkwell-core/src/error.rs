//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Invalid credentials")]
    Unauthorized,

    #[error("Forbidden: not the author")]
    Forbidden,

    #[error(transparent)]
    Conflict(#[from] StateConflict),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity_type, id }
    }
}

/// Rejected lifecycle transitions. These are well-formed requests that the
/// current state of the resource does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateConflict {
    #[error("Post is already published")]
    AlreadyPublished,

    #[error("Post is already unpublished")]
    AlreadyDraft,

    #[error("Post is already published. Unpublish before updating.")]
    EditNotAllowed,

    #[error("Post is not published yet. So, you cannot comment on it")]
    PostNotPublished,
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
