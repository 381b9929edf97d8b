pub mod model;
pub mod repository;
pub mod validate;

/// Error taxonomy for every domain operation. All variants surface directly
/// to the caller; nothing is retried or recovered locally.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid value for {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("dangling reference: {0}")]
    Reference(String),
    #[error("not found: {0}")]
    NotFound(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
