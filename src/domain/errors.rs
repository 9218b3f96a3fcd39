use thiserror::Error;

/// Typed failures raised by the order lifecycle core.
///
/// These propagate unchanged up to the HTTP binding, which maps each kind
/// to a transport status code (see `crate::errors`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("missing required data: {0}")]
    MissingData(String),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("business rule violated: {0}")]
    BusinessRule(String),
    #[error("persistence failure: {0}")]
    Persistence(String),
}
