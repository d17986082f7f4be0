//! Shared error taxonomy for access-control outcomes.
//!
//! Every authorization failure in the service maps onto one of these
//! variants; HTTP handlers translate them to status codes at the edge.

#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("not entitled to perform this operation")]
    Forbidden,

    #[error("resource not found")]
    NotFound,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AccessError {
    /// Whether this failure is the caller's fault (as opposed to ours).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, AccessError::Internal(_))
    }
}
