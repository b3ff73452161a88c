// Error types module

use thiserror::Error;

use crate::upstream::UpstreamError;

/// Centralized error type for lookups
///
/// Every component raises one of these kinds and the lookup service
/// propagates them unchanged. The HTTP layer maps each kind to a status
/// code through [`LookupError::status_code`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Malformed or empty identifier, or invalid offset/limit
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Upstream confirmed the identifier does not exist
    #[error("Pokemon not found: {0}")]
    NotFound(String),

    /// Upstream rejected the shape of the request
    #[error("Upstream rejected request: {0}")]
    BadUpstreamRequest(String),

    /// Upstream answered with a 5xx status
    #[error("Upstream server error ({status}): {message}")]
    UpstreamServerError { status: u16, message: String },

    /// Upstream could not be reached (connect failure, timeout)
    #[error("Upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    /// Upstream payload is missing a field the normalizer requires
    #[error("Malformed upstream data: {0}")]
    MalformedUpstreamData(String),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LookupError {
    /// HTTP status code presented to the caller
    pub fn status_code(&self) -> u16 {
        match self {
            LookupError::InvalidIdentifier(_) | LookupError::BadUpstreamRequest(_) => 400,
            LookupError::NotFound(_) => 404,
            LookupError::UpstreamServerError { .. } | LookupError::UpstreamUnreachable(_) => 503,
            LookupError::MalformedUpstreamData(_) | LookupError::Internal(_) => 500,
        }
    }

    /// Reason code used in error bodies
    pub fn reason(&self) -> &'static str {
        match self.status_code() {
            400 => "BAD_REQUEST",
            404 => "NOT_FOUND",
            503 => "SERVICE_UNAVAILABLE",
            _ => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Message safe to show to a client
    ///
    /// Server-side failures collapse to a generic message so no upstream
    /// payload or internal detail leaks out.
    pub fn public_message(&self) -> String {
        match self {
            LookupError::MalformedUpstreamData(_) | LookupError::Internal(_) => {
                "Something went wrong".to_string()
            }
            LookupError::UpstreamServerError { .. } | LookupError::UpstreamUnreachable(_) => {
                "Pokemon service is temporarily unavailable".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<UpstreamError> for LookupError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::NotFound(what) => LookupError::NotFound(what),
            UpstreamError::BadRequest(msg) => LookupError::BadUpstreamRequest(msg),
            UpstreamError::ServerError { status, message } => {
                LookupError::UpstreamServerError { status, message }
            }
            UpstreamError::Unreachable(msg) => LookupError::UpstreamUnreachable(msg),
            UpstreamError::InvalidBody(msg) => LookupError::MalformedUpstreamData(msg),
        }
    }
}
