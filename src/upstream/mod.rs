//! Upstream client abstraction
//!
//! The lookup service talks to the creature-data API only through the
//! [`UpstreamClient`] trait. Records come back untyped (`serde_json::Value`);
//! shaping them is the normalizer's job.

mod client;

pub use client::{classify_status, PokeApiClient, PokeApiClientBuilder};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Failures surfaced by an upstream fetch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// 404 from upstream
    #[error("not found: {0}")]
    NotFound(String),

    /// Upstream rejected the request shape (4xx other than 404), or the
    /// request was rejected locally before being sent
    #[error("bad request: {0}")]
    BadRequest(String),

    /// 5xx from upstream
    #[error("server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Connection refused, DNS failure, timeout
    #[error("unreachable: {0}")]
    Unreachable(String),

    /// 2xx response whose body is not JSON
    #[error("invalid response body: {0}")]
    InvalidBody(String),
}

/// Raw fetches against the creature-data API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Fetch the entity record for a normalized identifier
    async fn fetch_entity(&self, identifier: &str) -> Result<Value, UpstreamError>;

    /// Fetch the species record carrying flavor-text descriptions
    async fn fetch_description(&self, identifier: &str) -> Result<Value, UpstreamError>;

    /// Fetch one page of the listing
    ///
    /// Implementations must reject `offset < 0` or `limit <= 0` with
    /// [`UpstreamError::BadRequest`] before doing any I/O.
    async fn fetch_listing(&self, offset: i64, limit: i64) -> Result<Value, UpstreamError>;
}
