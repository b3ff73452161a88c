//! Endpoint handlers for the HTTP layer.
//!
//! - `/health` - Health check endpoint
//! - `/api/v1/pokemon/{nameOrId}` - single entity lookup
//! - `/api/v1/pokemon/list` - paginated listing
//! - `/api/v1/admin/cache/stats` and `/api/v1/admin/cache` - cache admin
//!
//! Handlers return `EndpointResponse` instead of writing to the connection,
//! which keeps them testable without a socket.

use std::time::Instant;

use crate::constants::{DEFAULT_PAGE_LIMIT, DEFAULT_PAGE_OFFSET};
use crate::error::LookupError;
use crate::service::LookupService;

/// Response from an endpoint handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointResponse {
    /// HTTP status code
    pub status: u16,
    /// Content-Type header value
    pub content_type: &'static str,
    /// Response body
    pub body: String,
}

impl EndpointResponse {
    /// Create a JSON response with the given status and body.
    pub fn json(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: "application/json",
            body,
        }
    }

    /// Create a bodiless response.
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: String::new(),
        }
    }

    /// Serialize `value` as a 200 JSON response, or a 500 if that fails.
    pub fn ok_json<T: serde::Serialize>(value: &T, path: &str) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self::json(200, body),
            Err(e) => error_response(&LookupError::Internal(e.to_string()), path),
        }
    }
}

/// Error body: `{status, error, message, path}`
pub fn error_response(error: &LookupError, path: &str) -> EndpointResponse {
    error_body(error.status_code(), error.reason(), &error.public_message(), path)
}

/// Error body for routing failures that never reach the lookup service
pub fn error_body(status: u16, reason: &str, message: &str, path: &str) -> EndpointResponse {
    let body = serde_json::json!({
        "status": status,
        "error": reason,
        "message": message,
        "path": path,
    })
    .to_string();

    EndpointResponse::json(status, body)
}

/// Generate response for /health endpoint.
pub fn handle_health(start_time: Instant) -> EndpointResponse {
    let uptime_seconds = start_time.elapsed().as_secs();
    let version = env!("CARGO_PKG_VERSION");

    let body = serde_json::json!({
        "status": "healthy",
        "uptime_seconds": uptime_seconds,
        "version": version
    })
    .to_string();

    EndpointResponse::json(200, body)
}

/// Look up one entity. `raw_segment` is the still-encoded path segment.
pub async fn handle_entity(
    service: &LookupService,
    raw_segment: &str,
    path: &str,
) -> EndpointResponse {
    let identifier = match urlencoding::decode(raw_segment) {
        Ok(decoded) => decoded,
        Err(_) => {
            let err = LookupError::InvalidIdentifier(
                "Pokemon name or id is not valid UTF-8".to_string(),
            );
            return error_response(&err, path);
        }
    };

    match service.get_entity(&identifier).await {
        Ok(entity) => EndpointResponse::ok_json(entity.as_ref(), path),
        Err(e) => error_response(&e, path),
    }
}

/// Look up one page of the listing from `?offset=&limit=`
pub async fn handle_listing(
    service: &LookupService,
    query: Option<&str>,
    path: &str,
) -> EndpointResponse {
    let (offset, limit) = match parse_page_query(query) {
        Ok(page) => page,
        Err(e) => return error_response(&e, path),
    };

    match service.get_page(offset, limit).await {
        Ok(page) => EndpointResponse::ok_json(page.as_ref(), path),
        Err(e) => error_response(&e, path),
    }
}

/// Per-namespace cache statistics
pub async fn handle_cache_stats(service: &LookupService, path: &str) -> EndpointResponse {
    service.run_pending_cache_tasks().await;
    let stats = service.cache_stats().await;
    EndpointResponse::ok_json(&stats, path)
}

/// Empty both cache namespaces
pub async fn handle_cache_clear(service: &LookupService) -> EndpointResponse {
    service.clear_caches().await;
    EndpointResponse::empty(204)
}

/// Parse `offset` and `limit` from a query string, applying defaults.
///
/// Range checks belong to the lookup service; this only rejects values that
/// are not integers. Unknown parameters are ignored and the last occurrence
/// of a repeated parameter wins.
pub fn parse_page_query(query: Option<&str>) -> Result<(i64, i64), LookupError> {
    let mut offset = DEFAULT_PAGE_OFFSET;
    let mut limit = DEFAULT_PAGE_LIMIT;

    for pair in query.unwrap_or("").split('&').filter(|p| !p.is_empty()) {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        let target = match name {
            "offset" => &mut offset,
            "limit" => &mut limit,
            _ => continue,
        };

        let decoded = urlencoding::decode(value).map_err(|_| {
            LookupError::InvalidIdentifier(format!("{} must be an integer", name))
        })?;
        *target = decoded.trim().parse::<i64>().map_err(|_| {
            LookupError::InvalidIdentifier(format!(
                "{} must be an integer, got '{}'",
                name, decoded
            ))
        })?;
    }

    Ok((offset, limit))
}
