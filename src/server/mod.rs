// Server module - hyper HTTP/1 server in front of the lookup service

mod endpoints;

pub use endpoints::{
    error_body, error_response, handle_cache_clear, handle_cache_stats, handle_entity,
    handle_health, handle_listing, parse_page_query, EndpointResponse,
};

use bytes::Bytes;
use http::{header, Method, Request, Response, StatusCode};
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;

use crate::service::LookupService;

const HEALTH_PATH: &str = "/health";
const ENTITY_PREFIX: &str = "/api/v1/pokemon/";
const LISTING_PATH: &str = "/api/v1/pokemon/list";
const CACHE_STATS_PATH: &str = "/api/v1/admin/cache/stats";
const CACHE_PATH: &str = "/api/v1/admin/cache";

/// HTTP front end for a [`LookupService`]
pub struct ApiServer {
    service: Arc<LookupService>,
    start_time: Instant,
}

impl ApiServer {
    pub fn new(service: Arc<LookupService>) -> Self {
        Self {
            service,
            start_time: Instant::now(),
        }
    }

    /// Dispatch one request to its handler
    pub async fn route(&self, method: &Method, path: &str, query: Option<&str>) -> EndpointResponse {
        if path == HEALTH_PATH {
            return match *method {
                Method::GET => handle_health(self.start_time),
                _ => method_not_allowed(path),
            };
        }

        if path == CACHE_STATS_PATH {
            return match *method {
                Method::GET => handle_cache_stats(&self.service, path).await,
                _ => method_not_allowed(path),
            };
        }

        if path == CACHE_PATH {
            return match *method {
                Method::DELETE => handle_cache_clear(&self.service).await,
                _ => method_not_allowed(path),
            };
        }

        if path == LISTING_PATH {
            return match *method {
                Method::GET => handle_listing(&self.service, query, path).await,
                _ => method_not_allowed(path),
            };
        }

        if let Some(segment) = path.strip_prefix(ENTITY_PREFIX) {
            if !segment.contains('/') {
                return match *method {
                    Method::GET => handle_entity(&self.service, segment, path).await,
                    _ => method_not_allowed(path),
                };
            }
        }

        error_body(404, "NOT_FOUND", "No route matches the request path", path)
    }

    /// Handle one hyper request and log it
    pub async fn handle(&self, request: Request<Incoming>) -> Response<Full<Bytes>> {
        let started = Instant::now();
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        let endpoint = self.route(&method, &path, request.uri().query()).await;

        tracing::info!(
            method = %method,
            path = %path,
            status = endpoint.status,
            duration_ms = started.elapsed().as_millis() as u64,
            "Request completed"
        );

        into_response(endpoint)
    }

    /// Accept connections until `shutdown` resolves
    pub async fn serve_with_shutdown<F>(
        self: Arc<Self>,
        listener: TcpListener,
        shutdown: F,
    ) -> std::io::Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let (stream, peer) = tokio::select! {
                accepted = listener.accept() => accepted?,
                _ = &mut shutdown => {
                    tracing::info!("Shutdown signal received, no longer accepting connections");
                    return Ok(());
                }
            };

            let server = Arc::clone(&self);
            tokio::spawn(async move {
                let service = service_fn(move |request| {
                    let server = Arc::clone(&server);
                    async move { Ok::<_, Infallible>(server.handle(request).await) }
                });

                if let Err(e) = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await
                {
                    tracing::error!(peer = %peer, error = %e, "Connection failed");
                }
            });
        }
    }

    /// Accept connections until Ctrl-C
    pub async fn serve(self: Arc<Self>, listener: TcpListener) -> std::io::Result<()> {
        self.serve_with_shutdown(listener, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await
    }
}

fn method_not_allowed(path: &str) -> EndpointResponse {
    error_body(
        405,
        "METHOD_NOT_ALLOWED",
        "Method not allowed for this path",
        path,
    )
}

fn into_response(endpoint: EndpointResponse) -> Response<Full<Bytes>> {
    let status = StatusCode::from_u16(endpoint.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = Response::builder().status(status);
    if !endpoint.body.is_empty() {
        builder = builder.header(header::CONTENT_TYPE, endpoint.content_type);
    }

    builder
        .body(Full::new(Bytes::from(endpoint.body)))
        .unwrap_or_else(|_| {
            let mut response = Response::new(Full::new(Bytes::new()));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        })
}
