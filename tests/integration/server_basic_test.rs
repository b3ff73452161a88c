// End-to-end HTTP tests over a real socket

use pokeproxy::config::Config;
use pokeproxy::upstream::UpstreamClient;
use serde_json::Value;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::test_harness::ServerTestHarness;
use crate::common::FakeUpstream;

#[tokio::test]
async fn test_health_over_http() {
    let harness = ServerTestHarness::start(
        &Config::default(),
        Arc::new(FakeUpstream::pokedex()) as Arc<dyn UpstreamClient>,
    )
    .await;

    let response = harness
        .client
        .get(harness.url("/health"))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await.expect("Invalid JSON");
    assert_eq!(body["status"], "healthy");

    harness.stop().await;
}

#[tokio::test]
async fn test_entity_lookup_over_http_uses_cache() {
    let upstream = Arc::new(FakeUpstream::pokedex());
    let harness =
        ServerTestHarness::start(&Config::default(), upstream.clone() as Arc<dyn UpstreamClient>)
            .await;

    for name in ["pikachu", "Pikachu", "PIKACHU"] {
        let response = harness
            .client
            .get(harness.url(&format!("/api/v1/pokemon/{}", name)))
            .send()
            .await
            .expect("Request failed");

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );
        let body: Value = response.json().await.expect("Invalid JSON");
        assert_eq!(body["name"], "pikachu");
    }

    assert_eq!(upstream.entity_calls.load(Ordering::SeqCst), 1);
    harness.stop().await;
}

#[tokio::test]
async fn test_listing_over_http() {
    let harness = ServerTestHarness::start(
        &Config::default(),
        Arc::new(FakeUpstream::pokedex()) as Arc<dyn UpstreamClient>,
    )
    .await;

    let response = harness
        .client
        .get(harness.url("/api/v1/pokemon/list?offset=0&limit=1"))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await.expect("Invalid JSON");
    assert_eq!(body["totalCount"], 1302);
    assert_eq!(body["hasMore"], true);
    assert!(body["previousCursor"].is_null());
    assert_eq!(body["nextCursor"], "/api/v1/pokemon/list?offset=1&limit=1");

    harness.stop().await;
}

#[tokio::test]
async fn test_error_statuses_over_http() {
    let harness = ServerTestHarness::start(
        &Config::default(),
        Arc::new(FakeUpstream::pokedex()) as Arc<dyn UpstreamClient>,
    )
    .await;

    let cases = [
        ("GET", "/api/v1/pokemon/missingno", 404),
        ("GET", "/api/v1/pokemon/pika_chu", 400),
        ("GET", "/api/v1/pokemon/list?limit=0", 400),
        ("GET", "/nowhere", 404),
        ("POST", "/api/v1/pokemon/pikachu", 405),
        ("DELETE", "/api/v1/admin/cache", 204),
    ];

    for (method, path, expected) in cases {
        let method = reqwest::Method::from_bytes(method.as_bytes()).unwrap();
        let response = harness
            .client
            .request(method, harness.url(path))
            .send()
            .await
            .expect("Request failed");
        assert_eq!(response.status().as_u16(), expected, "{path}");
    }

    harness.stop().await;
}
