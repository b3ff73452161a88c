// Lookup service tests against a counting upstream double

use chrono::{Duration as ChronoDuration, Utc};
use pokeproxy::cache::{Cache, CacheConfig, ManualClock, MemoryCache};
use pokeproxy::config::Config;
use pokeproxy::error::LookupError;
use pokeproxy::normalize::{NormalizedEntity, NormalizedPage, Normalizer};
use pokeproxy::service::LookupService;
use pokeproxy::upstream::{UpstreamClient, UpstreamError};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use super::common::FakeUpstream;

struct Harness {
    upstream: Arc<FakeUpstream>,
    clock: Arc<ManualClock>,
    service: LookupService,
}

fn harness_with(upstream: FakeUpstream, config: CacheConfig) -> Harness {
    let upstream = Arc::new(upstream);
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let entity_cache: Arc<dyn Cache<NormalizedEntity>> =
        Arc::new(MemoryCache::with_clock("pokemon", &config, clock.clone()));
    let page_cache: Arc<dyn Cache<NormalizedPage>> =
        Arc::new(MemoryCache::with_clock("pokemonList", &config, clock.clone()));

    let service = LookupService::new(
        upstream.clone() as Arc<dyn UpstreamClient>,
        Normalizer::default(),
        entity_cache,
        page_cache,
    );

    Harness {
        upstream,
        clock,
        service,
    }
}

fn harness() -> Harness {
    harness_with(FakeUpstream::pokedex(), CacheConfig::default())
}

#[tokio::test]
async fn test_pikachu_scenario() {
    let h = harness();

    let entity = h.service.get_entity("pikachu").await.unwrap();

    assert_eq!(entity.id, 25);
    assert_eq!(entity.name, "pikachu");
    assert_eq!(entity.image_url, "http://x/25.png");
    assert_eq!(entity.types, vec!["electric"]);
    assert_eq!(entity.abilities, vec!["static"]);
    assert_eq!(entity.stats.get("hp"), Some(&35));
    assert_eq!(entity.height, 4);
    assert_eq!(entity.weight, 60);
    assert_eq!(entity.description, "Electric mouse.");
}

#[tokio::test]
async fn test_entity_without_english_text_uses_sentinel() {
    let h = harness();

    let entity = h.service.get_entity("bulbasaur").await.unwrap();

    assert_eq!(entity.description, "No description available.");
}

#[tokio::test]
async fn test_cache_hit_is_byte_identical_and_skips_upstream() {
    let h = harness();

    let first = h.service.get_entity("Pikachu").await.unwrap();
    let calls_after_first = h.upstream.total_calls();
    let second = h.service.get_entity("pikachu").await.unwrap();

    assert_eq!(h.upstream.total_calls(), calls_after_first);
    assert_eq!(
        serde_json::to_vec(first.as_ref()).unwrap(),
        serde_json::to_vec(second.as_ref()).unwrap()
    );

    // Numeric id is its own key and normalizes to the same record
    let by_id = h.service.get_entity("25").await.unwrap();
    assert_eq!(
        serde_json::to_vec(first.as_ref()).unwrap(),
        serde_json::to_vec(by_id.as_ref()).unwrap()
    );
    assert_eq!(h.upstream.entity_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_entity_and_description_both_fetched_on_miss() {
    let h = harness();

    h.service.get_entity("pikachu").await.unwrap();

    assert_eq!(h.upstream.entity_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.upstream.description_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_entity_read_at_29_minutes_is_hit() {
    let h = harness();

    h.service.get_entity("pikachu").await.unwrap();
    h.clock.advance(ChronoDuration::minutes(29));
    h.service.get_entity("pikachu").await.unwrap();

    assert_eq!(h.upstream.entity_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_entity_read_at_31_minutes_is_miss() {
    let h = harness();

    h.service.get_entity("pikachu").await.unwrap();
    h.clock.advance(ChronoDuration::minutes(31));
    h.service.get_entity("pikachu").await.unwrap();

    assert_eq!(h.upstream.entity_calls.load(Ordering::SeqCst), 2);
    assert_eq!(h.service.cache_stats().await.pokemon.expirations, 1);
}

#[tokio::test]
async fn test_page_ttl_matches_entity_ttl() {
    let h = harness();

    h.service.get_page(0, 20).await.unwrap();
    h.clock.advance(ChronoDuration::minutes(29));
    h.service.get_page(0, 20).await.unwrap();
    assert_eq!(h.upstream.listing_calls.load(Ordering::SeqCst), 1);

    h.clock.advance(ChronoDuration::minutes(2));
    h.service.get_page(0, 20).await.unwrap();
    assert_eq!(h.upstream.listing_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_page_namespace_stays_within_capacity() {
    let h = harness();

    for offset in 0..201 {
        h.service.get_page(offset, 1).await.unwrap();
    }

    let stats = h.service.cache_stats().await;
    assert_eq!(stats.pokemon_list.entry_count, 200);
    assert_eq!(stats.pokemon_list.evictions, 1);
    assert_eq!(stats.pokemon.entry_count, 0);
}

#[tokio::test]
async fn test_invalid_paging_makes_no_upstream_call() {
    let h = harness();

    let err = h.service.get_page(-1, 20).await.unwrap_err();
    assert!(matches!(err, LookupError::InvalidIdentifier(_)));

    let err = h.service.get_page(0, 0).await.unwrap_err();
    assert!(matches!(err, LookupError::InvalidIdentifier(_)));

    assert_eq!(h.upstream.total_calls(), 0);
}

#[tokio::test]
async fn test_invalid_identifier_makes_no_upstream_call() {
    let h = harness();

    for input in ["", "  ", "pika_chu", "Pikachu!", "25 "] {
        let result = h.service.get_entity(input).await;
        if input == "25 " {
            // Surrounding whitespace is trimmed, not rejected
            assert!(result.is_ok());
        } else {
            assert!(matches!(result, Err(LookupError::InvalidIdentifier(_))), "{input:?}");
        }
    }

    assert_eq!(h.upstream.entity_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_listing_scenario_first_page() {
    let h = harness();

    let page = h.service.get_page(0, 1).await.unwrap();

    assert_eq!(page.total_count, 1302);
    assert_eq!(page.offset, 0);
    assert_eq!(page.limit, 1);
    assert!(page.has_more);
    assert!(page.previous_cursor.is_none());
    assert_eq!(
        page.next_cursor.as_deref(),
        Some("/api/v1/pokemon/list?offset=1&limit=1")
    );
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, 1);
    assert!(page.items[0].image_url.ends_with("/1.png"));
    assert!(page.items[0].types.is_empty());
}

#[tokio::test]
async fn test_listing_last_page_has_no_next_cursor() {
    let h = harness();

    let page = h.service.get_page(1300, 20).await.unwrap();

    assert!(!page.has_more);
    assert!(page.next_cursor.is_none());
    assert_eq!(
        page.previous_cursor.as_deref(),
        Some("/api/v1/pokemon/list?offset=1280&limit=20")
    );
    assert_eq!(page.items.len(), 2);
}

#[tokio::test]
async fn test_unknown_entity_is_not_found() {
    let h = harness();

    let err = h.service.get_entity("missingno").await.unwrap_err();

    assert!(matches!(err, LookupError::NotFound(_)));
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_upstream_failures_surface_as_service_unavailable() {
    let h = harness_with(
        FakeUpstream::failing(UpstreamError::Unreachable("timed out".to_string())),
        CacheConfig::default(),
    );

    let err = h.service.get_entity("pikachu").await.unwrap_err();
    assert!(matches!(err, LookupError::UpstreamUnreachable(_)));
    assert_eq!(err.status_code(), 503);

    let err = h.service.get_page(0, 20).await.unwrap_err();
    assert_eq!(err.status_code(), 503);
}

#[tokio::test]
async fn test_concurrent_misses_without_coalescing_may_each_fetch() {
    let upstream = FakeUpstream::pokedex().with_delay(Duration::from_millis(20));
    let h = harness_with(upstream, CacheConfig::default());
    let service = Arc::new(h.service);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.get_page(0, 20).await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    let calls = h.upstream.listing_calls.load(Ordering::SeqCst);
    assert!((1..=4).contains(&calls));
}

#[tokio::test]
async fn test_coalesced_misses_share_one_fetch() {
    let upstream = Arc::new(FakeUpstream::pokedex().with_delay(Duration::from_millis(50)));
    let mut config = Config::default();
    config.cache.coalesce_misses = true;
    let service = Arc::new(LookupService::with_upstream(
        &config,
        upstream.clone() as Arc<dyn UpstreamClient>,
    ));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.get_entity("pikachu").await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().id, 25);
    }

    assert_eq!(upstream.entity_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_coalesced_followers_fetch_themselves_after_leader_failure() {
    let upstream = Arc::new(
        FakeUpstream::failing(UpstreamError::ServerError {
            status: 500,
            message: "boom".to_string(),
        })
        .with_delay(Duration::from_millis(20)),
    );
    let mut config = Config::default();
    config.cache.coalesce_misses = true;
    let service = Arc::new(LookupService::with_upstream(
        &config,
        upstream.clone() as Arc<dyn UpstreamClient>,
    ));

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.get_page(0, 20).await })
        })
        .collect();

    for handle in handles {
        let err = handle.await.unwrap().unwrap_err();
        assert!(matches!(err, LookupError::UpstreamServerError { .. }));
    }

    assert!(upstream.listing_calls.load(Ordering::SeqCst) >= 1);
}

#[tokio::test]
async fn test_clear_caches_empties_both_namespaces() {
    let h = harness();

    h.service.get_entity("pikachu").await.unwrap();
    h.service.get_page(0, 20).await.unwrap();
    h.service.clear_caches().await;

    let stats = h.service.cache_stats().await;
    assert_eq!(stats.pokemon.entry_count, 0);
    assert_eq!(stats.pokemon_list.entry_count, 0);

    h.service.get_entity("pikachu").await.unwrap();
    assert_eq!(h.upstream.entity_calls.load(Ordering::SeqCst), 2);
}
