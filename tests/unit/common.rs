// Shared test doubles for the public-API tests

use async_trait::async_trait;
use pokeproxy::upstream::{UpstreamClient, UpstreamError};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Upstream double that serves canned records and counts every call
#[derive(Default)]
pub struct FakeUpstream {
    pub entity_calls: AtomicUsize,
    pub description_calls: AtomicUsize,
    pub listing_calls: AtomicUsize,
    entities: HashMap<String, Value>,
    descriptions: HashMap<String, Value>,
    listing_count: i64,
    delay: Option<Duration>,
    failure: Option<UpstreamError>,
}

impl FakeUpstream {
    /// Knows pikachu (by name and id) and bulbasaur, with a 1302-entry listing
    pub fn pokedex() -> Self {
        let mut fake = Self {
            listing_count: 1302,
            ..Default::default()
        };
        for key in ["pikachu", "25"] {
            fake.entities.insert(key.to_string(), pikachu_record());
            fake.descriptions
                .insert(key.to_string(), species_record("Electric\nmouse."));
        }
        fake.entities.insert("bulbasaur".to_string(), bulbasaur_record());
        fake.descriptions
            .insert("bulbasaur".to_string(), json!({ "flavor_text_entries": [] }));
        fake
    }

    /// Every call fails with `error`
    pub fn failing(error: UpstreamError) -> Self {
        Self {
            failure: Some(error),
            ..Default::default()
        }
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn total_calls(&self) -> usize {
        self.entity_calls.load(Ordering::SeqCst)
            + self.description_calls.load(Ordering::SeqCst)
            + self.listing_calls.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl UpstreamClient for FakeUpstream {
    async fn fetch_entity(&self, identifier: &str) -> Result<Value, UpstreamError> {
        self.entity_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.entities
            .get(identifier)
            .cloned()
            .ok_or_else(|| UpstreamError::NotFound(identifier.to_string()))
    }

    async fn fetch_description(&self, identifier: &str) -> Result<Value, UpstreamError> {
        self.description_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.descriptions
            .get(identifier)
            .cloned()
            .ok_or_else(|| UpstreamError::NotFound(identifier.to_string()))
    }

    async fn fetch_listing(&self, offset: i64, limit: i64) -> Result<Value, UpstreamError> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        let end = (offset + limit).min(self.listing_count);
        let results: Vec<Value> = (offset..end)
            .map(|i| {
                let id = i + 1;
                json!({
                    "name": format!("pokemon-{}", id),
                    "url": format!("https://pokeapi.co/api/v2/pokemon/{}/", id)
                })
            })
            .collect();

        Ok(json!({ "count": self.listing_count, "results": results }))
    }
}

pub fn pikachu_record() -> Value {
    json!({
        "id": 25,
        "name": "pikachu",
        "height": 4,
        "weight": 60,
        "types": [{"slot": 1, "type": {"name": "electric"}}],
        "abilities": [{"ability": {"name": "static"}}],
        "stats": [{"stat": {"name": "hp"}, "base_stat": 35}],
        "sprites": {"other": {"official-artwork": {"front_default": "http://x/25.png"}}}
    })
}

pub fn bulbasaur_record() -> Value {
    json!({
        "id": 1,
        "name": "bulbasaur",
        "height": 7,
        "weight": 69,
        "types": [
            {"slot": 1, "type": {"name": "grass"}},
            {"slot": 2, "type": {"name": "poison"}}
        ],
        "abilities": [
            {"ability": {"name": "overgrow"}},
            {"ability": {"name": "chlorophyll"}}
        ],
        "stats": [
            {"stat": {"name": "hp"}, "base_stat": 45},
            {"stat": {"name": "attack"}, "base_stat": 49}
        ],
        "sprites": {"other": {"official-artwork": {"front_default": "http://x/1.png"}}}
    })
}

pub fn species_record(english_text: &str) -> Value {
    json!({
        "flavor_text_entries": [
            {"flavor_text": "Souris électrique.", "language": {"name": "fr"}},
            {"flavor_text": english_text, "language": {"name": "en"}}
        ]
    })
}
