//! Response normalization
//!
//! Converts raw upstream records into the flat schema served to clients:
//! - `normalize_entity`: entity record + species record -> [`NormalizedEntity`]
//! - `normalize_listing_item`: one listing row -> [`ListingItem`]
//! - `normalize_page`: listing record + paging -> [`NormalizedPage`]
//!
//! No nested access panics. Required fields that are missing or mistyped
//! produce [`LookupError::MalformedUpstreamData`]; the description is the
//! one optional field and falls back to a sentinel instead.

mod model;
mod raw;

pub use model::{ListingItem, NormalizedEntity, NormalizedPage};

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::config::NormalizerConfig;
use crate::constants::NO_DESCRIPTION;
use crate::error::LookupError;
use raw::{RawListing, RawListingItem, RawPokemon};

static DETAIL_URL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn detail_url_pattern() -> &'static Regex {
    DETAIL_URL_PATTERN
        .get_or_init(|| Regex::new(r"/pokemon/(\d+)/?$").expect("Invalid detail URL regex"))
}

/// Pick the first English flavor text in upstream order.
///
/// Newlines and form feeds become single spaces. Returns the sentinel when
/// the entry list is absent, not a list, or has no usable English entry.
pub fn extract_english_description(description: &Value) -> String {
    description
        .get("flavor_text_entries")
        .and_then(Value::as_array)
        .and_then(|entries| {
            entries.iter().find_map(|entry| {
                let language = entry
                    .get("language")
                    .and_then(|lang| lang.get("name"))
                    .and_then(Value::as_str)?;
                if language != "en" {
                    return None;
                }
                entry.get("flavor_text").and_then(Value::as_str)
            })
        })
        .map(|text| text.replace('\n', " ").replace('\u{c}', " "))
        .unwrap_or_else(|| NO_DESCRIPTION.to_string())
}

/// Turns upstream payloads into normalized DTOs
#[derive(Debug, Clone)]
pub struct Normalizer {
    sprite_base_url: String,
    cursor_base_path: String,
}

impl Normalizer {
    /// Create a normalizer with explicit image and cursor bases
    pub fn new(sprite_base_url: impl Into<String>, cursor_base_path: impl Into<String>) -> Self {
        Self {
            sprite_base_url: sprite_base_url.into(),
            cursor_base_path: cursor_base_path.into(),
        }
    }

    /// Create a normalizer from configuration
    pub fn from_config(config: &NormalizerConfig) -> Self {
        Self::new(&config.sprite_base_url, &config.cursor_base_path)
    }

    /// Normalize one entity record and its species record
    pub fn normalize_entity(
        &self,
        entity: &Value,
        description: &Value,
    ) -> Result<NormalizedEntity, LookupError> {
        let raw = RawPokemon::deserialize(entity)
            .map_err(|e| LookupError::MalformedUpstreamData(format!("entity record: {}", e)))?;

        let mut stats = BTreeMap::new();
        for stat in raw.stats {
            // Last write wins on repeated names
            stats.insert(stat.stat.name, stat.base_stat);
        }

        Ok(NormalizedEntity {
            id: raw.id,
            name: raw.name,
            image_url: raw.sprites.other.official_artwork.front_default,
            types: raw.types.into_iter().map(|t| t.kind.name).collect(),
            abilities: raw.abilities.into_iter().map(|a| a.ability.name).collect(),
            stats,
            height: raw.height,
            weight: raw.weight,
            description: extract_english_description(description),
        })
    }

    /// Normalize one row of a listing record
    pub fn normalize_listing_item(&self, item: &Value) -> Result<ListingItem, LookupError> {
        let raw = RawListingItem::deserialize(item)
            .map_err(|e| LookupError::MalformedUpstreamData(format!("listing item: {}", e)))?;
        self.listing_item_from_raw(raw)
    }

    fn listing_item_from_raw(&self, raw: RawListingItem) -> Result<ListingItem, LookupError> {
        let id = detail_url_pattern()
            .captures(&raw.url)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .ok_or_else(|| {
                LookupError::MalformedUpstreamData(format!(
                    "listing item '{}' has no numeric id in url '{}'",
                    raw.name, raw.url
                ))
            })?;

        Ok(ListingItem {
            id,
            name: raw.name,
            image_url: self.image_url(id),
            types: Vec::new(),
        })
    }

    /// Normalize a listing record fetched with `offset`/`limit`
    pub fn normalize_page(
        &self,
        listing: &Value,
        offset: i64,
        limit: i64,
    ) -> Result<NormalizedPage, LookupError> {
        let raw = RawListing::deserialize(listing)
            .map_err(|e| LookupError::MalformedUpstreamData(format!("listing record: {}", e)))?;

        let items = raw
            .results
            .into_iter()
            .map(|item| self.listing_item_from_raw(item))
            .collect::<Result<Vec<_>, _>>()?;

        let has_more = offset.saturating_add(limit) < raw.count;
        let next_cursor = has_more.then(|| self.cursor(offset.saturating_add(limit), limit));
        let previous_cursor =
            (offset > 0).then(|| self.cursor(offset.saturating_sub(limit).max(0), limit));

        Ok(NormalizedPage {
            total_count: raw.count,
            offset,
            limit,
            has_more,
            next_cursor,
            previous_cursor,
            items,
        })
    }

    /// Image URL on the sprite mirror for a numeric id
    pub fn image_url(&self, id: u32) -> String {
        format!("{}{}.png", self.sprite_base_url, id)
    }

    fn cursor(&self, offset: i64, limit: i64) -> String {
        format!("{}?offset={}&limit={}", self.cursor_base_path, offset, limit)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::from_config(&NormalizerConfig::default())
    }
}
