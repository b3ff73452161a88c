//! Upstream API and normalizer configuration types.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CURSOR_BASE_PATH, DEFAULT_POKEMON_URL, DEFAULT_SPECIES_URL, DEFAULT_SPRITE_BASE_URL,
    DEFAULT_UPSTREAM_TIMEOUT_SECS,
};

fn default_pokemon_url() -> String {
    DEFAULT_POKEMON_URL.to_string()
}

fn default_species_url() -> String {
    DEFAULT_SPECIES_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_UPSTREAM_TIMEOUT_SECS
}

fn default_sprite_base_url() -> String {
    DEFAULT_SPRITE_BASE_URL.to_string()
}

fn default_cursor_base_path() -> String {
    DEFAULT_CURSOR_BASE_PATH.to_string()
}

/// Where entity, species and listing data is fetched from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base for entity lookups and listings
    #[serde(default = "default_pokemon_url")]
    pub pokemon_url: String,
    /// Base for species (description) lookups
    #[serde(default = "default_species_url")]
    pub species_url: String,
    /// Per-request timeout (default: 10)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            pokemon_url: default_pokemon_url(),
            species_url: default_species_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl UpstreamConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (field, url) in [
            ("pokemon_url", &self.pokemon_url),
            ("species_url", &self.species_url),
        ] {
            if url.trim().is_empty() {
                return Err(format!("upstream.{} cannot be empty", field));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!(
                    "upstream.{} '{}' must start with http:// or https://",
                    field, url
                ));
            }
        }

        if self.timeout_seconds == 0 {
            return Err("upstream.timeout_seconds must be greater than 0".to_string());
        }

        Ok(())
    }
}

/// Values the normalizer stitches into its output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Prefix for `{id}.png` artwork URLs
    #[serde(default = "default_sprite_base_url")]
    pub sprite_base_url: String,
    /// Path that page cursors point back to
    #[serde(default = "default_cursor_base_path")]
    pub cursor_base_path: String,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            sprite_base_url: default_sprite_base_url(),
            cursor_base_path: default_cursor_base_path(),
        }
    }
}
