// Constants module - centralized default values for configuration
//
// This module defines all default values used throughout the codebase.
// Using constants instead of magic numbers keeps the defaults in one place.

// =============================================================================
// Server defaults
// =============================================================================

/// Default listen address
pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// Upstream defaults
// =============================================================================

/// Default base URL for entity and listing lookups
pub const DEFAULT_POKEMON_URL: &str = "https://pokeapi.co/api/v2/pokemon/";

/// Default base URL for species (description) lookups
pub const DEFAULT_SPECIES_URL: &str = "https://pokeapi.co/api/v2/pokemon-species/";

/// Default upstream request timeout in seconds
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Normalizer defaults
// =============================================================================

/// Sprite mirror used to build listing image URLs from a numeric id
pub const DEFAULT_SPRITE_BASE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork/";

/// Path prefix used when building next/previous page cursors
pub const DEFAULT_CURSOR_BASE_PATH: &str = "/api/v1/pokemon/list";

/// Description used when upstream has no English flavor text
pub const NO_DESCRIPTION: &str = "No description available.";

// =============================================================================
// Listing defaults
// =============================================================================

/// Default page offset when the caller omits it
pub const DEFAULT_PAGE_OFFSET: i64 = 0;

/// Default page size when the caller omits it
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

// =============================================================================
// Cache defaults
// =============================================================================

/// Default TTL in seconds (30 minutes, measured from write)
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 30 * 60;

/// Default maximum live entries per cache namespace
pub const DEFAULT_CACHE_MAX_ENTRIES: u64 = 200;

/// Longest accepted entry lifetime (one year)
pub const MAX_CACHE_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

/// Namespace holding single-entity lookups
pub const ENTITY_NAMESPACE: &str = "pokemon";

/// Namespace holding listing pages
pub const PAGE_NAMESPACE: &str = "pokemonList";

// =============================================================================
// Logging defaults
// =============================================================================

/// Default log level filter
pub const DEFAULT_LOG_LEVEL: &str = "info";
