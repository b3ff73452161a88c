//! Normalized result types handed to the response serializer

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single creature in the fixed output schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEntity {
    pub id: u32,
    pub name: String,
    pub image_url: String,
    /// Upstream order preserved
    pub types: Vec<String>,
    /// Upstream order preserved
    pub abilities: Vec<String>,
    /// Stat name to base value
    pub stats: BTreeMap<String, u32>,
    pub height: u32,
    pub weight: u32,
    /// English flavor text, or the "No description available." sentinel
    pub description: String,
}

/// One row of a listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingItem {
    pub id: u32,
    pub name: String,
    pub image_url: String,
    /// Always empty: listing payloads carry no type data
    pub types: Vec<String>,
}

/// A page of the listing with cursors to its neighbours
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPage {
    pub total_count: i64,
    pub offset: i64,
    pub limit: i64,
    pub has_more: bool,
    pub next_cursor: Option<String>,
    pub previous_cursor: Option<String>,
    pub items: Vec<ListingItem>,
}
