//! Typed views of the upstream payloads
//!
//! Only the fields the normalizer reads are declared; everything else in the
//! upstream JSON is ignored. A missing or mistyped field is a deserialization
//! error, which the normalizer reports as malformed upstream data.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct NamedResource {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawPokemon {
    pub id: u32,
    pub name: String,
    pub height: u32,
    pub weight: u32,
    pub sprites: RawSprites,
    pub types: Vec<RawTypeSlot>,
    pub abilities: Vec<RawAbilitySlot>,
    pub stats: Vec<RawStat>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawSprites {
    pub other: RawOtherSprites,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawOtherSprites {
    #[serde(rename = "official-artwork")]
    pub official_artwork: RawArtwork,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawArtwork {
    pub front_default: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawTypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawAbilitySlot {
    pub ability: NamedResource,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawStat {
    pub stat: NamedResource,
    pub base_stat: u32,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawListing {
    pub count: i64,
    pub results: Vec<RawListingItem>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawListingItem {
    pub name: String,
    pub url: String,
}
