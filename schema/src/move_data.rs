use crate::PokemonType;
use serde::{Deserialize, Serialize};
use strum::EnumString;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DamageClass {
    Physical,
    Special,
    Status,
}

/// Metadata for a single move as served by the creature database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveMetadata {
    pub name: String,
    pub move_type: PokemonType,
    #[serde(default)]
    pub power: Option<u16>,
    #[serde(default)]
    pub accuracy: Option<u8>,
    #[serde(default)]
    pub pp: Option<u8>,
    #[serde(default)]
    pub damage_class: Option<DamageClass>,
}
