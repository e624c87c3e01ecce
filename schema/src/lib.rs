// Pokedex Battle Schema - Shared type definitions
// This crate holds the static, read-only data model the battle engine consumes
// from the creature database: creatures, move metadata, evolution graphs and
// the elemental type chart.

// Re-export the main types
pub use battle_data::*;
pub use evolution::*;
pub use move_data::*;
pub use pokemon_types::*;
pub use species_data::*;

pub mod battle_data;
pub mod evolution;
pub mod move_data;
pub mod pokemon_types;
pub mod species_data;
