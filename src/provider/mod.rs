//! Read-only access to static creature data.
//!
//! The engine only ever talks to a [`CreatureDataProvider`]. Species, move
//! and evolution data is immutable, so implementations are free to cache it
//! for as long as they like.

pub mod cache;
pub mod dto;
pub mod memory;

pub use cache::MoveCache;
pub use memory::{InMemoryCreatureProvider, ProviderDataset};

use crate::battle::state::TurnRng;
use crate::errors::ProviderResult;
use schema::{Creature, EvolutionNode, MoveMetadata};
use std::fmt;

/// How a creature is looked up: by numeric species id or by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CreatureKey {
    Id(u32),
    Name(String),
}

impl From<u32> for CreatureKey {
    fn from(id: u32) -> Self {
        CreatureKey::Id(id)
    }
}

impl From<&str> for CreatureKey {
    fn from(name: &str) -> Self {
        CreatureKey::Name(name.to_lowercase())
    }
}

impl fmt::Display for CreatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreatureKey::Id(id) => write!(f, "#{}", id),
            CreatureKey::Name(name) => f.write_str(name),
        }
    }
}

pub trait CreatureDataProvider {
    fn get_creature(&self, key: &CreatureKey) -> ProviderResult<Creature>;

    fn get_move_metadata(&self, name: &str) -> ProviderResult<MoveMetadata>;

    /// Root node of the evolution graph with the given id.
    fn get_evolution_graph(&self, graph_id: u32) -> ProviderResult<EvolutionNode>;

    /// Id of the evolution graph a species belongs to.
    fn get_species_evolution_graph_id(&self, species_id: u32) -> ProviderResult<u32>;

    /// `count` creatures picked at random, e.g. for wild opponents.
    fn get_random_creatures(&self, count: usize, rng: &mut TurnRng)
        -> ProviderResult<Vec<Creature>>;
}
