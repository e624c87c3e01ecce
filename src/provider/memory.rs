use super::{CreatureDataProvider, CreatureKey};
use crate::battle::state::TurnRng;
use crate::errors::{ProviderError, ProviderResult};
use schema::{Creature, EvolutionNode, MoveMetadata};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Serialized form of an in-memory dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderDataset {
    #[serde(default)]
    pub creatures: Vec<Creature>,
    #[serde(default)]
    pub moves: Vec<MoveMetadata>,
    /// (graph id, root node)
    #[serde(default)]
    pub evolution_graphs: Vec<(u32, EvolutionNode)>,
    /// (species id, graph id)
    #[serde(default)]
    pub species_graphs: Vec<(u32, u32)>,
}

/// Provider backed by data held in memory, typically loaded from RON.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCreatureProvider {
    creatures: BTreeMap<u32, Creature>,
    names: HashMap<String, u32>,
    moves: HashMap<String, MoveMetadata>,
    graphs: HashMap<u32, EvolutionNode>,
    species_graphs: HashMap<u32, u32>,
}

impl InMemoryCreatureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dataset(dataset: ProviderDataset) -> Self {
        let mut provider = Self::new();
        for creature in dataset.creatures {
            provider.insert_creature(creature);
        }
        for metadata in dataset.moves {
            provider.insert_move(metadata);
        }
        for (graph_id, root) in dataset.evolution_graphs {
            provider.insert_evolution_graph(graph_id, root);
        }
        for (species_id, graph_id) in dataset.species_graphs {
            provider.link_species_to_graph(species_id, graph_id);
        }
        provider
    }

    pub fn from_ron_str(text: &str) -> ProviderResult<Self> {
        let dataset: ProviderDataset =
            ron::from_str(text).map_err(|e| ProviderError::Malformed(e.to_string()))?;
        Ok(Self::from_dataset(dataset))
    }

    pub fn insert_creature(&mut self, creature: Creature) {
        self.names.insert(creature.name.to_lowercase(), creature.id);
        self.creatures.insert(creature.id, creature);
    }

    pub fn insert_move(&mut self, metadata: MoveMetadata) {
        self.moves.insert(metadata.name.to_lowercase(), metadata);
    }

    pub fn insert_evolution_graph(&mut self, graph_id: u32, root: EvolutionNode) {
        self.graphs.insert(graph_id, root);
    }

    pub fn link_species_to_graph(&mut self, species_id: u32, graph_id: u32) {
        self.species_graphs.insert(species_id, graph_id);
    }

    pub fn creature_count(&self) -> usize {
        self.creatures.len()
    }
}

impl CreatureDataProvider for InMemoryCreatureProvider {
    fn get_creature(&self, key: &CreatureKey) -> ProviderResult<Creature> {
        let id = match key {
            CreatureKey::Id(id) => Some(*id),
            CreatureKey::Name(name) => self.names.get(&name.to_lowercase()).copied(),
        };
        id.and_then(|id| self.creatures.get(&id))
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("creature {}", key)))
    }

    fn get_move_metadata(&self, name: &str) -> ProviderResult<MoveMetadata> {
        self.moves
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("move {}", name)))
    }

    fn get_evolution_graph(&self, graph_id: u32) -> ProviderResult<EvolutionNode> {
        self.graphs
            .get(&graph_id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("evolution graph {}", graph_id)))
    }

    fn get_species_evolution_graph_id(&self, species_id: u32) -> ProviderResult<u32> {
        self.species_graphs.get(&species_id).copied().ok_or_else(|| {
            ProviderError::NotFound(format!("evolution graph for species {}", species_id))
        })
    }

    fn get_random_creatures(
        &self,
        count: usize,
        rng: &mut TurnRng,
    ) -> ProviderResult<Vec<Creature>> {
        if self.creatures.is_empty() {
            return Err(ProviderError::NotFound("no creatures loaded".to_string()));
        }
        let pool: Vec<&Creature> = self.creatures.values().collect();
        Ok((0..count)
            .map(|_| pool[rng.next_index(pool.len(), "random creature")].clone())
            .collect())
    }
}
