use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvolutionTrigger {
    LevelUp,
    UseItem,
    Trade,
    Other(String),
}

impl EvolutionTrigger {
    pub fn from_api_name(name: &str) -> Self {
        match name {
            "level-up" => EvolutionTrigger::LevelUp,
            "use-item" => EvolutionTrigger::UseItem,
            "trade" => EvolutionTrigger::Trade,
            other => EvolutionTrigger::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionDetail {
    pub trigger: EvolutionTrigger,
    #[serde(default)]
    pub min_level: Option<u8>,
    #[serde(default)]
    pub item: Option<String>,
}

/// One species in an evolution graph. `details` describe how this node is
/// reached from its parent; the root has none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionNode {
    pub species: String,
    #[serde(default)]
    pub details: Vec<EvolutionDetail>,
    #[serde(default)]
    pub evolves_to: Vec<EvolutionNode>,
}

impl EvolutionNode {
    /// Depth-first search for the node of the given species.
    pub fn find(&self, species: &str) -> Option<&EvolutionNode> {
        if self.species == species {
            return Some(self);
        }
        self.evolves_to.iter().find_map(|child| child.find(species))
    }

    /// Minimum level recorded on this node's first evolution detail, if any.
    pub fn min_level(&self) -> Option<u8> {
        self.details.first().and_then(|detail| detail.min_level)
    }

    /// The species `species` auto-evolves into at `level`, looking only at the
    /// first child of its node.
    pub fn level_evolution_for(&self, species: &str, level: u8) -> Option<&str> {
        let next = self.find(species)?.evolves_to.first()?;
        match next.min_level() {
            Some(min_level) if min_level <= level => Some(next.species.as_str()),
            _ => None,
        }
    }
}
