use crate::PokemonType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub sp_attack: u16,
    pub sp_defense: u16,
    pub speed: u16,
}

impl BaseStats {
    pub fn total(&self) -> u16 {
        self.hp + self.attack + self.defense + self.sp_attack + self.sp_defense + self.speed
    }
}

/// A move the creature learns by leveling up, tagged with the level it unlocks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnableMove {
    pub name: String,
    pub level: u8,
}

/// Static, species-level template for a creature. Never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub id: u32,
    pub name: String,
    pub types: Vec<PokemonType>,
    pub base_stats: BaseStats,
    pub base_exp: u32,
    /// Species rarity constant; `None` when the database did not supply one.
    #[serde(default)]
    pub catch_rate: Option<u8>,
    #[serde(default)]
    pub level_up_moves: Vec<LearnableMove>,
}

impl Creature {
    /// The first listed type, or Normal for a creature with no type data.
    pub fn primary_type(&self) -> PokemonType {
        self.types.first().copied().unwrap_or(PokemonType::Normal)
    }

    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.types.contains(&pokemon_type)
    }

    /// Level-up moves unlocked at or below `level`, deduplicated by name
    /// (keeping the highest qualifying level) and sorted by (level, name).
    pub fn level_up_moves_up_to(&self, level: u8) -> Vec<LearnableMove> {
        let mut unlocked: Vec<LearnableMove> = Vec::new();
        for candidate in self
            .level_up_moves
            .iter()
            .filter(|m| m.level > 0 && m.level <= level)
        {
            match unlocked.iter_mut().find(|m| m.name == candidate.name) {
                Some(existing) if existing.level < candidate.level => existing.level = candidate.level,
                Some(_) => {}
                None => unlocked.push(candidate.clone()),
            }
        }
        unlocked.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.name.cmp(&b.name)));
        unlocked
    }
}
