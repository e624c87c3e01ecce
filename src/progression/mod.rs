//! Experience, leveling, move learning and evolution for roster records.

pub mod evolution;
pub mod experience;
pub mod moves;
pub mod rewards;

pub use experience::{apply_experience, exp_for_next_level};
pub use rewards::roll_ball_rewards;

use crate::battle::state::BattleEvent;
use crate::config::BattleConfig;
use crate::provider::{CreatureDataProvider, MoveCache};
use crate::roster::InstanceId;
use serde::{Deserialize, Serialize};

/// Applies progression rules to roster records through the store.
pub struct ProgressionEngine<'a> {
    provider: &'a dyn CreatureDataProvider,
    config: &'a BattleConfig,
    cache: MoveCache,
}

impl<'a> ProgressionEngine<'a> {
    pub fn new(provider: &'a dyn CreatureDataProvider, config: &'a BattleConfig) -> Self {
        Self {
            provider,
            config,
            cache: MoveCache::new(),
        }
    }

    /// Resolve learned moves through an existing cache, such as a battle's.
    pub fn with_cache(mut self, cache: MoveCache) -> Self {
        self.cache = cache;
        self
    }

    /// Hand the cache back, including any moves resolved while learning.
    pub fn into_cache(self) -> MoveCache {
        self.cache
    }
}

/// A move the creature qualified for but could not learn without forgetting one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingMove {
    pub instance_id: InstanceId,
    pub move_name: String,
    pub max_pp: u8,
}

/// The caller's answer to a [`PendingMove`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplacementChoice {
    Forget(String),
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionOutcome {
    pub from: String,
    pub into: String,
    pub current_hp: u16,
    pub max_hp: u16,
}

/// Everything that happened to one record during a progression step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionReport {
    pub instance_id: InstanceId,
    pub creature: String,
    pub experience_gained: u32,
    pub old_level: u8,
    pub new_level: u8,
    pub experience: u32,
    pub moves_learned: Vec<String>,
    pub pending_replacements: Vec<PendingMove>,
    pub evolution: Option<EvolutionOutcome>,
}

impl ProgressionReport {
    pub fn leveled_up(&self) -> bool {
        self.new_level > self.old_level
    }

    /// Battle log events in the order they happened.
    pub fn events(&self) -> Vec<BattleEvent> {
        let mut events = Vec::new();
        if self.experience_gained > 0 {
            events.push(BattleEvent::ExperienceGained {
                creature: self.creature.clone(),
                amount: self.experience_gained,
            });
        }
        if self.leveled_up() {
            events.push(BattleEvent::LevelUp {
                creature: self.creature.clone(),
                new_level: self.new_level,
            });
        }
        for move_name in &self.moves_learned {
            events.push(BattleEvent::MoveLearned {
                creature: self.creature.clone(),
                move_name: move_name.clone(),
            });
        }
        for pending in &self.pending_replacements {
            events.push(BattleEvent::MoveReplacementNeeded {
                creature: self.creature.clone(),
                move_name: pending.move_name.clone(),
            });
        }
        if let Some(evolution) = &self.evolution {
            events.push(BattleEvent::Evolved {
                from: evolution.from.clone(),
                into: evolution.into.clone(),
            });
        }
        events
    }
}
