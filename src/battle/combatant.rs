use crate::battle::stats::{calculate_max_hp, effective_speed, effective_stat};
use crate::config::BattleConfig;
use crate::provider::{CreatureDataProvider, MoveCache};
use crate::progression::moves::latest_level_up_moves;
use crate::roster::{InstanceId, RosterRecord};
use schema::{Creature, PokemonType, StatType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveMove {
    pub name: String,
    pub pp: u8,
    pub max_pp: u8,
}

/// A creature as it exists inside one battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    /// Roster record this combatant was built from; `None` for the wild side.
    pub instance_id: Option<InstanceId>,
    pub creature: Creature,
    pub level: u8,
    pub current_hp: u16,
    pub max_hp: u16,
    pub moves: Vec<ActiveMove>,
    pub attack_stage: i8,
    pub defense_stage: i8,
}

/// Names of the four most recent level-up moves, or the fallback move.
pub fn default_move_names(creature: &Creature, level: u8, config: &BattleConfig) -> Vec<String> {
    let names = latest_level_up_moves(creature, level);
    if names.is_empty() {
        vec![config.fallback_move_name.clone()]
    } else {
        names
    }
}

impl Combatant {
    /// Build a combatant for an owned creature. Max HP is re-derived from
    /// the species and the record's level; moves and PP come from the record.
    pub fn from_record(
        instance_id: InstanceId,
        creature: Creature,
        record: &RosterRecord,
        provider: &dyn CreatureDataProvider,
        cache: &mut MoveCache,
        config: &BattleConfig,
    ) -> Self {
        let level = record.level();
        let max_hp = calculate_max_hp(creature.base_stats.hp, level);
        let moves = if record.moves().is_empty() {
            Self::fresh_moves(&creature, level, provider, cache, config)
        } else {
            record
                .moves()
                .iter()
                .map(|known| ActiveMove {
                    name: known.name.clone(),
                    pp: known.pp.current,
                    max_pp: known.pp.max,
                })
                .collect()
        };
        Self {
            instance_id: Some(instance_id),
            current_hp: record.current_hp().min(max_hp),
            max_hp,
            level,
            moves,
            creature,
            attack_stage: 0,
            defense_stage: 0,
        }
    }

    /// A wild creature at full HP with its default moveset.
    pub fn wild(
        creature: Creature,
        level: u8,
        provider: &dyn CreatureDataProvider,
        cache: &mut MoveCache,
        config: &BattleConfig,
    ) -> Self {
        let level = level.clamp(1, 100);
        let max_hp = calculate_max_hp(creature.base_stats.hp, level);
        let moves = Self::fresh_moves(&creature, level, provider, cache, config);
        Self {
            instance_id: None,
            current_hp: max_hp,
            max_hp,
            level,
            moves,
            creature,
            attack_stage: 0,
            defense_stage: 0,
        }
    }

    fn fresh_moves(
        creature: &Creature,
        level: u8,
        provider: &dyn CreatureDataProvider,
        cache: &mut MoveCache,
        config: &BattleConfig,
    ) -> Vec<ActiveMove> {
        default_move_names(creature, level, config)
            .into_iter()
            .map(|name| {
                let max_pp = cache.resolve(provider, &name, creature, config).max_pp;
                ActiveMove {
                    name,
                    pp: max_pp,
                    max_pp,
                }
            })
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.creature.name
    }

    pub fn types(&self) -> &[PokemonType] {
        &self.creature.types
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn find_move(&self, name: &str) -> Option<&ActiveMove> {
        self.moves.iter().find(|m| m.name == name)
    }

    /// Returns false when the move is unknown.
    pub fn consume_pp(&mut self, name: &str) -> bool {
        match self.moves.iter_mut().find(|m| m.name == name) {
            Some(active) => {
                active.pp = active.pp.saturating_sub(1);
                true
            }
            None => false,
        }
    }

    /// Subtract HP, never going below zero. Returns the new HP.
    pub fn take_damage(&mut self, amount: u16) -> u16 {
        self.current_hp = self.current_hp.saturating_sub(amount);
        self.current_hp
    }

    pub fn stage(&self, stat: StatType) -> i8 {
        match stat {
            StatType::Attack => self.attack_stage,
            StatType::Defense => self.defense_stage,
        }
    }

    pub fn set_stage(&mut self, stat: StatType, stage: i8) {
        match stat {
            StatType::Attack => self.attack_stage = stage,
            StatType::Defense => self.defense_stage = stage,
        }
    }

    pub fn effective_attack(&self) -> f64 {
        effective_stat(self.creature.base_stats.attack, self.level, self.attack_stage)
    }

    pub fn effective_defense(&self) -> f64 {
        effective_stat(self.creature.base_stats.defense, self.level, self.defense_stage)
    }

    pub fn speed(&self) -> u32 {
        effective_speed(self.creature.base_stats.speed, self.level)
    }
}
