use super::{ProgressionEngine, ProgressionReport};
use crate::battle::stats::calculate_max_hp;
use crate::errors::{BattleResult, StoreError};
use crate::provider::CreatureKey;
use crate::roster::{InstanceId, OwnerId, RosterStore, MAX_LEVEL};
use log::{info, warn};

/// Experience needed to go from `level` to `level + 1`.
pub fn exp_for_next_level(level: u8) -> u32 {
    100 + u32::from(level.max(1) - 1) * 50
}

/// Add `award` and level up as many times as the total allows.
/// Returns the new (level, leftover experience).
pub fn apply_experience(level: u8, experience: u32, award: u32) -> (u8, u32) {
    let mut level = level.clamp(1, MAX_LEVEL);
    let mut experience = experience.saturating_add(award);
    while level < MAX_LEVEL && experience >= exp_for_next_level(level) {
        experience -= exp_for_next_level(level);
        level += 1;
    }
    (level, experience)
}

impl ProgressionEngine<'_> {
    /// Award experience to a record, then run leveling, move learning and
    /// evolution. Missing species data skips the later steps.
    pub fn award_experience(
        &mut self,
        store: &mut dyn RosterStore,
        owner: &OwnerId,
        id: InstanceId,
        amount: u32,
    ) -> BattleResult<ProgressionReport> {
        let record = store
            .get_record(owner, id)
            .ok_or_else(|| StoreError::UnknownRecord(owner.clone(), id))?;
        let old_level = record.level();
        let (new_level, experience) = apply_experience(old_level, record.experience(), amount);
        store.set_experience(owner, id, experience)?;
        store.set_level(owner, id, new_level)?;

        let mut report = ProgressionReport {
            instance_id: id,
            creature: record.species().to_string(),
            experience_gained: amount,
            old_level,
            new_level,
            experience,
            moves_learned: Vec::new(),
            pending_replacements: Vec::new(),
            evolution: None,
        };
        if new_level == old_level {
            return Ok(report);
        }
        info!("{} grew from level {} to {}", record.species(), old_level, new_level);

        let creature = match self
            .provider
            .get_creature(&CreatureKey::Id(record.species_id()))
        {
            Ok(creature) => creature,
            Err(err) => {
                warn!("Skipping level-up effects for {}: {}", record.species(), err);
                return Ok(report);
            }
        };

        // Raise current HP by however much the maximum grew.
        let new_max = calculate_max_hp(creature.base_stats.hp, new_level);
        let growth = new_max.saturating_sub(record.max_hp());
        store.set_hp(
            owner,
            id,
            record.current_hp().saturating_add(growth).min(new_max),
            new_max,
        )?;

        self.learn_level_up_moves(store, owner, id, &creature, new_level, &mut report)?;
        report.evolution = self.check_evolution(store, owner, id, &creature, new_level)?;
        Ok(report)
    }

    /// Level panel action: jump straight to `level`. Experience resets, HP is
    /// refilled to the new maximum, then moves and evolution are checked.
    pub fn set_level(
        &mut self,
        store: &mut dyn RosterStore,
        owner: &OwnerId,
        id: InstanceId,
        level: u8,
    ) -> BattleResult<ProgressionReport> {
        let record = store
            .get_record(owner, id)
            .ok_or_else(|| StoreError::UnknownRecord(owner.clone(), id))?;
        let creature = self
            .provider
            .get_creature(&CreatureKey::Id(record.species_id()))?;
        let level = level.clamp(1, MAX_LEVEL);
        store.set_level(owner, id, level)?;
        store.set_experience(owner, id, 0)?;
        let max_hp = calculate_max_hp(creature.base_stats.hp, level);
        store.set_hp(owner, id, max_hp, max_hp)?;

        let mut report = ProgressionReport {
            instance_id: id,
            creature: record.species().to_string(),
            experience_gained: 0,
            old_level: record.level(),
            new_level: level,
            experience: 0,
            moves_learned: Vec::new(),
            pending_replacements: Vec::new(),
            evolution: None,
        };
        self.learn_level_up_moves(store, owner, id, &creature, level, &mut report)?;
        report.evolution = self.check_evolution(store, owner, id, &creature, level)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_threshold_curve() {
        assert_eq!(exp_for_next_level(1), 100);
        assert_eq!(exp_for_next_level(2), 150);
        assert_eq!(exp_for_next_level(10), 550);
    }

    #[test]
    fn test_multi_level_jump() {
        assert_eq!(apply_experience(1, 0, 260), (3, 10));
    }

    #[test]
    fn test_exact_threshold_levels_up() {
        assert_eq!(apply_experience(1, 0, 100), (2, 0));
        assert_eq!(apply_experience(1, 0, 99), (1, 99));
    }

    #[test]
    fn test_level_cap() {
        let (level, _) = apply_experience(99, 0, u32::MAX);
        assert_eq!(level, MAX_LEVEL);
    }

    #[rstest]
    #[case(1, 0, 40, 70)]
    #[case(1, 0, 260, 0)]
    #[case(5, 30, 1000, 2500)]
    #[case(98, 0, 20_000, 7)]
    fn test_split_awards_match_single_award(
        #[case] level: u8,
        #[case] experience: u32,
        #[case] x: u32,
        #[case] y: u32,
    ) {
        let (mid_level, mid_exp) = apply_experience(level, experience, x);
        let split = apply_experience(mid_level, mid_exp, y);
        let single = apply_experience(level, experience, x + y);
        assert_eq!(split, single);
    }
}
