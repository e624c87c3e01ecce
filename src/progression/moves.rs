use super::{PendingMove, ProgressionEngine, ProgressionReport, ReplacementChoice};
use crate::errors::StoreResult;
use crate::roster::{InstanceId, LearnOutcome, OwnerId, RosterStore, MAX_KNOWN_MOVES};
use log::info;
use schema::Creature;

/// The four highest-level moves unlocked at `level`, in (level, name) order.
pub fn latest_level_up_moves(creature: &Creature, level: u8) -> Vec<String> {
    let unlocked = creature.level_up_moves_up_to(level);
    let skip = unlocked.len().saturating_sub(MAX_KNOWN_MOVES);
    unlocked.into_iter().skip(skip).map(|m| m.name).collect()
}

impl ProgressionEngine<'_> {
    /// Learn every move in the latest level-up set that the record does not
    /// know yet. With four moves known, the move is reported as pending.
    pub(crate) fn learn_level_up_moves(
        &mut self,
        store: &mut dyn RosterStore,
        owner: &OwnerId,
        id: InstanceId,
        creature: &Creature,
        level: u8,
        report: &mut ProgressionReport,
    ) -> StoreResult<()> {
        for move_name in latest_level_up_moves(creature, level) {
            let max_pp = self
                .cache
                .resolve(self.provider, &move_name, creature, self.config)
                .max_pp;
            match store.learn_move(owner, id, &move_name, max_pp)? {
                LearnOutcome::Learned => {
                    info!("{} learned {}", creature.name, move_name);
                    report.moves_learned.push(move_name);
                }
                LearnOutcome::AlreadyKnown => {}
                LearnOutcome::ReplacementNeeded => {
                    report.pending_replacements.push(PendingMove {
                        instance_id: id,
                        move_name,
                        max_pp,
                    });
                }
            }
        }
        Ok(())
    }

    /// Apply the caller's decision for a pending move. Returns true when the
    /// move was learned.
    pub fn resolve_replacement(
        &self,
        store: &mut dyn RosterStore,
        owner: &OwnerId,
        pending: &PendingMove,
        choice: ReplacementChoice,
    ) -> StoreResult<bool> {
        match choice {
            ReplacementChoice::Forget(forget) => {
                store.replace_move(
                    owner,
                    pending.instance_id,
                    &forget,
                    &pending.move_name,
                    pending.max_pp,
                )?;
                info!("Forgot {} and learned {}", forget, pending.move_name);
                Ok(true)
            }
            ReplacementChoice::Skip => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schema::{BaseStats, LearnableMove, PokemonType};

    fn creature(moves: &[(&str, u8)]) -> Creature {
        Creature {
            id: 1,
            name: "bulbasaur".to_string(),
            types: vec![PokemonType::Grass, PokemonType::Poison],
            base_stats: BaseStats {
                hp: 45,
                attack: 49,
                defense: 49,
                sp_attack: 65,
                sp_defense: 65,
                speed: 45,
            },
            base_exp: 64,
            catch_rate: Some(45),
            level_up_moves: moves
                .iter()
                .map(|(name, level)| LearnableMove {
                    name: name.to_string(),
                    level: *level,
                })
                .collect(),
        }
    }

    #[test]
    fn test_latest_moves_take_last_four() {
        let bulbasaur = creature(&[
            ("tackle", 1),
            ("growl", 1),
            ("vine-whip", 3),
            ("growth", 6),
            ("leech-seed", 9),
            ("razor-leaf", 12),
        ]);
        assert_eq!(
            latest_level_up_moves(&bulbasaur, 10),
            vec!["tackle", "vine-whip", "growth", "leech-seed"]
        );
        assert_eq!(latest_level_up_moves(&bulbasaur, 2), vec!["growl", "tackle"]);
    }

    #[test]
    fn test_duplicate_entries_keep_highest_level() {
        let bulbasaur = creature(&[("tackle", 1), ("growl", 4), ("tackle", 7)]);
        assert_eq!(latest_level_up_moves(&bulbasaur, 10), vec!["growl", "tackle"]);
    }
}
