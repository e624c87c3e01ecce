//! Move selection for the wild opponent.

use crate::battle::calculators::STAB_MULTIPLIER;
use crate::battle::combatant::Combatant;
use crate::battle::move_classifier::classify;
use crate::battle::state::TurnRng;
use crate::config::EnemyBehaviorKind;
use crate::provider::cache::ResolvedMove;
use ordered_float::OrderedFloat;
use schema::PokemonType;

/// Score given to status moves by [`ScoringBehavior`].
const STATUS_MOVE_SCORE: f64 = 10.0;

/// Anything that can pick the wild creature's next move.
pub trait EnemyBehavior {
    /// Index into `options`, which is never empty.
    fn choose_move(
        &self,
        options: &[ResolvedMove],
        user: &Combatant,
        target: &Combatant,
        rng: &mut TurnRng,
    ) -> usize;
}

/// Uniform choice among the known moves.
pub struct RandomBehavior;

impl EnemyBehavior for RandomBehavior {
    fn choose_move(
        &self,
        options: &[ResolvedMove],
        _user: &Combatant,
        _target: &Combatant,
        rng: &mut TurnRng,
    ) -> usize {
        rng.next_index(options.len(), "enemy move choice")
    }
}

/// Picks the move with the best expected power against the target.
pub struct ScoringBehavior;

impl ScoringBehavior {
    fn score(&self, option: &ResolvedMove, user: &Combatant, target: &Combatant) -> f64 {
        if classify(&option.name).is_status() {
            return STATUS_MOVE_SCORE;
        }
        let effectiveness = PokemonType::effectiveness_against(option.move_type, target.types());
        let stab = if user.types().contains(&option.move_type) {
            STAB_MULTIPLIER
        } else {
            1.0
        };
        f64::from(option.power) * effectiveness * stab
    }
}

impl EnemyBehavior for ScoringBehavior {
    fn choose_move(
        &self,
        options: &[ResolvedMove],
        user: &Combatant,
        target: &Combatant,
        _rng: &mut TurnRng,
    ) -> usize {
        // max_by_key keeps the last maximum; reverse so ties go to the first move.
        options
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, option)| OrderedFloat(self.score(option, user, target)))
            .map(|(index, _)| index)
            .unwrap_or(0)
    }
}

pub fn behavior_for(kind: EnemyBehaviorKind) -> Box<dyn EnemyBehavior> {
    match kind {
        EnemyBehaviorKind::Random => Box::new(RandomBehavior),
        EnemyBehaviorKind::Scoring => Box::new(ScoringBehavior),
    }
}
