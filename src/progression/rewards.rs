use super::ProgressionEngine;
use crate::battle::state::TurnRng;
use crate::config::RewardTier;
use crate::inventory::BallGrant;
use schema::Creature;

/// One roll checked against every tier; each tier under the roll grants one
/// ball of its kind.
pub fn roll_ball_rewards(tiers: &[RewardTier], rng: &mut TurnRng) -> Vec<BallGrant> {
    let roll = rng.next_unit("victory reward roll");
    tiers
        .iter()
        .filter(|tier| roll < tier.threshold)
        .map(|tier| BallGrant {
            ball: tier.ball,
            quantity: 1,
        })
        .collect()
}

impl ProgressionEngine<'_> {
    /// Experience for defeating `defeated`.
    pub fn experience_yield(&self, defeated: &Creature) -> u32 {
        defeated.base_exp
    }

    pub fn roll_rewards(&self, rng: &mut TurnRng) -> Vec<BallGrant> {
        roll_ball_rewards(&self.config.reward_tiers, rng)
    }
}
