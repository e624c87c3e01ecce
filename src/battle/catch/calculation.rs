use crate::battle::state::TurnRng;
use crate::config::CatchConfig;
use serde::{Deserialize, Serialize};

/// Outcome of one throw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatchAttempt {
    pub chance: f64,
    pub success: bool,
    /// 3 on success, 1 or 2 on failure.
    pub shakes: u8,
}

/// Keep a probability inside the global [min, max] window.
pub fn clamp_chance(chance: f64, config: &CatchConfig) -> f64 {
    chance.clamp(config.min_chance, config.max_chance)
}

fn hp_pair(current_hp: u16, max_hp: u16) -> (f64, f64) {
    let max = f64::from(max_hp.max(1));
    let current = f64::from(current_hp).min(max);
    (current, max)
}

/// Chance for the timing mini-game throw.
///
/// a = floor((3*max - 2*current) * catchRate * ball / (3*max))
/// b = floor(65536 / sqrt(sqrt(255 / max(1, a))))
/// chance = min(cap, b/65536 + power/100 * scale)
pub fn mini_game_chance(
    current_hp: u16,
    max_hp: u16,
    catch_rate: u8,
    ball_modifier: f64,
    power: u8,
    config: &CatchConfig,
) -> f64 {
    let (current, max) = hp_pair(current_hp, max_hp);
    let a = ((3.0 * max - 2.0 * current) * f64::from(catch_rate) * ball_modifier / (3.0 * max))
        .floor();
    let b = (65536.0 / (255.0 / a.max(1.0)).sqrt().sqrt()).floor();
    let power_bonus = f64::from(power.min(100)) / 100.0 * config.power_bonus_scale;
    clamp_chance((b / 65536.0 + power_bonus).min(config.mini_game_cap), config)
}

/// Chance for a quick throw without the mini-game.
pub fn quick_throw_chance(
    current_hp: u16,
    max_hp: u16,
    ball_modifier: f64,
    config: &CatchConfig,
) -> f64 {
    let (current, max) = hp_pair(current_hp, max_hp);
    let hp_ratio = current / max;
    let chance = (config.quick_base_chance * ball_modifier
        + (1.0 - hp_ratio) * config.quick_low_hp_bonus)
        .clamp(config.min_chance, config.quick_cap);
    clamp_chance(chance, config)
}

/// Shake count shown to the player; only a success shakes three times.
pub fn roll_shakes(success: bool, rng: &mut TurnRng) -> u8 {
    if success {
        3
    } else {
        1 + rng.next_index(2, "failed catch shakes") as u8
    }
}
