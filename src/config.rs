use crate::errors::ConfigError;
use crate::inventory::BallKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for the battle engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Level given to newly acquired creatures.
    pub default_level: u8,
    pub fallback_move_name: String,
    pub fallback_move_power: u16,
    pub fallback_move_pp: u8,
    /// Catch rate used for species that do not carry one.
    pub default_catch_rate: u8,
    pub catch: CatchConfig,
    /// Checked against a single roll after each knockout victory.
    pub reward_tiers: Vec<RewardTier>,
    pub starting_balls: u32,
    pub enemy_behavior: EnemyBehaviorKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatchConfig {
    pub power_bonus_scale: f64,
    pub mini_game_cap: f64,
    pub quick_base_chance: f64,
    pub quick_low_hp_bonus: f64,
    pub quick_cap: f64,
    pub min_chance: f64,
    pub max_chance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardTier {
    pub ball: BallKind,
    pub threshold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EnemyBehaviorKind {
    #[default]
    Random,
    Scoring,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            default_level: 5,
            fallback_move_name: "tackle".to_string(),
            fallback_move_power: 40,
            fallback_move_pp: 20,
            default_catch_rate: 45,
            catch: CatchConfig::default(),
            reward_tiers: vec![
                RewardTier { ball: BallKind::Poke, threshold: 0.6 },
                RewardTier { ball: BallKind::Great, threshold: 0.35 },
                RewardTier { ball: BallKind::Heal, threshold: 0.15 },
                RewardTier { ball: BallKind::Ultra, threshold: 0.08 },
                RewardTier { ball: BallKind::Premier, threshold: 0.04 },
                RewardTier { ball: BallKind::Luxury, threshold: 0.02 },
            ],
            starting_balls: 3,
            enemy_behavior: EnemyBehaviorKind::Random,
        }
    }
}

impl Default for CatchConfig {
    fn default() -> Self {
        Self {
            power_bonus_scale: 0.2,
            mini_game_cap: 0.95,
            quick_base_chance: 0.2,
            quick_low_hp_bonus: 0.6,
            quick_cap: 0.95,
            min_chance: 0.05,
            max_chance: 0.98,
        }
    }
}

impl BattleConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Level clamped to the legal range.
    pub fn starting_level(&self) -> u8 {
        self.default_level.clamp(1, 100)
    }
}
