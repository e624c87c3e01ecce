//! Pokedex Battle Engine
//!
//! Turn-based battles against wild creatures, ball captures and roster
//! progression for a Pokedex client. Creature data comes through a
//! [`provider::CreatureDataProvider`]; owned creatures live in a
//! [`roster::RosterStore`].

pub mod battle;
pub mod config;
pub mod errors;
pub mod inventory;
pub mod progression;
pub mod provider;
pub mod roster;

// --- From the `schema` crate ---
pub use schema::{
    BaseStats, Creature, DamageClass, EvolutionDetail, EvolutionNode, EvolutionTrigger,
    LearnableMove, MoveMetadata, MoveTarget, PokemonType, StatType,
};

// --- From this crate's modules ---
pub use battle::engine::{ActionOutcome, BattleSession};
pub use battle::state::{BattleEvent, BattlePhase, BattleState, Side, TurnRng, VictoryKind};
pub use config::{BattleConfig, CatchConfig, EnemyBehaviorKind, RewardTier};
pub use inventory::{BallCount, BallGrant, BallKind};
pub use progression::{ProgressionEngine, ProgressionReport, ReplacementChoice};
pub use provider::{CreatureDataProvider, CreatureKey, InMemoryCreatureProvider};
pub use roster::{InstanceId, MemoryRosterStore, OwnerId, RosterRecord, RosterStore};

pub use errors::{
    ActionError, BattleEngineError, BattleResult, ConfigError, ProviderError, ProviderResult,
    StoreError, StoreResult,
};
