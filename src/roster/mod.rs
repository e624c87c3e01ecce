//! Durable per-owner roster state: records, team order and ball inventory.

pub mod memory;
pub mod record;

pub use memory::MemoryRosterStore;
pub use record::{KnownMove, LearnOutcome, MovePp, RosterRecord, MAX_KNOWN_MOVES, MAX_LEVEL};

use crate::battle::combatant::default_move_names;
use crate::battle::stats::calculate_max_hp;
use crate::config::BattleConfig;
use crate::errors::StoreResult;
use crate::inventory::{BallCount, BallGrant, BallKind};
use crate::provider::{CreatureDataProvider, MoveCache};
use log::info;
use schema::Creature;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_TEAM_SIZE: usize = 6;

/// Identifies whose roster an operation applies to (a persona, a save slot...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerId(pub String);

impl From<&str> for OwnerId {
    fn from(value: &str) -> Self {
        OwnerId(value.to_string())
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Persistent storage for owned creatures. Every operation names its owner
/// explicitly.
pub trait RosterStore {
    fn get_record(&self, owner: &OwnerId, id: InstanceId) -> Option<RosterRecord>;

    /// Store a new record and return the id assigned to it.
    fn insert_record(&mut self, owner: &OwnerId, record: RosterRecord) -> InstanceId;

    /// Every record the owner has, in acquisition order.
    fn records(&self, owner: &OwnerId) -> Vec<(InstanceId, RosterRecord)>;

    /// Team in battle order.
    fn team(&self, owner: &OwnerId) -> Vec<InstanceId>;

    fn add_to_team(&mut self, owner: &OwnerId, id: InstanceId) -> StoreResult<()>;

    fn remove_from_team(&mut self, owner: &OwnerId, id: InstanceId) -> StoreResult<()>;

    fn set_hp(&mut self, owner: &OwnerId, id: InstanceId, current: u16, max: u16)
        -> StoreResult<()>;

    fn decrement_pp(&mut self, owner: &OwnerId, id: InstanceId, move_name: &str)
        -> StoreResult<()>;

    fn learn_move(
        &mut self,
        owner: &OwnerId,
        id: InstanceId,
        move_name: &str,
        max_pp: u8,
    ) -> StoreResult<LearnOutcome>;

    fn replace_move(
        &mut self,
        owner: &OwnerId,
        id: InstanceId,
        forget: &str,
        learn: &str,
        max_pp: u8,
    ) -> StoreResult<()>;

    fn set_level(&mut self, owner: &OwnerId, id: InstanceId, level: u8) -> StoreResult<()>;

    fn set_experience(&mut self, owner: &OwnerId, id: InstanceId, experience: u32)
        -> StoreResult<()>;

    /// Swap the species of a record, keeping level, experience and moves.
    fn replace_species_on_evolution(
        &mut self,
        owner: &OwnerId,
        id: InstanceId,
        evolved: &Creature,
        current_hp: u16,
        max_hp: u16,
    ) -> StoreResult<()>;

    /// Full HP and PP refresh.
    fn restore_all(&mut self, owner: &OwnerId, id: InstanceId) -> StoreResult<()>;

    fn ball_count(&self, owner: &OwnerId, ball: BallKind) -> StoreResult<BallCount>;

    /// Consume `amount` balls. Returns false, consuming nothing, when there
    /// are not enough.
    fn decrement_balls(&mut self, owner: &OwnerId, ball: BallKind, amount: u32)
        -> StoreResult<bool>;

    fn grant_balls(&mut self, owner: &OwnerId, grants: &[BallGrant]) -> StoreResult<()>;
}

/// Build a full-HP record for `creature` at `level`, knowing its four most
/// recent level-up moves (or the fallback move when it has none).
pub fn build_record(
    provider: &dyn CreatureDataProvider,
    creature: &Creature,
    level: u8,
    config: &BattleConfig,
) -> RosterRecord {
    let mut cache = MoveCache::new();
    let names = default_move_names(creature, level, config);
    let moves = names
        .into_iter()
        .map(|name| {
            let resolved = cache.resolve(provider, &name, creature, config);
            KnownMove {
                name,
                pp: MovePp::full(resolved.max_pp),
            }
        })
        .collect();
    RosterRecord::new(
        creature.id,
        creature.name.clone(),
        level,
        calculate_max_hp(creature.base_stats.hp, level),
        moves,
    )
}

/// Add a starter or gift creature at the configured default level. It joins
/// the team when there is room.
pub fn add_to_roster(
    provider: &dyn CreatureDataProvider,
    store: &mut dyn RosterStore,
    owner: &OwnerId,
    creature: &Creature,
    config: &BattleConfig,
) -> StoreResult<InstanceId> {
    let record = build_record(provider, creature, config.starting_level(), config);
    let id = store.insert_record(owner, record);
    if store.team(owner).len() < MAX_TEAM_SIZE {
        store.add_to_team(owner, id)?;
    }
    info!("{} added {} to the roster as {}", owner, creature.name, id);
    Ok(id)
}

/// Healing center: restore every record the owner has.
pub fn restore_party(store: &mut dyn RosterStore, owner: &OwnerId) -> StoreResult<usize> {
    let ids: Vec<InstanceId> = store.records(owner).into_iter().map(|(id, _)| id).collect();
    for id in &ids {
        store.restore_all(owner, *id)?;
    }
    Ok(ids.len())
}
