use crate::inventory::BallKind;
use crate::roster::{InstanceId, OwnerId};
use thiserror::Error;

/// Main error type for the battle engine. Only unrecoverable conditions end
/// up here; in-battle problems degrade to a safe state instead.
#[derive(Debug, Error)]
pub enum BattleEngineError {
    /// The wild creature (or another required creature) could not be found at all.
    #[error("creature could not be found: {0}")]
    CreatureNotFound(String),
    /// The owner has no team member able to fight.
    #[error("no usable creature on the team of {0}")]
    NoUsableCreatures(OwnerId),
    #[error("creature data provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("roster store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors surfaced by a creature data provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The requested creature, move or evolution graph does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// The upstream lookup failed (network, timeout, ...).
    #[error("data unavailable: {0}")]
    Unavailable(String),
    /// The payload could not be turned into a valid schema value.
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Errors surfaced by a roster store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("unknown roster owner: {0}")]
    UnknownOwner(OwnerId),
    #[error("no roster record {1} for owner {0}")]
    UnknownRecord(OwnerId, InstanceId),
    #[error("team of {0} is already full")]
    TeamFull(OwnerId),
    #[error("record {0} does not know move {1}")]
    MoveNotKnown(InstanceId, String),
    #[error("record {0} already knows move {1}")]
    MoveAlreadyKnown(InstanceId, String),
    #[error("snapshot error: {0}")]
    Snapshot(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Reasons a caller action is not permitted. Returned instead of mutating
/// state; the battle is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("another action is still resolving")]
    Busy,
    #[error("the battle is already over")]
    BattleOver,
    #[error("it is not the player's turn")]
    NotPlayerTurn,
    #[error("a replacement must be switched in first")]
    SwitchRequired,
    #[error("the active creature does not know {0}")]
    UnknownMove(String),
    #[error("{0} has no PP left")]
    NoPpRemaining(String),
    #[error("no team member at slot {0}")]
    InvalidPartyIndex(usize),
    #[error("team member at slot {0} is already active")]
    AlreadyActive(usize),
    #[error("team member at slot {0} has fainted")]
    TargetFainted(usize),
    #[error("no {0} left")]
    NoBallsRemaining(BallKind),
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using ProviderError
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Type alias for Results using StoreError
pub type StoreResult<T> = Result<T, StoreError>;
