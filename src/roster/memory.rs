use super::{InstanceId, LearnOutcome, OwnerId, RosterRecord, RosterStore, MAX_TEAM_SIZE};
use crate::config::BattleConfig;
use crate::errors::{StoreError, StoreResult};
use crate::inventory::{BallCount, BallGrant, BallInventory, BallKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct OwnerRoster {
    records: BTreeMap<InstanceId, RosterRecord>,
    team: Vec<InstanceId>,
    inventory: BallInventory,
}

/// Roster store held in memory. Owners are created on first insert with the
/// starting ball inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRosterStore {
    owners: BTreeMap<OwnerId, OwnerRoster>,
    next_id: u64,
    starting_balls: u32,
}

impl Default for MemoryRosterStore {
    fn default() -> Self {
        Self::from_config(&BattleConfig::default())
    }
}

impl MemoryRosterStore {
    pub fn new(starting_balls: u32) -> Self {
        Self {
            owners: BTreeMap::new(),
            next_id: 1,
            starting_balls,
        }
    }

    pub fn from_config(config: &BattleConfig) -> Self {
        Self::new(config.starting_balls)
    }

    /// Make sure `owner` exists, e.g. to give a new persona its inventory.
    pub fn register_owner(&mut self, owner: &OwnerId) {
        let starting_balls = self.starting_balls;
        self.owners
            .entry(owner.clone())
            .or_insert_with(|| OwnerRoster {
                records: BTreeMap::new(),
                team: Vec::new(),
                inventory: BallInventory::starting(starting_balls),
            });
    }

    pub fn to_ron(&self) -> StoreResult<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| StoreError::Snapshot(e.to_string()))
    }

    pub fn from_ron(text: &str) -> StoreResult<Self> {
        ron::from_str(text).map_err(|e| StoreError::Snapshot(e.to_string()))
    }

    pub fn to_bytes(&self) -> StoreResult<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|e| StoreError::Snapshot(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> StoreResult<Self> {
        postcard::from_bytes(bytes).map_err(|e| StoreError::Snapshot(e.to_string()))
    }

    fn roster(&self, owner: &OwnerId) -> StoreResult<&OwnerRoster> {
        self.owners
            .get(owner)
            .ok_or_else(|| StoreError::UnknownOwner(owner.clone()))
    }

    fn roster_mut(&mut self, owner: &OwnerId) -> StoreResult<&mut OwnerRoster> {
        self.owners
            .get_mut(owner)
            .ok_or_else(|| StoreError::UnknownOwner(owner.clone()))
    }

    fn record_mut(&mut self, owner: &OwnerId, id: InstanceId) -> StoreResult<&mut RosterRecord> {
        self.roster_mut(owner)?
            .records
            .get_mut(&id)
            .ok_or_else(|| StoreError::UnknownRecord(owner.clone(), id))
    }
}

impl RosterStore for MemoryRosterStore {
    fn get_record(&self, owner: &OwnerId, id: InstanceId) -> Option<RosterRecord> {
        self.owners.get(owner)?.records.get(&id).cloned()
    }

    fn insert_record(&mut self, owner: &OwnerId, record: RosterRecord) -> InstanceId {
        self.register_owner(owner);
        let id = InstanceId(self.next_id);
        self.next_id += 1;
        if let Some(roster) = self.owners.get_mut(owner) {
            roster.records.insert(id, record);
        }
        id
    }

    fn records(&self, owner: &OwnerId) -> Vec<(InstanceId, RosterRecord)> {
        self.owners
            .get(owner)
            .map(|roster| {
                roster
                    .records
                    .iter()
                    .map(|(id, record)| (*id, record.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn team(&self, owner: &OwnerId) -> Vec<InstanceId> {
        self.owners
            .get(owner)
            .map(|roster| roster.team.clone())
            .unwrap_or_default()
    }

    fn add_to_team(&mut self, owner: &OwnerId, id: InstanceId) -> StoreResult<()> {
        let roster = self.roster_mut(owner)?;
        if !roster.records.contains_key(&id) {
            return Err(StoreError::UnknownRecord(owner.clone(), id));
        }
        if roster.team.contains(&id) {
            return Ok(());
        }
        if roster.team.len() >= MAX_TEAM_SIZE {
            return Err(StoreError::TeamFull(owner.clone()));
        }
        roster.team.push(id);
        Ok(())
    }

    fn remove_from_team(&mut self, owner: &OwnerId, id: InstanceId) -> StoreResult<()> {
        self.roster_mut(owner)?.team.retain(|member| *member != id);
        Ok(())
    }

    fn set_hp(&mut self, owner: &OwnerId, id: InstanceId, current: u16, max: u16) -> StoreResult<()> {
        self.record_mut(owner, id)?.set_hp(current, max);
        Ok(())
    }

    fn decrement_pp(&mut self, owner: &OwnerId, id: InstanceId, move_name: &str) -> StoreResult<()> {
        if self.record_mut(owner, id)?.decrement_pp(move_name) {
            Ok(())
        } else {
            Err(StoreError::MoveNotKnown(id, move_name.to_string()))
        }
    }

    fn learn_move(
        &mut self,
        owner: &OwnerId,
        id: InstanceId,
        move_name: &str,
        max_pp: u8,
    ) -> StoreResult<LearnOutcome> {
        Ok(self.record_mut(owner, id)?.learn_move(move_name, max_pp))
    }

    fn replace_move(
        &mut self,
        owner: &OwnerId,
        id: InstanceId,
        forget: &str,
        learn: &str,
        max_pp: u8,
    ) -> StoreResult<()> {
        let record = self.record_mut(owner, id)?;
        if record.knows_move(learn) {
            return Err(StoreError::MoveAlreadyKnown(id, learn.to_string()));
        }
        if record.replace_move(forget, learn, max_pp) {
            Ok(())
        } else {
            Err(StoreError::MoveNotKnown(id, forget.to_string()))
        }
    }

    fn set_level(&mut self, owner: &OwnerId, id: InstanceId, level: u8) -> StoreResult<()> {
        self.record_mut(owner, id)?.set_level(level);
        Ok(())
    }

    fn set_experience(&mut self, owner: &OwnerId, id: InstanceId, experience: u32) -> StoreResult<()> {
        self.record_mut(owner, id)?.set_experience(experience);
        Ok(())
    }

    fn replace_species_on_evolution(
        &mut self,
        owner: &OwnerId,
        id: InstanceId,
        evolved: &schema::Creature,
        current_hp: u16,
        max_hp: u16,
    ) -> StoreResult<()> {
        self.record_mut(owner, id)?
            .evolve_into(evolved.id, &evolved.name, current_hp, max_hp);
        Ok(())
    }

    fn restore_all(&mut self, owner: &OwnerId, id: InstanceId) -> StoreResult<()> {
        self.record_mut(owner, id)?.restore();
        Ok(())
    }

    fn ball_count(&self, owner: &OwnerId, ball: BallKind) -> StoreResult<BallCount> {
        Ok(self.roster(owner)?.inventory.get_count(ball))
    }

    fn decrement_balls(&mut self, owner: &OwnerId, ball: BallKind, amount: u32) -> StoreResult<bool> {
        let inventory = &mut self.roster_mut(owner)?.inventory;
        match inventory.get_count(ball) {
            BallCount::Unlimited => Ok(true),
            BallCount::Limited(n) if n < amount => Ok(false),
            BallCount::Limited(_) => {
                for _ in 0..amount {
                    inventory.decrement(ball);
                }
                Ok(true)
            }
        }
    }

    fn grant_balls(&mut self, owner: &OwnerId, grants: &[BallGrant]) -> StoreResult<()> {
        let inventory = &mut self.roster_mut(owner)?.inventory;
        for grant in grants {
            inventory.grant(*grant);
        }
        Ok(())
    }
}
