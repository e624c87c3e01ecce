use crate::inventory::BallKind;
use log::warn;
use serde::{Deserialize, Serialize};

pub const MAX_KNOWN_MOVES: usize = 4;
pub const MAX_LEVEL: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePp {
    pub current: u8,
    pub max: u8,
}

impl MovePp {
    pub fn full(max: u8) -> Self {
        Self { current: max, max }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownMove {
    pub name: String,
    pub pp: MovePp,
}

/// Result of asking a record to learn a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LearnOutcome {
    Learned,
    AlreadyKnown,
    /// Four moves are already known; the caller has to pick one to forget.
    ReplacementNeeded,
}

/// Durable state of one owned creature.
///
/// All mutation goes through methods that keep HP, PP, level and move count
/// inside their legal ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRecord {
    species_id: u32,
    species: String,
    current_hp: u16,
    max_hp: u16,
    level: u8,
    experience: u32,
    moves: Vec<KnownMove>,
    ball: Option<BallKind>,
}

impl RosterRecord {
    /// A record at full HP. Moves past the fourth are dropped.
    pub fn new(
        species_id: u32,
        species: impl Into<String>,
        level: u8,
        max_hp: u16,
        moves: Vec<KnownMove>,
    ) -> Self {
        let mut record = Self {
            species_id,
            species: species.into(),
            current_hp: max_hp.max(1),
            max_hp: max_hp.max(1),
            level: level.clamp(1, MAX_LEVEL),
            experience: 0,
            moves: Vec::new(),
            ball: None,
        };
        for known in moves {
            if record.moves.len() < MAX_KNOWN_MOVES && !record.knows_move(&known.name) {
                record.moves.push(known);
            }
        }
        record
    }

    pub fn with_ball(mut self, ball: BallKind) -> Self {
        self.ball = Some(ball);
        self
    }

    pub fn species_id(&self) -> u32 {
        self.species_id
    }

    pub fn species(&self) -> &str {
        &self.species
    }

    pub fn current_hp(&self) -> u16 {
        self.current_hp
    }

    pub fn max_hp(&self) -> u16 {
        self.max_hp
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn moves(&self) -> &[KnownMove] {
        &self.moves
    }

    pub fn ball(&self) -> Option<BallKind> {
        self.ball
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn knows_move(&self, name: &str) -> bool {
        self.moves.iter().any(|m| m.name == name)
    }

    pub fn move_pp(&self, name: &str) -> Option<MovePp> {
        self.moves.iter().find(|m| m.name == name).map(|m| m.pp)
    }

    pub fn set_hp(&mut self, current: u16, max: u16) {
        let max = if max == 0 {
            warn!("Max HP of 0 for {} clamped to 1", self.species);
            1
        } else {
            max
        };
        if current > max {
            warn!(
                "HP {} above max {} for {} clamped",
                current, max, self.species
            );
        }
        self.max_hp = max;
        self.current_hp = current.min(max);
    }

    /// Returns false when the move is unknown. PP never drops below zero.
    pub fn decrement_pp(&mut self, name: &str) -> bool {
        match self.moves.iter_mut().find(|m| m.name == name) {
            Some(known) => {
                known.pp.current = known.pp.current.saturating_sub(1);
                true
            }
            None => false,
        }
    }

    pub fn learn_move(&mut self, name: &str, max_pp: u8) -> LearnOutcome {
        if self.knows_move(name) {
            LearnOutcome::AlreadyKnown
        } else if self.moves.len() >= MAX_KNOWN_MOVES {
            LearnOutcome::ReplacementNeeded
        } else {
            self.moves.push(KnownMove {
                name: name.to_string(),
                pp: MovePp::full(max_pp),
            });
            LearnOutcome::Learned
        }
    }

    /// Swap `forget` for `learn` in place. Returns false when `forget` is not
    /// known or `learn` already is.
    pub fn replace_move(&mut self, forget: &str, learn: &str, max_pp: u8) -> bool {
        if self.knows_move(learn) {
            return false;
        }
        match self.moves.iter_mut().find(|m| m.name == forget) {
            Some(slot) => {
                *slot = KnownMove {
                    name: learn.to_string(),
                    pp: MovePp::full(max_pp),
                };
                true
            }
            None => false,
        }
    }

    pub fn set_level(&mut self, level: u8) {
        let clamped = level.clamp(1, MAX_LEVEL);
        if clamped != level {
            warn!("Level {} for {} clamped to {}", level, self.species, clamped);
        }
        self.level = clamped;
    }

    pub fn set_experience(&mut self, experience: u32) {
        self.experience = experience;
    }

    pub fn evolve_into(&mut self, species_id: u32, species: &str, current_hp: u16, max_hp: u16) {
        self.species_id = species_id;
        self.species = species.to_string();
        self.set_hp(current_hp, max_hp);
    }

    pub fn restore(&mut self) {
        self.current_hp = self.max_hp;
        for known in &mut self.moves {
            known.pp.current = known.pp.max;
        }
    }
}
