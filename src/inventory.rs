use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The kinds of ball a player can throw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BallKind {
    Poke,
    Great,
    Ultra,
    Premier,
    Luxury,
    Heal,
}

impl BallKind {
    pub const ALL: [BallKind; 6] = [
        BallKind::Poke,
        BallKind::Great,
        BallKind::Ultra,
        BallKind::Premier,
        BallKind::Luxury,
        BallKind::Heal,
    ];

    /// Catch-rate multiplier applied by this ball.
    pub fn modifier(self) -> f64 {
        match self {
            BallKind::Poke => 1.0,
            BallKind::Great => 1.5,
            BallKind::Ultra => 2.0,
            BallKind::Premier => 1.0,
            BallKind::Luxury => 1.0,
            BallKind::Heal => 1.1,
        }
    }

    /// The basic ball is never consumed.
    pub fn is_unlimited(self) -> bool {
        matches!(self, BallKind::Poke)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            BallKind::Poke => "Poké Ball",
            BallKind::Great => "Great Ball",
            BallKind::Ultra => "Ultra Ball",
            BallKind::Premier => "Premier Ball",
            BallKind::Luxury => "Luxury Ball",
            BallKind::Heal => "Heal Ball",
        }
    }
}

impl fmt::Display for BallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallCount {
    Unlimited,
    Limited(u32),
}

impl BallCount {
    pub fn is_available(self) -> bool {
        match self {
            BallCount::Unlimited => true,
            BallCount::Limited(n) => n > 0,
        }
    }
}

impl fmt::Display for BallCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BallCount::Unlimited => f.write_str("∞"),
            BallCount::Limited(n) => write!(f, "{}", n),
        }
    }
}

/// A grant of balls handed out after a victory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallGrant {
    pub ball: BallKind,
    pub quantity: u32,
}

/// Per-owner ball counts. Counts for limited kinds never go below zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallInventory {
    counts: BTreeMap<BallKind, u32>,
}

impl BallInventory {
    pub fn empty() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    /// Inventory with `count` of every limited kind.
    pub fn starting(count: u32) -> Self {
        let counts = BallKind::ALL
            .iter()
            .filter(|ball| !ball.is_unlimited())
            .map(|ball| (*ball, count))
            .collect();
        Self { counts }
    }

    pub fn get_count(&self, ball: BallKind) -> BallCount {
        if ball.is_unlimited() {
            BallCount::Unlimited
        } else {
            BallCount::Limited(self.counts.get(&ball).copied().unwrap_or(0))
        }
    }

    /// Consume one ball. Returns false (and changes nothing) when none are left.
    pub fn decrement(&mut self, ball: BallKind) -> bool {
        if ball.is_unlimited() {
            return true;
        }
        match self.counts.get_mut(&ball) {
            Some(n) if *n > 0 => {
                *n -= 1;
                true
            }
            _ => false,
        }
    }

    /// Grants of the unlimited kind are accepted and ignored.
    pub fn grant(&mut self, grant: BallGrant) {
        if grant.ball.is_unlimited() {
            return;
        }
        let count = self.counts.entry(grant.ball).or_insert(0);
        *count = count.saturating_add(grant.quantity);
    }
}

impl Default for BallInventory {
    fn default() -> Self {
        Self::starting(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poke_ball_is_unlimited() {
        let mut inventory = BallInventory::empty();
        assert_eq!(inventory.get_count(BallKind::Poke), BallCount::Unlimited);
        assert!(inventory.decrement(BallKind::Poke));
        assert_eq!(inventory.get_count(BallKind::Poke), BallCount::Unlimited);
    }

    #[test]
    fn test_limited_balls_never_go_negative() {
        let mut inventory = BallInventory::starting(1);
        assert!(inventory.decrement(BallKind::Ultra));
        assert!(!inventory.decrement(BallKind::Ultra));
        assert_eq!(inventory.get_count(BallKind::Ultra), BallCount::Limited(0));
    }

    #[test]
    fn test_grant_adds_and_ignores_poke() {
        let mut inventory = BallInventory::empty();
        inventory.grant(BallGrant {
            ball: BallKind::Luxury,
            quantity: 2,
        });
        inventory.grant(BallGrant {
            ball: BallKind::Poke,
            quantity: 5,
        });
        assert_eq!(inventory.get_count(BallKind::Luxury), BallCount::Limited(2));
        assert_eq!(inventory.get_count(BallKind::Poke), BallCount::Unlimited);
    }

    #[test]
    fn test_grant_saturates() {
        let mut inventory = BallInventory::starting(u32::MAX - 1);
        inventory.grant(BallGrant {
            ball: BallKind::Great,
            quantity: 5,
        });
        assert_eq!(inventory.get_count(BallKind::Great), BallCount::Limited(u32::MAX));
    }

    #[test]
    fn test_default_starts_with_three_of_each() {
        let inventory = BallInventory::default();
        for ball in BallKind::ALL.iter().filter(|b| !b.is_unlimited()) {
            assert_eq!(inventory.get_count(*ball), BallCount::Limited(3));
        }
    }
}
