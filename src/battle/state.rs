use crate::battle::combatant::Combatant;
use crate::errors::ActionError;
use crate::inventory::BallKind;
use crate::roster::{InstanceId, OwnerId};
use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema::StatType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Wild,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Wild,
            Side::Wild => Side::Player,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VictoryKind {
    Knockout,
    Captured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    Engaging,
    PlayerTurn,
    EnemyTurn,
    /// The active creature fainted and a replacement must be chosen.
    ForcedSwitch,
    Victory(VictoryKind),
    Defeat,
}

impl BattlePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, BattlePhase::Victory(_) | BattlePhase::Defeat)
    }

    /// Moves and throws are only accepted on the player's turn.
    pub fn ensure_player_turn(self) -> Result<(), ActionError> {
        if self.is_terminal() {
            return Err(ActionError::BattleOver);
        }
        match self {
            BattlePhase::PlayerTurn => Ok(()),
            BattlePhase::ForcedSwitch => Err(ActionError::SwitchRequired),
            _ => Err(ActionError::NotPlayerTurn),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    BattleStarted {
        wild: String,
        level: u8,
    },
    SentOut {
        creature: String,
    },
    CreatureSwitched {
        old_creature: String,
        new_creature: String,
    },
    TurnStarted {
        turn_number: u32,
    },
    MoveUsed {
        side: Side,
        creature: String,
        move_name: String,
    },
    DamageDealt {
        side: Side,
        target: String,
        damage: u16,
        remaining_hp: u16,
    },
    AttackTypeEffectiveness {
        multiplier: f64,
    },
    StatStageChanged {
        side: Side,
        target: String,
        stat: StatType,
        delta: i8,
        new_stage: i8,
    },
    /// The stage was already at its limit.
    StatStageUnchanged {
        side: Side,
        target: String,
        stat: StatType,
        rising: bool,
    },
    /// A status move whose effect is not modeled.
    StatusMoveHadEffect,
    CreatureFainted {
        side: Side,
        creature: String,
    },
    SwitchRequired,
    BallThrown {
        ball: BallKind,
    },
    CaptureSucceeded {
        creature: String,
        ball: BallKind,
    },
    CaptureFailed {
        creature: String,
        shakes: u8,
    },
    ExperienceGained {
        creature: String,
        amount: u32,
    },
    LevelUp {
        creature: String,
        new_level: u8,
    },
    MoveLearned {
        creature: String,
        move_name: String,
    },
    MoveReplacementNeeded {
        creature: String,
        move_name: String,
    },
    Evolved {
        from: String,
        into: String,
    },
    BallsGranted {
        ball: BallKind,
        quantity: u32,
    },
    BattleWon {
        kind: VictoryKind,
    },
    BattleLost,
}

impl BattleEvent {
    /// Battle log line for this event, or `None` for silent events.
    pub fn format(&self) -> Option<String> {
        match self {
            BattleEvent::BattleStarted { wild, level } => Some(format!(
                "A wild {} (Lv. {}) appeared!",
                Self::format_creature_name(wild),
                level
            )),
            BattleEvent::SentOut { creature } => {
                Some(format!("Go! {}!", Self::format_creature_name(creature)))
            }
            BattleEvent::CreatureSwitched {
                old_creature,
                new_creature,
            } => Some(format!(
                "Come back, {}! Go! {}!",
                Self::format_creature_name(old_creature),
                Self::format_creature_name(new_creature)
            )),
            BattleEvent::TurnStarted { .. } => None,
            BattleEvent::MoveUsed {
                side,
                creature,
                move_name,
            } => Some(format!(
                "{} used {}!",
                Self::side_name(*side, creature),
                Self::format_move_name(move_name)
            )),
            BattleEvent::DamageDealt {
                side,
                target,
                damage,
                ..
            } => Some(format!(
                "{} took {} damage.",
                Self::side_name(*side, target),
                damage
            )),
            BattleEvent::AttackTypeEffectiveness { multiplier } => match *multiplier {
                m if m == 0.0 => Some("It had no effect.".to_string()),
                m if m >= 2.0 => Some("It's super effective!".to_string()),
                m if m <= 0.5 => Some("It's not very effective...".to_string()),
                _ => None,
            },
            BattleEvent::StatStageChanged {
                side,
                target,
                stat,
                delta,
                ..
            } => {
                let verb = match *delta {
                    d if d >= 2 => "sharply rose",
                    d if d > 0 => "rose",
                    d if d <= -2 => "harshly fell",
                    _ => "fell",
                };
                Some(format!("{}'s {} {}!", Self::side_name(*side, target), stat, verb))
            }
            BattleEvent::StatStageUnchanged {
                side,
                target,
                stat,
                rising,
            } => Some(format!(
                "{}'s {} won't go any {}!",
                Self::side_name(*side, target),
                stat,
                if *rising { "higher" } else { "lower" }
            )),
            BattleEvent::StatusMoveHadEffect => Some("It had an effect!".to_string()),
            BattleEvent::CreatureFainted { side, creature } => {
                Some(format!("{} fainted!", Self::side_name(*side, creature)))
            }
            BattleEvent::SwitchRequired => Some("Choose a creature to send out!".to_string()),
            BattleEvent::BallThrown { ball } => Some(format!("You threw a {}!", ball)),
            BattleEvent::CaptureSucceeded { creature, .. } => Some(format!(
                "Gotcha! {} was caught!",
                Self::format_creature_name(creature)
            )),
            BattleEvent::CaptureFailed { creature, .. } => Some(format!(
                "Oh no! {} broke free!",
                Self::format_creature_name(creature)
            )),
            BattleEvent::ExperienceGained { creature, amount } => Some(format!(
                "{} gained {} Exp. Points!",
                Self::format_creature_name(creature),
                amount
            )),
            BattleEvent::LevelUp {
                creature,
                new_level,
            } => Some(format!(
                "{} grew to level {}!",
                Self::format_creature_name(creature),
                new_level
            )),
            BattleEvent::MoveLearned {
                creature,
                move_name,
            } => Some(format!(
                "{} learned {}!",
                Self::format_creature_name(creature),
                Self::format_move_name(move_name)
            )),
            BattleEvent::MoveReplacementNeeded {
                creature,
                move_name,
            } => Some(format!(
                "{} wants to learn {}, but already knows 4 moves.",
                Self::format_creature_name(creature),
                Self::format_move_name(move_name)
            )),
            BattleEvent::Evolved { from, into } => Some(format!(
                "{} evolved into {}!",
                Self::format_creature_name(from),
                Self::format_creature_name(into)
            )),
            BattleEvent::BallsGranted { ball, quantity } => Some(format!(
                "You received {} {}{}!",
                quantity,
                ball,
                if *quantity == 1 { "" } else { "s" }
            )),
            BattleEvent::BattleWon {
                kind: VictoryKind::Knockout,
            } => Some("You won the battle!".to_string()),
            BattleEvent::BattleWon {
                kind: VictoryKind::Captured,
            } => None,
            BattleEvent::BattleLost => {
                Some("You have no more creatures that can fight!".to_string())
            }
        }
    }

    fn side_name(side: Side, creature: &str) -> String {
        match side {
            Side::Player => Self::format_creature_name(creature),
            Side::Wild => format!("Wild {}", Self::format_creature_name(creature)),
        }
    }

    /// "mr-mime" -> "Mr Mime"
    pub fn format_creature_name(name: &str) -> String {
        Self::title_case(name)
    }

    /// "swords-dance" -> "Swords Dance"
    pub fn format_move_name(name: &str) -> String {
        Self::title_case(name)
    }

    fn title_case(name: &str) -> String {
        name.split('-')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Ordered events produced while resolving one action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }

    /// Narration lines for every non-silent event.
    pub fn narration(&self) -> Vec<String> {
        self.events.iter().filter_map(BattleEvent::format).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl std::fmt::Display for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum RngSource {
    Scripted { outcomes: Vec<f64>, index: usize },
    Seeded(StdRng),
}

/// Source of every random draw in a battle. Scripted outcomes make tests
/// exact; each draw is traced with its reason.
#[derive(Debug, Clone)]
pub struct TurnRng {
    source: RngSource,
    draws: usize,
}

impl TurnRng {
    /// Draws return `outcomes` in order, each expected in [0, 1).
    pub fn new_for_test(outcomes: Vec<f64>) -> Self {
        Self {
            source: RngSource::Scripted { outcomes, index: 0 },
            draws: 0,
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: RngSource::Seeded(StdRng::seed_from_u64(seed)),
            draws: 0,
        }
    }

    pub fn new_random() -> Self {
        Self {
            source: RngSource::Seeded(StdRng::from_os_rng()),
            draws: 0,
        }
    }

    /// Uniform draw in [0, 1).
    pub fn next_unit(&mut self, reason: &str) -> f64 {
        let outcome = match &mut self.source {
            RngSource::Scripted { outcomes, index } => {
                if *index >= outcomes.len() {
                    panic!(
                        "TurnRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                        reason
                    );
                }
                let outcome = outcomes[*index];
                *index += 1;
                outcome.clamp(0.0, 1.0)
            }
            RngSource::Seeded(rng) => rng.random::<f64>(),
        };
        self.draws += 1;
        trace!("[RNG] Consumed {} for: {}", outcome, reason);
        outcome
    }

    /// Uniform index in `0..len`. Collections of one element do not draw.
    pub fn next_index(&mut self, len: usize, reason: &str) -> usize {
        if len <= 1 {
            return 0;
        }
        let unit = self.next_unit(reason);
        ((unit * len as f64) as usize).min(len - 1)
    }

    /// Bernoulli trial: true with probability `chance`.
    pub fn chance(&mut self, chance: f64, reason: &str) -> bool {
        self.next_unit(reason) < chance
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> usize {
        self.draws
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleState {
    pub battle_id: String,
    pub owner: OwnerId,
    /// Team order at battle start.
    pub party: Vec<InstanceId>,
    pub active_index: usize,
    pub player: Combatant,
    pub enemy: Combatant,
    pub phase: BattlePhase,
    pub turn_number: u32,
}

impl BattleState {
    pub fn new(
        battle_id: String,
        owner: OwnerId,
        party: Vec<InstanceId>,
        active_index: usize,
        player: Combatant,
        enemy: Combatant,
    ) -> Self {
        Self {
            battle_id,
            owner,
            party,
            active_index,
            player,
            enemy,
            phase: BattlePhase::Engaging,
            turn_number: 0,
        }
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::Player => &self.player,
            Side::Wild => &self.enemy,
        }
    }

    pub fn combatant_mut(&mut self, side: Side) -> &mut Combatant {
        match side {
            Side::Player => &mut self.player,
            Side::Wild => &mut self.enemy,
        }
    }

    pub fn active_instance(&self) -> Option<InstanceId> {
        self.party.get(self.active_index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_effectiveness_narration() {
        let text = |multiplier| BattleEvent::AttackTypeEffectiveness { multiplier }.format();
        assert_eq!(text(0.0), Some("It had no effect.".to_string()));
        assert_eq!(text(4.0), Some("It's super effective!".to_string()));
        assert_eq!(text(2.0), Some("It's super effective!".to_string()));
        assert_eq!(text(0.25), Some("It's not very effective...".to_string()));
        assert_eq!(text(1.0), None);
    }

    #[test]
    fn test_stage_narration() {
        let event = BattleEvent::StatStageChanged {
            side: Side::Player,
            target: "charmander".to_string(),
            stat: StatType::Attack,
            delta: 2,
            new_stage: 2,
        };
        assert_eq!(
            event.format(),
            Some("Charmander's Attack sharply rose!".to_string())
        );
        let event = BattleEvent::StatStageChanged {
            side: Side::Wild,
            target: "pidgey".to_string(),
            stat: StatType::Defense,
            delta: -1,
            new_stage: -1,
        };
        assert_eq!(event.format(), Some("Wild Pidgey's Defense fell!".to_string()));
    }

    #[test]
    fn test_name_formatting() {
        assert_eq!(BattleEvent::format_creature_name("mr-mime"), "Mr Mime");
        assert_eq!(BattleEvent::format_move_name("swords-dance"), "Swords Dance");
        let event = BattleEvent::MoveUsed {
            side: Side::Wild,
            creature: "rattata".to_string(),
            move_name: "quick-attack".to_string(),
        };
        assert_eq!(event.format(), Some("Wild Rattata used Quick Attack!".to_string()));
    }

    #[test]
    fn test_event_bus_narration_skips_silent_events() {
        let mut bus = EventBus::new();
        bus.push(BattleEvent::TurnStarted { turn_number: 1 });
        bus.push(BattleEvent::StatusMoveHadEffect);
        bus.push(BattleEvent::AttackTypeEffectiveness { multiplier: 1.0 });
        assert_eq!(bus.len(), 3);
        assert_eq!(bus.narration(), vec!["It had an effect!".to_string()]);
    }

    #[test]
    fn test_phase_guards() {
        assert!(BattlePhase::Defeat.is_terminal());
        assert!(BattlePhase::Victory(VictoryKind::Captured).is_terminal());
        assert!(!BattlePhase::ForcedSwitch.is_terminal());
        assert_eq!(BattlePhase::PlayerTurn.ensure_player_turn(), Ok(()));
        assert_eq!(
            BattlePhase::Victory(VictoryKind::Knockout).ensure_player_turn(),
            Err(ActionError::BattleOver)
        );
        assert_eq!(
            BattlePhase::ForcedSwitch.ensure_player_turn(),
            Err(ActionError::SwitchRequired)
        );
        assert_eq!(
            BattlePhase::EnemyTurn.ensure_player_turn(),
            Err(ActionError::NotPlayerTurn)
        );
    }

    #[test]
    fn test_scripted_rng_counts_draws() {
        let mut rng = TurnRng::new_for_test(vec![0.1, 0.9, 0.5]);
        assert_eq!(rng.next_unit("first"), 0.1);
        assert!(!rng.chance(0.5, "second"));
        assert_eq!(rng.next_index(4, "third"), 2);
        assert_eq!(rng.next_index(1, "single"), 0);
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    #[should_panic(expected = "TurnRng exhausted")]
    fn test_scripted_rng_panics_when_exhausted() {
        let mut rng = TurnRng::new_for_test(vec![]);
        rng.next_unit("nothing left");
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = TurnRng::from_seed(7);
        let mut b = TurnRng::from_seed(7);
        for _ in 0..10 {
            let x = a.next_unit("a");
            assert_eq!(x, b.next_unit("b"));
            assert!((0.0..1.0).contains(&x));
        }
    }
}
