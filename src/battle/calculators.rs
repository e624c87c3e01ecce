use crate::battle::commands::BattleCommand;
use crate::battle::move_classifier::{classify, MoveKind};
use crate::battle::state::{BattleEvent, BattleState, Side, TurnRng};
use crate::provider::cache::ResolvedMove;
use log::debug;
use schema::{MoveTarget, PokemonType};

pub const STAB_MULTIPLIER: f64 = 1.5;
pub const MIN_RANDOM_FACTOR: f64 = 0.85;

/// Everything the damage formula needs for one move use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageInput<'a> {
    pub level: u8,
    pub attack: f64,
    pub defense: f64,
    pub power: u16,
    pub move_type: PokemonType,
    pub attacker_types: &'a [PokemonType],
    pub defender_types: &'a [PokemonType],
    /// Uniform in [0.85, 1.0).
    pub random_factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub damage: u16,
    pub effectiveness: f64,
    pub stab: bool,
}

/// Map a unit draw in [0, 1) onto the damage random factor.
pub fn random_factor_from_unit(unit: f64) -> f64 {
    MIN_RANDOM_FACTOR + unit.clamp(0.0, 1.0) * (1.0 - MIN_RANDOM_FACTOR)
}

/// Damage for a single move use. Intermediate values stay fractional; the
/// result is floored once and is never below 1, even for immune defenders.
pub fn calculate_damage(input: &DamageInput) -> DamageOutcome {
    let level = f64::from(input.level);
    let base = ((2.0 * level / 5.0 + 2.0)
        * f64::from(input.power)
        * (input.attack / input.defense.max(1.0))
        / 50.0)
        + 2.0;
    let stab = input.attacker_types.contains(&input.move_type);
    let stab_multiplier = if stab { STAB_MULTIPLIER } else { 1.0 };
    let effectiveness = PokemonType::effectiveness_against(input.move_type, input.defender_types);

    let raw = (base * stab_multiplier * effectiveness * input.random_factor).max(1.0);
    DamageOutcome {
        damage: raw.floor().min(f64::from(u16::MAX)) as u16,
        effectiveness,
        stab,
    }
}

/// Commands for `attacker` using `used`. Only the player's side spends PP.
pub fn calculate_attack_outcome(
    state: &BattleState,
    attacker: Side,
    used: &ResolvedMove,
    rng: &mut TurnRng,
) -> Vec<BattleCommand> {
    let user = state.combatant(attacker);
    let defender_side = attacker.opponent();
    let defender = state.combatant(defender_side);

    let mut commands = vec![BattleCommand::EmitEvent(BattleEvent::MoveUsed {
        side: attacker,
        creature: user.name().to_string(),
        move_name: used.name.clone(),
    })];
    if attacker == Side::Player {
        commands.push(BattleCommand::ConsumePp {
            side: attacker,
            move_name: used.name.clone(),
        });
    }

    match classify(&used.name) {
        MoveKind::Status {
            effect: Some(effect),
        } => {
            let target = match effect.target {
                MoveTarget::User => attacker,
                MoveTarget::Opponent => defender_side,
            };
            commands.push(BattleCommand::ChangeStatStage {
                target,
                stat: effect.stat,
                delta: effect.stages,
            });
        }
        MoveKind::Status { effect: None } => {
            commands.push(BattleCommand::EmitEvent(BattleEvent::StatusMoveHadEffect));
        }
        MoveKind::Damage => {
            let random_factor = random_factor_from_unit(rng.next_unit("damage roll"));
            let outcome = calculate_damage(&DamageInput {
                level: user.level,
                attack: user.effective_attack(),
                defense: defender.effective_defense(),
                power: used.power,
                move_type: used.move_type,
                attacker_types: user.types(),
                defender_types: defender.types(),
                random_factor,
            });
            debug!(
                "{} used {} on {}: {} damage (x{} effectiveness, stab {})",
                user.name(),
                used.name,
                defender.name(),
                outcome.damage,
                outcome.effectiveness,
                outcome.stab
            );
            commands.push(BattleCommand::DealDamage {
                target: defender_side,
                amount: outcome.damage,
            });
            if outcome.effectiveness != 1.0 {
                commands.push(BattleCommand::EmitEvent(BattleEvent::AttackTypeEffectiveness {
                    multiplier: outcome.effectiveness,
                }));
            }
        }
    }
    commands
}
