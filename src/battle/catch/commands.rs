use super::calculation::{mini_game_chance, quick_throw_chance, roll_shakes, CatchAttempt};
use crate::battle::commands::BattleCommand;
use crate::battle::state::{BattleEvent, BattlePhase, BattleState, TurnRng, VictoryKind};
use crate::config::BattleConfig;
use crate::inventory::BallKind;
use log::debug;

/// Commands for one throw at the wild creature. `power` is the mini-game
/// result in [0, 100]; `None` is a quick throw.
///
/// Validation must already have passed: the ball is consumed before the draw.
pub fn resolve_throw(
    state: &BattleState,
    ball: BallKind,
    power: Option<u8>,
    config: &BattleConfig,
    rng: &mut TurnRng,
) -> (Vec<BattleCommand>, CatchAttempt) {
    let target = &state.enemy;
    let chance = match power {
        Some(power) => mini_game_chance(
            target.current_hp,
            target.max_hp,
            target.creature.catch_rate.unwrap_or(config.default_catch_rate),
            ball.modifier(),
            power,
            &config.catch,
        ),
        None => quick_throw_chance(
            target.current_hp,
            target.max_hp,
            ball.modifier(),
            &config.catch,
        ),
    };

    let mut commands = vec![
        BattleCommand::ConsumeBall(ball),
        BattleCommand::EmitEvent(BattleEvent::BallThrown { ball }),
    ];

    let success = rng.chance(chance, "catch roll");
    let shakes = roll_shakes(success, rng);
    debug!(
        "Threw {} at {}: chance {:.3}, success {}, {} shakes",
        ball,
        target.name(),
        chance,
        success,
        shakes
    );

    if success {
        commands.push(BattleCommand::CaptureTarget { ball });
        commands.push(BattleCommand::EmitEvent(BattleEvent::CaptureSucceeded {
            creature: target.name().to_string(),
            ball,
        }));
        commands.push(BattleCommand::SetPhase(BattlePhase::Victory(VictoryKind::Captured)));
        commands.push(BattleCommand::EmitEvent(BattleEvent::BattleWon {
            kind: VictoryKind::Captured,
        }));
    } else {
        commands.push(BattleCommand::EmitEvent(BattleEvent::CaptureFailed {
            creature: target.name().to_string(),
            shakes,
        }));
    }

    (
        commands,
        CatchAttempt {
            chance,
            success,
            shakes,
        },
    )
}
