use crate::battle::combatant::Combatant;
use crate::battle::state::{BattleEvent, BattlePhase, BattleState, EventBus, Side};
use crate::battle::stats::apply_stage_delta;
use crate::config::BattleConfig;
use crate::errors::ProviderError;
use crate::inventory::{BallGrant, BallKind};
use crate::provider::{CreatureDataProvider, CreatureKey, MoveCache};
use crate::roster::{KnownMove, MovePp, OwnerId, RosterRecord, RosterStore, MAX_TEAM_SIZE};
use log::{debug, info, warn};
use schema::StatType;
use thiserror::Error;

/// Atomic state changes. Calculators produce these; only
/// [`execute_command_batch`] applies them.
#[derive(Debug, Clone, PartialEq)]
pub enum BattleCommand {
    DealDamage {
        target: Side,
        amount: u16,
    },
    ChangeStatStage {
        target: Side,
        stat: StatType,
        delta: i8,
    },
    ConsumePp {
        side: Side,
        move_name: String,
    },
    SwitchActive {
        party_index: usize,
    },
    SetPhase(BattlePhase),
    IncrementTurnNumber,
    ConsumeBall(BallKind),
    /// Turn the wild creature into a roster record tagged with `ball`.
    CaptureTarget {
        ball: BallKind,
    },
    GrantBalls(Vec<BallGrant>),
    EmitEvent(BattleEvent),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutionError {
    #[error("no party member at slot {0}")]
    NoPartyMember(usize),
    #[error("roster record for slot {0} is missing")]
    MissingRecord(usize),
    #[error("creature lookup failed: {0}")]
    CreatureLookup(#[from] ProviderError),
}

/// Collaborators a command batch may write through to.
pub struct CommandContext<'a> {
    pub provider: &'a dyn CreatureDataProvider,
    pub store: &'a mut dyn RosterStore,
    pub cache: &'a mut MoveCache,
    pub config: &'a BattleConfig,
}

/// Execute a batch of commands in order. Roster writes happen as each
/// command is applied; a failed write is logged and the battle continues.
pub fn execute_command_batch(
    commands: Vec<BattleCommand>,
    state: &mut BattleState,
    bus: &mut EventBus,
    ctx: &mut CommandContext<'_>,
) -> Result<(), ExecutionError> {
    for command in commands {
        execute_command(command, state, bus, ctx)?;
    }
    Ok(())
}

fn execute_command(
    command: BattleCommand,
    state: &mut BattleState,
    bus: &mut EventBus,
    ctx: &mut CommandContext<'_>,
) -> Result<(), ExecutionError> {
    match command {
        BattleCommand::DealDamage { target, amount } => {
            let combatant = state.combatant_mut(target);
            let remaining_hp = combatant.take_damage(amount);
            debug!("{} took {} damage ({} left)", combatant.name(), amount, remaining_hp);
            bus.push(BattleEvent::DamageDealt {
                side: target,
                target: combatant.name().to_string(),
                damage: amount,
                remaining_hp,
            });
            if target == Side::Player {
                persist_player_hp(state, ctx);
            }
        }
        BattleCommand::ChangeStatStage {
            target,
            stat,
            delta,
        } => {
            let combatant = state.combatant_mut(target);
            let old_stage = combatant.stage(stat);
            let new_stage = apply_stage_delta(old_stage, delta);
            let name = combatant.name().to_string();
            if new_stage == old_stage {
                bus.push(BattleEvent::StatStageUnchanged {
                    side: target,
                    target: name,
                    stat,
                    rising: delta > 0,
                });
            } else {
                combatant.set_stage(stat, new_stage);
                bus.push(BattleEvent::StatStageChanged {
                    side: target,
                    target: name,
                    stat,
                    delta,
                    new_stage,
                });
            }
        }
        BattleCommand::ConsumePp { side, move_name } => {
            let combatant = state.combatant_mut(side);
            if !combatant.consume_pp(&move_name) {
                warn!("{} does not know {}; no PP consumed", combatant.name(), move_name);
            } else if let (Side::Player, Some(id)) = (side, combatant.instance_id) {
                if let Err(err) = ctx.store.decrement_pp(&state.owner, id, &move_name) {
                    warn!("Failed to persist PP for {}: {}", move_name, err);
                }
            }
        }
        BattleCommand::SwitchActive { party_index } => {
            let incoming = build_party_combatant(state, party_index, ctx)?;
            let event = if state.player.is_fainted() {
                BattleEvent::SentOut {
                    creature: incoming.name().to_string(),
                }
            } else {
                BattleEvent::CreatureSwitched {
                    old_creature: state.player.name().to_string(),
                    new_creature: incoming.name().to_string(),
                }
            };
            state.player = incoming;
            state.active_index = party_index;
            bus.push(event);
        }
        BattleCommand::SetPhase(phase) => {
            debug!("Battle {} phase {:?} -> {:?}", state.battle_id, state.phase, phase);
            state.phase = phase;
        }
        BattleCommand::IncrementTurnNumber => {
            state.turn_number += 1;
            bus.push(BattleEvent::TurnStarted {
                turn_number: state.turn_number,
            });
        }
        BattleCommand::ConsumeBall(ball) => {
            match ctx.store.decrement_balls(&state.owner, ball, 1) {
                Ok(true) => {}
                Ok(false) => warn!("No {} left to consume", ball),
                Err(err) => warn!("Failed to consume {}: {}", ball, err),
            }
        }
        BattleCommand::CaptureTarget { ball } => capture_enemy(state, ball, ctx),
        BattleCommand::GrantBalls(grants) => {
            if let Err(err) = ctx.store.grant_balls(&state.owner, &grants) {
                warn!("Failed to grant balls: {}", err);
                return Ok(());
            }
            for grant in grants.into_iter().filter(|g| !g.ball.is_unlimited()) {
                bus.push(BattleEvent::BallsGranted {
                    ball: grant.ball,
                    quantity: grant.quantity,
                });
            }
        }
        BattleCommand::EmitEvent(event) => bus.push(event),
    }
    Ok(())
}

fn persist_player_hp(state: &BattleState, ctx: &mut CommandContext<'_>) {
    if let Some(id) = state.player.instance_id {
        if let Err(err) =
            ctx.store
                .set_hp(&state.owner, id, state.player.current_hp, state.player.max_hp)
        {
            warn!("Failed to persist HP for {}: {}", state.player.name(), err);
        }
    }
}

/// Build a fresh combatant for the party member at `party_index`.
pub fn build_party_combatant(
    state: &BattleState,
    party_index: usize,
    ctx: &mut CommandContext<'_>,
) -> Result<Combatant, ExecutionError> {
    let id = *state
        .party
        .get(party_index)
        .ok_or(ExecutionError::NoPartyMember(party_index))?;
    let record = ctx
        .store
        .get_record(&state.owner, id)
        .ok_or(ExecutionError::MissingRecord(party_index))?;
    let creature = ctx
        .provider
        .get_creature(&CreatureKey::Id(record.species_id()))?;
    let combatant = Combatant::from_record(
        id,
        creature,
        &record,
        ctx.provider,
        ctx.cache,
        ctx.config,
    );
    persist_default_moves(&mut *ctx.store, &state.owner, &record, &combatant);
    Ok(combatant)
}

/// A record that knows no moves takes the defaults its combatant was built
/// with, so PP written during the battle lands on the record.
pub(crate) fn persist_default_moves(
    store: &mut dyn RosterStore,
    owner: &OwnerId,
    record: &RosterRecord,
    combatant: &Combatant,
) {
    let Some(id) = combatant.instance_id else {
        return;
    };
    if !record.moves().is_empty() {
        return;
    }
    for active in &combatant.moves {
        if let Err(err) = store.learn_move(owner, id, &active.name, active.max_pp) {
            warn!("Failed to save default move {} for {}: {}", active.name, id, err);
        }
    }
}

fn capture_enemy(state: &BattleState, ball: BallKind, ctx: &mut CommandContext<'_>) {
    let enemy = &state.enemy;
    let moves = enemy
        .moves
        .iter()
        .map(|active| KnownMove {
            name: active.name.clone(),
            pp: MovePp::full(active.max_pp),
        })
        .collect();
    let record = RosterRecord::new(
        enemy.creature.id,
        enemy.creature.name.clone(),
        enemy.level,
        enemy.max_hp,
        moves,
    )
    .with_ball(ball);
    let id = ctx.store.insert_record(&state.owner, record);
    if ctx.store.team(&state.owner).len() < MAX_TEAM_SIZE {
        if let Err(err) = ctx.store.add_to_team(&state.owner, id) {
            warn!("Caught {} but could not add it to the team: {}", enemy.name(), err);
        }
    }
    info!("{} caught {} ({}) with a {}", state.owner, enemy.name(), id, ball);
}
