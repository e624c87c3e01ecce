//! The battle session: validates caller actions and resolves each one
//! completely, including the wild creature's counter-move.

use crate::battle::ai::{behavior_for, EnemyBehavior};
use crate::battle::calculators::calculate_attack_outcome;
use crate::battle::catch::{resolve_throw, validate_throw, CatchAttempt};
use crate::battle::combatant::Combatant;
use crate::battle::commands::{
    build_party_combatant, execute_command_batch, persist_default_moves, BattleCommand,
    CommandContext,
};
use crate::battle::state::{
    BattleEvent, BattlePhase, BattleState, EventBus, Side, TurnRng, VictoryKind,
};
use crate::config::BattleConfig;
use crate::errors::{ActionError, BattleEngineError, BattleResult, ProviderError};
use crate::inventory::{BallGrant, BallKind};
use crate::progression::{ProgressionEngine, ProgressionReport};
use crate::provider::cache::ResolvedMove;
use crate::provider::{CreatureDataProvider, CreatureKey, MoveCache};
use crate::roster::{OwnerId, RosterStore};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_BATTLE_ID: AtomicU64 = AtomicU64::new(1);

/// Complete result of one caller action, in the order things happened.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub events: Vec<BattleEvent>,
    pub phase: BattlePhase,
    pub catch: Option<CatchAttempt>,
    pub progression: Option<ProgressionReport>,
    pub rewards: Vec<BallGrant>,
}

impl ActionOutcome {
    pub fn narration(&self) -> Vec<String> {
        self.events.iter().filter_map(BattleEvent::format).collect()
    }
}

pub struct BattleSession<'a> {
    provider: &'a dyn CreatureDataProvider,
    store: &'a mut dyn RosterStore,
    config: &'a BattleConfig,
    behavior: Box<dyn EnemyBehavior>,
    rng: TurnRng,
    cache: MoveCache,
    state: BattleState,
    opening_events: Vec<BattleEvent>,
    pub(crate) busy: bool,
}

impl<'a> BattleSession<'a> {
    /// Start a battle against `wild` at `wild_level`, sending out the first
    /// team member that can still fight.
    pub fn start(
        provider: &'a dyn CreatureDataProvider,
        store: &'a mut dyn RosterStore,
        config: &'a BattleConfig,
        owner: OwnerId,
        wild: &CreatureKey,
        wild_level: u8,
        rng: TurnRng,
    ) -> BattleResult<Self> {
        let creature = provider.get_creature(wild).map_err(|err| match err {
            ProviderError::NotFound(_) => BattleEngineError::CreatureNotFound(wild.to_string()),
            other => BattleEngineError::Provider(other),
        })?;
        Self::start_against(provider, store, config, owner, creature, wild_level, rng)
    }

    /// Start a battle against a randomly chosen creature.
    pub fn start_random(
        provider: &'a dyn CreatureDataProvider,
        store: &'a mut dyn RosterStore,
        config: &'a BattleConfig,
        owner: OwnerId,
        wild_level: u8,
        mut rng: TurnRng,
    ) -> BattleResult<Self> {
        let creature = provider
            .get_random_creatures(1, &mut rng)
            .map_err(|err| match err {
                ProviderError::NotFound(_) => {
                    BattleEngineError::CreatureNotFound("random creature".to_string())
                }
                other => BattleEngineError::Provider(other),
            })?
            .into_iter()
            .next()
            .ok_or_else(|| BattleEngineError::CreatureNotFound("random creature".to_string()))?;
        Self::start_against(provider, store, config, owner, creature, wild_level, rng)
    }

    fn start_against(
        provider: &'a dyn CreatureDataProvider,
        store: &'a mut dyn RosterStore,
        config: &'a BattleConfig,
        owner: OwnerId,
        wild: schema::Creature,
        wild_level: u8,
        rng: TurnRng,
    ) -> BattleResult<Self> {
        let party = store.team(&owner);
        let active_index = party
            .iter()
            .position(|id| {
                store
                    .get_record(&owner, *id)
                    .is_some_and(|record| !record.is_fainted())
            })
            .ok_or_else(|| BattleEngineError::NoUsableCreatures(owner.clone()))?;

        let mut cache = MoveCache::new();
        let active_id = party[active_index];
        let record = store
            .get_record(&owner, active_id)
            .ok_or_else(|| BattleEngineError::NoUsableCreatures(owner.clone()))?;
        let active_creature = provider.get_creature(&CreatureKey::Id(record.species_id()))?;
        let player =
            Combatant::from_record(active_id, active_creature, &record, provider, &mut cache, config);
        persist_default_moves(&mut *store, &owner, &record, &player);
        let enemy = Combatant::wild(wild, wild_level, provider, &mut cache, config);

        let battle_id = format!(
            "{}-{}",
            owner,
            NEXT_BATTLE_ID.fetch_add(1, Ordering::Relaxed)
        );
        info!(
            "Battle {} started: {} (Lv. {}) vs wild {} (Lv. {})",
            battle_id,
            player.name(),
            player.level,
            enemy.name(),
            enemy.level
        );
        let opening_events = vec![
            BattleEvent::BattleStarted {
                wild: enemy.name().to_string(),
                level: enemy.level,
            },
            BattleEvent::SentOut {
                creature: player.name().to_string(),
            },
        ];
        let mut state = BattleState::new(battle_id, owner, party, active_index, player, enemy);
        state.phase = BattlePhase::PlayerTurn;

        Ok(Self {
            provider,
            store,
            config,
            behavior: behavior_for(config.enemy_behavior),
            rng,
            cache,
            state,
            opening_events,
            busy: false,
        })
    }

    /// Replace the opponent's move selection.
    pub fn with_behavior(mut self, behavior: Box<dyn EnemyBehavior>) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn phase(&self) -> BattlePhase {
        self.state.phase
    }

    /// Read access to the roster the battle writes through to.
    pub fn store(&self) -> &dyn RosterStore {
        &*self.store
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn opening_events(&self) -> &[BattleEvent] {
        &self.opening_events
    }

    pub fn rng(&self) -> &TurnRng {
        &self.rng
    }

    pub fn move_cache(&self) -> &MoveCache {
        &self.cache
    }

    /// Use one of the active creature's moves.
    pub fn use_move(&mut self, move_name: &str) -> Result<ActionOutcome, ActionError> {
        self.run_action(|session| {
            session.validate_move(move_name)?;
            Ok(session.resolve_move_turn(move_name))
        })
    }

    /// Switch the active creature. During a forced switch the incoming
    /// creature is not attacked; a voluntary switch gives the opponent a move.
    pub fn switch_to(&mut self, party_index: usize) -> Result<ActionOutcome, ActionError> {
        self.run_action(|session| {
            let forced = session.validate_switch(party_index)?;
            Ok(session.resolve_switch(party_index, forced))
        })
    }

    /// Throw a ball. `power` is the mini-game result in [0, 100]; `None`
    /// throws without the mini-game.
    pub fn throw_ball(
        &mut self,
        ball: BallKind,
        power: Option<u8>,
    ) -> Result<ActionOutcome, ActionError> {
        self.run_action(|session| {
            validate_throw(&session.state, &*session.store, ball)?;
            Ok(session.resolve_throw_turn(ball, power))
        })
    }

    fn run_action<F>(&mut self, action: F) -> Result<ActionOutcome, ActionError>
    where
        F: FnOnce(&mut Self) -> Result<ActionOutcome, ActionError>,
    {
        if self.busy {
            return Err(ActionError::Busy);
        }
        self.busy = true;
        let result = action(self);
        self.busy = false;
        if let Err(err) = &result {
            debug!("Action rejected in battle {}: {}", self.state.battle_id, err);
        }
        result
    }

    fn validate_move(&self, move_name: &str) -> Result<(), ActionError> {
        self.state.phase.ensure_player_turn()?;
        let active = self
            .state
            .player
            .find_move(move_name)
            .ok_or_else(|| ActionError::UnknownMove(move_name.to_string()))?;
        if active.pp == 0 {
            return Err(ActionError::NoPpRemaining(move_name.to_string()));
        }
        Ok(())
    }

    /// Returns true when this is a forced switch.
    fn validate_switch(&self, party_index: usize) -> Result<bool, ActionError> {
        if self.state.phase.is_terminal() {
            return Err(ActionError::BattleOver);
        }
        let forced = match self.state.phase {
            BattlePhase::PlayerTurn => false,
            BattlePhase::ForcedSwitch => true,
            _ => return Err(ActionError::NotPlayerTurn),
        };
        let id = *self
            .state
            .party
            .get(party_index)
            .ok_or(ActionError::InvalidPartyIndex(party_index))?;
        let record = self
            .store
            .get_record(&self.state.owner, id)
            .ok_or(ActionError::InvalidPartyIndex(party_index))?;
        if record.is_fainted() {
            return Err(ActionError::TargetFainted(party_index));
        }
        if party_index == self.state.active_index {
            return Err(ActionError::AlreadyActive(party_index));
        }
        if let Err(err) = self
            .provider
            .get_creature(&CreatureKey::Id(record.species_id()))
        {
            warn!("Cannot switch to slot {}: {}", party_index, err);
            return Err(ActionError::InvalidPartyIndex(party_index));
        }
        Ok(forced)
    }

    fn resolve_move_turn(&mut self, move_name: &str) -> ActionOutcome {
        let mut bus = EventBus::new();
        self.execute(vec![BattleCommand::IncrementTurnNumber], &mut bus);

        let player_speed = self.state.player.speed();
        let enemy_speed = self.state.enemy.speed();
        let enemy_first = enemy_speed > player_speed;
        debug!(
            "Turn {}: player speed {}, enemy speed {}, enemy first: {}",
            self.state.turn_number, player_speed, enemy_speed, enemy_first
        );

        let mut outcome = ActionOutcome {
            events: Vec::new(),
            phase: self.state.phase,
            catch: None,
            progression: None,
            rewards: Vec::new(),
        };

        if enemy_first {
            self.enemy_attack(&mut bus);
            if !self.state.player.is_fainted() {
                self.player_attack(move_name, &mut bus);
                if self.state.enemy.is_fainted() {
                    self.handle_victory(&mut bus, &mut outcome);
                }
            }
        } else {
            self.player_attack(move_name, &mut bus);
            if self.state.enemy.is_fainted() {
                self.handle_victory(&mut bus, &mut outcome);
            } else {
                self.enemy_attack(&mut bus);
            }
        }
        self.finish_turn(bus, outcome)
    }

    fn resolve_switch(&mut self, party_index: usize, forced: bool) -> ActionOutcome {
        let mut bus = EventBus::new();
        if forced {
            self.execute(
                vec![
                    BattleCommand::SwitchActive { party_index },
                    BattleCommand::SetPhase(BattlePhase::PlayerTurn),
                ],
                &mut bus,
            );
        } else {
            self.execute(
                vec![
                    BattleCommand::IncrementTurnNumber,
                    BattleCommand::SwitchActive { party_index },
                ],
                &mut bus,
            );
            self.enemy_attack(&mut bus);
        }
        let outcome = ActionOutcome {
            events: Vec::new(),
            phase: self.state.phase,
            catch: None,
            progression: None,
            rewards: Vec::new(),
        };
        self.finish_turn(bus, outcome)
    }

    fn resolve_throw_turn(&mut self, ball: BallKind, power: Option<u8>) -> ActionOutcome {
        let mut bus = EventBus::new();
        self.execute(vec![BattleCommand::IncrementTurnNumber], &mut bus);
        let (commands, attempt) =
            resolve_throw(&self.state, ball, power, self.config, &mut self.rng);
        self.execute(commands, &mut bus);
        if !attempt.success {
            self.enemy_attack(&mut bus);
        }
        let outcome = ActionOutcome {
            events: Vec::new(),
            phase: self.state.phase,
            catch: Some(attempt),
            progression: None,
            rewards: Vec::new(),
        };
        self.finish_turn(bus, outcome)
    }

    /// Hand control back to the player unless the battle ended or a switch
    /// is required.
    fn finish_turn(&mut self, mut bus: EventBus, mut outcome: ActionOutcome) -> ActionOutcome {
        if matches!(
            self.state.phase,
            BattlePhase::EnemyTurn | BattlePhase::Engaging
        ) {
            self.execute(vec![BattleCommand::SetPhase(BattlePhase::PlayerTurn)], &mut bus);
        }
        outcome.phase = self.state.phase;
        outcome.events = bus.into_events();
        outcome
    }

    fn player_attack(&mut self, move_name: &str, bus: &mut EventBus) {
        let resolved = self.cache.resolve(
            self.provider,
            move_name,
            &self.state.player.creature,
            self.config,
        );
        let commands = calculate_attack_outcome(&self.state, Side::Player, &resolved, &mut self.rng);
        self.execute(commands, bus);
    }

    fn enemy_attack(&mut self, bus: &mut EventBus) {
        let options: Vec<ResolvedMove> = self
            .state
            .enemy
            .moves
            .iter()
            .map(|active| {
                self.cache.resolve(
                    self.provider,
                    &active.name,
                    &self.state.enemy.creature,
                    self.config,
                )
            })
            .collect();
        if options.is_empty() {
            warn!("{} has no moves to use", self.state.enemy.name());
            return;
        }
        self.execute(vec![BattleCommand::SetPhase(BattlePhase::EnemyTurn)], bus);
        let choice = self
            .behavior
            .choose_move(&options, &self.state.enemy, &self.state.player, &mut self.rng)
            .min(options.len() - 1);
        let commands =
            calculate_attack_outcome(&self.state, Side::Wild, &options[choice], &mut self.rng);
        self.execute(commands, bus);
        if self.state.player.is_fainted() {
            self.handle_player_faint(bus);
        } else {
            self.execute(vec![BattleCommand::SetPhase(BattlePhase::PlayerTurn)], bus);
        }
    }

    fn handle_player_faint(&mut self, bus: &mut EventBus) {
        let fainted = BattleEvent::CreatureFainted {
            side: Side::Player,
            creature: self.state.player.name().to_string(),
        };
        let commands = if self.has_healthy_reserve() {
            vec![
                BattleCommand::EmitEvent(fainted),
                BattleCommand::SetPhase(BattlePhase::ForcedSwitch),
                BattleCommand::EmitEvent(BattleEvent::SwitchRequired),
            ]
        } else {
            info!("Battle {} lost", self.state.battle_id);
            vec![
                BattleCommand::EmitEvent(fainted),
                BattleCommand::SetPhase(BattlePhase::Defeat),
                BattleCommand::EmitEvent(BattleEvent::BattleLost),
            ]
        };
        self.execute(commands, bus);
    }

    /// Any party member other than the active one with HP left.
    fn has_healthy_reserve(&self) -> bool {
        self.state
            .party
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != self.state.active_index)
            .any(|(_, id)| {
                self.store
                    .get_record(&self.state.owner, *id)
                    .is_some_and(|record| !record.is_fainted())
            })
    }

    fn handle_victory(&mut self, bus: &mut EventBus, outcome: &mut ActionOutcome) {
        self.execute(
            vec![
                BattleCommand::EmitEvent(BattleEvent::CreatureFainted {
                    side: Side::Wild,
                    creature: self.state.enemy.name().to_string(),
                }),
                BattleCommand::SetPhase(BattlePhase::Victory(VictoryKind::Knockout)),
            ],
            bus,
        );
        info!("Battle {} won by knockout", self.state.battle_id);

        let mut engine = ProgressionEngine::new(self.provider, self.config)
            .with_cache(std::mem::take(&mut self.cache));
        let progression = match self.state.active_instance() {
            Some(id) => {
                let amount = engine.experience_yield(&self.state.enemy.creature);
                Some(engine.award_experience(&mut *self.store, &self.state.owner, id, amount))
            }
            None => None,
        };
        let rewards = engine.roll_rewards(&mut self.rng);
        self.cache = engine.into_cache();

        match progression {
            Some(Ok(report)) => {
                for event in report.events() {
                    bus.push(event);
                }
                outcome.progression = Some(report);
                self.refresh_active();
            }
            Some(Err(err)) => warn!("Failed to award experience: {}", err),
            None => {}
        }

        let mut commands = Vec::new();
        if !rewards.is_empty() {
            commands.push(BattleCommand::GrantBalls(rewards.clone()));
        }
        commands.push(BattleCommand::EmitEvent(BattleEvent::BattleWon {
            kind: VictoryKind::Knockout,
        }));
        self.execute(commands, bus);
        outcome.rewards = rewards;
    }

    /// Rebuild the active combatant from its record after progression.
    fn refresh_active(&mut self) {
        let mut ctx = CommandContext {
            provider: self.provider,
            store: &mut *self.store,
            cache: &mut self.cache,
            config: self.config,
        };
        match build_party_combatant(&self.state, self.state.active_index, &mut ctx) {
            Ok(combatant) => self.state.player = combatant,
            Err(err) => warn!("Could not refresh the active creature: {}", err),
        }
    }

    fn execute(&mut self, commands: Vec<BattleCommand>, bus: &mut EventBus) {
        let mut ctx = CommandContext {
            provider: self.provider,
            store: &mut *self.store,
            cache: &mut self.cache,
            config: self.config,
        };
        if let Err(err) = execute_command_batch(commands, &mut self.state, bus, &mut ctx) {
            warn!("Command batch failed in battle {}: {}", self.state.battle_id, err);
        }
    }
}
