use crate::battle::ai::EnemyBehavior;
use crate::battle::combatant::Combatant;
use crate::battle::engine::BattleSession;
use crate::battle::state::TurnRng;
use crate::config::BattleConfig;
use crate::errors::{ProviderError, ProviderResult};
use crate::provider::cache::ResolvedMove;
use crate::provider::{CreatureDataProvider, CreatureKey, InMemoryCreatureProvider};
use crate::roster::{
    build_record, InstanceId, MemoryRosterStore, OwnerId, RosterStore,
};
use schema::{
    BaseStats, Creature, EvolutionDetail, EvolutionNode, EvolutionTrigger, LearnableMove,
    MoveMetadata, PokemonType,
};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;

/// A builder for test creatures with neutral defaults.
///
/// # Example
/// ```ignore
/// let creature = TestCreatureBuilder::new(16, "pidgey")
///     .with_types(vec![PokemonType::Normal, PokemonType::Flying])
///     .with_stats(40, 45, 40, 56)
///     .with_move("tackle", 1)
///     .build();
/// ```
pub struct TestCreatureBuilder {
    creature: Creature,
}

impl TestCreatureBuilder {
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            creature: Creature {
                id,
                name: name.to_string(),
                types: vec![PokemonType::Normal],
                base_stats: BaseStats {
                    hp: 50,
                    attack: 50,
                    defense: 50,
                    sp_attack: 50,
                    sp_defense: 50,
                    speed: 50,
                },
                base_exp: 50,
                catch_rate: None,
                level_up_moves: Vec::new(),
            },
        }
    }

    pub fn with_types(mut self, types: Vec<PokemonType>) -> Self {
        self.creature.types = types;
        self
    }

    /// hp, attack, defense, speed
    pub fn with_stats(mut self, hp: u16, attack: u16, defense: u16, speed: u16) -> Self {
        self.creature.base_stats.hp = hp;
        self.creature.base_stats.attack = attack;
        self.creature.base_stats.defense = defense;
        self.creature.base_stats.speed = speed;
        self
    }

    pub fn with_base_exp(mut self, base_exp: u32) -> Self {
        self.creature.base_exp = base_exp;
        self
    }

    pub fn with_catch_rate(mut self, catch_rate: u8) -> Self {
        self.creature.catch_rate = Some(catch_rate);
        self
    }

    pub fn with_move(mut self, name: &str, level: u8) -> Self {
        self.creature.level_up_moves.push(LearnableMove {
            name: name.to_string(),
            level,
        });
        self
    }

    pub fn build(self) -> Creature {
        self.creature
    }
}

fn metadata(name: &str, move_type: PokemonType, power: Option<u16>, pp: u8) -> MoveMetadata {
    MoveMetadata {
        name: name.to_string(),
        move_type,
        power,
        accuracy: Some(100),
        pp: Some(pp),
        damage_class: None,
    }
}

fn level_node(species: &str, min_level: u8, evolves_to: Vec<EvolutionNode>) -> EvolutionNode {
    EvolutionNode {
        species: species.to_string(),
        details: vec![EvolutionDetail {
            trigger: EvolutionTrigger::LevelUp,
            min_level: Some(min_level),
            item: None,
        }],
        evolves_to,
    }
}

fn root_node(species: &str, evolves_to: Vec<EvolutionNode>) -> EvolutionNode {
    EvolutionNode {
        species: species.to_string(),
        details: Vec::new(),
        evolves_to,
    }
}

/// A small fixed dataset covering two evolution lines and a few wild creatures.
pub fn test_dataset() -> InMemoryCreatureProvider {
    use PokemonType::*;
    let mut provider = InMemoryCreatureProvider::new();

    provider.insert_creature(
        TestCreatureBuilder::new(1, "bulbasaur")
            .with_types(vec![Grass, Poison])
            .with_stats(45, 49, 49, 45)
            .with_base_exp(64)
            .with_catch_rate(45)
            .with_move("tackle", 1)
            .with_move("growl", 1)
            .with_move("vine-whip", 3)
            .with_move("swords-dance", 6)
            .with_move("leech-seed", 9)
            .with_move("razor-leaf", 12)
            .build(),
    );
    provider.insert_creature(
        TestCreatureBuilder::new(2, "ivysaur")
            .with_types(vec![Grass, Poison])
            .with_stats(60, 62, 63, 60)
            .with_base_exp(142)
            .with_move("tackle", 1)
            .with_move("razor-leaf", 12)
            .build(),
    );
    provider.insert_creature(
        TestCreatureBuilder::new(4, "charmander")
            .with_types(vec![Fire])
            .with_stats(39, 52, 43, 65)
            .with_base_exp(62)
            .with_catch_rate(45)
            .with_move("scratch", 1)
            .with_move("growl", 1)
            .with_move("ember", 7)
            .build(),
    );
    provider.insert_creature(
        TestCreatureBuilder::new(16, "pidgey")
            .with_types(vec![Normal, Flying])
            .with_stats(40, 45, 40, 56)
            .with_base_exp(50)
            .with_catch_rate(255)
            .with_move("tackle", 1)
            .with_move("gust", 9)
            .build(),
    );
    provider.insert_creature(
        TestCreatureBuilder::new(19, "rattata")
            .with_types(vec![Normal])
            .with_stats(30, 56, 35, 72)
            .with_base_exp(51)
            .with_catch_rate(255)
            .with_move("tackle", 1)
            .with_move("tail-whip", 1)
            .build(),
    );
    provider.insert_creature(
        TestCreatureBuilder::new(92, "gastly")
            .with_types(vec![Ghost, Poison])
            .with_stats(30, 35, 30, 80)
            .with_base_exp(62)
            .with_catch_rate(190)
            .with_move("lick", 1)
            .build(),
    );

    for (name, move_type, power, pp) in [
        ("tackle", Normal, Some(40), 35),
        ("scratch", Normal, Some(40), 35),
        ("growl", Normal, None, 40),
        ("tail-whip", Normal, None, 30),
        ("swords-dance", Normal, None, 20),
        ("vine-whip", Grass, Some(45), 25),
        ("razor-leaf", Grass, Some(55), 25),
        ("leech-seed", Grass, None, 10),
        ("ember", Fire, Some(40), 25),
        ("gust", Flying, Some(40), 35),
        ("lick", Ghost, Some(30), 30),
    ] {
        provider.insert_move(metadata(name, move_type, power, pp));
    }

    provider.insert_evolution_graph(
        1,
        root_node("bulbasaur", vec![level_node("ivysaur", 16, vec![])]),
    );
    provider.link_species_to_graph(1, 1);
    provider.link_species_to_graph(2, 1);
    provider.insert_evolution_graph(2, root_node("charmander", vec![]));
    provider.link_species_to_graph(4, 2);
    provider
}

/// Provider wrapper that counts move lookups and can fail them on demand.
pub struct TestProvider {
    pub inner: InMemoryCreatureProvider,
    pub unavailable_moves: RefCell<HashSet<String>>,
    pub move_lookups: Cell<usize>,
}

impl TestProvider {
    pub fn new() -> Self {
        Self {
            inner: test_dataset(),
            unavailable_moves: RefCell::new(HashSet::new()),
            move_lookups: Cell::new(0),
        }
    }

    pub fn fail_move(&self, name: &str) {
        self.unavailable_moves.borrow_mut().insert(name.to_string());
    }

    pub fn restore_move(&self, name: &str) {
        self.unavailable_moves.borrow_mut().remove(name);
    }

    pub fn creature(&self, name: &str) -> Creature {
        match self.inner.get_creature(&CreatureKey::from(name)) {
            Ok(creature) => creature,
            Err(err) => panic!("test dataset is missing {}: {}", name, err),
        }
    }
}

impl CreatureDataProvider for TestProvider {
    fn get_creature(&self, key: &CreatureKey) -> ProviderResult<Creature> {
        self.inner.get_creature(key)
    }

    fn get_move_metadata(&self, name: &str) -> ProviderResult<MoveMetadata> {
        self.move_lookups.set(self.move_lookups.get() + 1);
        if self.unavailable_moves.borrow().contains(name) {
            return Err(ProviderError::Unavailable(format!("move {}", name)));
        }
        self.inner.get_move_metadata(name)
    }

    fn get_evolution_graph(&self, graph_id: u32) -> ProviderResult<EvolutionNode> {
        self.inner.get_evolution_graph(graph_id)
    }

    fn get_species_evolution_graph_id(&self, species_id: u32) -> ProviderResult<u32> {
        self.inner.get_species_evolution_graph_id(species_id)
    }

    fn get_random_creatures(
        &self,
        count: usize,
        rng: &mut TurnRng,
    ) -> ProviderResult<Vec<Creature>> {
        self.inner.get_random_creatures(count, rng)
    }
}

/// Opponent that always uses its first move, so no draw is spent choosing.
pub struct FirstMoveBehavior;

impl EnemyBehavior for FirstMoveBehavior {
    fn choose_move(
        &self,
        _options: &[ResolvedMove],
        _user: &Combatant,
        _target: &Combatant,
        _rng: &mut TurnRng,
    ) -> usize {
        0
    }
}

pub fn owner() -> OwnerId {
    OwnerId::from("red")
}

pub fn predictable_rng(values: &[f64]) -> TurnRng {
    TurnRng::new_for_test(values.to_vec())
}

/// Add a team member at `level`, optionally at a given HP.
pub fn add_member(
    store: &mut MemoryRosterStore,
    provider: &TestProvider,
    name: &str,
    level: u8,
    hp: Option<u16>,
) -> InstanceId {
    let creature = provider.creature(name);
    let config = BattleConfig::default();
    let record = build_record(provider, &creature, level, &config);
    let max_hp = record.max_hp();
    let id = store.insert_record(&owner(), record);
    if let Some(hp) = hp {
        store
            .set_hp(&owner(), id, hp, max_hp)
            .unwrap_or_else(|err| panic!("set_hp failed: {}", err));
    }
    store
        .add_to_team(&owner(), id)
        .unwrap_or_else(|err| panic!("add_to_team failed: {}", err));
    id
}

/// Start a battle against `wild` with the first-move opponent.
pub fn start_battle<'a>(
    provider: &'a TestProvider,
    store: &'a mut MemoryRosterStore,
    config: &'a BattleConfig,
    wild: &str,
    wild_level: u8,
    rng: TurnRng,
) -> BattleSession<'a> {
    match BattleSession::start(
        provider,
        store,
        config,
        owner(),
        &CreatureKey::from(wild),
        wild_level,
        rng,
    ) {
        Ok(session) => session.with_behavior(Box::new(FirstMoveBehavior)),
        Err(err) => panic!("failed to start battle: {}", err),
    }
}
