#[cfg(test)]
mod tests {
    use crate::battle::catch::{mini_game_chance, CatchAttempt};
    use crate::battle::state::{BattleEvent, BattlePhase, Side, VictoryKind};
    use crate::battle::tests::common::{
        add_member, owner, predictable_rng, start_battle, TestProvider,
    };
    use crate::config::BattleConfig;
    use crate::errors::ActionError;
    use crate::inventory::{BallCount, BallKind};
    use crate::roster::{MemoryRosterStore, RosterStore, MAX_TEAM_SIZE};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_throw_without_balls_changes_nothing() {
        let provider = TestProvider::new();
        let mut store = MemoryRosterStore::new(0);
        add_member(&mut store, &provider, "bulbasaur", 5, None);
        let config = BattleConfig::default();
        let mut session =
            start_battle(&provider, &mut store, &config, "pidgey", 3, predictable_rng(&[]));

        let result = session.throw_ball(BallKind::Great, Some(50));

        assert_eq!(result.err(), Some(ActionError::NoBallsRemaining(BallKind::Great)));
        assert_eq!(session.rng().draws(), 0);
        assert_eq!(session.state().turn_number, 0);
        assert_eq!(session.phase(), BattlePhase::PlayerTurn);
        let store = session.store();
        assert_eq!(store.ball_count(&owner(), BallKind::Great), Ok(BallCount::Limited(0)));
        assert_eq!(store.records(&owner()).len(), 1);
    }

    #[test]
    fn test_successful_capture_adds_a_full_hp_record() {
        let provider = TestProvider::new();
        let mut store = MemoryRosterStore::new(0);
        let bulbasaur = add_member(&mut store, &provider, "bulbasaur", 5, None);
        let config = BattleConfig::default();
        // Tackle turn (two damage rolls), then a catch roll that succeeds.
        let mut session = start_battle(
            &provider,
            &mut store,
            &config,
            "pidgey",
            3,
            predictable_rng(&[1.0, 1.0, 0.0]),
        );
        session
            .use_move("tackle")
            .unwrap_or_else(|err| panic!("tackle rejected: {}", err));
        assert_eq!(session.state().enemy.current_hp, 9);

        let outcome = session
            .throw_ball(BallKind::Poke, None)
            .unwrap_or_else(|err| panic!("throw rejected: {}", err));

        assert_eq!(
            outcome.events,
            vec![
                BattleEvent::TurnStarted { turn_number: 2 },
                BattleEvent::BallThrown {
                    ball: BallKind::Poke
                },
                BattleEvent::CaptureSucceeded {
                    creature: "pidgey".to_string(),
                    ball: BallKind::Poke,
                },
                BattleEvent::BattleWon {
                    kind: VictoryKind::Captured
                },
            ]
        );
        assert_eq!(outcome.phase, BattlePhase::Victory(VictoryKind::Captured));
        assert_eq!(outcome.progression, None);
        assert!(outcome.rewards.is_empty());
        let attempt = outcome.catch.unwrap_or_else(|| panic!("no catch attempt"));
        assert!(attempt.success);
        assert_eq!(attempt.shakes, 3);
        assert_eq!(session.rng().draws(), 3);

        let store = session.store();
        let records = store.records(&owner());
        assert_eq!(records.len(), 2);
        let (caught_id, caught) = &records[1];
        assert_eq!(caught.species(), "pidgey");
        assert_eq!(caught.level(), 3);
        assert_eq!(caught.current_hp(), 15);
        assert_eq!(caught.max_hp(), 15);
        assert_eq!(caught.experience(), 0);
        assert_eq!(caught.ball(), Some(BallKind::Poke));
        let moves: Vec<&str> = caught.moves().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(moves, vec!["tackle"]);
        assert_eq!(caught.move_pp("tackle").map(|pp| pp.current), Some(35));
        assert_eq!(store.team(&owner()), vec![bulbasaur, *caught_id]);
        // Capturing awards no experience.
        assert_eq!(
            store.get_record(&owner(), bulbasaur).map(|r| r.experience()),
            Some(0)
        );
        assert_eq!(store.ball_count(&owner(), BallKind::Poke), Ok(BallCount::Unlimited));
    }

    #[test]
    fn test_failed_capture_lets_enemy_attack() {
        let provider = TestProvider::new();
        let mut store = MemoryRosterStore::default();
        add_member(&mut store, &provider, "bulbasaur", 5, None);
        let config = BattleConfig::default();
        // Catch roll misses, shake draw picks one shake, then pidgey's damage roll.
        let mut session = start_battle(
            &provider,
            &mut store,
            &config,
            "pidgey",
            3,
            predictable_rng(&[0.99, 0.0, 1.0]),
        );

        let outcome = session
            .throw_ball(BallKind::Great, Some(20))
            .unwrap_or_else(|err| panic!("throw rejected: {}", err));

        assert_eq!(
            outcome.events,
            vec![
                BattleEvent::TurnStarted { turn_number: 1 },
                BattleEvent::BallThrown {
                    ball: BallKind::Great
                },
                BattleEvent::CaptureFailed {
                    creature: "pidgey".to_string(),
                    shakes: 1,
                },
                BattleEvent::MoveUsed {
                    side: Side::Wild,
                    creature: "pidgey".to_string(),
                    move_name: "tackle".to_string(),
                },
                BattleEvent::DamageDealt {
                    side: Side::Player,
                    target: "bulbasaur".to_string(),
                    damage: 5,
                    remaining_hp: 14,
                },
            ]
        );
        assert_eq!(outcome.phase, BattlePhase::PlayerTurn);
        let expected_chance = mini_game_chance(15, 15, 255, 1.5, 20, &config.catch);
        assert_eq!(
            outcome.catch,
            Some(CatchAttempt {
                chance: expected_chance,
                success: false,
                shakes: 1,
            })
        );
        assert_eq!(
            session.store().ball_count(&owner(), BallKind::Great),
            Ok(BallCount::Limited(2))
        );
        assert_eq!(session.store().records(&owner()).len(), 1);
        assert_eq!(
            outcome.narration()[..2].to_vec(),
            vec![
                "You threw a Great Ball!".to_string(),
                "Oh no! Pidgey broke free!".to_string()
            ]
        );
    }

    #[test]
    fn test_capture_with_full_team_stays_in_storage() {
        let provider = TestProvider::new();
        let mut store = MemoryRosterStore::default();
        for _ in 0..MAX_TEAM_SIZE {
            add_member(&mut store, &provider, "bulbasaur", 5, None);
        }
        let config = BattleConfig::default();
        let mut session =
            start_battle(&provider, &mut store, &config, "rattata", 3, predictable_rng(&[0.0]));

        session
            .throw_ball(BallKind::Ultra, Some(100))
            .unwrap_or_else(|err| panic!("throw rejected: {}", err));

        let store = session.store();
        let records = store.records(&owner());
        assert_eq!(records.len(), MAX_TEAM_SIZE + 1);
        let (caught_id, caught) = &records[MAX_TEAM_SIZE];
        assert_eq!(caught.species(), "rattata");
        assert_eq!(caught.ball(), Some(BallKind::Ultra));
        assert_eq!(store.team(&owner()).len(), MAX_TEAM_SIZE);
        assert!(!store.team(&owner()).contains(caught_id));
    }
}
