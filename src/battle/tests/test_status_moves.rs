#[cfg(test)]
mod tests {
    use crate::battle::state::{BattleEvent, Side};
    use crate::battle::tests::common::{
        add_member, owner, predictable_rng, start_battle, TestProvider,
    };
    use crate::config::BattleConfig;
    use crate::roster::{MemoryRosterStore, RosterStore};
    use pretty_assertions::assert_eq;
    use schema::StatType;

    #[test]
    fn test_growl_lowers_enemy_attack() {
        let provider = TestProvider::new();
        let mut store = MemoryRosterStore::default();
        add_member(&mut store, &provider, "bulbasaur", 5, None);
        let config = BattleConfig::default();
        // Growl draws nothing; only the enemy's damage roll is needed.
        let mut session =
            start_battle(&provider, &mut store, &config, "pidgey", 3, predictable_rng(&[1.0]));

        let outcome = session
            .use_move("growl")
            .unwrap_or_else(|err| panic!("growl rejected: {}", err));

        assert_eq!(
            outcome.events,
            vec![
                BattleEvent::TurnStarted { turn_number: 1 },
                BattleEvent::MoveUsed {
                    side: Side::Player,
                    creature: "bulbasaur".to_string(),
                    move_name: "growl".to_string(),
                },
                BattleEvent::StatStageChanged {
                    side: Side::Wild,
                    target: "pidgey".to_string(),
                    stat: StatType::Attack,
                    delta: -1,
                    new_stage: -1,
                },
                BattleEvent::MoveUsed {
                    side: Side::Wild,
                    creature: "pidgey".to_string(),
                    move_name: "tackle".to_string(),
                },
                // 5 damage without the drop.
                BattleEvent::DamageDealt {
                    side: Side::Player,
                    target: "bulbasaur".to_string(),
                    damage: 4,
                    remaining_hp: 15,
                },
            ]
        );
        assert_eq!(session.state().enemy.stage(StatType::Attack), -1);
        assert_eq!(session.rng().draws(), 1);
    }

    #[test]
    fn test_swords_dance_stops_at_the_stage_limit() {
        let provider = TestProvider::new();
        let mut store = MemoryRosterStore::default();
        add_member(&mut store, &provider, "bulbasaur", 10, None);
        let config = BattleConfig::default();
        let mut session = start_battle(
            &provider,
            &mut store,
            &config,
            "pidgey",
            2,
            predictable_rng(&[1.0, 1.0, 1.0, 1.0]),
        );

        for expected in [2, 4, 6] {
            let outcome = session
                .use_move("swords-dance")
                .unwrap_or_else(|err| panic!("swords-dance rejected: {}", err));
            assert!(outcome.events.contains(&BattleEvent::StatStageChanged {
                side: Side::Player,
                target: "bulbasaur".to_string(),
                stat: StatType::Attack,
                delta: 2,
                new_stage: expected,
            }));
        }

        let outcome = session
            .use_move("swords-dance")
            .unwrap_or_else(|err| panic!("swords-dance rejected: {}", err));
        assert!(outcome.events.contains(&BattleEvent::StatStageUnchanged {
            side: Side::Player,
            target: "bulbasaur".to_string(),
            stat: StatType::Attack,
            rising: true,
        }));
        assert_eq!(session.state().player.stage(StatType::Attack), 6);
        // Four tackles from pidgey at 4 damage each.
        assert_eq!(session.state().player.current_hp, 13);
        assert_eq!(
            session.state().player.find_move("swords-dance").map(|m| m.pp),
            Some(16)
        );
    }

    #[test]
    fn test_unmodeled_status_move_only_reports_an_effect() {
        let provider = TestProvider::new();
        let mut store = MemoryRosterStore::default();
        let bulbasaur = add_member(&mut store, &provider, "bulbasaur", 5, None);
        store
            .learn_move(&owner(), bulbasaur, "agility", 30)
            .unwrap_or_else(|err| panic!("learn failed: {}", err));
        let config = BattleConfig::default();
        let mut session =
            start_battle(&provider, &mut store, &config, "pidgey", 3, predictable_rng(&[1.0]));

        let outcome = session
            .use_move("agility")
            .unwrap_or_else(|err| panic!("agility rejected: {}", err));

        assert_eq!(outcome.events[1..3].to_vec(), vec![
            BattleEvent::MoveUsed {
                side: Side::Player,
                creature: "bulbasaur".to_string(),
                move_name: "agility".to_string(),
            },
            BattleEvent::StatusMoveHadEffect,
        ]);
        assert_eq!(session.state().enemy.current_hp, 15);
        assert_eq!(session.state().player.stage(StatType::Attack), 0);
        assert_eq!(session.state().player.stage(StatType::Defense), 0);
        assert_eq!(
            session
                .store()
                .get_record(&owner(), bulbasaur)
                .and_then(|record| record.move_pp("agility"))
                .map(|pp| pp.current),
            Some(29)
        );
    }
}
