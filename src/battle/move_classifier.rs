use schema::{MoveTarget, StatType};

/// A stage change a status move applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageEffect {
    pub stat: StatType,
    pub target: MoveTarget,
    pub stages: i8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Damage,
    /// `effect` is `None` for status moves whose effect is not modeled.
    Status { effect: Option<StageEffect> },
}

impl MoveKind {
    pub fn is_status(self) -> bool {
        matches!(self, MoveKind::Status { .. })
    }
}

const fn stage(stat: StatType, target: MoveTarget, stages: i8) -> Option<StageEffect> {
    Some(StageEffect {
        stat,
        target,
        stages,
    })
}

/// Classify a move by name. The status table is closed: anything not listed
/// is a damaging move, even if it is a status move in the full games.
pub fn classify(name: &str) -> MoveKind {
    use MoveTarget::{Opponent, User};
    use StatType::{Attack, Defense};

    let effect = match name.to_ascii_lowercase().as_str() {
        "growl" | "charm" | "baby-doll-eyes" | "feather-dance" | "tickle" => {
            stage(Attack, Opponent, -1)
        }
        "tail-whip" | "leer" | "screech" => stage(Defense, Opponent, -1),
        "swords-dance" => stage(Attack, User, 2),
        "howl" | "work-up" | "bulk-up" | "calm-mind" => stage(Attack, User, 1),
        "harden" | "iron-defense" | "defense-curl" => stage(Defense, User, 1),
        "agility" | "double-team" | "focus-energy" | "reflect" | "light-screen"
        | "string-shot" | "scary-face" | "thunder-wave" | "will-o-wisp" | "toxic"
        | "sleep-powder" | "stun-spore" | "spore" => None,
        _ => return MoveKind::Damage,
    };
    MoveKind::Status { effect }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("growl", StatType::Attack, MoveTarget::Opponent, -1)]
    #[case("leer", StatType::Defense, MoveTarget::Opponent, -1)]
    #[case("swords-dance", StatType::Attack, MoveTarget::User, 2)]
    #[case("howl", StatType::Attack, MoveTarget::User, 1)]
    #[case("harden", StatType::Defense, MoveTarget::User, 1)]
    #[case("Growl", StatType::Attack, MoveTarget::Opponent, -1)]
    #[case("SWORDS-DANCE", StatType::Attack, MoveTarget::User, 2)]
    fn test_stage_moves(
        #[case] name: &str,
        #[case] stat: StatType,
        #[case] target: MoveTarget,
        #[case] stages: i8,
    ) {
        assert_eq!(
            classify(name),
            MoveKind::Status {
                effect: Some(StageEffect {
                    stat,
                    target,
                    stages
                })
            }
        );
    }

    #[test]
    fn test_unmodeled_status_moves() {
        for name in ["agility", "thunder-wave", "spore", "toxic", "Thunder-Wave"] {
            assert_eq!(classify(name), MoveKind::Status { effect: None });
        }
    }

    #[test]
    fn test_unknown_names_are_damage() {
        assert_eq!(classify("tackle"), MoveKind::Damage);
        // a status move in the full games, but not in the table
        assert_eq!(classify("sand-attack"), MoveKind::Damage);
        assert_eq!(classify("Tackle"), MoveKind::Damage);
    }
}
