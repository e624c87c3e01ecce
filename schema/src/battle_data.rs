use serde::{Deserialize, Serialize};
use std::fmt;

/// Stats that carry a battle-scoped stage counter.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Copy)]
pub enum StatType {
    Attack,
    Defense,
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            StatType::Attack => "Attack",
            StatType::Defense => "Defense",
        };
        write!(f, "{}", display_name)
    }
}

/// Who a stage-changing move applies to, relative to its user.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Copy)]
pub enum MoveTarget {
    User,
    Opponent,
}
