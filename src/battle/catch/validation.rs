use crate::battle::state::BattleState;
use crate::errors::ActionError;
use crate::inventory::{BallCount, BallKind};
use crate::roster::RosterStore;

/// Check a throw before anything is consumed or drawn.
pub fn validate_throw(
    state: &BattleState,
    store: &dyn RosterStore,
    ball: BallKind,
) -> Result<(), ActionError> {
    state.phase.ensure_player_turn()?;
    let available = store
        .ball_count(&state.owner, ball)
        .map(BallCount::is_available)
        .unwrap_or(false);
    if available {
        Ok(())
    } else {
        Err(ActionError::NoBallsRemaining(ball))
    }
}
