pub mod calculation;
pub mod commands;
pub mod validation;

pub use calculation::{
    clamp_chance, mini_game_chance, quick_throw_chance, roll_shakes, CatchAttempt,
};
pub use commands::resolve_throw;
pub use validation::validate_throw;
