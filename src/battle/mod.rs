pub mod ai;
pub mod calculators;
pub mod catch;
pub mod combatant;
pub mod commands;
pub mod engine;
pub mod move_classifier;
pub mod state;
pub mod stats;

#[cfg(test)]
mod tests;
