use super::CreatureDataProvider;
use crate::config::BattleConfig;
use log::{debug, warn};
use schema::{Creature, MoveMetadata, PokemonType};
use std::collections::HashMap;

/// Move data as the battle uses it, with fallbacks already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMove {
    pub name: String,
    pub move_type: PokemonType,
    pub power: u16,
    pub max_pp: u8,
    /// True when the provider had no metadata and defaults were used.
    pub from_fallback: bool,
}

/// Per-battle cache of move metadata, filled lazily on first use.
///
/// Only successful lookups are cached; a failed lookup is retried the next
/// time the move is used.
#[derive(Debug, Clone, Default)]
pub struct MoveCache {
    entries: HashMap<String, MoveMetadata>,
}

impl MoveCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look a move up for `user`. Never fails: missing data falls back to the
    /// user's primary type and the configured power and PP.
    pub fn resolve(
        &mut self,
        provider: &dyn CreatureDataProvider,
        name: &str,
        user: &Creature,
        config: &BattleConfig,
    ) -> ResolvedMove {
        if !self.entries.contains_key(name) {
            match provider.get_move_metadata(name) {
                Ok(metadata) => {
                    debug!("Cached move metadata for {}", name);
                    self.entries.insert(name.to_string(), metadata);
                }
                Err(err) => {
                    warn!("Move metadata for {} unavailable, using fallback: {}", name, err);
                }
            }
        }

        match self.entries.get(name) {
            Some(metadata) => ResolvedMove {
                name: name.to_string(),
                move_type: metadata.move_type,
                // Status moves report null or zero power.
                power: metadata
                    .power
                    .filter(|power| *power > 0)
                    .unwrap_or(config.fallback_move_power),
                max_pp: metadata.pp.unwrap_or(config.fallback_move_pp),
                from_fallback: false,
            },
            None => ResolvedMove {
                name: name.to_string(),
                move_type: user.primary_type(),
                power: config.fallback_move_power,
                max_pp: config.fallback_move_pp,
                from_fallback: true,
            },
        }
    }
}
