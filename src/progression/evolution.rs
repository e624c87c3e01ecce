use super::{EvolutionOutcome, ProgressionEngine};
use crate::battle::stats::calculate_max_hp;
use crate::errors::{ProviderError, StoreResult};
use crate::provider::CreatureKey;
use crate::roster::{InstanceId, OwnerId, RosterStore};
use log::{debug, info, warn};
use schema::Creature;

/// Current HP after evolving, keeping the same fraction of the maximum.
pub fn scale_hp(old_current: u16, old_max: u16, new_max: u16) -> u16 {
    let ratio = f64::from(old_current) / f64::from(old_max.max(1));
    ((f64::from(new_max) * ratio).round() as u16).min(new_max)
}

impl ProgressionEngine<'_> {
    /// Evolve the record if the first child of its species node requires a
    /// level at or below `level`. Provider failures skip evolution.
    pub(crate) fn check_evolution(
        &self,
        store: &mut dyn RosterStore,
        owner: &OwnerId,
        id: InstanceId,
        creature: &Creature,
        level: u8,
    ) -> StoreResult<Option<EvolutionOutcome>> {
        let evolved = match self.find_evolution(creature, level) {
            Ok(Some(evolved)) => evolved,
            Ok(None) => return Ok(None),
            Err(ProviderError::NotFound(what)) => {
                debug!("No evolution data for {}: {}", creature.name, what);
                return Ok(None);
            }
            Err(err) => {
                warn!("Evolution check for {} failed: {}", creature.name, err);
                return Ok(None);
            }
        };

        let Some(record) = store.get_record(owner, id) else {
            return Ok(None);
        };
        let max_hp = calculate_max_hp(evolved.base_stats.hp, level);
        let current_hp = scale_hp(record.current_hp(), record.max_hp(), max_hp);
        store.replace_species_on_evolution(owner, id, &evolved, current_hp, max_hp)?;
        info!("{} evolved into {}", creature.name, evolved.name);

        Ok(Some(EvolutionOutcome {
            from: creature.name.clone(),
            into: evolved.name,
            current_hp,
            max_hp,
        }))
    }

    fn find_evolution(&self, creature: &Creature, level: u8) -> Result<Option<Creature>, ProviderError> {
        let graph_id = self.provider.get_species_evolution_graph_id(creature.id)?;
        let graph = self.provider.get_evolution_graph(graph_id)?;
        match graph.level_evolution_for(&creature.name, level) {
            Some(next) => Ok(Some(self.provider.get_creature(&CreatureKey::from(next))?)),
            None => Ok(None),
        }
    }
}
