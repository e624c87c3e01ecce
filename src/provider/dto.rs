//! Payloads of the public creature database, validated once into schema types.
//!
//! Nothing past this module sees the loosely-typed JSON shapes.

use crate::errors::{ProviderError, ProviderResult};
use schema::{
    BaseStats, Creature, DamageClass, EvolutionDetail, EvolutionNode, EvolutionTrigger,
    LearnableMove, MoveMetadata, PokemonType,
};
use serde::Deserialize;
use std::str::FromStr;

/// Base stat assumed when a payload omits one.
const MISSING_STAT: u16 = 50;

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TypeSlot {
    slot: u8,
    #[serde(rename = "type")]
    kind: NamedResource,
}

#[derive(Debug, Deserialize)]
struct StatEntry {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Debug, Deserialize)]
struct VersionGroupDetail {
    #[serde(default)]
    level_learned_at: u8,
    move_learn_method: NamedResource,
}

#[derive(Debug, Deserialize)]
struct MoveEntry {
    #[serde(rename = "move")]
    entry: NamedResource,
    #[serde(default)]
    version_group_details: Vec<VersionGroupDetail>,
}

#[derive(Debug, Deserialize)]
struct PokemonPayload {
    id: u32,
    name: String,
    #[serde(default)]
    base_experience: Option<u32>,
    #[serde(default)]
    types: Vec<TypeSlot>,
    #[serde(default)]
    stats: Vec<StatEntry>,
    #[serde(default)]
    moves: Vec<MoveEntry>,
}

#[derive(Debug, Deserialize)]
struct SpeciesPayload {
    #[serde(default)]
    capture_rate: Option<u16>,
    #[serde(default)]
    evolution_chain: Option<UrlResource>,
}

#[derive(Debug, Deserialize)]
struct UrlResource {
    url: String,
}

#[derive(Debug, Deserialize)]
struct MovePayload {
    name: String,
    #[serde(rename = "type")]
    kind: NamedResource,
    #[serde(default)]
    power: Option<u16>,
    #[serde(default)]
    accuracy: Option<u8>,
    #[serde(default)]
    pp: Option<u8>,
    #[serde(default)]
    damage_class: Option<NamedResource>,
}

#[derive(Debug, Deserialize)]
struct EvolutionDetailPayload {
    trigger: NamedResource,
    #[serde(default)]
    min_level: Option<u8>,
    #[serde(default)]
    item: Option<NamedResource>,
}

#[derive(Debug, Deserialize)]
struct ChainLink {
    species: NamedResource,
    #[serde(default)]
    evolution_details: Vec<EvolutionDetailPayload>,
    #[serde(default)]
    evolves_to: Vec<ChainLink>,
}

#[derive(Debug, Deserialize)]
struct EvolutionChainPayload {
    id: u32,
    chain: ChainLink,
}

fn parse_json<'a, T: Deserialize<'a>>(json: &'a str, what: &str) -> ProviderResult<T> {
    serde_json::from_str(json).map_err(|e| ProviderError::Malformed(format!("{}: {}", what, e)))
}

fn parse_type(name: &str) -> ProviderResult<PokemonType> {
    PokemonType::from_str(name)
        .map_err(|_| ProviderError::Malformed(format!("unknown type '{}'", name)))
}

/// Trailing numeric id of a resource url such as `.../evolution-chain/10/`.
pub fn extract_id_from_url(url: &str) -> Option<u32> {
    url.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}

/// Build a [`Creature`] from a `pokemon` payload and, when available, its
/// `pokemon-species` payload (which carries the catch rate).
pub fn parse_creature(pokemon_json: &str, species_json: Option<&str>) -> ProviderResult<Creature> {
    let payload: PokemonPayload = parse_json(pokemon_json, "pokemon")?;

    let mut slots: Vec<&TypeSlot> = payload.types.iter().collect();
    slots.sort_by_key(|slot| slot.slot);
    let types = slots
        .into_iter()
        .map(|slot| parse_type(&slot.kind.name))
        .collect::<ProviderResult<Vec<_>>>()?;
    if types.is_empty() || types.len() > 2 {
        return Err(ProviderError::Malformed(format!(
            "{} has {} types",
            payload.name,
            types.len()
        )));
    }

    let stat = |name: &str| {
        payload
            .stats
            .iter()
            .find(|entry| entry.stat.name == name)
            .map(|entry| entry.base_stat)
            .unwrap_or(MISSING_STAT)
    };
    let base_stats = BaseStats {
        hp: stat("hp"),
        attack: stat("attack"),
        defense: stat("defense"),
        sp_attack: stat("special-attack"),
        sp_defense: stat("special-defense"),
        speed: stat("speed"),
    };

    let level_up_moves = payload
        .moves
        .iter()
        .filter_map(|entry| {
            entry
                .version_group_details
                .iter()
                .find(|d| d.move_learn_method.name == "level-up" && d.level_learned_at > 0)
                .map(|d| LearnableMove {
                    name: entry.entry.name.clone(),
                    level: d.level_learned_at,
                })
        })
        .collect();

    let catch_rate = match species_json {
        Some(json) => {
            let species: SpeciesPayload = parse_json(json, "pokemon-species")?;
            species.capture_rate.map(|rate| rate.min(255) as u8)
        }
        None => None,
    };

    Ok(Creature {
        id: payload.id,
        name: payload.name,
        types,
        base_stats,
        base_exp: payload.base_experience.unwrap_or(0),
        catch_rate,
        level_up_moves,
    })
}

pub fn parse_move(json: &str) -> ProviderResult<MoveMetadata> {
    let payload: MovePayload = parse_json(json, "move")?;
    let damage_class = payload
        .damage_class
        .as_ref()
        .and_then(|class| DamageClass::from_str(&class.name).ok());
    Ok(MoveMetadata {
        move_type: parse_type(&payload.kind.name)?,
        name: payload.name,
        power: payload.power,
        accuracy: payload.accuracy,
        pp: payload.pp,
        damage_class,
    })
}

/// Evolution graph id referenced by a `pokemon-species` payload.
pub fn parse_species_graph_id(json: &str) -> ProviderResult<u32> {
    let species: SpeciesPayload = parse_json(json, "pokemon-species")?;
    let url = species
        .evolution_chain
        .ok_or_else(|| ProviderError::NotFound("species has no evolution chain".to_string()))?
        .url;
    extract_id_from_url(&url)
        .ok_or_else(|| ProviderError::Malformed(format!("bad evolution chain url '{}'", url)))
}

/// Returns the graph id together with its root node.
pub fn parse_evolution_graph(json: &str) -> ProviderResult<(u32, EvolutionNode)> {
    let payload: EvolutionChainPayload = parse_json(json, "evolution-chain")?;
    Ok((payload.id, convert_link(payload.chain)))
}

fn convert_link(link: ChainLink) -> EvolutionNode {
    EvolutionNode {
        species: link.species.name,
        details: link
            .evolution_details
            .into_iter()
            .map(|detail| EvolutionDetail {
                trigger: EvolutionTrigger::from_api_name(&detail.trigger.name),
                min_level: detail.min_level,
                item: detail.item.map(|item| item.name),
            })
            .collect(),
        evolves_to: link.evolves_to.into_iter().map(convert_link).collect(),
    }
}
