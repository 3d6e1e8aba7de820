//! Flattens raw detail/species responses into `NormalizedCreature` records.

use std::collections::{BTreeSet, HashSet};

use crate::api::{DetailRecord, SpeciesRecord};
use crate::error::AssemblyError;
use crate::state::{
    Ability, Catalog, EvolutionStage, MoveSummary, NormalizedCreature, Sprites, Stats,
};

pub const MOVE_LIMIT: usize = 20;
const PLACEHOLDER_MOVE_CATEGORY: &str = "normal";
const DESCRIPTION_LANGUAGE: &str = "en";

/// Detail and species responses for one entry, plus its resolved evolution path.
#[derive(Clone, Debug)]
pub struct AssembledEntry {
    pub detail: DetailRecord,
    pub species: SpeciesRecord,
    pub evolution: Vec<EvolutionStage>,
}

pub fn assemble(entries: Vec<AssembledEntry>) -> Result<Catalog, AssemblyError> {
    let creatures = entries
        .into_iter()
        .map(assemble_creature)
        .collect::<Result<Vec<_>, _>>()?;
    build_catalog(creatures)
}

/// Checks id uniqueness and derives the category facet.
pub fn build_catalog(creatures: Vec<NormalizedCreature>) -> Result<Catalog, AssemblyError> {
    let mut seen = HashSet::with_capacity(creatures.len());
    for creature in &creatures {
        if !seen.insert(creature.id) {
            return Err(AssemblyError::new(&creature.name, "id"));
        }
    }
    let categories = collect_categories(&creatures);
    Ok(Catalog {
        creatures,
        categories,
    })
}

pub fn assemble_creature(entry: AssembledEntry) -> Result<NormalizedCreature, AssemblyError> {
    let AssembledEntry {
        detail,
        species,
        evolution,
    } = entry;

    let categories: Vec<String> = detail
        .types
        .iter()
        .map(|slot| slot.type_info.name.clone())
        .collect();
    if categories.is_empty() {
        return Err(AssemblyError::new(&detail.name, "types"));
    }

    let stats = extract_stats(&detail)?;
    let abilities = detail
        .abilities
        .iter()
        .map(|slot| Ability {
            name: slot.ability.name.clone(),
            is_hidden: slot.is_hidden,
            description: String::new(),
        })
        .collect();
    let moves = detail
        .moves
        .iter()
        .take(MOVE_LIMIT)
        .map(|slot| MoveSummary {
            name: slot.move_info.name.clone(),
            category: PLACEHOLDER_MOVE_CATEGORY.to_string(),
            power: None,
        })
        .collect();
    let sprites = Sprites {
        front: pointer_string(&detail.sprites, "/front_default"),
        back: pointer_string(&detail.sprites, "/back_default"),
        shiny: pointer_string(&detail.sprites, "/front_shiny"),
        animated: pointer_string(
            &detail.sprites,
            "/versions/generation-v/black-white/animated/front_default",
        ),
    };
    let cry = detail
        .cries
        .as_ref()
        .and_then(|cries| cries.latest.clone().or_else(|| cries.legacy.clone()));

    Ok(NormalizedCreature {
        id: detail.id,
        name: detail.name,
        height: detail.height,
        weight: detail.weight,
        categories,
        stats,
        abilities,
        sprites,
        description: english_description(&species).unwrap_or_default(),
        moves,
        evolution_chain: evolution,
        cry,
    })
}

/// Sorted, duplicate-free union of every creature's categories.
pub fn collect_categories(creatures: &[NormalizedCreature]) -> Vec<String> {
    creatures
        .iter()
        .flat_map(|creature| creature.categories.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn extract_stats(detail: &DetailRecord) -> Result<Stats, AssemblyError> {
    let stat = |name: &str| -> Result<u16, AssemblyError> {
        detail
            .stats
            .iter()
            .find(|slot| slot.stat.name == name)
            .map(|slot| slot.base_stat)
            .ok_or_else(|| AssemblyError::new(&detail.name, name))
    };
    Ok(Stats {
        hp: stat("hp")?,
        attack: stat("attack")?,
        defense: stat("defense")?,
        special_attack: stat("special-attack")?,
        special_defense: stat("special-defense")?,
        speed: stat("speed")?,
    })
}

fn english_description(species: &SpeciesRecord) -> Option<String> {
    species
        .flavor_text_entries
        .iter()
        .find(|entry| entry.language.name == DESCRIPTION_LANGUAGE)
        .map(|entry| entry.flavor_text.replace('\u{000C}', " "))
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}
