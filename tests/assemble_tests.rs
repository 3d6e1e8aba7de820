//! Normalization of raw responses into catalog records.

mod common;

use pipdex::assemble::{assemble, assemble_creature, AssembledEntry, MOVE_LIMIT};
use pipdex::error::AssemblyError;
use pipdex::state::{EvolutionStage, Stats};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::{detail, entry, parse_detail, parse_species, species};

#[test]
fn creature_fields_are_flattened() {
    let creature = assemble_creature(entry(detail(1, "bulbasaur", &["grass", "poison"])))
        .expect("assembles");

    assert_eq!(creature.id, 1);
    assert_eq!(creature.height, 7);
    assert_eq!(creature.weight, 69);
    assert_eq!(creature.categories, vec!["grass", "poison"]);
    assert_eq!(
        creature.stats,
        Stats {
            hp: 45,
            attack: 49,
            defense: 49,
            special_attack: 65,
            special_defense: 65,
            speed: 45,
        }
    );
    assert_eq!(creature.stats.total(), 318);
    assert_eq!(creature.abilities.len(), 2);
    assert!(creature.abilities[1].is_hidden);
    assert!(creature.abilities.iter().all(|ability| ability.description.is_empty()));
    assert_eq!(
        creature.sprites.front.as_deref(),
        Some("https://sprites.test/1.png")
    );
    assert_eq!(
        creature.sprites.animated.as_deref(),
        Some("https://sprites.test/anim/1.gif")
    );
    assert_eq!(
        creature.cry.as_deref(),
        Some("https://cries.test/latest/1.ogg")
    );
}

#[test]
fn missing_stat_names_the_field() {
    let mut raw = detail(1, "bulbasaur", &["grass"]);
    raw["stats"]
        .as_array_mut()
        .expect("stats array")
        .retain(|slot| slot["stat"]["name"] != "speed");

    let error = assemble_creature(entry(raw)).expect_err("speed is required");
    assert_eq!(error, AssemblyError::new("bulbasaur", "speed"));
}

#[test]
fn moves_are_truncated_in_source_order() {
    let mut raw = detail(1, "bulbasaur", &["grass"]);
    let moves: Vec<Value> = (0..37)
        .map(|idx| json!({ "move": { "name": format!("move-{idx}"), "url": "" } }))
        .collect();
    raw["moves"] = Value::Array(moves);

    let creature = assemble_creature(entry(raw)).expect("assembles");
    assert_eq!(creature.moves.len(), MOVE_LIMIT);
    assert_eq!(creature.moves[0].name, "move-0");
    assert_eq!(creature.moves[19].name, "move-19");
    assert!(creature
        .moves
        .iter()
        .all(|summary| summary.category == "normal" && summary.power.is_none()));
}

#[test]
fn description_prefers_english_and_replaces_form_feed() {
    let creature = assemble_creature(entry(detail(1, "bulbasaur", &["grass"]))).expect("assembles");
    assert_eq!(
        creature.description,
        "A strange seed was planted on its back."
    );
}

#[test]
fn description_is_empty_without_english_text() {
    let raw_species = json!({
        "name": "bulbasaur",
        "flavor_text_entries": [
            { "flavor_text": "ふしぎなタネ", "language": { "name": "ja", "url": "" } }
        ],
        "evolution_chain": null
    });
    let assembled = AssembledEntry {
        detail: parse_detail(detail(1, "bulbasaur", &["grass"])),
        species: parse_species(raw_species),
        evolution: Vec::new(),
    };
    let creature = assemble_creature(assembled).expect("assembles");
    assert_eq!(creature.description, "");
}

#[test]
fn absent_sprites_stay_absent() {
    let mut raw = detail(25, "pikachu", &["electric"]);
    raw["sprites"] = json!({ "front_default": null, "back_default": null });
    raw["cries"] = json!({ "latest": null, "legacy": "https://cries.test/legacy/25.ogg" });

    let creature = assemble_creature(entry(raw)).expect("assembles");
    assert_eq!(creature.sprites.front, None);
    assert_eq!(creature.sprites.back, None);
    assert_eq!(creature.sprites.shiny, None);
    assert_eq!(creature.sprites.animated, None);
    assert_eq!(
        creature.cry.as_deref(),
        Some("https://cries.test/legacy/25.ogg")
    );
}

#[test]
fn empty_type_list_is_an_assembly_error() {
    let error = assemble_creature(entry(detail(1, "bulbasaur", &[]))).expect_err("types required");
    assert_eq!(error.field, "types");
}

#[test]
fn evolution_path_is_carried_through() {
    let stages = vec![
        EvolutionStage {
            id: 4,
            name: "charmander".into(),
            sprite_url: "s4".into(),
            evolution_detail: "Level 1".into(),
        },
        EvolutionStage {
            id: 5,
            name: "charmeleon".into(),
            sprite_url: "s5".into(),
            evolution_detail: "Level 16".into(),
        },
    ];
    let assembled = AssembledEntry {
        detail: parse_detail(detail(4, "charmander", &["fire"])),
        species: parse_species(species("charmander", Some(2))),
        evolution: stages.clone(),
    };
    let creature = assemble_creature(assembled).expect("assembles");
    assert_eq!(creature.evolution_chain, stages);
}

#[test]
fn catalog_categories_are_sorted_and_unique() {
    let catalog = assemble(vec![
        entry(detail(7, "squirtle", &["water"])),
        entry(detail(6, "charizard", &["fire", "flying"])),
        entry(detail(4, "charmander", &["fire"])),
    ])
    .expect("assembles");

    assert_eq!(catalog.categories, vec!["fire", "flying", "water"]);
    let ids: Vec<u32> = catalog.creatures.iter().map(|creature| creature.id).collect();
    assert_eq!(ids, vec![7, 6, 4]);
}

#[test]
fn duplicate_ids_are_rejected() {
    let error = assemble(vec![
        entry(detail(1, "bulbasaur", &["grass"])),
        entry(detail(1, "bulbasaur-clone", &["grass"])),
    ])
    .expect_err("ids must be unique");
    assert_eq!(error, AssemblyError::new("bulbasaur-clone", "id"));
}
