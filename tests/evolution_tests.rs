//! Evolution tree resolution and trigger descriptions.

mod common;

use pipdex::api::{EvolutionChainResponse, EvolutionNode, EvolutionTrigger};
use pipdex::evolution::{describe_trigger, resolve_chain};
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{level_up, link};

fn tree(chain: serde_json::Value) -> EvolutionNode {
    let response: EvolutionChainResponse =
        serde_json::from_value(json!({ "chain": chain })).expect("chain fixture parses");
    EvolutionNode::try_from(&response.chain).expect("species ids resolve")
}

#[test]
fn linear_chain_lists_base_form_first() {
    let root = tree(link(
        "bulbasaur",
        1,
        json!([]),
        vec![link(
            "ivysaur",
            2,
            level_up(16),
            vec![link("venusaur", 3, level_up(32), vec![])],
        )],
    ));

    let stages = resolve_chain(&root);
    let summary: Vec<(u32, &str, &str)> = stages
        .iter()
        .map(|stage| (stage.id, stage.name.as_str(), stage.evolution_detail.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (1, "bulbasaur", "Level 1"),
            (2, "ivysaur", "Level 16"),
            (3, "venusaur", "Level 32"),
        ]
    );
    assert_eq!(
        stages[2].sprite_url,
        "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/3.png"
    );
}

#[test]
fn branching_chain_follows_first_child_only() {
    let root = tree(link(
        "a",
        10,
        json!([]),
        vec![
            link("b", 11, level_up(20), vec![]),
            link("c", 12, level_up(25), vec![]),
        ],
    ));

    let names: Vec<String> = resolve_chain(&root)
        .into_iter()
        .map(|stage| stage.name)
        .collect();
    assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn resolution_is_deterministic() {
    let root = tree(link(
        "eevee",
        133,
        json!([]),
        vec![
            link("vaporeon", 134, json!([{ "item": { "name": "water-stone", "url": "" } }]), vec![]),
            link("jolteon", 135, json!([{ "item": { "name": "thunder-stone", "url": "" } }]), vec![]),
        ],
    ));
    assert_eq!(resolve_chain(&root), resolve_chain(&root));
}

#[test]
fn single_species_chain_has_one_stage() {
    let root = tree(link("tauros", 128, json!([]), vec![]));
    let stages = resolve_chain(&root);
    assert_eq!(stages.len(), 1);
    assert_eq!(stages[0].evolution_detail, "Level 1");
}

#[test]
fn trigger_without_data_reads_level_one() {
    assert_eq!(describe_trigger(None), "Level 1");
    assert_eq!(describe_trigger(Some(&EvolutionTrigger::default())), "Level 1");
}

#[test]
fn level_takes_precedence_over_item() {
    let trigger = EvolutionTrigger {
        min_level: Some(16),
        item: Some("fire-stone".into()),
        ..EvolutionTrigger::default()
    };
    assert_eq!(describe_trigger(Some(&trigger)), "Level 16");
}

#[test]
fn item_trade_and_friendship_triggers() {
    let item = EvolutionTrigger {
        item: Some("moon-stone".into()),
        trade: true,
        ..EvolutionTrigger::default()
    };
    assert_eq!(describe_trigger(Some(&item)), "Use moon-stone");

    let trade = EvolutionTrigger {
        trade: true,
        min_friendship: Some(220),
        ..EvolutionTrigger::default()
    };
    assert_eq!(describe_trigger(Some(&trade)), "Trade");

    let friendship = EvolutionTrigger {
        min_friendship: Some(220),
        ..EvolutionTrigger::default()
    };
    assert_eq!(describe_trigger(Some(&friendship)), "High friendship");
}

#[test]
fn trade_trigger_parsed_from_response() {
    let root = tree(link(
        "machoke",
        67,
        json!([]),
        vec![link(
            "machamp",
            68,
            json!([{ "trigger": { "name": "trade", "url": "" } }]),
            vec![],
        )],
    ));
    let stages = resolve_chain(&root);
    assert_eq!(stages[1].evolution_detail, "Trade");
}

#[test]
fn species_url_without_id_is_rejected() {
    let response: EvolutionChainResponse = serde_json::from_value(json!({
        "chain": {
            "species": { "name": "missingno", "url": "https://api.test/v2/pokemon-species/missingno/" },
            "evolution_details": [],
            "evolves_to": []
        }
    }))
    .expect("chain fixture parses");
    assert!(EvolutionNode::try_from(&response.chain).is_err());
}
