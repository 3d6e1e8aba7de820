//! In-memory transport and PokeAPI-shaped fixtures shared by the
//! integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pipdex::api::{DetailRecord, SpeciesRecord, Transport};
use pipdex::assemble::AssembledEntry;
use pipdex::error::TransportError;
use pipdex::loader::LoadOptions;
use serde_json::{json, Value};

pub const BASE: &str = "https://api.test/v2";

pub fn detail_url(id: u32) -> String {
    format!("{BASE}/pokemon/{id}/")
}

pub fn species_url(id: u32) -> String {
    format!("{BASE}/pokemon-species/{id}/")
}

pub fn chain_url(id: u32) -> String {
    format!("{BASE}/evolution-chain/{id}/")
}

pub fn index_url(limit: usize) -> String {
    format!("{BASE}/pokemon?limit={limit}")
}

pub fn options(limit: usize) -> LoadOptions {
    LoadOptions {
        api_base: BASE.to_string(),
        limit,
        ..LoadOptions::default()
    }
}

#[derive(Default)]
pub struct FakeTransport {
    responses: HashMap<String, Vec<u8>>,
    failures: HashMap<String, TransportError>,
    delays: HashMap<String, Duration>,
    panics: Vec<String>,
    calls: Mutex<Vec<String>>,
    evicted: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(mut self, url: impl Into<String>, body: Value) -> Self {
        self.responses.insert(url.into(), body.to_string().into_bytes());
        self
    }

    pub fn with_body(mut self, url: impl Into<String>, body: &[u8]) -> Self {
        self.responses.insert(url.into(), body.to_vec());
        self
    }

    pub fn with_failure(mut self, url: impl Into<String>, error: TransportError) -> Self {
        self.failures.insert(url.into(), error);
        self
    }

    pub fn with_delay(mut self, url: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(url.into(), delay);
        self
    }

    /// Makes any request for `url` panic inside the fetching task.
    pub fn with_panic(mut self, url: impl Into<String>) -> Self {
        self.panics.push(url.into());
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn evicted(&self) -> Vec<String> {
        self.evicted.lock().unwrap().clone()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.calls.lock().unwrap().push(url.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if self.panics.iter().any(|panic_url| panic_url == url) {
            panic!("transport blew up on {url}");
        }
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        let result = match self.failures.get(url) {
            Some(error) => Err(error.clone()),
            None => self
                .responses
                .get(url)
                .cloned()
                .ok_or(TransportError::Status(404)),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn evict(&self, url: &str) {
        self.evicted.lock().unwrap().push(url.to_string());
    }
}

pub fn index(entries: &[(u32, &str)]) -> Value {
    let results: Vec<Value> = entries
        .iter()
        .map(|(id, name)| json!({ "name": name, "url": detail_url(*id) }))
        .collect();
    json!({ "count": results.len(), "results": results })
}

pub fn stats(values: [u16; 6]) -> Value {
    let names = [
        "hp",
        "attack",
        "defense",
        "special-attack",
        "special-defense",
        "speed",
    ];
    Value::Array(
        names
            .iter()
            .zip(values)
            .map(|(name, value)| {
                json!({ "base_stat": value, "effort": 0, "stat": { "name": name, "url": "" } })
            })
            .collect(),
    )
}

pub fn detail(id: u32, name: &str, types: &[&str]) -> Value {
    let types: Vec<Value> = types
        .iter()
        .enumerate()
        .map(|(slot, kind)| json!({ "slot": slot + 1, "type": { "name": kind, "url": "" } }))
        .collect();
    json!({
        "id": id,
        "name": name,
        "height": 7,
        "weight": 69,
        "types": types,
        "stats": stats([45, 49, 49, 65, 65, 45]),
        "abilities": [
            { "ability": { "name": "overgrow", "url": "" }, "is_hidden": false, "slot": 1 },
            { "ability": { "name": "chlorophyll", "url": "" }, "is_hidden": true, "slot": 3 }
        ],
        "moves": [
            { "move": { "name": "razor-wind", "url": "" } },
            { "move": { "name": "swords-dance", "url": "" } },
            { "move": { "name": "cut", "url": "" } }
        ],
        "sprites": {
            "front_default": format!("https://sprites.test/{id}.png"),
            "back_default": format!("https://sprites.test/back/{id}.png"),
            "front_shiny": format!("https://sprites.test/shiny/{id}.png"),
            "versions": {
                "generation-v": {
                    "black-white": {
                        "animated": { "front_default": format!("https://sprites.test/anim/{id}.gif") }
                    }
                }
            }
        },
        "species": { "name": name, "url": species_url(id) },
        "cries": {
            "latest": format!("https://cries.test/latest/{id}.ogg"),
            "legacy": format!("https://cries.test/legacy/{id}.ogg")
        }
    })
}

pub fn species(name: &str, chain: Option<u32>) -> Value {
    json!({
        "name": name,
        "flavor_text_entries": [
            { "flavor_text": "ふしぎなタネ", "language": { "name": "ja", "url": "" } },
            { "flavor_text": "A strange seed was\u{000C}planted on its back.", "language": { "name": "en", "url": "" } }
        ],
        "evolution_chain": chain.map(|id| json!({ "url": chain_url(id) }))
    })
}

pub fn link(name: &str, id: u32, details: Value, evolves_to: Vec<Value>) -> Value {
    json!({
        "species": { "name": name, "url": species_url(id) },
        "evolution_details": details,
        "evolves_to": evolves_to,
    })
}

pub fn level_up(level: u32) -> Value {
    json!([{ "min_level": level, "item": null, "trigger": { "name": "level-up", "url": "" }, "min_happiness": null }])
}

/// Transport serving a complete catalog of `entries`, none with an evolution chain.
pub fn catalog(entries: &[(u32, &str, &[&str])]) -> FakeTransport {
    let names: Vec<(u32, &str)> = entries.iter().map(|(id, name, _)| (*id, *name)).collect();
    let mut transport = FakeTransport::new().with_json(index_url(entries.len()), index(&names));
    for (id, name, types) in entries {
        transport = transport
            .with_json(detail_url(*id), detail(*id, name, types))
            .with_json(species_url(*id), species(name, None));
    }
    transport
}

pub fn starters() -> FakeTransport {
    catalog(&[
        (1, "bulbasaur", &["grass", "poison"]),
        (4, "charmander", &["fire"]),
        (7, "squirtle", &["water"]),
        (12, "butterfree", &["bug", "flying"]),
        (77, "ponyta", &["fire"]),
    ])
}

pub fn parse_detail(value: Value) -> DetailRecord {
    serde_json::from_value(value).expect("detail fixture parses")
}

pub fn parse_species(value: Value) -> SpeciesRecord {
    serde_json::from_value(value).expect("species fixture parses")
}

pub fn entry(detail: Value) -> AssembledEntry {
    let name = detail["name"].as_str().unwrap_or_default().to_string();
    AssembledEntry {
        detail: parse_detail(detail),
        species: parse_species(species(&name, None)),
        evolution: Vec::new(),
    }
}
