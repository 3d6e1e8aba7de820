//! PokeAPI response shapes and the transport used to fetch them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;

use crate::error::TransportError;

pub const API_BASE: &str = "https://pokeapi.co/api/v2";
pub const CATALOG_SIZE: usize = 151;

const SPRITE_URL_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";
const CRY_URL_BASE: &str = "https://play.pokemonshowdown.com/audio/cries";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ApiResource {
    pub url: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct IndexResponse {
    pub results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DetailRecord {
    pub id: u32,
    pub name: String,
    pub height: u32,
    pub weight: u32,
    pub types: Vec<TypeSlot>,
    pub stats: Vec<StatSlot>,
    pub abilities: Vec<AbilitySlot>,
    pub moves: Vec<MoveSlot>,
    #[serde(default)]
    pub sprites: serde_json::Value,
    pub species: NamedResource,
    pub cries: Option<Cries>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StatSlot {
    pub base_stat: u16,
    pub stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedResource,
    #[serde(default)]
    pub is_hidden: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MoveSlot {
    #[serde(rename = "move")]
    pub move_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Cries {
    pub latest: Option<String>,
    pub legacy: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SpeciesRecord {
    pub name: String,
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorTextEntry>,
    pub evolution_chain: Option<ApiResource>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FlavorTextEntry {
    pub flavor_text: String,
    pub language: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EvolutionChainResponse {
    pub chain: ChainLink,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChainLink {
    pub species: NamedResource,
    #[serde(default)]
    pub evolution_details: Vec<EvolutionDetailResponse>,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EvolutionDetailResponse {
    pub min_level: Option<u32>,
    pub item: Option<NamedResource>,
    pub trigger: Option<NamedResource>,
    pub min_happiness: Option<u32>,
}

/// One node of an evolution tree, with the species id already resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvolutionNode {
    pub species_name: String,
    pub species_id: u32,
    pub trigger: Option<EvolutionTrigger>,
    pub children: Vec<EvolutionNode>,
}

/// Conditions that advance a species into this node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvolutionTrigger {
    pub min_level: Option<u32>,
    pub item: Option<String>,
    pub trade: bool,
    pub min_friendship: Option<u32>,
}

impl EvolutionTrigger {
    /// Merges every detail entry, keeping the first value seen per field.
    fn from_details(details: &[EvolutionDetailResponse]) -> Option<Self> {
        if details.is_empty() {
            return None;
        }
        let mut trigger = EvolutionTrigger::default();
        for detail in details {
            trigger.min_level = trigger.min_level.or(detail.min_level);
            if trigger.item.is_none() {
                trigger.item = detail.item.as_ref().map(|item| item.name.clone());
            }
            trigger.trade |= detail
                .trigger
                .as_ref()
                .is_some_and(|kind| kind.name == "trade");
            trigger.min_friendship = trigger.min_friendship.or(detail.min_happiness);
        }
        Some(trigger)
    }
}

impl TryFrom<&ChainLink> for EvolutionNode {
    type Error = String;

    fn try_from(link: &ChainLink) -> Result<Self, Self::Error> {
        let species_id = id_from_url(&link.species.url)
            .ok_or_else(|| format!("species url without id: {}", link.species.url))?;
        let children = link
            .evolves_to
            .iter()
            .map(EvolutionNode::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EvolutionNode {
            species_name: link.species.name.clone(),
            species_id,
            trigger: EvolutionTrigger::from_details(&link.evolution_details),
            children,
        })
    }
}

pub fn index_url(api_base: &str, limit: usize) -> String {
    format!("{}/pokemon?limit={limit}", api_base.trim_end_matches('/'))
}

pub fn sprite_url(id: u32) -> String {
    format!("{SPRITE_URL_BASE}/{id}.png")
}

pub fn cry_url(name: &str) -> String {
    let slug: String = name
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .collect();
    format!("{CRY_URL_BASE}/{slug}.mp3")
}

/// Trailing numeric path segment of a resource URL.
pub fn id_from_url(url: &str) -> Option<u32> {
    url.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError>;

    /// Drops any cached copy of `url`; called when its body failed to parse.
    async fn evict(&self, _url: &str) {}
}

pub struct HttpSource {
    client: reqwest::Client,
    cache_dir: Option<PathBuf>,
}

impl HttpSource {
    pub fn new(timeout: Option<Duration>, cache_dir: Option<PathBuf>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| TransportError::Request(err.to_string()))?;
        Ok(Self { client, cache_dir })
    }

    pub fn default_cache_dir() -> Option<PathBuf> {
        dirs_next::cache_dir().map(|dir| dir.join("pipdex"))
    }

    fn cache_path(&self, url: &str) -> Option<PathBuf> {
        let root = self.cache_dir.as_ref()?;
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let digest = hex::encode(hasher.finalize());
        Some(root.join("http").join(digest))
    }
}

#[async_trait]
impl Transport for HttpSource {
    async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let cache_path = self.cache_path(url);
        if let Some(path) = cache_path.as_deref() {
            if let Some(bytes) = read_cache(path).await {
                return Ok(bytes);
            }
        }

        let response = self.client.get(url).send().await.map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        let bytes = response.bytes().await.map_err(request_error)?.to_vec();
        if let Some(path) = cache_path.as_deref() {
            write_cache(path, &bytes).await;
        }
        Ok(bytes)
    }

    async fn evict(&self, url: &str) {
        if let Some(path) = self.cache_path(url) {
            if fs::remove_file(&path).await.is_ok() {
                tracing::debug!(%url, "evicted cached response");
            }
        }
    }
}

fn request_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Request(err.to_string())
    }
}

async fn read_cache(path: &Path) -> Option<Vec<u8>> {
    fs::read(path).await.ok()
}

async fn write_cache(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent).await;
    }
    if let Err(err) = fs::write(path, bytes).await {
        tracing::warn!(path = %path.display(), %err, "failed to write response cache");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_from_url_reads_trailing_segment() {
        assert_eq!(
            id_from_url("https://pokeapi.co/api/v2/pokemon-species/25/"),
            Some(25)
        );
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon-species/6"), Some(6));
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon-species/pikachu/"), None);
    }

    #[test]
    fn cry_url_strips_punctuation() {
        assert_eq!(
            cry_url("mr-mime"),
            "https://play.pokemonshowdown.com/audio/cries/mrmime.mp3"
        );
        assert_eq!(
            cry_url("Farfetch'd"),
            "https://play.pokemonshowdown.com/audio/cries/farfetchd.mp3"
        );
    }

    #[test]
    fn trigger_merges_detail_entries() {
        let details: Vec<EvolutionDetailResponse> = serde_json::from_value(serde_json::json!([
            { "min_level": null, "item": { "name": "thunder-stone", "url": "" },
              "trigger": { "name": "use-item", "url": "" }, "min_happiness": null },
            { "min_level": 36, "item": null,
              "trigger": { "name": "level-up", "url": "" }, "min_happiness": null }
        ]))
        .expect("details");
        let trigger = EvolutionTrigger::from_details(&details).expect("trigger");
        assert_eq!(trigger.min_level, Some(36));
        assert_eq!(trigger.item.as_deref(), Some("thunder-stone"));
        assert!(!trigger.trade);
        assert_eq!(EvolutionTrigger::from_details(&[]), None);
    }
}
