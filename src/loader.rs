//! Bulk catalog fetch: index, then detail → species → evolution per entry.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tokio::task::{self, JoinSet};

use crate::api::{
    self, DetailRecord, EvolutionChainResponse, EvolutionNode, IndexResponse, NamedResource,
    SpeciesRecord, Transport,
};
use crate::assemble::{self, AssembledEntry};
use crate::error::{AssemblyError, FetchError, FetchStage, LoadError, TransportError};
use crate::evolution;
use crate::state::Catalog;

pub const DEFAULT_CONCURRENCY: usize = 12;

/// What to do when one entry's fetch chain fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Any failure aborts the whole load.
    #[default]
    AllOrNothing,
    /// Failed entries are dropped and reported alongside the catalog.
    Isolate,
}

#[derive(Clone, Debug)]
pub struct LoadOptions {
    pub api_base: String,
    pub limit: usize,
    pub concurrency: usize,
    pub request_timeout: Option<Duration>,
    pub policy: FailurePolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            api_base: api::API_BASE.to_string(),
            limit: api::CATALOG_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            request_timeout: None,
            policy: FailurePolicy::AllOrNothing,
        }
    }
}

/// Raw responses for one catalog entry.
#[derive(Clone, Debug)]
pub struct RawEntry {
    pub detail: DetailRecord,
    pub species: SpeciesRecord,
    pub evolution_root: Option<EvolutionNode>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryFailure {
    pub name: String,
    pub error: LoadError,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogLoad {
    pub catalog: Catalog,
    pub failures: Vec<EntryFailure>,
}

pub async fn load_catalog(
    transport: Arc<dyn Transport>,
    options: &LoadOptions,
) -> Result<CatalogLoad, LoadError> {
    let index = fetch_index(transport.as_ref(), options).await?;

    let load = match options.policy {
        FailurePolicy::AllOrNothing => {
            let entries = fetch_all(transport, options, index)
                .await?
                .into_iter()
                .map(|(_, entry)| resolve_entry(entry))
                .collect();
            CatalogLoad {
                catalog: assemble::assemble(entries)?,
                failures: Vec::new(),
            }
        }
        FailurePolicy::Isolate => {
            let mut creatures = Vec::with_capacity(index.len());
            let mut failures = Vec::new();
            let mut seen = HashSet::with_capacity(index.len());
            for (name, result) in fetch_each(transport, options, index).await {
                let creature = result
                    .map_err(LoadError::from)
                    .and_then(|entry| {
                        assemble::assemble_creature(resolve_entry(entry)).map_err(LoadError::from)
                    })
                    .and_then(|creature| {
                        // first occurrence of an id wins
                        if seen.insert(creature.id) {
                            Ok(creature)
                        } else {
                            Err(AssemblyError::new(&creature.name, "id").into())
                        }
                    });
                match creature {
                    Ok(creature) => creatures.push(creature),
                    Err(error) => {
                        tracing::warn!(%name, %error, "skipping catalog entry");
                        failures.push(EntryFailure { name, error });
                    }
                }
            }
            CatalogLoad {
                catalog: assemble::build_catalog(creatures)?,
                failures,
            }
        }
    };

    tracing::info!(
        creatures = load.catalog.len(),
        categories = load.catalog.categories.len(),
        failed = load.failures.len(),
        "catalog loaded"
    );
    Ok(load)
}

/// Fetches every entry's raw responses, in index order, failing on the first error.
pub async fn fetch_entries(
    transport: Arc<dyn Transport>,
    options: &LoadOptions,
) -> Result<Vec<RawEntry>, FetchError> {
    let index = fetch_index(transport.as_ref(), options).await?;
    let entries = fetch_all(transport, options, index).await?;
    Ok(entries.into_iter().map(|(_, entry)| entry).collect())
}

pub async fn fetch_index(
    transport: &dyn Transport,
    options: &LoadOptions,
) -> Result<Vec<NamedResource>, FetchError> {
    let url = api::index_url(&options.api_base, options.limit);
    let response: IndexResponse =
        fetch_json(transport, &url, FetchStage::Index, options.request_timeout).await?;
    tracing::info!(entries = response.results.len(), "catalog index loaded");
    Ok(response.results)
}

pub async fn fetch_entry(
    transport: &dyn Transport,
    entry: &NamedResource,
    timeout: Option<Duration>,
) -> Result<RawEntry, FetchError> {
    let detail: DetailRecord = fetch_json(transport, &entry.url, FetchStage::Detail, timeout).await?;
    let species: SpeciesRecord =
        fetch_json(transport, &detail.species.url, FetchStage::Species, timeout).await?;
    let evolution_root = match species.evolution_chain.as_ref() {
        Some(chain) => {
            let response: EvolutionChainResponse =
                fetch_json(transport, &chain.url, FetchStage::Evolution, timeout).await?;
            let root = EvolutionNode::try_from(&response.chain)
                .map_err(|reason| FetchError::new(FetchStage::Evolution, &chain.url, reason))?;
            Some(root)
        }
        None => None,
    };
    Ok(RawEntry {
        detail,
        species,
        evolution_root,
    })
}

fn resolve_entry(entry: RawEntry) -> AssembledEntry {
    let evolution = entry
        .evolution_root
        .as_ref()
        .map(evolution::resolve_chain)
        .unwrap_or_default();
    AssembledEntry {
        detail: entry.detail,
        species: entry.species,
        evolution,
    }
}

type EntryResult = (String, Result<RawEntry, FetchError>);

/// Barrier over every entry chain: returns on the first failure, dropping
/// (and so aborting) the chains still in flight.
async fn fetch_all(
    transport: Arc<dyn Transport>,
    options: &LoadOptions,
    index: Vec<NamedResource>,
) -> Result<Vec<(String, RawEntry)>, FetchError> {
    let total = index.len();
    let (mut join_set, tasks) = spawn_chains(transport, options, index);
    let mut slots: Vec<Option<(String, RawEntry)>> = vec![None; total];
    while let Some(joined) = join_set.join_next().await {
        let (position, (name, result)) = joined.map_err(|err| join_error(err, &tasks).1)?;
        match result {
            Ok(entry) => slots[position] = Some((name, entry)),
            Err(error) => {
                tracing::warn!(%name, %error, "catalog entry failed; aborting load");
                return Err(error);
            }
        }
    }
    Ok(slots.into_iter().flatten().collect())
}

async fn fetch_each(
    transport: Arc<dyn Transport>,
    options: &LoadOptions,
    index: Vec<NamedResource>,
) -> Vec<EntryResult> {
    let total = index.len();
    let (mut join_set, tasks) = spawn_chains(transport, options, index);
    let mut slots: Vec<Option<EntryResult>> = vec![None; total];
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((position, result)) => slots[position] = Some(result),
            Err(err) => {
                let (task, error) = join_error(err, &tasks);
                if let Some(task) = task {
                    tracing::warn!(name = %task.name, %error, "catalog entry task failed");
                    slots[task.position] = Some((task.name.clone(), Err(error)));
                }
            }
        }
    }
    slots.into_iter().flatten().collect()
}

/// Index entry a spawned chain is working on, keyed by its task id.
struct EntryTask {
    position: usize,
    name: String,
    url: String,
}

type EntryTasks = HashMap<task::Id, EntryTask>;

fn spawn_chains(
    transport: Arc<dyn Transport>,
    options: &LoadOptions,
    index: Vec<NamedResource>,
) -> (JoinSet<(usize, EntryResult)>, EntryTasks) {
    let semaphore = Arc::new(Semaphore::new(options.concurrency.max(1)));
    let timeout = options.request_timeout;
    let mut join_set = JoinSet::new();
    let mut tasks = HashMap::with_capacity(index.len());
    for (position, entry) in index.into_iter().enumerate() {
        let transport = transport.clone();
        let semaphore = semaphore.clone();
        let task = EntryTask {
            position,
            name: entry.name.clone(),
            url: entry.url.clone(),
        };
        let handle = join_set.spawn(async move {
            let result = match semaphore.acquire_owned().await {
                Ok(_permit) => fetch_entry(transport.as_ref(), &entry, timeout).await,
                Err(_) => Err(FetchError::new(
                    FetchStage::Detail,
                    &entry.url,
                    "fetch semaphore closed",
                )),
            };
            (position, (entry.name, result))
        });
        tasks.insert(handle.id(), task);
    }
    (join_set, tasks)
}

async fn fetch_json<T: DeserializeOwned>(
    transport: &dyn Transport,
    url: &str,
    stage: FetchStage,
    timeout: Option<Duration>,
) -> Result<T, FetchError> {
    let request = transport.get(url);
    let bytes = match timeout {
        Some(limit) => tokio::time::timeout(limit, request)
            .await
            .unwrap_or(Err(TransportError::Timeout)),
        None => request.await,
    }
    .map_err(|err| FetchError::new(stage, url, err))?;

    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(value),
        Err(err) => {
            transport.evict(url).await;
            Err(FetchError::new(stage, url, err))
        }
    }
}

/// Maps a panicked or cancelled chain back to the entry it was fetching.
fn join_error(err: task::JoinError, tasks: &EntryTasks) -> (Option<&EntryTask>, FetchError) {
    let task = tasks.get(&err.id());
    let url = task.map(|task| task.url.as_str()).unwrap_or_default();
    let error = FetchError::new(FetchStage::Detail, url, format!("fetch task failed: {err}"));
    (task, error)
}
