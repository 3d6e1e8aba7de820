use std::fmt;

use serde::{Deserialize, Serialize};

/// Which request in an entry's fetch chain failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FetchStage {
    Index,
    Detail,
    Species,
    Evolution,
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FetchStage::Index => "index",
            FetchStage::Detail => "detail",
            FetchStage::Species => "species",
            FetchStage::Evolution => "evolution",
        };
        f.write_str(label)
    }
}

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("timed out")]
    Timeout,
}

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[error("{stage} fetch failed for {url}: {reason}")]
pub struct FetchError {
    pub stage: FetchStage,
    pub url: String,
    pub reason: String,
}

impl FetchError {
    pub fn new(stage: FetchStage, url: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            stage,
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

/// A required field was missing from an otherwise successful response.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[error("{creature}: missing required field `{field}`")]
pub struct AssemblyError {
    pub creature: String,
    pub field: String,
}

impl AssemblyError {
    pub fn new(creature: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            creature: creature.into(),
            field: field.into(),
        }
    }
}

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}

#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch cry: {0}")]
    Fetch(#[from] TransportError),
    #[error("playback failed: {0}")]
    Playback(String),
}
