#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]

//! Configuration loading and validation for the EVM indexer.
//!
//! A process indexes exactly one chain, so [`Config::validate`] rejects
//! anything that looks like more than one active chain section, the way the
//! original indexer's loader counted uncommented `chain:` lines before
//! Dynaconf ever got to parse the file.

mod retry;
mod storage;

pub use retry::RetryConfig;
pub use storage::{StorageConfig, StorageKind};

use std::{path::Path, time::Duration};

use indexer_primitives::ChainType;
use serde::{Deserialize, Serialize};

/// Top-level indexer configuration, loaded from a single TOML file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// The chain this process indexes.
    pub chain: ChainConfig,
    /// Retry policy for RPC calls.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Storage backend configuration.
    pub storage: StorageConfig,
    /// Dataset names this process persists; must be a subset of `["blocks",
    /// "transactions", "logs"]`.
    pub active_datasets: Vec<String>,
    /// Driver-loop tuning knobs.
    #[serde(default)]
    pub indexer: IndexerConfig,
}

/// Chain identity and RPC endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainConfig {
    /// The chain name, matched against [`ChainType`]'s canonical names.
    pub name: String,
    /// RPC endpoints, tried in round-robin order. Must be non-empty.
    pub rpc_urls: Vec<url::Url>,
}

/// Driver-loop tuning knobs, matching the original indexer's in-code
/// constants (`buffer = 10`, `hard_limit = 100`, `batch_size = 100`).
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct IndexerConfig {
    /// Records buffered per dataset before a batch is persisted.
    pub batch_size: usize,
    /// Extra blocks of safety margin kept behind `hard_limit`.
    pub tip_buffer: u64,
    /// Blocks behind the chain tip the indexer refuses to cross.
    pub tip_hard_limit: u64,
    /// Delay between polls while the chain tip has not advanced, or while
    /// waiting on a chain-specific L1-anchoring gate.
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            tip_buffer: 10,
            tip_hard_limit: 100,
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// A config file failed to load or did not pass validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read from disk.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// The path that was read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file's contents were not valid TOML, or did not match [`Config`]'s shape.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// The path that was parsed.
        path: String,
        /// The underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
    /// `chain.name` is not a chain this indexer recognizes.
    #[error(transparent)]
    UnknownChain(#[from] indexer_primitives::UnknownChainType),
    /// `chain.rpc_urls` was empty.
    #[error("chain.rpc_urls must list at least one endpoint")]
    NoRpcUrls,
    /// `active_datasets` named something other than blocks, transactions, or logs.
    #[error("unrecognized dataset name: {0:?}")]
    UnknownDataset(String),
    /// `active_datasets` was empty.
    #[error("active_datasets must list at least one dataset")]
    NoActiveDatasets,
}

const KNOWN_DATASETS: &[&str] = &["blocks", "transactions", "logs"];

impl Config {
    /// Loads and validates a config file from `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates chain identity, endpoint presence, and dataset selection.
    ///
    /// Parsing `chain.name` against [`ChainType`] is itself the "only one
    /// active chain" check: the original Python loader scanned for multiple
    /// uncommented `chain:` keys, but TOML's object model makes that class
    /// of ambiguity structurally impossible, so this validates the
    /// equivalent invariant — the configured name resolves to exactly one
    /// known chain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let _chain: ChainType = self.chain.name.parse()?;
        if self.chain.rpc_urls.is_empty() {
            return Err(ConfigError::NoRpcUrls);
        }
        if self.active_datasets.is_empty() {
            return Err(ConfigError::NoActiveDatasets);
        }
        for dataset in &self.active_datasets {
            if !KNOWN_DATASETS.contains(&dataset.as_str()) {
                return Err(ConfigError::UnknownDataset(dataset.clone()));
            }
        }
        Ok(())
    }
}
