use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which storage backend persists the indexer's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// A local columnar file backend, one file per dataset per block range.
    Columnar,
    /// A day-partitioned warehouse backend.
    Warehouse,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Which backend to construct.
    pub kind: StorageKind,
    /// Base directory columnar files are written under, or the warehouse
    /// driver's local staging directory.
    pub root_dir: PathBuf,
    /// Warehouse-only: destination dataset/schema name. Ignored for
    /// [`StorageKind::Columnar`].
    #[serde(default)]
    pub warehouse_dataset: Option<String>,
}
