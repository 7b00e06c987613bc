#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]

//! Backend-agnostic dataset/table lifecycle, batched persistence, and
//! watermark queries.
//!
//! [`StorageManager`] is the single interface the driver persists through.
//! [`columnar::ColumnarBackend`] and [`warehouse::WarehouseBackend`] are its
//! two implementations; [`AnyStorageManager`] lets a process pick between
//! them at startup from config without the driver being generic over which
//! one it got.

pub mod columnar;
mod error;
mod manager;
pub mod schema;
pub mod warehouse;

use async_trait::async_trait;

pub use columnar::ColumnarBackend;
pub use error::StorageError;
pub use manager::{StorageManager, WritePolicy};
pub use schema::{CellValue, ColumnKind, ColumnSpec, Columnar, Nullability, Row};
pub use warehouse::{WarehouseBackend, WarehouseDriver, MAX_SUB_BATCH_ROWS};

/// The concrete backend a process constructs from config, boxed behind one
/// type so `indexer_indexer::Driver` does not need a type parameter per
/// backend kind.
pub enum AnyStorageManager {
    /// A local columnar-file backend.
    Columnar(ColumnarBackend),
    /// A day-partitioned warehouse backend.
    Warehouse(WarehouseBackend<Box<dyn WarehouseDriver>>),
}

#[async_trait]
impl StorageManager for AnyStorageManager {
    async fn create_dataset(&self, dataset: &str) -> Result<(), StorageError> {
        match self {
            Self::Columnar(backend) => backend.create_dataset(dataset).await,
            Self::Warehouse(backend) => backend.create_dataset(dataset).await,
        }
    }

    async fn create_table<T: Columnar + Send + Sync>(&self, dataset: &str) -> Result<(), StorageError> {
        match self {
            Self::Columnar(backend) => backend.create_table::<T>(dataset).await,
            Self::Warehouse(backend) => backend.create_table::<T>(dataset).await,
        }
    }

    async fn load_table<T: Columnar + Send + Sync>(
        &self,
        dataset: &str,
        rows: &[T],
        policy: WritePolicy,
        start_block: u64,
        end_block: u64,
    ) -> Result<(), StorageError> {
        match self {
            Self::Columnar(backend) => backend.load_table(dataset, rows, policy, start_block, end_block).await,
            Self::Warehouse(backend) => backend.load_table(dataset, rows, policy, start_block, end_block).await,
        }
    }

    async fn get_last_processed_block(&self, datasets: &[&str]) -> Result<u64, StorageError> {
        match self {
            Self::Columnar(backend) => backend.get_last_processed_block(datasets).await,
            Self::Warehouse(backend) => backend.get_last_processed_block(datasets).await,
        }
    }
}

#[async_trait]
impl WarehouseDriver for Box<dyn WarehouseDriver> {
    async fn create_dataset(&self, dataset: &str) -> Result<(), StorageError> {
        (**self).create_dataset(dataset).await
    }

    async fn create_table(&self, dataset: &str, table: &str, schema: &[ColumnSpec]) -> Result<(), StorageError> {
        (**self).create_table(dataset, table, schema).await
    }

    async fn write_partition(
        &self,
        dataset: &str,
        table: &str,
        block_date: &str,
        policy: WritePolicy,
        rows: &[Row],
    ) -> Result<(), StorageError> {
        (**self).write_partition(dataset, table, block_date, policy, rows).await
    }

    async fn max_block_number(&self, dataset: &str, table: &str) -> Result<Option<u64>, StorageError> {
        (**self).max_block_number(dataset, table).await
    }
}
