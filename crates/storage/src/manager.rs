use async_trait::async_trait;

use crate::{error::StorageError, schema::Columnar};

/// How `load_table` should behave when the target already has rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// Error out rather than touch existing data.
    Fail,
    /// Atomically remove prior contents and write only the new rows.
    Replace,
    /// Add the new rows to whatever is already there.
    Append,
}

/// The uniform interface the indexing loop persists through, independent of
/// whether the concrete backend is local columnar files or a partitioned
/// warehouse table.
///
/// Every method is idempotent or additive by design: `create_dataset` and
/// `create_table` may be called every startup without special-casing
/// "already exists", and `load_table` under [`WritePolicy::Append`] is safe
/// to call again with the same batch after a crash, because the watermark
/// this trait also exposes is what the driver consults to decide what
/// still needs to be (re)sent.
#[async_trait]
pub trait StorageManager: Send + Sync {
    /// Creates the dataset namespace (directory, schema, etc.) if absent.
    async fn create_dataset(&self, dataset: &str) -> Result<(), StorageError>;

    /// Creates the dataset's table for `T`'s schema if absent. Backends that
    /// partition by `block_date` must configure that partitioning here.
    async fn create_table<T: Columnar + Send + Sync>(&self, dataset: &str) -> Result<(), StorageError>;

    /// Persists `rows` (spanning block numbers `[start_block, end_block]`)
    /// into `dataset`, returning only once the write is durable.
    async fn load_table<T: Columnar + Send + Sync>(
        &self,
        dataset: &str,
        rows: &[T],
        policy: WritePolicy,
        start_block: u64,
        end_block: u64,
    ) -> Result<(), StorageError>;

    /// The minimum, across `datasets`, of each dataset's maximum persisted
    /// `block_number` — the most-lagging dataset sets the resumable
    /// watermark for every other dataset too.
    async fn get_last_processed_block(&self, datasets: &[&str]) -> Result<u64, StorageError>;
}
