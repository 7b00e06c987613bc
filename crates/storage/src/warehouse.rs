use std::collections::BTreeMap;

use async_trait::async_trait;
use indexer_primitives::ChainFamily;

use crate::{
    error::StorageError,
    manager::{StorageManager, WritePolicy},
    schema::{ColumnSpec, Columnar, Row},
};

/// Warehouse batches are capped at this many rows; a `load_table` call
/// spanning more rows than this is sent to the driver as several
/// sub-batches instead of one.
pub const MAX_SUB_BATCH_ROWS: usize = 10_000;

/// The actual cloud-warehouse client (BigQuery, Snowflake, ...) this
/// backend delegates to.
///
/// Kept as a trait at the same seam [`crate::columnar::ColumnarBackend`]
/// uses the Parquet crate at: the concrete wire protocol to a managed
/// warehouse is out of this crate's scope, but the day-partitioning and
/// sub-batching logic above it is not.
#[async_trait]
pub trait WarehouseDriver: Send + Sync {
    /// Ensures the destination schema/dataset namespace exists.
    async fn create_dataset(&self, dataset: &str) -> Result<(), StorageError>;

    /// Ensures `dataset.table` exists, partitioned by `block_date`.
    async fn create_table(&self, dataset: &str, table: &str, schema: &[ColumnSpec]) -> Result<(), StorageError>;

    /// Appends, replaces, or fails depending on `policy`, one partition
    /// (`block_date`) worth of rows, never more than [`MAX_SUB_BATCH_ROWS`].
    async fn write_partition(
        &self,
        dataset: &str,
        table: &str,
        block_date: &str,
        policy: WritePolicy,
        rows: &[Row],
    ) -> Result<(), StorageError>;

    /// The maximum `block_number` currently stored in `dataset.table`, or
    /// `None` if the table has no rows yet.
    async fn max_block_number(&self, dataset: &str, table: &str) -> Result<Option<u64>, StorageError>;
}

/// A day-partitioned warehouse backend.
///
/// `load_table` groups rows by their `block_date` column and hands each
/// group to the driver in chunks of at most [`MAX_SUB_BATCH_ROWS`] rows,
/// since most warehouse load APIs cap request payload size.
pub struct WarehouseBackend<D: WarehouseDriver> {
    driver: D,
    chain: ChainFamily,
}

impl<D: WarehouseDriver> WarehouseBackend<D> {
    /// Builds a backend delegating to `driver`.
    pub fn new(driver: D, chain: ChainFamily) -> Self {
        Self { driver, chain }
    }
}

fn group_by_date(rows: Vec<Row>) -> BTreeMap<String, Vec<Row>> {
    let mut groups: BTreeMap<String, Vec<Row>> = BTreeMap::new();
    for row in rows {
        let date = row
            .iter()
            .find(|(name, _)| *name == "block_date")
            .and_then(|(_, value)| match value {
                crate::schema::CellValue::Date(d) => Some(d.clone()),
                _ => None,
            })
            .unwrap_or_default();
        groups.entry(date).or_default().push(row);
    }
    groups
}

#[async_trait]
impl<D: WarehouseDriver> StorageManager for WarehouseBackend<D> {
    async fn create_dataset(&self, dataset: &str) -> Result<(), StorageError> {
        self.driver.create_dataset(dataset).await
    }

    async fn create_table<T: Columnar + Send + Sync>(&self, dataset: &str) -> Result<(), StorageError> {
        let schema = T::schema(self.chain);
        self.driver.create_table(dataset, dataset, &schema).await
    }

    async fn load_table<T: Columnar + Send + Sync>(
        &self,
        dataset: &str,
        rows: &[T],
        policy: WritePolicy,
        _start_block: u64,
        _end_block: u64,
    ) -> Result<(), StorageError> {
        let converted: Vec<Row> = rows.iter().map(Columnar::to_row).collect();
        for (date, date_rows) in group_by_date(converted) {
            for chunk in date_rows.chunks(MAX_SUB_BATCH_ROWS) {
                self.driver.write_partition(dataset, dataset, &date, policy, chunk).await?;
            }
        }
        Ok(())
    }

    async fn get_last_processed_block(&self, datasets: &[&str]) -> Result<u64, StorageError> {
        let mut min_max: Option<u64> = None;
        for dataset in datasets {
            let max = self.driver.max_block_number(dataset, dataset).await?.unwrap_or(0);
            min_max = Some(match min_max {
                Some(current) => current.min(max),
                None => max,
            });
        }
        Ok(min_max.unwrap_or(0))
    }
}
