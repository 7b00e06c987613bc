use std::{fs::File, path::PathBuf, sync::Arc};

use arrow::{
    array::{ArrayRef, BooleanArray, Int64Array, ListBuilder, StringArray, StringBuilder, UInt64Array},
    datatypes::{DataType, Field, Fields, Schema},
    record_batch::RecordBatch,
};
use async_trait::async_trait;
use indexer_primitives::ChainFamily;
use parquet::arrow::{arrow_reader::ParquetRecordBatchReaderBuilder, ArrowWriter};

use crate::{
    error::StorageError,
    manager::{StorageManager, WritePolicy},
    schema::{CellValue, Columnar, ColumnKind, Nullability},
};

/// A columnar-file backend partitioned by block range: every `load_table`
/// call writes or rewrites one file named
/// `<dataset>_<start_block>_<end_block>.columnar` under
/// `<root_dir>/<chain>/<dataset>/`.
///
/// The on-disk format is Apache Parquet; the file extension stays
/// `.columnar` so the backend can be swapped for a different columnar
/// encoding without an on-disk rename.
pub struct ColumnarBackend {
    root_dir: PathBuf,
    chain: ChainFamily,
    chain_name: &'static str,
}

impl ColumnarBackend {
    /// Builds a backend rooted at `root_dir/<chain_name>`.
    pub fn new(root_dir: PathBuf, chain: ChainFamily, chain_name: &'static str) -> Self {
        Self { root_dir, chain, chain_name }
    }

    fn dataset_dir(&self, dataset: &str) -> PathBuf {
        self.root_dir.join(self.chain_name).join(dataset)
    }

    fn file_path(&self, dataset: &str, start_block: u64, end_block: u64) -> PathBuf {
        self.dataset_dir(dataset).join(format!("{dataset}_{start_block}_{end_block}.columnar"))
    }
}

fn arrow_field(spec: &crate::schema::ColumnSpec) -> Field {
    let (data_type, nullable) = match spec.nullability {
        Nullability::Required => (arrow_type_for(spec.kind), false),
        Nullability::Nullable => (arrow_type_for(spec.kind), true),
        Nullability::Repeated => {
            (DataType::List(Arc::new(Field::new("item", DataType::Utf8, true))), true)
        }
    };
    Field::new(spec.name, data_type, nullable)
}

/// Maps a column's declared [`ColumnKind`] to its Arrow type.
///
/// Dispatch happens on the explicit per-column kind, not the column name:
/// `nonce` means a hex PoW value on `Block` and a plain integer on
/// `Transaction`, so the name alone can't determine the type.
fn arrow_type_for(kind: ColumnKind) -> DataType {
    match kind {
        ColumnKind::Bool => DataType::Boolean,
        ColumnKind::Timestamp => DataType::Timestamp(arrow::datatypes::TimeUnit::Second, None),
        ColumnKind::UInt64 => DataType::UInt64,
        ColumnKind::Decimal | ColumnKind::Date | ColumnKind::Utf8 => DataType::Utf8,
    }
}

/// Builds an Arrow [`Schema`] from a [`Columnar`] type's column list.
pub fn arrow_schema<T: Columnar>(family: ChainFamily) -> Schema {
    let fields: Fields = T::schema(family).iter().map(arrow_field).collect();
    Schema::new(fields)
}

fn build_array(spec: &crate::schema::ColumnSpec, rows: &[crate::schema::Row]) -> Result<ArrayRef, StorageError> {
    let values: Vec<Option<&CellValue>> =
        rows.iter().map(|row| row.iter().find(|(name, _)| *name == spec.name).map(|(_, v)| v)).collect();

    if spec.nullability == Nullability::Repeated {
        let mut builder = ListBuilder::new(StringBuilder::new());
        for value in &values {
            match value {
                Some(CellValue::Utf8List(items)) => {
                    for item in items {
                        builder.values().append_value(item);
                    }
                    builder.append(true);
                }
                _ => builder.append(true),
            }
        }
        return Ok(Arc::new(builder.finish()));
    }

    match arrow_type_for(spec.kind) {
        DataType::Boolean => {
            let bools: Vec<Option<bool>> = values
                .iter()
                .map(|v| match v {
                    Some(CellValue::Bool(b)) => Some(*b),
                    _ => None,
                })
                .collect();
            Ok(Arc::new(BooleanArray::from(bools)))
        }
        DataType::Timestamp(_, _) => {
            let ts: Vec<Option<i64>> = values
                .iter()
                .map(|v| match v {
                    Some(CellValue::Timestamp(t)) => Some(*t),
                    _ => None,
                })
                .collect();
            Ok(Arc::new(Int64Array::from(ts)))
        }
        DataType::UInt64 => {
            let ints: Vec<Option<u64>> = values
                .iter()
                .map(|v| match v {
                    Some(CellValue::UInt64(n)) => *n,
                    _ => None,
                })
                .collect();
            Ok(Arc::new(UInt64Array::from(ints)))
        }
        _ => {
            let strings: Vec<Option<String>> = values
                .iter()
                .map(|v| match v {
                    Some(CellValue::Utf8(s)) => s.clone(),
                    Some(CellValue::Decimal(d)) => Some(d.clone()),
                    Some(CellValue::Date(d)) => Some(d.clone()),
                    _ => None,
                })
                .collect();
            Ok(Arc::new(StringArray::from(strings)))
        }
    }
}

fn build_batch<T: Columnar>(family: ChainFamily, rows: &[T]) -> Result<RecordBatch, StorageError> {
    let spec = T::schema(family);
    let schema = Arc::new(arrow_schema::<T>(family));
    let converted: Vec<crate::schema::Row> = rows.iter().map(Columnar::to_row).collect();
    let columns =
        spec.iter().map(|s| build_array(s, &converted)).collect::<Result<Vec<ArrayRef>, StorageError>>()?;
    RecordBatch::try_new(schema, columns).map_err(StorageError::Arrow)
}

#[async_trait]
impl StorageManager for ColumnarBackend {
    async fn create_dataset(&self, dataset: &str) -> Result<(), StorageError> {
        let path = self.dataset_dir(dataset);
        std::fs::create_dir_all(&path).map_err(|source| StorageError::Io { path: path.display().to_string(), source })
    }

    async fn create_table<T: Columnar + Send + Sync>(&self, dataset: &str) -> Result<(), StorageError> {
        // Parquet files are self-describing: the schema travels with the
        // data written by the first `load_table` call, so there is nothing
        // to pre-create beyond the dataset directory.
        self.create_dataset(dataset).await
    }

    async fn load_table<T: Columnar + Send + Sync>(
        &self,
        dataset: &str,
        rows: &[T],
        policy: WritePolicy,
        start_block: u64,
        end_block: u64,
    ) -> Result<(), StorageError> {
        let path = self.file_path(dataset, start_block, end_block);
        if path.exists() && policy == WritePolicy::Fail {
            return Err(StorageError::AlreadyExists(path.display().to_string()));
        }

        let batch = build_batch(self.chain, rows)?;

        let combined = if path.exists() && policy == WritePolicy::Append {
            let file = File::open(&path).map_err(|source| StorageError::Io { path: path.display().to_string(), source })?;
            let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
            let mut batches = vec![];
            for existing in reader {
                batches.push(existing?);
            }
            batches.push(batch);
            batches
        } else {
            vec![batch]
        };

        let file = File::create(&path).map_err(|source| StorageError::Io { path: path.display().to_string(), source })?;
        let mut writer = ArrowWriter::try_new(file, combined[0].schema(), None)?;
        for batch in &combined {
            writer.write(batch)?;
        }
        writer.close()?;
        Ok(())
    }

    async fn get_last_processed_block(&self, datasets: &[&str]) -> Result<u64, StorageError> {
        let mut min_max: Option<u64> = None;
        for dataset in datasets {
            let dir = self.dataset_dir(dataset);
            if !dir.exists() {
                return Ok(0);
            }
            let mut max_block = 0u64;
            for entry in std::fs::read_dir(&dir).map_err(|source| StorageError::Io { path: dir.display().to_string(), source })? {
                let entry = entry.map_err(|source| StorageError::Io { path: dir.display().to_string(), source })?;
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some("columnar") {
                    continue;
                }
                if let Some(end) = parse_end_block(&path) {
                    max_block = max_block.max(end);
                }
            }
            min_max = Some(match min_max {
                Some(current) => current.min(max_block),
                None => max_block,
            });
        }
        Ok(min_max.unwrap_or(0))
    }
}

fn parse_end_block(path: &std::path::Path) -> Option<u64> {
    let stem = path.file_stem()?.to_str()?;
    let end = stem.rsplit('_').next()?;
    end.parse().ok()
}
