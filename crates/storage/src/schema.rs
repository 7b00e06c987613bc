use indexer_primitives::{Block, BlockExtra, ChainFamily, Log, LogExtra, Transaction, TransactionExtra};

/// One cell's value, independent of which Arrow array type it ends up in.
///
/// Decimals are carried as their base-10 string form rather than a native
/// Arrow decimal type: Arrow's decimal types are fixed-precision, and
/// `total_difficulty` has already outgrown `u128`-backed precision once in
/// this chain's history, so a string column is the only representation that
/// cannot silently truncate.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// An unsigned integer column value.
    UInt64(Option<u64>),
    /// A UTC unix-seconds timestamp.
    Timestamp(i64),
    /// A plain calendar date, `YYYY-MM-DD`.
    Date(String),
    /// An arbitrary-precision decimal, as a base-10 string.
    Decimal(String),
    /// A UTF-8 string column value (hex blobs, addresses, free text).
    Utf8(Option<String>),
    /// A boolean column value.
    Bool(bool),
    /// A column of repeated UTF-8 values (topic lists, transaction hash lists).
    Utf8List(Vec<String>),
}

/// Whether a column is allowed to be absent from a row (nullable), or must
/// always be present.
///
/// Mirrors the schema-derivation rule "nullable field -> nullable column,
/// sequence field -> repeated column, else required column" by construction:
/// each per-type `schema()` function below assigns this by hand instead of
/// reading it off a runtime type descriptor, since Rust's type system
/// already enforces `Option<T>` at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nullability {
    /// The column must be present on every row.
    Required,
    /// The column may be absent.
    Nullable,
    /// The column holds zero or more repeated values.
    Repeated,
}

/// The Arrow-level type a column materializes as.
///
/// A column's name alone does not determine its type: `nonce` is a hex
/// string on [`Block`] (an 8-byte PoW nonce) but a plain integer on
/// [`Transaction`] (the account nonce), so each `schema()` function states
/// the kind explicitly per column rather than inferring it from the name.
/// This is the per-column half of the "reflection over declared fields"
/// schema-derivation rule; [`Nullability`] is the other half.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// A native unsigned 64-bit integer column.
    UInt64,
    /// A UTC unix-seconds timestamp column.
    Timestamp,
    /// A plain calendar date column, stored as `YYYY-MM-DD` text.
    Date,
    /// An arbitrary-precision decimal, stored as base-10 text.
    Decimal,
    /// A UTF-8 text column (hex blobs, addresses, free text).
    Utf8,
    /// A boolean column.
    Bool,
}

/// One column of a dataset's schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    /// Column name, matching the field name on the wire record.
    pub name: &'static str,
    /// Nullability / repetition.
    pub nullability: Nullability,
    /// The Arrow-level type this column materializes as. Ignored for
    /// [`Nullability::Repeated`] columns, which are always a list of UTF-8.
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub(crate) const fn new(name: &'static str, nullability: Nullability, kind: ColumnKind) -> Self {
        Self { name, nullability, kind }
    }
}

/// A single row: the column values a record produces, in the same order as
/// the corresponding [`ColumnSpec`] list.
pub type Row = Vec<(&'static str, CellValue)>;

/// Schema and row-conversion for one of the three record kinds.
///
/// `difficulty` and `total_difficulty` are always forced to
/// [`CellValue::Decimal`] regardless of family, matching the one explicit
/// numeric-column override the schema-derivation logic makes.
pub trait Columnar {
    /// The dataset's column list for the given chain family.
    fn schema(family: ChainFamily) -> Vec<ColumnSpec>;
    /// This record's values, one per column in `schema`'s order.
    fn to_row(&self) -> Row;
}

use ColumnKind::{Bool as K_Bool, Date as K_Date, Decimal as K_Decimal, Timestamp as K_Timestamp, UInt64 as K_UInt64, Utf8 as K_Utf8};
use Nullability::{Nullable, Repeated, Required};

const BASE_BLOCK_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("base_fee_per_gas", Nullable, K_UInt64),
    ColumnSpec::new("block_hash", Required, K_Utf8),
    ColumnSpec::new("block_number", Required, K_UInt64),
    ColumnSpec::new("block_date", Required, K_Date),
    ColumnSpec::new("block_time", Required, K_Timestamp),
    ColumnSpec::new("difficulty", Required, K_Decimal),
    ColumnSpec::new("extra_data", Nullable, K_Utf8),
    ColumnSpec::new("gas_limit", Required, K_UInt64),
    ColumnSpec::new("gas_used", Required, K_UInt64),
    ColumnSpec::new("logs_bloom", Required, K_Utf8),
    ColumnSpec::new("miner", Required, K_Utf8),
    ColumnSpec::new("mix_hash", Required, K_Utf8),
    ColumnSpec::new("nonce", Required, K_Utf8),
    ColumnSpec::new("parent_hash", Required, K_Utf8),
    ColumnSpec::new("receipts_root", Required, K_Utf8),
    ColumnSpec::new("sha3_uncles", Required, K_Utf8),
    ColumnSpec::new("size", Required, K_UInt64),
    ColumnSpec::new("state_root", Required, K_Utf8),
    ColumnSpec::new("total_difficulty", Required, K_Decimal),
    ColumnSpec::new("transactions", Repeated, K_Utf8),
    ColumnSpec::new("transactions_root", Required, K_Utf8),
    ColumnSpec::new("uncles", Repeated, K_Utf8),
];

impl Columnar for Block {
    fn schema(family: ChainFamily) -> Vec<ColumnSpec> {
        let mut columns = BASE_BLOCK_COLUMNS.to_vec();
        columns.extend(match family {
            ChainFamily::Arbitrum => vec![
                ColumnSpec::new("l1_block_number", Required, K_UInt64),
                ColumnSpec::new("send_count", Nullable, K_UInt64),
                ColumnSpec::new("send_root", Nullable, K_Utf8),
            ],
            ChainFamily::Ethereum => vec![
                ColumnSpec::new("blob_gas_used", Nullable, K_UInt64),
                ColumnSpec::new("excess_blob_gas", Nullable, K_UInt64),
                ColumnSpec::new("parent_beacon_block_root", Nullable, K_Utf8),
                ColumnSpec::new("withdrawals_root", Nullable, K_Utf8),
            ],
            ChainFamily::ZkSync => vec![
                ColumnSpec::new("l1_batch_number", Nullable, K_UInt64),
                ColumnSpec::new("l1_batch_time", Nullable, K_Timestamp),
                ColumnSpec::new("seal_fields", Repeated, K_Utf8),
            ],
        });
        columns
    }

    fn to_row(&self) -> Row {
        let mut row: Row = vec![
            ("base_fee_per_gas", CellValue::UInt64(self.base_fee_per_gas)),
            ("block_hash", CellValue::Utf8(Some(self.block_hash.as_str().to_owned()))),
            ("block_number", CellValue::UInt64(Some(self.block_number))),
            ("block_date", CellValue::Date(self.block_date.to_string())),
            ("block_time", CellValue::Timestamp(self.block_time.timestamp())),
            ("difficulty", CellValue::Decimal(self.difficulty.to_string())),
            ("extra_data", CellValue::Utf8(self.extra_data.as_ref().map(|h| h.as_str().to_owned()))),
            ("gas_limit", CellValue::UInt64(Some(self.gas_limit))),
            ("gas_used", CellValue::UInt64(Some(self.gas_used))),
            ("logs_bloom", CellValue::Utf8(Some(self.logs_bloom.as_str().to_owned()))),
            ("miner", CellValue::Utf8(Some(self.miner.as_str().to_owned()))),
            ("mix_hash", CellValue::Utf8(Some(self.mix_hash.as_str().to_owned()))),
            ("nonce", CellValue::Utf8(Some(self.nonce.as_str().to_owned()))),
            ("parent_hash", CellValue::Utf8(Some(self.parent_hash.as_str().to_owned()))),
            ("receipts_root", CellValue::Utf8(Some(self.receipts_root.as_str().to_owned()))),
            ("sha3_uncles", CellValue::Utf8(Some(self.sha3_uncles.as_str().to_owned()))),
            ("size", CellValue::UInt64(Some(self.size))),
            ("state_root", CellValue::Utf8(Some(self.state_root.as_str().to_owned()))),
            ("total_difficulty", CellValue::Decimal(self.total_difficulty.to_string())),
            ("transactions", CellValue::Utf8List(self.transactions.iter().map(|h| h.as_str().to_owned()).collect())),
            ("transactions_root", CellValue::Utf8(Some(self.transactions_root.as_str().to_owned()))),
            ("uncles", CellValue::Utf8List(self.uncles.iter().map(|h| h.as_str().to_owned()).collect())),
        ];
        match &self.extra {
            BlockExtra::Arbitrum { l1_block_number, send_count, send_root } => {
                row.push(("l1_block_number", CellValue::UInt64(Some(*l1_block_number))));
                row.push(("send_count", CellValue::UInt64(*send_count)));
                row.push(("send_root", CellValue::Utf8(send_root.as_ref().map(|h| h.as_str().to_owned()))));
            }
            BlockExtra::Ethereum { blob_gas_used, excess_blob_gas, parent_beacon_block_root, withdrawals_root, .. } => {
                row.push(("blob_gas_used", CellValue::UInt64(*blob_gas_used)));
                row.push(("excess_blob_gas", CellValue::UInt64(*excess_blob_gas)));
                row.push((
                    "parent_beacon_block_root",
                    CellValue::Utf8(parent_beacon_block_root.as_ref().map(|h| h.as_str().to_owned())),
                ));
                row.push(("withdrawals_root", CellValue::Utf8(withdrawals_root.as_ref().map(|h| h.as_str().to_owned()))));
            }
            BlockExtra::ZkSync { l1_batch_number, l1_batch_time, seal_fields } => {
                row.push(("l1_batch_number", CellValue::UInt64(*l1_batch_number)));
                row.push((
                    "l1_batch_time",
                    match l1_batch_time {
                        Some(t) => CellValue::Timestamp(t.timestamp()),
                        None => CellValue::UInt64(None),
                    },
                ));
                row.push(("seal_fields", CellValue::Utf8List(seal_fields.iter().map(|h| h.as_str().to_owned()).collect())));
            }
        }
        row
    }
}

const BASE_TRANSACTION_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("block_hash", Required, K_Utf8),
    ColumnSpec::new("block_number", Required, K_UInt64),
    ColumnSpec::new("block_date", Required, K_Date),
    ColumnSpec::new("block_time", Required, K_Timestamp),
    ColumnSpec::new("chain_id", Nullable, K_UInt64),
    ColumnSpec::new("from_address", Required, K_Utf8),
    ColumnSpec::new("gas", Required, K_UInt64),
    ColumnSpec::new("gas_price", Required, K_UInt64),
    ColumnSpec::new("hash", Required, K_Utf8),
    ColumnSpec::new("input", Required, K_Utf8),
    ColumnSpec::new("nonce", Required, K_UInt64),
    ColumnSpec::new("r", Nullable, K_Utf8),
    ColumnSpec::new("s", Nullable, K_Utf8),
    ColumnSpec::new("to_address", Nullable, K_Utf8),
    ColumnSpec::new("transaction_index", Required, K_UInt64),
    ColumnSpec::new("transaction_type", Required, K_UInt64),
    ColumnSpec::new("v", Nullable, K_UInt64),
    ColumnSpec::new("value", Required, K_Decimal),
    ColumnSpec::new("status", Required, K_Bool),
    ColumnSpec::new("cumulative_gas_used", Required, K_UInt64),
    ColumnSpec::new("effective_gas_price", Required, K_UInt64),
    ColumnSpec::new("gas_used", Required, K_UInt64),
    ColumnSpec::new("receipt_logs_bloom", Required, K_Utf8),
    ColumnSpec::new("contract_address", Nullable, K_Utf8),
];

impl Columnar for Transaction {
    fn schema(family: ChainFamily) -> Vec<ColumnSpec> {
        let mut columns = BASE_TRANSACTION_COLUMNS.to_vec();
        columns.extend(match family {
            ChainFamily::Arbitrum => vec![
                ColumnSpec::new("blob_gas_used", Nullable, K_UInt64),
                ColumnSpec::new("l1_block_number", Nullable, K_UInt64),
                ColumnSpec::new("gas_used_for_l1", Nullable, K_UInt64),
            ],
            ChainFamily::Ethereum => vec![
                ColumnSpec::new("access_list", Repeated, K_Utf8),
                ColumnSpec::new("blob_versioned_hashes", Repeated, K_Utf8),
                ColumnSpec::new("max_fee_per_blob_gas", Nullable, K_UInt64),
                ColumnSpec::new("max_fee_per_gas", Nullable, K_UInt64),
                ColumnSpec::new("max_priority_fee_per_gas", Nullable, K_UInt64),
                ColumnSpec::new("y_parity", Nullable, K_UInt64),
            ],
            ChainFamily::ZkSync => vec![
                ColumnSpec::new("l1_batch_number", Nullable, K_UInt64),
                ColumnSpec::new("l1_batch_tx_index", Nullable, K_UInt64),
                ColumnSpec::new("max_fee_per_gas", Required, K_UInt64),
                ColumnSpec::new("max_priority_fee_per_gas", Required, K_UInt64),
                ColumnSpec::new("root", Nullable, K_Utf8),
            ],
        });
        columns
    }

    fn to_row(&self) -> Row {
        let mut row: Row = vec![
            ("block_hash", CellValue::Utf8(Some(self.block_hash.as_str().to_owned()))),
            ("block_number", CellValue::UInt64(Some(self.block_number))),
            ("block_date", CellValue::Date(self.block_date.to_string())),
            ("block_time", CellValue::Timestamp(self.block_time.timestamp())),
            ("chain_id", CellValue::UInt64(self.chain_id)),
            ("from_address", CellValue::Utf8(Some(self.from_address.as_str().to_owned()))),
            ("gas", CellValue::UInt64(Some(self.gas))),
            ("gas_price", CellValue::UInt64(Some(self.gas_price))),
            ("hash", CellValue::Utf8(Some(self.hash.as_str().to_owned()))),
            ("input", CellValue::Utf8(Some(self.input.as_str().to_owned()))),
            ("nonce", CellValue::UInt64(Some(self.nonce))),
            ("r", CellValue::Utf8(self.r.as_ref().map(|h| h.as_str().to_owned()))),
            ("s", CellValue::Utf8(self.s.as_ref().map(|h| h.as_str().to_owned()))),
            ("to_address", CellValue::Utf8(self.to_address.as_ref().map(|h| h.as_str().to_owned()))),
            ("transaction_index", CellValue::UInt64(Some(self.transaction_index))),
            ("transaction_type", CellValue::UInt64(Some(self.transaction_type))),
            ("v", CellValue::UInt64(self.v)),
            ("value", CellValue::Decimal(self.value.to_string())),
            ("status", CellValue::Bool(self.status)),
            ("cumulative_gas_used", CellValue::UInt64(Some(self.cumulative_gas_used))),
            ("effective_gas_price", CellValue::UInt64(Some(self.effective_gas_price))),
            ("gas_used", CellValue::UInt64(Some(self.gas_used))),
            ("receipt_logs_bloom", CellValue::Utf8(Some(self.receipt_logs_bloom.as_str().to_owned()))),
            ("contract_address", CellValue::Utf8(self.contract_address.as_ref().map(|h| h.as_str().to_owned()))),
        ];
        match &self.extra {
            TransactionExtra::Arbitrum { blob_gas_used, l1_block_number, gas_used_for_l1 } => {
                row.push(("blob_gas_used", CellValue::UInt64(*blob_gas_used)));
                row.push(("l1_block_number", CellValue::UInt64(*l1_block_number)));
                row.push(("gas_used_for_l1", CellValue::UInt64(*gas_used_for_l1)));
            }
            TransactionExtra::Ethereum {
                access_list,
                blob_versioned_hashes,
                max_fee_per_blob_gas,
                max_fee_per_gas,
                max_priority_fee_per_gas,
                y_parity,
            } => {
                row.push((
                    "access_list",
                    CellValue::Utf8List(access_list.iter().map(|e| e.address.as_str().to_owned()).collect()),
                ));
                row.push((
                    "blob_versioned_hashes",
                    CellValue::Utf8List(blob_versioned_hashes.iter().map(|h| h.as_str().to_owned()).collect()),
                ));
                row.push(("max_fee_per_blob_gas", CellValue::UInt64(*max_fee_per_blob_gas)));
                row.push(("max_fee_per_gas", CellValue::UInt64(*max_fee_per_gas)));
                row.push(("max_priority_fee_per_gas", CellValue::UInt64(*max_priority_fee_per_gas)));
                row.push(("y_parity", CellValue::UInt64(*y_parity)));
            }
            TransactionExtra::ZkSync { l1_batch_number, l1_batch_tx_index, max_fee_per_gas, max_priority_fee_per_gas, root } => {
                row.push(("l1_batch_number", CellValue::UInt64(*l1_batch_number)));
                row.push(("l1_batch_tx_index", CellValue::UInt64(*l1_batch_tx_index)));
                row.push(("max_fee_per_gas", CellValue::UInt64(Some(*max_fee_per_gas))));
                row.push(("max_priority_fee_per_gas", CellValue::UInt64(Some(*max_priority_fee_per_gas))));
                row.push(("root", CellValue::Utf8(root.as_ref().map(|h| h.as_str().to_owned()))));
            }
        }
        row
    }
}

const BASE_LOG_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("address", Required, K_Utf8),
    ColumnSpec::new("block_hash", Required, K_Utf8),
    ColumnSpec::new("block_number", Required, K_UInt64),
    ColumnSpec::new("block_date", Required, K_Date),
    ColumnSpec::new("block_time", Required, K_Timestamp),
    ColumnSpec::new("data", Required, K_Utf8),
    ColumnSpec::new("log_index", Required, K_UInt64),
    ColumnSpec::new("removed", Required, K_Bool),
    ColumnSpec::new("topics", Repeated, K_Utf8),
    ColumnSpec::new("transaction_hash", Required, K_Utf8),
    ColumnSpec::new("transaction_index", Required, K_UInt64),
];

impl Columnar for Log {
    fn schema(family: ChainFamily) -> Vec<ColumnSpec> {
        let mut columns = BASE_LOG_COLUMNS.to_vec();
        if family == ChainFamily::ZkSync {
            columns.extend(vec![
                ColumnSpec::new("l1_batch_number", Nullable, K_UInt64),
                ColumnSpec::new("log_type", Nullable, K_Utf8),
                ColumnSpec::new("transaction_log_index", Nullable, K_UInt64),
            ]);
        }
        columns
    }

    fn to_row(&self) -> Row {
        let mut row: Row = vec![
            ("address", CellValue::Utf8(Some(self.address.as_str().to_owned()))),
            ("block_hash", CellValue::Utf8(Some(self.block_hash.as_str().to_owned()))),
            ("block_number", CellValue::UInt64(Some(self.block_number))),
            ("block_date", CellValue::Date(self.block_date.to_string())),
            ("block_time", CellValue::Timestamp(self.block_time.timestamp())),
            ("data", CellValue::Utf8(Some(self.data.as_str().to_owned()))),
            ("log_index", CellValue::UInt64(Some(self.log_index))),
            ("removed", CellValue::Bool(self.removed)),
            ("topics", CellValue::Utf8List(self.topics.iter().map(|t| t.as_str().to_owned()).collect())),
            ("transaction_hash", CellValue::Utf8(Some(self.transaction_hash.as_str().to_owned()))),
            ("transaction_index", CellValue::UInt64(Some(self.transaction_index))),
        ];
        if let Some(LogExtra::ZkSync { l1_batch_number, log_type, transaction_log_index }) = &self.extra {
            row.push(("l1_batch_number", CellValue::UInt64(*l1_batch_number)));
            row.push(("log_type", CellValue::Utf8(log_type.clone())));
            row.push(("transaction_log_index", CellValue::UInt64(*transaction_log_index)));
        }
        row
    }
}
