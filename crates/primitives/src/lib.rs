#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]

//! Chain-aware record types shared by the EVM indexer.
//!
//! This crate has no knowledge of RPC transports or storage backends: it only
//! defines the normalized, per-chain record model (block, transaction, log)
//! that the parser layer produces and the storage layer persists.

mod chain;
mod decimal;
mod hex;
mod timestamp;

pub mod block;
pub mod log;
pub mod transaction;

pub use chain::{ChainFamily, ChainType, UnknownChainType};
pub use decimal::{parse_hex_difficulty, Difficulty};
pub use hex::{parse_hex_u64, HexData, HexParseError};
pub use timestamp::{unix_to_utc, unix_to_utc_date};

pub use block::{Block, BlockExtra, Withdrawal};
pub use log::{Log, LogExtra};
pub use transaction::{AccessListEntry, Transaction, TransactionExtra};

/// One of the three record families the indexing loop buffers and persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// A block header plus its chain-specific extensions.
    Block,
    /// A transaction merged with its receipt.
    Transaction,
    /// A single event log.
    Log,
}

impl RecordKind {
    /// The active-dataset name this record kind is persisted under.
    pub const fn dataset_name(&self) -> &'static str {
        match self {
            Self::Block => "blocks",
            Self::Transaction => "transactions",
            Self::Log => "logs",
        }
    }
}
