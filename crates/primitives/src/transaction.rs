use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::hex::HexData;

/// One entry of an EIP-2930 access list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessListEntry {
    /// Address granted warm access.
    pub address: HexData,
    /// Storage slots granted warm access under `address`.
    pub storage_keys: Vec<HexData>,
}

/// Chain-specific fields layered on top of the base transaction record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "chain_family", rename_all = "snake_case")]
pub enum TransactionExtra {
    /// Arbitrum-specific transaction fields.
    Arbitrum {
        /// Blob gas used, carried for wire-format parity with Ethereum;
        /// Arbitrum has no blob transactions so this is always `None`.
        blob_gas_used: Option<u64>,
        /// The L1 block number the batch containing this transaction posted in.
        l1_block_number: Option<u64>,
        /// Gas charged against the L1 data fee rather than L2 execution gas.
        gas_used_for_l1: Option<u64>,
    },
    /// Ethereum-specific transaction fields (EIP-2930/1559/4844).
    Ethereum {
        /// EIP-2930 access list; empty for legacy and EIP-1559 transactions.
        access_list: Vec<AccessListEntry>,
        /// Versioned hashes of the blobs this transaction carries (EIP-4844).
        blob_versioned_hashes: Vec<HexData>,
        /// Per-blob fee cap (EIP-4844).
        max_fee_per_blob_gas: Option<u64>,
        /// Per-gas fee cap (EIP-1559).
        max_fee_per_gas: Option<u64>,
        /// Per-gas priority fee cap (EIP-1559).
        max_priority_fee_per_gas: Option<u64>,
        /// Signature parity bit, the EIP-1559 successor to `v`.
        y_parity: Option<u64>,
    },
    /// ZKsync-family transaction fields.
    ZkSync {
        /// The L1 batch this transaction's block was anchored in.
        l1_batch_number: Option<u64>,
        /// Index of this transaction within its L1 batch.
        l1_batch_tx_index: Option<u64>,
        /// ZKsync always reports EIP-1559 fee fields, even for legacy-shaped
        /// transactions, so these are required rather than optional.
        max_fee_per_gas: u64,
        max_priority_fee_per_gas: u64,
        /// Merkle root reported for L1-originated transactions.
        root: Option<HexData>,
    },
}

/// A single normalized transaction, merged with its receipt, plus one
/// [`TransactionExtra`] variant for the chain family it was parsed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub block_hash: HexData,
    pub block_number: u64,
    pub block_date: NaiveDate,
    pub block_time: DateTime<Utc>,
    /// Absent on pre-EIP-155 legacy transactions.
    pub chain_id: Option<u64>,
    pub from_address: HexData,
    pub gas: u64,
    pub gas_price: u64,
    pub hash: HexData,
    pub input: HexData,
    pub nonce: u64,
    pub r: Option<HexData>,
    pub s: Option<HexData>,
    /// Absent for contract-creation transactions.
    pub to_address: Option<HexData>,
    pub transaction_index: u64,
    /// EIP-2718 transaction type (0 = legacy, 1 = EIP-2930, 2 = EIP-1559, ...).
    pub transaction_type: u64,
    pub v: Option<u64>,
    pub value: crate::decimal::Difficulty,

    // Fields merged in from the transaction receipt.
    /// `true` if the transaction succeeded, `false` if it reverted.
    pub status: bool,
    pub cumulative_gas_used: u64,
    pub effective_gas_price: u64,
    pub gas_used: u64,
    pub receipt_logs_bloom: HexData,
    /// Address of the contract created by this transaction, if any.
    pub contract_address: Option<HexData>,

    /// The chain-family-specific fields.
    pub extra: TransactionExtra,
}
