use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{decimal::Difficulty, hex::HexData};

/// A single beacon-chain withdrawal credited in an Ethereum block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    /// Withdrawal credentials recipient.
    pub address: HexData,
    /// Amount in Gwei.
    pub amount: u64,
    /// Monotonically increasing withdrawal index.
    pub index: u64,
    /// Index of the validator the withdrawal is for.
    pub validator_index: u64,
}

/// Chain-specific fields layered on top of the base block record.
///
/// Exactly one variant is populated per record, selected by the chain the
/// indexer is configured for (see `indexer_primitives::ChainType::family`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "chain_family", rename_all = "snake_case")]
pub enum BlockExtra {
    /// Arbitrum-specific block fields.
    Arbitrum {
        /// The L1 block number this L2 block was produced against.
        l1_block_number: u64,
        /// Number of L2-to-L1 messages sent in this block, if reported.
        send_count: Option<u64>,
        /// Root of the outbox Merkle tree after this block, if reported.
        send_root: Option<HexData>,
    },
    /// Ethereum-specific block fields (post-Cancun).
    Ethereum {
        /// Total blob gas consumed by blob transactions in this block.
        blob_gas_used: Option<u64>,
        /// Running excess blob gas used for blob base fee computation.
        excess_blob_gas: Option<u64>,
        /// Root of the beacon chain block this execution block descends from.
        parent_beacon_block_root: Option<HexData>,
        /// Beacon-chain withdrawals processed in this block.
        withdrawals: Vec<Withdrawal>,
        /// Root of the withdrawals list.
        withdrawals_root: Option<HexData>,
    },
    /// ZKsync-family block fields (also used by Cronos zkEVM, Zero, and
    /// ZKsync Sepolia).
    ZkSync {
        /// The L1 batch this block is anchored in.
        ///
        /// Absent until the sequencer commits the batch to L1; see the
        /// driver's L1-anchoring gate in `indexer_indexer`.
        l1_batch_number: Option<u64>,
        /// UTC time the L1 batch was sealed.
        l1_batch_time: Option<DateTime<Utc>>,
        /// Raw seal fields reported by the node, in wire order.
        seal_fields: Vec<HexData>,
    },
}

/// A single normalized block, with base fields common to every EVM chain
/// plus one [`BlockExtra`] variant for the chain family it was parsed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// EIP-1559 base fee; absent on pre-London chains.
    pub base_fee_per_gas: Option<u64>,
    /// Block hash.
    pub block_hash: HexData,
    /// Block number.
    pub block_number: u64,
    /// Calendar date component of `block_time`; the storage backends'
    /// partition key.
    pub block_date: NaiveDate,
    /// UTC time the block was produced, derived from the wire timestamp.
    pub block_time: DateTime<Utc>,
    /// Proof-of-work difficulty. Zero on proof-of-stake chains but still
    /// present on the wire.
    pub difficulty: Difficulty,
    pub extra_data: Option<HexData>,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub logs_bloom: HexData,
    pub miner: HexData,
    pub mix_hash: HexData,
    pub nonce: HexData,
    pub parent_hash: HexData,
    pub receipts_root: HexData,
    pub sha3_uncles: HexData,
    pub size: u64,
    pub state_root: HexData,
    /// Cumulative chain difficulty up to and including this block.
    pub total_difficulty: Difficulty,
    /// Hashes of every transaction included in the block, in block order.
    ///
    /// Every transaction record in the same batch with this `block_number`
    /// must have its hash appear here, and vice versa.
    pub transactions: Vec<HexData>,
    pub transactions_root: HexData,
    pub uncles: Vec<HexData>,
    /// The chain-family-specific fields.
    pub extra: BlockExtra,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(extra: BlockExtra) -> Block {
        Block {
            base_fee_per_gas: Some(7),
            block_hash: HexData::normalize("0x01").unwrap(),
            block_number: 100,
            block_date: crate::timestamp::unix_to_utc_date(1_700_000_000),
            block_time: crate::timestamp::unix_to_utc(1_700_000_000),
            difficulty: Difficulty::from(0),
            extra_data: None,
            gas_limit: 30_000_000,
            gas_used: 21_000,
            logs_bloom: HexData::from_bytes(&[0u8; 256]),
            miner: HexData::normalize("0x02").unwrap(),
            mix_hash: HexData::normalize("0x03").unwrap(),
            nonce: HexData::normalize("0x0000000000000000").unwrap(),
            parent_hash: HexData::normalize("0x04").unwrap(),
            receipts_root: HexData::normalize("0x05").unwrap(),
            sha3_uncles: HexData::normalize("0x06").unwrap(),
            size: 1024,
            state_root: HexData::normalize("0x07").unwrap(),
            total_difficulty: Difficulty::from(0),
            transactions: vec![],
            transactions_root: HexData::normalize("0x08").unwrap(),
            uncles: vec![],
            extra,
        }
    }

    #[test]
    fn zksync_block_round_trips_through_json() {
        let block = sample(BlockExtra::ZkSync {
            l1_batch_number: Some(42),
            l1_batch_time: Some(crate::timestamp::unix_to_utc(1_700_000_100)),
            seal_fields: vec![HexData::normalize("0xaa").unwrap()],
        });
        let json = serde_json::to_string(&block).unwrap();
        let back: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(block, back);
    }

    #[test]
    fn block_date_matches_block_time_date_component() {
        let block = sample(BlockExtra::Arbitrum {
            l1_block_number: 1,
            send_count: None,
            send_root: None,
        });
        assert_eq!(block.block_date, block.block_time.date_naive());
    }
}
