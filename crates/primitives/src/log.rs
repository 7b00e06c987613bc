use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::hex::HexData;

/// Chain-specific fields layered on top of the base log record.
///
/// Arbitrum and Ethereum logs carry no fields beyond the base record, so
/// there is no variant for them; `extra` is simply `None` in that case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "chain_family", rename_all = "snake_case")]
pub enum LogExtra {
    /// ZKsync-family log fields.
    ZkSync {
        /// The L1 batch this log's block was anchored in.
        l1_batch_number: Option<u64>,
        /// Node-reported classification of the log (e.g. "mined").
        log_type: Option<String>,
        /// Index of the log within its transaction, as distinct from
        /// `log_index`, which counts across the whole block.
        transaction_log_index: Option<u64>,
    },
}

/// A single normalized event log.
///
/// Unlike [`crate::Block`] and [`crate::Transaction`], `extra` is optional:
/// Arbitrum and Ethereum logs have no chain-specific fields at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub address: HexData,
    pub block_hash: HexData,
    pub block_number: u64,
    pub block_date: NaiveDate,
    pub block_time: DateTime<Utc>,
    pub data: HexData,
    /// Position of this log within the block, across all transactions.
    pub log_index: u64,
    /// `true` if the log's block was later orphaned by a reorg.
    pub removed: bool,
    pub topics: Vec<HexData>,
    pub transaction_hash: HexData,
    pub transaction_index: u64,
    /// The chain-family-specific fields, absent for Arbitrum and Ethereum.
    pub extra: Option<LogExtra>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(extra: Option<LogExtra>) -> Log {
        Log {
            address: HexData::normalize("0x01").unwrap(),
            block_hash: HexData::normalize("0x02").unwrap(),
            block_number: 100,
            block_date: crate::timestamp::unix_to_utc_date(1_700_000_000),
            block_time: crate::timestamp::unix_to_utc(1_700_000_000),
            data: HexData::normalize("0x").unwrap(),
            log_index: 0,
            removed: false,
            topics: vec![HexData::normalize("0x03").unwrap()],
            transaction_hash: HexData::normalize("0x04").unwrap(),
            transaction_index: 0,
            extra,
        }
    }

    #[test]
    fn ethereum_log_has_no_extra() {
        let log = sample(None);
        let json = serde_json::to_string(&log).unwrap();
        let back: Log = serde_json::from_str(&json).unwrap();
        assert_eq!(log, back);
    }

    #[test]
    fn zksync_log_round_trips_through_json() {
        let log = sample(Some(LogExtra::ZkSync {
            l1_batch_number: Some(42),
            log_type: Some("mined".to_owned()),
            transaction_log_index: Some(0),
        }));
        let json = serde_json::to_string(&log).unwrap();
        let back: Log = serde_json::from_str(&json).unwrap();
        assert_eq!(log, back);
    }
}
