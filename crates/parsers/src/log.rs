use indexer_primitives::{unix_to_utc, unix_to_utc_date, ChainFamily, Log, LogExtra};
use indexer_rpc::raw::RawLog;

use crate::{
    convert::{hex, opt_quantity, quantity},
    error::ParseError,
};

/// Normalizes a raw event log into a [`Log`].
///
/// Arbitrum and Ethereum logs carry no chain-specific fields, so `extra` is
/// `None` for both; only ZKsync-family logs populate [`LogExtra::ZkSync`].
pub fn parse_log(family: ChainFamily, raw: RawLog, block_timestamp: u64) -> Result<Log, ParseError> {
    let extra = match family {
        ChainFamily::Arbitrum | ChainFamily::Ethereum => None,
        ChainFamily::ZkSync => Some(LogExtra::ZkSync {
            l1_batch_number: opt_quantity("l1BatchNumber", raw.l1_batch_number.as_deref())?,
            log_type: raw.log_type.clone(),
            transaction_log_index: opt_quantity("transactionLogIndex", raw.transaction_log_index.as_deref())?,
        }),
    };

    Ok(Log {
        address: hex("address", &raw.address)?,
        block_hash: hex("blockHash", &raw.block_hash)?,
        block_number: quantity("blockNumber", &raw.block_number)?,
        block_date: unix_to_utc_date(block_timestamp),
        block_time: unix_to_utc(block_timestamp),
        data: hex("data", &raw.data)?,
        log_index: quantity("logIndex", &raw.log_index)?,
        removed: raw.removed,
        topics: raw.topics.iter().map(|t| hex("topics[]", t)).collect::<Result<Vec<_>, _>>()?,
        transaction_hash: hex("transactionHash", &raw.transaction_hash)?,
        transaction_index: quantity("transactionIndex", &raw.transaction_index)?,
        extra,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_log() -> serde_json::Value {
        serde_json::json!({
            "address": "0xaa",
            "blockHash": "0xbb",
            "blockNumber": "0x64",
            "data": "0x",
            "logIndex": "0x0",
            "removed": false,
            "topics": ["0xcc"],
            "transactionHash": "0xdd",
            "transactionIndex": "0x0",
        })
    }

    #[test]
    fn ethereum_log_has_no_extra() {
        let raw: RawLog = serde_json::from_value(base_log()).unwrap();
        let log = parse_log(ChainFamily::Ethereum, raw, 1_700_000_000).unwrap();
        assert!(log.extra.is_none());
    }

    #[test]
    fn zksync_log_populates_extra() {
        let mut json = base_log();
        json["l1BatchNumber"] = serde_json::json!("0x2a");
        let raw: RawLog = serde_json::from_value(json).unwrap();
        let log = parse_log(ChainFamily::ZkSync, raw, 1_700_000_000).unwrap();
        assert!(matches!(log.extra, Some(LogExtra::ZkSync { l1_batch_number: Some(42), .. })));
    }
}
