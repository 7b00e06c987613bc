use indexer_primitives::ChainFamily;
use indexer_rpc::raw::RawBlock;

/// Whether `raw` is not yet safe to parse because its chain-specific
/// L1-anchoring fields have not appeared.
///
/// ZKsync-family blocks gate on `l1BatchNumber`/`l1BatchTimestamp`; Arbitrum
/// gates on `l1BlockNumber`. Ethereum never gates. A gated block is not a
/// failure: the driver sleeps and refetches the same block number without
/// consuming a retry attempt.
pub fn is_gated(family: ChainFamily, raw: &RawBlock) -> bool {
    match family {
        ChainFamily::Ethereum => false,
        ChainFamily::Arbitrum => raw.l1_block_number.is_none(),
        ChainFamily::ZkSync => raw.l1_batch_number.is_none() || raw.l1_batch_timestamp.is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_block() -> RawBlock {
        serde_json::from_value(serde_json::json!({
            "difficulty": "0x0",
            "extraData": "0x",
            "gasLimit": "0x1",
            "gasUsed": "0x1",
            "hash": "0x01",
            "logsBloom": "0x00",
            "miner": "0x02",
            "mixHash": "0x03",
            "nonce": "0x00",
            "number": "0x1",
            "parentHash": "0x04",
            "receiptsRoot": "0x05",
            "sha3Uncles": "0x06",
            "size": "0x1",
            "stateRoot": "0x07",
            "timestamp": "0x1",
            "totalDifficulty": "0x0",
            "transactions": [],
            "transactionsRoot": "0x08",
            "uncles": [],
        }))
        .unwrap()
    }

    #[test]
    fn zksync_gates_on_missing_l1_batch_number() {
        assert!(is_gated(ChainFamily::ZkSync, &raw_block()));
    }

    #[test]
    fn arbitrum_gates_on_missing_l1_block_number() {
        assert!(is_gated(ChainFamily::Arbitrum, &raw_block()));
    }

    #[test]
    fn ethereum_never_gates() {
        assert!(!is_gated(ChainFamily::Ethereum, &raw_block()));
    }
}
