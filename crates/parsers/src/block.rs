use indexer_primitives::{unix_to_utc, unix_to_utc_date, Block, BlockExtra, ChainFamily, Withdrawal};
use indexer_rpc::raw::RawBlock;

use crate::{
    convert::{decimal, hex, opt_hex, opt_quantity, quantity, require},
    error::ParseError,
};

/// Normalizes a raw `eth_getBlockByNumber` payload into a [`Block`], using
/// `family` to select which [`BlockExtra`] variant to populate.
pub fn parse_block(family: ChainFamily, raw: RawBlock) -> Result<Block, ParseError> {
    let timestamp = quantity("timestamp", &raw.timestamp)?;

    let extra = match family {
        ChainFamily::Arbitrum => BlockExtra::Arbitrum {
            l1_block_number: quantity("l1BlockNumber", require("l1BlockNumber", &raw.l1_block_number)?)?,
            send_count: opt_quantity("sendCount", raw.send_count.as_deref())?,
            send_root: opt_hex("sendRoot", raw.send_root.as_deref())?,
        },
        ChainFamily::Ethereum => BlockExtra::Ethereum {
            blob_gas_used: opt_quantity("blobGasUsed", raw.blob_gas_used.as_deref())?,
            excess_blob_gas: opt_quantity("excessBlobGas", raw.excess_blob_gas.as_deref())?,
            parent_beacon_block_root: opt_hex("parentBeaconBlockRoot", raw.parent_beacon_block_root.as_deref())?,
            withdrawals: raw
                .withdrawals
                .unwrap_or_default()
                .into_iter()
                .map(|w| {
                    Ok(Withdrawal {
                        address: hex("withdrawals[].address", &w.address)?,
                        amount: quantity("withdrawals[].amount", &w.amount)?,
                        index: quantity("withdrawals[].index", &w.index)?,
                        validator_index: quantity("withdrawals[].validatorIndex", &w.validator_index)?,
                    })
                })
                .collect::<Result<Vec<_>, ParseError>>()?,
            withdrawals_root: opt_hex("withdrawalsRoot", raw.withdrawals_root.as_deref())?,
        },
        ChainFamily::ZkSync => BlockExtra::ZkSync {
            l1_batch_number: opt_quantity("l1BatchNumber", raw.l1_batch_number.as_deref())?,
            l1_batch_time: raw
                .l1_batch_timestamp
                .as_deref()
                .map(|v| quantity("l1BatchTimestamp", v))
                .transpose()?
                .map(unix_to_utc),
            seal_fields: raw
                .seal_fields
                .iter()
                .map(|sf| hex("sealFields[]", sf))
                .collect::<Result<Vec<_>, _>>()?,
        },
    };

    Ok(Block {
        base_fee_per_gas: opt_quantity("baseFeePerGas", raw.base_fee_per_gas.as_deref())?,
        block_hash: hex("hash", &raw.hash)?,
        block_number: quantity("number", &raw.number)?,
        block_date: unix_to_utc_date(timestamp),
        block_time: unix_to_utc(timestamp),
        difficulty: decimal("difficulty", &raw.difficulty)?,
        extra_data: Some(hex("extraData", &raw.extra_data)?),
        gas_limit: quantity("gasLimit", &raw.gas_limit)?,
        gas_used: quantity("gasUsed", &raw.gas_used)?,
        logs_bloom: hex("logsBloom", &raw.logs_bloom)?,
        miner: hex("miner", &raw.miner)?,
        mix_hash: hex("mixHash", &raw.mix_hash)?,
        nonce: hex("nonce", &raw.nonce)?,
        parent_hash: hex("parentHash", &raw.parent_hash)?,
        receipts_root: hex("receiptsRoot", &raw.receipts_root)?,
        sha3_uncles: hex("sha3Uncles", &raw.sha3_uncles)?,
        size: quantity("size", &raw.size)?,
        state_root: hex("stateRoot", &raw.state_root)?,
        total_difficulty: decimal("totalDifficulty", &raw.total_difficulty)?,
        transactions: raw
            .transactions
            .iter()
            .map(|tx| hex("transactions[].hash", &tx.hash))
            .collect::<Result<Vec<_>, _>>()?,
        transactions_root: hex("transactionsRoot", &raw.transactions_root)?,
        uncles: raw.uncles.iter().map(|u| hex("uncles[]", u)).collect::<Result<Vec<_>, _>>()?,
        extra,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_raw() -> serde_json::Value {
        serde_json::json!({
            "baseFeePerGas": "0x7",
            "difficulty": "0x0",
            "extraData": "0x",
            "gasLimit": "0x1c9c380",
            "gasUsed": "0x5208",
            "hash": "0xaa",
            "logsBloom": "0x00",
            "miner": "0xbb",
            "mixHash": "0xcc",
            "nonce": "0x0000000000000000",
            "number": "0x64",
            "parentHash": "0xdd",
            "receiptsRoot": "0xee",
            "sha3Uncles": "0xff",
            "size": "0x400",
            "stateRoot": "0x01",
            "timestamp": "0x6553f100",
            "totalDifficulty": "0x0",
            "transactions": [],
            "transactionsRoot": "0x02",
            "uncles": [],
        })
    }

    #[test]
    fn ethereum_block_parses_with_no_withdrawals() {
        let raw: RawBlock = serde_json::from_value(base_raw()).unwrap();
        let block = parse_block(ChainFamily::Ethereum, raw).unwrap();
        assert_eq!(block.block_number, 100);
        match block.extra {
            BlockExtra::Ethereum { withdrawals, .. } => assert!(withdrawals.is_empty()),
            _ => panic!("expected ethereum extra"),
        }
    }

    #[test]
    fn arbitrum_block_requires_l1_block_number() {
        let raw: RawBlock = serde_json::from_value(base_raw()).unwrap();
        assert!(parse_block(ChainFamily::Arbitrum, raw).is_err());
    }

    #[test]
    fn block_date_is_derived_from_timestamp() {
        let raw: RawBlock = serde_json::from_value(base_raw()).unwrap();
        let block = parse_block(ChainFamily::Ethereum, raw).unwrap();
        assert_eq!(block.block_date, block.block_time.date_naive());
    }
}
