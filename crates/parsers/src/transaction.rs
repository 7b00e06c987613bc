use indexer_primitives::{
    parse_hex_difficulty, unix_to_utc, unix_to_utc_date, AccessListEntry, ChainFamily, Transaction,
    TransactionExtra,
};
use indexer_rpc::raw::{RawReceipt, RawTransaction};

use crate::{
    convert::{hex, opt_hex, opt_quantity, quantity, require},
    error::ParseError,
};

/// Normalizes a raw transaction and its merged receipt into a [`Transaction`].
///
/// `block_timestamp` comes from the enclosing block: neither
/// `eth_getTransactionByHash` nor `eth_getTransactionReceipt` report a
/// timestamp of their own.
pub fn parse_transaction(
    family: ChainFamily,
    raw: RawTransaction,
    receipt: RawReceipt,
    block_timestamp: u64,
) -> Result<Transaction, ParseError> {
    let extra = match family {
        ChainFamily::Arbitrum => TransactionExtra::Arbitrum {
            blob_gas_used: opt_quantity("blobGasUsed", receipt.blob_gas_used.as_deref())?,
            l1_block_number: opt_quantity("l1BlockNumber", receipt.l1_block_number.as_deref())?,
            gas_used_for_l1: opt_quantity("gasUsedForL1", receipt.gas_used_for_l1.as_deref())?,
        },
        ChainFamily::Ethereum => TransactionExtra::Ethereum {
            access_list: raw
                .access_list
                .iter()
                .map(|entry| {
                    Ok(AccessListEntry {
                        address: hex("accessList[].address", &entry.address)?,
                        storage_keys: entry
                            .storage_keys
                            .iter()
                            .map(|k| hex("accessList[].storageKeys[]", k))
                            .collect::<Result<Vec<_>, _>>()?,
                    })
                })
                .collect::<Result<Vec<_>, ParseError>>()?,
            blob_versioned_hashes: raw
                .blob_versioned_hashes
                .iter()
                .map(|h| hex("blobVersionedHashes[]", h))
                .collect::<Result<Vec<_>, _>>()?,
            max_fee_per_blob_gas: opt_quantity("maxFeePerBlobGas", raw.max_fee_per_blob_gas.as_deref())?,
            max_fee_per_gas: opt_quantity("maxFeePerGas", raw.max_fee_per_gas.as_deref())?,
            max_priority_fee_per_gas: opt_quantity(
                "maxPriorityFeePerGas",
                raw.max_priority_fee_per_gas.as_deref(),
            )?,
            y_parity: opt_quantity("yParity", raw.y_parity.as_deref())?,
        },
        ChainFamily::ZkSync => TransactionExtra::ZkSync {
            l1_batch_number: opt_quantity("l1BatchNumber", raw.l1_batch_number.as_deref())?,
            l1_batch_tx_index: opt_quantity("l1BatchTxIndex", raw.l1_batch_tx_index.as_deref())?,
            max_fee_per_gas: quantity("maxFeePerGas", require("maxFeePerGas", &raw.max_fee_per_gas)?)?,
            max_priority_fee_per_gas: quantity(
                "maxPriorityFeePerGas",
                require("maxPriorityFeePerGas", &raw.max_priority_fee_per_gas)?,
            )?,
            root: opt_hex("root", receipt.root.as_deref())?,
        },
    };

    Ok(Transaction {
        block_hash: hex("blockHash", &raw.block_hash)?,
        block_number: quantity("blockNumber", &raw.block_number)?,
        block_date: unix_to_utc_date(block_timestamp),
        block_time: unix_to_utc(block_timestamp),
        chain_id: opt_quantity("chainId", raw.chain_id.as_deref())?,
        from_address: hex("from", &raw.from)?,
        gas: quantity("gas", &raw.gas)?,
        gas_price: quantity("gasPrice", &raw.gas_price)?,
        hash: hex("hash", &raw.hash)?,
        input: hex("input", &raw.input)?,
        nonce: quantity("nonce", &raw.nonce)?,
        r: opt_hex("r", raw.r.as_deref())?,
        s: opt_hex("s", raw.s.as_deref())?,
        to_address: opt_hex("to", raw.to.as_deref())?,
        transaction_index: quantity("transactionIndex", &raw.transaction_index)?,
        transaction_type: quantity("type", &raw.transaction_type)?,
        v: opt_quantity("v", raw.v.as_deref())?,
        value: parse_hex_difficulty(&raw.value).map_err(|source| ParseError::InvalidHex { field: "value", source })?,

        status: &receipt.status == "0x1",
        cumulative_gas_used: quantity("cumulativeGasUsed", &receipt.cumulative_gas_used)?,
        effective_gas_price: quantity("effectiveGasPrice", &receipt.effective_gas_price)?,
        gas_used: quantity("gasUsed", &receipt.gas_used)?,
        receipt_logs_bloom: hex("logsBloom", &receipt.logs_bloom)?,
        contract_address: opt_hex("contractAddress", receipt.contract_address.as_deref())?,

        extra,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_tx() -> serde_json::Value {
        serde_json::json!({
            "blockHash": "0xaa",
            "blockNumber": "0x64",
            "chainId": "0x1",
            "from": "0xbb",
            "gas": "0x5208",
            "gasPrice": "0x3b9aca00",
            "hash": "0xcc",
            "input": "0x",
            "nonce": "0x5",
            "r": "0xdd",
            "s": "0xee",
            "to": "0xff",
            "transactionIndex": "0x0",
            "type": "0x2",
            "v": "0x1",
            "value": "0x0",
        })
    }

    fn base_receipt(status: &str) -> serde_json::Value {
        serde_json::json!({
            "status": status,
            "cumulativeGasUsed": "0x5208",
            "effectiveGasPrice": "0x3b9aca00",
            "gasUsed": "0x5208",
            "logsBloom": "0x00",
            "logs": [],
            "contractAddress": null,
        })
    }

    #[test]
    fn reverted_status_decodes_to_false() {
        let tx: RawTransaction = serde_json::from_value(base_tx()).unwrap();
        let receipt: RawReceipt = serde_json::from_value(base_receipt("0x0")).unwrap();
        let parsed = parse_transaction(ChainFamily::Ethereum, tx, receipt, 1_700_000_000).unwrap();
        assert!(!parsed.status);
    }

    #[test]
    fn zksync_requires_fee_fields() {
        let tx: RawTransaction = serde_json::from_value(base_tx()).unwrap();
        let receipt: RawReceipt = serde_json::from_value(base_receipt("0x1")).unwrap();
        assert!(parse_transaction(ChainFamily::ZkSync, tx, receipt, 1_700_000_000).is_err());
    }

    #[test]
    fn contract_creation_has_no_to_address() {
        let mut raw = base_tx();
        raw["to"] = serde_json::Value::Null;
        let tx: RawTransaction = serde_json::from_value(raw).unwrap();
        let mut receipt_json = base_receipt("0x1");
        receipt_json["contractAddress"] = serde_json::json!("0x1234");
        let receipt: RawReceipt = serde_json::from_value(receipt_json).unwrap();
        let parsed = parse_transaction(ChainFamily::Ethereum, tx, receipt, 1_700_000_000).unwrap();
        assert!(parsed.to_address.is_none());
        assert!(parsed.contract_address.is_some());
    }
}
