use serde::Deserialize;

/// `eth_getBlockByNumber` response, deserialized field-for-field off the
/// wire before any hex normalization or chain-family dispatch happens.
///
/// Every field that is itself a hex string stays a `String` at this layer;
/// `indexer_parsers` is the only place hex values get validated and
/// lowercased into [`indexer_primitives::HexData`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    pub base_fee_per_gas: Option<String>,
    pub difficulty: String,
    pub extra_data: String,
    pub gas_limit: String,
    pub gas_used: String,
    pub hash: String,
    pub logs_bloom: String,
    pub miner: String,
    pub mix_hash: String,
    pub nonce: String,
    pub number: String,
    pub parent_hash: String,
    pub receipts_root: String,
    pub sha3_uncles: String,
    pub size: String,
    pub state_root: String,
    pub timestamp: String,
    pub total_difficulty: String,
    /// Full transaction objects: the driver always calls
    /// `eth_getBlockByNumber` with the "full transaction objects" flag set,
    /// so this never decodes a bare hash list.
    pub transactions: Vec<RawTransaction>,
    pub transactions_root: String,
    pub uncles: Vec<String>,

    // Arbitrum
    pub l1_block_number: Option<String>,
    pub send_count: Option<String>,
    pub send_root: Option<String>,

    // Ethereum (post-Cancun)
    pub blob_gas_used: Option<String>,
    pub excess_blob_gas: Option<String>,
    pub parent_beacon_block_root: Option<String>,
    pub withdrawals: Option<Vec<RawWithdrawal>>,
    pub withdrawals_root: Option<String>,

    // ZKsync family
    pub l1_batch_number: Option<String>,
    pub l1_batch_timestamp: Option<String>,
    #[serde(default)]
    pub seal_fields: Vec<String>,
}

/// A beacon-chain withdrawal, as embedded in [`RawBlock::withdrawals`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWithdrawal {
    pub address: String,
    pub amount: String,
    pub index: String,
    pub validator_index: String,
}

/// `eth_getTransactionByHash` / the full-object entries of a block's
/// `transactions` array.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    pub block_hash: String,
    pub block_number: String,
    pub chain_id: Option<String>,
    pub from: String,
    pub gas: String,
    pub gas_price: String,
    pub hash: String,
    pub input: String,
    pub nonce: String,
    pub r: Option<String>,
    pub s: Option<String>,
    pub to: Option<String>,
    pub transaction_index: String,
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub v: Option<String>,
    pub value: String,

    // Ethereum
    #[serde(default)]
    pub access_list: Vec<RawAccessListEntry>,
    #[serde(default)]
    pub blob_versioned_hashes: Vec<String>,
    pub max_fee_per_blob_gas: Option<String>,
    pub max_fee_per_gas: Option<String>,
    pub max_priority_fee_per_gas: Option<String>,
    pub y_parity: Option<String>,

    // ZKsync
    pub l1_batch_number: Option<String>,
    pub l1_batch_tx_index: Option<String>,
}

/// One entry of an EIP-2930 access list, as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAccessListEntry {
    pub address: String,
    pub storage_keys: Vec<String>,
}

/// `eth_getTransactionReceipt` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReceipt {
    pub status: String,
    pub cumulative_gas_used: String,
    pub effective_gas_price: String,
    pub gas_used: String,
    pub logs_bloom: String,
    pub logs: Vec<RawLog>,
    pub contract_address: Option<String>,

    // Arbitrum
    pub blob_gas_used: Option<String>,
    pub l1_block_number: Option<String>,
    pub gas_used_for_l1: Option<String>,

    // ZKsync
    pub root: Option<String>,
}

/// A single entry of `eth_getTransactionReceipt`'s `logs` array, or of an
/// `eth_getLogs` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLog {
    pub address: String,
    pub block_hash: String,
    pub block_number: String,
    pub data: String,
    pub log_index: String,
    pub removed: bool,
    pub topics: Vec<String>,
    pub transaction_hash: String,
    pub transaction_index: String,

    // ZKsync
    pub l1_batch_number: Option<String>,
    pub log_type: Option<String>,
    pub transaction_log_index: Option<String>,
}
