use std::sync::Arc;
use std::time::Instant;

use indexer_config::IndexerConfig;
use indexer_parsers::{is_gated, parse_block, parse_log, parse_transaction};
use indexer_primitives::{Block, ChainFamily, ChainType, Log, RecordKind, Transaction};
use indexer_retry::{retry, RetryPolicy};
use indexer_rpc::{RpcClient, RpcError};
use indexer_storage::{StorageManager, WritePolicy};
use tracing::{debug, error, info};

use crate::error::DriverError;

/// The fixed sequence datasets are created, buffered, and persisted in.
///
/// Blocks before transactions before logs, so a batch that fails partway
/// through always leaves a durable prefix: a reader can trust that if the
/// transactions dataset has a given block range, the blocks dataset does
/// too, never the reverse.
const DATASET_ORDER: [RecordKind; 3] = [RecordKind::Block, RecordKind::Transaction, RecordKind::Log];

fn resolve_active_datasets(configured: &[String]) -> Vec<RecordKind> {
    DATASET_ORDER.into_iter().filter(|kind| configured.iter().any(|name| name == kind.dataset_name())).collect()
}

/// The single cooperative loop that fetches, gates, parses, buffers, and
/// persists one chain's blocks.
///
/// `S` is the storage backend chosen at startup (see
/// `indexer_storage::AnyStorageManager`); everything else the driver touches
/// — the RPC client, the retry policy, the parser dispatch — is already
/// behind a trait or a closed enum, so this type has no knowledge of
/// transport or encoding details.
///
/// Every suspension point (`retry`'s backoff sleep, an RPC call, a storage
/// call, the tip/gating back-off sleep) is awaited without first mutating
/// buffers or `next_block`; state only changes after the awaited call
/// resolves. Dropping or aborting the task that owns a `Driver` at any
/// `.await` point therefore never leaves a buffer half-cleared or a block
/// half-counted.
pub struct Driver<S: StorageManager> {
    rpc: Arc<dyn RpcClient>,
    storage: S,
    retry_policy: RetryPolicy,
    family: ChainFamily,
    chain_name: &'static str,
    active_datasets: Vec<RecordKind>,
    config: IndexerConfig,
    next_block: u64,
    blocks: Vec<Block>,
    transactions: Vec<Transaction>,
    logs: Vec<Log>,
}

impl<S: StorageManager> Driver<S> {
    /// Builds a driver. Call [`Driver::bootstrap`] before [`Driver::run`] to
    /// create dataset namespaces and resume `next_block` from the storage
    /// watermark.
    pub fn new(
        rpc: Arc<dyn RpcClient>,
        storage: S,
        retry_policy: RetryPolicy,
        chain_type: ChainType,
        active_datasets: &[String],
        config: IndexerConfig,
    ) -> Self {
        Self {
            rpc,
            storage,
            retry_policy,
            family: chain_type.family(),
            chain_name: chain_type.as_str(),
            active_datasets: resolve_active_datasets(active_datasets),
            config,
            next_block: 0,
            blocks: Vec::new(),
            transactions: Vec::new(),
            logs: Vec::new(),
        }
    }

    /// Creates every active dataset's namespace and table, zero-initializes
    /// metrics, and resumes `next_block` from the storage watermark.
    ///
    /// A watermark of `0` means nothing has been persisted yet, so the first
    /// block to process is `0`, not `1` — the same genesis rule the original
    /// indexer's entry point hard-codes (`last_processed_block + 1 if
    /// last_processed_block > 0 else 0`).
    pub async fn bootstrap(&mut self) -> Result<(), DriverError> {
        indexer_metrics::init(self.chain_name);
        for kind in &self.active_datasets {
            let dataset = kind.dataset_name();
            self.storage.create_dataset(dataset).await?;
            match kind {
                RecordKind::Block => self.storage.create_table::<Block>(dataset).await?,
                RecordKind::Transaction => self.storage.create_table::<Transaction>(dataset).await?,
                RecordKind::Log => self.storage.create_table::<Log>(dataset).await?,
            }
        }
        let dataset_names: Vec<&str> = self.active_datasets.iter().map(|k| k.dataset_name()).collect();
        let watermark = self.storage.get_last_processed_block(&dataset_names).await?;
        self.next_block = if watermark > 0 { watermark + 1 } else { 0 };
        info!(chain = self.chain_name, next_block = self.next_block, watermark, "bootstrapped");
        Ok(())
    }

    /// Runs the driver loop forever, or until an unhandled error escapes
    /// [`Driver::step`].
    pub async fn run(&mut self) -> Result<(), DriverError> {
        loop {
            self.step().await?;
        }
    }

    /// Processes one iteration of the loop: at most one block is fetched,
    /// gated, parsed, and buffered, and a batch is persisted if the buffer
    /// has filled. See the module docs for the cancellation-safety argument.
    async fn step(&mut self) -> Result<(), DriverError> {
        let n = self.next_block;

        if self.blocks.last().map(|b| b.block_number) == Some(n) {
            // The previous iteration already fetched, parsed, and buffered
            // `n` but failed to persist it, and left `next_block` unchanged
            // so this block would be retried. Retry the persist directly
            // instead of re-fetching and re-buffering a second copy of it.
            debug!(chain = self.chain_name, block_number = n, "retrying persist of already-buffered batch");
            return self.try_persist_and_advance(n).await;
        }

        let tip = retry(self.retry_policy, "eth_blockNumber", || self.rpc.block_number()).await?;
        metrics::gauge!(indexer_metrics::CHAIN_TIP_BLOCK_NUMBER, "chain" => self.chain_name).set(tip as f64);
        metrics::gauge!(indexer_metrics::CHAIN_TIP_LAG, "chain" => self.chain_name).set(tip.saturating_sub(n) as f64);

        let floor = tip.saturating_sub(self.config.tip_hard_limit).saturating_sub(self.config.tip_buffer);
        if n > floor {
            debug!(chain = self.chain_name, next_block = n, tip, "within tip safety margin, backing off");
            tokio::time::sleep(self.config.poll_interval).await;
            return Ok(());
        }

        let started = Instant::now();

        let raw_block = match retry(self.retry_policy, "eth_getBlockByNumber", || self.rpc.get_block_by_number(n)).await
        {
            Ok(Some(block)) => block,
            Ok(None) => {
                info!(chain = self.chain_name, block_number = n, "block not yet available, skipping");
                metrics::counter!(indexer_metrics::BLOCKS_PROCESSED_TOTAL, "chain" => self.chain_name).increment(1);
                self.next_block = n + 1;
                return Ok(());
            }
            Err(RpcError::Structural { method, message }) => {
                error!(chain = self.chain_name, block_number = n, method, message, "malformed block payload, abandoning block");
                metrics::counter!(indexer_metrics::BLOCKS_PROCESSED_TOTAL, "chain" => self.chain_name).increment(1);
                self.next_block = n + 1;
                return Ok(());
            }
            Err(other) => return Err(DriverError::Rpc(other)),
        };

        if is_gated(self.family, &raw_block) {
            debug!(chain = self.chain_name, block_number = n, "block not yet L1-anchored, retrying");
            tokio::time::sleep(self.config.poll_interval).await;
            return Ok(());
        }

        let raw_transactions = raw_block.transactions.clone();
        let typed_block = match parse_block(self.family, raw_block) {
            Ok(block) => block,
            Err(err) => {
                error!(chain = self.chain_name, block_number = n, error = %err, "block failed to parse, abandoning block");
                metrics::counter!(indexer_metrics::BLOCKS_PROCESSED_TOTAL, "chain" => self.chain_name).increment(1);
                self.next_block = n + 1;
                return Ok(());
            }
        };
        let block_timestamp = typed_block.block_time.timestamp().max(0) as u64;

        let mut typed_transactions = Vec::with_capacity(raw_transactions.len());
        let mut typed_logs = Vec::new();
        let mut block_poisoned = false;

        for raw_tx in raw_transactions {
            let receipt = match retry(self.retry_policy, "eth_getTransactionReceipt", || {
                self.rpc.get_transaction_receipt(&raw_tx.hash)
            })
            .await
            {
                Ok(Some(receipt)) => receipt,
                Ok(None) => {
                    info!(chain = self.chain_name, block_number = n, tx_hash = %raw_tx.hash, "receipt not found, skipping transaction");
                    continue;
                }
                Err(RpcError::Structural { method, message }) => {
                    error!(chain = self.chain_name, block_number = n, method, message, "malformed receipt payload, abandoning block");
                    block_poisoned = true;
                    break;
                }
                Err(other) => return Err(DriverError::Rpc(other)),
            };

            let raw_logs = receipt.logs.clone();
            let typed_tx = match parse_transaction(self.family, raw_tx, receipt, block_timestamp) {
                Ok(tx) => tx,
                Err(err) => {
                    error!(chain = self.chain_name, block_number = n, error = %err, "transaction failed to parse, abandoning block");
                    block_poisoned = true;
                    break;
                }
            };

            let mut parsed_logs = Vec::with_capacity(raw_logs.len());
            for raw_log in raw_logs {
                match parse_log(self.family, raw_log, block_timestamp) {
                    Ok(log) => parsed_logs.push(log),
                    Err(err) => {
                        error!(chain = self.chain_name, block_number = n, error = %err, "log failed to parse, abandoning block");
                        block_poisoned = true;
                        break;
                    }
                }
            }
            if block_poisoned {
                break;
            }

            typed_transactions.push(typed_tx);
            typed_logs.extend(parsed_logs);
        }

        if block_poisoned {
            metrics::counter!(indexer_metrics::BLOCKS_PROCESSED_TOTAL, "chain" => self.chain_name).increment(1);
            self.next_block = n + 1;
            return Ok(());
        }

        metrics::gauge!(indexer_metrics::LATEST_BLOCK_PROCESSING_SECONDS, "chain" => self.chain_name)
            .set(started.elapsed().as_secs_f64());

        self.blocks.push(typed_block);
        self.transactions.extend(typed_transactions);
        self.logs.extend(typed_logs);

        self.try_persist_and_advance(n).await
    }

    /// Persists the buffer if it has filled, then advances `next_block`.
    ///
    /// On persist failure, `next_block` is left unchanged and the buffers
    /// are retained so the next call re-enters [`Driver::step`]'s
    /// already-buffered guard and retries the same persist, rather than
    /// re-fetching `n` and appending a second copy of it to the buffer.
    async fn try_persist_and_advance(&mut self, n: u64) -> Result<(), DriverError> {
        if self.blocks.len() >= self.config.batch_size {
            match self.persist_batch().await {
                Ok(()) => {
                    metrics::counter!(indexer_metrics::BLOCKS_PROCESSED_TOTAL, "chain" => self.chain_name)
                        .increment(self.blocks.len() as u64);
                    metrics::gauge!(indexer_metrics::LATEST_PROCESSED_BLOCK_NUMBER, "chain" => self.chain_name)
                        .set(n as f64);
                    self.blocks.clear();
                    self.transactions.clear();
                    self.logs.clear();
                }
                Err(err) => {
                    error!(chain = self.chain_name, error = %err, "batch persistence failed, retaining buffers for retry");
                    return Ok(());
                }
            }
        }

        self.next_block = n + 1;
        Ok(())
    }

    /// Persists the current buffers across every active dataset, in
    /// `DATASET_ORDER`. The first failing dataset stops the sequence: later
    /// datasets in the batch are not attempted, matching the ordering
    /// guarantee that a dataset's persisted prefix never runs ahead of the
    /// one before it in `DATASET_ORDER`.
    async fn persist_batch(&self) -> Result<(), DriverError> {
        let start_block = self.blocks.iter().map(|b| b.block_number).min().unwrap_or(0);
        let end_block = self.blocks.iter().map(|b| b.block_number).max().unwrap_or(0);

        for kind in &self.active_datasets {
            match kind {
                RecordKind::Block => {
                    self.storage
                        .load_table(kind.dataset_name(), &self.blocks, WritePolicy::Append, start_block, end_block)
                        .await?
                }
                RecordKind::Transaction => {
                    self.storage
                        .load_table(
                            kind.dataset_name(),
                            &self.transactions,
                            WritePolicy::Append,
                            start_block,
                            end_block,
                        )
                        .await?
                }
                RecordKind::Log => {
                    self.storage
                        .load_table(kind.dataset_name(), &self.logs, WritePolicy::Append, start_block, end_block)
                        .await?
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use indexer_rpc::raw::{RawBlock, RawReceipt};
    use indexer_storage::columnar::ColumnarBackend;

    fn eth_block_json(number: u64, timestamp: u64, tx_hashes: &[&str]) -> serde_json::Value {
        let transactions: Vec<serde_json::Value> = tx_hashes
            .iter()
            .map(|hash| {
                serde_json::json!({
                    "blockHash": format!("0x{number:x}"),
                    "blockNumber": format!("0x{number:x}"),
                    "from": "0xaa",
                    "gas": "0x5208",
                    "gasPrice": "0x3b9aca00",
                    "hash": hash,
                    "input": "0x",
                    "nonce": "0x0",
                    "to": "0xbb",
                    "transactionIndex": "0x0",
                    "type": "0x2",
                    "value": "0x0",
                })
            })
            .collect();
        serde_json::json!({
            "difficulty": "0x0",
            "extraData": "0x",
            "gasLimit": "0x1c9c380",
            "gasUsed": "0x5208",
            "hash": format!("0x{number:x}"),
            "logsBloom": "0x00",
            "miner": "0xcc",
            "mixHash": "0xdd",
            "nonce": "0x0000000000000000",
            "number": format!("0x{number:x}"),
            "parentHash": "0xee",
            "receiptsRoot": "0xff",
            "sha3Uncles": "0x01",
            "size": "0x400",
            "stateRoot": "0x02",
            "timestamp": format!("0x{timestamp:x}"),
            "totalDifficulty": "0x0",
            "transactions": transactions,
            "transactionsRoot": "0x03",
            "uncles": [],
        })
    }

    fn receipt_json(tx_hash: &str, log_count: usize) -> serde_json::Value {
        let logs: Vec<serde_json::Value> = (0..log_count)
            .map(|i| {
                serde_json::json!({
                    "address": "0xaa",
                    "blockHash": "0x01",
                    "blockNumber": "0x64",
                    "data": "0x",
                    "logIndex": format!("0x{i:x}"),
                    "removed": false,
                    "topics": ["0xcc"],
                    "transactionHash": tx_hash,
                    "transactionIndex": "0x0",
                })
            })
            .collect();
        serde_json::json!({
            "status": "0x1",
            "cumulativeGasUsed": "0x5208",
            "effectiveGasPrice": "0x3b9aca00",
            "gasUsed": "0x5208",
            "logsBloom": "0x00",
            "logs": logs,
            "contractAddress": null,
        })
    }

    /// An [`RpcClient`] backed by canned per-block and per-receipt responses,
    /// with call counters for assertions about what the driver did and did
    /// not fetch.
    #[derive(Default)]
    struct FakeRpc {
        tip: AtomicU64,
        blocks: Mutex<HashMap<u64, RawBlock>>,
        receipts: Mutex<HashMap<String, RawReceipt>>,
        block_fetch_calls: AtomicU64,
        gate_attempts: AtomicU64,
        gate_ready_after: AtomicU64,
    }

    impl FakeRpc {
        fn with_tip(tip: u64) -> Self {
            Self { tip: AtomicU64::new(tip), ..Default::default() }
        }

        fn insert_block(&self, number: u64, raw: serde_json::Value) {
            let block: RawBlock = serde_json::from_value(raw).unwrap();
            self.blocks.lock().unwrap().insert(number, block);
        }

        fn insert_receipt(&self, tx_hash: &str, raw: serde_json::Value) {
            let receipt: RawReceipt = serde_json::from_value(raw).unwrap();
            self.receipts.lock().unwrap().insert(tx_hash.to_owned(), receipt);
        }
    }

    #[async_trait]
    impl RpcClient for FakeRpc {
        async fn block_number(&self) -> Result<u64, RpcError> {
            Ok(self.tip.load(Ordering::SeqCst))
        }

        async fn get_block_by_number(&self, number: u64) -> Result<Option<RawBlock>, RpcError> {
            self.block_fetch_calls.fetch_add(1, Ordering::SeqCst);
            if self.gate_ready_after.load(Ordering::SeqCst) > 0 {
                let attempt = self.gate_attempts.fetch_add(1, Ordering::SeqCst) + 1;
                let mut block = self.blocks.lock().unwrap().get(&number).cloned();
                if attempt < self.gate_ready_after.load(Ordering::SeqCst) {
                    if let Some(b) = &mut block {
                        b.l1_batch_number = None;
                        b.l1_batch_timestamp = None;
                    }
                } else if let Some(b) = &mut block {
                    let ts = u64::from_str_radix(b.timestamp.trim_start_matches("0x"), 16).unwrap_or(0);
                    b.l1_batch_number = Some("0x1".to_owned());
                    b.l1_batch_timestamp = Some(format!("0x{ts:x}"));
                }
                return Ok(block);
            }
            Ok(self.blocks.lock().unwrap().get(&number).cloned())
        }

        async fn get_transaction_receipt(&self, tx_hash: &str) -> Result<Option<RawReceipt>, RpcError> {
            Ok(self.receipts.lock().unwrap().get(tx_hash).cloned())
        }
    }

    fn driver(
        rpc: Arc<FakeRpc>,
        root: &std::path::Path,
        batch_size: usize,
        chain: ChainType,
    ) -> Driver<ColumnarBackend> {
        let storage = ColumnarBackend::new(root.to_path_buf(), chain.family(), chain.as_str());
        let config = IndexerConfig { batch_size, ..IndexerConfig::default() };
        let datasets = vec!["blocks".to_owned(), "transactions".to_owned(), "logs".to_owned()];
        Driver::new(rpc, storage, RetryPolicy::default(), chain, &datasets, config)
    }

    /// A [`StorageManager`] that fails `load_table` a fixed number of times
    /// before delegating to a real [`ColumnarBackend`], for exercising the
    /// driver's persist-failure retry path.
    struct FlakyStorage {
        inner: ColumnarBackend,
        fail_times: AtomicU64,
    }

    #[async_trait]
    impl StorageManager for FlakyStorage {
        async fn create_dataset(&self, dataset: &str) -> Result<(), indexer_storage::StorageError> {
            self.inner.create_dataset(dataset).await
        }

        async fn create_table<T: indexer_storage::Columnar + Send + Sync>(
            &self,
            dataset: &str,
        ) -> Result<(), indexer_storage::StorageError> {
            self.inner.create_table::<T>(dataset).await
        }

        async fn load_table<T: indexer_storage::Columnar + Send + Sync>(
            &self,
            dataset: &str,
            rows: &[T],
            policy: WritePolicy,
            start_block: u64,
            end_block: u64,
        ) -> Result<(), indexer_storage::StorageError> {
            let remaining = self.fail_times.load(Ordering::SeqCst);
            if remaining > 0 {
                self.fail_times.fetch_sub(1, Ordering::SeqCst);
                return Err(indexer_storage::StorageError::AlreadyExists(dataset.to_owned()));
            }
            self.inner.load_table(dataset, rows, policy, start_block, end_block).await
        }

        async fn get_last_processed_block(&self, datasets: &[&str]) -> Result<u64, indexer_storage::StorageError> {
            self.inner.get_last_processed_block(datasets).await
        }
    }

    fn flaky_driver(
        rpc: Arc<FakeRpc>,
        root: &std::path::Path,
        batch_size: usize,
        chain: ChainType,
        fail_times: u64,
    ) -> Driver<FlakyStorage> {
        let inner = ColumnarBackend::new(root.to_path_buf(), chain.family(), chain.as_str());
        let storage = FlakyStorage { inner, fail_times: AtomicU64::new(fail_times) };
        let config = IndexerConfig { batch_size, ..IndexerConfig::default() };
        let datasets = vec!["blocks".to_owned(), "transactions".to_owned(), "logs".to_owned()];
        Driver::new(rpc, storage, RetryPolicy::default(), chain, &datasets, config)
    }

    #[tokio::test]
    async fn ethereum_happy_path_persists_a_full_batch() {
        let rpc = Arc::new(FakeRpc::with_tip(10_000));
        for (number, ts) in [(100u64, 1_700_000_000u64), (101, 1_700_000_012)] {
            let tx_hashes = [format!("0x{number}0"), format!("0x{number}1"), format!("0x{number}2")];
            let refs: Vec<&str> = tx_hashes.iter().map(String::as_str).collect();
            rpc.insert_block(number, eth_block_json(number, ts, &refs));
            for hash in &tx_hashes {
                rpc.insert_receipt(hash, receipt_json(hash, 2));
            }
        }
        let tmp = tempfile::tempdir().unwrap();
        let mut driver = driver(rpc, tmp.path(), 2, ChainType::Ethereum);
        driver.next_block = 100;

        driver.step().await.unwrap();
        driver.step().await.unwrap();

        assert_eq!(driver.next_block, 102);
        assert!(driver.blocks.is_empty());

        let storage = ColumnarBackend::new(tmp.path().to_path_buf(), ChainFamily::Ethereum, "ethereum");
        assert_eq!(storage.get_last_processed_block(&["blocks", "transactions", "logs"]).await.unwrap(), 101);
    }

    #[tokio::test(start_paused = true)]
    async fn tip_back_off_skips_fetch_when_within_safety_margin() {
        let rpc = Arc::new(FakeRpc::with_tip(500));
        let tmp = tempfile::tempdir().unwrap();
        let mut driver = driver(rpc.clone(), tmp.path(), 100, ChainType::Ethereum);
        driver.next_block = 395; // 500 - 100 (hard_limit) - 10 (buffer) = 390; 395 > 390

        driver.step().await.unwrap();

        assert_eq!(driver.next_block, 395, "N must not advance while backing off");
        assert_eq!(rpc.block_fetch_calls.load(Ordering::SeqCst), 0, "must not fetch a block while backing off");
    }

    #[tokio::test(start_paused = true)]
    async fn tip_back_off_does_not_underflow_near_genesis() {
        let rpc = Arc::new(FakeRpc::with_tip(5));
        rpc.insert_block(0, eth_block_json(0, 1_700_000_000, &[]));
        let tmp = tempfile::tempdir().unwrap();
        let mut driver = driver(rpc, tmp.path(), 100, ChainType::Ethereum);
        driver.next_block = 0;

        // tip(5) - hard_limit(100) - buffer(10) saturates to 0; 0 > 0 is
        // false, so block 0 is still fetched rather than backing off forever.
        driver.step().await.unwrap();

        assert_eq!(driver.next_block, 1);
    }

    #[tokio::test]
    async fn empty_block_produces_no_transaction_or_log_rows() {
        let rpc = Arc::new(FakeRpc::with_tip(10_000));
        rpc.insert_block(100, eth_block_json(100, 1_700_000_000, &[]));
        let tmp = tempfile::tempdir().unwrap();
        let mut driver = driver(rpc, tmp.path(), 1, ChainType::Ethereum);
        driver.next_block = 100;

        driver.step().await.unwrap();

        assert_eq!(driver.next_block, 101);
        let storage = ColumnarBackend::new(tmp.path().to_path_buf(), ChainFamily::Ethereum, "ethereum");
        assert_eq!(storage.get_last_processed_block(&["blocks"]).await.unwrap(), 100);
        assert!(driver.transactions.is_empty());
    }

    #[tokio::test]
    async fn missing_receipt_skips_only_that_transaction() {
        let rpc = Arc::new(FakeRpc::with_tip(10_000));
        let tx_hashes = ["0xa0", "0xa1"];
        rpc.insert_block(100, eth_block_json(100, 1_700_000_000, &tx_hashes));
        rpc.insert_receipt("0xa0", receipt_json("0xa0", 1));
        // "0xa1" has no receipt inserted: get_transaction_receipt returns None.
        let tmp = tempfile::tempdir().unwrap();
        let mut driver = driver(rpc, tmp.path(), 1, ChainType::Ethereum);
        driver.next_block = 100;

        driver.step().await.unwrap();

        assert!(driver.transactions.is_empty()); // buffer cleared after persist
        let storage = ColumnarBackend::new(tmp.path().to_path_buf(), ChainFamily::Ethereum, "ethereum");
        assert_eq!(storage.get_last_processed_block(&["transactions"]).await.unwrap(), 100);
    }

    #[tokio::test(start_paused = true)]
    async fn zksync_gating_holds_n_until_l1_fields_appear() {
        let rpc = Arc::new(FakeRpc::with_tip(50_000_000));
        rpc.gate_ready_after.store(3, Ordering::SeqCst);
        rpc.insert_block(
            49_558_001,
            serde_json::json!({
                "difficulty": "0x0",
                "extraData": "0x",
                "gasLimit": "0x1c9c380",
                "gasUsed": "0x0",
                "hash": "0x01",
                "logsBloom": "0x00",
                "miner": "0x02",
                "mixHash": "0x03",
                "nonce": "0x00",
                "number": "0x2f45a71",
                "parentHash": "0x04",
                "receiptsRoot": "0x05",
                "sha3Uncles": "0x06",
                "size": "0x1",
                "stateRoot": "0x07",
                "timestamp": "0x6553f100",
                "totalDifficulty": "0x0",
                "transactions": [],
                "transactionsRoot": "0x08",
                "uncles": [],
            }),
        );
        let tmp = tempfile::tempdir().unwrap();
        let mut driver = driver(rpc.clone(), tmp.path(), 1, ChainType::Zksync);
        driver.next_block = 49_558_001;

        driver.step().await.unwrap();
        assert_eq!(driver.next_block, 49_558_001, "gated block must not advance N");
        driver.step().await.unwrap();
        assert_eq!(driver.next_block, 49_558_001);
        driver.step().await.unwrap();
        assert_eq!(driver.next_block, 49_558_002, "N advances once L1 fields appear");
    }

    #[tokio::test]
    async fn persist_failure_retries_without_duplicating_the_buffered_block() {
        let rpc = Arc::new(FakeRpc::with_tip(10_000));
        rpc.insert_block(100, eth_block_json(100, 1_700_000_000, &[]));
        let tmp = tempfile::tempdir().unwrap();
        // batch_size = 1 so the very first step attempts a persist; it fails
        // once, then succeeds on the retry.
        let mut driver = flaky_driver(rpc.clone(), tmp.path(), 1, ChainType::Ethereum, 1);
        driver.next_block = 100;

        driver.step().await.unwrap();
        assert_eq!(driver.next_block, 100, "next_block must not advance while the persist is failing");
        assert_eq!(driver.blocks.len(), 1, "the failed block stays buffered exactly once");

        driver.step().await.unwrap();
        assert_eq!(driver.next_block, 101, "next_block advances once the retried persist succeeds");
        assert!(driver.blocks.is_empty());
        assert_eq!(
            rpc.block_fetch_calls.load(Ordering::SeqCst),
            1,
            "the second step must retry the persist directly, not re-fetch and re-buffer block 100"
        );
    }

    #[tokio::test]
    async fn bootstrap_resumes_at_zero_when_nothing_persisted() {
        let rpc = Arc::new(FakeRpc::with_tip(10));
        let tmp = tempfile::tempdir().unwrap();
        let mut driver = driver(rpc, tmp.path(), 1, ChainType::Ethereum);

        driver.bootstrap().await.unwrap();

        assert_eq!(driver.next_block, 0);
    }
}
