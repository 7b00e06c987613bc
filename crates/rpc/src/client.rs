use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Instant,
};

use async_trait::async_trait;
use jsonrpsee::core::client::ClientT;
use jsonrpsee::rpc_params;
use jsonrpsee_http_client::{HttpClient, HttpClientBuilder};
use tracing::debug;

use crate::{
    error::RpcError,
    raw::{RawBlock, RawReceipt},
};

/// The subset of JSON-RPC methods the indexer needs from an EVM node.
///
/// Implementations do not retry internally; [`indexer_retry::retry`] wraps
/// every call site so the driver controls backoff policy centrally.
#[async_trait]
pub trait RpcClient: Send + Sync {
    /// `eth_blockNumber`: the node's current chain tip.
    async fn block_number(&self) -> Result<u64, RpcError>;

    /// `eth_getBlockByNumber` with full transaction objects.
    ///
    /// Returns `Ok(None)` when the node reports the block does not exist yet
    /// (a `null` result), which is expected and not an error: it means the
    /// requested number is past the node's current tip.
    async fn get_block_by_number(&self, number: u64) -> Result<Option<RawBlock>, RpcError>;

    /// `eth_getTransactionReceipt`.
    ///
    /// Returns `Ok(None)` if the node has not indexed the receipt yet, which
    /// callers treat as a gating condition rather than a parse failure.
    async fn get_transaction_receipt(&self, tx_hash: &str) -> Result<Option<RawReceipt>, RpcError>;
}

/// A [`RpcClient`] backed by a pool of JSON-RPC-over-HTTP endpoints.
///
/// Endpoints are tried in round-robin order: each call picks the next
/// endpoint in the list, so a single failing node does not concentrate all
/// retries on itself once [`indexer_retry::retry`] re-invokes the call.
pub struct JsonRpcClient {
    endpoints: Vec<HttpClient>,
    cursor: AtomicUsize,
    chain: &'static str,
}

impl JsonRpcClient {
    /// Builds a client from a non-empty list of HTTP(S) endpoint URLs.
    pub fn new(chain: &'static str, urls: &[url::Url]) -> Result<Self, RpcError> {
        if urls.is_empty() {
            return Err(RpcError::NoEndpoints);
        }
        let endpoints = urls
            .iter()
            .map(|url| {
                HttpClientBuilder::default().build(url.as_str()).map_err(|source| RpcError::Transport {
                    method: "client_build".to_owned(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { endpoints, cursor: AtomicUsize::new(0), chain })
    }

    fn next_endpoint(&self) -> &HttpClient {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.endpoints.len();
        &self.endpoints[index]
    }

    async fn call<T>(&self, method: &'static str, params: jsonrpsee::core::params::ArrayParams) -> Result<T, RpcError>
    where
        T: serde::de::DeserializeOwned,
    {
        let client = self.next_endpoint();
        let started = Instant::now();
        let result = client.request(method, params).await;
        let elapsed = started.elapsed();
        metrics::histogram!("indexer_rpc_latency_seconds", "chain" => self.chain, "method" => method)
            .record(elapsed.as_secs_f64());
        metrics::counter!("indexer_rpc_requests_total", "chain" => self.chain, "method" => method).increment(1);
        match result {
            Ok(value) => Ok(value),
            Err(err) => {
                metrics::counter!("indexer_rpc_errors_total", "chain" => self.chain, "method" => method)
                    .increment(1);
                debug!(chain = self.chain, method, error = %err, "rpc call failed");
                Err(classify_client_error(method, err))
            }
        }
    }
}

/// Splits a response shape mismatch from a genuine transport/protocol
/// failure, so the former surfaces as [`RpcError::Structural`] (no retry;
/// likely node-version skew) instead of being retried as if it were merely
/// transient.
fn classify_client_error(method: &'static str, err: jsonrpsee_core::ClientError) -> RpcError {
    match err {
        jsonrpsee_core::ClientError::ParseError(source) => RpcError::Structural {
            method: method.to_owned(),
            message: format!("response did not match the expected shape: {source}"),
        },
        other => RpcError::Transport { method: method.to_owned(), source: other },
    }
}

#[async_trait]
impl RpcClient for JsonRpcClient {
    async fn block_number(&self) -> Result<u64, RpcError> {
        let raw: String = self.call("eth_blockNumber", rpc_params![]).await?;
        indexer_primitives::parse_hex_u64(&raw).map_err(|err| RpcError::Structural {
            method: "eth_blockNumber".to_owned(),
            message: err.to_string(),
        })
    }

    async fn get_block_by_number(&self, number: u64) -> Result<Option<RawBlock>, RpcError> {
        let hex_number = format!("0x{number:x}");
        let raw: Option<RawBlock> = self.call("eth_getBlockByNumber", rpc_params![hex_number, true]).await?;
        Ok(raw)
    }

    async fn get_transaction_receipt(&self, tx_hash: &str) -> Result<Option<RawReceipt>, RpcError> {
        let raw: Option<RawReceipt> = self.call("eth_getTransactionReceipt", rpc_params![tx_hash]).await?;
        Ok(raw)
    }
}
