#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]

//! Metric names, the histogram's bucket layout, and startup zero-init.
//!
//! Every indexer process exposes exactly these metrics; adding a new one
//! means adding it here rather than at the call site, so `init` stays the
//! single source of truth for what gets zeroed at startup.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Counter: total blocks that reached the `Persisted` or `Skipped` terminal
/// state. Labeled by `chain`.
pub const BLOCKS_PROCESSED_TOTAL: &str = "indexer_blocks_processed_total";
/// Gauge: block number of the most recently persisted block. Labeled by `chain`.
pub const LATEST_PROCESSED_BLOCK_NUMBER: &str = "indexer_latest_processed_block_number";
/// Gauge: wall-clock seconds spent on the most recently processed block.
/// Labeled by `chain`.
pub const LATEST_BLOCK_PROCESSING_SECONDS: &str = "indexer_latest_block_processing_seconds";
/// Gauge: the node's reported chain tip block number. Labeled by `chain`.
pub const CHAIN_TIP_BLOCK_NUMBER: &str = "indexer_chain_tip_block_number";
/// Gauge: `chain_tip_block_number - latest_processed_block_number`. Labeled
/// by `chain`.
pub const CHAIN_TIP_LAG: &str = "indexer_chain_tip_lag";
/// Counter: total RPC requests issued. Labeled by `chain`, `method`.
pub const RPC_REQUESTS_TOTAL: &str = "indexer_rpc_requests_total";
/// Counter: total RPC requests that returned an error. Labeled by `chain`, `method`.
pub const RPC_ERRORS_TOTAL: &str = "indexer_rpc_errors_total";
/// Histogram: RPC request latency in seconds. Labeled by `chain`, `method`.
pub const RPC_LATENCY_SECONDS: &str = "indexer_rpc_latency_seconds";

/// The fixed histogram bucket boundaries for [`RPC_LATENCY_SECONDS`].
pub const RPC_LATENCY_BUCKETS: &[f64] = &[0.025, 0.05, 0.075, 0.1, 0.15, 0.2, 0.3, 0.5, 1.0, 5.0, 10.0];

/// The `eth_*` methods the RPC metrics are zero-initialized for at startup.
const RPC_METHODS: &[&str] = &["eth_blockNumber", "eth_getBlockByNumber", "eth_getTransactionReceipt"];

/// Installs the Prometheus recorder and starts its HTTP exposition listener.
pub fn install_recorder(listen_addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(listen_addr)
        .set_buckets_for_metric(
            metrics_exporter_prometheus::Matcher::Full(RPC_LATENCY_SECONDS.to_owned()),
            RPC_LATENCY_BUCKETS,
        )?
        .install()
}

/// Zero-initializes every metric for `chain`, so a fresh process's first
/// Prometheus scrape reports `0` rather than omitting the series entirely.
pub fn init(chain: &str) {
    metrics::counter!(BLOCKS_PROCESSED_TOTAL, "chain" => chain.to_owned()).absolute(0);
    metrics::gauge!(LATEST_PROCESSED_BLOCK_NUMBER, "chain" => chain.to_owned()).set(0.0);
    metrics::gauge!(LATEST_BLOCK_PROCESSING_SECONDS, "chain" => chain.to_owned()).set(0.0);
    metrics::gauge!(CHAIN_TIP_BLOCK_NUMBER, "chain" => chain.to_owned()).set(0.0);
    metrics::gauge!(CHAIN_TIP_LAG, "chain" => chain.to_owned()).set(0.0);
    for method in RPC_METHODS {
        metrics::counter!(RPC_REQUESTS_TOTAL, "chain" => chain.to_owned(), "method" => *method).absolute(0);
        metrics::counter!(RPC_ERRORS_TOTAL, "chain" => chain.to_owned(), "method" => *method).absolute(0);
        metrics::histogram!(RPC_LATENCY_SECONDS, "chain" => chain.to_owned(), "method" => *method).record(0.0);
    }
}
