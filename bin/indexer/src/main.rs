//! Process entry point: loads config, wires the RPC client, storage
//! backend, and metrics exporter, then runs the driver loop until it hits
//! an unhandled error.

use std::{path::PathBuf, process::ExitCode, str::FromStr, sync::Arc};

use clap::Parser;
use indexer_config::{Config, StorageKind};
use indexer_indexer::Driver;
use indexer_primitives::ChainType;
use indexer_retry::RetryPolicy;
use indexer_rpc::JsonRpcClient;
use indexer_storage::{AnyStorageManager, ColumnarBackend};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "indexer", about = "EVM blockchain indexer")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, default_value = "indexer.toml")]
    config: PathBuf,
    /// Address the Prometheus exposition endpoint listens on.
    #[arg(long, default_value = "127.0.0.1:9100")]
    metrics_addr: std::net::SocketAddr,
}

fn retry_policy_from_config(cfg: &indexer_config::RetryConfig) -> RetryPolicy {
    RetryPolicy {
        max_attempts: cfg.max_attempts,
        base_delay: cfg.base_delay,
        exponential: cfg.exponential,
        jitter: cfg.jitter,
    }
}

async fn run(cli: Cli) -> eyre::Result<()> {
    let config = Config::load(&cli.config)?;
    let chain_type = ChainType::from_str(&config.chain.name)?;

    indexer_metrics::install_recorder(cli.metrics_addr)?;
    info!(addr = %cli.metrics_addr, "metrics exporter listening");

    let rpc = Arc::new(JsonRpcClient::new(chain_type.as_str(), &config.chain.rpc_urls)?);

    let storage = match config.storage.kind {
        StorageKind::Columnar => AnyStorageManager::Columnar(ColumnarBackend::new(
            config.storage.root_dir.clone(),
            chain_type.family(),
            chain_type.as_str(),
        )),
        StorageKind::Warehouse => {
            eyre::bail!(
                "storage.kind = \"warehouse\" has no built-in WarehouseDriver implementation; \
                 wire one through indexer_storage::WarehouseBackend and rebuild"
            )
        }
    };

    let mut driver = Driver::new(
        rpc,
        storage,
        retry_policy_from_config(&config.retry),
        chain_type,
        &config.active_datasets,
        config.indexer,
    );

    driver.bootstrap().await?;
    info!(chain = %chain_type, "indexer bootstrapped, entering driver loop");
    driver.run().await?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            error!(error = %err, "failed to start tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "indexer exited with an unhandled error");
            ExitCode::FAILURE
        }
    }
}
