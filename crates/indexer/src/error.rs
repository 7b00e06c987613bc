use indexer_rpc::RpcError;
use indexer_storage::StorageError;

/// An unhandled failure from the driver loop.
///
/// Per the error-handling design, this is the only failure class that
/// terminates the process. Not-found blocks/receipts, chain-specific
/// gating, and structural parse failures are all absorbed inside
/// [`crate::Driver::step`] by abandoning the current block and advancing
/// past it; a failed batch persist is absorbed there too, by logging the
/// error and retaining the buffers for the next iteration. Only an RPC call
/// that exhausts its retries, or a storage failure during bootstrap,
/// propagates out of the driver.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// An RPC call exhausted C1's retries (or found no endpoints configured)
    /// fetching the chain tip, a block, or a receipt.
    #[error("rpc call failed: {0}")]
    Rpc(#[from] RpcError),
    /// Dataset/table bootstrap, or the initial watermark query, failed
    /// against the storage backend.
    #[error("storage operation failed: {0}")]
    Storage(#[from] StorageError),
}
