use indexer_retry::{Disposition, Retryable};

/// A failure from an RPC call, classified into the dispositions the retry
/// policy and the indexing loop distinguish between.
///
/// There is no `NotFound` variant: a missing block or receipt is a `null`
/// JSON-RPC result, which [`crate::RpcClient`]'s methods represent as
/// `Ok(None)` rather than as an error, so "not found" never needs to flow
/// through [`Retryable::disposition`] at all.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// A transport- or node-level failure: connection reset, timeout, a 5xx
    /// or JSON-RPC server-error response. Worth retrying, possibly against a
    /// different endpoint.
    #[error("transport error calling {method}: {source}")]
    Transport {
        /// The RPC method being called when the failure occurred.
        method: String,
        /// The underlying client error.
        #[source]
        source: jsonrpsee_core::ClientError,
    },
    /// The response decoded at the JSON-RPC layer but did not match the
    /// shape this client expects to deserialize.
    #[error("malformed response from {method}: {message}")]
    Structural {
        /// The RPC method being called when the failure occurred.
        method: String,
        /// A human-readable description of the mismatch.
        message: String,
    },
    /// Every configured endpoint has been exhausted for this call.
    #[error("no RPC endpoints configured")]
    NoEndpoints,
}

impl Retryable for RpcError {
    fn disposition(&self) -> Disposition {
        match self {
            Self::Transport { .. } | Self::NoEndpoints => Disposition::Transient,
            Self::Structural { .. } => Disposition::Structural,
        }
    }
}
