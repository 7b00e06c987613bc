use indexer_primitives::HexParseError;

/// A raw RPC payload failed to normalize into a record.
///
/// Every variant here is a [`indexer_retry::Disposition::Structural`]
/// failure at the call site: a malformed payload will not become
/// well-formed by retrying against the same or a different endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A required field was absent from the payload.
    #[error("missing required field {0:?}")]
    MissingField(&'static str),
    /// A hex-encoded field failed to decode.
    #[error("field {field:?} failed to decode: {source}")]
    InvalidHex {
        /// The field name.
        field: &'static str,
        /// The underlying decode failure.
        #[source]
        source: HexParseError,
    },
}
