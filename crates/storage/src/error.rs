/// A storage operation failed.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// An I/O failure while reading or writing a backend's files.
    #[error("storage I/O error at {path}: {source}")]
    Io {
        /// The path being accessed.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A failure encoding or decoding the columnar file format.
    #[error("parquet encode/decode error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    /// A failure building an Arrow array or schema.
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    /// `load_table` was called with `policy = fail` and the table already had rows.
    #[error("table {0:?} already has data and the fail policy forbids overwriting it")]
    AlreadyExists(String),
}
