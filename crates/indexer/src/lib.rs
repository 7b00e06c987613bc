#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]

//! The EVM indexer's single-threaded driver loop.
//!
//! [`Driver`] is the only public type: it owns the watermark, the fetch /
//! gate / parse / buffer state machine, and batched persistence. Everything
//! it touches is already generalized behind a trait or a closed enum in
//! `indexer_rpc`, `indexer_parsers`, and `indexer_storage`, so this crate has
//! no chain- or transport-specific logic of its own.

mod driver;
mod error;

pub use driver::Driver;
pub use error::DriverError;
