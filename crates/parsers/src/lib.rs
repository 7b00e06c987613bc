#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]

//! Normalizes raw RPC payloads into [`indexer_primitives`] records.
//!
//! Dispatch is over [`indexer_primitives::ChainFamily`], a closed three-way
//! enum: adding a chain family means adding a match arm here and the
//! compiler will point at every place that needs one, rather than a runtime
//! dict lookup that silently falls through on a typo'd key.

mod block;
mod convert;
mod error;
mod gate;
mod log;
mod transaction;

pub use block::parse_block;
pub use error::ParseError;
pub use gate::is_gated;
pub use log::parse_log;
pub use transaction::parse_transaction;
