//! SQLite backend for the Civis engagement ledger.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! worker thread without blocking the async runtime. That thread also
//! provides the ledger's serialisation guarantee: mutations execute one at a
//! time, each inside its own transaction, so concurrent toggles and karma
//! updates cannot interleave.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
