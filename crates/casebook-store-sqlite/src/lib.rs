//! SQLite backend for the Casebook case store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Dropping an in-flight future
//! cancels the caller's wait; the worker itself never blocks indefinitely.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
