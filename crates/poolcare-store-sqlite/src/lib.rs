//! SQLite backend for the poolcare store.
//!
//! Every operation opens its own [`rusqlite::Connection`] to the database
//! file and drops it before returning, so no connection state survives
//! between calls.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
