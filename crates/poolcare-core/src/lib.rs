//! Core types and trait definitions for the poolcare maintenance tracker.
//!
//! This crate is free of database and terminal dependencies. The SQLite
//! backend and the CLI both depend on it.

pub mod assignment;
pub mod client;
pub mod day;
pub mod error;
pub mod responsible;
pub mod store;
pub mod visit;
pub mod week;

pub use error::{Error, Result};
