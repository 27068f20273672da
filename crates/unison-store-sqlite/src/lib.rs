//! SQLite backend for the Unison contact store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Every `identify` call executes inside
//! one `BEGIN IMMEDIATE` transaction on that thread, which serialises
//! concurrent resolutions against each other.

mod encode;
mod repository;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use repository::SqliteRepository;
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
