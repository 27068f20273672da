//! Core types and identity-resolution logic for the Unison contact store.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! resolution algorithm runs against a [`repository::ContactRepository`] unit
//! of work supplied by a backend (e.g. `unison-store-sqlite`); the outer
//! shells talk to backends through [`store::ContactStore`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod cluster;
pub mod contact;
pub mod error;
pub mod identify;
pub mod matcher;
pub mod memory;
pub mod novelty;
pub mod repository;
pub mod store;
pub mod view;

pub use error::{Error, Result};
