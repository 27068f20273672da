//! JSON REST API for Unison.
//!
//! Exposes an axum [`Router`] backed by any [`unison_core::store::ContactStore`].
//! Transport concerns (binding, tracing layers, shutdown) are the caller's
//! responsibility.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `POST` | `/identify` | [`identify::handler`] |
//! | `GET`  | `/contacts` | [`contacts::list`] |
//! | `GET`  | `/contacts/{id}` | [`contacts::get_one`] |
//! | `GET`  | `/contacts/{id}/identity` | [`contacts::identity`] |
//!
//! # Mounting
//!
//! ```rust,ignore
//! Router::new().merge(unison_api::api_router(store.clone()))
//! ```

pub mod contacts;
pub mod error;
pub mod identify;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use unison_core::store::ContactStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be merged or nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ContactStore + 'static,
{
  Router::new()
    .route("/identify", post(identify::handler::<S>))
    .route("/contacts", get(contacts::list::<S>))
    .route("/contacts/{id}", get(contacts::get_one::<S>))
    .route("/contacts/{id}/identity", get(contacts::identity::<S>))
    .with_state(store)
}
