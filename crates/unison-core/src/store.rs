//! The `ContactStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `unison-store-sqlite`).
//! Higher layers (`unison-api`, `unison-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::{
  contact::{Contact, ContactId, LinkPrecedence},
  identify::IdentifyRequest,
  view::ConsolidatedIdentity,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`ContactStore::list_contacts`].
#[derive(Debug, Clone, Default)]
pub struct ContactQuery {
  /// Restrict to primaries or secondaries.
  pub precedence: Option<LinkPrecedence>,
  /// Defaults to 100.
  pub limit:      Option<usize>,
  pub offset:     Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Unison contact store backend.
///
/// The backend error converts into [`crate::Error`] so callers can tell
/// invalid input apart from storage failures without knowing the backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ContactStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  /// Run [`crate::identify::identify`] as one atomic, serialised unit of
  /// work. Either every write of the call is applied or none is.
  fn identify(
    &self,
    request: IdentifyRequest,
  ) -> impl Future<Output = Result<ConsolidatedIdentity, Self::Error>> + Send + '_;

  /// Retrieve a contact by id. Returns `None` if not found.
  fn get_contact(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// List contacts in id order.
  fn list_contacts(
    &self,
    query: ContactQuery,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// The consolidated identity of the cluster holding `id`. Returns `None`
  /// if the contact does not exist. Read only, see
  /// [`crate::identify::lookup`] for how unrepaired links are reported.
  fn identity_of(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<Option<ConsolidatedIdentity>, Self::Error>> + Send + '_;
}
