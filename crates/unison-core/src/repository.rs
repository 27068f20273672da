//! The `ContactRepository` trait — the storage collaborator seen by the
//! resolution algorithm.
//!
//! A repository is a unit of work: every call made during one
//! [`identify`](crate::identify::identify) invocation goes through the same
//! repository value, and the backend is expected to make that sequence atomic
//! and serialisable (e.g. by handing out a repository bound to an open
//! `BEGIN IMMEDIATE` transaction). The algorithm itself never retries.

use crate::contact::{Contact, ContactId, Link, NewContact};

pub trait ContactRepository {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Every contact whose `email` equals `email` or whose `phone_number`
  /// equals `phone`. An absent argument matches nothing. Ordered by id.
  fn find_by_email_or_phone(
    &mut self,
    email: Option<&str>,
    phone: Option<&str>,
  ) -> Result<Vec<Contact>, Self::Error>;

  /// Retrieve a contact by id. Returns `None` if not found.
  fn find_by_id(&mut self, id: ContactId) -> Result<Option<Contact>, Self::Error>;

  /// Retrieve every contact whose id is in `ids`; unknown ids are skipped.
  fn find_by_ids(&mut self, ids: &[ContactId]) -> Result<Vec<Contact>, Self::Error>;

  /// The contact `primary_id` plus every contact linked to it. Ordered by id.
  fn find_cluster_members(
    &mut self,
    primary_id: ContactId,
  ) -> Result<Vec<Contact>, Self::Error>;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Persist a new contact. The store assigns `id`, `created_at` and
  /// `updated_at`.
  fn insert(&mut self, contact: NewContact) -> Result<Contact, Self::Error>;

  /// Rewrite one contact's link state and return the updated row.
  fn update(&mut self, id: ContactId, link: Link) -> Result<Contact, Self::Error>;

  /// Rewrite the link state of every contact in `ids` at once.
  fn batch_update(&mut self, ids: &[ContactId], link: Link) -> Result<(), Self::Error>;
}
