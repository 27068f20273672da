//! Contact records — the only entity in the store.
//!
//! A contact is one observed (email, phone number) pair. Contacts that belong
//! to the same person form a cluster: exactly one `primary` contact plus every
//! `secondary` contact whose `linked_id` points at it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Store-assigned contact identifier. Ids increase with creation order.
pub type ContactId = i64;

// ─── Precedence ──────────────────────────────────────────────────────────────

/// Whether a contact is the canonical representative of its cluster.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LinkPrecedence {
  Primary,
  Secondary,
}

/// The link state written by promotions, demotions and inserts.
///
/// Only the two consistent combinations of `link_precedence` and `linked_id`
/// can be expressed: a primary has no link, a secondary always has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
  Primary,
  Secondary { linked_id: ContactId },
}

impl Link {
  pub fn precedence(self) -> LinkPrecedence {
    match self {
      Self::Primary => LinkPrecedence::Primary,
      Self::Secondary { .. } => LinkPrecedence::Secondary,
    }
  }

  pub fn linked_id(self) -> Option<ContactId> {
    match self {
      Self::Primary => None,
      Self::Secondary { linked_id } => Some(linked_id),
    }
  }
}

// ─── Contact ─────────────────────────────────────────────────────────────────

/// A stored contact row.
///
/// `link_precedence` and `linked_id` are kept as separate fields because rows
/// read back from storage may be inconsistent (a secondary whose primary has
/// vanished); resolution tolerates and repairs such rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
  pub id:              ContactId,
  pub phone_number:    Option<String>,
  pub email:           Option<String>,
  /// The contact's current primary. Set iff `link_precedence` is secondary.
  pub linked_id:       Option<ContactId>,
  pub link_precedence: LinkPrecedence,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
  /// Soft-delete marker; carried through but never consulted by resolution.
  pub deleted_at:      Option<DateTime<Utc>>,
}

impl Contact {
  pub fn is_primary(&self) -> bool {
    self.link_precedence == LinkPrecedence::Primary
  }

  /// Total age ordering: earliest `created_at` first, lower `id` on ties.
  pub fn age_key(&self) -> (DateTime<Utc>, ContactId) { (self.created_at, self.id) }

  /// Whether this row already carries exactly the given link state.
  pub fn has_link(&self, link: Link) -> bool {
    self.link_precedence == link.precedence() && self.linked_id == link.linked_id()
  }
}

/// The oldest contact by [`Contact::age_key`], or `None` if empty.
pub fn oldest<'a, I>(contacts: I) -> Option<&'a Contact>
where
  I: IntoIterator<Item = &'a Contact>,
{
  contacts.into_iter().min_by_key(|c| c.age_key())
}

// ─── NewContact ──────────────────────────────────────────────────────────────

/// Input to [`crate::repository::ContactRepository::insert`].
/// `id`, `created_at` and `updated_at` are always assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
  pub email:        Option<String>,
  pub phone_number: Option<String>,
  pub link:         Link,
}
