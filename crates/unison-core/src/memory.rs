//! [`MemoryRepository`] — a vector-backed [`ContactRepository`].
//!
//! Used to exercise the resolution algorithm without a database. Rows are
//! kept in id order, so every read returns contacts ordered by id just like
//! the SQL backend.

use chrono::Utc;
use thiserror::Error;

use crate::{
  contact::{Contact, ContactId, Link, NewContact},
  repository::ContactRepository,
};

#[derive(Debug, Error)]
pub enum MemoryError {
  #[error("contact not found: {0}")]
  ContactNotFound(ContactId),
}

#[derive(Debug, Clone)]
pub struct MemoryRepository {
  contacts: Vec<Contact>,
  next_id:  ContactId,
}

impl MemoryRepository {
  pub fn new() -> Self { Self { contacts: Vec::new(), next_id: 1 } }

  /// Place a fully-formed row, bypassing id and timestamp assignment.
  ///
  /// Lets callers reproduce histories the algorithm would never write itself,
  /// such as equal creation times or links to contacts that no longer exist.
  pub fn seed(&mut self, contact: Contact) {
    self.next_id = self.next_id.max(contact.id + 1);
    let pos = self.contacts.partition_point(|c| c.id < contact.id);
    if self.contacts.get(pos).is_some_and(|c| c.id == contact.id) {
      self.contacts[pos] = contact;
    } else {
      self.contacts.insert(pos, contact);
    }
  }

  /// All stored rows in id order.
  pub fn contacts(&self) -> &[Contact] { &self.contacts }

  pub fn get(&self, id: ContactId) -> Option<&Contact> {
    self.contacts.iter().find(|c| c.id == id)
  }

  fn get_mut(&mut self, id: ContactId) -> Result<&mut Contact, MemoryError> {
    self
      .contacts
      .iter_mut()
      .find(|c| c.id == id)
      .ok_or(MemoryError::ContactNotFound(id))
  }
}

impl Default for MemoryRepository {
  fn default() -> Self { Self::new() }
}

impl ContactRepository for MemoryRepository {
  type Error = MemoryError;

  fn find_by_email_or_phone(
    &mut self,
    email: Option<&str>,
    phone: Option<&str>,
  ) -> Result<Vec<Contact>, MemoryError> {
    Ok(
      self
        .contacts
        .iter()
        .filter(|c| {
          (email.is_some() && c.email.as_deref() == email)
            || (phone.is_some() && c.phone_number.as_deref() == phone)
        })
        .cloned()
        .collect(),
    )
  }

  fn find_by_id(&mut self, id: ContactId) -> Result<Option<Contact>, MemoryError> {
    Ok(self.get(id).cloned())
  }

  fn find_by_ids(&mut self, ids: &[ContactId]) -> Result<Vec<Contact>, MemoryError> {
    Ok(
      self
        .contacts
        .iter()
        .filter(|c| ids.contains(&c.id))
        .cloned()
        .collect(),
    )
  }

  fn find_cluster_members(
    &mut self,
    primary_id: ContactId,
  ) -> Result<Vec<Contact>, MemoryError> {
    Ok(
      self
        .contacts
        .iter()
        .filter(|c| c.id == primary_id || c.linked_id == Some(primary_id))
        .cloned()
        .collect(),
    )
  }

  fn insert(&mut self, input: NewContact) -> Result<Contact, MemoryError> {
    let now = Utc::now();
    let contact = Contact {
      id:              self.next_id,
      phone_number:    input.phone_number,
      email:           input.email,
      linked_id:       input.link.linked_id(),
      link_precedence: input.link.precedence(),
      created_at:      now,
      updated_at:      now,
      deleted_at:      None,
    };
    self.next_id += 1;
    self.contacts.push(contact.clone());
    Ok(contact)
  }

  fn update(&mut self, id: ContactId, link: Link) -> Result<Contact, MemoryError> {
    let contact = self.get_mut(id)?;
    contact.link_precedence = link.precedence();
    contact.linked_id = link.linked_id();
    contact.updated_at = Utc::now();
    Ok(contact.clone())
  }

  fn batch_update(&mut self, ids: &[ContactId], link: Link) -> Result<(), MemoryError> {
    let now = Utc::now();
    for contact in self.contacts.iter_mut().filter(|c| ids.contains(&c.id)) {
      contact.link_precedence = link.precedence();
      contact.linked_id = link.linked_id();
      contact.updated_at = now;
    }
    Ok(())
  }
}
