//! [`SqliteRepository`] — [`ContactRepository`] over a borrowed connection.
//!
//! The repository does no transaction management of its own. [`SqliteStore`]
//! hands it an open transaction (which derefs to a connection), so all calls
//! of one `identify` commit or roll back together.
//!
//! [`SqliteStore`]: crate::SqliteStore

use chrono::Utc;
use rusqlite::{OptionalExtension as _, types::Value};
use unison_core::{
  contact::{Contact, ContactId, Link, NewContact},
  repository::ContactRepository,
};

use crate::{
  Error, Result,
  encode::{CONTACT_COLUMNS, RawContact, encode_dt, encode_precedence},
};

pub struct SqliteRepository<'a> {
  conn: &'a rusqlite::Connection,
}

impl<'a> SqliteRepository<'a> {
  pub fn new(conn: &'a rusqlite::Connection) -> Self { Self { conn } }

  /// Run a `SELECT` over [`CONTACT_COLUMNS`] and decode every row.
  fn query_contacts(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Contact>> {
    let mut stmt = self.conn.prepare(sql)?;
    let raws = stmt
      .query_map(params, RawContact::from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    raws.into_iter().map(RawContact::into_contact).collect()
  }
}

/// `?first, ?first+1, ...` for an `IN (...)` list of `n` values.
fn placeholders(first: usize, n: usize) -> String {
  (first..first + n)
    .map(|i| format!("?{i}"))
    .collect::<Vec<_>>()
    .join(", ")
}

impl ContactRepository for SqliteRepository<'_> {
  type Error = Error;

  fn find_by_email_or_phone(
    &mut self,
    email: Option<&str>,
    phone: Option<&str>,
  ) -> Result<Vec<Contact>> {
    // `col = NULL` is never true, so an absent argument matches nothing.
    self.query_contacts(
      &format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts
         WHERE email = ?1 OR phone_number = ?2
         ORDER BY id"
      ),
      rusqlite::params![email, phone],
    )
  }

  fn find_by_id(&mut self, id: ContactId) -> Result<Option<Contact>> {
    let raw = self
      .conn
      .query_row(
        &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1"),
        rusqlite::params![id],
        RawContact::from_row,
      )
      .optional()?;
    raw.map(RawContact::into_contact).transpose()
  }

  fn find_by_ids(&mut self, ids: &[ContactId]) -> Result<Vec<Contact>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }
    self.query_contacts(
      &format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id IN ({}) ORDER BY id",
        placeholders(1, ids.len())
      ),
      rusqlite::params_from_iter(ids.iter()),
    )
  }

  fn find_cluster_members(&mut self, primary_id: ContactId) -> Result<Vec<Contact>> {
    self.query_contacts(
      &format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts
         WHERE id = ?1 OR linked_id = ?1
         ORDER BY id"
      ),
      rusqlite::params![primary_id],
    )
  }

  fn insert(&mut self, input: NewContact) -> Result<Contact> {
    let now = Utc::now();
    self.conn.execute(
      "INSERT INTO contacts (
         phone_number, email, linked_id, link_precedence, created_at, updated_at
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
      rusqlite::params![
        input.phone_number,
        input.email,
        input.link.linked_id(),
        encode_precedence(input.link.precedence()),
        encode_dt(now),
      ],
    )?;

    Ok(Contact {
      id:              self.conn.last_insert_rowid(),
      phone_number:    input.phone_number,
      email:           input.email,
      linked_id:       input.link.linked_id(),
      link_precedence: input.link.precedence(),
      created_at:      now,
      updated_at:      now,
      deleted_at:      None,
    })
  }

  fn update(&mut self, id: ContactId, link: Link) -> Result<Contact> {
    let changed = self.conn.execute(
      "UPDATE contacts
       SET link_precedence = ?1, linked_id = ?2, updated_at = ?3
       WHERE id = ?4",
      rusqlite::params![
        encode_precedence(link.precedence()),
        link.linked_id(),
        encode_dt(Utc::now()),
        id,
      ],
    )?;
    if changed == 0 {
      return Err(Error::ContactNotFound(id));
    }
    self.find_by_id(id)?.ok_or(Error::ContactNotFound(id))
  }

  fn batch_update(&mut self, ids: &[ContactId], link: Link) -> Result<()> {
    if ids.is_empty() {
      return Ok(());
    }
    let mut params: Vec<Value> = vec![
      Value::Text(encode_precedence(link.precedence()).to_owned()),
      link.linked_id().map_or(Value::Null, Value::Integer),
      Value::Text(encode_dt(Utc::now())),
    ];
    params.extend(ids.iter().copied().map(Value::Integer));

    let in_list = placeholders(4, ids.len());
    self.conn.execute(
      &format!(
        "UPDATE contacts
         SET link_precedence = ?1, linked_id = ?2, updated_at = ?3
         WHERE id IN ({in_list})"
      ),
      rusqlite::params_from_iter(params),
    )?;
    Ok(())
  }
}
