//! [`SqliteStore`] — the SQLite implementation of [`ContactStore`].

use std::path::Path;

use rusqlite::TransactionBehavior;
use unison_core::{
  contact::{Contact, ContactId},
  identify::{IdentifyRequest, identify, lookup},
  repository::ContactRepository as _,
  store::{ContactQuery, ContactStore},
  view::ConsolidatedIdentity,
};

use crate::{
  Error, Result,
  encode::{CONTACT_COLUMNS, RawContact, encode_precedence},
  repository::SqliteRepository,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Unison contact store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All clones
/// share one connection thread, so their calls run one at a time.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ContactStore impl ───────────────────────────────────────────────────────

impl ContactStore for SqliteStore {
  type Error = Error;

  async fn identify(&self, request: IdentifyRequest) -> Result<ConsolidatedIdentity> {
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let outcome = identify(&mut SqliteRepository::new(&tx), &request);
        match outcome {
          Ok(_) => tx.commit()?,
          Err(ref e) => {
            tracing::debug!(error = %e, "rolling back identify");
            tx.rollback()?;
          }
        }
        Ok(outcome)
      })
      .await?;

    Ok(outcome?)
  }

  async fn get_contact(&self, id: ContactId) -> Result<Option<Contact>> {
    self
      .conn
      .call(move |conn| Ok(SqliteRepository::new(conn).find_by_id(id)))
      .await?
  }

  async fn list_contacts(&self, query: ContactQuery) -> Result<Vec<Contact>> {
    let precedence = query.precedence.map(encode_precedence);
    let limit_val  = i64::try_from(query.limit.unwrap_or(100)).unwrap_or(i64::MAX);
    let offset_val = i64::try_from(query.offset.unwrap_or(0)).unwrap_or(i64::MAX);

    let raws: Vec<RawContact> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CONTACT_COLUMNS} FROM contacts
           WHERE ?1 IS NULL OR link_precedence = ?1
           ORDER BY id
           LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![precedence, limit_val, offset_val],
            RawContact::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawContact::into_contact).collect()
  }

  async fn identity_of(&self, id: ContactId) -> Result<Option<ConsolidatedIdentity>> {
    let outcome = self
      .conn
      .call(move |conn| {
        // Deferred transaction: one consistent snapshot across the reads.
        let tx = conn.transaction()?;
        let outcome = lookup(&mut SqliteRepository::new(&tx), id);
        tx.commit()?;
        Ok(outcome)
      })
      .await?;

    Ok(outcome?)
  }
}
