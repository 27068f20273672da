//! Error type for `unison-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] unison_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown link precedence: {0:?}")]
  UnknownPrecedence(String),

  /// An update targeted a contact id with no row.
  #[error("contact not found: {0}")]
  ContactNotFound(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Core errors pass through untouched; everything else is a storage failure.
impl From<Error> for unison_core::Error {
  fn from(err: Error) -> Self {
    match err {
      Error::Core(inner) => inner,
      other => unison_core::Error::storage(other),
    }
  }
}
