//! Error types for `unison-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Neither an email nor a phone number was supplied.
  #[error("invalid input: {0}")]
  InvalidInput(String),

  /// Any failure reported by the storage collaborator. Never retried here.
  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// Cluster data violates an invariant that cannot be repaired in place.
  #[error("internal inconsistency: {0}")]
  InternalInconsistency(String),
}

impl Error {
  /// Wrap a backend error as [`Error::Storage`].
  pub fn storage<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Storage(Box::new(err))
  }

  /// Whether the caller, rather than the service, is at fault.
  pub fn is_invalid_input(&self) -> bool { matches!(self, Self::InvalidInput(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
