//! Error type for `civis-store-sqlite`.

use civis_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A domain precondition failed; the transaction was rolled back.
  #[error("ledger error: {0}")]
  Core(#[from] civis_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown {column} discriminant: {value:?}")]
  UnknownDiscriminant {
    column: &'static str,
    value:  String,
  },
}

impl StoreError for Error {
  fn domain(&self) -> Option<&civis_core::Error> {
    match self {
      Self::Core(e) => Some(e),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
