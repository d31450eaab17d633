//! Error type for `leadline-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// The stored notes column is not a valid JSON note list.
  #[error("notes column is not valid JSON: {0}")]
  Notes(#[from] serde_json::Error),

  #[error("stored lead id is not a UUID: {0}")]
  LeadId(#[from] uuid::Error),

  #[error("stored timestamp {0:?} is not RFC 3339")]
  Timestamp(String),

  #[error("lead not found: {0}")]
  LeadNotFound(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
