//! Error types for `leadline-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("lead not found: {0}")]
  LeadNotFound(Uuid),

  /// A required submission field was empty after normalisation.
  #[error("{0} is required")]
  MissingField(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
