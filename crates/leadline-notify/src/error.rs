//! Error type for `leadline-notify`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
  /// The email API credential is missing from configuration.
  #[error("email API key not configured")]
  NotConfigured,

  /// The email API answered with a non-success status.
  #[error("email API returned {status}: {payload}")]
  Upstream {
    status:  u16,
    /// The upstream `error` payload, or a generic message when absent.
    payload: serde_json::Value,
  },

  #[error("email API request failed: {0}")]
  Transport(#[from] reqwest::Error),
}
