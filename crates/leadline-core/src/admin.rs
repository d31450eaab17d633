//! Admin identities and the allow-list that authorises them.

use std::future::Future;

use serde::{Deserialize, Serialize};

/// An authenticated principal, as resolved by the identity layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  /// Stable unique identifier; the allow-list is keyed by it.
  pub uid:   String,
  pub email: Option<String>,
}

impl Identity {
  /// The name recorded as a note author: email if known, else the uid.
  pub fn author(&self) -> &str { self.email.as_deref().unwrap_or(&self.uid) }
}

/// One allow-list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRecord {
  pub uid:      String,
  pub is_admin: bool,
}

/// Keyed lookup of admin authorisation by identity uid.
pub trait AdminDirectory: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Whether `uid` is flagged as an admin. Unknown uids are not admins.
  fn is_admin<'a>(
    &'a self,
    uid: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Insert or update the allow-list entry for `uid`.
  fn set_admin<'a>(
    &'a self,
    uid: &'a str,
    is_admin: bool,
  ) -> impl Future<Output = Result<AdminRecord, Self::Error>> + Send + 'a;

  fn list_admins(
    &self,
  ) -> impl Future<Output = Result<Vec<AdminRecord>, Self::Error>> + Send + '_;
}
