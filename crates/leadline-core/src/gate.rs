//! Access gate. Resolves the current identity against the admin allow-list.
//!
//! ```text
//! Loading ──auth event──▶ Unauthenticated            (no identity / no directory)
//!                     └─▶ Authenticated { is_admin } (identity resolved)
//! ```
//!
//! A failed allow-list lookup never grants access: the gate falls back to
//! `Authenticated { is_admin: false }`.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;

use crate::admin::{AdminDirectory, Identity};

// ─── State ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GateState {
  /// Identity resolution is in flight.
  Loading,
  /// No identity, or the allow-list is unreachable.
  Unauthenticated,
  Authenticated {
    identity: Identity,
    #[serde(rename = "isAdmin")]
    is_admin: bool,
  },
}

/// Why a gated caller gets no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateDenied {
  #[error("identity resolution still in progress")]
  Pending,
  #[error("sign-in required")]
  SignInRequired,
  #[error("no admin permission")]
  NoPermission,
}

impl GateState {
  /// The admin identity, or the reason access is denied.
  pub fn admin(&self) -> Result<&Identity, GateDenied> {
    match self {
      Self::Loading => Err(GateDenied::Pending),
      Self::Unauthenticated => Err(GateDenied::SignInRequired),
      Self::Authenticated { is_admin: false, .. } => Err(GateDenied::NoPermission),
      Self::Authenticated { identity, is_admin: true } => Ok(identity),
    }
  }

  pub fn is_admin(&self) -> bool { self.admin().is_ok() }
}

// ─── Resolution ──────────────────────────────────────────────────────────────

/// Resolve one auth event into a gate state.
pub async fn resolve<D>(identity: Option<Identity>, directory: Option<&D>) -> GateState
where
  D: AdminDirectory,
{
  let (Some(identity), Some(directory)) = (identity, directory) else {
    return GateState::Unauthenticated;
  };

  match directory.is_admin(&identity.uid).await {
    Ok(is_admin) => GateState::Authenticated { identity, is_admin },
    Err(e) => lookup_failed_fail_closed(identity, &e),
  }
}

/// The allow-list could not be read: keep the identity, deny admin rights.
fn lookup_failed_fail_closed(
  identity: Identity,
  err: &dyn std::error::Error,
) -> GateState {
  tracing::warn!(uid = %identity.uid, error = %err, "admin lookup failed; denying admin access");
  GateState::Authenticated { identity, is_admin: false }
}

// ─── Session state machine ───────────────────────────────────────────────────

/// Session-scoped gate. Starts in [`GateState::Loading`] and re-resolves on
/// every sign-in, sign-out or session restore. A failed lookup is not retried
/// until the next auth event.
#[derive(Debug)]
pub struct AccessGate<D> {
  directory: Option<Arc<D>>,
  tx:        watch::Sender<GateState>,
}

impl<D: AdminDirectory> AccessGate<D> {
  pub fn new(directory: Option<Arc<D>>) -> Self {
    let (tx, _rx) = watch::channel(GateState::Loading);
    Self { directory, tx }
  }

  /// Feed an auth event (sign-in, sign-out, restore) into the gate.
  pub async fn on_auth_changed(&self, identity: Option<Identity>) -> GateState {
    let next = resolve(identity, self.directory.as_deref()).await;
    self.tx.send_replace(next.clone());
    next
  }

  pub fn state(&self) -> GateState { self.tx.borrow().clone() }

  pub fn watch(&self) -> watch::Receiver<GateState> { self.tx.subscribe() }
}
