//! Identity resolution from HTTP Basic credentials, and the extractors that
//! run it through the access gate.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use leadline_core::{
  admin::Identity,
  gate::{self, GateState},
  workbench::Workbench,
};
use leadline_notify::Mailer;
use serde::Deserialize;

use crate::{ApiError, AppState, AppStore};

/// One account allowed to sign in.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
  pub uid:           String,
  #[serde(default)]
  pub email:         Option<String>,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

impl Account {
  fn identity(&self) -> Identity {
    Identity { uid: self.uid.clone(), email: self.email.clone() }
  }
}

/// Accounts accepted by this server instance.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
  pub accounts: Vec<Account>,
}

/// Decode `Authorization: Basic …` into `(user, password)`.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
  let encoded = headers
    .get(header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Basic ")?;

  let decoded = B64.decode(encoded.trim()).ok()?;
  let creds   = String::from_utf8(decoded).ok()?;
  let (user, password) = creds.split_once(':')?;
  Some((user.to_owned(), password.to_owned()))
}

/// Resolve the caller's identity. Missing, malformed or wrong credentials
/// all resolve to no identity.
///
/// The user part may be the account's uid or its email.
pub fn resolve_identity(headers: &HeaderMap, config: &AuthConfig) -> Option<Identity> {
  let (user, password) = basic_credentials(headers)?;

  let account = config
    .accounts
    .iter()
    .find(|a| a.uid == user || a.email.as_deref() == Some(user.as_str()))?;

  let parsed_hash = PasswordHash::new(&account.password_hash).ok()?;
  match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
    Ok(()) => Some(account.identity()),
    Err(_) => {
      tracing::debug!(uid = %account.uid, "password verification failed");
      None
    }
  }
}

async fn gate_state<S, M>(parts: &Parts, state: &AppState<S, M>) -> GateState
where
  S: AppStore,
  M: Mailer + 'static,
{
  let identity = resolve_identity(&parts.headers, &state.auth);
  gate::resolve(identity, Some(state.store.as_ref())).await
}

// ─── Extractors ──────────────────────────────────────────────────────────────

/// The caller's gate state. Never rejects.
pub struct Session(pub GateState);

impl<S, M> FromRequestParts<AppState<S, M>> for Session
where
  S: AppStore,
  M: Mailer + 'static,
{
  type Rejection = std::convert::Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, M>,
  ) -> Result<Self, Self::Rejection> {
    Ok(Session(gate_state(parts, state).await))
  }
}

/// An open admin workbench. Present in a handler means the caller passed the
/// gate and holds a live subscription.
pub struct AdminSession<S: AppStore>(pub Workbench<S>);

impl<S, M> FromRequestParts<AppState<S, M>> for AdminSession<S>
where
  S: AppStore,
  M: Mailer + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, M>,
  ) -> Result<Self, Self::Rejection> {
    let gate = gate_state(parts, state).await;
    let workbench = Workbench::open(&gate, state.store.clone()).await?;
    Ok(AdminSession(workbench))
  }
}
