//! HTTP surface for Leadline.
//!
//! Public intake and demo-request endpoints under `/api`, and the gated admin
//! workflow under `/admin`, all served from one axum [`Router`] backed by any
//! store that is both a [`LeadStore`] and an [`AdminDirectory`].

pub mod admin;
pub mod auth;
pub mod demo;
pub mod error;
pub mod intake;

#[cfg(test)]
mod tests;

pub use error::ApiError;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{
  Json, Router,
  routing::{get, post},
};
use leadline_core::{admin::AdminDirectory, store::LeadStore};
use leadline_notify::{DemoNotifier, MailConfig, Mailer};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use auth::{Account, AuthConfig};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// `LEADLINE__*` environment.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// Accounts that may sign in. Admin rights come from the store's allow-list.
  pub accounts:   Vec<Account>,
  pub mail:       MailConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_owned(),
      port:       3000,
      store_path: PathBuf::from("leadline.db"),
      accounts:   Vec::new(),
      mail:       MailConfig::default(),
    }
  }
}

/// Un-prefixed variables read as defaults for config keys, so a file or
/// `LEADLINE__*` value still wins.
const ENV_FALLBACKS: [(&str, &str); 3] = [
  ("mail.api_key", "RESEND_API_KEY"),
  ("mail.to_email", "CONTACT_TO_EMAIL"),
  ("mail.from_email", "CONTACT_FROM_EMAIL"),
];

impl ServerConfig {
  /// Layer the optional config file at `path` under `LEADLINE__*`
  /// environment overrides, with the process environment's un-prefixed
  /// mail variables as fallbacks.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    Self::load_with(path, |var| std::env::var(var).ok())
  }

  fn load_with(
    path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
  ) -> Result<Self, config::ConfigError> {
    let mut builder = config::Config::builder();
    for (key, var) in ENV_FALLBACKS {
      if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
        builder = builder.set_default(key, value)?;
      }
    }

    builder
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("LEADLINE").separator("__"))
      .build()?
      .try_deserialize()
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Everything a handler needs from the store: lead persistence plus the
/// admin allow-list.
pub trait AppStore: LeadStore + AdminDirectory + 'static {}

impl<T> AppStore for T where T: LeadStore + AdminDirectory + 'static {}

/// Shared state threaded through all axum handlers.
pub struct AppState<S, M> {
  pub store:    Arc<S>,
  pub notifier: Arc<DemoNotifier<M>>,
  pub auth:     Arc<AuthConfig>,
}

impl<S, M> Clone for AppState<S, M> {
  fn clone(&self) -> Self {
    Self {
      store:    self.store.clone(),
      notifier: self.notifier.clone(),
      auth:     self.auth.clone(),
    }
  }
}

impl<S: AppStore, M: Mailer + 'static> AppState<S, M> {
  pub fn new(store: Arc<S>, mailer: M, config: &ServerConfig) -> Self {
    Self {
      store,
      notifier: Arc::new(DemoNotifier::new(mailer, config.mail.clone())),
      auth: Arc::new(AuthConfig { accounts: config.accounts.clone() }),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full Leadline [`Router`].
pub fn router<S, M>(state: AppState<S, M>) -> Router
where
  S: AppStore,
  M: Mailer + 'static,
{
  Router::new()
    // Public
    .route("/api/lead", post(intake::create::<S, M>))
    .route(
      "/api/book-demo",
      post(demo::book::<S, M>).get(demo::method_not_allowed),
    )
    .route("/api/health", get(health))
    // Admin
    .route("/admin/session", get(admin::session))
    .route("/admin/leads", get(admin::list::<S>))
    .route("/admin/leads/stream", get(admin::stream::<S>))
    .route(
      "/admin/leads/{id}",
      get(admin::detail::<S>).patch(admin::update::<S>),
    )
    .route(
      "/admin/leads/{id}/assignee",
      post(admin::assign::<S>).delete(admin::unassign::<S>),
    )
    .route("/admin/leads/{id}/notes", post(admin::add_note::<S>))
    .route("/admin/leads/{id}/follow-up", post(admin::follow_up::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// `GET /api/health`
async fn health() -> Json<Value> { Json(json!({ "ok": true })) }
