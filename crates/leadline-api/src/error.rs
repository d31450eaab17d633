//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use leadline_core::{gate::GateDenied, workbench::WorkbenchError};
use leadline_notify::{FieldErrors, MailError};
use serde_json::json;
use thiserror::Error;

/// Realm advertised in the Basic-auth challenge.
pub const AUTH_REALM: &str = "leadline";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unsupported media type: {0}")]
  UnsupportedMediaType(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("not found: {0}")]
  NotFound(String),

  /// The admin gate did not let the caller through.
  #[error("access denied: {0}")]
  Denied(#[from] GateDenied),

  /// Demo-request payload failed validation.
  #[error("invalid demo request")]
  Validation(FieldErrors),

  #[error(transparent)]
  Mail(#[from] MailError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

impl<E> From<WorkbenchError<E>> for ApiError
where
  E: std::error::Error + Send + Sync + 'static,
{
  fn from(e: WorkbenchError<E>) -> Self {
    match e {
      WorkbenchError::Denied(denied) => Self::Denied(denied),
      WorkbenchError::Store(e) => Self::store(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::UnsupportedMediaType(m) => {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, Json(json!({ "error": m }))).into_response()
      }
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response()
      }

      // Gate outcomes are presented states rather than error messages.
      ApiError::Denied(GateDenied::NoPermission) => {
        (StatusCode::FORBIDDEN, Json(json!({ "state": "forbidden" }))).into_response()
      }
      ApiError::Denied(GateDenied::Pending | GateDenied::SignInRequired) => (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, format!("Basic realm=\"{AUTH_REALM}\""))],
        Json(json!({ "state": "unauthenticated" })),
      )
        .into_response(),

      ApiError::Validation(errors) => (
        StatusCode::BAD_REQUEST,
        Json(json!({ "ok": false, "errors": errors })),
      )
        .into_response(),
      ApiError::Mail(MailError::NotConfigured) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "ok": false, "error": "RESEND_API_KEY not configured" })),
      )
        .into_response(),
      ApiError::Mail(MailError::Upstream { payload, .. }) => {
        (StatusCode::BAD_GATEWAY, Json(json!({ "ok": false, "error": payload }))).into_response()
      }
      ApiError::Mail(e @ MailError::Transport(_)) => (
        StatusCode::BAD_GATEWAY,
        Json(json!({ "ok": false, "error": e.to_string() })),
      )
        .into_response(),

      ApiError::Store(e) => {
        tracing::error!(error = %e, "store operation failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": e.to_string() })),
        )
          .into_response()
      }
    }
  }
}
