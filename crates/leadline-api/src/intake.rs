//! `POST /api/lead`: public lead intake.
//!
//! | Outcome | Status |
//! |---------|--------|
//! | `Content-Type` not JSON | 415 |
//! | malformed JSON, or blank `name`/`message` | 400 |
//! | stored | 201 `{"id": …}` |
//! | store failure | 500 |

use axum::{
  Json,
  extract::State,
  http::{HeaderMap, StatusCode, header},
  response::IntoResponse,
};
use bytes::Bytes;
use leadline_core::{lead::NewLead, store::LeadStore};
use leadline_notify::Mailer;
use serde::Deserialize;
use serde_json::json;

use crate::{ApiError, AppState, AppStore};

/// Contact fields accepted from the public form. Anything else in the body,
/// including workflow fields, is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct LeadBody {
  pub name:    Option<String>,
  pub email:   Option<String>,
  pub message: Option<String>,
  pub source:  Option<String>,
}

fn is_json(headers: &HeaderMap) -> bool {
  headers
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|ct| ct.contains("application/json"))
}

/// `POST /api/lead`
pub async fn create<S, M>(
  State(state): State<AppState<S, M>>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
  S: AppStore,
  M: Mailer + 'static,
{
  if !is_json(&headers) {
    return Err(ApiError::UnsupportedMediaType(
      "Content-Type must be application/json".into(),
    ));
  }

  let body: LeadBody = serde_json::from_slice(&body)
    .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {e}")))?;

  let input = NewLead::from_submission(
    body.name.as_deref(),
    body.email.as_deref(),
    body.message.as_deref(),
    body.source.as_deref(),
  )
  .map_err(|_| ApiError::BadRequest("name and message are required".into()))?;

  let lead = state
    .store
    .create_lead(input)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(lead_id = %lead.id, source = %lead.source, "lead created");
  Ok((StatusCode::CREATED, Json(json!({ "id": lead.id }))))
}
