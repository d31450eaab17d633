//! `/api/book-demo`: demo requests are validated and mailed to sales.
//! Nothing is written to the lead store.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use bytes::Bytes;
use leadline_notify::{DemoRequest, DemoRequestBody, FieldErrors, Mailer};
use serde_json::{Value, json};

use crate::{ApiError, AppState, AppStore};

/// `POST /api/book-demo`
pub async fn book<S, M>(
  State(state): State<AppState<S, M>>,
  body: Bytes,
) -> Result<Json<Value>, ApiError>
where
  S: AppStore,
  M: Mailer + 'static,
{
  let body: DemoRequestBody = serde_json::from_slice(&body)
    .map_err(|e| ApiError::Validation(FieldErrors::form(format!("Invalid JSON: {e}"))))?;

  let request = DemoRequest::validate(body).map_err(ApiError::Validation)?;
  let sent = state.notifier.notify(&request).await?;

  Ok(Json(json!({ "ok": true, "id": sent.id })))
}

/// `GET /api/book-demo`
pub async fn method_not_allowed() -> impl IntoResponse {
  (
    StatusCode::METHOD_NOT_ALLOWED,
    Json(json!({ "error": "Method Not Allowed" })),
  )
}
