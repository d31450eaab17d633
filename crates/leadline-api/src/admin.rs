//! Handlers for the gated `/admin` workflow.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/admin/session` | gate state, always 200 |
//! | `GET`    | `/admin/leads` | `?q=&status=&priority=&mine=&view=&sort=&dir=` |
//! | `GET`    | `/admin/leads/stream` | SSE, one `leads` event per snapshot |
//! | `GET`    | `/admin/leads/{id}` | 404 if not found |
//! | `PATCH`  | `/admin/leads/{id}` | `{"status"?, "priority"?}` |
//! | `POST`   | `/admin/leads/{id}/assignee` | assign to the caller |
//! | `DELETE` | `/admin/leads/{id}/assignee` | unassign |
//! | `POST`   | `/admin/leads/{id}/notes` | `{"text"}` |
//! | `POST`   | `/admin/leads/{id}/follow-up` | `{"at"}` |

use axum::{
  Json,
  extract::{Path, Query},
  http::StatusCode,
  response::{
    IntoResponse, Response,
    sse::{Event, KeepAlive, Sse},
  },
};
use leadline_core::{
  filter::LeadFilter,
  gate::GateState,
  lead::{Lead, LeadStatus, Priority, parse_follow_up},
  view::{Projection, SortDir, SortKey, TableSort, ViewMode},
  workbench::Workbench,
};
use serde::{Deserialize, Serialize};
use tokio_stream::{Stream, StreamExt as _, wrappers::WatchStream};
use uuid::Uuid;

use crate::{
  ApiError, AppStore,
  auth::{AdminSession, Session},
};

// ─── Session ─────────────────────────────────────────────────────────────────

/// The gate state as presented to the admin surface.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
  pub state:    &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub uid:      Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email:    Option<String>,
  pub is_admin: bool,
}

impl From<GateState> for SessionView {
  fn from(gate: GateState) -> Self {
    match gate {
      GateState::Loading => {
        Self { state: "loading", uid: None, email: None, is_admin: false }
      }
      GateState::Unauthenticated => {
        Self { state: "unauthenticated", uid: None, email: None, is_admin: false }
      }
      GateState::Authenticated { identity, is_admin } => Self {
        state: "authenticated",
        uid: Some(identity.uid),
        email: identity.email,
        is_admin,
      },
    }
  }
}

/// `GET /admin/session`
pub async fn session(Session(gate): Session) -> Json<SessionView> {
  Json(gate.into())
}

// ─── Listing ─────────────────────────────────────────────────────────────────

/// Query parameters shared by the list and stream endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LeadsQuery {
  pub q:        String,
  /// A status, or `all`/empty for every status.
  pub status:   Option<String>,
  /// A priority, or `all`/empty for every priority.
  pub priority: Option<String>,
  pub mine:     bool,
  pub view:     ViewMode,
  pub sort:     Option<SortKey>,
  pub dir:      SortDir,
}

fn is_all(s: &str) -> bool {
  let s = s.trim();
  s.is_empty() || s.eq_ignore_ascii_case("all")
}

fn parse_status(s: &str) -> Result<LeadStatus, ApiError> {
  LeadStatus::parse(s.trim())
    .ok_or_else(|| ApiError::BadRequest(format!("unknown status: {s}")))
}

fn parse_priority(s: &str) -> Result<Priority, ApiError> {
  Priority::parse(s.trim())
    .ok_or_else(|| ApiError::BadRequest(format!("unknown priority: {s}")))
}

impl LeadsQuery {
  /// Configure `wb`'s filter and presentation from the query.
  pub fn apply_to<S: AppStore>(self, wb: &mut Workbench<S>) -> Result<(), ApiError> {
    let status = self
      .status
      .as_deref()
      .filter(|s| !is_all(s))
      .map(parse_status)
      .transpose()?;
    let priority = self
      .priority
      .as_deref()
      .filter(|s| !is_all(s))
      .map(parse_priority)
      .transpose()?;

    wb.filter = LeadFilter { search: self.q, status, priority, only_mine: self.mine };
    wb.mode = self.view;
    wb.sort = self.sort.map(|key| TableSort { key, dir: self.dir });
    Ok(())
  }
}

/// `GET /admin/leads`
pub async fn list<S: AppStore>(
  AdminSession(mut wb): AdminSession<S>,
  Query(query): Query<LeadsQuery>,
) -> Result<Json<Projection>, ApiError> {
  query.apply_to(&mut wb)?;
  Ok(Json(wb.projection()))
}

/// `GET /admin/leads/stream`
///
/// Emits the current projection immediately, then one event per pushed
/// snapshot. The subscription is released when the client disconnects.
pub async fn stream<S: AppStore>(
  AdminSession(mut wb): AdminSession<S>,
  Query(query): Query<LeadsQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
  query.apply_to(&mut wb)?;

  let filter = wb.filter.clone();
  let (mode, sort) = (wb.mode, wb.sort);
  let me = wb.admin().email.clone();
  tracing::debug!(uid = %wb.admin().uid, "lead stream opened");

  let updates = WatchStream::new(wb.into_subscription().into_receiver()).map(move |snapshot| {
    let filtered = filter.apply(&snapshot.leads, me.as_deref());
    let projection =
      Projection::build(snapshot.version, &filtered, snapshot.leads.len(), mode, sort);
    Event::default().event("leads").json_data(&projection)
  });

  Ok(Sse::new(updates).keep_alive(KeepAlive::default()))
}

// ─── Single lead ─────────────────────────────────────────────────────────────

fn not_found(id: Uuid) -> ApiError { ApiError::NotFound(format!("lead {id} not found")) }

/// Fail with 404 unless `id` is in the session's snapshot.
fn ensure_known<S: AppStore>(wb: &Workbench<S>, id: Uuid) -> Result<(), ApiError> {
  if wb.snapshot().leads.iter().any(|l| l.id == id) {
    Ok(())
  } else {
    Err(not_found(id))
  }
}

/// The updated lead, or 204 when the action was a no-op.
fn lead_or_no_content(lead: Option<Lead>) -> Response {
  match lead {
    Some(lead) => Json(lead).into_response(),
    None => StatusCode::NO_CONTENT.into_response(),
  }
}

/// `GET /admin/leads/{id}`
pub async fn detail<S: AppStore>(
  AdminSession(mut wb): AdminSession<S>,
  Path(id): Path<Uuid>,
) -> Result<Json<Lead>, ApiError> {
  wb.select(id);
  wb.detail().map(Json).ok_or_else(|| not_found(id))
}

#[derive(Debug, Deserialize)]
pub struct WorkflowBody {
  pub status:   Option<String>,
  pub priority: Option<String>,
}

/// `PATCH /admin/leads/{id}`
pub async fn update<S: AppStore>(
  AdminSession(wb): AdminSession<S>,
  Path(id): Path<Uuid>,
  Json(body): Json<WorkflowBody>,
) -> Result<Json<Lead>, ApiError> {
  let status = body.status.as_deref().map(parse_status).transpose()?;
  let priority = body.priority.as_deref().map(parse_priority).transpose()?;
  if status.is_none() && priority.is_none() {
    return Err(ApiError::BadRequest("nothing to update".into()));
  }

  ensure_known(&wb, id)?;
  let lead = wb
    .set_workflow(id, status, priority)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(lead_id = %id, by = %wb.admin().uid, ?status, ?priority, "lead workflow updated");
  Ok(Json(lead))
}

/// `POST /admin/leads/{id}/assignee`
///
/// Admins without an email cannot be assignees; the request is a no-op.
pub async fn assign<S: AppStore>(
  AdminSession(wb): AdminSession<S>,
  Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
  ensure_known(&wb, id)?;
  let lead = wb.assign_to_self(id).await.map_err(ApiError::store)?;
  Ok(lead_or_no_content(lead))
}

/// `DELETE /admin/leads/{id}/assignee`
pub async fn unassign<S: AppStore>(
  AdminSession(wb): AdminSession<S>,
  Path(id): Path<Uuid>,
) -> Result<Json<Lead>, ApiError> {
  ensure_known(&wb, id)?;
  let lead = wb.unassign(id).await.map_err(ApiError::store)?;
  Ok(Json(lead))
}

#[derive(Debug, Deserialize)]
pub struct NoteBody {
  pub text: String,
}

/// `POST /admin/leads/{id}/notes`
pub async fn add_note<S: AppStore>(
  AdminSession(wb): AdminSession<S>,
  Path(id): Path<Uuid>,
  Json(body): Json<NoteBody>,
) -> Result<Response, ApiError> {
  ensure_known(&wb, id)?;
  let lead = wb.add_note(id, &body.text).await.map_err(ApiError::store)?;
  Ok(lead_or_no_content(lead))
}

#[derive(Debug, Deserialize)]
pub struct FollowUpBody {
  #[serde(default)]
  pub at: String,
}

/// `POST /admin/leads/{id}/follow-up`
pub async fn follow_up<S: AppStore>(
  AdminSession(wb): AdminSession<S>,
  Path(id): Path<Uuid>,
  Json(body): Json<FollowUpBody>,
) -> Result<Response, ApiError> {
  if body.at.trim().is_empty() {
    return Ok(StatusCode::NO_CONTENT.into_response());
  }
  if parse_follow_up(&body.at).is_none() {
    return Err(ApiError::BadRequest(format!("unrecognised date-time: {}", body.at)));
  }

  ensure_known(&wb, id)?;
  let lead = wb
    .schedule_follow_up(id, &body.at)
    .await
    .map_err(ApiError::store)?;
  Ok(lead_or_no_content(lead))
}
