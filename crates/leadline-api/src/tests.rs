//! Router tests: requests are driven through the full axum stack against an
//! in-memory SQLite store and a capturing mailer.

use std::{
  sync::{Arc, LazyLock, Mutex},
  time::Duration,
};

use argon2::{Algorithm, Argon2, Params, PasswordHasher, Version, password_hash::SaltString};
use axum::{
  Router,
  body::Body,
  http::{Method, Request, StatusCode, header},
  response::Response,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use leadline_core::{
  admin::{AdminDirectory, AdminRecord},
  feed::LeadSubscription,
  lead::{Lead, LeadPatch, LeadStatus, NewLead, Note},
  store::LeadStore,
};
use leadline_notify::{MailConfig, MailError, Mailer, OutgoingEmail, ResendMailer, SentEmail};
use leadline_store_sqlite::SqliteStore;
use rand_core::OsRng;
use serde_json::{Value, json};
use tokio_stream::StreamExt as _;
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::{AppState, ServerConfig, auth::Account, router};

/// Cheap argon2 parameters; verification reads them back from the PHC string.
static PASSWORD_HASH: LazyLock<String> = LazyLock::new(|| {
  let params = Params::new(8, 1, 1, None).unwrap();
  let salt = SaltString::generate(&mut OsRng);
  Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    .hash_password(b"secret", &salt)
    .unwrap()
    .to_string()
});

// ─── Fixtures ────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct FakeMailer {
  sent:   Arc<Mutex<Vec<OutgoingEmail>>>,
  reject: bool,
}

impl Mailer for FakeMailer {
  async fn send(&self, email: OutgoingEmail) -> Result<SentEmail, MailError> {
    if self.reject {
      return Err(MailError::Upstream {
        status:  403,
        payload: json!({ "message": "domain not verified" }),
      });
    }
    self.sent.lock().unwrap().push(email);
    Ok(SentEmail { id: Some("msg_1".into()) })
  }
}

/// Reads go to a healthy in-memory store; every lead write fails.
#[derive(Clone)]
struct ReadOnlyStore(Arc<SqliteStore>);

#[derive(Debug, thiserror::Error)]
enum ReadOnlyError {
  #[error("database is read-only")]
  ReadOnly,
  #[error(transparent)]
  Sqlite(#[from] leadline_store_sqlite::Error),
}

impl LeadStore for ReadOnlyStore {
  type Error = ReadOnlyError;

  async fn create_lead(&self, _: NewLead) -> Result<Lead, ReadOnlyError> {
    Err(ReadOnlyError::ReadOnly)
  }

  async fn get_lead(&self, id: Uuid) -> Result<Option<Lead>, ReadOnlyError> {
    Ok(self.0.get_lead(id).await?)
  }

  async fn list_leads(&self) -> Result<Vec<Lead>, ReadOnlyError> {
    Ok(self.0.list_leads().await?)
  }

  async fn update_lead(&self, _: Uuid, _: LeadPatch) -> Result<Lead, ReadOnlyError> {
    Err(ReadOnlyError::ReadOnly)
  }

  async fn append_note(&self, _: Uuid, _: Note) -> Result<Lead, ReadOnlyError> {
    Err(ReadOnlyError::ReadOnly)
  }

  async fn subscribe(&self) -> Result<LeadSubscription, ReadOnlyError> {
    Ok(self.0.subscribe().await?)
  }
}

impl AdminDirectory for ReadOnlyStore {
  type Error = ReadOnlyError;

  async fn is_admin(&self, uid: &str) -> Result<bool, ReadOnlyError> {
    Ok(self.0.is_admin(uid).await?)
  }

  async fn set_admin(&self, uid: &str, is_admin: bool) -> Result<AdminRecord, ReadOnlyError> {
    Ok(self.0.set_admin(uid, is_admin).await?)
  }

  async fn list_admins(&self) -> Result<Vec<AdminRecord>, ReadOnlyError> {
    Ok(self.0.list_admins().await?)
  }
}

fn server_config() -> ServerConfig {
  let account = |uid: &str, email: Option<&str>| Account {
    uid:           uid.into(),
    email:         email.map(str::to_owned),
    password_hash: PASSWORD_HASH.clone(),
  };
  ServerConfig {
    accounts: vec![
      account("admin", Some("ops@example.com")),
      account("viewer", Some("viewer@example.com")),
    ],
    ..ServerConfig::default()
  }
}

async fn app_with<M: Mailer + 'static>(mailer: M) -> (Router, Arc<SqliteStore>) {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  store.set_admin("admin", true).await.unwrap();
  store.set_admin("viewer", false).await.unwrap();
  let state = AppState::new(store.clone(), mailer, &server_config());
  (router(state), store)
}

async fn app() -> (Router, Arc<SqliteStore>, FakeMailer) {
  let mailer = FakeMailer::default();
  let (router, store) = app_with(mailer.clone()).await;
  (router, store, mailer)
}

fn basic(user: &str) -> String { format!("Basic {}", B64.encode(format!("{user}:secret"))) }

fn json_request(method: Method, uri: &str, user: Option<&str>, body: Value) -> Request<Body> {
  let mut builder = Request::builder()
    .method(method)
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/json");
  if let Some(user) = user {
    builder = builder.header(header::AUTHORIZATION, basic(user));
  }
  builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, user: Option<&str>) -> Request<Body> {
  let mut builder = Request::builder().uri(uri);
  if let Some(user) = user {
    builder = builder.header(header::AUTHORIZATION, basic(user));
  }
  builder.body(Body::empty()).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> Response {
  app.clone().oneshot(req).await.unwrap()
}

async fn body_json(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

async fn seed(store: &SqliteStore, name: &str) -> Uuid {
  let input = NewLead::from_submission(Some(name), Some("x@example.com"), Some("hola"), None)
    .unwrap();
  store.create_lead(input).await.unwrap().id
}

// ─── Intake ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn intake_requires_json_content_type() {
  let (app, store, _) = app().await;
  let req = Request::builder()
    .method(Method::POST)
    .uri("/api/lead")
    .header(header::CONTENT_TYPE, "text/plain")
    .body(Body::from(r#"{"name":"Ana","message":"hola"}"#))
    .unwrap();

  let resp = send(&app, req).await;
  assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
  assert!(store.list_leads().await.unwrap().is_empty());
}

#[tokio::test]
async fn intake_rejects_blank_name_without_writing() {
  let (app, store, _) = app().await;
  let resp = send(
    &app,
    json_request(Method::POST, "/api/lead", None, json!({ "name": "   ", "message": "hola" })),
  )
  .await;

  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert!(body_json(resp).await["error"].is_string());
  assert!(store.list_leads().await.unwrap().is_empty());
}

#[tokio::test]
async fn intake_rejects_malformed_json() {
  let (app, _, _) = app().await;
  let req = Request::builder()
    .method(Method::POST)
    .uri("/api/lead")
    .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
    .body(Body::from("{not json"))
    .unwrap();
  assert_eq!(send(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn intake_stores_lead_with_defaults() {
  let (app, store, _) = app().await;
  let resp = send(
    &app,
    json_request(
      Method::POST,
      "/api/lead",
      None,
      json!({
        "name": "Ana",
        "message": "Necesito un presupuesto para automatizar mi negocio",
        "status": "closed",
        "assignedTo": "someone@example.com",
      }),
    ),
  )
  .await;

  assert_eq!(resp.status(), StatusCode::CREATED);
  let id: Uuid = serde_json::from_value(body_json(resp).await["id"].clone()).unwrap();

  let lead = store.get_lead(id).await.unwrap().unwrap();
  assert_eq!(lead.name, "Ana");
  assert_eq!(lead.source, "web");
  assert_eq!(lead.status, Some(LeadStatus::New));
  assert_eq!(lead.assigned_to, None);
}

// ─── Demo requests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn demo_validation_reports_every_field() {
  let (app, _, mailer) = app().await;
  let resp = send(
    &app,
    json_request(
      Method::POST,
      "/api/book-demo",
      None,
      json!({ "company": "A", "name": "B", "email": "not-an-email", "message": "short" }),
    ),
  )
  .await;

  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = body_json(resp).await;
  assert_eq!(body["ok"], false);
  let fields = body["errors"]["fieldErrors"].as_object().unwrap();
  assert_eq!(fields.len(), 4);
  assert!(mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn demo_malformed_json_is_a_form_error() {
  let (app, _, _) = app().await;
  let req = Request::builder()
    .method(Method::POST)
    .uri("/api/book-demo")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("nope"))
    .unwrap();

  let resp = send(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = body_json(resp).await;
  assert_eq!(body["errors"]["formErrors"].as_array().unwrap().len(), 1);
}

fn valid_demo() -> Value {
  json!({
    "company": "Acme <b>",
    "name": "Ana",
    "email": "ana@acme.io",
    "message": "We want a WhatsApp bot for our sales team",
  })
}

#[tokio::test]
async fn demo_success_mails_and_never_stores() {
  let (app, store, mailer) = app().await;
  let resp = send(&app, json_request(Method::POST, "/api/book-demo", None, valid_demo())).await;

  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(body_json(resp).await, json!({ "ok": true, "id": "msg_1" }));

  let sent = mailer.sent.lock().unwrap();
  assert_eq!(sent.len(), 1);
  assert!(sent[0].html.contains("Acme &lt;b&gt;"));
  assert_eq!(sent[0].reply_to.as_deref(), Some("ana@acme.io"));
  drop(sent);

  assert!(store.list_leads().await.unwrap().is_empty());
}

#[tokio::test]
async fn demo_without_api_key_is_a_server_error() {
  let mailer = ResendMailer::new(&MailConfig::default()).unwrap();
  let (app, _) = app_with(mailer).await;
  let resp = send(&app, json_request(Method::POST, "/api/book-demo", None, valid_demo())).await;

  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(body_json(resp).await["ok"], false);
}

#[tokio::test]
async fn demo_upstream_failure_is_a_bad_gateway() {
  let (app, _) = app_with(FakeMailer { reject: true, ..FakeMailer::default() }).await;
  let resp = send(&app, json_request(Method::POST, "/api/book-demo", None, valid_demo())).await;

  assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
  let body = body_json(resp).await;
  assert_eq!(body["error"]["message"], "domain not verified");
}

#[tokio::test]
async fn demo_get_is_method_not_allowed() {
  let (app, _, _) = app().await;
  let resp = send(&app, get("/api/book-demo", None)).await;
  assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
  assert_eq!(body_json(resp).await["error"], "Method Not Allowed");
}

#[tokio::test]
async fn health_is_ok() {
  let (app, _, _) = app().await;
  let resp = send(&app, get("/api/health", None)).await;
  assert_eq!(resp.status(), StatusCode::OK);
}

// ─── Gate ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn session_reports_each_gate_state() {
  let (app, _, _) = app().await;

  let anon = body_json(send(&app, get("/admin/session", None)).await).await;
  assert_eq!(anon, json!({ "state": "unauthenticated", "isAdmin": false }));

  let viewer = body_json(send(&app, get("/admin/session", Some("viewer"))).await).await;
  assert_eq!(viewer["state"], "authenticated");
  assert_eq!(viewer["isAdmin"], false);

  let admin = body_json(send(&app, get("/admin/session", Some("admin"))).await).await;
  assert_eq!(admin["uid"], "admin");
  assert_eq!(admin["email"], "ops@example.com");
  assert_eq!(admin["isAdmin"], true);
}

#[tokio::test]
async fn admin_routes_challenge_anonymous_callers() {
  let (app, _, _) = app().await;
  let resp = send(&app, get("/admin/leads", None)).await;

  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
  assert_eq!(body_json(resp).await, json!({ "state": "unauthenticated" }));
}

#[tokio::test]
async fn non_admin_gets_forbidden_state_and_no_subscription() {
  let (app, store, _) = app().await;
  seed(&store, "Ana").await;

  let resp = send(&app, get("/admin/leads", Some("viewer"))).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  assert_eq!(body_json(resp).await, json!({ "state": "forbidden" }));
  assert_eq!(store.subscriber_count(), 0);
}

// ─── Admin workflow ──────────────────────────────────────────────────────────

#[tokio::test]
async fn list_filters_by_status() {
  let (app, store, _) = app().await;
  seed(&store, "Ana").await;
  let b = seed(&store, "Bruno").await;
  store.update_lead(b, LeadPatch::status(LeadStatus::InProgress)).await.unwrap();

  let resp = send(&app, get("/admin/leads?status=in_progress&view=table", Some("admin"))).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  assert_eq!(body["view"], "table");
  assert_eq!(body["counts"], json!({ "filtered": 1, "total": 2 }));
  assert_eq!(body["rows"][0]["name"], "Bruno");

  let board = body_json(send(&app, get("/admin/leads", Some("admin"))).await).await;
  assert_eq!(board["view"], "board");
  assert_eq!(board["columns"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn list_rejects_unknown_status() {
  let (app, _, _) = app().await;
  let resp = send(&app, get("/admin/leads?status=archived", Some("admin"))).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn detail_and_missing_lead() {
  let (app, store, _) = app().await;
  let id = seed(&store, "Ana").await;

  let resp = send(&app, get(&format!("/admin/leads/{id}"), Some("admin"))).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(body_json(resp).await["name"], "Ana");

  let resp = send(&app, get(&format!("/admin/leads/{}", Uuid::new_v4()), Some("admin"))).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_updates_workflow_fields() {
  let (app, store, _) = app().await;
  let id = seed(&store, "Ana").await;

  let resp = send(
    &app,
    json_request(
      Method::PATCH,
      &format!("/admin/leads/{id}"),
      Some("admin"),
      json!({ "status": "closed", "priority": "alta" }),
    ),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  assert_eq!(body["status"], "closed");
  assert_eq!(body["priority"], "high");

  let resp = send(
    &app,
    json_request(Method::PATCH, &format!("/admin/leads/{id}"), Some("admin"), json!({})),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn assign_twice_then_unassign() {
  let (app, store, _) = app().await;
  let id = seed(&store, "Ana").await;
  let uri = format!("/admin/leads/{id}/assignee");

  for _ in 0..2 {
    let resp = send(&app, json_request(Method::POST, &uri, Some("admin"), json!({}))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["assignedTo"], "ops@example.com");
  }

  let resp = send(&app, json_request(Method::DELETE, &uri, Some("admin"), json!({}))).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert!(body_json(resp).await["assignedTo"].is_null());
}

#[tokio::test]
async fn notes_append_and_blank_is_no_content() {
  let (app, store, _) = app().await;
  let id = seed(&store, "Ana").await;
  let uri = format!("/admin/leads/{id}/notes");

  let resp = send(
    &app,
    json_request(Method::POST, &uri, Some("admin"), json!({ "text": "called back" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  assert_eq!(body["lastNote"], "called back");
  assert_eq!(body["notes"][0]["by"], "ops@example.com");

  let resp = send(&app, json_request(Method::POST, &uri, Some("admin"), json!({ "text": "  " }))).await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);
  assert_eq!(store.get_lead(id).await.unwrap().unwrap().notes.len(), 1);
}

#[tokio::test]
async fn follow_up_blank_garbage_and_valid() {
  let (app, store, _) = app().await;
  let id = seed(&store, "Ana").await;
  let uri = format!("/admin/leads/{id}/follow-up");

  let resp = send(&app, json_request(Method::POST, &uri, Some("admin"), json!({ "at": "" }))).await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);

  let resp = send(
    &app,
    json_request(Method::POST, &uri, Some("admin"), json!({ "at": "someday" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let resp = send(
    &app,
    json_request(Method::POST, &uri, Some("admin"), json!({ "at": "2026-10-20T15:30" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert!(store.get_lead(id).await.unwrap().unwrap().follow_up_at.is_some());
}

#[tokio::test]
async fn stream_sends_current_projection_first() {
  let (app, store, _) = app().await;
  seed(&store, "Ana").await;

  let resp = send(&app, get("/admin/leads/stream?view=table", Some("admin"))).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert!(
    resp.headers()[header::CONTENT_TYPE]
      .to_str()
      .unwrap()
      .starts_with("text/event-stream")
  );

  let mut frames = resp.into_body().into_data_stream();
  let first = frames.next().await.unwrap().unwrap();
  let text = String::from_utf8(first.to_vec()).unwrap();
  assert!(text.contains("event: leads"));
  assert!(text.contains("\"Ana\""));
}

/// Read the next SSE frame as text, or `None` if nothing arrives in time.
async fn next_frame<St>(frames: &mut St) -> Option<String>
where
  St: tokio_stream::Stream<Item = Result<bytes::Bytes, axum::Error>> + Unpin,
{
  let frame = tokio::time::timeout(Duration::from_millis(200), frames.next()).await.ok()?;
  Some(String::from_utf8(frame?.ok()?.to_vec()).unwrap())
}

#[tokio::test]
async fn stream_stays_quiet_on_reads_and_pushes_on_writes() {
  let (app, store, _) = app().await;
  let id = seed(&store, "Ana").await;

  let resp = send(&app, get("/admin/leads/stream?view=table", Some("admin"))).await;
  let mut frames = resp.into_body().into_data_stream();
  let first = next_frame(&mut frames).await.unwrap();
  assert!(first.contains("\"Ana\""));

  assert_eq!(send(&app, get("/admin/leads", Some("admin"))).await.status(), StatusCode::OK);
  assert_eq!(send(&app, get("/admin/session", Some("admin"))).await.status(), StatusCode::OK);
  assert_eq!(
    send(&app, get(&format!("/admin/leads/{id}"), Some("admin"))).await.status(),
    StatusCode::OK
  );
  assert!(next_frame(&mut frames).await.is_none(), "reads must not push a snapshot");

  let resp = send(
    &app,
    json_request(
      Method::PATCH,
      &format!("/admin/leads/{id}"),
      Some("admin"),
      json!({ "status": "closed" }),
    ),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);

  let pushed = next_frame(&mut frames).await.expect("write pushes a snapshot");
  assert!(pushed.contains("event: leads"));
  assert!(pushed.contains("\"status\":\"closed\""));
}

// ─── Store failures ──────────────────────────────────────────────────────────

async fn read_only_app() -> (Router, Uuid) {
  let inner = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  inner.set_admin("admin", true).await.unwrap();
  let id = seed(&inner, "Ana").await;
  let state = AppState::new(
    Arc::new(ReadOnlyStore(inner)),
    FakeMailer::default(),
    &server_config(),
  );
  (router(state), id)
}

#[tokio::test]
async fn intake_store_failure_is_a_server_error() {
  let (app, _) = read_only_app().await;
  let resp = send(
    &app,
    json_request(Method::POST, "/api/lead", None, json!({ "name": "Ana", "message": "hola" })),
  )
  .await;

  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  let body = body_json(resp).await;
  assert!(body["error"].as_str().unwrap().contains("read-only"));
}

#[tokio::test]
async fn admin_write_failure_is_a_server_error() {
  let (app, id) = read_only_app().await;

  let resp = send(
    &app,
    json_request(
      Method::PATCH,
      &format!("/admin/leads/{id}"),
      Some("admin"),
      json!({ "status": "closed" }),
    ),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  assert!(body_json(resp).await["error"].is_string());

  let resp = send(
    &app,
    json_request(
      Method::POST,
      &format!("/admin/leads/{id}/notes"),
      Some("admin"),
      json!({ "text": "called back" }),
    ),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ─── Configuration ───────────────────────────────────────────────────────────

fn env_of(vars: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
  move |name| vars.iter().find(|(k, _)| *k == name).map(|(_, v)| (*v).to_owned())
}

#[test]
fn mail_settings_fall_back_to_plain_env_vars() {
  let cfg = ServerConfig::load_with(
    std::path::Path::new("/nonexistent/leadline.toml"),
    env_of(&[
      ("RESEND_API_KEY", "re_live"),
      ("CONTACT_TO_EMAIL", "sales@example.com"),
      ("CONTACT_FROM_EMAIL", "Leadline <bot@example.com>"),
    ]),
  )
  .unwrap();

  assert_eq!(cfg.mail.api_key.as_deref(), Some("re_live"));
  assert_eq!(cfg.mail.to_email, "sales@example.com");
  assert_eq!(cfg.mail.from_email, "Leadline <bot@example.com>");
  assert_eq!(cfg.port, 3000);
}

#[test]
fn config_file_wins_over_env_fallbacks() {
  let path = std::env::temp_dir().join(format!("leadline-{}.toml", Uuid::new_v4()));
  std::fs::write(&path, "[mail]\nto_email = \"file@example.com\"\n").unwrap();

  let cfg = ServerConfig::load_with(
    &path,
    env_of(&[("CONTACT_TO_EMAIL", "env@example.com"), ("CONTACT_FROM_EMAIL", "  ")]),
  )
  .unwrap();
  std::fs::remove_file(&path).unwrap();

  assert_eq!(cfg.mail.to_email, "file@example.com");
  assert_eq!(cfg.mail.from_email, leadline_notify::mailer::DEFAULT_FROM_EMAIL);
  assert_eq!(cfg.mail.api_key, None);
}
