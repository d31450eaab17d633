//! [`SqliteStore`]: the SQLite implementation of [`LeadStore`] and
//! [`AdminDirectory`].

use std::{path::Path, sync::Arc};

use chrono::Utc;
use rusqlite::{OptionalExtension as _, types::Value};
use tokio::sync::Mutex;
use uuid::Uuid;

use leadline_core::{
  admin::{AdminDirectory, AdminRecord},
  feed::{LeadFeed, LeadSubscription},
  lead::{Lead, LeadPatch, LeadStatus, NewLead, Note, Priority},
  store::LeadStore,
};

use crate::{
  Error, Result,
  encode::{
    LEAD_COLUMNS, RawLead, encode_dt, encode_notes, encode_priority, encode_status,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Leadline store backed by a single SQLite file.
///
/// Cloning is cheap: the connection and the live feed are shared.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
  feed:            Arc<LeadFeed>,
  /// Serialises re-listing and publishing. Holds `true` while the feed's
  /// snapshot lags the table, i.e. before the first publish and after any
  /// write that happened with nobody subscribed.
  stale:           Arc<Mutex<bool>>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::with_connection(conn).await
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::with_connection(conn).await
  }

  async fn with_connection(conn: tokio_rusqlite::Connection) -> Result<Self> {
    let store = Self {
      conn,
      feed: Arc::new(LeadFeed::new()),
      stale: Arc::new(Mutex::new(true)),
    };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Number of live subscriptions currently held against this store.
  pub fn subscriber_count(&self) -> usize { self.feed.subscriber_count() }

  async fn fetch_lead(&self, id: Uuid) -> Result<Option<Lead>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawLead> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {LEAD_COLUMNS} FROM leads WHERE lead_id = ?1"),
            rusqlite::params![id_str],
            RawLead::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawLead::into_lead).transpose()
  }

  /// Push a fresh ordered snapshot to subscribers, if there are any.
  /// Otherwise the feed is only marked stale.
  ///
  /// Listing happens under the publish lock, so a later publish always
  /// carries a later listing. The write that triggered the publish has
  /// already succeeded, so a failed re-listing is only logged.
  async fn notify_subscribers(&self) {
    let mut stale = self.stale.lock().await;
    if !self.feed.has_subscribers() {
      *stale = true;
      return;
    }
    match self.list_leads().await {
      Ok(leads) => {
        let version = self.feed.publish(leads);
        *stale = false;
        tracing::debug!(version, "published lead snapshot");
      }
      Err(e) => {
        *stale = true;
        tracing::error!(error = %e, "failed to refresh lead snapshot");
      }
    }
  }
}

// ─── LeadStore impl ──────────────────────────────────────────────────────────

impl LeadStore for SqliteStore {
  type Error = Error;

  async fn create_lead(&self, input: NewLead) -> Result<Lead> {
    let id     = Uuid::new_v4();
    let id_str = encode_uuid(id);

    self
      .conn
      .call(move |conn| {
        let now = encode_dt(Utc::now());
        conn.execute(
          "INSERT INTO leads (
             lead_id, name, email, message, source, status, priority,
             assigned_to, follow_up_at, last_note, notes_json, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, NULL, '', '[]', ?8, ?8)",
          rusqlite::params![
            id_str,
            input.name,
            input.email,
            input.message,
            input.source,
            encode_status(LeadStatus::New),
            encode_priority(Priority::Normal),
            now,
          ],
        )?;
        Ok(())
      })
      .await?;

    let lead = self.fetch_lead(id).await?.ok_or(Error::LeadNotFound(id))?;
    self.notify_subscribers().await;
    Ok(lead)
  }

  async fn get_lead(&self, id: Uuid) -> Result<Option<Lead>> { self.fetch_lead(id).await }

  async fn list_leads(&self) -> Result<Vec<Lead>> {
    let raws: Vec<RawLead> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {LEAD_COLUMNS} FROM leads ORDER BY updated_at DESC, lead_id"
        ))?;
        let rows = stmt
          .query_map([], RawLead::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLead::into_lead).collect()
  }

  async fn update_lead(&self, id: Uuid, patch: LeadPatch) -> Result<Lead> {
    // Build the SET clause from the fields present in the patch.
    let mut sets: Vec<&'static str> = vec![];
    let mut values: Vec<Value> = vec![];

    if let Some(status) = patch.status {
      sets.push("status = ?");
      values.push(Value::Text(encode_status(status).to_owned()));
    }
    if let Some(priority) = patch.priority {
      sets.push("priority = ?");
      values.push(Value::Text(encode_priority(priority).to_owned()));
    }
    if let Some(assigned_to) = patch.assigned_to {
      sets.push("assigned_to = ?");
      values.push(assigned_to.map_or(Value::Null, Value::Text));
    }
    if let Some(follow_up_at) = patch.follow_up_at {
      sets.push("follow_up_at = ?");
      values.push(follow_up_at.map_or(Value::Null, |at| Value::Text(encode_dt(at))));
    }

    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        sets.push("updated_at = ?");
        values.push(Value::Text(encode_dt(Utc::now())));
        values.push(Value::Text(id_str));

        let sql = format!("UPDATE leads SET {} WHERE lead_id = ?", sets.join(", "));
        Ok(conn.execute(&sql, rusqlite::params_from_iter(values))?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::LeadNotFound(id));
    }

    let lead = self.fetch_lead(id).await?.ok_or(Error::LeadNotFound(id))?;
    self.notify_subscribers().await;
    Ok(lead)
  }

  async fn append_note(&self, id: Uuid, note: Note) -> Result<Lead> {
    // Read, append in memory, write the whole list back. The read and the
    // write are separate statements: concurrent appends are last-writer-wins.
    let mut notes = self
      .fetch_lead(id)
      .await?
      .ok_or(Error::LeadNotFound(id))?
      .notes;
    let last_note = note.text.clone();
    notes.push(note);

    let notes_str = encode_notes(&notes)?;
    let id_str    = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE leads SET notes_json = ?1, last_note = ?2, updated_at = ?3
           WHERE lead_id = ?4",
          rusqlite::params![notes_str, last_note, encode_dt(Utc::now()), id_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::LeadNotFound(id));
    }

    let lead = self.fetch_lead(id).await?.ok_or(Error::LeadNotFound(id))?;
    self.notify_subscribers().await;
    Ok(lead)
  }

  async fn subscribe(&self) -> Result<LeadSubscription> {
    // Register before taking the lock: a write that sees no subscribers
    // marks the feed stale before this check runs, and any later write
    // publishes to this subscriber.
    let subscription = self.feed.subscribe();
    let mut stale = self.stale.lock().await;
    if *stale {
      let leads = self.list_leads().await?;
      let version = self.feed.publish(leads);
      *stale = false;
      tracing::debug!(version, "refreshed stale lead snapshot");
    }
    Ok(subscription)
  }
}

// ─── AdminDirectory impl ─────────────────────────────────────────────────────

impl AdminDirectory for SqliteStore {
  type Error = Error;

  async fn is_admin(&self, uid: &str) -> Result<bool> {
    let uid = uid.to_owned();

    let flag: Option<bool> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT is_admin FROM admins WHERE uid = ?1",
            rusqlite::params![uid],
            |r| r.get(0),
          )
          .optional()?)
      })
      .await?;

    Ok(flag.unwrap_or(false))
  }

  async fn set_admin(&self, uid: &str, is_admin: bool) -> Result<AdminRecord> {
    let uid_owned = uid.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO admins (uid, is_admin, updated_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(uid) DO UPDATE SET
             is_admin = excluded.is_admin,
             updated_at = excluded.updated_at",
          rusqlite::params![uid_owned, is_admin, encode_dt(Utc::now())],
        )?;
        Ok(())
      })
      .await?;

    Ok(AdminRecord { uid: uid.to_owned(), is_admin })
  }

  async fn list_admins(&self) -> Result<Vec<AdminRecord>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT uid, is_admin FROM admins ORDER BY uid")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(AdminRecord { uid: row.get(0)?, is_admin: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }
}
