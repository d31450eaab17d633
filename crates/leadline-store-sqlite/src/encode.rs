//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`)
//! so that text ordering matches time ordering. Notes are stored as a compact
//! JSON array. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use leadline_core::lead::{Lead, LeadStatus, Note, Priority};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|_| Error::Timestamp(s.to_owned()))
}

// ─── Workflow enums ───────────────────────────────────────────────────────────

pub fn encode_status(s: LeadStatus) -> &'static str { s.as_str() }

/// Unknown stored values decode to `None`; they are never rewritten.
pub fn decode_status(s: Option<&str>) -> Option<LeadStatus> {
  s.and_then(LeadStatus::parse)
}

pub fn encode_priority(p: Priority) -> &'static str { p.as_str() }

pub fn decode_priority(s: Option<&str>) -> Option<Priority> {
  s.and_then(Priority::parse)
}

// ─── Notes ────────────────────────────────────────────────────────────────────

pub fn encode_notes(notes: &[Note]) -> Result<String> {
  Ok(serde_json::to_string(notes)?)
}

pub fn decode_notes(s: &str) -> Result<Vec<Note>> { Ok(serde_json::from_str(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawLead::from_row`].
pub const LEAD_COLUMNS: &str = "lead_id, name, email, message, source, status, priority,
   assigned_to, follow_up_at, last_note, notes_json, created_at, updated_at";

/// Raw strings read directly from a `leads` row.
pub struct RawLead {
  pub lead_id:      String,
  pub name:         String,
  pub email:        String,
  pub message:      String,
  pub source:       String,
  pub status:       Option<String>,
  pub priority:     Option<String>,
  pub assigned_to:  Option<String>,
  pub follow_up_at: Option<String>,
  pub last_note:    String,
  pub notes_json:   String,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawLead {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      lead_id:      row.get(0)?,
      name:         row.get(1)?,
      email:        row.get(2)?,
      message:      row.get(3)?,
      source:       row.get(4)?,
      status:       row.get(5)?,
      priority:     row.get(6)?,
      assigned_to:  row.get(7)?,
      follow_up_at: row.get(8)?,
      last_note:    row.get(9)?,
      notes_json:   row.get(10)?,
      created_at:   row.get(11)?,
      updated_at:   row.get(12)?,
    })
  }

  pub fn into_lead(self) -> Result<Lead> {
    Ok(Lead {
      id:           decode_uuid(&self.lead_id)?,
      name:         self.name,
      email:        self.email,
      message:      self.message,
      source:       self.source,
      status:       decode_status(self.status.as_deref()),
      priority:     decode_priority(self.priority.as_deref()),
      assigned_to:  self.assigned_to,
      follow_up_at: self.follow_up_at.as_deref().map(decode_dt).transpose()?,
      last_note:    self.last_note,
      notes:        decode_notes(&self.notes_json)?,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}
