//! Lead types: the single persisted entity of the Leadline store.
//!
//! A lead is created once by the public intake endpoint and afterwards only
//! mutated through partial updates issued by admins. Leads are never deleted.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Maximum number of characters kept for any submitted text field.
pub const MAX_FIELD_CHARS: usize = 10_000;

/// Source recorded when a submission does not name one.
pub const DEFAULT_SOURCE: &str = "web";

// ─── Workflow enums ──────────────────────────────────────────────────────────

/// Triage status of a lead.
///
/// No transition graph is enforced: any status can be selected from any other.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
  #[default]
  #[serde(alias = "nuevo")]
  New,
  #[serde(alias = "en_progreso")]
  InProgress,
  #[serde(alias = "cerrado")]
  Closed,
  #[serde(alias = "descartado")]
  Discarded,
}

impl LeadStatus {
  /// Board order.
  pub const ALL: [LeadStatus; 4] =
    [Self::New, Self::InProgress, Self::Closed, Self::Discarded];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::New => "new",
      Self::InProgress => "in_progress",
      Self::Closed => "closed",
      Self::Discarded => "discarded",
    }
  }

  /// Parse a stored value. Unknown values yield `None` so readers fall back
  /// to [`LeadStatus::New`] without rewriting the record.
  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "new" | "nuevo" => Some(Self::New),
      "in_progress" | "en_progreso" => Some(Self::InProgress),
      "closed" | "cerrado" => Some(Self::Closed),
      "discarded" | "descartado" => Some(Self::Discarded),
      _ => None,
    }
  }
}

/// Handling priority of a lead.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Default,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
  #[serde(alias = "baja")]
  Low,
  #[default]
  Normal,
  #[serde(alias = "alta")]
  High,
}

impl Priority {
  pub const ALL: [Priority; 3] = [Self::Low, Self::Normal, Self::High];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Low => "low",
      Self::Normal => "normal",
      Self::High => "high",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "low" | "baja" => Some(Self::Low),
      "normal" => Some(Self::Normal),
      "high" | "alta" => Some(Self::High),
      _ => None,
    }
  }
}

// ─── Notes ───────────────────────────────────────────────────────────────────

/// One entry of a lead's append-only note history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
  pub text: String,
  pub at:   DateTime<Utc>,
  /// Email (or uid) of the admin who wrote the note. Older records may lack it.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub by:   Option<String>,
}

impl Note {
  pub fn new(text: impl Into<String>, by: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      at:   Utc::now(),
      by:   Some(by.into()),
    }
  }
}

// ─── Lead ────────────────────────────────────────────────────────────────────

/// A prospective customer's inquiry, tracked through the triage workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
  pub id:           Uuid,
  pub name:         String,
  pub email:        String,
  pub message:      String,
  pub source:       String,
  /// Stored status; `None` when absent or unrecognised.
  #[serde(default, deserialize_with = "lenient_status")]
  pub status:       Option<LeadStatus>,
  /// Stored priority; `None` when absent or unrecognised.
  #[serde(default, deserialize_with = "lenient_priority")]
  pub priority:     Option<Priority>,
  pub assigned_to:  Option<String>,
  pub follow_up_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub last_note:    String,
  #[serde(default)]
  pub notes:        Vec<Note>,
  /// Store-assigned; never changes after creation.
  pub created_at:   DateTime<Utc>,
  /// Store-assigned on every mutation.
  pub updated_at:   DateTime<Utc>,
}

impl Lead {
  /// The status readers act on: a missing status reads as `new`.
  pub fn effective_status(&self) -> LeadStatus { self.status.unwrap_or_default() }

  /// The priority readers act on: a missing priority reads as `normal`.
  pub fn effective_priority(&self) -> Priority {
    self.priority.unwrap_or_default()
  }

  pub fn is_assigned_to(&self, email: &str) -> bool {
    self.assigned_to.as_deref() == Some(email)
  }
}

fn lenient_status<'de, D>(d: D) -> Result<Option<LeadStatus>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw: Option<String> = Option::deserialize(d)?;
  Ok(raw.as_deref().and_then(LeadStatus::parse))
}

fn lenient_priority<'de, D>(d: D) -> Result<Option<Priority>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw: Option<String> = Option::deserialize(d)?;
  Ok(raw.as_deref().and_then(Priority::parse))
}

// ─── NewLead ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::LeadStore::create_lead`].
///
/// Only contact fields are accepted; workflow state, identifiers and
/// timestamps are always assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
  pub name:    String,
  pub email:   String,
  pub message: String,
  pub source:  String,
}

impl NewLead {
  /// Normalise a raw public submission.
  ///
  /// Every field is trimmed and capped at [`MAX_FIELD_CHARS`]; an empty
  /// source becomes [`DEFAULT_SOURCE`]. Fails if `name` or `message` ends up
  /// empty.
  pub fn from_submission(
    name: Option<&str>,
    email: Option<&str>,
    message: Option<&str>,
    source: Option<&str>,
  ) -> Result<Self> {
    let name    = normalize_field(name.unwrap_or_default());
    let email   = normalize_field(email.unwrap_or_default());
    let message = normalize_field(message.unwrap_or_default());
    let source  = normalize_field(source.unwrap_or_default());

    if name.is_empty() {
      return Err(Error::MissingField("name"));
    }
    if message.is_empty() {
      return Err(Error::MissingField("message"));
    }

    let source = if source.is_empty() { DEFAULT_SOURCE.to_owned() } else { source };

    Ok(Self { name, email, message, source })
  }
}

/// Trim surrounding whitespace and keep at most [`MAX_FIELD_CHARS`] characters.
pub fn normalize_field(raw: &str) -> String {
  raw.trim().chars().take(MAX_FIELD_CHARS).collect()
}

// ─── LeadPatch ───────────────────────────────────────────────────────────────

/// A partial update merged into an existing lead.
///
/// Fields left as `None` are untouched. The nested options on `assigned_to`
/// and `follow_up_at` distinguish "leave alone" from "clear". There is no
/// timestamp field: `updatedAt` is always stamped by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadPatch {
  pub status:       Option<LeadStatus>,
  pub priority:     Option<Priority>,
  pub assigned_to:  Option<Option<String>>,
  pub follow_up_at: Option<Option<DateTime<Utc>>>,
}

impl LeadPatch {
  pub fn status(status: LeadStatus) -> Self {
    Self { status: Some(status), ..Self::default() }
  }

  pub fn priority(priority: Priority) -> Self {
    Self { priority: Some(priority), ..Self::default() }
  }

  pub fn assign(email: impl Into<String>) -> Self {
    Self { assigned_to: Some(Some(email.into())), ..Self::default() }
  }

  pub fn unassign() -> Self {
    Self { assigned_to: Some(None), ..Self::default() }
  }

  pub fn follow_up(at: DateTime<Utc>) -> Self {
    Self { follow_up_at: Some(Some(at)), ..Self::default() }
  }

  pub fn is_empty(&self) -> bool {
    self.status.is_none()
      && self.priority.is_none()
      && self.assigned_to.is_none()
      && self.follow_up_at.is_none()
  }
}

// ─── Follow-up input ─────────────────────────────────────────────────────────

/// Parse a follow-up time typed by an admin.
///
/// Accepts RFC 3339 or an HTML `datetime-local` value
/// (`YYYY-MM-DDTHH:MM[:SS]`, read as UTC). Blank or unparsable input yields
/// `None`, in which case no write is issued.
pub fn parse_follow_up(input: &str) -> Option<DateTime<Utc>> {
  let input = input.trim();
  if input.is_empty() {
    return None;
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
    return Some(dt.with_timezone(&Utc));
  }
  ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
    .map(|naive| naive.and_utc())
}
