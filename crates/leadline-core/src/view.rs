//! Board and table projections of a (filtered) lead list.
//!
//! Both presentations are derived from the same in-memory list; neither
//! holds state of its own.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::lead::{Lead, LeadStatus};

// ─── Modes ───────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
  #[default]
  Board,
  Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
  UpdatedAt,
  CreatedAt,
  Name,
  Priority,
  FollowUpAt,
}

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
  Asc,
  #[default]
  Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSort {
  pub key: SortKey,
  pub dir: SortDir,
}

// ─── Board ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardColumn {
  pub status: LeadStatus,
  pub title:  &'static str,
  pub hint:   &'static str,
  pub count:  usize,
  pub leads:  Vec<Lead>,
}

fn column_labels(status: LeadStatus) -> (&'static str, &'static str) {
  match status {
    LeadStatus::New => ("New", "Recent submissions"),
    LeadStatus::InProgress => ("In progress", "Talking to the customer"),
    LeadStatus::Closed => ("Closed", "Won or resolved"),
    LeadStatus::Discarded => ("Discarded", "Not a fit"),
  }
}

/// Four columns, one per status, in workflow order. Leads without a stored
/// status land in the `new` column.
pub fn board(leads: &[Lead]) -> Vec<BoardColumn> {
  LeadStatus::ALL
    .into_iter()
    .map(|status| {
      let (title, hint) = column_labels(status);
      let leads: Vec<Lead> = leads
        .iter()
        .filter(|l| l.effective_status() == status)
        .cloned()
        .collect();
      BoardColumn { status, title, hint, count: leads.len(), leads }
    })
    .collect()
}

// ─── Table ───────────────────────────────────────────────────────────────────

/// Flat rows. Without a sort the input (feed) order is kept.
pub fn table(leads: &[Lead], sort: Option<TableSort>) -> Vec<Lead> {
  let mut rows = leads.to_vec();
  if let Some(TableSort { key, dir }) = sort {
    rows.sort_by(|a, b| {
      let ord = compare(a, b, key);
      match dir {
        SortDir::Asc => ord,
        SortDir::Desc => ord.reverse(),
      }
    });
  }
  rows
}

fn compare(a: &Lead, b: &Lead, key: SortKey) -> Ordering {
  match key {
    SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
    SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    SortKey::Priority => a.effective_priority().cmp(&b.effective_priority()),
    // Unscheduled leads sort after scheduled ones in ascending order.
    SortKey::FollowUpAt => match (a.follow_up_at, b.follow_up_at) {
      (Some(x), Some(y)) => x.cmp(&y),
      (Some(_), None) => Ordering::Less,
      (None, Some(_)) => Ordering::Greater,
      (None, None) => Ordering::Equal,
    },
  }
}

// ─── Projection ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeadCounts {
  pub filtered: usize,
  pub total:    usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum ProjectedView {
  Board { columns: Vec<BoardColumn> },
  Table { rows: Vec<Lead> },
}

/// What an admin sees: the selected presentation of the filtered list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
  /// Snapshot version the projection was computed from.
  pub version: u64,
  pub counts:  LeadCounts,
  #[serde(flatten)]
  pub view:    ProjectedView,
}

impl Projection {
  pub fn build(
    version: u64,
    filtered: &[Lead],
    total: usize,
    mode: ViewMode,
    sort: Option<TableSort>,
  ) -> Self {
    let view = match mode {
      ViewMode::Board => ProjectedView::Board { columns: board(filtered) },
      ViewMode::Table => ProjectedView::Table { rows: table(filtered, sort) },
    };
    Self {
      version,
      counts: LeadCounts { filtered: filtered.len(), total },
      view,
    }
  }
}
