//! Client-side filter pipeline over an already-subscribed lead list.
//!
//! Filtering never queries the store, so it reflects live updates as soon as
//! a new snapshot arrives.

use serde::Deserialize;

use crate::lead::{Lead, LeadStatus, Priority};

/// Filter criteria; every stage must pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LeadFilter {
  /// Case-insensitive substring over name, email, message, source and
  /// assignee. Blank matches everything.
  pub search:    String,
  /// `None` means all statuses.
  pub status:    Option<LeadStatus>,
  /// `None` means all priorities.
  pub priority:  Option<Priority>,
  /// Only leads assigned to the current admin.
  pub only_mine: bool,
}

impl LeadFilter {
  /// Evaluate the pipeline for one lead. `me` is the current admin's email.
  pub fn matches(&self, lead: &Lead, me: Option<&str>) -> bool {
    self.text_ok(lead)
      && self.status_ok(lead)
      && self.priority_ok(lead)
      && self.mine_ok(lead, me)
  }

  /// Apply the pipeline, preserving input order.
  pub fn apply(&self, leads: &[Lead], me: Option<&str>) -> Vec<Lead> {
    leads
      .iter()
      .filter(|l| self.matches(l, me))
      .cloned()
      .collect()
  }

  fn text_ok(&self, lead: &Lead) -> bool {
    let q = self.search.trim().to_lowercase();
    if q.is_empty() {
      return true;
    }
    [
      Some(lead.name.as_str()),
      Some(lead.email.as_str()),
      Some(lead.message.as_str()),
      Some(lead.source.as_str()),
      lead.assigned_to.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&q))
  }

  // A missing status falls in the `new` bucket.
  fn status_ok(&self, lead: &Lead) -> bool {
    match self.status {
      None => true,
      Some(wanted) => match lead.status {
        Some(actual) => actual == wanted,
        None => wanted == LeadStatus::New,
      },
    }
  }

  // A missing priority falls in the `normal` bucket.
  fn priority_ok(&self, lead: &Lead) -> bool {
    match self.priority {
      None => true,
      Some(wanted) => match lead.priority {
        Some(actual) => actual == wanted,
        None => wanted == Priority::Normal,
      },
    }
  }

  fn mine_ok(&self, lead: &Lead, me: Option<&str>) -> bool {
    if !self.only_mine {
      return true;
    }
    me.is_some_and(|email| lead.is_assigned_to(email))
  }
}
