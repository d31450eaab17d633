//! The admin workbench: one gated session over the live lead collection.
//!
//! The subscribed snapshot is the single source of truth. The filtered list,
//! board, table and detail panel are recomputed from it on demand, so they
//! follow every push without re-querying the store.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::{
  admin::Identity,
  feed::{LeadSnapshot, LeadSubscription},
  filter::LeadFilter,
  gate::{GateDenied, GateState},
  lead::{Lead, LeadPatch, LeadStatus, Note, Priority, parse_follow_up},
  store::LeadStore,
  view::{Projection, TableSort, ViewMode},
};

#[derive(Debug, Error)]
pub enum WorkbenchError<E: std::error::Error + 'static> {
  #[error("access denied: {0}")]
  Denied(#[from] GateDenied),

  #[error("store error: {0}")]
  Store(#[source] E),
}

/// An admin's view state plus the subscription feeding it.
#[derive(Debug)]
pub struct Workbench<S: LeadStore> {
  store:        Arc<S>,
  admin:        Identity,
  subscription: LeadSubscription,
  pub filter:   LeadFilter,
  pub mode:     ViewMode,
  pub sort:     Option<TableSort>,
  selected:     Option<Uuid>,
}

impl<S: LeadStore> Workbench<S> {
  /// Open a session. Access is checked before the store is subscribed to,
  /// so a denied caller never receives lead data.
  pub async fn open(
    gate: &GateState,
    store: Arc<S>,
  ) -> Result<Self, WorkbenchError<S::Error>> {
    let admin = gate.admin()?.clone();
    let mut subscription = store.subscribe().await.map_err(WorkbenchError::Store)?;
    subscription.mark_seen();

    Ok(Self {
      store,
      admin,
      subscription,
      filter: LeadFilter::default(),
      mode: ViewMode::default(),
      sort: None,
      selected: None,
    })
  }

  pub fn admin(&self) -> &Identity { &self.admin }

  fn me(&self) -> Option<&str> { self.admin.email.as_deref() }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub fn snapshot(&self) -> Arc<LeadSnapshot> { self.subscription.current() }

  /// Wait for the next pushed snapshot. `None` once the store is gone.
  pub async fn refresh(&mut self) -> Option<Arc<LeadSnapshot>> {
    self.subscription.changed().await
  }

  pub fn filtered(&self) -> Vec<Lead> {
    self.filter.apply(&self.snapshot().leads, self.me())
  }

  pub fn projection(&self) -> Projection {
    let snapshot = self.snapshot();
    let filtered = self.filter.apply(&snapshot.leads, self.me());
    Projection::build(
      snapshot.version,
      &filtered,
      snapshot.leads.len(),
      self.mode,
      self.sort,
    )
  }

  pub fn select(&mut self, id: Uuid) { self.selected = Some(id); }

  pub fn clear_selection(&mut self) { self.selected = None; }

  /// The selected lead as of the latest snapshot.
  pub fn detail(&self) -> Option<Lead> {
    let id = self.selected?;
    self.snapshot().leads.iter().find(|l| l.id == id).cloned()
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  pub async fn set_status(&self, id: Uuid, status: LeadStatus) -> Result<Lead, S::Error> {
    self.store.update_lead(id, LeadPatch::status(status)).await
  }

  pub async fn set_priority(&self, id: Uuid, priority: Priority) -> Result<Lead, S::Error> {
    self.store.update_lead(id, LeadPatch::priority(priority)).await
  }

  /// Change status and priority in a single write. Absent values are kept.
  pub async fn set_workflow(
    &self,
    id: Uuid,
    status: Option<LeadStatus>,
    priority: Option<Priority>,
  ) -> Result<Lead, S::Error> {
    let patch = LeadPatch { status, priority, ..LeadPatch::default() };
    self.store.update_lead(id, patch).await
  }

  /// Assign the lead to the current admin. Repeating it is harmless. Admins
  /// without an email cannot be assigned; nothing is written.
  pub async fn assign_to_self(&self, id: Uuid) -> Result<Option<Lead>, S::Error> {
    let Some(email) = self.me() else {
      return Ok(None);
    };
    let patch = LeadPatch::assign(email);
    self.store.update_lead(id, patch).await.map(Some)
  }

  pub async fn unassign(&self, id: Uuid) -> Result<Lead, S::Error> {
    self.store.update_lead(id, LeadPatch::unassign()).await
  }

  /// Append a note authored by the current admin. Blank text writes nothing.
  pub async fn add_note(&self, id: Uuid, text: &str) -> Result<Option<Lead>, S::Error> {
    if text.trim().is_empty() {
      return Ok(None);
    }
    let note = Note::new(text, self.admin.author());
    self.store.append_note(id, note).await.map(Some)
  }

  /// Schedule a follow-up from a typed date-time. Blank or unparsable input
  /// writes nothing.
  pub async fn schedule_follow_up(
    &self,
    id: Uuid,
    input: &str,
  ) -> Result<Option<Lead>, S::Error> {
    let Some(at) = parse_follow_up(input) else {
      return Ok(None);
    };
    self.store.update_lead(id, LeadPatch::follow_up(at)).await.map(Some)
  }

  /// Hand the live subscription to a long-running consumer.
  pub fn into_subscription(self) -> LeadSubscription { self.subscription }

  /// End the session and release the subscription.
  pub fn close(self) { self.subscription.unsubscribe(); }
}
