//! The `LeadStore` trait.
//!
//! Implemented by storage backends (e.g. `leadline-store-sqlite`). The HTTP
//! layer and the admin workbench depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  feed::LeadSubscription,
  lead::{Lead, LeadPatch, NewLead, Note},
};

/// Abstraction over the lead collection.
///
/// Every mutation is an independent partial write; no method spans a
/// transaction across calls. Timestamps are always taken from the store's
/// own clock.
///
/// All methods return `Send` futures.
pub trait LeadStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new lead with the default workflow state
  /// (`new`, `normal`, unassigned, no follow-up, no notes).
  fn create_lead(
    &self,
    input: NewLead,
  ) -> impl Future<Output = Result<Lead, Self::Error>> + Send + '_;

  /// Retrieve a lead by id. Returns `None` if not found.
  fn get_lead(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Lead>, Self::Error>> + Send + '_;

  /// Every lead, most recently updated first.
  fn list_leads(
    &self,
  ) -> impl Future<Output = Result<Vec<Lead>, Self::Error>> + Send + '_;

  /// Merge `patch` into the lead and stamp `updatedAt`.
  ///
  /// Fails if the lead does not exist.
  fn update_lead(
    &self,
    id: Uuid,
    patch: LeadPatch,
  ) -> impl Future<Output = Result<Lead, Self::Error>> + Send + '_;

  /// Append `note` to the lead's history and set `lastNote` to its text.
  ///
  /// Reads the current notes, appends in memory and writes the whole list
  /// back. Two concurrent appends to the same lead can lose one of the notes
  /// (last writer wins).
  fn append_note(
    &self,
    id: Uuid,
    note: Note,
  ) -> impl Future<Output = Result<Lead, Self::Error>> + Send + '_;

  /// Subscribe to live snapshots of [`Self::list_leads`].
  ///
  /// The returned subscription already holds a snapshot reflecting every
  /// write that completed before it was registered. Subscribing is not a
  /// write: other subscribers are only notified if their snapshot was stale.
  fn subscribe(
    &self,
  ) -> impl Future<Output = Result<LeadSubscription, Self::Error>> + Send + '_;
}
