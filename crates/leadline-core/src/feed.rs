//! Push-based live view over the lead collection.
//!
//! A store owns one [`LeadFeed`] and publishes a fresh, fully ordered
//! [`LeadSnapshot`] after every write. Subscribers only ever observe the
//! latest snapshot: several writes landing before a subscriber polls coalesce
//! into one notification.

use std::sync::Arc;

use tokio::sync::watch;

use crate::lead::Lead;

/// A consistent copy of every lead, ordered by `updatedAt` descending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadSnapshot {
  /// Incremented on every publish; `0` means nothing was published yet.
  pub version: u64,
  pub leads:   Vec<Lead>,
}

/// The publishing half, owned by a store backend.
#[derive(Debug)]
pub struct LeadFeed {
  tx: watch::Sender<Arc<LeadSnapshot>>,
}

impl Default for LeadFeed {
  fn default() -> Self { Self::new() }
}

impl LeadFeed {
  pub fn new() -> Self {
    let (tx, _rx) = watch::channel(Arc::new(LeadSnapshot::default()));
    Self { tx }
  }

  /// Register a new subscriber. The subscriber sees the current snapshot
  /// immediately and is notified of every later publish.
  pub fn subscribe(&self) -> LeadSubscription {
    LeadSubscription { rx: self.tx.subscribe() }
  }

  pub fn subscriber_count(&self) -> usize { self.tx.receiver_count() }

  /// Whether a publish would reach anyone. Stores use this to skip the
  /// re-listing query when nobody is watching.
  pub fn has_subscribers(&self) -> bool { self.subscriber_count() > 0 }

  /// Replace the current snapshot and wake every subscriber.
  pub fn publish(&self, leads: Vec<Lead>) -> u64 {
    let mut version = 0;
    self.tx.send_modify(|snapshot| {
      version = snapshot.version + 1;
      *snapshot = Arc::new(LeadSnapshot { version, leads });
    });
    version
  }

  pub fn current(&self) -> Arc<LeadSnapshot> { self.tx.borrow().clone() }
}

/// The receiving half held by one admin session.
///
/// Dropping the subscription releases it; [`LeadSubscription::unsubscribe`]
/// does the same explicitly.
#[derive(Debug)]
pub struct LeadSubscription {
  rx: watch::Receiver<Arc<LeadSnapshot>>,
}

impl LeadSubscription {
  /// The latest snapshot, without waiting.
  pub fn current(&self) -> Arc<LeadSnapshot> { self.rx.borrow().clone() }

  /// Wait for a snapshot newer than the last one observed through this
  /// method. Returns `None` once the feed has been dropped.
  pub async fn changed(&mut self) -> Option<Arc<LeadSnapshot>> {
    self.rx.changed().await.ok()?;
    Some(self.rx.borrow_and_update().clone())
  }

  /// Mark the current snapshot as seen so [`Self::changed`] only fires for
  /// later publishes.
  pub fn mark_seen(&mut self) -> Arc<LeadSnapshot> {
    self.rx.borrow_and_update().clone()
  }

  /// Give up the underlying channel receiver, e.g. to adapt it into a stream.
  pub fn into_receiver(self) -> watch::Receiver<Arc<LeadSnapshot>> { self.rx }

  /// Release the subscription.
  pub fn unsubscribe(self) { drop(self) }
}
