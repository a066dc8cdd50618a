//! Relay
//!
//! Carries submitted restaurant applications from the public registration
//! form to the administrator's pending queue. The queue merge is explicit
//! and idempotent: redelivering an already-merged batch changes nothing, so
//! the relay and queue never have to agree on exactly-once delivery.

use rustc_hash::FxHashSet;
use tracing::{debug, info};

use crate::registration::{ApplicationId, RestaurantApplication};

/// Outbox between the registration form and the admin queue.
#[derive(Debug, Default)]
pub struct RegistrationRelay {
    outbox: Vec<RestaurantApplication>,
}

impl RegistrationRelay {
    /// Creates an empty relay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a submitted application for delivery.
    pub fn submit(&mut self, application: RestaurantApplication) {
        debug!(id = %application.id, name = %application.name, "application queued for delivery");
        self.outbox.push(application);
    }

    /// Applications awaiting delivery, in arrival order.
    #[must_use]
    pub fn pending(&self) -> &[RestaurantApplication] {
        &self.outbox
    }

    /// Delivers the outbox into the queue and acknowledges consumption by
    /// draining it, so the same batch is never redelivered. Returns how many
    /// applications were genuinely new to the queue.
    pub fn deliver(&mut self, queue: &mut PendingQueue) -> usize {
        if self.outbox.is_empty() {
            return 0;
        }

        let batch = std::mem::take(&mut self.outbox);

        queue.merge_incoming(batch)
    }
}

/// The administrator's queue of applications awaiting approval.
#[derive(Debug, Default)]
pub struct PendingQueue {
    applications: Vec<RestaurantApplication>,
}

impl PendingQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a queue preloaded with applications (the dashboard ships with
    /// a few).
    #[must_use]
    pub fn with_applications(applications: Vec<RestaurantApplication>) -> Self {
        Self { applications }
    }

    /// Merges a batch: applications already known by id are dropped, and the
    /// genuinely new ones are prepended in their batch order. Idempotent;
    /// merging the same batch twice is a no-op the second time. Returns the
    /// number merged.
    pub fn merge_incoming(&mut self, batch: Vec<RestaurantApplication>) -> usize {
        let known: FxHashSet<ApplicationId> =
            self.applications.iter().map(|app| app.id).collect();

        let additions: Vec<RestaurantApplication> = batch
            .into_iter()
            .filter(|app| !known.contains(&app.id))
            .collect();

        if additions.is_empty() {
            return 0;
        }

        let merged = additions.len();
        info!(merged, "pending applications merged");
        self.applications.splice(0..0, additions);

        merged
    }

    /// Approves an application, removing it from the queue. Unknown ids are
    /// a silent no-op.
    pub fn approve(&mut self, id: ApplicationId) -> Option<RestaurantApplication> {
        self.remove(id, "application approved")
    }

    /// Rejects an application, removing it from the queue. Unknown ids are a
    /// silent no-op.
    pub fn reject(&mut self, id: ApplicationId) -> Option<RestaurantApplication> {
        self.remove(id, "application rejected")
    }

    fn remove(&mut self, id: ApplicationId, action: &'static str) -> Option<RestaurantApplication> {
        let position = self.applications.iter().position(|app| app.id == id)?;
        let application = self.applications.remove(position);
        info!(%id, name = %application.name, "{action}");

        Some(application)
    }

    /// Looks up an application.
    #[must_use]
    pub fn get(&self, id: ApplicationId) -> Option<&RestaurantApplication> {
        self.applications.iter().find(|app| app.id == id)
    }

    /// Iterates over the queue, newest arrivals first.
    pub fn iter(&self) -> impl Iterator<Item = &RestaurantApplication> {
        self.applications.iter()
    }

    /// Number of pending applications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.applications.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }
}
