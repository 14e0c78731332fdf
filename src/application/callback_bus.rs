//! The event bus a run publishes to. Subscribers (a CLI progress bar, a log
//! sink, a test harness) get a `broadcast::Receiver<Event>`; nothing in the
//! domain layer depends on this module, it only ever receives a `Sender`
//! through `RunContext`.

use tokio::sync::broadcast;

use crate::domain::models::Status;

/// Default channel capacity; generous enough that a slow subscriber lagging
/// a handful of events behind does not itself stall dispatch.
pub const CHANNEL_CAPACITY: usize = 1024;

/// One observable event in a run's lifecycle. `path` addresses the entity
/// the event concerns, from the outermost graph down through any containing
/// groups (see `domain::models::graph::PendingDispatch`).
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// An action was just handed to the worker.
    Started { path: Vec<String>, action: String },
    /// An action's worker attempt finished (before the decision table runs).
    Complete { path: Vec<String>, action: String },
    /// An entity's status changed as a result of propagation.
    StatusChanged { path: Vec<String>, status: Status },
    /// A child's dependency fired, making it eligible to prepare.
    TriggerDep { from: Vec<String>, to: Vec<String> },
}

/// Construct a fresh broadcast channel for one run.
pub fn channel() -> (broadcast::Sender<Event>, broadcast::Receiver<Event>) {
    broadcast::channel(CHANNEL_CAPACITY)
}
