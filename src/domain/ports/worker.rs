//! The `CommandRunner` port: the one external collaborator the scheduling
//! core depends on. A real implementation fans a command out to many hosts
//! in parallel and reports per-node return codes and timeouts; this crate
//! ships a local single-process implementation and a simulate-mode
//! implementation (see `infrastructure::worker`).

use async_trait::async_trait;

use crate::domain::models::nodeset::NodeSet;

/// Capability exposed by a finished worker run: fold whatever per-node
/// bookkeeping the concrete worker keeps into the two counts the scheduling
/// core actually needs. Modeled as a capability trait (rather than the core
/// matching on worker type) per the "runtime polymorphism" design note.
pub trait WorkerCapability {
    /// Number of target nodes that returned a non-zero, non-timeout code.
    fn error_count(&self) -> u32;
    /// Number of target nodes that timed out.
    fn timeout_count(&self) -> u32;
}

/// The outcome of one `CommandRunner::execute` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerOutcome {
    pub errors: u32,
    pub timeouts: u32,
}

impl WorkerOutcome {
    /// A successful outcome across however many nodes were targeted.
    pub fn success() -> Self {
        Self::default()
    }
}

impl WorkerCapability for WorkerOutcome {
    fn error_count(&self) -> u32 {
        self.errors
    }

    fn timeout_count(&self) -> u32 {
        self.timeouts
    }
}

/// The external worker abstraction. Given a command template, a target node
/// set, and an optional timeout, executes the command (however the
/// implementation sees fit — locally, over SSH, via a cluster shell) and
/// reports a [`WorkerOutcome`].
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` against `target`, honoring `timeout` (seconds) if set.
    async fn execute(
        &self,
        command: &str,
        target: &NodeSet,
        timeout: Option<f64>,
    ) -> WorkerOutcome;
}
