//! `CommandRunner` used when an entity's `simulate` flag is set: never runs
//! anything, always reports success, instantly.

use async_trait::async_trait;

use crate::domain::models::nodeset::NodeSet;
use crate::domain::ports::{CommandRunner, WorkerOutcome};

#[derive(Debug, Clone, Copy, Default)]
pub struct SimulateWorker;

#[async_trait]
impl CommandRunner for SimulateWorker {
    async fn execute(&self, _command: &str, _target: &NodeSet, _timeout: Option<f64>) -> WorkerOutcome {
        WorkerOutcome::success()
    }
}
