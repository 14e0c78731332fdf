//! `CommandRunner` backed by local `tokio::process::Command` invocations,
//! one per target host. There is no real remote fan-out here — MilkCheck's
//! actual cluster shell is out of scope (see `SPEC_FULL.md` Non-goals) —
//! but the per-host retcode/timeout accounting mirrors it closely enough
//! that the scheduling core cannot tell the difference.

use async_trait::async_trait;
use tokio::process::Command;

use crate::domain::models::nodeset::NodeSet;
use crate::domain::ports::{CommandRunner, WorkerOutcome};

/// Environment variable carrying the current target host into the command,
/// mirroring the original `$NODE`-style single-host substitution.
pub const NODE_VARIABLE: &str = "MC_NODE";

#[derive(Debug, Clone, Default)]
pub struct LocalProcessWorker;

impl LocalProcessWorker {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for LocalProcessWorker {
    async fn execute(&self, command: &str, target: &NodeSet, timeout: Option<f64>) -> WorkerOutcome {
        let mut errors = 0u32;
        let mut timeouts = 0u32;

        for host in target.iter() {
            let mut child = Command::new("/bin/sh");
            child.arg("-c").arg(command).env(NODE_VARIABLE, host);

            let run = child.status();
            let status = match timeout {
                Some(secs) if secs > 0.0 => {
                    match tokio::time::timeout(std::time::Duration::from_secs_f64(secs), run).await {
                        Ok(result) => result,
                        Err(_) => {
                            timeouts += 1;
                            continue;
                        }
                    }
                }
                _ => run.await,
            };

            match status {
                Ok(status) if status.success() => {}
                Ok(_) => errors += 1,
                Err(_) => errors += 1,
            }
        }

        WorkerOutcome { errors, timeouts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn successful_command_reports_no_errors() {
        let worker = LocalProcessWorker::new();
        let outcome = worker.execute("true", &"node1".parse().unwrap(), None).await;
        assert_eq!(outcome.errors, 0);
        assert_eq!(outcome.timeouts, 0);
    }

    #[tokio::test]
    async fn failing_command_counts_as_error() {
        let worker = LocalProcessWorker::new();
        let outcome = worker.execute("false", &"node1".parse().unwrap(), None).await;
        assert_eq!(outcome.errors, 1);
    }

    #[tokio::test]
    async fn timeout_is_counted_separately_from_errors() {
        let worker = LocalProcessWorker::new();
        let outcome = worker.execute("sleep 5", &"node1".parse().unwrap(), Some(0.05)).await;
        assert_eq!(outcome.timeouts, 1);
        assert_eq!(outcome.errors, 0);
    }

    #[tokio::test]
    async fn each_target_host_runs_independently() {
        let worker = LocalProcessWorker::new();
        let outcome = worker.execute("false", &"a,b,c".parse().unwrap(), None).await;
        assert_eq!(outcome.errors, 3);
    }
}
