//! Action domain model.
//!
//! An action is a command template bound to exactly one parent service; it
//! owns its own timing, retry counter, and delay timer, and is the unit the
//! action manager actually dispatches to the worker.

use chrono::{DateTime, Utc};

use super::nodeset::NodeSet;
use super::status::Status;
use crate::domain::ports::WorkerCapability;

/// Outcome of the decision table in `Action::decide_outcome`, kept separate
/// from the mutating `Action` so it is trivially unit-testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Retry with the countdown decremented; caller should reschedule.
    Retry,
    Done,
    Warning,
    Error,
    Timeout,
}

/// A single executable unit bound to a service.
#[derive(Debug, Clone)]
pub struct Action {
    pub name: String,
    /// Overrides the owning service's target, if set.
    pub target: Option<NodeSet>,
    pub command: String,
    pub timeout: Option<f64>,
    /// Delay in seconds before the first dispatch.
    pub delay: f64,
    retry: u32,
    retry_backup: Option<u32>,
    pub status: Status,
    pub start_time: Option<DateTime<Utc>>,
    pub stop_time: Option<DateTime<Utc>>,
    pub last_outcome: Option<(u32, u32)>,
}

impl Action {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: None,
            command: command.into(),
            timeout: None,
            delay: 0.0,
            retry: 0,
            retry_backup: None,
            status: Status::NoStatus,
            start_time: None,
            stop_time: None,
            last_outcome: None,
        }
    }

    pub fn with_target(mut self, target: NodeSet) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_timeout(mut self, timeout: f64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    /// Current retry countdown.
    pub fn retry(&self) -> u32 {
        self.retry
    }

    /// Set the retry countdown. Per the invariant `retry > 0` requires
    /// `delay > 0`; the first value set becomes the backup restored by
    /// `reset()`.
    pub fn set_retry(&mut self, retry: u32) -> Result<(), ActionConfigError> {
        if retry > 0 && self.delay <= 0.0 {
            return Err(ActionConfigError::RetryWithoutDelay {
                action: self.name.clone(),
            });
        }
        self.retry = retry;
        if self.retry_backup.is_none() {
            self.retry_backup = Some(retry);
        }
        Ok(())
    }

    /// Reset status, timing, and retry countdown for a fresh run.
    pub fn reset(&mut self) {
        self.status = Status::NoStatus;
        self.start_time = None;
        self.stop_time = None;
        self.last_outcome = None;
        self.retry = self.retry_backup.unwrap_or(0);
    }

    /// Whether the action has never been scheduled.
    pub fn is_unstarted(&self) -> bool {
        self.start_time.is_none()
    }

    /// Record the first scheduling attempt's start time (idempotent).
    pub fn mark_started(&mut self, now: DateTime<Utc>) {
        if self.start_time.is_none() {
            self.start_time = Some(now);
        }
    }

    /// Record the final attempt's completion and fold the worker outcome
    /// into the decision table. Does not decide what to do with the
    /// outcome — see `decide_outcome`.
    pub fn record_attempt(&mut self, now: DateTime<Utc>, outcome: &impl WorkerCapability) {
        self.stop_time = Some(now);
        self.last_outcome = Some((outcome.error_count(), outcome.timeout_count()));
    }

    /// Pure decision table translating a completed attempt's error/timeout
    /// counts (and the service's error tolerance) into an [`ActionOutcome`].
    ///
    /// | Condition | Result |
    /// |---|---|
    /// | `(errors>0 or timeouts>0) and retry>0` | Retry |
    /// | `timeouts > errors_tolerance and errors == 0` | Timeout |
    /// | `errors + timeouts > errors_tolerance` | Error |
    /// | otherwise | Done |
    pub fn decide_outcome(errors: u32, timeouts: u32, errors_tolerance: u32, retry: u32) -> ActionOutcome {
        if (errors > 0 || timeouts > 0) && retry > 0 {
            ActionOutcome::Retry
        } else if timeouts > errors_tolerance && errors == 0 {
            ActionOutcome::Timeout
        } else if errors + timeouts > errors_tolerance {
            ActionOutcome::Error
        } else {
            ActionOutcome::Done
        }
    }

    /// Decrement the retry countdown after a failed attempt triggers a retry.
    pub fn consume_retry(&mut self) {
        debug_assert!(self.retry > 0, "consume_retry called with no retries left");
        self.retry = self.retry.saturating_sub(1);
    }
}

/// Errors raised by caller-facing `Action` configuration APIs.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ActionConfigError {
    #[error("action {action:?} cannot set retry without a positive delay")]
    RetryWithoutDelay { action: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_action_has_no_status() {
        let a = Action::new("start", "/bin/true");
        assert_eq!(a.status, Status::NoStatus);
        assert_eq!(a.retry(), 0);
    }

    #[test]
    fn retry_without_delay_rejected() {
        let mut a = Action::new("start", "/bin/true");
        assert!(a.set_retry(2).is_err());
    }

    #[test]
    fn retry_with_delay_accepted_and_backed_up() {
        let mut a = Action::new("start", "/bin/false").with_delay(1.0);
        a.set_retry(3).unwrap();
        assert_eq!(a.retry(), 3);
        a.consume_retry();
        a.consume_retry();
        assert_eq!(a.retry(), 1);
        a.reset();
        assert_eq!(a.retry(), 3, "reset must restore the backup, not zero");
    }

    #[test]
    fn decision_table_retry_before_anything_else() {
        assert_eq!(
            Action::decide_outcome(1, 0, 0, 2),
            ActionOutcome::Retry,
            "errors with retries left always retries first"
        );
        assert_eq!(Action::decide_outcome(0, 1, 0, 2), ActionOutcome::Retry);
    }

    #[test]
    fn decision_table_timeout_vs_error() {
        // Pure timeouts beyond tolerance, no errors -> Timeout.
        assert_eq!(Action::decide_outcome(0, 1, 0, 0), ActionOutcome::Timeout);
        // Any errors present -> Error, even if timeouts alone wouldn't exceed tolerance.
        assert_eq!(Action::decide_outcome(1, 0, 0, 0), ActionOutcome::Error);
        assert_eq!(Action::decide_outcome(1, 1, 0, 0), ActionOutcome::Error);
    }

    #[test]
    fn decision_table_within_tolerance_is_done() {
        assert_eq!(Action::decide_outcome(1, 0, 2, 0), ActionOutcome::Done);
        assert_eq!(Action::decide_outcome(0, 0, 0, 0), ActionOutcome::Done);
    }

    #[test]
    fn reset_clears_timing_and_outcome() {
        let mut a = Action::new("start", "/bin/true");
        let now = Utc::now();
        a.mark_started(now);
        a.record_attempt(now, &crate::domain::ports::WorkerOutcome::success());
        a.status = Status::Done;
        a.reset();
        assert_eq!(a.status, Status::NoStatus);
        assert!(a.start_time.is_none());
        assert!(a.stop_time.is_none());
        assert!(a.last_outcome.is_none());
    }
}
