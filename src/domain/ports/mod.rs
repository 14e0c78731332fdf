//! Ports: interfaces the domain depends on but does not implement.

pub mod worker;

pub use worker::{CommandRunner, WorkerCapability, WorkerOutcome};
