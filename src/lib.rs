//! MilkCheck: a dependency-driven command orchestration engine. Actions are
//! attached to Services; Services (and ServiceGroups, which splice a nested
//! dependency graph into the outer one) are wired together with typed
//! dependency edges; a scheduler dispatches ready actions to a pluggable
//! `CommandRunner`, honoring fan-out, delay, retry, and timeout, and
//! propagates each outcome through the graph.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{Engine, Event, RunContext};
pub use domain::models::{graph_from_value, Action, Entity, Graph, NodeSet, Status};
pub use domain::ports::{CommandRunner, WorkerOutcome};
