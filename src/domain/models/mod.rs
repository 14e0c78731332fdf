//! Domain models: the pure data types and algorithms the scheduling core is
//! built from. Nothing in this module touches tokio, the filesystem, or a
//! clock directly beyond accepting `DateTime<Utc>` as a parameter.

pub mod action;
pub mod attributes;
pub mod entity;
pub mod fromdict;
pub mod graph;
pub mod nodeset;
pub mod status;

pub use action::{Action, ActionConfigError, ActionOutcome};
pub use attributes::Attributes;
pub use entity::{Entity, EntityKind, GroupState};
pub use fromdict::{graph_from_value, FromDictError};
pub use graph::{Graph, GraphError, PendingDispatch};
pub use nodeset::{NodeSet, NodeSetError};
pub use status::{Dependency, DependencyStrength, Status};
