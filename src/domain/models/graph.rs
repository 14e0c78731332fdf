//! The dependency graph: a synchronous, non-async core that decides what
//! is ready to run and folds completions back in. Never touches a worker or
//! a clock directly — callers pass in `DateTime<Utc>` and read `PendingDispatch`
//! values back out, so this module is exercised entirely with plain unit
//! tests, no tokio runtime required.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::action::{Action, ActionOutcome};
use super::entity::{Entity, EntityKind, GroupState};
use super::status::{Dependency, DependencyStrength, Status};
use crate::domain::ports::WorkerCapability;

/// Name of a service group's entry sentinel in non-reversed mode.
pub const SINK: &str = "sink";
/// Name of a service group's exit sentinel in non-reversed mode.
pub const SOURCE: &str = "source";

/// Errors raised by graph construction/mutation APIs. Worker I/O failures
/// are never represented here — they fold into `WorkerOutcome` counts and
/// flow through the status state machine instead.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("entity {0:?} not found")]
    NotFound(String),
    #[error("entity {0:?} already exists")]
    AlreadyExists(String),
    #[error("{0:?} is a reserved sentinel name")]
    ReservedName(String),
}

/// An action ready to hand to a `CommandRunner`. `path` addresses the owning
/// entity from the outermost graph down through any containing groups.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDispatch {
    pub path: Vec<String>,
    pub action: String,
    pub command: String,
    pub target: crate::domain::models::nodeset::NodeSet,
    pub timeout: Option<f64>,
    pub delay: f64,
    /// Effective `simulate` attribute of the dispatching entity: real
    /// execution still runs, but `EV_STARTED`/`EV_COMPLETE` are suppressed.
    pub simulate: bool,
}

/// An entity's status settled to a new value. Consumed by the application
/// layer to publish `Event::StatusChanged`; the domain layer only records it.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEvent {
    pub path: Vec<String>,
    pub status: Status,
}

/// A child became eligible to `prepare` because a parent edge resolved.
/// Consumed by the application layer to publish `Event::TriggerDep`.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerEvent {
    pub from: Vec<String>,
    pub to: Vec<String>,
}

/// A dependency graph: a flat set of named entities (services or service
/// groups), each carrying its own symmetric parent/child edges.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    entities: HashMap<String, Entity>,
    /// Status transitions observed since the last `drain_events`, local to
    /// this graph level (nested groups keep their own; see `drain_events`).
    status_log: Vec<StatusEvent>,
    /// Dependency-fired notices observed since the last `drain_events`.
    trigger_log: Vec<TriggerEvent>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// The body every `ServiceGroup` starts with: just the two sentinels,
    /// unconnected (an empty group resolves `Done` without ever wiring them).
    pub fn new_group_body() -> Self {
        let mut g = Self::new();
        g.entities.insert(SINK.to_string(), Entity::new_service(SINK));
        g.entities.insert(SOURCE.to_string(), Entity::new_service(SOURCE));
        g
    }

    pub fn entities(&self) -> impl Iterator<Item = (&String, &Entity)> {
        self.entities.iter()
    }

    pub fn entities_mut(&mut self) -> impl Iterator<Item = (&String, &mut Entity)> {
        self.entities.iter_mut()
    }

    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.entities.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    pub fn insert(&mut self, entity: Entity) -> Result<(), GraphError> {
        if self.entities.contains_key(&entity.name) {
            return Err(GraphError::AlreadyExists(entity.name));
        }
        self.entities.insert(entity.name.clone(), entity);
        Ok(())
    }

    /// True for every subservice of a group except the two sentinels.
    pub fn has_subservice(&self, name: &str) -> bool {
        name != SOURCE && name != SINK && self.entities.contains_key(name)
    }

    /// Wire a symmetric dependency edge: `child` gains `parent` as a
    /// prerequisite.
    pub fn add_dep(&mut self, child: &str, parent: &str, strength: DependencyStrength) -> Result<(), GraphError> {
        if !self.entities.contains_key(parent) {
            return Err(GraphError::NotFound(parent.to_string()));
        }
        if !self.entities.contains_key(child) {
            return Err(GraphError::NotFound(child.to_string()));
        }
        self.entities.get_mut(child).unwrap().link_parent(parent, strength);
        self.entities.get_mut(parent).unwrap().link_child(child, strength);
        Ok(())
    }

    /// Remove a dependency edge, if present. A no-op on either endpoint when
    /// the edge does not exist (used liberally by `add_inter_dep`'s rewiring).
    pub fn remove_dep(&mut self, child: &str, parent: &str) {
        if let Some(e) = self.entities.get_mut(child) {
            e.unlink_parent(parent);
        }
        if let Some(e) = self.entities.get_mut(parent) {
            e.unlink_child(child);
        }
    }

    /// Wire a subservice into a group's internal graph.
    ///
    /// With no `base`, `target` becomes a fresh parallel path directly
    /// between `sink` (entry) and `source` (exit). With a `base`, `target`
    /// becomes a new prerequisite of `base`: `target` gets the entry edge
    /// from `sink` if it is new, `base` loses its now-redundant direct entry
    /// edge, and `target` loses its now-redundant direct exit edge (its
    /// output now flows to `source` via `base` instead).
    pub fn add_inter_dep(
        &mut self,
        base: Option<&str>,
        target: &str,
        strength: DependencyStrength,
    ) -> Result<(), GraphError> {
        if target == SOURCE || target == SINK {
            return Err(GraphError::ReservedName(target.to_string()));
        }
        let is_new = !self.entities.contains_key(target);
        if is_new {
            self.entities.insert(target.to_string(), Entity::new_service(target));
        }
        match base {
            None => {
                self.add_dep(target, SINK, DependencyStrength::Require)?;
                self.add_dep(SOURCE, target, strength)?;
            }
            Some(base_name) => {
                if !self.entities.contains_key(base_name) {
                    return Err(GraphError::NotFound(base_name.to_string()));
                }
                if is_new {
                    self.add_dep(target, SINK, DependencyStrength::Require)?;
                }
                self.add_dep(base_name, target, strength)?;
                self.remove_dep(SOURCE, target);
                self.remove_dep(base_name, SINK);
            }
        }
        Ok(())
    }

    /// Disconnect and delete a subservice, restoring the entry/exit
    /// invariant for any neighbor left without another route to `sink`/`source`.
    pub fn remove_inter_dep(&mut self, name: &str) {
        let Some(entity) = self.entities.remove(name) else {
            return;
        };
        let parent_names: Vec<String> = entity.parents.keys().cloned().collect();
        let child_names: Vec<String> = entity.children.keys().cloned().collect();
        for parent_name in &parent_names {
            if let Some(p) = self.entities.get_mut(parent_name) {
                p.unlink_child(name);
            }
        }
        for child_name in &child_names {
            if let Some(c) = self.entities.get_mut(child_name) {
                c.unlink_parent(name);
            }
        }
        for parent_name in &parent_names {
            let needs_source = self
                .entities
                .get(parent_name)
                .is_some_and(|p| p.children.is_empty());
            if needs_source {
                let _ = self.add_dep(SOURCE, parent_name, DependencyStrength::Require);
            }
        }
        for child_name in &child_names {
            let needs_sink = self
                .entities
                .get(child_name)
                .is_some_and(|c| c.parents.is_empty());
            if needs_sink {
                let _ = self.add_dep(child_name, SINK, DependencyStrength::Require);
            }
        }
    }

    /// Flip which sentinel is the entry point and which is the exit point
    /// for this group's internal traversal. External wiring (the group's
    /// own `parents`/`children`, held by the containing graph) never changes.
    pub fn set_algo_reversed(state: &mut GroupState, reversed: bool) {
        state.algo_reversed = reversed;
    }

    fn entry_exit_names(reversed: bool) -> (&'static str, &'static str) {
        if reversed {
            (SOURCE, SINK)
        } else {
            (SINK, SOURCE)
        }
    }

    fn status_of(&self, name: &str) -> Option<Status> {
        self.entities.get(name).map(|e| e.status)
    }

    /// Drive `action_name` forward from every entity whose dependencies are
    /// satisfied, recursing into service groups, and return every action
    /// now ready for dispatch.
    pub fn prepare(&mut self, action_name: &str, now: DateTime<Utc>) -> Vec<PendingDispatch> {
        let names: Vec<String> = self.entities.keys().cloned().collect();
        let mut dispatches = Vec::new();
        for name in names {
            dispatches.extend(self.prepare_entity(&name, action_name, now));
        }
        dispatches
    }

    fn prepare_entity(&mut self, name: &str, action_name: &str, now: DateTime<Utc>) -> Vec<PendingDispatch> {
        let Some(entity) = self.entities.get(name) else {
            return Vec::new();
        };
        if entity.status.is_terminal() {
            return Vec::new();
        }
        if entity.skipped() {
            self.update_status(name, Status::Skipped, now);
            return Vec::new();
        }

        // Recurse into any parent that has not been touched yet, so a
        // sibling visited earlier in (arbitrary) iteration order never races
        // ahead of a dependency it should be scheduled behind.
        let mut dispatches = Vec::new();
        let parent_names: Vec<String> = entity.parents.keys().cloned().collect();
        for parent_name in &parent_names {
            let untouched = self.entities.get(parent_name).is_some_and(|p| p.status == Status::NoStatus);
            if untouched {
                dispatches.extend(self.prepare_entity(parent_name, action_name, now));
            }
        }

        // A dependent with outstanding parents is never ready until the
        // reduction resolves to a terminal (done/error) verdict: NoStatus
        // here means "not yet decided", not "nothing to wait for" (that
        // case is only reachable when `parent_names` is empty).
        let deps_status = self.eval_deps_status(name);
        if !parent_names.is_empty() && !deps_status.is_terminal() {
            return dispatches;
        }
        // Sentinels never carry actions; their status is purely a function of
        // their join/fan-out edges, settled here instead of falling into
        // prepare_service's "no such action" Missing path.
        if name == SOURCE || name == SINK {
            if deps_status.is_terminal() {
                self.update_status(name, deps_status, now);
            }
            return dispatches;
        }
        // DEP_ERROR is scheduled anyway; strength is resolved at completion
        // (the preserved "schedule anyway" open question).
        let is_group = self.entities.get(name).unwrap().is_group();
        dispatches.extend(if is_group {
            self.prepare_group(name, action_name, now)
        } else {
            self.prepare_service(name, action_name, now)
        });
        dispatches
    }

    fn prepare_service(&mut self, name: &str, action_name: &str, now: DateTime<Utc>) -> Vec<PendingDispatch> {
        let entity = self.entities.get_mut(name).unwrap();
        let Some(action) = entity.actions.get_mut(action_name) else {
            drop(entity);
            self.update_status(name, Status::Missing, now);
            return Vec::new();
        };
        if !action.status.is_terminal() && action.status != Status::WaitingStatus {
            action.mark_started(now);
            action.status = Status::WaitingStatus;
            entity.status = Status::WaitingStatus;
            let target = action
                .target
                .clone()
                .or_else(|| entity.attrs.target.clone())
                .unwrap_or_default();
            let command = substitute(&action.command, &entity.attrs.variables);
            let dispatch = PendingDispatch {
                path: vec![name.to_string()],
                action: action_name.to_string(),
                command,
                target,
                timeout: action.timeout.or(entity.attrs.timeout),
                delay: action.delay,
                simulate: entity.attrs.simulate,
            };
            self.status_log.push(StatusEvent {
                path: vec![name.to_string()],
                status: Status::WaitingStatus,
            });
            vec![dispatch]
        } else {
            Vec::new()
        }
    }

    fn prepare_group(&mut self, name: &str, action_name: &str, now: DateTime<Utc>) -> Vec<PendingDispatch> {
        let entity = self.entities.get_mut(name).unwrap();
        let state = entity.group_state_mut().unwrap();
        let (entry, exit) = Self::entry_exit_names(state.algo_reversed);

        // Empty group (no real subservices): settles Done immediately.
        if !state.subservices.has_any_subservice() {
            drop(entity);
            self.update_status(name, Status::Done, now);
            return Vec::new();
        }

        // Kick the entry sentinel exactly once.
        if state.subservices.get(entry).unwrap().status == Status::NoStatus {
            state.subservices.update_status(entry, Status::Done, now);
        }
        let dispatches: Vec<PendingDispatch> = state
            .subservices
            .prepare(action_name, now)
            .into_iter()
            .map(|mut d| {
                d.path.insert(0, name.to_string());
                d
            })
            .collect();

        let exit_status = state.subservices.get(exit).unwrap().status;
        if exit_status.is_terminal() {
            // A group whose subservices all ended Skipped reports Skipped
            // itself, even though eval_deps_status treats Skipped as a
            // done-class status when settling the exit sentinel.
            let group_status = if state.subservices.all_subservices_skipped() {
                Status::Skipped
            } else {
                exit_status
            };
            drop(entity);
            self.update_status(name, group_status, now);
        } else if entity.status != Status::WaitingStatus {
            // Not settled yet: expose the group as waiting so a sibling
            // depending on it blocks instead of reading a stale NoStatus.
            entity.status = Status::WaitingStatus;
            self.status_log.push(StatusEvent {
                path: vec![name.to_string()],
                status: Status::WaitingStatus,
            });
        }
        dispatches
    }

    fn all_subservices_skipped(&self) -> bool {
        let mut saw_any = false;
        for (name, entity) in &self.entities {
            if name == SOURCE || name == SINK {
                continue;
            }
            saw_any = true;
            if entity.status != Status::Skipped {
                return false;
            }
        }
        saw_any
    }

    fn has_any_subservice(&self) -> bool {
        self.entities.keys().any(|n| n != SOURCE && n != SINK)
    }

    fn eval_deps_status(&self, name: &str) -> Status {
        let entity = self.entities.get(name).unwrap();
        entity.eval_deps_status(|other| self.status_of(other))
    }

    /// Fold a finished action attempt into the graph, applying the decision
    /// table and rescheduling retries, and return any newly unblocked
    /// dispatches.
    pub fn complete(
        &mut self,
        path: &[String],
        action_name: &str,
        outcome: &impl WorkerCapability,
        now: DateTime<Utc>,
    ) -> Vec<PendingDispatch> {
        let Some((head, rest)) = path.split_first() else {
            return Vec::new();
        };
        if !rest.is_empty() {
            let Some(entity) = self.entities.get_mut(head) else {
                return Vec::new();
            };
            let Some(state) = entity.group_state_mut() else {
                return Vec::new();
            };
            let inner = state.subservices.complete(rest, action_name, outcome, now);
            let (_, exit) = Self::entry_exit_names(state.algo_reversed);
            let exit_status = state.subservices.get(exit).unwrap().status;
            let mut dispatches: Vec<PendingDispatch> = inner
                .into_iter()
                .map(|mut d| {
                    d.path.insert(0, head.clone());
                    d
                })
                .collect();
            if exit_status.is_terminal() {
                self.update_status(head, exit_status, now);
            }
            dispatches.extend(self.prepare(action_name, now));
            return dispatches;
        }

        let entity = match self.entities.get_mut(head) {
            Some(e) => e,
            None => return Vec::new(),
        };
        let errors_tolerance = entity.attrs.effective_errors();
        let Some(action) = entity.actions.get_mut(action_name) else {
            return Vec::new();
        };
        action.record_attempt(now, outcome);
        let retry = action.retry();
        let verdict = Action::decide_outcome(outcome.error_count(), outcome.timeout_count(), errors_tolerance, retry);
        match verdict {
            ActionOutcome::Retry => {
                action.consume_retry();
                action.status = Status::NoStatus;
                vec![PendingDispatch {
                    path: path.to_vec(),
                    action: action_name.to_string(),
                    command: substitute(&action.command, &entity.attrs.variables),
                    target: action
                        .target
                        .clone()
                        .or_else(|| entity.attrs.target.clone())
                        .unwrap_or_default(),
                    timeout: action.timeout.or(entity.attrs.timeout),
                    delay: action.delay,
                    simulate: entity.attrs.simulate,
                }]
            }
            ActionOutcome::Done => {
                self.update_status(head, Status::Done, now);
                self.prepare(action_name, now)
            }
            ActionOutcome::Warning => {
                if let Some(e) = self.entities.get_mut(head) {
                    e.warning_annotated = true;
                }
                self.update_status(head, Status::Done, now);
                self.prepare(action_name, now)
            }
            ActionOutcome::Error => {
                self.update_status(head, Status::Error, now);
                self.prepare(action_name, now)
            }
            ActionOutcome::Timeout => {
                self.update_status(head, Status::Timeout, now);
                self.prepare(action_name, now)
            }
        }
    }

    /// Set `name`'s status and cascade to every child along its typed edge,
    /// demoting per `DependencyStrength`, then recurse into newly-ready
    /// children via `prepare` at the caller's level.
    fn update_status(&mut self, name: &str, status: Status, _now: DateTime<Utc>) {
        let Some(entity) = self.entities.get_mut(name) else {
            return;
        };
        entity.status = status;
        let terminal = status.is_terminal();
        let children: Vec<(String, Dependency)> = if terminal {
            entity.children.iter().map(|(n, d)| (n.clone(), *d)).collect()
        } else {
            Vec::new()
        };
        self.status_log.push(StatusEvent {
            path: vec![name.to_string()],
            status,
        });
        if !terminal {
            return;
        }
        for (child_name, dep) in children {
            if status.is_error_class() {
                let demoted = dep.strength.demoted_status();
                if dep.strength.annotates_warning() {
                    if let Some(child) = self.entities.get_mut(&child_name) {
                        child.warning_annotated = true;
                    }
                }
                if demoted == Status::DepError {
                    self.cascade_dep_error(&child_name);
                }
            }
            // A child not yet terminal whose dependency reduction has now
            // resolved is newly eligible for `prepare`.
            let still_pending = self.entities.get(&child_name).is_some_and(|c| !c.status.is_terminal());
            if still_pending && self.eval_deps_status(&child_name).is_terminal() {
                self.trigger_log.push(TriggerEvent {
                    from: vec![name.to_string()],
                    to: vec![child_name.clone()],
                });
            }
        }
    }

    fn cascade_dep_error(&mut self, name: &str) {
        if let Some(entity) = self.entities.get_mut(name) {
            if !entity.status.is_terminal() {
                entity.status = Status::DepError;
                self.status_log.push(StatusEvent {
                    path: vec![name.to_string()],
                    status: Status::DepError,
                });
                let children: Vec<String> = entity.children.keys().cloned().collect();
                for child in &children {
                    self.trigger_log.push(TriggerEvent {
                        from: vec![name.to_string()],
                        to: vec![child.clone()],
                    });
                }
                for child in children {
                    self.cascade_dep_error(&child);
                }
            }
        }
    }

    /// Drain every `StatusEvent`/`TriggerEvent` recorded at this graph level
    /// and at every nested group's subgraph, prefixing nested paths with the
    /// owning group's name the same way `prepare`/`complete` build
    /// `PendingDispatch::path`.
    pub fn drain_events(&mut self) -> (Vec<StatusEvent>, Vec<TriggerEvent>) {
        let mut statuses: Vec<StatusEvent> = self.status_log.drain(..).collect();
        let mut triggers: Vec<TriggerEvent> = self.trigger_log.drain(..).collect();
        for (name, entity) in self.entities.iter_mut() {
            if let EntityKind::Group(state) = &mut entity.kind {
                let (inner_statuses, inner_triggers) = state.subservices.drain_events();
                statuses.extend(inner_statuses.into_iter().map(|mut e| {
                    e.path.insert(0, name.clone());
                    e
                }));
                triggers.extend(inner_triggers.into_iter().map(|mut e| {
                    e.from.insert(0, name.clone());
                    e.to.insert(0, name.clone());
                    e
                }));
            }
        }
        (statuses, triggers)
    }
}

/// `$VAR` substitution of `variables` into a command template.
fn substitute(command: &str, variables: &HashMap<String, String>) -> String {
    let mut out = command.to_string();
    for (k, v) in variables {
        out = out.replace(&format!("${k}"), v);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::action::Action as ActionModel;
    use crate::domain::ports::WorkerOutcome;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap().into()
    }

    fn service_with_action(name: &str, target: &str) -> Entity {
        let mut e = Entity::new_service(name);
        e.update_target(target.parse().unwrap());
        e.add_action(ActionModel::new("start", "/bin/true"));
        e
    }

    #[test]
    fn independent_services_both_dispatch_immediately() {
        let mut g = Graph::new();
        g.insert(service_with_action("a", "node1")).unwrap();
        g.insert(service_with_action("b", "node1")).unwrap();
        let dispatches = g.prepare("start", now());
        assert_eq!(dispatches.len(), 2);
    }

    #[test]
    fn require_edge_blocks_until_parent_done() {
        let mut g = Graph::new();
        g.insert(service_with_action("a", "node1")).unwrap();
        g.insert(service_with_action("b", "node1")).unwrap();
        g.add_dep("b", "a", DependencyStrength::Require).unwrap();

        let first = g.prepare("start", now());
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].path, vec!["a".to_string()]);

        let second = g.complete(&["a".to_string()], "start", &WorkerOutcome::success(), now());
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].path, vec!["b".to_string()]);
    }

    #[test]
    fn check_edge_failure_propagates_dep_error() {
        let mut g = Graph::new();
        g.insert(service_with_action("a", "node1")).unwrap();
        g.insert(service_with_action("b", "node1")).unwrap();
        g.add_dep("b", "a", DependencyStrength::Check).unwrap();
        g.prepare("start", now());
        g.complete(
            &["a".to_string()],
            "start",
            &WorkerOutcome { errors: 1, timeouts: 0 },
            now(),
        );
        assert_eq!(g.get("b").unwrap().status, Status::DepError);
    }

    #[test]
    fn weak_edge_failure_only_warns() {
        let mut g = Graph::new();
        g.insert(service_with_action("a", "node1")).unwrap();
        g.insert(service_with_action("b", "node1")).unwrap();
        g.add_dep("b", "a", DependencyStrength::RequireWeak).unwrap();
        g.prepare("start", now());
        let next = g.complete(
            &["a".to_string()],
            "start",
            &WorkerOutcome { errors: 1, timeouts: 0 },
            now(),
        );
        assert_eq!(next.len(), 1, "b should still be scheduled despite the weak failure");
        assert!(g.get("b").unwrap().warning_annotated);
    }

    #[test]
    fn skipped_service_never_dispatches() {
        let mut g = Graph::new();
        g.insert(service_with_action("a", "")).unwrap();
        let dispatches = g.prepare("start", now());
        assert!(dispatches.is_empty());
        assert_eq!(g.get("a").unwrap().status, Status::Skipped);
    }

    #[test]
    fn empty_group_settles_done_immediately() {
        let mut g = Graph::new();
        g.insert(Entity::new_group("grp")).unwrap();
        let dispatches = g.prepare("start", now());
        assert!(dispatches.is_empty());
        assert_eq!(g.get("grp").unwrap().status, Status::Done);
    }

    #[test]
    fn group_with_one_subservice_dispatches_and_resolves() {
        let mut g = Graph::new();
        let mut grp = Entity::new_group("grp");
        {
            let state = grp.group_state_mut().unwrap();
            state
                .subservices
                .insert(service_with_action("inner", "node1"))
                .unwrap();
            state.subservices.add_inter_dep(None, "inner", DependencyStrength::Require).unwrap();
        }
        g.insert(grp).unwrap();

        let dispatches = g.prepare("start", now());
        assert_eq!(dispatches.len(), 1);
        assert_eq!(dispatches[0].path, vec!["grp".to_string(), "inner".to_string()]);
        assert_eq!(g.get("grp").unwrap().status, Status::WaitingStatus);

        let next = g.complete(&dispatches[0].path, "start", &WorkerOutcome::success(), now());
        assert!(next.is_empty());
        assert_eq!(g.get("grp").unwrap().status, Status::Done);
    }

    #[test]
    fn add_inter_dep_chain_wires_sink_and_source() {
        let mut g = Graph::new_group_body();
        g.insert(Entity::new_service("alpha")).unwrap();
        g.add_inter_dep(None, "alpha", DependencyStrength::Require).unwrap();
        g.insert(Entity::new_service("beta")).unwrap();
        g.add_inter_dep(Some("alpha"), "beta", DependencyStrength::Require).unwrap();

        assert!(g.get("beta").unwrap().has_parent_dep(SINK));
        assert!(!g.get("beta").unwrap().has_child_dep(SOURCE));
        assert!(!g.get("alpha").unwrap().has_parent_dep(SINK));
        assert!(g.get("alpha").unwrap().has_child_dep(SOURCE));
        assert!(g.get("alpha").unwrap().has_parent_dep("beta"));
    }

    #[test]
    fn remove_inter_dep_restores_sink_edge() {
        let mut g = Graph::new_group_body();
        g.insert(Entity::new_service("alpha")).unwrap();
        g.add_inter_dep(None, "alpha", DependencyStrength::Require).unwrap();
        g.insert(Entity::new_service("beta")).unwrap();
        g.add_inter_dep(Some("alpha"), "beta", DependencyStrength::Require).unwrap();

        g.remove_inter_dep("beta");
        assert!(g.get("alpha").unwrap().has_parent_dep(SINK));
        assert!(!g.get("alpha").unwrap().has_parent_dep("beta"));
    }
}
