//! Entity base: the fields and pure classification logic shared by every
//! node in a graph, whether a plain service or a service group.

use std::collections::HashMap;

use super::action::Action;
use super::attributes::Attributes;
use super::graph::Graph;
use super::status::{Dependency, DependencyStrength, Status};

/// Distinguishes a plain service from a service group. A group additionally
/// owns a nested graph of subservices, boxed so `Entity` stays a fixed size
/// despite the graph-of-graphs recursion.
#[derive(Debug, Clone, Default)]
pub enum EntityKind {
    #[default]
    Service,
    Group(GroupState),
}

/// State specific to a `ServiceGroup`: its inner subgraph (always containing
/// the `source`/`sink` sentinels; see `Graph::new_group_body`) and the
/// direction its internal traversal currently runs.
#[derive(Debug, Clone)]
pub struct GroupState {
    pub subservices: Box<Graph>,
    pub algo_reversed: bool,
}

/// A node in a graph: either a service (actions only) or a service group
/// (actions plus a nested subgraph, owned by the containing `Graph`).
#[derive(Debug, Clone)]
pub struct Entity {
    pub name: String,
    pub desc: Option<String>,
    pub attrs: Attributes,
    pub actions: HashMap<String, Action>,
    pub status: Status,
    /// Set alongside an error-class status by a `REQUIRE_WEAK` parent: the
    /// child's own status stays `Done`, but the failure is not silent.
    pub warning_annotated: bool,
    pub kind: EntityKind,
    /// Prerequisites: entities `self` depends on, keyed by remote name.
    pub parents: HashMap<String, Dependency>,
    /// Dependents: entities that depend on `self`, keyed by remote name.
    pub children: HashMap<String, Dependency>,
}

impl Entity {
    pub fn new_service(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            desc: None,
            attrs: Attributes::default(),
            actions: HashMap::new(),
            status: Status::NoStatus,
            warning_annotated: false,
            kind: EntityKind::Service,
            parents: HashMap::new(),
            children: HashMap::new(),
        }
    }

    pub fn new_group(name: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::Group(GroupState {
                subservices: Box::new(Graph::new_group_body()),
                algo_reversed: false,
            }),
            ..Self::new_service(name)
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, EntityKind::Group(_))
    }

    pub fn group_state(&self) -> Option<&GroupState> {
        match &self.kind {
            EntityKind::Group(state) => Some(state),
            EntityKind::Service => None,
        }
    }

    pub fn group_state_mut(&mut self) -> Option<&mut GroupState> {
        match &mut self.kind {
            EntityKind::Group(state) => Some(state),
            EntityKind::Service => None,
        }
    }

    pub fn add_action(&mut self, action: Action) {
        self.actions.insert(action.name.clone(), action);
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn last_action(&self, name: &str) -> Option<&Action> {
        self.actions.get(name)
    }

    /// Inherit every unset attribute from `other` (typically the containing
    /// group, or the group's own parent, walked outward).
    pub fn inherits_from(&mut self, other: &Attributes) {
        self.attrs.inherit_from(other);
    }

    /// Overwrite target and propagate it to every subservice of a group
    /// (transitively, since a subservice may itself be a group).
    pub fn update_target(&mut self, target: super::nodeset::NodeSet) {
        self.attrs.target = Some(target.clone());
        if let EntityKind::Group(state) = &mut self.kind {
            for (name, sub) in state.subservices.entities_mut() {
                if name == super::graph::SOURCE || name == super::graph::SINK {
                    continue;
                }
                sub.update_target(target.clone());
            }
        }
    }

    /// True iff the entity's effective target is empty: it has nothing to
    /// run against, so `prepare()` marks it `Skipped` instead of scheduling.
    pub fn skipped(&self) -> bool {
        match &self.attrs.target {
            Some(t) => t.is_empty(),
            None => false,
        }
    }

    /// Add a prerequisite edge: `parent_name` must complete before `self`.
    /// Symmetric counterpart `remove_parent`/`add_child` are applied by the
    /// graph, which holds both endpoints.
    pub fn link_parent(&mut self, parent_name: impl Into<String>, strength: DependencyStrength) {
        self.parents.insert(parent_name.into(), Dependency::new(strength));
    }

    pub fn link_child(&mut self, child_name: impl Into<String>, strength: DependencyStrength) {
        self.children.insert(child_name.into(), Dependency::new(strength));
    }

    pub fn unlink_parent(&mut self, parent_name: &str) -> Option<Dependency> {
        self.parents.remove(parent_name)
    }

    pub fn unlink_child(&mut self, child_name: &str) -> Option<Dependency> {
        self.children.remove(child_name)
    }

    pub fn has_parent_dep(&self, name: &str) -> bool {
        self.parents.contains_key(name)
    }

    pub fn has_child_dep(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    /// Reduce parent statuses per the `eval_deps_status` table. Needs each
    /// parent's current status, looked up by the caller (graph owns them).
    pub fn eval_deps_status<'a>(&self, parent_status: impl Fn(&str) -> Option<Status> + 'a) -> Status {
        if self.parents.is_empty() {
            return Status::NoStatus;
        }
        let mut any_waiting = false;
        let mut any_dep_error = false;
        let mut all_resolved = true;
        for (name, dep) in &self.parents {
            let Some(status) = parent_status(name) else {
                all_resolved = false;
                continue;
            };
            if status == Status::WaitingStatus {
                any_waiting = true;
            }
            if status.is_error_class() {
                if matches!(dep.strength, DependencyStrength::Require | DependencyStrength::Check) {
                    any_dep_error = true;
                }
                // A weak parent's error still counts as resolved: the child
                // runs regardless, demoted to a WARNING annotation during
                // propagation rather than blocked here.
            } else if !status.is_done_class() {
                all_resolved = false;
            }
        }
        if any_waiting {
            Status::WaitingStatus
        } else if any_dep_error {
            Status::DepError
        } else if all_resolved {
            Status::Done
        } else {
            Status::NoStatus
        }
    }

    /// Dependencies (parent or child, as selected) whose remote endpoint's
    /// status is in `statuses`.
    pub fn search_deps<'a>(
        &'a self,
        statuses: &'a [Status],
        status_of: impl Fn(&str) -> Option<Status> + 'a,
        parents: bool,
    ) -> Vec<&'a str> {
        let map = if parents { &self.parents } else { &self.children };
        map.keys()
            .filter(|name| status_of(name).is_some_and(|s| statuses.contains(&s)))
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_when_target_empty() {
        let mut e = Entity::new_service("svc");
        assert!(!e.skipped(), "unset target is not skipped");
        e.update_target("".parse().unwrap());
        assert!(e.skipped());
    }

    #[test]
    fn eval_deps_status_no_parents_is_no_status() {
        let e = Entity::new_service("svc");
        assert_eq!(e.eval_deps_status(|_| None), Status::NoStatus);
    }

    #[test]
    fn eval_deps_status_waiting_dominates() {
        let mut e = Entity::new_service("svc");
        e.link_parent("a", DependencyStrength::Require);
        e.link_parent("b", DependencyStrength::Require);
        let statuses: HashMap<&str, Status> =
            [("a", Status::WaitingStatus), ("b", Status::Done)].into_iter().collect();
        assert_eq!(e.eval_deps_status(|n| statuses.get(n).copied()), Status::WaitingStatus);
    }

    #[test]
    fn eval_deps_status_require_error_is_dep_error() {
        let mut e = Entity::new_service("svc");
        e.link_parent("a", DependencyStrength::Require);
        let statuses: HashMap<&str, Status> = [("a", Status::Error)].into_iter().collect();
        assert_eq!(e.eval_deps_status(|n| statuses.get(n).copied()), Status::DepError);
    }

    #[test]
    fn eval_deps_status_weak_error_does_not_block() {
        let mut e = Entity::new_service("svc");
        e.link_parent("a", DependencyStrength::RequireWeak);
        let statuses: HashMap<&str, Status> = [("a", Status::Error)].into_iter().collect();
        // A weak parent's error does not set DEP_ERROR at this layer, and it
        // still counts as resolved so the child is not stuck waiting forever;
        // the WARNING annotation is applied separately during propagation.
        assert_eq!(e.eval_deps_status(|n| statuses.get(n).copied()), Status::Done);
    }

    #[test]
    fn eval_deps_status_all_done_is_done() {
        let mut e = Entity::new_service("svc");
        e.link_parent("a", DependencyStrength::Require);
        e.link_parent("b", DependencyStrength::RequireWeak);
        let statuses: HashMap<&str, Status> =
            [("a", Status::Done), ("b", Status::Warning)].into_iter().collect();
        assert_eq!(e.eval_deps_status(|n| statuses.get(n).copied()), Status::Done);
    }
}
