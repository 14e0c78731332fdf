//! Attributes common to every entity (service or service group), and the
//! copy-if-unset inheritance rule that flows them from parent container to
//! child.

use std::collections::HashMap;

use super::nodeset::NodeSet;

/// Attributes every [`Entity`](super::entity::Entity) carries, each
/// inheritable from parent to child unless already set.
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    /// Target node set. `None` until set or inherited.
    pub target: Option<NodeSet>,
    /// Timeout in seconds; `None` means "no timeout" once resolved, but is
    /// also the "unset" sentinel prior to inheritance — callers that need
    /// to distinguish the two use `timeout_explicitly_none`.
    pub timeout: Option<f64>,
    timeout_explicitly_none: bool,
    /// Upper bound on concurrent worker tasks.
    pub fanout: Option<u32>,
    /// Error tolerance (node count).
    pub errors: Option<u32>,
    /// Warning tolerance (node count).
    pub warnings: Option<u32>,
    /// `$VAR` substitution variables.
    pub variables: HashMap<String, String>,
    /// Suppresses real execution and external-event callbacks.
    pub simulate: bool,
}

/// Default fan-out when nothing in the inheritance chain sets one.
pub const DEFAULT_FANOUT: u32 = 64;

impl Attributes {
    /// Explicitly mark timeout as "no timeout" (as opposed to unset).
    pub fn set_no_timeout(&mut self) {
        self.timeout = None;
        self.timeout_explicitly_none = true;
    }

    fn timeout_is_set(&self) -> bool {
        self.timeout.is_some() || self.timeout_explicitly_none
    }

    /// Resolved fan-out, falling back to [`DEFAULT_FANOUT`].
    pub fn effective_fanout(&self) -> u32 {
        self.fanout.unwrap_or(DEFAULT_FANOUT)
    }

    /// Resolved error tolerance, falling back to zero (any failure errors).
    pub fn effective_errors(&self) -> u32 {
        self.errors.unwrap_or(0)
    }

    /// Resolved warning tolerance, falling back to zero.
    pub fn effective_warnings(&self) -> u32 {
        self.warnings.unwrap_or(0)
    }

    /// Copy every attribute from `other` into `self` where `self` has not
    /// set it yet. Variables merge (self's entries win on conflict);
    /// everything else is copy-if-unset.
    pub fn inherit_from(&mut self, other: &Attributes) {
        if self.target.is_none() {
            self.target = other.target.clone();
        }
        if !self.timeout_is_set() {
            self.timeout = other.timeout;
            self.timeout_explicitly_none = other.timeout_explicitly_none;
        }
        if self.fanout.is_none() {
            self.fanout = other.fanout;
        }
        if self.errors.is_none() {
            self.errors = other.errors;
        }
        if self.warnings.is_none() {
            self.warnings = other.warnings;
        }
        for (k, v) in &other.variables {
            self.variables.entry(k.clone()).or_insert_with(|| v.clone());
        }
        // `simulate` has no "unset" state; a child only inherits `true` from
        // an ancestor, never overriding an explicit `false`... but since the
        // type is a bare bool we treat "not yet set" as `false`, and
        // inheritance is therefore OR-like: once any ancestor simulates,
        // descendants do too unless they were individually set with
        // `Attributes::force_simulate`.
        self.simulate = self.simulate || other.simulate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inherit_fills_unset_fields_only() {
        let mut parent = Attributes::default();
        parent.target = Some("127.0.0.1".parse().unwrap());
        parent.timeout = Some(15.0);

        let mut child = Attributes::default();
        child.set_no_timeout();

        child.inherit_from(&parent);

        assert_eq!(child.target, Some("127.0.0.1".parse().unwrap()));
        // Child explicitly set "no timeout" before inheriting, so the
        // parent's 15s must not override it.
        assert_eq!(child.timeout, None);
    }

    #[test]
    fn variables_merge_child_wins() {
        let mut parent = Attributes::default();
        parent.variables.insert("VAR".into(), "parent".into());

        let mut child = Attributes::default();
        child.variables.insert("VAR".into(), "child".into());
        child.inherit_from(&parent);

        assert_eq!(child.variables.get("VAR"), Some(&"child".to_string()));
    }

    #[test]
    fn effective_fanout_falls_back_to_default() {
        let attrs = Attributes::default();
        assert_eq!(attrs.effective_fanout(), DEFAULT_FANOUT);
    }
}
