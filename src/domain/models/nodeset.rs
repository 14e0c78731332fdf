//! Compact node set: a set of hostnames supporting range syntax
//! (`fortoy[5-10]`, `node[1,3,5-7]`).
//!
//! This is new relative to the distilled engine spec, which only mentions
//! node sets informally; a concrete type is required because `target`,
//! `skipped()`, and nodeset-like `services:` keys in `fromdict` all need one.
//! Folding a set of hostnames back into range syntax on `Display` is out of
//! scope (see `SPEC_FULL.md` Open Questions) — only expansion and membership
//! are exercised by the engine.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A set of hostnames, built from comma-separated literal names and/or
/// bracketed range groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSet {
    hosts: BTreeSet<String>,
}

/// Errors that can occur while parsing a node set string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NodeSetError {
    #[error("unbalanced brackets in node set {0:?}")]
    UnbalancedBrackets(String),
    #[error("invalid range {0:?} in node set")]
    InvalidRange(String),
}

impl NodeSet {
    /// An empty node set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A node set containing a single literal host.
    pub fn single(host: impl Into<String>) -> Self {
        let mut hosts = BTreeSet::new();
        hosts.insert(host.into());
        Self { hosts }
    }

    /// Whether this node set has no hosts. Backs `Entity::skipped()`.
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Number of hosts in the set.
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Iterate the expanded host names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.hosts.iter().map(String::as_str)
    }

    /// Union this node set with another, returning a new set.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            hosts: self.hosts.union(&other.hosts).cloned().collect(),
        }
    }

    /// Whether `host` is a member of this set.
    pub fn contains(&self, host: &str) -> bool {
        self.hosts.contains(host)
    }
}

impl FromStr for NodeSet {
    type Err = NodeSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::empty());
        }
        let mut hosts = BTreeSet::new();
        for group in split_top_level_commas(s) {
            expand_group(group, &mut hosts)?;
        }
        Ok(Self { hosts })
    }
}

impl fmt::Display for NodeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self.hosts.iter().cloned().collect::<Vec<_>>().join(",");
        write!(f, "{joined}")
    }
}

/// Split on commas that are not inside a `[...]` range group.
fn split_top_level_commas(s: &str) -> Vec<&str> {
    let mut groups = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth -= 1,
            ',' if depth == 0 => {
                groups.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    groups.push(&s[start..]);
    groups
}

/// Expand one `prefix[ranges]` or plain-hostname group into `hosts`.
fn expand_group(group: &str, hosts: &mut BTreeSet<String>) -> Result<(), NodeSetError> {
    let group = group.trim();
    if group.is_empty() {
        return Ok(());
    }
    match (group.find('['), group.ends_with(']')) {
        (Some(open), true) => {
            let prefix = &group[..open];
            let inner = &group[open + 1..group.len() - 1];
            if inner.contains('[') || inner.contains(']') {
                return Err(NodeSetError::UnbalancedBrackets(group.to_string()));
            }
            for range in inner.split(',') {
                expand_range(prefix, range.trim(), hosts)?;
            }
            Ok(())
        }
        (None, false) => {
            hosts.insert(group.to_string());
            Ok(())
        }
        _ => Err(NodeSetError::UnbalancedBrackets(group.to_string())),
    }
}

/// Expand a single range component (`5-10`, `07`, `3`) under `prefix`.
fn expand_range(prefix: &str, range: &str, hosts: &mut BTreeSet<String>) -> Result<(), NodeSetError> {
    if range.is_empty() {
        return Err(NodeSetError::InvalidRange(range.to_string()));
    }
    match range.split_once('-') {
        Some((lo, hi)) => {
            let width = lo.len().max(hi.len());
            let lo: u64 = lo
                .parse()
                .map_err(|_| NodeSetError::InvalidRange(range.to_string()))?;
            let hi: u64 = hi
                .parse()
                .map_err(|_| NodeSetError::InvalidRange(range.to_string()))?;
            if lo > hi {
                return Err(NodeSetError::InvalidRange(range.to_string()));
            }
            for n in lo..=hi {
                hosts.insert(format!("{prefix}{n:0width$}", width = width));
            }
            Ok(())
        }
        None => {
            // Single index, no dash: keep the literal width as written.
            range.parse::<u64>().map_err(|_| NodeSetError::InvalidRange(range.to_string()))?;
            hosts.insert(format!("{prefix}{range}"));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns(s: &str) -> NodeSet {
        s.parse().unwrap()
    }

    #[test]
    fn parses_plain_hostnames() {
        let set = ns("a,b,c");
        assert_eq!(set.len(), 3);
        assert!(set.contains("a"));
        assert!(set.contains("b"));
        assert!(set.contains("c"));
    }

    #[test]
    fn parses_single_range() {
        let set = ns("fortoy[5-10]");
        assert_eq!(set.len(), 6);
        assert!(set.contains("fortoy5"));
        assert!(set.contains("fortoy10"));
        assert!(!set.contains("fortoy11"));
    }

    #[test]
    fn parses_mixed_range_groups() {
        let set = ns("node[1,3,5-7]");
        assert_eq!(set.len(), 4);
        for h in ["node1", "node3", "node5", "node6", "node7"] {
            assert!(set.contains(h), "missing {h}");
        }
    }

    #[test]
    fn preserves_zero_padding_width() {
        let set = ns("da[01-03]");
        assert!(set.contains("da01"));
        assert!(set.contains("da02"));
        assert!(set.contains("da03"));
        assert!(!set.contains("da1"));
    }

    #[test]
    fn empty_string_is_empty_set() {
        let set = ns("");
        assert!(set.is_empty());
    }

    #[test]
    fn union_is_commutative() {
        let a = ns("x[1-3]");
        let b = ns("y,z");
        assert_eq!(a.union(&b), b.union(&a));
    }

    #[test]
    fn invalid_range_rejected() {
        assert!("node[5-]".parse::<NodeSet>().is_err());
        assert!("node[z-9]".parse::<NodeSet>().is_err());
    }

    #[test]
    fn display_joins_sorted_hosts() {
        let set = ns("c,a,b");
        assert_eq!(set.to_string(), "a,b,c");
    }

    proptest::proptest! {
        #[test]
        fn range_expansion_is_deterministic(lo in 0u64..50, span in 0u64..20) {
            let hi = lo + span;
            let spec = format!("h[{lo}-{hi}]");
            let first = spec.parse::<NodeSet>().unwrap();
            let second = spec.parse::<NodeSet>().unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
