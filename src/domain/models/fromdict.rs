//! Hydrates a `Graph` from a pre-parsed configuration tree.
//!
//! Parsing YAML/JSON text into a `serde_json::Value` is explicitly out of
//! scope for the core; callers own that (see `infrastructure::config` for
//! the ambient process configuration, which is a separate concern from this
//! per-run graph configuration).

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::action::{Action, ActionConfigError};
use super::attributes::Attributes;
use super::entity::Entity;
use super::graph::{Graph, GraphError};
use super::nodeset::{NodeSet, NodeSetError};
use super::status::DependencyStrength;

/// Errors raised while hydrating a graph from a configuration mapping.
#[derive(Debug, thiserror::Error)]
pub enum FromDictError {
    #[error("{field:?} of {entity:?} must be {expected}")]
    WrongType {
        entity: String,
        field: &'static str,
        expected: &'static str,
    },
    #[error(transparent)]
    NodeSet(#[from] NodeSetError),
    #[error(transparent)]
    ActionConfig(#[from] ActionConfigError),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Build a top-level `Graph` from a document shaped like:
/// `{ "services": { name: { ... } }, target: ..., variables: {...} }`.
///
/// Top-level siblings are wired with plain `add_dep`, never spliced through
/// sentinels — only a `ServiceGroup`'s own subservices use `add_inter_dep`.
pub fn graph_from_value(doc: &Value) -> Result<Graph, FromDictError> {
    let root_attrs = parse_attrs("<root>", doc)?;
    let mut graph = Graph::new();
    if let Some(services) = doc.get("services").and_then(Value::as_object) {
        populate_siblings(&mut graph, services, &root_attrs, false)?;
        wire_requires(&mut graph, services, false)?;
    }
    Ok(graph)
}

/// Insert every (possibly nodeset-expanded) sibling named in `services` into
/// `container`, inheriting `parent_attrs`. `inter` selects `add_inter_dep`
/// (inside a group's subgraph) vs plain `add_dep` (top level).
fn populate_siblings(
    container: &mut Graph,
    services: &Map<String, Value>,
    parent_attrs: &Attributes,
    inter: bool,
) -> Result<(), FromDictError> {
    for (raw_name, spec) in services {
        for name in expand_sibling_name(raw_name)? {
            let entity = build_entity(&name, spec, parent_attrs)?;
            container.insert(entity)?;
            if inter {
                container.add_inter_dep(None, &name, DependencyStrength::Require)?;
            }
        }
    }
    Ok(())
}

/// Second pass: wire `require`/`require_weak`/`check` edges once every
/// sibling named by any of them is guaranteed to already exist.
fn wire_requires(container: &mut Graph, services: &Map<String, Value>, inter: bool) -> Result<(), FromDictError> {
    for (raw_name, spec) in services {
        for name in expand_sibling_name(raw_name)? {
            for (key, strength) in [
                ("require", DependencyStrength::Require),
                ("require_weak", DependencyStrength::RequireWeak),
                ("check", DependencyStrength::Check),
            ] {
                for dep_name in string_list(spec, key)? {
                    if inter {
                        container.add_inter_dep(Some(&name), &dep_name, strength)?;
                    } else {
                        container.add_dep(&name, &dep_name, strength)?;
                    }
                }
            }
        }
    }
    Ok(())
}

/// A `services:` key may itself be nodeset-like (`da[1-3]`), expanding into
/// one subservice per element, each built from the same spec.
fn expand_sibling_name(raw_name: &str) -> Result<Vec<String>, FromDictError> {
    let set: NodeSet = raw_name.parse()?;
    Ok(set.iter().map(str::to_string).collect())
}

fn build_entity(name: &str, spec: &Value, parent_attrs: &Attributes) -> Result<Entity, FromDictError> {
    let mut attrs = parse_attrs(name, spec)?;
    attrs.inherit_from(parent_attrs);

    if let Some(services) = spec.get("services").and_then(Value::as_object) {
        let mut entity = Entity::new_group(name);
        entity.desc = string_field(spec, "desc")?;
        entity.attrs = attrs.clone();
        let state = entity.group_state_mut().expect("just constructed as a group");
        populate_siblings(&mut state.subservices, services, &attrs, true)?;
        wire_requires(&mut state.subservices, services, true)?;
        Ok(entity)
    } else {
        let mut entity = Entity::new_service(name);
        entity.desc = string_field(spec, "desc")?;
        entity.attrs = attrs;
        if let Some(actions) = spec.get("actions").and_then(Value::as_object) {
            for (action_name, action_spec) in actions {
                entity.add_action(build_action(action_name, action_spec)?);
            }
        }
        Ok(entity)
    }
}

fn build_action(name: &str, spec: &Value) -> Result<Action, FromDictError> {
    let cmd = spec
        .get("cmd")
        .and_then(Value::as_str)
        .ok_or_else(|| FromDictError::WrongType {
            entity: name.to_string(),
            field: "cmd",
            expected: "a string",
        })?;
    let mut action = Action::new(name, cmd);
    if let Some(delay) = f64_field(spec, "delay")? {
        action = action.with_delay(delay);
    }
    if let Some(timeout) = f64_field(spec, "timeout")? {
        action = action.with_timeout(timeout);
    }
    if let Some(target) = string_field(spec, "target")? {
        action = action.with_target(target.parse()?);
    }
    if let Some(retry) = spec.get("retry").and_then(Value::as_u64) {
        action.set_retry(retry as u32)?;
    }
    Ok(action)
}

fn parse_attrs(name: &str, spec: &Value) -> Result<Attributes, FromDictError> {
    let mut attrs = Attributes::default();
    if let Some(target) = string_field(spec, "target")? {
        attrs.target = Some(target.parse()?);
    }
    match spec.get("timeout") {
        None => {}
        Some(Value::Null) => attrs.set_no_timeout(),
        Some(v) => {
            attrs.timeout = Some(v.as_f64().ok_or_else(|| FromDictError::WrongType {
                entity: name.to_string(),
                field: "timeout",
                expected: "a number or null",
            })?)
        }
    }
    if let Some(v) = spec.get("fanout") {
        attrs.fanout = Some(as_u32(name, "fanout", v)?);
    }
    if let Some(v) = spec.get("errors") {
        attrs.errors = Some(as_u32(name, "errors", v)?);
    }
    if let Some(v) = spec.get("warnings") {
        attrs.warnings = Some(as_u32(name, "warnings", v)?);
    }
    if let Some(v) = spec.get("simulate") {
        attrs.simulate = v.as_bool().unwrap_or(false);
    }
    if let Some(vars) = spec.get("variables").and_then(Value::as_object) {
        attrs.variables = vars
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
            .collect::<HashMap<_, _>>();
    }
    Ok(attrs)
}

fn as_u32(entity: &str, field: &'static str, v: &Value) -> Result<u32, FromDictError> {
    v.as_u64().map(|n| n as u32).ok_or_else(|| FromDictError::WrongType {
        entity: entity.to_string(),
        field,
        expected: "a non-negative integer",
    })
}

fn f64_field(spec: &Value, field: &'static str) -> Result<Option<f64>, FromDictError> {
    match spec.get(field) {
        None => Ok(None),
        Some(v) => v.as_f64().map(Some).ok_or_else(|| FromDictError::WrongType {
            entity: String::new(),
            field,
            expected: "a number",
        }),
    }
}

fn string_field(spec: &Value, field: &str) -> Result<Option<String>, FromDictError> {
    match spec.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(FromDictError::WrongType {
            entity: String::new(),
            field: "target/desc",
            expected: "a string",
        }),
    }
}

/// `require`/`require_weak`/`check` accept either a single name/nodeset
/// string or a JSON array of them.
fn string_list(spec: &Value, field: &str) -> Result<Vec<String>, FromDictError> {
    match spec.get(field) {
        None => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(vec![s.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| {
                v.as_str().map(str::to_string).ok_or_else(|| FromDictError::WrongType {
                    entity: String::new(),
                    field: "require/require_weak/check",
                    expected: "a string or array of strings",
                })
            })
            .collect(),
        Some(_) => Err(FromDictError::WrongType {
            entity: String::new(),
            field: "require/require_weak/check",
            expected: "a string or array of strings",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_services_with_require() {
        let doc = json!({
            "services": {
                "network": { "target": "node1", "actions": { "start": { "cmd": "/bin/true" } } },
                "db": {
                    "target": "node1",
                    "require": ["network"],
                    "actions": { "start": { "cmd": "/bin/true" } }
                }
            }
        });
        let graph = graph_from_value(&doc).unwrap();
        assert!(graph.get("network").unwrap().has_child_dep("db"));
        assert!(graph.get("db").unwrap().has_parent_dep("network"));
    }

    #[test]
    fn nodeset_like_service_name_expands() {
        let doc = json!({
            "services": {
                "da[1-3]": { "target": "node1", "actions": { "start": { "cmd": "/bin/true" } } }
            }
        });
        let graph = graph_from_value(&doc).unwrap();
        assert!(graph.contains("da1"));
        assert!(graph.contains("da2"));
        assert!(graph.contains("da3"));
    }

    #[test]
    fn nested_services_key_promotes_to_group() {
        let doc = json!({
            "services": {
                "cluster": {
                    "target": "node1",
                    "services": {
                        "a": { "actions": { "start": { "cmd": "/bin/true" } } },
                        "b": { "actions": { "start": { "cmd": "/bin/true" } }, "require": ["a"] }
                    }
                }
            }
        });
        let graph = graph_from_value(&doc).unwrap();
        let cluster = graph.get("cluster").unwrap();
        assert!(cluster.is_group());
        let state = cluster.group_state().unwrap();
        assert!(state.subservices.has_subservice("a"));
        assert!(state.subservices.has_subservice("b"));
        // "a" inherited cluster's target since it did not set its own.
        assert_eq!(
            state.subservices.get("a").unwrap().attrs.target.as_ref().unwrap().to_string(),
            "node1"
        );
    }

    #[test]
    fn delay_before_retry_is_honored() {
        let doc = json!({
            "services": {
                "flaky": {
                    "target": "node1",
                    "actions": { "start": { "cmd": "/bin/false", "delay": 2.0, "retry": 3 } }
                }
            }
        });
        let graph = graph_from_value(&doc).unwrap();
        let action = graph.get("flaky").unwrap().last_action("start").unwrap();
        assert_eq!(action.retry(), 3);
        assert_eq!(action.delay, 2.0);
    }

    #[test]
    fn retry_without_delay_is_rejected() {
        let doc = json!({
            "services": {
                "flaky": {
                    "target": "node1",
                    "actions": { "start": { "cmd": "/bin/false", "retry": 3 } }
                }
            }
        });
        assert!(graph_from_value(&doc).is_err());
    }
}
