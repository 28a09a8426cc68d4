use crate::cli::ScopeArgs;
use crate::common::{Session, no_resources_message};
use crate::error::{OmcError, Result};
use crate::formatter::describe::describe;
use crate::mustgather::NamespaceScope;
use crate::resources::{self, extract, kube};
use serde_json::Value;
use std::collections::HashMap;

/// Split `TYPE/NAME`, `TYPE NAME` or `TYPE` into a type and an optional name.
pub fn parse_target(args: &[String]) -> Result<(String, Option<String>)> {
    match args {
        [single] => match single.split_once('/') {
            Some((type_name, name)) => Ok((type_name.to_string(), Some(name.to_string()))),
            None => Ok((single.clone(), None)),
        },
        [type_name, name] if !type_name.contains('/') => {
            Ok((type_name.clone(), Some(name.clone())))
        }
        _ => Err(OmcError::InvalidArgs(
            "expected TYPE, TYPE NAME or TYPE/NAME".to_string(),
        )),
    }
}

/// Events about `object`, oldest first.
fn events_for<'a>(object: &Value, events: &'a [Value]) -> Vec<&'a Value> {
    let name = extract::name(object);
    let kind = extract::kind(object);
    let mut matching: Vec<&Value> = events
        .iter()
        .filter(|e| {
            extract::get_str(e, &["involvedObject", "name"]) == Some(name)
                && extract::get_str(e, &["involvedObject", "kind"]).is_none_or(|k| k == kind)
        })
        .collect();
    matching.sort_by_key(|e| kube::event_time(e));
    matching
}

/// Where to look for events about an object in namespace `ns`.
fn event_scope(ns: &str) -> NamespaceScope {
    if ns.is_empty() {
        NamespaceScope::All
    } else {
        NamespaceScope::Namespace(ns.to_string())
    }
}

pub fn handle_describe(session: &Session, args: Vec<String>, scope: ScopeArgs) -> Result<()> {
    let (type_name, name) = parse_target(&args)?;
    let resource = resources::resolve(&type_name, &session.mg)?;
    let scope = session.scope(&scope);

    let mut objects = session.mg.load(&resource.location(), &scope)?;
    if let Some(name) = &name {
        objects.retain(|o| extract::name(o) == name.as_str());
        if objects.is_empty() {
            let namespace = if resource.namespaced {
                scope.namespace()
            } else {
                None
            };
            return Err(OmcError::not_found(
                &resource.qualified_plural(),
                name,
                namespace,
            ));
        }
    }
    if objects.is_empty() {
        eprintln!("{}", no_resources_message(&scope, resource.namespaced));
        return Ok(());
    }

    let event_type = resources::find_builtin("events")
        .ok_or_else(|| OmcError::UnknownResource("events".to_string()))?;
    let now = session.mg.reference_time();
    // Keyed by namespace. Events about cluster-scoped objects such as nodes
    // live in an arbitrary namespace (usually `default`), so those load under "".
    let mut events_by_namespace: HashMap<String, Vec<Value>> = HashMap::new();
    let mut sections = Vec::with_capacity(objects.len());
    for object in &objects {
        let ns = extract::namespace(object).unwrap_or_default();
        if !events_by_namespace.contains_key(ns) {
            let scope = event_scope(ns);
            let events = session.mg.load(&event_type.location(), &scope)?;
            events_by_namespace.insert(ns.to_string(), events);
        }
        let events = events_by_namespace
            .get(ns)
            .map(|e| events_for(object, e))
            .unwrap_or_default();
        sections.push(describe(object, &events, now));
    }
    print!("{}", sections.join("\n"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(
            parse_target(&args(&["pod/etcd-0"])).unwrap(),
            ("pod".to_string(), Some("etcd-0".to_string()))
        );
        assert_eq!(
            parse_target(&args(&["pod", "etcd-0"])).unwrap(),
            ("pod".to_string(), Some("etcd-0".to_string()))
        );
        assert_eq!(parse_target(&args(&["pods"])).unwrap(), ("pods".to_string(), None));
        assert!(parse_target(&args(&["pod/a", "b"])).is_err());
    }

    #[test]
    fn test_cluster_scoped_objects_search_every_namespace() {
        assert_eq!(event_scope(""), NamespaceScope::All);
        assert_eq!(
            event_scope("openshift-etcd"),
            NamespaceScope::Namespace("openshift-etcd".to_string())
        );
    }

    #[test]
    fn test_events_for_matches_name_and_kind() {
        let pod = json!({"kind": "Pod", "metadata": {"name": "etcd-0"}});
        let events = vec![
            json!({"involvedObject": {"kind": "Pod", "name": "etcd-0"}, "reason": "Late", "lastTimestamp": "2023-05-10T11:00:00Z"}),
            json!({"involvedObject": {"kind": "Pod", "name": "etcd-0"}, "reason": "Early", "lastTimestamp": "2023-05-10T10:00:00Z"}),
            json!({"involvedObject": {"kind": "Node", "name": "etcd-0"}, "reason": "Other"}),
            json!({"involvedObject": {"kind": "Pod", "name": "etcd-1"}, "reason": "Other"}),
        ];
        let matching = events_for(&pod, &events);
        let reasons: Vec<&str> = matching
            .iter()
            .map(|e| extract::get_str(e, &["reason"]).unwrap())
            .collect();
        assert_eq!(reasons, vec!["Early", "Late"]);
    }
}
