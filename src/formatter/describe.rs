//! `omc describe`: kubectl-like text rendering of a single object.

use crate::formatter::age::age;
use crate::resources::extract::{
    self, NONE, at, get_array, get_bool, get_i64, get_str, get_string, get_string_map,
};
use crate::resources::kube::{event_time, pod_status, service_ports};
use crate::resources::workloads::desired_replicas;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;

const INDENT: &str = "  ";

/// Accumulates `Key:   value` lines with kubectl's alignment.
struct Writer {
    out: String,
}

impl Writer {
    fn new() -> Self {
        Writer { out: String::new() }
    }

    /// Column the value starts at, relative to the indent. Keys at least
    /// that long still get one space before their value.
    fn value_column(level: usize, key: &str) -> usize {
        20usize
            .saturating_sub(INDENT.len() * level)
            .max(key.len() + 2)
    }

    fn field(&mut self, level: usize, key: &str, value: impl AsRef<str>) {
        let prefix = INDENT.repeat(level);
        let width = Self::value_column(level, key);
        let key = format!("{}:", key);
        let value = value.as_ref();
        if value.is_empty() {
            self.out.push_str(&format!("{}{}\n", prefix, key));
        } else {
            self.out
                .push_str(&format!("{}{:<width$}{}\n", prefix, key, value, width = width));
        }
    }

    fn line(&mut self, level: usize, text: impl AsRef<str>) {
        self.out
            .push_str(&format!("{}{}\n", INDENT.repeat(level), text.as_ref()));
    }

    /// `Labels:  a=b` then one continuation line per extra entry.
    fn map(&mut self, level: usize, key: &str, map: &BTreeMap<String, String>) {
        if map.is_empty() {
            self.field(level, key, NONE);
            return;
        }
        let width = Self::value_column(level, key);
        for (i, (k, v)) in map.iter().enumerate() {
            let entry = format!("{}={}", k, v);
            if i == 0 {
                self.field(level, key, entry);
            } else {
                self.line(level, format!("{:width$}{}", "", entry, width = width));
            }
        }
    }
}

/// Render `object` followed by its events.
pub fn describe(object: &Value, events: &[&Value], now: DateTime<Utc>) -> String {
    let mut w = Writer::new();
    metadata(&mut w, object);
    match extract::kind(object) {
        "Pod" => pod(&mut w, object),
        "Deployment" => deployment(&mut w, object),
        "Node" => node(&mut w, object),
        "Service" => service(&mut w, object),
        _ => generic(&mut w, object),
    }
    events_section(&mut w, events, now);
    w.out
}

fn metadata(w: &mut Writer, object: &Value) {
    w.field(0, "Name", extract::name(object));
    if let Some(ns) = extract::namespace(object) {
        w.field(0, "Namespace", ns);
    }
    w.map(0, "Labels", &extract::labels(object));
    w.map(
        0,
        "Annotations",
        &get_string_map(object, &["metadata", "annotations"]),
    );
    if let Some(ts) = get_str(object, &["metadata", "creationTimestamp"]) {
        w.field(0, "CreationTimestamp", ts);
    }
    let owners = get_array(object, &["metadata", "ownerReferences"]);
    if let Some(owner) = owners
        .iter()
        .find(|o| get_bool(o, &["controller"]) == Some(true))
        .or_else(|| owners.first())
    {
        w.field(
            0,
            "Controlled By",
            format!(
                "{}/{}",
                get_string(owner, &["kind"]),
                get_string(owner, &["name"])
            ),
        );
    }
}

fn pod(w: &mut Writer, pod: &Value) {
    w.field(0, "Priority", get_i64(pod, &["spec", "priority"]).unwrap_or(0).to_string());
    if let Some(class) = get_str(pod, &["spec", "priorityClassName"]) {
        w.field(0, "Priority Class Name", class);
    }
    w.field(0, "Service Account", get_string(pod, &["spec", "serviceAccountName"]));
    let node = match (
        get_str(pod, &["spec", "nodeName"]),
        get_str(pod, &["status", "hostIP"]),
    ) {
        (Some(node), Some(ip)) => format!("{}/{}", node, ip),
        (Some(node), None) => node.to_string(),
        _ => NONE.to_string(),
    };
    w.field(0, "Node", node);
    if let Some(start) = get_str(pod, &["status", "startTime"]) {
        w.field(0, "Start Time", start);
    }
    w.field(0, "Status", pod_status(pod));
    w.field(0, "IP", get_string(pod, &["status", "podIP"]));

    let init = get_array(pod, &["spec", "initContainers"]);
    if !init.is_empty() {
        w.field(0, "Init Containers", "");
        containers(w, init, get_array(pod, &["status", "initContainerStatuses"]));
    }
    w.field(0, "Containers", "");
    containers(
        w,
        get_array(pod, &["spec", "containers"]),
        get_array(pod, &["status", "containerStatuses"]),
    );

    let conditions = get_array(pod, &["status", "conditions"]);
    if !conditions.is_empty() {
        w.field(0, "Conditions", "");
        w.line(1, format!("{:<26}{}", "Type", "Status"));
        for c in conditions {
            w.line(
                1,
                format!(
                    "{:<26}{}",
                    get_string(c, &["type"]),
                    get_string(c, &["status"])
                ),
            );
        }
    }

    let volumes = get_array(pod, &["spec", "volumes"]);
    if volumes.is_empty() {
        w.field(0, "Volumes", NONE);
    } else {
        w.field(0, "Volumes", "");
        for v in volumes {
            w.field(1, &get_string(v, &["name"]), "");
            let source = v
                .as_object()
                .and_then(|m| m.keys().find(|k| k.as_str() != "name").cloned())
                .unwrap_or_default();
            w.field(2, "Type", source);
        }
    }
    w.field(
        0,
        "Node-Selectors",
        extract::format_map(&get_string_map(pod, &["spec", "nodeSelector"])),
    );
}

fn containers(w: &mut Writer, specs: &[Value], statuses: &[Value]) {
    for spec in specs {
        let name = get_string(spec, &["name"]);
        let status = statuses
            .iter()
            .find(|s| get_str(s, &["name"]) == Some(name.as_str()));
        w.field(1, &name, "");
        if let Some(id) = status.and_then(|s| get_str(s, &["containerID"])) {
            w.field(2, "Container ID", id);
        }
        w.field(2, "Image", get_string(spec, &["image"]));
        let ports: Vec<String> = get_array(spec, &["ports"])
            .iter()
            .map(|p| {
                format!(
                    "{}/{}",
                    get_i64(p, &["containerPort"]).unwrap_or(0),
                    get_str(p, &["protocol"]).unwrap_or("TCP")
                )
            })
            .collect();
        w.field(2, "Port", extract::or_none(ports.join(", ")));
        let command: Vec<&str> = get_array(spec, &["command"])
            .iter()
            .filter_map(Value::as_str)
            .collect();
        if !command.is_empty() {
            w.field(2, "Command", "");
            for c in command {
                w.line(3, c);
            }
        }

        let Some(status) = status else {
            continue;
        };
        container_state(w, "State", at(status, &["state"]));
        if at(status, &["lastState"]).is_some_and(|s| s.as_object().is_some_and(|m| !m.is_empty())) {
            container_state(w, "Last State", at(status, &["lastState"]));
        }
        w.field(
            2,
            "Ready",
            extract::title_bool(get_bool(status, &["ready"]).unwrap_or(false)),
        );
        w.field(2, "Restart Count", extract::count(status, &["restartCount"]));
    }
}

fn container_state(w: &mut Writer, label: &str, state: Option<&Value>) {
    let Some((name, detail)) = state
        .and_then(Value::as_object)
        .and_then(|m| m.iter().next())
    else {
        w.field(2, label, "Waiting");
        return;
    };
    let mut title = name.clone();
    if let Some(first) = title.get_mut(..1) {
        first.make_ascii_uppercase();
    }
    w.field(2, label, title);
    for key in ["reason", "message", "exitCode", "startedAt", "finishedAt"] {
        let Some(value) = detail.get(key) else {
            continue;
        };
        let label = match key {
            "exitCode" => "Exit Code",
            "startedAt" => "Started",
            "finishedAt" => "Finished",
            "reason" => "Reason",
            _ => "Message",
        };
        let text = match value {
            Value::String(s) => s.lines().next().unwrap_or_default().to_string(),
            other => other.to_string(),
        };
        w.field(3, label, text);
    }
}

fn deployment(w: &mut Writer, deploy: &Value) {
    w.map(
        0,
        "Selector",
        &get_string_map(deploy, &["spec", "selector", "matchLabels"]),
    );
    w.field(
        0,
        "Replicas",
        format!(
            "{} desired | {} updated | {} total | {} available | {} unavailable",
            desired_replicas(deploy),
            get_i64(deploy, &["status", "updatedReplicas"]).unwrap_or(0),
            get_i64(deploy, &["status", "replicas"]).unwrap_or(0),
            get_i64(deploy, &["status", "availableReplicas"]).unwrap_or(0),
            get_i64(deploy, &["status", "unavailableReplicas"]).unwrap_or(0),
        ),
    );
    w.field(
        0,
        "StrategyType",
        get_str(deploy, &["spec", "strategy", "type"]).unwrap_or("RollingUpdate"),
    );
    w.field(0, "Pod Template", "");
    w.map(
        1,
        "Labels",
        &get_string_map(deploy, &["spec", "template", "metadata", "labels"]),
    );
    w.field(1, "Containers", "");
    containers(
        w,
        get_array(deploy, &["spec", "template", "spec", "containers"]),
        &[],
    );
    conditions_table(w, deploy);
}

fn node(w: &mut Writer, node: &Value) {
    w.field(0, "Roles", crate::resources::kube::node_roles(node));
    let taints: Vec<String> = get_array(node, &["spec", "taints"])
        .iter()
        .map(|t| {
            let key = get_string(t, &["key"]);
            let effect = get_string(t, &["effect"]);
            match get_str(t, &["value"]) {
                Some(v) => format!("{}={}:{}", key, v, effect),
                None => format!("{}:{}", key, effect),
            }
        })
        .collect();
    w.field(0, "Taints", extract::or_none(taints.join(", ")));
    w.field(
        0,
        "Unschedulable",
        get_bool(node, &["spec", "unschedulable"])
            .unwrap_or(false)
            .to_string(),
    );
    conditions_table(w, node);

    w.field(0, "Addresses", "");
    for a in get_array(node, &["status", "addresses"]) {
        w.field(1, &get_string(a, &["type"]), get_string(a, &["address"]));
    }
    for section in ["capacity", "allocatable"] {
        let mut title = section.to_string();
        if let Some(first) = title.get_mut(..1) {
            first.make_ascii_uppercase();
        }
        w.field(0, &title, "");
        for (k, v) in get_string_map(node, &["status", section]) {
            w.field(1, &k, v);
        }
    }
    w.field(0, "System Info", "");
    for (key, label) in [
        ("machineID", "Machine ID"),
        ("kernelVersion", "Kernel Version"),
        ("osImage", "OS Image"),
        ("containerRuntimeVersion", "Container Runtime Version"),
        ("kubeletVersion", "Kubelet Version"),
    ] {
        w.field(1, label, get_string(node, &["status", "nodeInfo", key]));
    }
}

fn service(w: &mut Writer, svc: &Value) {
    w.map(0, "Selector", &get_string_map(svc, &["spec", "selector"]));
    w.field(0, "Type", get_string(svc, &["spec", "type"]));
    w.field(0, "IP", get_string(svc, &["spec", "clusterIP"]));
    w.field(0, "Port(s)", service_ports(svc));
    w.field(
        0,
        "Session Affinity",
        get_str(svc, &["spec", "sessionAffinity"]).unwrap_or("None"),
    );
}

/// Fallback: dump `spec` and `status` as YAML.
fn generic(w: &mut Writer, object: &Value) {
    for section in ["spec", "status", "data"] {
        let Some(value) = object.get(section) else {
            continue;
        };
        let mut title = section.to_string();
        if let Some(first) = title.get_mut(..1) {
            first.make_ascii_uppercase();
        }
        w.field(0, &title, "");
        match serde_yaml::to_string(value) {
            Ok(yaml) => {
                for line in yaml.lines() {
                    w.line(1, line);
                }
            }
            Err(e) => log::debug!("Cannot render {}: {}", section, e),
        }
    }
}

fn conditions_table(w: &mut Writer, object: &Value) {
    let conditions = get_array(object, &["status", "conditions"]);
    if conditions.is_empty() {
        return;
    }
    w.field(0, "Conditions", "");
    w.line(1, format!("{:<26}{:<8}{}", "Type", "Status", "Reason"));
    w.line(1, format!("{:<26}{:<8}{}", "----", "------", "------"));
    for c in conditions {
        w.line(
            1,
            format!(
                "{:<26}{:<8}{}",
                get_string(c, &["type"]),
                get_string(c, &["status"]),
                get_string(c, &["reason"])
            ),
        );
    }
}

fn events_section(w: &mut Writer, events: &[&Value], now: DateTime<Utc>) {
    if events.is_empty() {
        w.field(0, "Events", NONE);
        return;
    }
    w.field(0, "Events", "");
    let headers = ["Type", "Reason", "Age", "From", "Message"];
    let rows: Vec<Vec<String>> = events
        .iter()
        .map(|e| {
            vec![
                get_string(e, &["type"]),
                get_string(e, &["reason"]),
                age(event_time(e), now),
                get_str(e, &["source", "component"])
                    .or_else(|| get_str(e, &["reportingComponent"]))
                    .unwrap_or_default()
                    .to_string(),
                get_string(e, &["message"]).trim().to_string(),
            ]
        })
        .collect();
    let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    for line in super::table::render(&headers, &rows, false).lines() {
        w.line(1, line);
    }
}
