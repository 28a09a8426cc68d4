//! Core Kubernetes kinds: pods, services, nodes, storage, events.

use super::extract::{
    self, NONE, at, condition_status, format_map, get_array, get_bool, get_i64, get_str,
    get_string, get_string_map, get_time, or_none,
};
use super::{ColumnPrinter, ResourceType, RowContext};
use crate::formatter::age::age;
use chrono::{DateTime, Utc};
use serde_json::Value;

pub fn kinds() -> Vec<ResourceType> {
    vec![
        ResourceType::builtin(
            "pods",
            "pod",
            "Pod",
            "",
            true,
            &["po"],
            ColumnPrinter::new(&["READY", "STATUS", "RESTARTS", "AGE"], pod_row)
                .with_wide(&["IP", "NODE"], pod_wide_row),
        ),
        ResourceType::builtin(
            "services",
            "service",
            "Service",
            "",
            true,
            &["svc"],
            ColumnPrinter::new(
                &["TYPE", "CLUSTER-IP", "EXTERNAL-IP", "PORT(S)", "AGE"],
                service_row,
            )
            .with_wide(&["SELECTOR"], |svc, _| {
                vec![format_map(&get_string_map(svc, &["spec", "selector"]))]
            }),
        ),
        ResourceType::builtin(
            "configmaps",
            "configmap",
            "ConfigMap",
            "",
            true,
            &["cm"],
            ColumnPrinter::new(&["DATA", "AGE"], |cm, ctx| {
                let data = map_len(cm, "data") + map_len(cm, "binaryData");
                vec![data.to_string(), age(extract::creation_timestamp(cm), ctx.now)]
            }),
        ),
        ResourceType::builtin(
            "secrets",
            "secret",
            "Secret",
            "",
            true,
            &[],
            ColumnPrinter::new(&["TYPE", "DATA", "AGE"], |secret, ctx| {
                vec![
                    get_string(secret, &["type"]),
                    map_len(secret, "data").to_string(),
                    age(extract::creation_timestamp(secret), ctx.now),
                ]
            }),
        ),
        ResourceType::builtin(
            "persistentvolumeclaims",
            "persistentvolumeclaim",
            "PersistentVolumeClaim",
            "",
            true,
            &["pvc"],
            ColumnPrinter::new(
                &["STATUS", "VOLUME", "CAPACITY", "ACCESS MODES", "STORAGECLASS", "AGE"],
                pvc_row,
            ),
        ),
        ResourceType::builtin(
            "persistentvolumes",
            "persistentvolume",
            "PersistentVolume",
            "",
            false,
            &["pv"],
            ColumnPrinter::new(
                &[
                    "CAPACITY",
                    "ACCESS MODES",
                    "RECLAIM POLICY",
                    "STATUS",
                    "CLAIM",
                    "STORAGECLASS",
                    "REASON",
                    "AGE",
                ],
                pv_row,
            ),
        ),
        ResourceType::builtin(
            "nodes",
            "node",
            "Node",
            "",
            false,
            &["no"],
            ColumnPrinter::new(&["STATUS", "ROLES", "AGE", "VERSION"], node_row).with_wide(
                &[
                    "INTERNAL-IP",
                    "EXTERNAL-IP",
                    "OS-IMAGE",
                    "KERNEL-VERSION",
                    "CONTAINER-RUNTIME",
                ],
                node_wide_row,
            ),
        ),
        ResourceType::builtin(
            "namespaces",
            "namespace",
            "Namespace",
            "",
            false,
            &["ns"],
            ColumnPrinter::new(&["STATUS", "AGE"], |ns, ctx| {
                vec![
                    get_string(ns, &["status", "phase"]),
                    age(extract::creation_timestamp(ns), ctx.now),
                ]
            }),
        ),
        ResourceType::builtin(
            "events",
            "event",
            "Event",
            "",
            true,
            &["ev"],
            ColumnPrinter::new(&["LAST SEEN", "TYPE", "REASON", "OBJECT", "MESSAGE"], event_row),
        ),
        ResourceType::builtin(
            "storageclasses",
            "storageclass",
            "StorageClass",
            "storage.k8s.io",
            false,
            &["sc"],
            ColumnPrinter::new(
                &[
                    "PROVISIONER",
                    "RECLAIMPOLICY",
                    "VOLUMEBINDINGMODE",
                    "ALLOWVOLUMEEXPANSION",
                    "AGE",
                ],
                storage_class_row,
            ),
        ),
    ]
}

fn map_len(value: &Value, key: &str) -> usize {
    value
        .get(key)
        .and_then(Value::as_object)
        .map(|m| m.len())
        .unwrap_or(0)
}

/// Ready and total containers, as `READY` shows them.
pub fn pod_ready(pod: &Value) -> (usize, usize) {
    let total = get_array(pod, &["spec", "containers"]).len();
    let ready = get_array(pod, &["status", "containerStatuses"])
        .iter()
        .filter(|c| get_bool(c, &["ready"]) == Some(true))
        .count();
    (ready, total)
}

pub fn pod_restarts(pod: &Value) -> i64 {
    get_array(pod, &["status", "containerStatuses"])
        .iter()
        .map(|c| get_i64(c, &["restartCount"]).unwrap_or(0))
        .sum()
}

fn terminated_reason(state: &Value, prefix: &str) -> String {
    let reason = get_string(state, &["reason"]);
    if !reason.is_empty() {
        return format!("{}{}", prefix, reason);
    }
    match get_i64(state, &["signal"]).unwrap_or(0) {
        0 => format!(
            "{}ExitCode:{}",
            prefix,
            get_i64(state, &["exitCode"]).unwrap_or(0)
        ),
        signal => format!("{}Signal:{}", prefix, signal),
    }
}

/// The STATUS column, following kubectl's pod printer.
pub fn pod_status(pod: &Value) -> String {
    let mut reason = get_str(pod, &["status", "reason"])
        .or_else(|| get_str(pod, &["status", "phase"]))
        .unwrap_or_default()
        .to_string();

    let init_total = get_array(pod, &["spec", "initContainers"]).len();
    let mut initializing = false;
    for (i, status) in get_array(pod, &["status", "initContainerStatuses"])
        .iter()
        .enumerate()
    {
        if let Some(terminated) = at(status, &["state", "terminated"]) {
            if get_i64(terminated, &["exitCode"]).unwrap_or(0) == 0 {
                continue;
            }
            reason = terminated_reason(terminated, "Init:");
        } else if let Some(waiting) = get_str(status, &["state", "waiting", "reason"])
            .filter(|r| !r.is_empty() && *r != "PodInitializing")
        {
            reason = format!("Init:{}", waiting);
        } else {
            reason = format!("Init:{}/{}", i, init_total);
        }
        initializing = true;
        break;
    }

    if !initializing {
        let mut has_running = false;
        for status in get_array(pod, &["status", "containerStatuses"]).iter().rev() {
            let waiting = get_str(status, &["state", "waiting", "reason"]).unwrap_or_default();
            let terminated = at(status, &["state", "terminated"]);
            if !waiting.is_empty() {
                reason = waiting.to_string();
            } else if let Some(terminated) = terminated {
                reason = terminated_reason(terminated, "");
            } else if get_bool(status, &["ready"]) == Some(true)
                && at(status, &["state", "running"]).is_some()
            {
                has_running = true;
            }
        }

        if reason == "Completed" && has_running {
            reason = if condition_status(pod, "Ready") == "True" {
                "Running".to_string()
            } else {
                "NotReady".to_string()
            };
        }
    }

    if at(pod, &["metadata", "deletionTimestamp"]).is_some_and(|v| !v.is_null()) {
        reason = if get_str(pod, &["status", "reason"]) == Some("NodeLost") {
            "Unknown".to_string()
        } else {
            "Terminating".to_string()
        };
    }

    reason
}

fn pod_row(pod: &Value, ctx: &RowContext) -> Vec<String> {
    let (ready, total) = pod_ready(pod);
    vec![
        format!("{}/{}", ready, total),
        pod_status(pod),
        pod_restarts(pod).to_string(),
        age(extract::creation_timestamp(pod), ctx.now),
    ]
}

fn pod_wide_row(pod: &Value, _ctx: &RowContext) -> Vec<String> {
    vec![
        or_none(get_string(pod, &["status", "podIP"])),
        or_none(get_string(pod, &["spec", "nodeName"])),
    ]
}

fn service_external_ip(svc: &Value) -> String {
    let mut ips: Vec<String> = get_array(svc, &["spec", "externalIPs"])
        .iter()
        .filter_map(|ip| ip.as_str().map(str::to_string))
        .collect();
    if get_str(svc, &["spec", "type"]) == Some("LoadBalancer") {
        ips.extend(
            get_array(svc, &["status", "loadBalancer", "ingress"])
                .iter()
                .filter_map(|i| get_str(i, &["ip"]).or_else(|| get_str(i, &["hostname"])))
                .map(str::to_string),
        );
        if ips.is_empty() {
            return "<pending>".to_string();
        }
    }
    if get_str(svc, &["spec", "type"]) == Some("ExternalName") {
        return get_string(svc, &["spec", "externalName"]);
    }
    if ips.is_empty() {
        NONE.to_string()
    } else {
        ips.join(",")
    }
}

/// `80/TCP,443:30443/TCP`
pub fn service_ports(svc: &Value) -> String {
    let ports: Vec<String> = get_array(svc, &["spec", "ports"])
        .iter()
        .map(|p| {
            let port = get_i64(p, &["port"]).unwrap_or(0);
            let protocol = get_str(p, &["protocol"]).unwrap_or("TCP");
            match get_i64(p, &["nodePort"]) {
                Some(node_port) => format!("{}:{}/{}", port, node_port, protocol),
                None => format!("{}/{}", port, protocol),
            }
        })
        .collect();
    or_none(ports.join(","))
}

fn service_row(svc: &Value, ctx: &RowContext) -> Vec<String> {
    vec![
        get_string(svc, &["spec", "type"]),
        or_none(get_string(svc, &["spec", "clusterIP"])),
        service_external_ip(svc),
        service_ports(svc),
        age(extract::creation_timestamp(svc), ctx.now),
    ]
}

/// `ReadWriteOnce` → `RWO`
pub fn access_modes(modes: &[Value]) -> String {
    modes
        .iter()
        .filter_map(Value::as_str)
        .map(|m| match m {
            "ReadWriteOnce" => "RWO",
            "ReadOnlyMany" => "ROX",
            "ReadWriteMany" => "RWX",
            "ReadWriteOncePod" => "RWOP",
            other => other,
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn pvc_row(pvc: &Value, ctx: &RowContext) -> Vec<String> {
    vec![
        get_string(pvc, &["status", "phase"]),
        get_string(pvc, &["spec", "volumeName"]),
        get_string(pvc, &["status", "capacity", "storage"]),
        access_modes(get_array(pvc, &["status", "accessModes"])),
        or_none(get_string(pvc, &["spec", "storageClassName"])),
        age(extract::creation_timestamp(pvc), ctx.now),
    ]
}

fn pv_row(pv: &Value, ctx: &RowContext) -> Vec<String> {
    let claim = match (
        get_str(pv, &["spec", "claimRef", "namespace"]),
        get_str(pv, &["spec", "claimRef", "name"]),
    ) {
        (Some(ns), Some(name)) => format!("{}/{}", ns, name),
        _ => String::new(),
    };
    vec![
        get_string(pv, &["spec", "capacity", "storage"]),
        access_modes(get_array(pv, &["spec", "accessModes"])),
        get_string(pv, &["spec", "persistentVolumeReclaimPolicy"]),
        get_string(pv, &["status", "phase"]),
        claim,
        get_string(pv, &["spec", "storageClassName"]),
        get_string(pv, &["status", "reason"]),
        age(extract::creation_timestamp(pv), ctx.now),
    ]
}

/// `Ready`, `NotReady`, plus `,SchedulingDisabled` for cordoned nodes.
pub fn node_status(node: &Value) -> String {
    let mut status = if condition_status(node, "Ready") == "True" {
        "Ready".to_string()
    } else {
        "NotReady".to_string()
    };
    if get_bool(node, &["spec", "unschedulable"]) == Some(true) {
        status.push_str(",SchedulingDisabled");
    }
    status
}

/// Roles from `node-role.kubernetes.io/<role>` labels.
pub fn node_roles(node: &Value) -> String {
    let roles: Vec<String> = extract::labels(node)
        .keys()
        .filter_map(|k| k.strip_prefix("node-role.kubernetes.io/"))
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect();
    or_none(roles.join(","))
}

fn node_address(node: &Value, kind: &str) -> String {
    get_array(node, &["status", "addresses"])
        .iter()
        .find(|a| get_str(a, &["type"]) == Some(kind))
        .map(|a| or_none(get_string(a, &["address"])))
        .unwrap_or_else(|| NONE.to_string())
}

fn node_row(node: &Value, ctx: &RowContext) -> Vec<String> {
    vec![
        node_status(node),
        node_roles(node),
        age(extract::creation_timestamp(node), ctx.now),
        get_string(node, &["status", "nodeInfo", "kubeletVersion"]),
    ]
}

fn node_wide_row(node: &Value, _ctx: &RowContext) -> Vec<String> {
    vec![
        node_address(node, "InternalIP"),
        node_address(node, "ExternalIP"),
        get_string(node, &["status", "nodeInfo", "osImage"]),
        get_string(node, &["status", "nodeInfo", "kernelVersion"]),
        get_string(node, &["status", "nodeInfo", "containerRuntimeVersion"]),
    ]
}

/// Most recent time the event was seen.
pub fn event_time(event: &Value) -> Option<DateTime<Utc>> {
    get_time(event, &["lastTimestamp"])
        .or_else(|| get_time(event, &["eventTime"]))
        .or_else(|| get_time(event, &["series", "lastObservedTime"]))
        .or_else(|| get_time(event, &["firstTimestamp"]))
        .or_else(|| extract::creation_timestamp(event))
}

/// `pod/etcd-0`
pub fn event_object(event: &Value) -> String {
    format!(
        "{}/{}",
        get_string(event, &["involvedObject", "kind"]).to_lowercase(),
        get_string(event, &["involvedObject", "name"])
    )
}

fn event_row(event: &Value, ctx: &RowContext) -> Vec<String> {
    vec![
        age(event_time(event), ctx.now),
        get_string(event, &["type"]),
        get_string(event, &["reason"]),
        event_object(event),
        get_string(event, &["message"]).trim().to_string(),
    ]
}

fn storage_class_row(sc: &Value, ctx: &RowContext) -> Vec<String> {
    let expansion = get_bool(sc, &["allowVolumeExpansion"]).unwrap_or(false);
    vec![
        get_string(sc, &["provisioner"]),
        get_str(sc, &["reclaimPolicy"]).unwrap_or("Delete").to_string(),
        get_str(sc, &["volumeBindingMode"])
            .unwrap_or("Immediate")
            .to_string(),
        expansion.to_string(),
        age(extract::creation_timestamp(sc), ctx.now),
    ]
}
