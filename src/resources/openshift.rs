//! OpenShift kinds: routes, cluster operators, machine config, machines, deployment configs.

use super::extract::{
    self, condition_status, find_condition, get_array, get_bool, get_i64, get_str,
    get_string, get_time,
};
use super::{ColumnPrinter, ResourceType, RowContext};
use crate::formatter::age::age;
use serde_json::Value;

pub fn kinds() -> Vec<ResourceType> {
    vec![
        ResourceType::builtin(
            "routes",
            "route",
            "Route",
            "route.openshift.io",
            true,
            &[],
            ColumnPrinter::new(
                &["HOST/PORT", "PATH", "SERVICES", "PORT", "TERMINATION", "WILDCARD"],
                route_row,
            ),
        ),
        ResourceType::builtin(
            "clusteroperators",
            "clusteroperator",
            "ClusterOperator",
            "config.openshift.io",
            false,
            &["co"],
            ColumnPrinter::new(
                &["VERSION", "AVAILABLE", "PROGRESSING", "DEGRADED", "SINCE"],
                cluster_operator_row,
            )
            .with_wide(&["MESSAGE"], |co, _| {
                let message = find_condition(co, "Degraded")
                    .filter(|c| get_str(c, &["status"]) == Some("True"))
                    .or_else(|| find_condition(co, "Progressing"))
                    .map(|c| get_string(c, &["message"]))
                    .unwrap_or_default();
                vec![first_line(&message)]
            }),
        ),
        ResourceType::builtin(
            "clusterversions",
            "clusterversion",
            "ClusterVersion",
            "config.openshift.io",
            false,
            &[],
            ColumnPrinter::new(
                &["VERSION", "AVAILABLE", "PROGRESSING", "SINCE", "STATUS"],
                cluster_version_row,
            ),
        ),
        ResourceType::builtin(
            "machineconfigpools",
            "machineconfigpool",
            "MachineConfigPool",
            "machineconfiguration.openshift.io",
            false,
            &["mcp"],
            ColumnPrinter::new(
                &[
                    "CONFIG",
                    "UPDATED",
                    "UPDATING",
                    "DEGRADED",
                    "MACHINECOUNT",
                    "READYMACHINECOUNT",
                    "UPDATEDMACHINECOUNT",
                    "DEGRADEDMACHINECOUNT",
                    "AGE",
                ],
                machine_config_pool_row,
            ),
        ),
        ResourceType::builtin(
            "machineconfigs",
            "machineconfig",
            "MachineConfig",
            "machineconfiguration.openshift.io",
            false,
            &["mc"],
            ColumnPrinter::new(
                &["GENERATEDBYCONTROLLER", "IGNITIONVERSION", "AGE"],
                |mc, ctx| {
                    vec![
                        extract::get_string_map(mc, &["metadata", "annotations"])
                            .get("machineconfiguration.openshift.io/generated-by-controller-version")
                            .cloned()
                            .unwrap_or_default(),
                        get_string(mc, &["spec", "config", "ignition", "version"]),
                        age(extract::creation_timestamp(mc), ctx.now),
                    ]
                },
            ),
        ),
        ResourceType::builtin(
            "machines",
            "machine",
            "Machine",
            "machine.openshift.io",
            true,
            &[],
            ColumnPrinter::new(&["PHASE", "TYPE", "REGION", "ZONE", "AGE"], machine_row)
                .with_wide(&["NODE", "PROVIDERID", "STATE"], |m, _| {
                    vec![
                        get_string(m, &["status", "nodeRef", "name"]),
                        get_string(m, &["spec", "providerID"]),
                        extract::get_string_map(m, &["metadata", "annotations"])
                            .get("machine.openshift.io/instance-state")
                            .cloned()
                            .unwrap_or_default(),
                    ]
                }),
        ),
        ResourceType::builtin(
            "deploymentconfigs",
            "deploymentconfig",
            "DeploymentConfig",
            "apps.openshift.io",
            true,
            &["dc"],
            ColumnPrinter::new(
                &["REVISION", "DESIRED", "CURRENT", "TRIGGERED BY", "AGE"],
                deployment_config_row,
            ),
        ),
    ]
}

fn first_line(s: &str) -> String {
    s.lines().next().unwrap_or_default().to_string()
}

fn route_row(route: &Value, _ctx: &RowContext) -> Vec<String> {
    let mut host = get_string(route, &["spec", "host"]);
    if let Some(port) = at_port(route) {
        host = format!("{}:{}", host, port);
    }
    let mut services = vec![get_string(route, &["spec", "to", "name"])];
    services.extend(
        get_array(route, &["spec", "alternateBackends"])
            .iter()
            .map(|b| get_string(b, &["name"])),
    );
    services.retain(|s| !s.is_empty());

    let termination = match (
        get_str(route, &["spec", "tls", "termination"]),
        get_str(route, &["spec", "tls", "insecureEdgeTerminationPolicy"]),
    ) {
        (Some(t), Some(policy)) if !policy.is_empty() => format!("{}/{}", t, policy),
        (Some(t), _) => t.to_string(),
        (None, _) => String::new(),
    };

    vec![
        host,
        get_string(route, &["spec", "path"]),
        services.join(","),
        at_port(route).unwrap_or_else(|| "<all>".to_string()),
        termination,
        get_str(route, &["spec", "wildcardPolicy"])
            .unwrap_or("None")
            .to_string(),
    ]
}

/// `spec.port.targetPort`, which may be a name or a number.
fn at_port(route: &Value) -> Option<String> {
    match extract::at(route, &["spec", "port", "targetPort"])? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Age of the most recent condition transition.
fn since(value: &Value, ctx: &RowContext) -> String {
    let latest = get_array(value, &["status", "conditions"])
        .iter()
        .filter_map(|c| get_time(c, &["lastTransitionTime"]))
        .max();
    match latest {
        Some(t) => age(Some(t), ctx.now),
        None => String::new(),
    }
}

fn operator_version(co: &Value) -> String {
    get_array(co, &["status", "versions"])
        .iter()
        .find(|v| get_str(v, &["name"]) == Some("operator"))
        .map(|v| get_string(v, &["version"]))
        .unwrap_or_default()
}

fn cluster_operator_row(co: &Value, ctx: &RowContext) -> Vec<String> {
    vec![
        operator_version(co),
        condition_status(co, "Available"),
        condition_status(co, "Progressing"),
        condition_status(co, "Degraded"),
        since(co, ctx),
    ]
}

/// The completed version from `status.history`, or the desired one.
pub fn cluster_version(cv: &Value) -> String {
    get_array(cv, &["status", "history"])
        .iter()
        .find(|h| get_str(h, &["state"]) == Some("Completed"))
        .map(|h| get_string(h, &["version"]))
        .unwrap_or_else(|| get_string(cv, &["status", "desired", "version"]))
}

fn cluster_version_row(cv: &Value, ctx: &RowContext) -> Vec<String> {
    let status = find_condition(cv, "Failing")
        .filter(|c| get_str(c, &["status"]) == Some("True"))
        .or_else(|| find_condition(cv, "Progressing"))
        .map(|c| first_line(&get_string(c, &["message"])))
        .unwrap_or_default();
    vec![
        cluster_version(cv),
        condition_status(cv, "Available"),
        condition_status(cv, "Progressing"),
        since(cv, ctx),
        status,
    ]
}

fn machine_config_pool_row(mcp: &Value, ctx: &RowContext) -> Vec<String> {
    vec![
        get_string(mcp, &["status", "configuration", "name"]),
        condition_status(mcp, "Updated"),
        condition_status(mcp, "Updating"),
        condition_status(mcp, "Degraded"),
        extract::count(mcp, &["status", "machineCount"]),
        extract::count(mcp, &["status", "readyMachineCount"]),
        extract::count(mcp, &["status", "updatedMachineCount"]),
        extract::count(mcp, &["status", "degradedMachineCount"]),
        age(extract::creation_timestamp(mcp), ctx.now),
    ]
}

fn machine_row(machine: &Value, ctx: &RowContext) -> Vec<String> {
    let labels = extract::labels(machine);
    let label = |key: &str| labels.get(key).cloned().unwrap_or_default();
    vec![
        get_string(machine, &["status", "phase"]),
        label("machine.openshift.io/instance-type"),
        label("machine.openshift.io/region"),
        label("machine.openshift.io/zone"),
        age(extract::creation_timestamp(machine), ctx.now),
    ]
}

fn deployment_config_row(dc: &Value, ctx: &RowContext) -> Vec<String> {
    let triggers: Vec<String> = get_array(dc, &["spec", "triggers"])
        .iter()
        .filter_map(|t| match get_str(t, &["type"])? {
            "ConfigChange" => Some("config".to_string()),
            "ImageChange" => {
                let name = get_string(t, &["imageChangeParams", "from", "name"]);
                let containers: Vec<&str> =
                    get_array(t, &["imageChangeParams", "containerNames"])
                        .iter()
                        .filter_map(Value::as_str)
                        .collect();
                if containers.is_empty() {
                    Some(format!("image({})", name))
                } else {
                    Some(format!("image({}:{})", containers.join(","), name))
                }
            }
            other => Some(other.to_lowercase()),
        })
        .collect();
    let paused = get_bool(dc, &["spec", "paused"]).unwrap_or(false);
    let revision = get_i64(dc, &["status", "latestVersion"]).unwrap_or(0);
    vec![
        if paused {
            format!("{} (paused)", revision)
        } else {
            revision.to_string()
        },
        get_i64(dc, &["spec", "replicas"]).unwrap_or(0).to_string(),
        extract::count(dc, &["status", "replicas"]),
        if triggers.is_empty() {
            "manual".to_string()
        } else {
            triggers.join(",")
        },
        age(extract::creation_timestamp(dc), ctx.now),
    ]
}
