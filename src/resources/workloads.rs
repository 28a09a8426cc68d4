//! Workload controllers: deployments, replica sets, daemon sets, stateful sets, jobs.

use super::extract::{
    self, NONE, count, format_map, get_array, get_bool, get_i64, get_str, get_string,
    get_string_map, get_time, or_none,
};
use super::{ColumnPrinter, ResourceType, RowContext};
use crate::formatter::age::{age, human_duration};
use serde_json::Value;

const WIDE_HEADERS: &[&str] = &["CONTAINERS", "IMAGES", "SELECTOR"];

pub fn kinds() -> Vec<ResourceType> {
    vec![
        ResourceType::builtin(
            "deployments",
            "deployment",
            "Deployment",
            "apps",
            true,
            &["deploy"],
            ColumnPrinter::new(&["READY", "UP-TO-DATE", "AVAILABLE", "AGE"], deployment_row)
                .with_wide(WIDE_HEADERS, template_wide_row),
        ),
        ResourceType::builtin(
            "replicasets",
            "replicaset",
            "ReplicaSet",
            "apps",
            true,
            &["rs"],
            ColumnPrinter::new(&["DESIRED", "CURRENT", "READY", "AGE"], |rs, ctx| {
                vec![
                    desired_replicas(rs).to_string(),
                    count(rs, &["status", "replicas"]),
                    count(rs, &["status", "readyReplicas"]),
                    age(extract::creation_timestamp(rs), ctx.now),
                ]
            })
            .with_wide(WIDE_HEADERS, template_wide_row),
        ),
        ResourceType::builtin(
            "daemonsets",
            "daemonset",
            "DaemonSet",
            "apps",
            true,
            &["ds"],
            ColumnPrinter::new(
                &[
                    "DESIRED",
                    "CURRENT",
                    "READY",
                    "UP-TO-DATE",
                    "AVAILABLE",
                    "NODE SELECTOR",
                    "AGE",
                ],
                daemonset_row,
            )
            .with_wide(WIDE_HEADERS, template_wide_row),
        ),
        ResourceType::builtin(
            "statefulsets",
            "statefulset",
            "StatefulSet",
            "apps",
            true,
            &["sts"],
            ColumnPrinter::new(&["READY", "AGE"], |sts, ctx| {
                vec![
                    format!(
                        "{}/{}",
                        get_i64(sts, &["status", "readyReplicas"]).unwrap_or(0),
                        desired_replicas(sts)
                    ),
                    age(extract::creation_timestamp(sts), ctx.now),
                ]
            })
            .with_wide(&["CONTAINERS", "IMAGES"], |sts, ctx| {
                let mut row = template_wide_row(sts, ctx);
                row.pop();
                row
            }),
        ),
        ResourceType::builtin(
            "jobs",
            "job",
            "Job",
            "batch",
            true,
            &[],
            ColumnPrinter::new(&["COMPLETIONS", "DURATION", "AGE"], job_row)
                .with_wide(WIDE_HEADERS, template_wide_row),
        ),
        ResourceType::builtin(
            "cronjobs",
            "cronjob",
            "CronJob",
            "batch",
            true,
            &["cj"],
            ColumnPrinter::new(
                &["SCHEDULE", "SUSPEND", "ACTIVE", "LAST SCHEDULE", "AGE"],
                cronjob_row,
            ),
        ),
    ]
}

/// `spec.replicas`, defaulted to 1 like the API server does.
pub fn desired_replicas(value: &Value) -> i64 {
    get_i64(value, &["spec", "replicas"]).unwrap_or(1)
}

fn deployment_row(deploy: &Value, ctx: &RowContext) -> Vec<String> {
    vec![
        format!(
            "{}/{}",
            get_i64(deploy, &["status", "readyReplicas"]).unwrap_or(0),
            desired_replicas(deploy)
        ),
        count(deploy, &["status", "updatedReplicas"]),
        count(deploy, &["status", "availableReplicas"]),
        age(extract::creation_timestamp(deploy), ctx.now),
    ]
}

/// CONTAINERS, IMAGES and SELECTOR from a pod template.
fn template_wide_row(value: &Value, _ctx: &RowContext) -> Vec<String> {
    let containers = get_array(value, &["spec", "template", "spec", "containers"]);
    let names: Vec<&str> = containers
        .iter()
        .filter_map(|c| get_str(c, &["name"]))
        .collect();
    let images: Vec<&str> = containers
        .iter()
        .filter_map(|c| get_str(c, &["image"]))
        .collect();
    vec![
        or_none(names.join(",")),
        or_none(images.join(",")),
        format_map(&get_string_map(value, &["spec", "selector", "matchLabels"])),
    ]
}

fn daemonset_row(ds: &Value, ctx: &RowContext) -> Vec<String> {
    vec![
        count(ds, &["status", "desiredNumberScheduled"]),
        count(ds, &["status", "currentNumberScheduled"]),
        count(ds, &["status", "numberReady"]),
        count(ds, &["status", "updatedNumberScheduled"]),
        count(ds, &["status", "numberAvailable"]),
        format_map(&get_string_map(
            ds,
            &["spec", "template", "spec", "nodeSelector"],
        )),
        age(extract::creation_timestamp(ds), ctx.now),
    ]
}

fn job_row(job: &Value, ctx: &RowContext) -> Vec<String> {
    let completions = match get_i64(job, &["spec", "completions"]) {
        Some(c) => format!("{}/{}", get_i64(job, &["status", "succeeded"]).unwrap_or(0), c),
        None => format!("{}/1", get_i64(job, &["status", "succeeded"]).unwrap_or(0)),
    };
    let duration = match (
        get_time(job, &["status", "startTime"]),
        get_time(job, &["status", "completionTime"]),
    ) {
        (Some(start), Some(end)) => human_duration(end - start),
        (Some(start), None) => human_duration(ctx.now - start),
        _ => String::new(),
    };
    vec![
        completions,
        duration,
        age(extract::creation_timestamp(job), ctx.now),
    ]
}

fn cronjob_row(cj: &Value, ctx: &RowContext) -> Vec<String> {
    let last = match get_time(cj, &["status", "lastScheduleTime"]) {
        Some(t) => age(Some(t), ctx.now),
        None => NONE.to_string(),
    };
    vec![
        get_string(cj, &["spec", "schedule"]),
        extract::title_bool(get_bool(cj, &["spec", "suspend"]).unwrap_or(false)),
        get_array(cj, &["status", "active"]).len().to_string(),
        last,
        age(extract::creation_timestamp(cj), ctx.now),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn ctx() -> RowContext {
        RowContext {
            now: Utc.with_ymd_and_hms(2023, 5, 10, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_deployment_row() {
        let deploy = json!({
            "metadata": {"name": "router-default", "creationTimestamp": "2023-05-10T10:00:00Z"},
            "spec": {
                "replicas": 2,
                "selector": {"matchLabels": {"app": "router"}},
                "template": {"spec": {"containers": [{"name": "router", "image": "quay.io/router:1"}]}}
            },
            "status": {"readyReplicas": 1, "updatedReplicas": 2, "availableReplicas": 1}
        });
        assert_eq!(deployment_row(&deploy, &ctx()), vec!["1/2", "2", "1", "120m"]);
        assert_eq!(
            template_wide_row(&deploy, &ctx()),
            vec!["router", "quay.io/router:1", "app=router"]
        );
    }

    #[test]
    fn test_job_row() {
        let job = json!({
            "spec": {"completions": 1},
            "status": {
                "succeeded": 1,
                "startTime": "2023-05-10T11:00:00Z",
                "completionTime": "2023-05-10T11:00:42Z"
            }
        });
        let row = job_row(&job, &ctx());
        assert_eq!(row[0], "1/1");
        assert_eq!(row[1], "42s");
    }

    #[test]
    fn test_cronjob_row() {
        let cj = json!({
            "spec": {"schedule": "*/15 * * * *"},
            "status": {"active": [{"name": "x"}], "lastScheduleTime": "2023-05-10T11:45:00Z"}
        });
        let row = cronjob_row(&cj, &ctx());
        assert_eq!(row[..4], ["*/15 * * * *", "False", "1", "15m"]);
    }
}
