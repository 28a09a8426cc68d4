mod common;

use common::fixture;
use predicates::prelude::*;
use predicates::str::{contains, is_match};

#[test]
fn etcd_members_render_hex_ids() {
    let fx = fixture();
    fx.omc()
        .args(["etcd", "members"])
        .assert()
        .success()
        .stdout(is_match(r"(?m)^b070b9115fcfcd09\s+started\s+master-0\s+https://10.0.0.5:2380").unwrap());
}

#[test]
fn etcd_health_and_missing_status() {
    let fx = fixture();
    fx.omc()
        .args(["etcd", "health"])
        .assert()
        .success()
        .stdout(is_match(r"(?m)^https://10.0.0.5:2379\s+true\s+9.5ms").unwrap());

    fx.omc()
        .args(["etcd", "status"])
        .assert()
        .failure()
        .stderr(contains("endpoint_status.json"));
}

#[test]
fn alert_rules_filter_by_state() {
    let fx = fixture();
    fx.omc()
        .args(["alert", "rules"])
        .assert()
        .success()
        .stdout(contains("etcdMembersDown"))
        .stdout(contains("etcdHighFsyncDurations"))
        .stdout(contains("instance:etcd:rate").not());

    fx.omc()
        .args(["alert", "rules", "-s", "firing"])
        .assert()
        .success()
        .stdout(is_match(r"(?m)^etcd\s+etcdMembersDown\s+firing\s+critical\s+1$").unwrap())
        .stdout(contains("etcdHighFsyncDurations").not());
}

#[test]
fn alert_rules_as_json() {
    let fx = fixture();
    let output = fx
        .omc()
        .args(["alert", "rules", "-s", "firing", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["name"], "etcdMembersDown");
    assert_eq!(value[0]["type"], "alerting");
}

#[test]
fn alert_groups_count_states() {
    let fx = fixture();
    fx.omc()
        .args(["alert", "groups"])
        .assert()
        .success()
        .stdout(is_match(r"(?m)^etcd\s+3\s+1\s+0\s+30s$").unwrap());
}

#[test]
fn haproxy_backends() {
    let fx = fixture();
    fx.omc()
        .args(["haproxy", "backends", "-A"])
        .assert()
        .success()
        .stdout(
            is_match(r"(?m)^openshift-etcd\s+metrics\s+default\s+etcd\s+metrics\s+http$").unwrap(),
        )
        .stdout(contains("openshift_default").not());

    fx.omc()
        .args(["haproxy", "backends", "-n", "default"])
        .assert()
        .success()
        .stderr(contains("No resources found"));
}
