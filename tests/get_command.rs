mod common;

use common::fixture;
use predicates::prelude::*;
use predicates::str::{contains, is_match};

#[test]
fn get_pods_in_namespace() {
    let fx = fixture();
    fx.omc()
        .args(["get", "pods", "-n", "openshift-etcd"])
        .assert()
        .success()
        .stdout(is_match(r"(?m)^NAME\s+READY\s+STATUS\s+RESTARTS\s+AGE$").unwrap())
        .stdout(is_match(r"(?m)^etcd-0\s+2/2\s+Running\s+2\s+2h$").unwrap())
        .stdout(is_match(r"(?m)^installer-3\s+0/1\s+Completed\s+0\s+3h$").unwrap());
}

#[test]
fn get_pods_all_namespaces_adds_namespace_column() {
    let fx = fixture();
    fx.omc()
        .args(["get", "po", "-A", "--no-headers"])
        .assert()
        .success()
        .stdout(is_match(r"(?m)^openshift-etcd\s+etcd-0\s+2/2").unwrap())
        .stdout(contains("NAME").not());
}

#[test]
fn get_with_label_selector_and_labels() {
    let fx = fixture();
    fx.omc()
        .args(["get", "pods", "-n", "openshift-etcd", "-l", "app=etcd", "--show-labels"])
        .assert()
        .success()
        .stdout(contains("LABELS"))
        .stdout(contains("app=etcd"))
        .stdout(contains("installer-3").not());
}

#[test]
fn get_single_pod_as_json_prints_the_object() {
    let fx = fixture();
    let output = fx
        .omc()
        .args(["get", "pod/etcd-0", "-n", "openshift-etcd", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["kind"], "Pod");
    assert_eq!(value["metadata"]["name"], "etcd-0");
}

#[test]
fn get_pods_as_yaml_prints_a_list() {
    let fx = fixture();
    fx.omc()
        .args(["get", "pods", "-n", "openshift-etcd", "-o", "yaml"])
        .assert()
        .success()
        .stdout(contains("kind: List"))
        .stdout(contains("name: installer-3"));
}

#[test]
fn get_pods_jsonpath_and_name() {
    let fx = fixture();
    fx.omc()
        .args([
            "get",
            "pods",
            "-n",
            "openshift-etcd",
            "-o",
            "jsonpath={.items[*].metadata.name}",
        ])
        .assert()
        .success()
        .stdout("etcd-0 installer-3\n");

    fx.omc()
        .args(["get", "pods", "-n", "openshift-etcd", "-o", "name"])
        .assert()
        .success()
        .stdout("pod/etcd-0\npod/installer-3\n");
}

#[test]
fn get_custom_resource_uses_printer_columns() {
    let fx = fixture();
    fx.omc()
        .args(["get", "widgets", "-n", "openshift-etcd"])
        .assert()
        .success()
        .stdout(is_match(r"(?m)^NAME\s+COLOR$").unwrap())
        .stdout(is_match(r"(?m)^blue-widget\s+blue$").unwrap());

    fx.omc()
        .args(["get", "wd", "-n", "openshift-etcd", "-o", "wide"])
        .assert()
        .success()
        .stdout(is_match(r"(?m)^blue-widget\s+blue\s+3$").unwrap());
}

#[test]
fn get_empty_namespace_reports_no_resources() {
    let fx = fixture();
    fx.omc()
        .args(["get", "pods"])
        .assert()
        .success()
        .stdout("")
        .stderr(contains("No resources found in default namespace."));
}

#[test]
fn get_empty_namespace_as_json_prints_empty_list() {
    let fx = fixture();
    fx.omc()
        .args(["get", "pods", "-o", "json"])
        .assert()
        .success()
        .stdout(contains("\"kind\": \"List\"").and(contains("\"items\": []")))
        .stderr(contains("No resources found").not());
}

#[test]
fn events_without_matches_as_yaml_prints_empty_list() {
    let fx = fixture();
    fx.omc()
        .args(["events", "--reason", "BackOff", "-o", "yaml"])
        .assert()
        .success()
        .stdout(contains("kind: List").and(contains("items: []")))
        .stderr(contains("No resources found").not());
}

#[test]
fn get_unknown_type_fails() {
    let fx = fixture();
    fx.omc()
        .args(["get", "gizmos"])
        .assert()
        .failure()
        .stderr(contains("the server doesn't have a resource type \"gizmos\""));
}

#[test]
fn get_missing_object_fails() {
    let fx = fixture();
    fx.omc()
        .args(["get", "pods", "nope", "-n", "openshift-etcd"])
        .assert()
        .failure()
        .stderr(contains("pods \"nope\" not found in namespace openshift-etcd"));
}

#[test]
fn describe_pod_includes_events() {
    let fx = fixture();
    fx.omc()
        .args(["describe", "pod", "etcd-0", "-n", "openshift-etcd"])
        .assert()
        .success()
        .stdout(is_match(r"(?m)^Name:\s+etcd-0$").unwrap())
        .stdout(is_match(r"(?m)^Namespace:\s+openshift-etcd$").unwrap())
        .stdout(contains("Events:"))
        .stdout(contains("BackOff"))
        .stdout(contains("Started container installer").not());
}

#[test]
fn describe_node_includes_events_from_default_namespace() {
    let fx = fixture();
    fx.omc()
        .args(["describe", "node", "master-0"])
        .assert()
        .success()
        .stdout(is_match(r"(?m)^Roles:\s+master$").unwrap())
        .stdout(contains("NodeReady"))
        .stdout(contains("Events:             <none>").not());
}

#[test]
fn events_are_sorted_and_filtered() {
    let fx = fixture();
    let output = fx
        .omc()
        .args(["events", "-n", "openshift-etcd"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let started = stdout.find("Started").unwrap();
    let backoff = stdout.find("BackOff").unwrap();
    assert!(started < backoff);

    fx.omc()
        .args(["events", "-n", "openshift-etcd", "--type", "warning"])
        .assert()
        .success()
        .stdout(contains("BackOff"))
        .stdout(contains("Started").not());

    fx.omc()
        .args(["events", "-n", "openshift-etcd", "--for", "pod/installer-3"])
        .assert()
        .success()
        .stdout(contains("pod/installer-3"))
        .stdout(contains("BackOff").not());
}
