//! A small must-gather built in a temp directory.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn mg(&self) -> PathBuf {
        self.dir.path().join("must-gather")
    }

    pub fn config(&self) -> PathBuf {
        self.dir.path().join("omc.toml")
    }

    /// `omc --config <tmp>/omc.toml --mg <tmp>/must-gather`
    pub fn omc(&self) -> Command {
        let mut cmd = self.omc_without_mg();
        cmd.arg("--mg").arg(self.mg());
        cmd
    }

    /// `omc --config <tmp>/omc.toml`, relying on the selected context
    pub fn omc_without_mg(&self) -> Command {
        let mut cmd = Command::cargo_bin("omc").unwrap();
        cmd.env_remove("OMC_MUST_GATHER")
            .env("NO_COLOR", "1")
            .arg("--config")
            .arg(self.config());
        cmd
    }
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

const PODS: &str = r#"
apiVersion: v1
kind: PodList
items:
- apiVersion: v1
  kind: Pod
  metadata:
    name: etcd-0
    namespace: openshift-etcd
    creationTimestamp: "2023-05-10T10:00:00Z"
    labels:
      app: etcd
  spec:
    nodeName: master-0
    containers:
    - name: etcd
      image: quay.io/openshift/etcd
    - name: etcd-metrics
      image: quay.io/openshift/etcd
  status:
    phase: Running
    podIP: 10.0.0.5
    containerStatuses:
    - name: etcd
      ready: true
      restartCount: 2
      state:
        running:
          startedAt: "2023-05-10T10:01:00Z"
    - name: etcd-metrics
      ready: true
      restartCount: 0
      state:
        running:
          startedAt: "2023-05-10T10:01:00Z"
- apiVersion: v1
  kind: Pod
  metadata:
    name: installer-3
    namespace: openshift-etcd
    creationTimestamp: "2023-05-10T09:00:00Z"
    labels:
      app: installer
  spec:
    containers:
    - name: installer
      image: quay.io/openshift/installer
  status:
    phase: Succeeded
    containerStatuses:
    - name: installer
      ready: false
      restartCount: 0
      state:
        terminated:
          exitCode: 0
          reason: Completed
"#;

const EVENTS: &str = r#"
apiVersion: v1
kind: EventList
items:
- apiVersion: v1
  kind: Event
  metadata:
    name: etcd-0.1
    namespace: openshift-etcd
  type: Warning
  reason: BackOff
  message: Back-off restarting failed container
  lastTimestamp: "2023-05-10T11:00:00Z"
  involvedObject:
    kind: Pod
    name: etcd-0
    namespace: openshift-etcd
- apiVersion: v1
  kind: Event
  metadata:
    name: installer-3.1
    namespace: openshift-etcd
  type: Normal
  reason: Started
  message: Started container installer
  lastTimestamp: "2023-05-10T09:30:00Z"
  involvedObject:
    kind: Pod
    name: installer-3
    namespace: openshift-etcd
"#;

const CRD: &str = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: widgets.example.com
spec:
  group: example.com
  scope: Namespaced
  names:
    plural: widgets
    singular: widget
    kind: Widget
    shortNames: [wd]
  versions:
  - name: v1
    served: true
    storage: true
    additionalPrinterColumns:
    - name: Color
      type: string
      jsonPath: .spec.color
    - name: Size
      type: integer
      jsonPath: .spec.size
      priority: 1
"#;

const WIDGETS: &str = r#"
apiVersion: example.com/v1
kind: WidgetList
items:
- apiVersion: example.com/v1
  kind: Widget
  metadata:
    name: blue-widget
    namespace: openshift-etcd
  spec:
    color: blue
    size: 3
"#;

const ETCD_LOG: &str = "\
2023-05-10T10:01:00.000000000Z stderr F starting etcd
2023-05-10T10:30:00.000000000Z stderr F elected leader
2023-05-10T11:00:00.000000000Z stderr F ready to serve client requests
";

const MEMBERS: &str = r#"{
  "header": {"cluster_id": 1, "member_id": 2, "raft_term": 3},
  "members": [
    {"ID": 12713865232339946761, "name": "master-0", "peerURLs": ["https://10.0.0.5:2380"], "clientURLs": ["https://10.0.0.5:2379"]}
  ]
}"#;

const HEALTH: &str = r#"[
  {"endpoint": "https://10.0.0.5:2379", "health": true, "took": "9.5ms"}
]"#;

const RULES: &str = r#"{
  "status": "success",
  "data": {
    "groups": [
      {
        "name": "etcd",
        "file": "/etc/prometheus/rules/etcd.yaml",
        "interval": 30,
        "rules": [
          {"name": "etcdMembersDown", "type": "alerting", "state": "firing", "labels": {"severity": "critical"}, "alerts": [{"state": "firing"}]},
          {"name": "etcdHighFsyncDurations", "type": "alerting", "state": "inactive", "labels": {"severity": "warning"}, "alerts": []},
          {"name": "instance:etcd:rate", "type": "recording"}
        ]
      }
    ]
  }
}"#;

const HAPROXY: &str = "\
global
  maxconn 20000

backend openshift_default
  mode http

backend be_http:openshift-etcd:metrics
  mode http
  server pod:etcd-0:etcd:metrics:10.0.0.5:9979 10.0.0.5:9979 cookie abc weight 1

frontend public
  bind :80
";

const NODE: &str = r#"
apiVersion: v1
kind: Node
metadata:
  name: master-0
  labels:
    node-role.kubernetes.io/master: ""
status:
  conditions:
  - type: Ready
    status: "True"
    reason: KubeletReady
"#;

const NODE_EVENTS: &str = r#"
apiVersion: v1
kind: EventList
items:
- apiVersion: v1
  kind: Event
  metadata:
    name: master-0.1
    namespace: default
  type: Normal
  reason: NodeReady
  message: Node master-0 status is now NodeReady
  lastTimestamp: "2023-05-10T10:00:00Z"
  involvedObject:
    kind: Node
    name: master-0
"#;

/// Build the fixture must-gather.
pub fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let mg = dir.path().join("must-gather");

    write(&mg, "timestamp", "2023-05-10 12:00:00.000000 +0000 UTC m=+0.1\n");
    write(
        &mg,
        "namespaces/openshift-etcd/openshift-etcd.yaml",
        "apiVersion: v1\nkind: Namespace\nmetadata:\n  name: openshift-etcd\n",
    );
    write(
        &mg,
        "namespaces/default/default.yaml",
        "apiVersion: v1\nkind: Namespace\nmetadata:\n  name: default\n",
    );
    write(&mg, "namespaces/openshift-etcd/core/pods.yaml", PODS);
    write(&mg, "namespaces/openshift-etcd/core/events.yaml", EVENTS);
    write(&mg, "namespaces/default/core/events.yaml", NODE_EVENTS);
    write(&mg, "cluster-scoped-resources/core/nodes/master-0.yaml", NODE);
    write(&mg, "namespaces/openshift-etcd/example.com/widgets.yaml", WIDGETS);
    write(
        &mg,
        "cluster-scoped-resources/apiextensions.k8s.io/customresourcedefinitions/widgets.example.com.yaml",
        CRD,
    );
    write(
        &mg,
        "namespaces/openshift-etcd/pods/etcd-0/etcd/etcd/logs/current.log",
        ETCD_LOG,
    );
    write(
        &mg,
        "host_service_logs/masters/kubelet_service.log",
        "May 10 10:00:00 master-0 kubelet[1]: starting kubelet\nMay 10 10:00:01 master-0 kubelet[1]: node ready\n",
    );
    write(&mg, "etcd_info/member_list.json", MEMBERS);
    write(&mg, "etcd_info/endpoint_health.json", HEALTH);
    write(&mg, "monitoring/prometheus/rules.json", RULES);
    write(
        &mg,
        "ingress_controllers/default/router-default-abc/haproxy.config",
        HAPROXY,
    );
    write(
        &mg,
        "cluster-scoped-resources/config.openshift.io/infrastructures/cluster.yaml",
        "apiVersion: config.openshift.io/v1\nkind: Infrastructure\nmetadata:\n  name: cluster\nstatus:\n  apiServerURL: https://api.example.com:6443\n  platformStatus:\n    type: AWS\n",
    );

    Fixture { dir }
}
