//! Where things live inside a must-gather.

use std::path::{Path, PathBuf};

pub const NAMESPACES_DIR: &str = "namespaces";
pub const CLUSTER_SCOPED_DIR: &str = "cluster-scoped-resources";
pub const CORE_GROUP: &str = "core";

/// Layout tells where a specific thing should live
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Layout {
        Layout { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one subdirectory per namespace
    pub fn namespaces_dir(&self) -> PathBuf {
        self.root.join(NAMESPACES_DIR)
    }

    pub fn namespace_dir(&self, namespace: &str) -> PathBuf {
        self.namespaces_dir().join(namespace)
    }

    /// The Namespace object itself
    pub fn namespace_manifest(&self, namespace: &str) -> PathBuf {
        self.namespace_dir(namespace)
            .join(format!("{}.yaml", namespace))
    }

    /// `namespaces/<ns>/<group>/<plural>.yaml`
    pub fn namespaced_list(&self, namespace: &str, group: &str, plural: &str) -> PathBuf {
        self.namespace_dir(namespace)
            .join(group_dir(group))
            .join(format!("{}.yaml", plural))
    }

    /// `namespaces/<ns>/<group>/<plural>/`
    pub fn namespaced_objects(&self, namespace: &str, group: &str, plural: &str) -> PathBuf {
        self.namespace_dir(namespace).join(group_dir(group)).join(plural)
    }

    /// `cluster-scoped-resources/<group>/<plural>.yaml`
    pub fn cluster_list(&self, group: &str, plural: &str) -> PathBuf {
        self.root
            .join(CLUSTER_SCOPED_DIR)
            .join(group_dir(group))
            .join(format!("{}.yaml", plural))
    }

    /// `cluster-scoped-resources/<group>/<plural>/`
    pub fn cluster_objects(&self, group: &str, plural: &str) -> PathBuf {
        self.root
            .join(CLUSTER_SCOPED_DIR)
            .join(group_dir(group))
            .join(plural)
    }

    /// `namespaces/<ns>/pods/` - one directory per pod
    pub fn pods_dir(&self, namespace: &str) -> PathBuf {
        self.namespace_dir(namespace).join("pods")
    }

    pub fn pod_dir(&self, namespace: &str, pod: &str) -> PathBuf {
        self.pods_dir(namespace).join(pod)
    }

    pub fn container_log(
        &self,
        namespace: &str,
        pod: &str,
        container: &str,
        kind: LogsKind,
    ) -> PathBuf {
        self.pod_dir(namespace, pod)
            .join(container)
            .join(container)
            .join("logs")
            .join(kind.file_name())
    }

    pub fn host_service_logs_dir(&self) -> PathBuf {
        self.root.join("host_service_logs")
    }

    pub fn host_service_log(&self, role: &str, service: &str) -> PathBuf {
        self.host_service_logs_dir()
            .join(role)
            .join(format!("{}_service.log", service))
    }

    pub fn etcd_snapshot(&self, file: &str) -> PathBuf {
        self.root.join("etcd_info").join(file)
    }

    pub fn prometheus_rules(&self) -> PathBuf {
        self.root
            .join("monitoring")
            .join("prometheus")
            .join("rules.json")
    }

    /// Glob matching every router's haproxy.config
    pub fn haproxy_configs_pattern(&self) -> String {
        self.root
            .join("ingress_controllers")
            .join("*")
            .join("*")
            .join("haproxy.config")
            .to_string_lossy()
            .into_owned()
    }

    pub fn crd_dir(&self) -> PathBuf {
        self.cluster_objects("apiextensions.k8s.io", "customresourcedefinitions")
    }

    pub fn timestamp_file(&self) -> PathBuf {
        self.root.join("timestamp")
    }
}

fn group_dir(group: &str) -> &str {
    if group.is_empty() { CORE_GROUP } else { group }
}

/// Which log file of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogsKind {
    Current,
    Previous,
}

impl LogsKind {
    fn file_name(self) -> &'static str {
        match self {
            LogsKind::Current => "current.log",
            LogsKind::Previous => "previous.log",
        }
    }
}
