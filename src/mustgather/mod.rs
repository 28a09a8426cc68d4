//! Access to an extracted must-gather directory tree.
//!
//! A must-gather is usually extracted as
//! `must-gather.local.<n>/<image-digest-dir>/{namespaces,cluster-scoped-resources,...}`.
//! [`MustGather::open`] accepts either level and settles on the inner root.

pub mod layout;
pub mod loader;
pub mod selector;

use crate::error::{OmcError, Result};
use chrono::{DateTime, Utc};
use layout::{CLUSTER_SCOPED_DIR, NAMESPACES_DIR};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

pub use layout::{Layout, LogsKind};
pub use selector::Selector;

/// Where a kind of resource is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocation {
    /// API group, empty for the core group
    pub group: String,
    pub plural: String,
    pub namespaced: bool,
}

/// Which namespaces a namespaced lookup covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceScope {
    All,
    Namespace(String),
}

impl NamespaceScope {
    pub fn namespace(&self) -> Option<&str> {
        match self {
            NamespaceScope::All => None,
            NamespaceScope::Namespace(ns) => Some(ns),
        }
    }
}

/// An opened must-gather.
#[derive(Debug, Clone)]
pub struct MustGather {
    layout: Layout,
    collected_at: Option<DateTime<Utc>>,
}

impl MustGather {
    /// Open the must-gather at or directly below `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let root = discover_root(path)?;
        let layout = Layout::new(root);
        let collected_at = read_timestamp(&layout.timestamp_file());
        log::debug!(
            "Opened must-gather {} (collected at {:?})",
            layout.root().display(),
            collected_at
        );
        Ok(MustGather {
            layout,
            collected_at,
        })
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The instant ages are measured from: collection time when known.
    pub fn reference_time(&self) -> DateTime<Utc> {
        self.collected_at.unwrap_or_else(Utc::now)
    }

    pub fn collected_at(&self) -> Option<DateTime<Utc>> {
        self.collected_at
    }

    /// Names of all namespaces present in the must-gather, sorted.
    pub fn namespaces(&self) -> Result<Vec<String>> {
        let dir = self.layout.namespaces_dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.layout.namespace_dir(namespace).is_dir()
    }

    fn scoped_namespaces(&self, scope: &NamespaceScope) -> Result<Vec<String>> {
        match scope {
            NamespaceScope::All => self.namespaces(),
            NamespaceScope::Namespace(ns) => Ok(vec![ns.clone()]),
        }
    }

    /// Load every object of a resource kind within `scope`, sorted by namespace and name.
    pub fn load(&self, location: &ResourceLocation, scope: &NamespaceScope) -> Result<Vec<Value>> {
        let core = location.group.is_empty();
        let mut objects = if core && location.plural == "namespaces" {
            self.load_namespace_objects()?
        } else if location.namespaced {
            let mut objects = Vec::new();
            for ns in self.scoped_namespaces(scope)? {
                let mut found = self.load_namespaced(location, &ns);
                if found.is_empty() && core && location.plural == "pods" {
                    found = self.load_pod_manifests(&ns);
                }
                objects.append(&mut found);
            }
            objects
        } else {
            let mut objects =
                loader::load_or_skip(&self.layout.cluster_list(&location.group, &location.plural));
            objects.extend(loader::load_dir(
                &self.layout.cluster_objects(&location.group, &location.plural),
                1,
            ));
            objects
        };

        loader::sort_objects(&mut objects);
        Ok(objects)
    }

    fn load_namespaced(&self, location: &ResourceLocation, namespace: &str) -> Vec<Value> {
        let mut objects = loader::load_or_skip(&self.layout.namespaced_list(
            namespace,
            &location.group,
            &location.plural,
        ));
        objects.extend(loader::load_dir(
            &self
                .layout
                .namespaced_objects(namespace, &location.group, &location.plural),
            1,
        ));
        objects
    }

    /// Older must-gathers only carry `namespaces/<ns>/pods/<pod>/<pod>.yaml`.
    fn load_pod_manifests(&self, namespace: &str) -> Vec<Value> {
        let pods_dir = self.layout.pods_dir(namespace);
        let Ok(entries) = fs::read_dir(&pods_dir) else {
            return Vec::new();
        };
        let mut objects = Vec::new();
        for entry in entries.filter_map(|e| e.ok()) {
            let pod = entry.file_name().to_string_lossy().into_owned();
            let manifest = entry.path().join(format!("{}.yaml", pod));
            objects.append(&mut loader::load_or_skip(&manifest));
        }
        objects
    }

    fn load_namespace_objects(&self) -> Result<Vec<Value>> {
        let mut objects = Vec::new();
        for ns in self.namespaces()? {
            let manifest = self.layout.namespace_manifest(&ns);
            objects.append(&mut loader::load_or_skip(&manifest));
        }
        Ok(objects)
    }

    /// Read a single JSON snapshot (etcd, prometheus).
    pub fn read_json<T: serde::de::DeserializeOwned>(&self, path: &Path) -> Result<T> {
        log::debug!("Reading {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                OmcError::not_found("file", &path.display().to_string(), None)
            } else {
                OmcError::Io(e)
            }
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load the first object found at a cluster-scoped path, e.g. `infrastructures/cluster`.
    pub fn cluster_object(&self, group: &str, plural: &str, name: &str) -> Option<Value> {
        let location = ResourceLocation {
            group: group.to_string(),
            plural: plural.to_string(),
            namespaced: false,
        };
        self.load(&location, &NamespaceScope::All)
            .ok()?
            .into_iter()
            .find(|o| o.pointer("/metadata/name").and_then(Value::as_str) == Some(name))
    }
}

fn looks_like_root(path: &Path) -> bool {
    path.join(NAMESPACES_DIR).is_dir() || path.join(CLUSTER_SCOPED_DIR).is_dir()
}

/// Find the must-gather root at or one level below `path`.
pub fn discover_root(path: &Path) -> Result<PathBuf> {
    let path = path
        .canonicalize()
        .map_err(|_| OmcError::InvalidMustGather(path.to_path_buf()))?;
    if looks_like_root(&path) {
        return Ok(path);
    }

    let mut candidates = Vec::new();
    for entry in fs::read_dir(&path)?.filter_map(|e| e.ok()) {
        let child = entry.path();
        if child.is_dir() && looks_like_root(&child) {
            candidates.push(child);
        }
    }
    candidates.sort();

    match candidates.len() {
        0 => Err(OmcError::InvalidMustGather(path)),
        1 => Ok(candidates.remove(0)),
        _ => Err(OmcError::AmbiguousMustGather {
            path,
            candidates: candidates
                .iter()
                .map(|c| c.display().to_string())
                .collect(),
        }),
    }
}

/// Parse the `timestamp` file: `2023-05-10 12:34:56.789 +0000 UTC m=+0.1`.
fn read_timestamp(path: &Path) -> Option<DateTime<Utc>> {
    let content = fs::read_to_string(path).ok()?;
    parse_timestamp(content.lines().next()?)
}

fn parse_timestamp(line: &str) -> Option<DateTime<Utc>> {
    let fields: Vec<&str> = line.split_whitespace().take(3).collect();
    if fields.len() < 3 {
        return None;
    }
    DateTime::parse_from_str(&fields.join(" "), "%Y-%m-%d %H:%M:%S%.f %z")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
