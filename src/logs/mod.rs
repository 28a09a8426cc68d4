//! Pod container logs and host service logs.

pub mod cri;

use crate::error::{OmcError, Result};
use crate::mustgather::{LogsKind, MustGather, NamespaceScope, ResourceLocation};
use crate::resources::extract::{get_array, get_str, name};
use std::fs;

pub use cri::LogOptions;

/// Containers of a pod, regular ones first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PodContainers {
    pub containers: Vec<String>,
    pub init_containers: Vec<String>,
}

impl PodContainers {
    pub fn all(&self) -> Vec<String> {
        self.containers
            .iter()
            .chain(&self.init_containers)
            .cloned()
            .collect()
    }

    fn contains(&self, name: &str) -> bool {
        self.containers
            .iter()
            .chain(&self.init_containers)
            .any(|c| c == name)
    }
}

/// Container names of a pod: from its manifest, else from the log directories.
pub fn pod_containers(mg: &MustGather, namespace: &str, pod: &str) -> Result<PodContainers> {
    let location = ResourceLocation {
        group: String::new(),
        plural: "pods".to_string(),
        namespaced: true,
    };
    let pods = mg.load(&location, &NamespaceScope::Namespace(namespace.to_string()))?;
    if let Some(manifest) = pods.iter().find(|p| name(p) == pod) {
        let names = |key: &str| -> Vec<String> {
            get_array(manifest, &["spec", key])
                .iter()
                .filter_map(|c| get_str(c, &["name"]))
                .map(str::to_string)
                .collect()
        };
        return Ok(PodContainers {
            containers: names("containers"),
            init_containers: names("initContainers"),
        });
    }

    let dir = mg.layout().pod_dir(namespace, pod);
    if !dir.is_dir() {
        return Err(OmcError::not_found("pods", pod, Some(namespace)));
    }
    let mut containers = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            containers.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    containers.sort();
    Ok(PodContainers {
        containers,
        init_containers: Vec::new(),
    })
}

/// Pick the containers to print, the way kubectl does.
pub fn select_containers(
    pod: &str,
    containers: &PodContainers,
    requested: Option<&str>,
    all: bool,
) -> Result<Vec<String>> {
    if all {
        return Ok(containers.all());
    }
    if let Some(requested) = requested {
        if containers.contains(requested) {
            return Ok(vec![requested.to_string()]);
        }
        return Err(OmcError::InvalidArgs(format!(
            "container {} is not valid for pod {}",
            requested, pod
        )));
    }
    match containers.containers.as_slice() {
        [only] => Ok(vec![only.clone()]),
        [] => Err(OmcError::not_found("container", pod, None)),
        several => Err(OmcError::ContainerRequired {
            pod: pod.to_string(),
            containers: several.to_vec(),
        }),
    }
}

/// Read and filter the log of one container.
pub fn container_log(
    mg: &MustGather,
    namespace: &str,
    pod: &str,
    container: &str,
    previous: bool,
    options: &LogOptions,
) -> Result<String> {
    let kind = if previous {
        LogsKind::Previous
    } else {
        LogsKind::Current
    };
    let path = mg.layout().container_log(namespace, pod, container, kind);
    log::debug!("Reading {}", path.display());
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let what = if previous { "previous log" } else { "log" };
            return Err(OmcError::not_found(
                what,
                &format!("{}/{}", pod, container),
                Some(namespace),
            ));
        }
        Err(e) => return Err(e.into()),
    };
    Ok(cri::filter(&content, options))
}

/// `(role, service)` pairs found under `host_service_logs/`.
pub fn host_services(mg: &MustGather) -> Result<Vec<(String, String)>> {
    let dir = mg.layout().host_service_logs_dir();
    let mut services = Vec::new();
    if !dir.is_dir() {
        return Ok(services);
    }
    for role in fs::read_dir(&dir)? {
        let role = role?;
        if !role.file_type()?.is_dir() {
            continue;
        }
        let role_name = role.file_name().to_string_lossy().into_owned();
        for file in fs::read_dir(role.path())? {
            let file_name = file?.file_name().to_string_lossy().into_owned();
            if let Some(service) = file_name.strip_suffix("_service.log") {
                services.push((role_name.clone(), service.to_string()));
            }
        }
    }
    services.sort();
    Ok(services)
}

/// Log of a host service for the given roles, each prefixed by a header when there are several.
pub fn host_service_log(
    mg: &MustGather,
    service: &str,
    roles: &[String],
    options: &LogOptions,
) -> Result<String> {
    let mut found = Vec::new();
    for role in roles {
        let path = mg.layout().host_service_log(role, service);
        if path.is_file() {
            log::debug!("Reading {}", path.display());
            found.push((role, fs::read_to_string(&path)?));
        }
    }
    if found.is_empty() {
        return Err(OmcError::not_found("service log", service, None));
    }

    let several = found.len() > 1;
    let mut out = String::new();
    for (role, content) in found {
        if several {
            out.push_str(&format!("==> {}/{} <==\n", role, service));
        }
        out.push_str(&cri::filter(&content, options));
    }
    Ok(out)
}
