//! HAProxy router configuration captured per ingress controller.

pub mod parser;

use crate::error::Result;
use crate::formatter::table::TableData;
use crate::mustgather::{MustGather, NamespaceScope};
use std::fs;

pub use parser::{Backend, parse_backends};

/// A backend together with the ingress controller serving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerBackend {
    pub controller: String,
    pub backend: Backend,
}

/// Backends of every router config, one entry per (controller, namespace, route).
pub fn load_backends(
    mg: &MustGather,
    scope: &NamespaceScope,
    controller: Option<&str>,
) -> Result<Vec<ControllerBackend>> {
    let pattern = mg.layout().haproxy_configs_pattern();
    let mut paths: Vec<_> = glob::glob(&pattern)
        .map_err(|e| crate::error::OmcError::InvalidArgs(e.to_string()))?
        .filter_map(|p| p.ok())
        .collect();
    paths.sort();

    let mut result: Vec<ControllerBackend> = Vec::new();
    for path in paths {
        // ingress_controllers/<controller>/<router-pod>/haproxy.config
        let Some(name) = path
            .parent()
            .and_then(|p| p.parent())
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
        else {
            continue;
        };
        if controller.is_some_and(|c| c != name) {
            continue;
        }

        log::debug!("Reading {}", path.display());
        let content = fs::read_to_string(&path)?;
        for backend in parse_backends(&content) {
            if scope
                .namespace()
                .is_some_and(|ns| ns != backend.namespace)
            {
                continue;
            }
            let seen = result.iter().any(|b| {
                b.controller == name
                    && b.backend.namespace == backend.namespace
                    && b.backend.name == backend.name
            });
            if !seen {
                result.push(ControllerBackend {
                    controller: name.clone(),
                    backend,
                });
            }
        }
    }

    result.sort_by(|a, b| {
        (&a.backend.namespace, &a.backend.name, &a.controller).cmp(&(
            &b.backend.namespace,
            &b.backend.name,
            &b.controller,
        ))
    });
    Ok(result)
}

pub fn backends_table(backends: &[ControllerBackend]) -> TableData {
    let mut data = TableData::new(
        [
            "NAMESPACE",
            "NAME",
            "INGRESSCONTROLLER",
            "SERVICES",
            "PORT",
            "TERMINATION",
        ]
        .iter()
        .map(|h| h.to_string())
        .collect(),
    );
    for b in backends {
        data.push(vec![
            b.backend.namespace.clone(),
            b.backend.name.clone(),
            b.controller.clone(),
            b.backend.services.join(","),
            b.backend.ports.join(","),
            b.backend.termination.clone(),
        ]);
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, MustGather) {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("namespaces")).unwrap();
        let config = "backend be_http:app:web\n  server pod:web-1:web:8080-tcp:10.0.0.1:8080 10.0.0.1:8080\nbackend be_tcp:other:db\n  server pod:db-1:db:5432:10.0.0.2:5432 10.0.0.2:5432\n";
        for router in ["router-default-a", "router-default-b"] {
            let dir = root.join("ingress_controllers/default").join(router);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("haproxy.config"), config).unwrap();
        }
        let dir = root.join("ingress_controllers/sharded/router-sharded-a");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("haproxy.config"), "backend be_secure:app:api\n").unwrap();
        let mg = MustGather::open(root).unwrap();
        (tmp, mg)
    }

    #[test]
    fn test_load_backends_dedups_routers() {
        let (_tmp, mg) = fixture();
        let all = load_backends(&mg, &NamespaceScope::All, None).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].backend.name, "api");
        assert_eq!(all[0].controller, "sharded");
        assert_eq!(all[1].backend.name, "web");

        let app = load_backends(&mg, &NamespaceScope::Namespace("app".into()), Some("default"))
            .unwrap();
        assert_eq!(app.len(), 1);
        assert_eq!(app[0].backend.termination, "http");
    }

    #[test]
    fn test_backends_table() {
        let (_tmp, mg) = fixture();
        let all = load_backends(&mg, &NamespaceScope::Namespace("other".into()), None).unwrap();
        let out = backends_table(&all).render(false);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines[0],
            "NAMESPACE   NAME   INGRESSCONTROLLER   SERVICES   PORT   TERMINATION"
        );
        assert_eq!(
            lines[1],
            "other       db     default             db         5432   passthrough"
        );
    }
}
