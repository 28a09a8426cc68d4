use crate::cli::ScopeArgs;
use crate::config::{self, DEFAULT_PROJECT};
use crate::error::{OmcError, Result};
use crate::mustgather::{MustGather, NamespaceScope};
use crate::resources::RowContext;
use std::path::Path;

/// The must-gather a command runs against, plus the current project.
#[derive(Debug, Clone)]
pub struct Session {
    pub mg: MustGather,
    /// Default namespace for namespaced lookups
    pub project: String,
}

impl Session {
    /// Open the must-gather given with `--mg`, else the current context from the config.
    pub fn open(config_path: Option<&Path>, mg_override: Option<&Path>) -> Result<Session> {
        if let Some(path) = mg_override {
            log::debug!("Using must-gather from --mg: {}", path.display());
            return Ok(Session {
                mg: MustGather::open(path)?,
                project: DEFAULT_PROJECT.to_string(),
            });
        }

        let config = config::load_config(config_path)?;
        let context = config.current().ok_or(OmcError::NoMustGather)?;
        log::debug!(
            "Using context {} ({}), project {}",
            context.id,
            context.path.display(),
            context.project
        );
        Ok(Session {
            mg: MustGather::open(&context.path)?,
            project: context.project.clone(),
        })
    }

    /// Namespaces covered by `-n` / `-A`, defaulting to the current project.
    pub fn scope(&self, args: &ScopeArgs) -> NamespaceScope {
        if args.all_namespaces {
            NamespaceScope::All
        } else {
            NamespaceScope::Namespace(
                args.namespace
                    .clone()
                    .unwrap_or_else(|| self.project.clone()),
            )
        }
    }

    pub fn row_context(&self) -> RowContext {
        RowContext {
            now: self.mg.reference_time(),
        }
    }
}

/// The message kubectl prints when a listing is empty.
pub fn no_resources_message(scope: &NamespaceScope, namespaced: bool) -> String {
    match scope.namespace() {
        Some(ns) if namespaced => format!("No resources found in {} namespace.", ns),
        _ => "No resources found".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, save_config};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_open_from_current_context() {
        let tmp = TempDir::new().unwrap();
        let mg_dir = tmp.path().join("mg");
        fs::create_dir_all(mg_dir.join("namespaces/openshift-etcd")).unwrap();
        let config_path = tmp.path().join("omc.toml");

        assert!(matches!(
            Session::open(Some(&config_path), None),
            Err(OmcError::NoMustGather)
        ));

        let mut config = Config::default();
        config.select(&mg_dir, None);
        config.current_mut().unwrap().project = "openshift-etcd".to_string();
        save_config(&config, Some(&config_path)).unwrap();

        let session = Session::open(Some(&config_path), None).unwrap();
        assert_eq!(session.project, "openshift-etcd");
        assert_eq!(
            session.scope(&ScopeArgs::default()),
            NamespaceScope::Namespace("openshift-etcd".to_string())
        );
        let all = ScopeArgs {
            all_namespaces: true,
            ..Default::default()
        };
        assert_eq!(session.scope(&all), NamespaceScope::All);
    }

    #[test]
    fn test_override_ignores_config() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("namespaces")).unwrap();
        let session = Session::open(Some(&tmp.path().join("missing.toml")), Some(tmp.path()))
            .unwrap();
        assert_eq!(session.project, DEFAULT_PROJECT);
    }

    #[test]
    fn test_no_resources_message() {
        let ns = NamespaceScope::Namespace("default".to_string());
        assert_eq!(
            no_resources_message(&ns, true),
            "No resources found in default namespace."
        );
        assert_eq!(no_resources_message(&ns, false), "No resources found");
        assert_eq!(no_resources_message(&NamespaceScope::All, true), "No resources found");
    }
}
