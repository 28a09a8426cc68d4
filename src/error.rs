//! Error types for omc
//!
//! Every command returns [`Result`]; `main` prints the error and exits non-zero.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while inspecting a must-gather
#[derive(Debug, Error)]
pub enum OmcError {
    /// Reading a file or directory failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A manifest could not be parsed as YAML
    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A JSON snapshot could not be parsed
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Rendering YAML output failed
    #[error("failed to render YAML: {0}")]
    YamlRender(#[from] serde_yaml::Error),

    /// The configuration file is malformed or could not be written
    #[error("configuration error: {0}")]
    Config(String),

    /// No must-gather selected - needs `omc use <path>` or `--mg`
    #[error("no must-gather selected - run `omc use <path>` first")]
    NoMustGather,

    /// The path does not look like a must-gather
    #[error("{0} does not look like a must-gather (no namespaces/ or cluster-scoped-resources/ found)")]
    InvalidMustGather(PathBuf),

    /// Several directories under the path look like must-gathers
    #[error("multiple must-gathers found under {path}, pick one of: {}", .candidates.join(", "))]
    AmbiguousMustGather {
        path: PathBuf,
        candidates: Vec<String>,
    },

    /// The requested resource type is not built in and no CRD matches it
    #[error("the server doesn't have a resource type \"{0}\"")]
    UnknownResource(String),

    /// A named object does not exist
    #[error("{kind} \"{name}\" not found{}", .namespace.as_ref().map(|ns| format!(" in namespace {ns}")).unwrap_or_default())]
    NotFound {
        kind: String,
        name: String,
        namespace: Option<String>,
    },

    /// A label selector could not be parsed
    #[error("invalid label selector \"{selector}\": {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// An unsupported `-o` value
    #[error("unable to match a printer suitable for the output format \"{0}\"")]
    InvalidOutput(String),

    /// A JSONPath template could not be parsed or evaluated
    #[error("error executing jsonpath \"{template}\": {reason}")]
    JsonPath { template: String, reason: String },

    /// The pod has several containers and none was selected
    #[error("a container name must be specified for pod {pod}, choose one of: [{}]", .containers.join(" "))]
    ContainerRequired { pod: String, containers: Vec<String> },

    /// Command-line arguments are inconsistent
    #[error("{0}")]
    InvalidArgs(String),
}

impl OmcError {
    pub fn yaml(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Self::Yaml {
            path: path.into(),
            source,
        }
    }

    pub fn not_found(kind: &str, name: &str, namespace: Option<&str>) -> Self {
        Self::NotFound {
            kind: kind.to_string(),
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
        }
    }
}

/// Result type alias for omc operations
pub type Result<T> = std::result::Result<T, OmcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = OmcError::not_found("pods", "etcd-0", Some("openshift-etcd"));
        assert_eq!(
            err.to_string(),
            "pods \"etcd-0\" not found in namespace openshift-etcd"
        );

        let err = OmcError::not_found("nodes", "master-0", None);
        assert_eq!(err.to_string(), "nodes \"master-0\" not found");
    }

    #[test]
    fn test_container_required_message() {
        let err = OmcError::ContainerRequired {
            pod: "router-default-1".to_string(),
            containers: vec!["router".to_string(), "logs".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "a container name must be specified for pod router-default-1, choose one of: [router logs]"
        );
    }
}
