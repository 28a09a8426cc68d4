//! Resource kinds known to `omc get`.
//!
//! Built-in kinds carry a fixed column layout. Anything else is looked up
//! among the must-gather's CustomResourceDefinitions and rendered from the
//! CRD's printer columns.

pub mod crd;
pub mod extract;
pub mod kube;
pub mod openshift;
pub mod workloads;

use crate::error::{OmcError, Result};
use crate::mustgather::{MustGather, ResourceLocation};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::{Arc, OnceLock};

/// Values shared by every row of a listing.
#[derive(Debug, Clone, Copy)]
pub struct RowContext {
    /// Ages are computed relative to this instant
    pub now: DateTime<Utc>,
}

/// Turns objects of one kind into table rows.
pub trait Printer: Send + Sync {
    /// Column headers, NAME first.
    fn headers(&self, wide: bool) -> Vec<String>;

    /// One row per object, same length as `headers`.
    fn row(&self, object: &Value, ctx: &RowContext, wide: bool) -> Vec<String>;
}

/// Row builder for the columns after NAME.
pub type RowFn = fn(&Value, &RowContext) -> Vec<String>;

/// Fixed-column printer used by the built-in kinds.
pub struct ColumnPrinter {
    headers: &'static [&'static str],
    row: RowFn,
    wide_headers: &'static [&'static str],
    wide_row: Option<RowFn>,
}

impl ColumnPrinter {
    pub fn new(headers: &'static [&'static str], row: RowFn) -> Self {
        Self {
            headers,
            row,
            wide_headers: &[],
            wide_row: None,
        }
    }

    pub fn with_wide(mut self, headers: &'static [&'static str], row: RowFn) -> Self {
        self.wide_headers = headers;
        self.wide_row = Some(row);
        self
    }
}

impl Printer for ColumnPrinter {
    fn headers(&self, wide: bool) -> Vec<String> {
        let mut headers = vec!["NAME".to_string()];
        headers.extend(self.headers.iter().map(|h| h.to_string()));
        if wide {
            headers.extend(self.wide_headers.iter().map(|h| h.to_string()));
        }
        headers
    }

    fn row(&self, object: &Value, ctx: &RowContext, wide: bool) -> Vec<String> {
        let mut row = vec![extract::name(object).to_string()];
        row.extend((self.row)(object, ctx));
        if wide {
            if let Some(wide_row) = self.wide_row {
                row.extend(wide_row(object, ctx));
            }
        }
        row
    }
}

/// A resolved resource type: where it lives and how to print it.
#[derive(Clone)]
pub struct ResourceType {
    pub plural: String,
    pub singular: String,
    pub kind: String,
    /// API group, empty for core
    pub group: String,
    pub namespaced: bool,
    pub short_names: Vec<String>,
    pub printer: Arc<dyn Printer>,
}

impl std::fmt::Debug for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceType")
            .field("plural", &self.plural)
            .field("group", &self.group)
            .field("namespaced", &self.namespaced)
            .finish()
    }
}

impl ResourceType {
    pub fn builtin(
        plural: &str,
        singular: &str,
        kind: &str,
        group: &str,
        namespaced: bool,
        short_names: &[&str],
        printer: impl Printer + 'static,
    ) -> Self {
        Self {
            plural: plural.to_string(),
            singular: singular.to_string(),
            kind: kind.to_string(),
            group: group.to_string(),
            namespaced,
            short_names: short_names.iter().map(|s| s.to_string()).collect(),
            printer: Arc::new(printer),
        }
    }

    pub fn location(&self) -> ResourceLocation {
        ResourceLocation {
            group: self.group.clone(),
            plural: self.plural.clone(),
            namespaced: self.namespaced,
        }
    }

    /// `pod`, `deployment.apps`, `route.route.openshift.io`: the `kind/name` prefix.
    pub fn qualified_singular(&self) -> String {
        if self.group.is_empty() {
            self.singular.clone()
        } else {
            format!("{}.{}", self.singular, self.group)
        }
    }

    /// `pods`, `deployments.apps`: used in messages.
    pub fn qualified_plural(&self) -> String {
        if self.group.is_empty() {
            self.plural.clone()
        } else {
            format!("{}.{}", self.plural, self.group)
        }
    }

    /// Does a user-supplied type name refer to this resource?
    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        let (base, group) = match name.split_once('.') {
            Some((base, group)) => (base, Some(group)),
            None => (name.as_str(), None),
        };
        if let Some(group) = group {
            if group != self.group {
                return false;
            }
        }
        base == self.plural
            || base == self.singular
            || base == self.kind.to_lowercase()
            || (group.is_none() && self.short_names.iter().any(|s| s == base))
    }
}

/// Types printed by `omc get all`.
pub const ALL: &[&str] = &[
    "pods",
    "services",
    "deployments",
    "replicasets",
    "daemonsets",
    "statefulsets",
    "jobs",
    "cronjobs",
    "routes",
    "deploymentconfigs",
];

static BUILTIN: OnceLock<Vec<ResourceType>> = OnceLock::new();

/// All built-in resource types.
pub fn builtin() -> &'static [ResourceType] {
    BUILTIN.get_or_init(|| {
        let mut kinds = kube::kinds();
        kinds.extend(workloads::kinds());
        kinds.extend(openshift::kinds());
        kinds
    })
}

pub fn find_builtin(name: &str) -> Option<&'static ResourceType> {
    builtin().iter().find(|rt| rt.matches(name))
}

/// Resolve a type name: built-ins first, then the must-gather's CRDs.
pub fn resolve(name: &str, mg: &MustGather) -> Result<ResourceType> {
    if let Some(rt) = find_builtin(name) {
        return Ok(rt.clone());
    }
    let crds = crd::load_crds(mg);
    log::debug!("Looking up {} among {} CRDs", name, crds.len());
    crds.iter()
        .find(|c| c.matches(name))
        .map(crd::Crd::resource_type)
        .ok_or_else(|| OmcError::UnknownResource(name.to_string()))
}

/// Split `pods,svc` and expand `all`.
pub fn expand_types(arg: &str) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();
    for t in arg.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if t.eq_ignore_ascii_case("all") {
            types.extend(ALL.iter().map(|s| s.to_string()));
        } else {
            types.push(t.to_string());
        }
    }
    types.dedup();
    types
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_aliases() {
        assert_eq!(find_builtin("po").unwrap().plural, "pods");
        assert_eq!(find_builtin("Pod").unwrap().plural, "pods");
        assert_eq!(find_builtin("deploy").unwrap().plural, "deployments");
        assert_eq!(find_builtin("deployments.apps").unwrap().plural, "deployments");
        assert!(find_builtin("deployments.extensions").is_none());
        assert_eq!(find_builtin("co").unwrap().plural, "clusteroperators");
        assert_eq!(find_builtin("mcp").unwrap().plural, "machineconfigpools");
        assert_eq!(find_builtin("pvc").unwrap().plural, "persistentvolumeclaims");
        assert!(find_builtin("widgets").is_none());
    }

    #[test]
    fn test_builtin_plurals_are_unique() {
        let mut plurals: Vec<_> = builtin()
            .iter()
            .map(|rt| rt.qualified_plural())
            .collect();
        let len = plurals.len();
        plurals.sort();
        plurals.dedup();
        assert_eq!(plurals.len(), len);
    }

    #[test]
    fn test_qualified_names() {
        let deploy = find_builtin("deployments").unwrap();
        assert_eq!(deploy.qualified_singular(), "deployment.apps");
        let pod = find_builtin("pods").unwrap();
        assert_eq!(pod.qualified_singular(), "pod");
    }

    #[test]
    fn test_headers_match_rows() {
        let ctx = RowContext { now: Utc::now() };
        let empty = serde_json::json!({});
        for rt in builtin() {
            for wide in [false, true] {
                assert_eq!(
                    rt.printer.headers(wide).len(),
                    rt.printer.row(&empty, &ctx, wide).len(),
                    "{} wide={}",
                    rt.plural,
                    wide
                );
            }
        }
    }

    #[test]
    fn test_expand_types() {
        assert_eq!(expand_types("pods,svc"), vec!["pods", "svc"]);
        let all = expand_types("all");
        assert_eq!(all.len(), ALL.len());
        assert_eq!(all[0], "pods");
    }
}
