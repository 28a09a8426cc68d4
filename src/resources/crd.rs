//! CustomResourceDefinition-driven resource types.
//!
//! A custom resource is printed with the columns its CRD declares in
//! `additionalPrinterColumns`, each cell being a JSONPath evaluated against
//! the object.

use super::extract::{self, get_array, get_bool, get_i64, get_str, get_string};
use super::{Printer, ResourceType, RowContext};
use crate::formatter::age::{age, parse_time};
use crate::formatter::jsonpath::{render_value, select};
use crate::mustgather::{MustGather, loader};
use serde_json::Value;
use std::sync::Arc;

/// One entry of `additionalPrinterColumns`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrinterColumn {
    pub name: String,
    pub column_type: String,
    pub json_path: String,
    pub priority: i64,
}

/// The parts of a CRD needed to find and print its objects.
#[derive(Debug, Clone)]
pub struct Crd {
    pub group: String,
    pub plural: String,
    pub singular: String,
    pub kind: String,
    pub short_names: Vec<String>,
    pub namespaced: bool,
    pub columns: Vec<PrinterColumn>,
}

impl Crd {
    /// Build from a CustomResourceDefinition manifest. `None` when it has no names.
    pub fn from_value(crd: &Value) -> Option<Crd> {
        let spec = crd.get("spec")?;
        let plural = get_str(spec, &["names", "plural"])?.to_lowercase();
        let kind = get_string(spec, &["names", "kind"]);
        let singular = match get_str(spec, &["names", "singular"]) {
            Some(s) if !s.is_empty() => s.to_lowercase(),
            _ => kind.to_lowercase(),
        };
        let short_names = get_array(spec, &["names", "shortNames"])
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_lowercase)
            .collect();

        Some(Crd {
            group: get_string(spec, &["group"]),
            plural,
            singular,
            kind,
            short_names,
            namespaced: get_str(spec, &["scope"]) != Some("Cluster"),
            columns: printer_columns(spec),
        })
    }

    /// Same matching rules as the built-in types.
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
            || self.short_names.iter().any(|s| s == base)
    }

    pub fn resource_type(&self) -> ResourceType {
        ResourceType {
            plural: self.plural.clone(),
            singular: self.singular.clone(),
            kind: self.kind.clone(),
            group: self.group.clone(),
            namespaced: self.namespaced,
            short_names: self.short_names.clone(),
            printer: Arc::new(CrdPrinter {
                columns: self.columns.clone(),
            }),
        }
    }
}

/// Columns of the version kubectl would print: served and storage, else first served, else first.
fn printer_columns(spec: &Value) -> Vec<PrinterColumn> {
    let versions = get_array(spec, &["versions"]);
    let served = |v: &&Value| get_bool(v, &["served"]).unwrap_or(true);
    let version = versions
        .iter()
        .find(|v| served(v) && get_bool(v, &["storage"]).unwrap_or(false))
        .or_else(|| versions.iter().find(served))
        .or_else(|| versions.first());

    // apiextensions/v1beta1 kept the columns at spec level
    let columns = match version {
        Some(v) if !get_array(v, &["additionalPrinterColumns"]).is_empty() => {
            get_array(v, &["additionalPrinterColumns"])
        }
        _ => get_array(spec, &["additionalPrinterColumns"]),
    };

    columns
        .iter()
        .filter_map(|c| {
            let json_path = get_str(c, &["jsonPath"]).or_else(|| get_str(c, &["JSONPath"]))?;
            Some(PrinterColumn {
                name: get_string(c, &["name"]).to_uppercase(),
                column_type: get_string(c, &["type"]),
                json_path: json_path.to_string(),
                priority: get_i64(c, &["priority"]).unwrap_or(0),
            })
        })
        .collect()
}

/// Load every CRD in the must-gather. Malformed entries are skipped.
pub fn load_crds(mg: &MustGather) -> Vec<Crd> {
    let mut objects = loader::load_dir(&mg.layout().crd_dir(), 1);
    if let Ok(mut listed) = loader::load_optional_file(
        &mg.layout()
            .cluster_list("apiextensions.k8s.io", "customresourcedefinitions"),
    ) {
        objects.append(&mut listed);
    }
    objects.iter().filter_map(Crd::from_value).collect()
}

/// Renders the printer columns of a CRD.
pub struct CrdPrinter {
    columns: Vec<PrinterColumn>,
}

impl CrdPrinter {
    fn visible(&self, wide: bool) -> impl Iterator<Item = &PrinterColumn> {
        self.columns
            .iter()
            .filter(move |c| wide || c.priority == 0)
    }
}

impl Printer for CrdPrinter {
    fn headers(&self, wide: bool) -> Vec<String> {
        let mut headers = vec!["NAME".to_string()];
        if self.columns.is_empty() {
            headers.push("AGE".to_string());
        } else {
            headers.extend(self.visible(wide).map(|c| c.name.clone()));
        }
        headers
    }

    fn row(&self, object: &Value, ctx: &RowContext, wide: bool) -> Vec<String> {
        let mut row = vec![extract::name(object).to_string()];
        if self.columns.is_empty() {
            row.push(age(extract::creation_timestamp(object), ctx.now));
        } else {
            row.extend(self.visible(wide).map(|c| cell(object, c, ctx)));
        }
        row
    }
}

fn cell(object: &Value, column: &PrinterColumn, ctx: &RowContext) -> String {
    let values = match select(object, &column.json_path) {
        Ok(values) => values,
        Err(e) => {
            log::debug!("Column {} ({}): {}", column.name, column.json_path, e);
            return String::new();
        }
    };

    let rendered: Vec<String> = values
        .iter()
        .map(|v| match v {
            Value::String(s) if column.column_type == "date" => {
                parse_time(s).map_or_else(|| s.clone(), |t| age(Some(t), ctx.now))
            }
            Value::Array(items) => items.iter().map(render_value).collect::<Vec<_>>().join(","),
            other => render_value(other),
        })
        .collect();
    rendered.join(",")
}
