//! Output formats for `get`, `events` and friends.

pub mod age;
pub mod describe;
pub mod jsonpath;
pub mod table;

use crate::error::{OmcError, Result};
use crate::resources::extract::{self, format_map};
use crate::resources::{ResourceType, RowContext};
use jsonpath::Template;
use serde_json::{Value, json};
use table::TableData;

/// Output format selected with `-o`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OutputFormat {
    /// Default table.
    #[default]
    Table,
    /// Table with extra columns.
    Wide,
    Json,
    Yaml,
    /// `kind/name` per line.
    Name,
    /// `jsonpath=<template>`.
    JsonPath(Template),
}

impl OutputFormat {
    /// Parse a `-o` value. `None` is the default table.
    pub fn parse(s: Option<&str>) -> Result<Self> {
        let Some(s) = s else {
            return Ok(Self::Table);
        };
        if let Some(template) = s.strip_prefix("jsonpath=") {
            return Ok(Self::JsonPath(Template::parse(template)?));
        }
        match s.to_lowercase().as_str() {
            "" | "table" => Ok(Self::Table),
            "wide" => Ok(Self::Wide),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "name" => Ok(Self::Name),
            _ => Err(OmcError::InvalidOutput(s.to_string())),
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Self::Table | Self::Wide)
    }

    /// Human formats print a notice to stderr when nothing matched. The
    /// others still print an empty `List`.
    pub fn notes_empty_result(&self) -> bool {
        matches!(self, Self::Table | Self::Wide | Self::Name)
    }
}

/// Table decorations requested on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableOptions {
    pub wide: bool,
    /// Prepend a NAMESPACE column
    pub all_namespaces: bool,
    pub show_labels: bool,
    pub no_headers: bool,
    /// Prefix names with `kind/`, used when several types are listed
    pub with_kind: bool,
}

/// Objects of one resource type.
#[derive(Debug)]
pub struct Listing {
    pub resource: ResourceType,
    pub objects: Vec<Value>,
}

/// Build the table for one listing.
pub fn build_table(listing: &Listing, ctx: &RowContext, opts: &TableOptions) -> TableData {
    let printer = &listing.resource.printer;
    let mut data = TableData::new(printer.headers(opts.wide));
    for object in &listing.objects {
        let mut row = printer.row(object, ctx, opts.wide);
        if opts.with_kind {
            if let Some(name) = row.first_mut() {
                *name = format!("{}/{}", listing.resource.qualified_singular(), name);
            }
        }
        data.push(row);
    }

    if opts.all_namespaces && listing.resource.namespaced {
        let namespaces = listing
            .objects
            .iter()
            .map(|o| extract::namespace(o).unwrap_or_default().to_string())
            .collect();
        data.insert_column(0, "NAMESPACE", namespaces);
    }
    if opts.show_labels {
        let labels = listing
            .objects
            .iter()
            .map(|o| format_map(&extract::labels(o)))
            .collect();
        data.push_column("LABELS", labels);
    }
    data
}

/// Wrap objects the way kubectl does for multi-object output.
pub fn to_list(objects: Vec<Value>) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "List",
        "metadata": {"resourceVersion": ""},
        "items": objects,
    })
}

/// Render a single document as JSON, YAML or through a JSONPath template.
pub fn render_document(value: &Value, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(value)?)),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        OutputFormat::JsonPath(template) => template.render(value),
        _ => Err(OmcError::InvalidOutput(format!("{:?}", format))),
    }
}

/// Render listings in the requested format.
///
/// `single` is set when exactly one object was asked for by name, in which
/// case JSON/YAML print the object itself instead of a List.
pub fn render_listings(
    listings: Vec<Listing>,
    format: &OutputFormat,
    ctx: &RowContext,
    opts: &TableOptions,
    single: bool,
) -> Result<String> {
    match format {
        OutputFormat::Table | OutputFormat::Wide => {
            let opts = TableOptions {
                wide: opts.wide || *format == OutputFormat::Wide,
                with_kind: opts.with_kind || listings.len() > 1,
                ..*opts
            };
            let tables: Vec<String> = listings
                .iter()
                .filter(|l| !l.objects.is_empty())
                .map(|l| build_table(l, ctx, &opts).render(opts.no_headers))
                .collect();
            Ok(tables.join("\n"))
        }
        OutputFormat::Name => {
            let mut out = String::new();
            for listing in &listings {
                for object in &listing.objects {
                    out.push_str(&format!(
                        "{}/{}\n",
                        listing.resource.qualified_singular(),
                        extract::name(object)
                    ));
                }
            }
            Ok(out)
        }
        _ => {
            let mut objects: Vec<Value> = listings.into_iter().flat_map(|l| l.objects).collect();
            let document = if single && objects.len() == 1 {
                objects.remove(0)
            } else {
                to_list(objects)
            };
            render_document(&document, format)
        }
    }
}
