use crate::cli::EventsArgs;
use crate::common::{Session, no_resources_message};
use crate::error::{OmcError, Result};
use crate::formatter::{Listing, OutputFormat, TableOptions, render_listings};
use crate::resources::{self, extract::get_str, kube};
use serde_json::Value;

/// Which events to keep.
#[derive(Debug, Default)]
pub struct EventFilter {
    pub event_type: Option<String>,
    pub reason: Option<String>,
    /// Involved object as (kind, name)
    pub object: Option<(String, String)>,
}

impl EventFilter {
    pub fn from_args(args: &EventsArgs) -> Result<Self> {
        let object = match args.for_object.as_deref() {
            Some(target) => {
                let (kind, name) = target.split_once('/').ok_or_else(|| {
                    OmcError::InvalidArgs(format!(
                        "--for must be KIND/NAME, got \"{}\"",
                        target
                    ))
                })?;
                Some((kind.to_string(), name.to_string()))
            }
            None => None,
        };
        Ok(Self {
            event_type: args.event_type.clone(),
            reason: args.reason.clone(),
            object,
        })
    }

    pub fn matches(&self, event: &Value) -> bool {
        if let Some(event_type) = &self.event_type {
            if !get_str(event, &["type"]).is_some_and(|t| t.eq_ignore_ascii_case(event_type)) {
                return false;
            }
        }
        if let Some(reason) = &self.reason {
            if get_str(event, &["reason"]) != Some(reason.as_str()) {
                return false;
            }
        }
        if let Some((kind, name)) = &self.object {
            if get_str(event, &["involvedObject", "name"]) != Some(name.as_str()) {
                return false;
            }
            let event_kind = get_str(event, &["involvedObject", "kind"]).unwrap_or_default();
            if !kind_matches(kind, event_kind) {
                return false;
            }
        }
        true
    }
}

/// `pod`, `po`, `Pod` and `pods` all name the `Pod` kind.
fn kind_matches(requested: &str, kind: &str) -> bool {
    if requested.eq_ignore_ascii_case(kind) {
        return true;
    }
    resources::find_builtin(requested).is_some_and(|rt| rt.kind == kind)
}

pub fn handle_events(session: &Session, args: EventsArgs) -> Result<()> {
    let format = OutputFormat::parse(args.output.as_deref())?;
    let filter = EventFilter::from_args(&args)?;
    let scope = session.scope(&args.scope);
    let resource = resources::find_builtin("events")
        .ok_or_else(|| OmcError::UnknownResource("events".to_string()))?
        .clone();

    let mut events = session.mg.load(&resource.location(), &scope)?;
    events.retain(|e| filter.matches(e));
    events.sort_by_key(kube::event_time);
    log::debug!("{} events after filtering", events.len());

    if format.notes_empty_result() && events.is_empty() {
        eprintln!("{}", no_resources_message(&scope, true));
        return Ok(());
    }

    let opts = TableOptions {
        all_namespaces: args.scope.all_namespaces,
        no_headers: args.no_headers,
        ..Default::default()
    };
    let listing = Listing {
        resource,
        objects: events,
    };
    let out = render_listings(vec![listing], &format, &session.row_context(), &opts, false)?;
    print!("{}", out);
    if matches!(format, OutputFormat::JsonPath(_)) && !out.ends_with('\n') {
        println!();
    }
    Ok(())
}
