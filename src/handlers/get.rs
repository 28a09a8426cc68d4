use crate::cli::GetArgs;
use crate::common::{Session, no_resources_message};
use crate::error::{OmcError, Result};
use crate::formatter::{Listing, OutputFormat, TableOptions, render_listings};
use crate::mustgather::Selector;
use crate::resources::{self, extract};

/// What `omc get` was asked for: a type and optionally specific names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub type_name: String,
    pub names: Vec<String>,
}

/// Split `get` arguments into per-type requests.
///
/// Accepts `TYPE[,TYPE] [NAME...]` or `TYPE/NAME [TYPE/NAME...]`.
pub fn parse_requests(args: &[String]) -> Result<Vec<Request>> {
    let Some(first) = args.first() else {
        return Err(OmcError::InvalidArgs(
            "you must specify the type of resource to get".to_string(),
        ));
    };

    if first.contains('/') {
        let mut requests: Vec<Request> = Vec::new();
        for arg in args {
            let (type_name, name) = arg.split_once('/').ok_or_else(|| {
                OmcError::InvalidArgs(format!(
                    "there is no need to specify a resource type as a separate argument when passing arguments in resource/name form (e.g. 'omc get resource/<resource_name>' instead of 'omc get resource resource/<resource_name>'): {}",
                    arg
                ))
            })?;
            match requests.iter_mut().find(|r| r.type_name == type_name) {
                Some(request) => request.names.push(name.to_string()),
                None => requests.push(Request {
                    type_name: type_name.to_string(),
                    names: vec![name.to_string()],
                }),
            }
        }
        return Ok(requests);
    }

    let names: Vec<String> = args[1..].to_vec();
    let types = resources::expand_types(first);
    if types.len() > 1 && !names.is_empty() {
        return Err(OmcError::InvalidArgs(
            "names cannot be combined with several resource types, use TYPE/NAME instead"
                .to_string(),
        ));
    }
    Ok(types
        .into_iter()
        .map(|type_name| Request {
            type_name,
            names: names.clone(),
        })
        .collect())
}

pub fn handle_get(session: &Session, args: GetArgs) -> Result<()> {
    let format = OutputFormat::parse(args.output.as_deref())?;
    let selector = Selector::parse(args.selector.as_deref().unwrap_or_default())?;
    let requests = parse_requests(&args.resources)?;
    let scope = session.scope(&args.scope);

    let mut listings = Vec::new();
    let mut requested_names = 0;
    for request in &requests {
        let resource = resources::resolve(&request.type_name, &session.mg)?;
        let mut objects = session.mg.load(&resource.location(), &scope)?;
        log::debug!(
            "Loaded {} {} from {:?}",
            objects.len(),
            resource.qualified_plural(),
            scope
        );

        if !selector.is_empty() {
            objects.retain(|o| selector.matches(&extract::labels(o)));
        }
        if !request.names.is_empty() {
            requested_names += request.names.len();
            let mut picked = Vec::with_capacity(request.names.len());
            for name in &request.names {
                let found = objects
                    .iter()
                    .find(|o| extract::name(o) == name.as_str())
                    .cloned();
                match found {
                    Some(object) => picked.push(object),
                    None => {
                        let namespace = if resource.namespaced {
                            scope.namespace()
                        } else {
                            None
                        };
                        return Err(OmcError::not_found(
                            &resource.qualified_plural(),
                            name,
                            namespace,
                        ));
                    }
                }
            }
            objects = picked;
        }
        listings.push(Listing { resource, objects });
    }

    if format.notes_empty_result() && listings.iter().all(|l| l.objects.is_empty()) {
        let namespaced = listings.iter().any(|l| l.resource.namespaced);
        eprintln!("{}", no_resources_message(&scope, namespaced));
        return Ok(());
    }

    let opts = TableOptions {
        wide: false,
        all_namespaces: args.scope.all_namespaces,
        show_labels: args.show_labels,
        no_headers: args.no_headers,
        with_kind: requests.len() > 1,
    };
    let single = requests.len() == 1 && requested_names == 1;
    let out = render_listings(listings, &format, &session.row_context(), &opts, single)?;
    print!("{}", out);
    if matches!(format, OutputFormat::JsonPath(_)) && !out.ends_with('\n') {
        println!();
    }
    Ok(())
}
