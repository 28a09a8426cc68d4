use crate::cli::LogsArgs;
use crate::common::Session;
use crate::error::{OmcError, Result};
use crate::formatter::age::parse_time;
use crate::logs::{self, LogOptions};

pub fn handle_logs(session: &Session, args: LogsArgs) -> Result<()> {
    let pod = args
        .pod
        .strip_prefix("pod/")
        .or_else(|| args.pod.strip_prefix("pods/"))
        .unwrap_or(&args.pod);
    let namespace = args.namespace.as_deref().unwrap_or(&session.project);

    let since = match args.since_time.as_deref() {
        Some(value) => Some(parse_time(value).ok_or_else(|| {
            OmcError::InvalidArgs(format!(
                "invalid --since-time \"{}\", expected an RFC3339 timestamp",
                value
            ))
        })?),
        None => None,
    };
    let options = LogOptions {
        timestamps: args.timestamps,
        tail: args.tail,
        since,
    };

    let containers = logs::pod_containers(&session.mg, namespace, pod)?;
    let selected = logs::select_containers(
        pod,
        &containers,
        args.container.as_deref(),
        args.all_containers,
    )?;
    log::debug!("Printing logs of {:?} in {}/{}", selected, namespace, pod);

    for container in &selected {
        let out = logs::container_log(
            &session.mg,
            namespace,
            pod,
            container,
            args.previous,
            &options,
        )?;
        print!("{}", out);
    }
    Ok(())
}
