use crate::cli::NodeRole;
use crate::common::Session;
use crate::error::{OmcError, Result};
use crate::formatter::table::TableData;
use crate::logs::{self, LogOptions};

pub fn handle_node_logs(
    session: &Session,
    service: Option<String>,
    role: Option<NodeRole>,
    tail: Option<usize>,
    list: bool,
) -> Result<()> {
    if list {
        let services = logs::host_services(&session.mg)?;
        if services.is_empty() {
            eprintln!("No node service logs found");
            return Ok(());
        }
        let mut table = TableData::new(vec!["ROLE".to_string(), "SERVICE".to_string()]);
        for (role, service) in services {
            table.push(vec![role, service]);
        }
        print!("{}", table.render(false));
        return Ok(());
    }

    let service = service
        .ok_or_else(|| OmcError::InvalidArgs("a service name is required".to_string()))?;
    let roles: Vec<String> = match role {
        Some(role) => vec![role.dir_name().to_string()],
        None => [NodeRole::Masters, NodeRole::Workers]
            .iter()
            .map(|r| r.dir_name().to_string())
            .collect(),
    };
    let options = LogOptions {
        tail,
        timestamps: true,
        ..Default::default()
    };
    print!(
        "{}",
        logs::host_service_log(&session.mg, &service, &roles, &options)?
    );
    Ok(())
}
