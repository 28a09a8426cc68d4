use crate::cli::EtcdCommand;
use crate::common::Session;
use crate::diagnostics::etcd;

pub fn handle_etcd(session: &Session, command: EtcdCommand) -> crate::Result<()> {
    let table = match command {
        EtcdCommand::Members => etcd::members_table(&etcd::member_list(&session.mg)?),
        EtcdCommand::Health => etcd::health_table(&etcd::endpoint_health(&session.mg)?),
        EtcdCommand::Status => etcd::status_table(&etcd::endpoint_status(&session.mg)?),
    };
    if table.is_empty() {
        eprintln!("No resources found");
        return Ok(());
    }
    print!("{}", table.render(false));
    Ok(())
}
