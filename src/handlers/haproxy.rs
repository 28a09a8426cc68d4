use crate::cli::HaproxyCommand;
use crate::common::{Session, no_resources_message};
use crate::haproxy;

pub fn handle_haproxy(session: &Session, command: HaproxyCommand) -> crate::Result<()> {
    match command {
        HaproxyCommand::Backends { scope, controller } => {
            let scope = session.scope(&scope);
            let backends = haproxy::load_backends(&session.mg, &scope, controller.as_deref())?;
            if backends.is_empty() {
                eprintln!("{}", no_resources_message(&scope, true));
                return Ok(());
            }
            print!("{}", haproxy::backends_table(&backends).render(false));
        }
    }
    Ok(())
}
