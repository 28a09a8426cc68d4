use crate::cli::AlertCommand;
use crate::common::Session;
use crate::diagnostics::alerts;
use crate::error::{OmcError, Result};
use crate::formatter::{OutputFormat, render_document};

pub fn handle_alert(session: &Session, command: AlertCommand) -> Result<()> {
    let rules = alerts::load_rules(&session.mg)?;
    match command {
        AlertCommand::Rules {
            state,
            group,
            output,
        } => {
            let selected = alerts::alerting_rules(&rules, state.as_deref(), group.as_deref());
            match OutputFormat::parse(output.as_deref())? {
                OutputFormat::Table => {
                    if selected.is_empty() {
                        eprintln!("No resources found");
                        return Ok(());
                    }
                    print!("{}", alerts::rules_table(&selected).render(false));
                }
                format @ (OutputFormat::Json | OutputFormat::Yaml) => {
                    let rules: Vec<_> = selected.into_iter().map(|(_, rule)| rule).collect();
                    let value = serde_json::to_value(&rules)?;
                    print!("{}", render_document(&value, &format)?);
                }
                _ => {
                    return Err(OmcError::InvalidOutput(output.unwrap_or_default()));
                }
            }
        }
        AlertCommand::Groups => {
            let table = alerts::groups_table(&rules);
            if table.is_empty() {
                eprintln!("No resources found");
                return Ok(());
            }
            print!("{}", table.render(false));
        }
    }
    Ok(())
}
