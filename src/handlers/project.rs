use crate::common::Session;
use crate::config;
use crate::error::{OmcError, Result};
use colored::Colorize;
use std::path::Path;

/// `omc project [NAME]`
pub fn handle_project(
    config_path: Option<&Path>,
    mg_override: Option<&Path>,
    name: Option<String>,
) -> Result<()> {
    let session = Session::open(config_path, mg_override)?;
    let Some(name) = name else {
        println!("Using project \"{}\"", session.project);
        return Ok(());
    };

    if mg_override.is_some() {
        return Err(OmcError::InvalidArgs(
            "cannot switch project of a must-gather given with --mg, use -n instead".to_string(),
        ));
    }
    if !session.mg.has_namespace(&name) {
        return Err(OmcError::not_found("namespaces", &name, None));
    }

    let mut config = config::load_config(config_path)?;
    let context = config.current_mut().ok_or(OmcError::NoMustGather)?;
    context.project = name.clone();
    config::save_config(&config, config_path)?;
    println!("Now using project \"{}\"", name);
    Ok(())
}

/// Namespaces with the current one marked.
pub fn project_lines(namespaces: &[String], current: &str) -> Vec<String> {
    namespaces
        .iter()
        .map(|ns| {
            if ns == current {
                format!("  * {}", ns.bold())
            } else {
                format!("    {}", ns)
            }
        })
        .collect()
}

/// `omc projects`
pub fn handle_projects(session: &Session) -> Result<()> {
    let namespaces = session.mg.namespaces()?;
    if namespaces.is_empty() {
        eprintln!("No resources found");
        return Ok(());
    }
    println!("You have access to the following projects:\n");
    for line in project_lines(&namespaces, &session.project) {
        println!("{}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_lines_mark_current() {
        colored::control::set_override(false);
        let namespaces = vec!["default".to_string(), "openshift-etcd".to_string()];
        let lines = project_lines(&namespaces, "openshift-etcd");
        assert_eq!(lines, vec!["    default", "  * openshift-etcd"]);
    }
}
