use crate::cli::MgCommand;
use crate::config::{self, Config};
use crate::error::{OmcError, Result};
use crate::formatter::table::TableData;
use crate::mustgather::MustGather;
use crate::resources::extract::get_str;
use colored::Colorize;
use std::path::Path;

/// Cluster facts shown after `omc use`.
#[derive(Debug, Default, PartialEq)]
pub struct Summary {
    pub path: String,
    pub project: String,
    pub api_server_url: Option<String>,
    pub platform: Option<String>,
    pub cluster_id: Option<String>,
}

impl Summary {
    pub fn collect(mg: &MustGather, project: &str) -> Self {
        let infrastructure = mg.cluster_object("config.openshift.io", "infrastructures", "cluster");
        let version = mg.cluster_object("config.openshift.io", "clusterversions", "version");
        let infra_field = |path: &[&str]| {
            infrastructure
                .as_ref()
                .and_then(|i| get_str(i, path))
                .map(str::to_string)
        };
        Self {
            path: mg.root().display().to_string(),
            project: project.to_string(),
            api_server_url: infra_field(&["status", "apiServerURL"]),
            platform: infra_field(&["status", "platformStatus", "type"])
                .or_else(|| infra_field(&["status", "platform"])),
            cluster_id: version
                .as_ref()
                .and_then(|v| get_str(v, &["spec", "clusterID"]))
                .map(str::to_string),
        }
    }

    pub fn render(&self) -> String {
        let unknown = || "<unknown>".to_string();
        let fields = [
            ("Must-Gather", self.path.clone()),
            ("Project", self.project.clone()),
            (
                "ApiServerURL",
                self.api_server_url.clone().unwrap_or_else(unknown),
            ),
            ("Platform", self.platform.clone().unwrap_or_else(unknown)),
            ("ClusterID", self.cluster_id.clone().unwrap_or_else(unknown)),
        ];
        let mut out = String::new();
        for (label, value) in fields {
            out.push_str(&format!("{} {}\n", format!("{:<13}", format!("{}:", label)).bold(), value));
        }
        out
    }
}

/// `omc use [PATH]`
pub fn handle_use(config_path: Option<&Path>, path: Option<&Path>, id: Option<&str>) -> Result<()> {
    let mut config = config::load_config(config_path)?;

    let Some(path) = path else {
        let context = config.current().ok_or(OmcError::NoMustGather)?;
        let mg = MustGather::open(&context.path)?;
        print!("{}", Summary::collect(&mg, &context.project).render());
        return Ok(());
    };

    let mg = MustGather::open(path)?;
    let context = config.select(mg.root(), id).clone();
    config::save_config(&config, config_path)?;
    log::info!("Selected must-gather {} ({})", context.id, context.path.display());
    print!("{}", Summary::collect(&mg, &context.project).render());
    Ok(())
}

pub fn contexts_table(config: &Config) -> TableData {
    let mut table = TableData::new(
        ["CURRENT", "ID", "PATH", "PROJECT"]
            .iter()
            .map(|h| h.to_string())
            .collect(),
    );
    for context in &config.contexts {
        table.push(vec![
            if context.current { "*" } else { "" }.to_string(),
            context.id.clone(),
            context.path.display().to_string(),
            context.project.clone(),
        ]);
    }
    table
}

/// `omc mg list|delete`
pub fn handle_mg(config_path: Option<&Path>, command: MgCommand) -> Result<()> {
    let mut config = config::load_config(config_path)?;
    match command {
        MgCommand::List => {
            if config.contexts.is_empty() {
                eprintln!("No must-gathers registered, run `omc use <path>`");
                return Ok(());
            }
            print!("{}", contexts_table(&config).render(false));
        }
        MgCommand::Delete { id } => {
            if !config.remove(&id) {
                return Err(OmcError::not_found("context", &id, None));
            }
            config::save_config(&config, config_path)?;
            println!("Deleted must-gather {}", id);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_summary_reads_cluster_objects() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp
            .path()
            .join("cluster-scoped-resources/config.openshift.io");
        fs::create_dir_all(dir.join("infrastructures")).unwrap();
        fs::create_dir_all(dir.join("clusterversions")).unwrap();
        fs::write(
            dir.join("infrastructures/cluster.yaml"),
            "kind: Infrastructure\nmetadata:\n  name: cluster\nstatus:\n  apiServerURL: https://api.example.com:6443\n  platformStatus:\n    type: AWS\n",
        )
        .unwrap();
        fs::write(
            dir.join("clusterversions/version.yaml"),
            "kind: ClusterVersion\nmetadata:\n  name: version\nspec:\n  clusterID: 1234-abcd\n",
        )
        .unwrap();

        let mg = MustGather::open(tmp.path()).unwrap();
        let summary = Summary::collect(&mg, "default");
        assert_eq!(
            summary.api_server_url.as_deref(),
            Some("https://api.example.com:6443")
        );
        assert_eq!(summary.platform.as_deref(), Some("AWS"));
        assert_eq!(summary.cluster_id.as_deref(), Some("1234-abcd"));
        let rendered = summary.render();
        assert!(rendered.contains("Project:"));
        assert!(rendered.contains("https://api.example.com:6443"));
    }

    #[test]
    fn test_summary_without_cluster_objects() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("namespaces")).unwrap();
        let mg = MustGather::open(tmp.path()).unwrap();
        let summary = Summary::collect(&mg, "default");
        assert_eq!(summary.platform, None);
        assert!(summary.render().contains("<unknown>"));
    }

    #[test]
    fn test_contexts_table_marks_current() {
        let mut config = Config::default();
        config.select(Path::new("/mg/one"), Some("one"));
        config.select(Path::new("/mg/two"), Some("two"));
        let table = contexts_table(&config);
        assert_eq!(table.rows[0][0], "");
        assert_eq!(table.rows[1][0], "*");
        assert_eq!(table.rows[1][1], "two");
    }
}
