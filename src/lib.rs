//! # omc
//!
//! Inspect OpenShift must-gathers with `oc`/`kubectl`-like commands.
//!
//! A must-gather is a directory tree of resource manifests, pod logs and
//! diagnostic snapshots collected by `oc adm must-gather`. omc reads that
//! tree and renders it the way the cluster's API would have.
//!
//! ## Features
//!
//! - **Resources**: `get` and `describe` for built-in kinds and any CRD in the must-gather
//! - **Output formats**: tables, `wide`, JSON, YAML, `name` and JSONPath templates
//! - **Logs**: container logs with CRI line handling, node service journals
//! - **Diagnostics**: etcd members/health/status, Prometheus alerting rules, router backends
//!
//! ## Example
//!
//! ```rust,no_run
//! use omc::mustgather::{MustGather, NamespaceScope};
//! use omc::resources;
//! use std::path::Path;
//!
//! # fn main() -> omc::Result<()> {
//! let mg = MustGather::open(Path::new("./must-gather.local.123"))?;
//! let pods = resources::resolve("pods", &mg)?;
//! for pod in mg.load(&pods.location(), &NamespaceScope::All)? {
//!     println!("{}", pod["metadata"]["name"]);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod common;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod formatter;
pub mod handlers;
pub mod haproxy;
pub mod logs;
pub mod mustgather;
pub mod resources;

// Re-export commonly used types and functions
pub use error::{OmcError, Result};
pub use mustgather::MustGather;
use cli::{Cli, Commands};
use common::Session;

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run_command(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    let mg_override = cli.mg.as_deref();
    let session = || Session::open(config_path, mg_override);

    match cli.command {
        Commands::Use { path, id } => {
            handlers::handle_use(config_path, path.as_deref(), id.as_deref())
        }
        Commands::Mg { command } => handlers::handle_mg(config_path, command),
        Commands::Project { name } => handlers::handle_project(config_path, mg_override, name),
        Commands::Projects => handlers::handle_projects(&session()?),
        Commands::Get(args) => handlers::handle_get(&session()?, args),
        Commands::Describe { args, scope } => handlers::handle_describe(&session()?, args, scope),
        Commands::Logs(args) => handlers::handle_logs(&session()?, args),
        Commands::Events(args) => handlers::handle_events(&session()?, args),
        Commands::NodeLogs {
            service,
            role,
            tail,
            list,
        } => handlers::handle_node_logs(&session()?, service, role, tail, list),
        Commands::Etcd { command } => handlers::handle_etcd(&session()?, command),
        Commands::Alert { command } => handlers::handle_alert(&session()?, command),
        Commands::Haproxy { command } => handlers::handle_haproxy(&session()?, command),
        Commands::Version => handlers::handle_version(),
    }
}
