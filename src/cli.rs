use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "omc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect OpenShift must-gathers with kubectl-like commands")]
#[command(long_about = "omc reads the manifests, logs and diagnostics captured by `oc adm must-gather` and presents them the way `oc`/`kubectl` would against a live cluster.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file (default: ~/.omc.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Must-gather to inspect, bypassing the selected context
    #[arg(long, global = true, value_name = "DIR", env = "OMC_MUST_GATHER")]
    pub mg: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Select the must-gather to work with, or show the current one
    Use {
        /// Must-gather directory (the extracted archive or the directory inside it)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Id to register the must-gather under
        #[arg(long)]
        id: Option<String>,
    },

    /// Manage known must-gathers
    Mg {
        #[command(subcommand)]
        command: MgCommand,
    },

    /// Switch to another project (namespace), or show the current one
    Project {
        #[arg(value_name = "NAME")]
        name: Option<String>,
    },

    /// List projects (namespaces) in the must-gather
    Projects,

    /// Display one or many resources
    Get(GetArgs),

    /// Show details of a resource or group of resources
    Describe {
        /// TYPE, TYPE/NAME or TYPE NAME
        #[arg(value_name = "RESOURCE", required = true, num_args = 1..=2)]
        args: Vec<String>,

        #[command(flatten)]
        scope: ScopeArgs,
    },

    /// Print the logs of a container in a pod
    Logs(LogsArgs),

    /// List events
    Events(EventsArgs),

    /// Print the journal of a node service (kubelet, crio, ...)
    NodeLogs {
        /// Service name
        #[arg(value_name = "SERVICE", required_unless_present = "list")]
        service: Option<String>,

        /// Only nodes of this role
        #[arg(long, value_enum)]
        role: Option<NodeRole>,

        /// Number of lines from the end of the log to show
        #[arg(long)]
        tail: Option<usize>,

        /// List the collected services instead
        #[arg(long)]
        list: bool,
    },

    /// etcd cluster diagnostics
    Etcd {
        #[command(subcommand)]
        command: EtcdCommand,
    },

    /// Prometheus alerting rules
    Alert {
        #[command(subcommand)]
        command: AlertCommand,
    },

    /// Router (HAProxy) configuration
    Haproxy {
        #[command(subcommand)]
        command: HaproxyCommand,
    },

    /// Print the omc version
    Version,
}

#[derive(Subcommand)]
pub enum MgCommand {
    /// List registered must-gathers
    List,
    /// Forget a registered must-gather
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(Subcommand)]
pub enum EtcdCommand {
    /// Cluster members
    Members,
    /// Endpoint health
    Health,
    /// Endpoint status: leader, DB size, raft indexes
    Status,
}

#[derive(Subcommand)]
pub enum AlertCommand {
    /// Alerting rules and their state
    Rules {
        /// Only rules in this state (firing, pending, inactive)
        #[arg(short, long)]
        state: Option<String>,

        /// Only rules of this group
        #[arg(short, long)]
        group: Option<String>,

        /// Output format: json or yaml
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Rule groups with firing and pending counts
    Groups,
}

#[derive(Subcommand)]
pub enum HaproxyCommand {
    /// Route backends served by the ingress controllers
    Backends {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Only backends of this ingress controller
        #[arg(long)]
        controller: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NodeRole {
    Masters,
    Workers,
}

impl NodeRole {
    pub fn dir_name(&self) -> &'static str {
        match self {
            NodeRole::Masters => "masters",
            NodeRole::Workers => "workers",
        }
    }
}

/// `-n` / `-A`, shared by namespaced commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ScopeArgs {
    /// Namespace to look in (default: the current project)
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Look in all namespaces
    #[arg(short = 'A', long)]
    pub all_namespaces: bool,
}

#[derive(Args, Debug, Clone)]
pub struct GetArgs {
    /// TYPE[,TYPE...] [NAME...] or TYPE/NAME...
    #[arg(value_name = "RESOURCE", required = true)]
    pub resources: Vec<String>,

    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Output format: wide, json, yaml, name, jsonpath=...
    #[arg(short, long)]
    pub output: Option<String>,

    /// Label selector, e.g. `app=etcd,tier!=db`
    #[arg(short = 'l', long)]
    pub selector: Option<String>,

    /// Show labels as the last column
    #[arg(long)]
    pub show_labels: bool,

    /// Do not print headers
    #[arg(long)]
    pub no_headers: bool,
}

#[derive(Args, Debug, Clone)]
pub struct LogsArgs {
    /// POD or pod/POD
    #[arg(value_name = "POD")]
    pub pod: String,

    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Container name
    #[arg(short, long)]
    pub container: Option<String>,

    /// Print the log of the previous container instance
    #[arg(short, long)]
    pub previous: bool,

    /// Print the logs of every container in the pod
    #[arg(long, conflicts_with = "container")]
    pub all_containers: bool,

    /// Keep the timestamp of every line
    #[arg(long)]
    pub timestamps: bool,

    /// Number of lines from the end of the log to show
    #[arg(long)]
    pub tail: Option<usize>,

    /// Only lines logged at or after this RFC3339 time
    #[arg(long, value_name = "TIME")]
    pub since_time: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct EventsArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Only events of this type (Normal, Warning)
    #[arg(long = "type", value_name = "TYPE")]
    pub event_type: Option<String>,

    /// Only events with this reason
    #[arg(long)]
    pub reason: Option<String>,

    /// Only events about this object, as KIND/NAME
    #[arg(long = "for", value_name = "KIND/NAME")]
    pub for_object: Option<String>,

    /// Output format: wide, json, yaml, name, jsonpath=...
    #[arg(short, long)]
    pub output: Option<String>,

    /// Do not print headers
    #[arg(long)]
    pub no_headers: bool,
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_get() {
        let cli = Cli::parse_from([
            "omc", "get", "pods", "etcd-0", "-n", "openshift-etcd", "-o", "wide",
        ]);
        let Commands::Get(args) = cli.command else {
            panic!("expected get");
        };
        assert_eq!(args.resources, vec!["pods", "etcd-0"]);
        assert_eq!(args.scope.namespace.as_deref(), Some("openshift-etcd"));
        assert_eq!(args.output.as_deref(), Some("wide"));
    }

    #[test]
    fn test_parse_logs_and_globals() {
        let cli = Cli::parse_from([
            "omc", "--mg", "/tmp/mg", "-vv", "logs", "etcd-0", "-c", "etcd", "--tail", "5",
        ]);
        assert_eq!(cli.mg, Some(PathBuf::from("/tmp/mg")));
        assert_eq!(cli.verbose, 2);
        let Commands::Logs(args) = cli.command else {
            panic!("expected logs");
        };
        assert_eq!(args.container.as_deref(), Some("etcd"));
        assert_eq!(args.tail, Some(5));
    }

    #[test]
    fn test_node_logs_requires_service_or_list() {
        assert!(Cli::try_parse_from(["omc", "node-logs"]).is_err());
        assert!(Cli::try_parse_from(["omc", "node-logs", "--list"]).is_ok());
    }
}
