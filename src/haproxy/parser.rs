//! Line scanner for router `haproxy.config` files.

/// A route backend found in the config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backend {
    pub namespace: String,
    pub name: String,
    /// `http`, `edge`, `reencrypt` or `passthrough`
    pub termination: String,
    /// Services behind the route, in order of first appearance
    pub services: Vec<String>,
    /// Port names used by the servers, in order of first appearance
    pub ports: Vec<String>,
    /// `ip:port` of every server
    pub servers: Vec<String>,
}

const SECTIONS: &[&str] = &[
    "global",
    "defaults",
    "frontend",
    "backend",
    "listen",
    "userlist",
    "peers",
    "resolvers",
    "cache",
    "program",
];

/// Termination type from the backend name prefix.
fn termination(prefix: &str) -> Option<&'static str> {
    match prefix {
        "be_http" => Some("http"),
        "be_edge_http" => Some("edge"),
        "be_secure" => Some("reencrypt"),
        "be_tcp" => Some("passthrough"),
        _ => None,
    }
}

/// Parse `be_<type>:<namespace>:<route>`.
fn parse_backend_name(name: &str) -> Option<Backend> {
    let mut parts = name.splitn(3, ':');
    let termination = termination(parts.next()?)?;
    let namespace = parts.next()?;
    let route = parts.next()?;
    if namespace.is_empty() || route.is_empty() {
        return None;
    }
    Some(Backend {
        namespace: namespace.to_string(),
        name: route.to_string(),
        termination: termination.to_string(),
        services: Vec::new(),
        ports: Vec::new(),
        servers: Vec::new(),
    })
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !value.is_empty() && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

/// `server pod:<pod>:<service>:<port-name>:<ip>:<port> <ip>:<port> ...`
fn add_server(backend: &mut Backend, line: &str) {
    let mut fields = line.split_whitespace().skip(1);
    let (Some(id), Some(addr)) = (fields.next(), fields.next()) else {
        return;
    };
    let parts: Vec<&str> = id.split(':').collect();
    if parts.len() >= 4 && parts[0] == "pod" {
        push_unique(&mut backend.services, parts[2]);
        push_unique(&mut backend.ports, parts[3]);
    }
    backend.servers.push(addr.to_string());
}

/// Collect every route backend from the content of a haproxy.config.
pub fn parse_backends(content: &str) -> Vec<Backend> {
    let mut backends = Vec::new();
    let mut current: Option<Backend> = None;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let indented = line.starts_with(char::is_whitespace);
        let keyword = trimmed.split_whitespace().next().unwrap_or_default();
        if !indented && SECTIONS.contains(&keyword) {
            backends.extend(current.take());
            if keyword == "backend" {
                current = trimmed
                    .split_whitespace()
                    .nth(1)
                    .and_then(parse_backend_name);
            }
            continue;
        }

        if keyword == "server" {
            if let Some(backend) = current.as_mut() {
                add_server(backend, trimmed);
            }
        }
    }

    backends.extend(current);
    backends
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = "\
global
  maxconn 20000

defaults
  timeout connect 5s

frontend public
  bind :80
  default_backend openshift_default

backend openshift_default
  mode http
  server dummy 127.0.0.1:8080

# Plain http backend
backend be_http:my-app:frontend
  mode http
  server pod:frontend-1:frontend:8080-tcp:10.128.0.5:8080 10.128.0.5:8080 cookie abc weight 256
  server pod:frontend-2:frontend:8080-tcp:10.129.0.7:8080 10.129.0.7:8080 cookie def weight 256

backend be_edge_http:openshift-console:console
  server pod:console-1:console:https:10.130.0.2:8443 10.130.0.2:8443 weight 256

backend be_secure:openshift-monitoring:alertmanager-main
  server pod:am-0:alertmanager-main:web:10.128.2.9:9095 10.128.2.9:9095
  server pod:am-1:alertmanager-proxy:web:10.131.0.4:9095 10.131.0.4:9095

backend be_tcp:openshift-authentication:oauth-openshift
  server pod:oauth-1:oauth-openshift:6443:10.129.0.3:6443 10.129.0.3:6443

listen stats
  server pod:ignored:x:y:1.1.1.1:1 1.1.1.1:1
";

    #[test]
    fn test_parse_backends() {
        let backends = parse_backends(CONFIG);
        assert_eq!(backends.len(), 4);

        assert_eq!(backends[0].namespace, "my-app");
        assert_eq!(backends[0].name, "frontend");
        assert_eq!(backends[0].termination, "http");
        assert_eq!(backends[0].services, vec!["frontend"]);
        assert_eq!(backends[0].ports, vec!["8080-tcp"]);
        assert_eq!(backends[0].servers, vec!["10.128.0.5:8080", "10.129.0.7:8080"]);

        assert_eq!(backends[1].termination, "edge");
        assert_eq!(backends[2].termination, "reencrypt");
        assert_eq!(
            backends[2].services,
            vec!["alertmanager-main", "alertmanager-proxy"]
        );
        assert_eq!(backends[3].termination, "passthrough");
        assert_eq!(backends[3].name, "oauth-openshift");
    }

    #[test]
    fn test_backend_without_servers() {
        let backends = parse_backends("backend be_http:ns:idle\n  mode http\n");
        assert_eq!(backends.len(), 1);
        assert!(backends[0].services.is_empty());
    }

    #[test]
    fn test_unknown_prefix_is_skipped() {
        assert!(parse_backend_name("be_unknown:ns:route").is_none());
        assert!(parse_backend_name("be_http:ns").is_none());
    }
}
