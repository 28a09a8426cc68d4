//! etcd snapshots taken by must-gather with `etcdctl ... -w json`.

use crate::error::Result;
use crate::formatter::table::TableData;
use crate::mustgather::MustGather;
use serde::{Deserialize, Serialize};

pub const MEMBER_LIST_FILE: &str = "member_list.json";
pub const ENDPOINT_HEALTH_FILE: &str = "endpoint_health.json";
pub const ENDPOINT_STATUS_FILE: &str = "endpoint_status.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberList {
    #[serde(default)]
    pub header: Header,
    #[serde(default)]
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub cluster_id: u64,
    #[serde(default)]
    pub member_id: u64,
    #[serde(default)]
    pub revision: i64,
    #[serde(default)]
    pub raft_term: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "ID", default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "peerURLs", default)]
    pub peer_urls: Vec<String>,
    #[serde(rename = "clientURLs", default)]
    pub client_urls: Vec<String>,
    #[serde(rename = "isLearner", default)]
    pub is_learner: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointHealth {
    pub endpoint: String,
    #[serde(default)]
    pub health: bool,
    #[serde(default)]
    pub took: String,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointStatus {
    #[serde(rename = "Endpoint")]
    pub endpoint: String,
    #[serde(rename = "Status", default)]
    pub status: Status,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    #[serde(default)]
    pub header: Header,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub db_size: u64,
    #[serde(default)]
    pub leader: u64,
    #[serde(default)]
    pub raft_index: u64,
    #[serde(default)]
    pub raft_term: u64,
    #[serde(default)]
    pub raft_applied_index: u64,
    #[serde(default)]
    pub db_size_in_use: u64,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub is_learner: bool,
}

pub fn member_list(mg: &MustGather) -> Result<MemberList> {
    mg.read_json(&mg.layout().etcd_snapshot(MEMBER_LIST_FILE))
}

pub fn endpoint_health(mg: &MustGather) -> Result<Vec<EndpointHealth>> {
    mg.read_json(&mg.layout().etcd_snapshot(ENDPOINT_HEALTH_FILE))
}

pub fn endpoint_status(mg: &MustGather) -> Result<Vec<EndpointStatus>> {
    mg.read_json(&mg.layout().etcd_snapshot(ENDPOINT_STATUS_FILE))
}

/// Byte counts in SI units, as etcdctl prints them: `25 kB`, `1.5 MB`.
pub fn humanize_bytes(bytes: u64) -> String {
    const UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];
    if bytes < 10 {
        return format!("{} B", bytes);
    }
    let exp = ((bytes as f64).ln() / 1000f64.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    let value = (bytes as f64 / 1000f64.powi(exp as i32) * 10.0 + 0.5).floor() / 10.0;
    if value < 10.0 {
        format!("{:.1} {}", value, UNITS[exp])
    } else {
        format!("{:.0} {}", value, UNITS[exp])
    }
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|h| h.to_string()).collect()
}

pub fn members_table(list: &MemberList) -> TableData {
    let mut data = TableData::new(headers(&[
        "ID",
        "STATUS",
        "NAME",
        "PEER ADDRS",
        "CLIENT ADDRS",
        "IS LEARNER",
    ]));
    for m in &list.members {
        let status = if m.name.is_empty() {
            "unstarted"
        } else {
            "started"
        };
        data.push(vec![
            format!("{:x}", m.id),
            status.to_string(),
            m.name.clone(),
            m.peer_urls.join(","),
            m.client_urls.join(","),
            m.is_learner.to_string(),
        ]);
    }
    data
}

pub fn health_table(health: &[EndpointHealth]) -> TableData {
    let mut data = TableData::new(headers(&["ENDPOINT", "HEALTH", "TOOK", "ERROR"]));
    for h in health {
        data.push(vec![
            h.endpoint.clone(),
            h.health.to_string(),
            h.took.clone(),
            h.error.clone().unwrap_or_default(),
        ]);
    }
    data
}

pub fn status_table(status: &[EndpointStatus]) -> TableData {
    let mut data = TableData::new(headers(&[
        "ENDPOINT",
        "ID",
        "VERSION",
        "DB SIZE",
        "DB SIZE IN USE",
        "IS LEADER",
        "IS LEARNER",
        "RAFT TERM",
        "RAFT INDEX",
        "RAFT APPLIED INDEX",
        "ERRORS",
    ]));
    for e in status {
        let s = &e.status;
        data.push(vec![
            e.endpoint.clone(),
            format!("{:x}", s.header.member_id),
            s.version.clone(),
            humanize_bytes(s.db_size),
            humanize_bytes(s.db_size_in_use),
            (s.header.member_id != 0 && s.header.member_id == s.leader).to_string(),
            s.is_learner.to_string(),
            s.raft_term.to_string(),
            s.raft_index.to_string(),
            s.raft_applied_index.to_string(),
            s.errors.join(", "),
        ]);
    }
    data
}
