//! Prometheus rules snapshot (`/api/v1/rules` response saved as rules.json).

use crate::error::Result;
use crate::formatter::table::TableData;
use crate::mustgather::MustGather;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub data: RulesData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesData {
    #[serde(default)]
    pub groups: Vec<RuleGroup>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleGroup {
    pub name: String,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub interval: f64,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    /// `alerting` or `recording`
    #[serde(rename = "type", default)]
    pub rule_type: String,
    /// `firing`, `pending` or `inactive`; absent on recording rules
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    #[serde(default)]
    pub alerts: Vec<Value>,
    #[serde(default)]
    pub health: String,
}

impl Rule {
    pub fn is_alerting(&self) -> bool {
        self.rule_type == "alerting"
    }

    pub fn severity(&self) -> &str {
        self.labels.get("severity").map(String::as_str).unwrap_or("")
    }
}

pub fn load_rules(mg: &MustGather) -> Result<RulesResponse> {
    mg.read_json(&mg.layout().prometheus_rules())
}

/// Alerting rules matching the optional state and group filters, with their group name.
pub fn alerting_rules<'a>(
    rules: &'a RulesResponse,
    state: Option<&str>,
    group: Option<&str>,
) -> Vec<(&'a str, &'a Rule)> {
    rules
        .data
        .groups
        .iter()
        .filter(|g| group.is_none_or(|name| g.name == name))
        .flat_map(|g| g.rules.iter().map(move |r| (g.name.as_str(), r)))
        .filter(|(_, r)| r.is_alerting())
        .filter(|(_, r)| state.is_none_or(|s| r.state.eq_ignore_ascii_case(s)))
        .collect()
}

pub fn rules_table(rules: &[(&str, &Rule)]) -> TableData {
    let mut data = TableData::new(
        ["GROUP", "RULE", "STATE", "SEVERITY", "ALERTS ACTIVE"]
            .iter()
            .map(|h| h.to_string())
            .collect(),
    );
    for (group, rule) in rules {
        data.push(vec![
            group.to_string(),
            rule.name.clone(),
            rule.state.clone(),
            rule.severity().to_string(),
            rule.alerts.len().to_string(),
        ]);
    }
    data
}

pub fn groups_table(rules: &RulesResponse) -> TableData {
    let mut data = TableData::new(
        ["GROUP", "RULES", "FIRING", "PENDING", "INTERVAL"]
            .iter()
            .map(|h| h.to_string())
            .collect(),
    );
    for group in &rules.data.groups {
        let count = |state: &str| group.rules.iter().filter(|r| r.state == state).count();
        data.push(vec![
            group.name.clone(),
            group.rules.len().to_string(),
            count("firing").to_string(),
            count("pending").to_string(),
            format!("{}s", group.interval),
        ]);
    }
    data
}
