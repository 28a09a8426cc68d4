//! Field access helpers over untyped manifests.

use crate::formatter::age;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;

pub const NONE: &str = "<none>";

/// Walk a chain of object keys.
pub fn at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = value;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn get_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    at(value, path)?.as_str()
}

pub fn get_string(value: &Value, path: &[&str]) -> String {
    get_str(value, path).unwrap_or_default().to_string()
}

pub fn get_i64(value: &Value, path: &[&str]) -> Option<i64> {
    at(value, path)?.as_i64()
}

pub fn get_bool(value: &Value, path: &[&str]) -> Option<bool> {
    at(value, path)?.as_bool()
}

pub fn get_array<'a>(value: &'a Value, path: &[&str]) -> &'a [Value] {
    at(value, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn get_string_map(value: &Value, path: &[&str]) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    if let Some(obj) = at(value, path).and_then(Value::as_object) {
        for (k, v) in obj {
            let v = match v {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            };
            map.insert(k.clone(), v);
        }
    }
    map
}

pub fn get_time(value: &Value, path: &[&str]) -> Option<DateTime<Utc>> {
    age::parse_time(get_str(value, path)?)
}

pub fn name(value: &Value) -> &str {
    get_str(value, &["metadata", "name"]).unwrap_or_default()
}

pub fn namespace(value: &Value) -> Option<&str> {
    get_str(value, &["metadata", "namespace"])
}

pub fn kind(value: &Value) -> &str {
    get_str(value, &["kind"]).unwrap_or_default()
}

pub fn labels(value: &Value) -> BTreeMap<String, String> {
    get_string_map(value, &["metadata", "labels"])
}

pub fn creation_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    get_time(value, &["metadata", "creationTimestamp"])
}

/// `k=v,k2=v2` or `<none>`
pub fn format_map(map: &BTreeMap<String, String>) -> String {
    if map.is_empty() {
        return NONE.to_string();
    }
    map.iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(",")
}

/// Integer field or 0, as a string.
pub fn count(value: &Value, path: &[&str]) -> String {
    get_i64(value, path).unwrap_or(0).to_string()
}

/// Empty strings become `<none>`.
pub fn or_none(s: impl Into<String>) -> String {
    let s = s.into();
    if s.is_empty() { NONE.to_string() } else { s }
}

/// `True` / `False`, as kubectl prints Go booleans.
pub fn title_bool(b: bool) -> String {
    if b { "True" } else { "False" }.to_string()
}

/// The `status.conditions` entry of the given type.
pub fn find_condition<'a>(value: &'a Value, condition: &str) -> Option<&'a Value> {
    get_array(value, &["status", "conditions"])
        .iter()
        .find(|c| get_str(c, &["type"]) == Some(condition))
}

/// Status of the condition (`True`, `False`, `Unknown`) or empty.
pub fn condition_status(value: &Value, condition: &str) -> String {
    find_condition(value, condition)
        .map(|c| get_string(c, &["status"]))
        .unwrap_or_default()
}
