//! Label selectors (`-l app=foo,tier!=db,env in (a,b)`).

use crate::error::{OmcError, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Requirement {
    Equals(String, String),
    NotEquals(String, String),
    Exists(String),
    NotExists(String),
    In(String, Vec<String>),
    NotIn(String, Vec<String>),
}

impl Requirement {
    fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        match self {
            Requirement::Equals(k, v) => labels.get(k) == Some(v),
            Requirement::NotEquals(k, v) => labels.get(k) != Some(v),
            Requirement::Exists(k) => labels.contains_key(k),
            Requirement::NotExists(k) => !labels.contains_key(k),
            Requirement::In(k, values) => labels.get(k).is_some_and(|v| values.contains(v)),
            Requirement::NotIn(k, values) => labels.get(k).is_none_or(|v| !values.contains(v)),
        }
    }
}

/// A parsed label selector. The empty selector matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    requirements: Vec<Requirement>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason: &str| OmcError::InvalidSelector {
            selector: input.to_string(),
            reason: reason.to_string(),
        };

        let mut requirements = Vec::new();
        for term in split_terms(input).map_err(|r| invalid(r))? {
            let term = term.trim();
            if term.is_empty() {
                continue;
            }
            requirements.push(parse_term(term).map_err(|r| invalid(&r))?);
        }

        Ok(Selector { requirements })
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.requirements.iter().all(|r| r.matches(labels))
    }
}

/// Split on commas that are not inside a `( ... )` set.
fn split_terms(input: &str) -> std::result::Result<Vec<&str>, &'static str> {
    let mut terms = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, ch) in input.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1).ok_or("unbalanced parentheses")?;
            }
            ',' if depth == 0 => {
                terms.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err("unbalanced parentheses");
    }
    terms.push(&input[start..]);
    Ok(terms)
}

fn parse_term(term: &str) -> std::result::Result<Requirement, String> {
    if let Some(key) = term.strip_prefix('!') {
        return Ok(Requirement::NotExists(valid_key(key)?));
    }
    if let Some((k, v)) = term.split_once("!=") {
        return Ok(Requirement::NotEquals(valid_key(k)?, v.trim().to_string()));
    }
    if let Some((k, v)) = term.split_once("==") {
        return Ok(Requirement::Equals(valid_key(k)?, v.trim().to_string()));
    }
    if let Some((k, v)) = term.split_once('=') {
        return Ok(Requirement::Equals(valid_key(k)?, v.trim().to_string()));
    }
    if let Some(open) = term.find('(') {
        let head = term[..open].trim();
        let body = term[open + 1..]
            .strip_suffix(')')
            .ok_or_else(|| format!("expected ')' at end of \"{}\"", term))?;
        let values: Vec<String> = body
            .split(',')
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();

        let mut words = head.split_whitespace();
        let key = words.next().ok_or("missing key")?;
        let op = words.next().ok_or("missing operator")?;
        if words.next().is_some() {
            return Err(format!("unexpected token in \"{}\"", term));
        }
        return match op {
            "in" => Ok(Requirement::In(valid_key(key)?, values)),
            "notin" => Ok(Requirement::NotIn(valid_key(key)?, values)),
            other => Err(format!("unknown operator \"{}\"", other)),
        };
    }
    Ok(Requirement::Exists(valid_key(term)?))
}

/// `[prefix/]name`, where prefix is a DNS subdomain.
static LABEL_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*/)?[A-Za-z0-9]([-A-Za-z0-9_.]*[A-Za-z0-9])?$",
    )
    .unwrap()
});

fn valid_key(key: &str) -> std::result::Result<String, String> {
    let key = key.trim();
    if key.is_empty() {
        return Err("empty key".to_string());
    }
    if !LABEL_KEY.is_match(key) {
        return Err(format!("invalid label key \"{}\"", key));
    }
    Ok(key.to_string())
}
