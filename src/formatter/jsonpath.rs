//! kubectl JSONPath templates: `{.items[*].metadata.name}`, `{range .items[*]}...{end}`.
//!
//! Path evaluation is delegated to `jsonpath_lib`; this module handles the
//! template syntax around it.

use crate::error::{OmcError, Result};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Path(String),
    Range(String, Vec<Node>),
}

/// A parsed template, reusable across objects.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    source: String,
    nodes: Vec<Node>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self> {
        let mut body = source.trim();
        if body.len() >= 2 && body.starts_with('\'') && body.ends_with('\'') {
            body = &body[1..body.len() - 1];
        }
        let wrapped;
        if !body.contains('{') {
            wrapped = format!("{{{}}}", body);
            body = &wrapped;
        }

        let err = |reason: String| OmcError::JsonPath {
            template: source.to_string(),
            reason,
        };

        // Stack of (range path, children) for open `{range}` blocks.
        let mut stack: Vec<(Option<String>, Vec<Node>)> = vec![(None, Vec::new())];
        for token in tokenize(body).map_err(err)? {
            match token {
                Token::Text(text) => current(&mut stack).push(Node::Text(text)),
                Token::Action(action) => {
                    let action = action.trim();
                    if action == "end" {
                        if stack.len() < 2 {
                            return Err(err("unexpected {end}".to_string()));
                        }
                        let (path, children) = stack.pop().unwrap_or_default();
                        let path = path.unwrap_or_default();
                        current(&mut stack).push(Node::Range(path, children));
                    } else if let Some(path) = action.strip_prefix("range ") {
                        stack.push((Some(path.trim().to_string()), Vec::new()));
                    } else if action.starts_with('"') {
                        let text: String = serde_json::from_str(action)
                            .map_err(|e| err(format!("invalid string literal {}: {}", action, e)))?;
                        current(&mut stack).push(Node::Text(text));
                    } else if action.is_empty() {
                        return Err(err("empty expression".to_string()));
                    } else {
                        current(&mut stack).push(Node::Path(action.to_string()));
                    }
                }
            }
        }

        if stack.len() != 1 {
            return Err(err("unclosed {range}".to_string()));
        }
        let (_, nodes) = stack.pop().unwrap_or_default();
        Ok(Template {
            source: source.to_string(),
            nodes,
        })
    }

    /// Render the template against `value`.
    pub fn render(&self, value: &Value) -> Result<String> {
        let mut out = String::new();
        render_nodes(&self.nodes, value, &mut out).map_err(|reason| OmcError::JsonPath {
            template: self.source.clone(),
            reason,
        })?;
        Ok(out)
    }
}

fn current(stack: &mut [(Option<String>, Vec<Node>)]) -> &mut Vec<Node> {
    let last = stack.len() - 1;
    &mut stack[last].1
}

enum Token {
    Text(String),
    Action(String),
}

/// Split into literal text and `{...}` actions. Braces inside quotes do not count.
fn tokenize(input: &str) -> std::result::Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut chars = input.chars();

    while let Some(ch) = chars.next() {
        if ch != '{' {
            text.push(ch);
            continue;
        }
        if !text.is_empty() {
            tokens.push(Token::Text(std::mem::take(&mut text)));
        }

        let mut action = String::new();
        let mut quote: Option<char> = None;
        let mut escaped = false;
        let mut closed = false;
        for c in chars.by_ref() {
            if let Some(q) = quote {
                action.push(c);
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
                continue;
            }
            match c {
                '"' | '\'' => {
                    quote = Some(c);
                    action.push(c);
                }
                '}' => {
                    closed = true;
                    break;
                }
                _ => action.push(c),
            }
        }
        if !closed {
            return Err("unclosed action".to_string());
        }
        tokens.push(Token::Action(action));
    }

    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }
    Ok(tokens)
}

fn render_nodes(nodes: &[Node], value: &Value, out: &mut String) -> std::result::Result<(), String> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Path(path) => {
                let results = select(value, path)?;
                let rendered: Vec<String> = results.iter().map(|v| render_value(v)).collect();
                out.push_str(&rendered.join(" "));
            }
            Node::Range(path, children) => {
                let results = select(value, path)?;
                let items: Vec<&Value> = match single_array(&results) {
                    Some(array) => array.iter().collect(),
                    None => results,
                };
                for item in items {
                    render_nodes(children, item, out)?;
                }
            }
        }
    }
    Ok(())
}

/// `{range .items}` iterates the array itself.
fn single_array<'a>(results: &[&'a Value]) -> Option<&'a Vec<Value>> {
    match results {
        [only] => only.as_array(),
        _ => None,
    }
}

/// Evaluate a kubectl-style path (`.status.phase`, `.items[*].metadata.name`) against `value`.
pub fn select<'a>(value: &'a Value, path: &str) -> std::result::Result<Vec<&'a Value>, String> {
    let path = path.trim();
    if matches!(path, "" | "." | "$" | "@") {
        return Ok(vec![value]);
    }

    let expr = if path.starts_with('$') {
        path.to_string()
    } else if let Some(rest) = path.strip_prefix('@') {
        format!("${}", rest)
    } else if path.starts_with('.') || path.starts_with('[') {
        format!("${}", path)
    } else {
        format!("$.{}", path)
    };

    jsonpath_lib::select(value, &expr).map_err(|e| format!("{:?}", e))
}

/// Strings print raw, everything else as compact JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
