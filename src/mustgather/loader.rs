//! Reading manifests from disk into untyped objects.

use crate::error::{OmcError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Parse the content of a manifest file. Lists are flattened to their items.
pub fn parse_manifests(content: &str, path: &Path) -> Result<Vec<Value>> {
    let mut objects = Vec::new();

    if is_json(path) {
        let value: Value = serde_json::from_str(content)?;
        push_flattened(value, &mut objects);
        return Ok(objects);
    }

    for doc in serde_yaml::Deserializer::from_str(content) {
        let value = Value::deserialize(doc).map_err(|e| OmcError::yaml(path, e))?;
        push_flattened(value, &mut objects);
    }

    Ok(objects)
}

fn push_flattened(value: Value, objects: &mut Vec<Value>) {
    match value {
        Value::Null => {}
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => {
                objects.extend(items.into_iter().filter(|i| !i.is_null()))
            }
            Some(other) => {
                map.insert("items".to_string(), other);
                objects.push(Value::Object(map));
            }
            None => objects.push(Value::Object(map)),
        },
        other => objects.push(other),
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

fn is_manifest(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml") | Some("json")
    )
}

/// Parse a manifest file.
pub fn load_file(path: &Path) -> Result<Vec<Value>> {
    log::debug!("Reading {}", path.display());
    let content = std::fs::read_to_string(path)?;
    parse_manifests(&content, path)
}

/// Read a file that may not exist. Missing files yield no objects.
pub fn load_optional_file(path: &Path) -> Result<Vec<Value>> {
    if path.is_file() {
        load_file(path)
    } else {
        Ok(Vec::new())
    }
}

/// Like [`load_optional_file`], but an unparseable file is logged and skipped.
pub fn load_or_skip(path: &Path) -> Vec<Value> {
    match load_optional_file(path) {
        Ok(objects) => objects,
        Err(e) => {
            log::warn!("Skipping {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Parse every manifest directly inside `dir`, or nested up to `max_depth`.
/// Unparseable files are logged and skipped.
pub fn load_dir(dir: &Path, max_depth: usize) -> Vec<Value> {
    let mut objects = Vec::new();
    if !dir.is_dir() {
        return objects;
    }

    for entry in walkdir::WalkDir::new(dir)
        .max_depth(max_depth)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let entry_path = entry.path();
        if entry_path.is_file() && is_manifest(entry_path) {
            objects.append(&mut load_or_skip(entry_path));
        }
    }

    objects
}

/// Sort objects by (namespace, name), the order kubectl lists them in.
pub fn sort_objects(objects: &mut [Value]) {
    objects.sort_by(|a, b| {
        let key = |v: &Value| {
            (
                v.pointer("/metadata/namespace")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                v.pointer("/metadata/name")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
            )
        };
        key(a).cmp(&key(b))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_list_is_flattened() {
        let yaml = r#"
apiVersion: v1
kind: PodList
items:
- apiVersion: v1
  kind: Pod
  metadata:
    name: a
- apiVersion: v1
  kind: Pod
  metadata:
    name: b
"#;
        let objects = parse_manifests(yaml, Path::new("pods.yaml")).unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[1]["metadata"]["name"], "b");
    }

    #[test]
    fn test_empty_list_and_empty_document() {
        let objects =
            parse_manifests("kind: PodList\nitems: []\n", Path::new("pods.yaml")).unwrap();
        assert!(objects.is_empty());

        let objects = parse_manifests("", Path::new("pods.yaml")).unwrap();
        assert!(objects.is_empty());
    }

    #[test]
    fn test_multi_document_yaml() {
        let yaml = "kind: A\nmetadata: {name: a}\n---\nkind: B\nmetadata: {name: b}\n";
        let objects = parse_manifests(yaml, Path::new("x.yaml")).unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0]["kind"], "A");
    }

    #[test]
    fn test_json_file() {
        let json = r#"{"kind":"List","items":[{"kind":"Node","metadata":{"name":"n1"}}]}"#;
        let objects = parse_manifests(json, Path::new("nodes.json")).unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0]["kind"], "Node");
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let err = parse_manifests("a: [1, 2", Path::new("bad.yaml")).unwrap_err();
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn test_load_dir_skips_bad_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.yaml"), "kind: Node\nmetadata: {name: a}\n").unwrap();
        fs::write(dir.path().join("b.yaml"), "a: [1, 2").unwrap();
        fs::write(dir.path().join("notes.txt"), "kind: Node").unwrap();

        let objects = load_dir(dir.path(), 1);
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0]["metadata"]["name"], "a");
    }

    #[test]
    fn test_sort_objects() {
        let mut objects = vec![
            serde_json::json!({"metadata": {"namespace": "b", "name": "x"}}),
            serde_json::json!({"metadata": {"namespace": "a", "name": "z"}}),
            serde_json::json!({"metadata": {"namespace": "a", "name": "y"}}),
        ];
        sort_objects(&mut objects);
        let names: Vec<_> = objects
            .iter()
            .map(|o| o["metadata"]["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["y", "z", "x"]);
    }
}
