use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

pub const DEFAULT_PROJECT: &str = "default";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Must-gathers registered with `omc use`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contexts: Vec<Context>,
}

/// A registered must-gather
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    /// Short identifier used by `omc mg delete`
    pub id: String,
    /// Must-gather root directory
    pub path: PathBuf,
    /// Whether this is the must-gather commands run against
    #[serde(default)]
    pub current: bool,
    /// Default namespace for namespaced commands
    #[serde(default = "default_project")]
    pub project: String,
}

fn default_project() -> String {
    DEFAULT_PROJECT.to_string()
}

/// Derive a short id for a newly registered must-gather path.
///
/// `DefaultHasher` output may change between Rust releases, so the id is
/// only computed once and then read back from the config file.
pub fn context_id(path: &Path) -> String {
    let mut hasher = DefaultHasher::new();
    path.hash(&mut hasher);
    format!("{:016x}", hasher.finish())[..8].to_string()
}

impl Config {
    /// The currently selected context, if any.
    pub fn current(&self) -> Option<&Context> {
        self.contexts.iter().find(|c| c.current)
    }

    pub fn current_mut(&mut self) -> Option<&mut Context> {
        self.contexts.iter_mut().find(|c| c.current)
    }

    /// Register `path` (or refresh an existing entry for it) and make it current.
    pub fn select(&mut self, path: &Path, id: Option<&str>) -> &Context {
        for ctx in &mut self.contexts {
            ctx.current = false;
        }

        let index = match self.contexts.iter().position(|c| c.path == path) {
            Some(index) => {
                if let Some(id) = id {
                    self.contexts[index].id = id.to_string();
                }
                index
            }
            None => {
                self.contexts.push(Context {
                    id: id.map(str::to_string).unwrap_or_else(|| context_id(path)),
                    path: path.to_path_buf(),
                    current: false,
                    project: default_project(),
                });
                self.contexts.len() - 1
            }
        };

        self.contexts[index].current = true;
        &self.contexts[index]
    }

    /// Remove a context by id. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.contexts.len();
        self.contexts.retain(|c| c.id != id);
        before != self.contexts.len()
    }
}
