pub mod types;

use crate::error::{OmcError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub use types::{Config, Context, DEFAULT_PROJECT};

const CONFIG_FILE_NAME: &str = ".omc.toml";

/// Get the global config file path (~/.omc.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => global_config_path()
            .ok_or_else(|| OmcError::Config("unable to locate home directory".to_string())),
    }
}

/// Load configuration from `path` or the global config file.
/// A missing file yields the default configuration.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = resolve_path(path)?;
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)?;
    toml::from_str(&content)
        .map_err(|e| OmcError::Config(format!("{}: {}", path.display(), e)))
}

/// Save configuration to `path` or the global config file.
pub fn save_config(config: &Config, path: Option<&Path>) -> Result<()> {
    let path = resolve_path(path)?;
    let content =
        toml::to_string_pretty(config).map_err(|e| OmcError::Config(e.to_string()))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    log::debug!("Saved config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = load_config(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("omc.toml");

        let mut config = Config::default();
        config.select(Path::new("/mg/one"), Some("one"));
        save_config(&config, Some(&path)).unwrap();

        let loaded = load_config(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("omc.toml");
        fs::write(&path, "contexts = 3").unwrap();
        assert!(matches!(load_config(Some(&path)), Err(OmcError::Config(_))));
    }
}
