use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::AppConfig;

/// File name looked up in the working directory
pub const CONFIG_FILE: &str = "chime.toml";

/// Error type for config file I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("could not serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{} already exists (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),
}

/// Which file to load: the explicit path, else `chime.toml` in `dir` when it
/// exists, else none (built-in defaults).
pub fn resolve_path(explicit: Option<&Path>, dir: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = dir.join(CONFIG_FILE);
    local.is_file().then_some(local)
}

/// Parse one config file.
pub fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load the effective config and report where it came from.
pub fn load_config(
    explicit: Option<&Path>,
    dir: &Path,
) -> Result<(AppConfig, Option<PathBuf>), ConfigError> {
    match resolve_path(explicit, dir) {
        Some(path) => {
            let config = read_config(&path)?;
            tracing::info!(path = %path.display(), "loaded config");
            Ok((config, Some(path)))
        }
        None => {
            tracing::debug!("no config file, using defaults");
            Ok((AppConfig::default(), None))
        }
    }
}

pub fn default_config_text() -> Result<String, ConfigError> {
    Ok(toml::to_string(&AppConfig::default())?)
}

/// Write the default config to `path`. Refuses to replace an existing file
/// unless `force` is set.
pub fn write_default_config(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }
    let text = default_config_text()?;
    fs::write(path, text).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_local_file_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let (config, path) = load_config(None, tmp.path()).unwrap();
        assert!(path.is_none());
        assert_eq!(config.members.len(), 5);
    }

    #[test]
    fn local_file_is_picked_up() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[user]\nname = \"Dea Ananda\"\n",
        )
        .unwrap();
        let (config, path) = load_config(None, tmp.path()).unwrap();
        assert_eq!(config.user.name, "Dea Ananda");
        assert_eq!(path, Some(tmp.path().join(CONFIG_FILE)));
    }

    #[test]
    fn explicit_path_wins_and_must_exist() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.toml");
        let err = load_config(Some(&missing), tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
        assert!(err.to_string().contains("nope.toml"));
    }

    #[test]
    fn parse_error_names_the_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        fs::write(&path, "[user\nname = ").unwrap();
        let err = read_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().starts_with("could not parse"));
    }

    #[test]
    fn default_text_round_trips() {
        let text = default_config_text().unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.members, AppConfig::default().members);
        assert_eq!(parsed.user.name, "Jason Duong");
        assert!(text.contains("[[members]]"));
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        write_default_config(&path, false).unwrap();
        let err = write_default_config(&path, false).unwrap_err();
        assert!(matches!(err, ConfigError::AlreadyExists(_)));
        fs::write(&path, "junk").unwrap();
        write_default_config(&path, true).unwrap();
        assert!(read_config(&path).is_ok());
    }
}
