//! Configuration file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::ConfigFile;
use crate::error::{InstallerError, Result};

/// File name looked up in the current directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "tui-install.yml";

/// A config file and where it came from.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// Parsed contents (all defaults when no file was found).
    pub config: ConfigFile,

    /// File the contents were read from.
    pub path: Option<PathBuf>,
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParse` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            InstallerError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            InstallerError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content.
///
/// An empty document is treated as an empty mapping.
pub fn parse_config(content: &str, source_path: &Path) -> Result<ConfigFile> {
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }

    serde_yaml::from_str(content).map_err(|e| InstallerError::ConfigParse {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load config with optional path override.
///
/// An explicit path must exist. Without one, `tui-install.yml` in
/// `project_root` is used when present.
pub fn load_config(explicit: Option<&Path>, project_root: &Path) -> Result<LoadedConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = project_root.join(DEFAULT_CONFIG_FILE);
            if !candidate.is_file() {
                tracing::debug!("No {} in {}", DEFAULT_CONFIG_FILE, project_root.display());
                return Ok(LoadedConfig::default());
            }
            candidate
        }
    };

    tracing::debug!("Loading config from {}", path.display());
    let config = load_config_file(&path)?;
    Ok(LoadedConfig {
        config,
        path: Some(path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yml");

        let err = load_config(Some(&missing), temp.path()).unwrap_err();

        assert!(matches!(err, InstallerError::ConfigNotFound { path } if path == missing));
    }

    #[test]
    fn implicit_file_is_optional() {
        let temp = TempDir::new().unwrap();

        let loaded = load_config(None, temp.path()).unwrap();

        assert!(loaded.path.is_none());
        assert_eq!(loaded.config, ConfigFile::default());
    }

    #[test]
    fn implicit_file_is_picked_up() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(DEFAULT_CONFIG_FILE), "jobs: 3\n").unwrap();

        let loaded = load_config(None, temp.path()).unwrap();

        assert_eq!(loaded.config.jobs, Some(3));
        assert_eq!(loaded.path, Some(temp.path().join(DEFAULT_CONFIG_FILE)));
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.yml");
        fs::write(&path, "jobs: [unclosed").unwrap();

        let err = load_config(Some(&path), temp.path()).unwrap_err();

        assert!(matches!(err, InstallerError::ConfigParse { .. }));
    }

    #[test]
    fn wrong_type_is_parse_error() {
        let err = parse_config("jobs: many", Path::new("x.yml")).unwrap_err();
        assert!(err.to_string().contains("x.yml"));
    }

    #[test]
    fn empty_file_is_defaults() {
        let config = parse_config("\n", Path::new("empty.yml")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }
}
