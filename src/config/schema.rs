//! Configuration schema for `tui-install.yml`.
//!
//! Every key is optional; a missing key falls back to the built-in default
//! or to a higher layer (environment, command line).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::verify::VersionPolicy;

/// Root structure of `tui-install.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Pinned notcurses version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Git repository the source is cloned from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    /// Directory holding checkouts and build trees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_dir: Option<PathBuf>,

    /// Local source tree used instead of cloning
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<PathBuf>,

    /// Parallel compile jobs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,

    /// How the installed version is compared with the pin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_policy: Option<VersionPolicy>,

    /// Extra arguments for the CMake configure step
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cmake_args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_all_defaults() {
        let config: ConfigFile = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn parses_every_key() {
        let yaml = r#"
version: "3.0.9"
repository: https://example.com/notcurses.git
work_dir: /tmp/work
source_dir: /src/notcurses
jobs: 8
version_policy: exact
cmake_args: ["-DUSE_DOXYGEN=off", "-DUSE_PANDOC=off"]
"#;
        let config: ConfigFile = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.version.as_deref(), Some("3.0.9"));
        assert_eq!(config.work_dir, Some(PathBuf::from("/tmp/work")));
        assert_eq!(config.jobs, Some(8));
        assert_eq!(config.version_policy, Some(VersionPolicy::Exact));
        assert_eq!(config.cmake_args.len(), 2);
    }

    #[test]
    fn policy_uses_kebab_case() {
        let config: ConfigFile = serde_yaml::from_str("version_policy: at-least").unwrap();
        assert_eq!(config.version_policy, Some(VersionPolicy::AtLeast));
    }

    #[test]
    fn serializes_only_set_keys() {
        let config = ConfigFile {
            jobs: Some(2),
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert_eq!(yaml.trim(), "jobs: 2");
    }
}
