//! Resolved installer settings.
//!
//! Layering, later wins: built-in defaults, the YAML config file, then
//! command-line values. Environment variables arrive through the
//! command-line layer (clap reads `TUI_INSTALL_JOBS` and
//! `TUI_INSTALL_WORK_DIR` when the flags are absent).

use std::path::{Path, PathBuf};

use crate::build::{default_jobs, BuildOptions};
use crate::config::schema::ConfigFile;
use crate::config::validator::validate;
use crate::detection::{PinnedVersion, DEFAULT_REPOSITORY, PINNED_VERSION};
use crate::error::{InstallerError, Result};
use crate::verify::VersionPolicy;

/// Work directory used when nothing else sets one, relative to the
/// current directory.
pub const DEFAULT_WORK_DIR: &str = ".tui-install";

/// Values taken from flags or their environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub work_dir: Option<PathBuf>,
    pub jobs: Option<usize>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallConfig {
    pub pinned: PinnedVersion,
    pub policy: VersionPolicy,
    pub work_dir: PathBuf,
    pub source_dir: Option<PathBuf>,
    pub jobs: usize,
    pub cmake_args: Vec<String>,
}

impl InstallConfig {
    /// Merge the layers on top of the built-in defaults.
    ///
    /// Relative paths are resolved against `base_dir`.
    pub fn resolve(file: ConfigFile, overrides: Overrides, base_dir: &Path) -> Result<Self> {
        validate(&file)?;
        if overrides.jobs == Some(0) {
            return Err(InstallerError::ConfigValidation {
                message: "jobs must be at least 1".to_string(),
            });
        }

        let pinned = PinnedVersion::new(
            file.version.unwrap_or_else(|| PINNED_VERSION.to_string()),
            file.repository
                .unwrap_or_else(|| DEFAULT_REPOSITORY.to_string()),
        );
        let work_dir = overrides
            .work_dir
            .or(file.work_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WORK_DIR));
        let jobs = overrides
            .jobs
            .or(file.jobs)
            .unwrap_or_else(default_jobs);

        let config = Self {
            pinned,
            policy: file.version_policy.unwrap_or_default(),
            work_dir: base_dir.join(work_dir),
            source_dir: file.source_dir.map(|dir| base_dir.join(dir)),
            jobs,
            cmake_args: file.cmake_args,
        };
        tracing::debug!("Resolved config: {:?}", config);
        Ok(config)
    }

    /// Inputs for the source builder.
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            work_dir: self.work_dir.clone(),
            source_dir: self.source_dir.clone(),
            jobs: self.jobs,
            cmake_args: self.cmake_args.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file_or_overrides() {
        let config =
            InstallConfig::resolve(ConfigFile::default(), Overrides::default(), Path::new("/p"))
                .unwrap();

        assert_eq!(config.pinned, PinnedVersion::default());
        assert_eq!(config.policy, VersionPolicy::AtLeast);
        assert_eq!(config.work_dir, PathBuf::from("/p/.tui-install"));
        assert!(config.jobs >= 1);
        assert!(config.source_dir.is_none());
    }

    #[test]
    fn file_overrides_defaults() {
        let file = ConfigFile {
            version: Some("3.0.9".to_string()),
            work_dir: Some(PathBuf::from("build-area")),
            jobs: Some(6),
            version_policy: Some(VersionPolicy::Exact),
            source_dir: Some(PathBuf::from("vendor/notcurses")),
            ..Default::default()
        };

        let config = InstallConfig::resolve(file, Overrides::default(), Path::new("/p")).unwrap();

        assert_eq!(config.pinned.version, "3.0.9");
        assert_eq!(config.pinned.repository, DEFAULT_REPOSITORY);
        assert_eq!(config.work_dir, PathBuf::from("/p/build-area"));
        assert_eq!(config.source_dir, Some(PathBuf::from("/p/vendor/notcurses")));
        assert_eq!(config.jobs, 6);
        assert_eq!(config.policy, VersionPolicy::Exact);
    }

    #[test]
    fn overrides_beat_file() {
        let file = ConfigFile {
            work_dir: Some(PathBuf::from("from-file")),
            jobs: Some(6),
            ..Default::default()
        };
        let overrides = Overrides {
            work_dir: Some(PathBuf::from("/abs/from-flag")),
            jobs: Some(2),
        };

        let config = InstallConfig::resolve(file, overrides, Path::new("/p")).unwrap();

        assert_eq!(config.work_dir, PathBuf::from("/abs/from-flag"));
        assert_eq!(config.jobs, 2);
    }

    #[test]
    fn zero_jobs_override_is_invalid() {
        let overrides = Overrides {
            jobs: Some(0),
            ..Default::default()
        };
        let err =
            InstallConfig::resolve(ConfigFile::default(), overrides, Path::new("/p")).unwrap_err();
        assert!(matches!(err, InstallerError::ConfigValidation { .. }));
    }

    #[test]
    fn build_options_carry_settings() {
        let file = ConfigFile {
            jobs: Some(3),
            cmake_args: vec!["-DUSE_DOXYGEN=off".to_string()],
            ..Default::default()
        };
        let config = InstallConfig::resolve(file, Overrides::default(), Path::new("/p")).unwrap();

        let options = config.build_options();
        assert_eq!(options.jobs, 3);
        assert_eq!(options.cmake_args, vec!["-DUSE_DOXYGEN=off"]);
        assert_eq!(options.work_dir, config.work_dir);
    }
}
