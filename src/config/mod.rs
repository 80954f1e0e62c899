//! Configuration loading, validation, and layering.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//! - Layer resolution in [`settings`]
//!
//! # Example
//!
//! ```
//! use std::fs;
//! use tempfile::TempDir;
//! use tui_install::config::{load_config, InstallConfig, Overrides};
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join("tui-install.yml"), "jobs: 4\n").unwrap();
//!
//! let loaded = load_config(None, temp.path()).unwrap();
//! let config = InstallConfig::resolve(loaded.config, Overrides::default(), temp.path()).unwrap();
//! assert_eq!(config.jobs, 4);
//! ```

pub mod loader;
pub mod schema;
pub mod settings;
pub mod validator;

pub use loader::{load_config, load_config_file, parse_config, LoadedConfig, DEFAULT_CONFIG_FILE};
pub use schema::ConfigFile;
pub use settings::{InstallConfig, Overrides, DEFAULT_WORK_DIR};
pub use validator::{validate, validate_config, ValidationError};
