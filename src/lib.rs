//! tui-install - bootstrap the notcurses native library for the TUI framework.
//!
//! The installer probes the host for a supported OS / package manager pair,
//! installs the system prerequisites, builds the pinned notcurses release
//! from source where the package manager does not ship it, and verifies the
//! result through `pkg-config`.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - `tui-install.yml` loading, validation and layering
//! - [`detection`] - Host and package manager probing
//! - [`deps`] - Package manager strategies
//! - [`build`] - Source fetch, CMake build and install
//! - [`verify`] - Installed version check
//! - [`runner`] - Stage orchestration
//! - [`shell`] - Subprocess execution
//! - [`ui`] - Spinners, summaries and terminal output
//! - [`error`] - Error types and result aliases
//!
//! # Example
//!
//! ```
//! use tui_install::verify::{Version, VersionPolicy};
//!
//! let pinned: Version = "3.0.11".parse().unwrap();
//! let found = Version::extract("notcurses 3.0.12\n").unwrap();
//! assert!(VersionPolicy::AtLeast.accepts(&found, &pinned));
//! assert!(!VersionPolicy::Exact.accepts(&found, &pinned));
//! ```

pub mod build;
pub mod cli;
pub mod config;
pub mod deps;
pub mod detection;
pub mod error;
pub mod runner;
pub mod shell;
pub mod ui;
pub mod verify;

pub use error::{InstallerError, Result};
