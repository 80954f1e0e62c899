//! Error types for installer operations.
//!
//! This module defines [`InstallerError`], the error type used throughout
//! the installer, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Every pipeline failure maps to exactly one [`Stage`] via
//!   [`InstallerError::stage`], so the binary can name the failed stage
//! - Subprocess failures carry the command, exit code and captured output
//! - Use `anyhow::Error` (via `InstallerError::Other`) for unexpected errors

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::runner::Stage;

/// Core error type for installer operations.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// No known OS / package manager combination was found.
    #[error("Unsupported platform: {detected}")]
    UnsupportedPlatform {
        detected: String,
        supported: Vec<String>,
    },

    /// The package manager exited non-zero while installing prerequisites.
    #[error("Dependency installation failed ({}): {command}", ExitCode(.code))]
    Install {
        command: String,
        code: Option<i32>,
        output: String,
    },

    /// Fetching, configuring, compiling or installing the library failed.
    #[error("Build failed during {step} ({}): {command}", ExitCode(.code))]
    Build {
        step: BuildStep,
        command: String,
        code: Option<i32>,
        output: String,
    },

    /// The installed library is missing or older than the pinned version.
    #[error("Verification failed: expected notcurses {expected}, found {}", .found.as_deref().unwrap_or("nothing"))]
    Verification {
        expected: String,
        found: Option<String>,
    },

    /// Explicitly requested config file does not exist.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Config file is not valid YAML for the expected schema.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Config values are out of range.
    #[error("Invalid configuration: {message}")]
    ConfigValidation { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InstallerError {
    /// The pipeline stage this error belongs to, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::UnsupportedPlatform { .. } => Some(Stage::Probing),
            Self::Install { .. } => Some(Stage::Installing),
            Self::Build { .. } => Some(Stage::Building),
            Self::Verification { .. } => Some(Stage::Verifying),
            _ => None,
        }
    }

    /// Captured subprocess output, when the error came from one.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Install { output, .. } | Self::Build { output, .. } if !output.is_empty() => {
                Some(output.as_str())
            }
            _ => None,
        }
    }

    /// The failing command line, when the error came from a subprocess.
    pub fn command(&self) -> Option<&str> {
        match self {
            Self::Install { command, .. } | Self::Build { command, .. } => Some(command.as_str()),
            _ => None,
        }
    }
}

/// Step of the source build that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep {
    Fetch,
    Configure,
    Compile,
    Install,
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetch => "fetch",
            Self::Configure => "configure",
            Self::Compile => "compile",
            Self::Install => "install",
        };
        f.write_str(name)
    }
}

/// Displays an optional exit code the way users expect to read it.
struct ExitCode<'a>(&'a Option<i32>);

impl fmt::Display for ExitCode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self.0 {
            Some(code) => write!(f, "exit code {}", code),
            None => f.write_str("could not run or was terminated"),
        }
    }
}

/// Result type alias for installer operations.
pub type Result<T> = std::result::Result<T, InstallerError>;
