//! Configuration validation rules.
//!
//! - The pinned version and repository must not be empty
//! - The pinned version must contain a dotted numeric version
//! - `jobs` must be at least 1

use crate::config::schema::ConfigFile;
use crate::error::{InstallerError, Result};
use crate::verify::Version;

/// A single broken rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Offending key
    pub key: &'static str,
    /// Human-readable error message
    pub message: String,
}

/// Validate a config file and return all errors.
pub fn validate_config(config: &ConfigFile) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(version) = &config.version {
        if version.trim().is_empty() {
            errors.push(ValidationError {
                key: "version",
                message: "version must not be empty".to_string(),
            });
        } else if Version::extract(version).is_none() {
            errors.push(ValidationError {
                key: "version",
                message: format!("version '{}' is not a dotted version number", version),
            });
        }
    }

    if config
        .repository
        .as_deref()
        .is_some_and(|r| r.trim().is_empty())
    {
        errors.push(ValidationError {
            key: "repository",
            message: "repository must not be empty".to_string(),
        });
    }

    if config.jobs == Some(0) {
        errors.push(ValidationError {
            key: "jobs",
            message: "jobs must be at least 1".to_string(),
        });
    }

    errors
}

/// Validate and return Result.
///
/// # Errors
///
/// Returns `ConfigValidation` listing every broken rule.
pub fn validate(config: &ConfigFile) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(InstallerError::ConfigValidation {
            message: messages.join("; "),
        })
    }
}
