//! Operating system detection.

use serde::Serialize;
use std::fmt;

/// Operating system family of the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Linux,
    #[serde(rename = "macos")]
    MacOs,
    Windows,
    /// Any OS the installer has no install path for.
    Other(String),
}

impl OsFamily {
    /// Map a Rust OS identifier (`std::env::consts::OS`) to a family.
    pub fn from_identifier(os: &str) -> Self {
        match os {
            "linux" => Self::Linux,
            "macos" => Self::MacOs,
            "windows" => Self::Windows,
            other => Self::Other(other.to_string()),
        }
    }

    /// The family of the running process.
    pub fn current() -> Self {
        Self::from_identifier(std::env::consts::OS)
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => f.write_str("Linux"),
            Self::MacOs => f.write_str("macOS"),
            Self::Windows => f.write_str("Windows"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// Identity of the host OS, as seen by this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostOs {
    /// OS family used for install-path selection.
    pub family: OsFamily,

    /// Human readable description (distribution name on Linux).
    pub description: String,
}

impl HostOs {
    /// Create a host description without distribution details.
    pub fn new(family: OsFamily) -> Self {
        let description = family.to_string();
        Self {
            family,
            description,
        }
    }

    /// Detect the running host.
    ///
    /// On Linux the distribution's `PRETTY_NAME` from `/etc/os-release` is
    /// used for display when available.
    pub fn detect() -> Self {
        let family = OsFamily::current();
        let description = match family {
            OsFamily::Linux => std::fs::read_to_string("/etc/os-release")
                .ok()
                .and_then(|content| parse_os_release_name(&content))
                .map(|name| format!("Linux ({})", name)),
            _ => None,
        };

        Self {
            description: description.unwrap_or_else(|| family.to_string()),
            family,
        }
    }
}

/// Extract the distribution name from `/etc/os-release` content.
///
/// Prefers `PRETTY_NAME`, falling back to `NAME`.
pub fn parse_os_release_name(content: &str) -> Option<String> {
    let value = |key: &str| {
        content.lines().find_map(|line| {
            let rest = line.trim().strip_prefix(key)?.strip_prefix('=')?;
            let unquoted = rest.trim().trim_matches('"').trim_matches('\'');
            (!unquoted.is_empty()).then(|| unquoted.to_string())
        })
    };

    value("PRETTY_NAME").or_else(|| value("NAME"))
}
