//! The target environment descriptor handed to every pipeline stage.

use serde::Serialize;

use super::os::OsFamily;
use super::package_manager::PackageManagerKind;

/// notcurses release this installer builds and verifies by default.
pub const PINNED_VERSION: &str = "3.0.11";

/// Upstream repository the pinned release is fetched from.
pub const DEFAULT_REPOSITORY: &str = "https://github.com/dankamongmen/notcurses.git";

/// The pinned native library release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinnedVersion {
    /// Version string as reported by pkg-config (e.g. `3.0.11`).
    pub version: String,

    /// Git repository holding the source.
    pub repository: String,
}

impl PinnedVersion {
    /// Pin a version from the given repository.
    pub fn new(version: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            repository: repository.into(),
        }
    }

    /// Release tag to check out (`v<version>`).
    pub fn tag(&self) -> String {
        format!("v{}", self.version)
    }
}

impl Default for PinnedVersion {
    fn default() -> Self {
        Self::new(PINNED_VERSION, DEFAULT_REPOSITORY)
    }
}

/// Target Environment Descriptor.
///
/// Built once by the prober and never mutated. Each stage receives it
/// explicitly instead of re-probing the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetEnvironment {
    pub os: OsFamily,
    pub package_manager: PackageManagerKind,
    pub pinned: PinnedVersion,
}
