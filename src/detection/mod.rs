//! Host environment probing.
//!
//! The [`EnvironmentProber`] inspects the OS identifier and looks for known
//! package-manager executables in a fixed priority order, producing the
//! immutable [`TargetEnvironment`] that every later stage receives.
//!
//! # Example
//!
//! ```
//! use std::path::PathBuf;
//! use tui_install::detection::{
//!     EnvironmentProber, HostOs, OsFamily, PackageManagerKind, PinnedVersion,
//! };
//!
//! let prober = EnvironmentProber::with_lookup(HostOs::new(OsFamily::Linux), |tool: &str| {
//!     (tool == "dnf").then(|| PathBuf::from("/usr/bin/dnf"))
//! });
//! let env = prober.probe(PinnedVersion::default()).unwrap();
//! assert_eq!(env.package_manager, PackageManagerKind::Dnf);
//! ```

pub mod descriptor;
pub mod os;
pub mod package_manager;

pub use descriptor::{PinnedVersion, TargetEnvironment, DEFAULT_REPOSITORY, PINNED_VERSION};
pub use os::{HostOs, OsFamily};
pub use package_manager::{
    detect_package_manager, supported_platforms, DetectedManager, PackageManagerKind,
};

use std::path::PathBuf;

use crate::error::{InstallerError, Result};
use crate::shell::find_on_path;

/// Probes the host for a supported OS / package manager combination.
pub struct EnvironmentProber<F> {
    host: HostOs,
    lookup: F,
}

impl EnvironmentProber<fn(&str) -> Option<PathBuf>> {
    /// Probe the running host using the process PATH.
    pub fn system() -> Self {
        Self {
            host: HostOs::detect(),
            lookup: find_on_path,
        }
    }
}

impl<F> EnvironmentProber<F>
where
    F: Fn(&str) -> Option<PathBuf>,
{
    /// Probe with an explicit host and executable lookup.
    ///
    /// This allows testing without touching the real PATH.
    pub fn with_lookup(host: HostOs, lookup: F) -> Self {
        Self { host, lookup }
    }

    /// The host being probed.
    pub fn host(&self) -> &HostOs {
        &self.host
    }

    /// Find the package manager without building a descriptor.
    pub fn detect_manager(&self) -> Option<DetectedManager> {
        detect_package_manager(&self.host.family, &self.lookup)
    }

    /// Build the Target Environment Descriptor.
    ///
    /// Fails with [`InstallerError::UnsupportedPlatform`] when the OS has no
    /// install path or none of its package managers is installed.
    pub fn probe(&self, pinned: PinnedVersion) -> Result<TargetEnvironment> {
        let Some(manager) = self.detect_manager() else {
            tracing::debug!(
                "No supported package manager found for {}",
                self.host.description
            );
            return Err(InstallerError::UnsupportedPlatform {
                detected: format!("{} (no supported package manager found)", self.host.description),
                supported: supported_platforms(),
            });
        };

        tracing::info!(
            "Detected {} with {} at {}",
            self.host.description,
            manager.kind,
            manager.path.display()
        );

        Ok(TargetEnvironment {
            os: self.host.family.clone(),
            package_manager: manager.kind,
            pinned,
        })
    }
}
