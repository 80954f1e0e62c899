//! Post-install verification through `pkg-config`.

pub mod version;

pub use version::{Version, VersionPolicy};

use crate::detection::PinnedVersion;
use crate::error::{InstallerError, Result};
use crate::shell::{CommandRunner, Invocation};

/// pkg-config module name of the native library.
pub const PKG_CONFIG_MODULE: &str = "notcurses";

/// Outcome of a version query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    /// Version reported by pkg-config, if the library was found.
    pub detected: Option<String>,

    /// Whether the detected version satisfies the pin.
    pub satisfied: bool,
}

impl Verification {
    /// Convert an unsatisfied result into [`InstallerError::Verification`].
    pub fn into_result(self, pinned: &PinnedVersion) -> Result<String> {
        match self {
            Self {
                detected: Some(found),
                satisfied: true,
            } => Ok(found),
            Self { detected, .. } => Err(InstallerError::Verification {
                expected: pinned.version.clone(),
                found: detected,
            }),
        }
    }
}

/// Queries the installed library version.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verifier {
    policy: VersionPolicy,
}

impl Verifier {
    /// Create a verifier with the given policy.
    pub fn new(policy: VersionPolicy) -> Self {
        Self { policy }
    }

    /// The `pkg-config` query used for verification.
    pub fn query() -> Invocation {
        Invocation::new("pkg-config")
            .args(["--modversion", PKG_CONFIG_MODULE])
            .query()
    }

    /// Ask pkg-config for the installed version and compare with `pinned`.
    ///
    /// A missing pkg-config, an unknown module or unparseable output all
    /// count as "not detected" rather than an error.
    pub fn verify(&self, pinned: &PinnedVersion, runner: &dyn CommandRunner) -> Verification {
        let query = Self::query();
        let detected = match runner.run_captured(&query) {
            Ok(result) if result.success => Version::extract(&result.stdout),
            Ok(result) => {
                tracing::debug!(
                    "`{}` exited with {:?}: {}",
                    query,
                    result.exit_code,
                    result.stderr.trim()
                );
                None
            }
            Err(e) => {
                tracing::debug!("Could not run `{}`: {}", query, e);
                None
            }
        };

        let satisfied = match (&detected, Version::extract(&pinned.version)) {
            (Some(found), Some(wanted)) => self.policy.accepts(found, &wanted),
            _ => false,
        };

        tracing::debug!(
            "notcurses detected: {:?}, wanted {} {} -> {}",
            detected.as_ref().map(Version::to_string),
            self.policy,
            pinned.version,
            satisfied
        );

        Verification {
            detected: detected.map(|v| v.to_string()),
            satisfied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{CommandResult, RecordingRunner};

    fn runner_reporting(stdout: &str) -> RecordingRunner {
        let runner = RecordingRunner::new();
        runner.respond("pkg-config", CommandResult::success(stdout));
        runner
    }

    #[test]
    fn exact_pinned_version_is_satisfied() {
        let runner = runner_reporting("3.0.11\n");
        let result = Verifier::default().verify(&PinnedVersion::default(), &runner);
        assert_eq!(result.detected.as_deref(), Some("3.0.11"));
        assert!(result.satisfied);
        assert!(runner.ran("pkg-config --modversion notcurses"));
    }

    #[test]
    fn newer_version_is_satisfied_by_default() {
        let runner = runner_reporting("3.0.13\n");
        let result = Verifier::default().verify(&PinnedVersion::default(), &runner);
        assert!(result.satisfied);
    }

    #[test]
    fn newer_version_fails_exact_policy() {
        let runner = runner_reporting("3.0.13\n");
        let result = Verifier::new(VersionPolicy::Exact).verify(&PinnedVersion::default(), &runner);
        assert!(!result.satisfied);
        assert_eq!(result.detected.as_deref(), Some("3.0.13"));
    }

    #[test]
    fn older_version_is_not_satisfied() {
        let runner = runner_reporting("3.0.8\n");
        let result = Verifier::default().verify(&PinnedVersion::default(), &runner);
        assert!(!result.satisfied);

        let err = result.into_result(&PinnedVersion::default()).unwrap_err();
        assert!(err.to_string().contains("found 3.0.8"));
    }

    #[test]
    fn unknown_module_is_not_detected() {
        let runner = RecordingRunner::new();
        runner.respond(
            "pkg-config",
            CommandResult::failure(Some(1), "Package notcurses was not found"),
        );
        let result = Verifier::default().verify(&PinnedVersion::default(), &runner);
        assert_eq!(result.detected, None);
        assert!(!result.satisfied);
    }

    #[test]
    fn missing_pkg_config_is_not_detected() {
        let runner = RecordingRunner::new();
        runner.fail_to_spawn("pkg-config");
        let result = Verifier::default().verify(&PinnedVersion::default(), &runner);
        assert_eq!(result.detected, None);

        let err = result.into_result(&PinnedVersion::default()).unwrap_err();
        assert!(matches!(
            err,
            InstallerError::Verification { found: None, .. }
        ));
    }

    #[test]
    fn satisfied_result_yields_detected_version() {
        let result = Verification {
            detected: Some("3.0.11".into()),
            satisfied: true,
        };
        assert_eq!(result.into_result(&PinnedVersion::default()).unwrap(), "3.0.11");
    }

    #[test]
    fn query_is_read_only() {
        assert!(!Verifier::query().mutating);
    }
}
