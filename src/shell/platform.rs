//! Host privilege and CI detection.

/// How privileged commands (system package installs, `cmake --install`)
/// must be launched on this host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    /// Run the program as-is.
    Direct,
    /// Prefix the program with `sudo`.
    Sudo,
}

impl Privilege {
    /// Detect the privilege needed for system-wide changes.
    ///
    /// Unix processes that are not already root go through `sudo`;
    /// everywhere else commands run directly.
    pub fn detect() -> Self {
        if cfg!(unix) && !is_elevated() {
            Self::Sudo
        } else {
            Self::Direct
        }
    }
}

/// Check if running in a CI environment.
///
/// Used to auto-detect CI and force the non-interactive UI in `main()`.
/// Checks common CI environment variables: `CI`, `GITHUB_ACTIONS`,
/// `GITLAB_CI`, `CIRCLECI`, `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}

/// Check if running as root/admin.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}
