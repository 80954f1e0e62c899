//! Package manager detection.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use super::os::OsFamily;

/// Package managers the installer knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManagerKind {
    /// Debian / Ubuntu `apt-get`.
    Apt,
    /// Fedora / RHEL `dnf`.
    Dnf,
    /// Arch Linux `pacman`.
    Pacman,
    /// macOS Homebrew.
    Homebrew,
    /// MSYS2's `pacman` on Windows.
    Msys2,
}

impl PackageManagerKind {
    /// Every supported kind, in global priority order.
    pub const ALL: [Self; 5] = [
        Self::Apt,
        Self::Dnf,
        Self::Pacman,
        Self::Homebrew,
        Self::Msys2,
    ];

    /// Candidates for an OS family, highest priority first.
    pub fn candidates(os: &OsFamily) -> &'static [Self] {
        match os {
            OsFamily::Linux => &[Self::Apt, Self::Dnf, Self::Pacman],
            OsFamily::MacOs => &[Self::Homebrew],
            OsFamily::Windows => &[Self::Msys2],
            OsFamily::Other(_) => &[],
        }
    }

    /// Executable probed on the search path.
    pub fn executable(&self) -> &'static str {
        match self {
            Self::Apt => "apt-get",
            Self::Dnf => "dnf",
            Self::Pacman | Self::Msys2 => "pacman",
            Self::Homebrew => "brew",
        }
    }

    /// Platform label used in the supported-platforms list.
    pub fn platform_label(&self) -> &'static str {
        match self {
            Self::Apt => "Linux (Debian/Ubuntu via apt)",
            Self::Dnf => "Linux (Fedora via dnf)",
            Self::Pacman => "Linux (Arch via pacman)",
            Self::Homebrew => "macOS (Homebrew)",
            Self::Msys2 => "Windows (MSYS2)",
        }
    }
}

impl fmt::Display for PackageManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Apt => "apt",
            Self::Dnf => "dnf",
            Self::Pacman => "pacman",
            Self::Homebrew => "homebrew",
            Self::Msys2 => "msys2",
        };
        f.write_str(name)
    }
}

/// A package manager found on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedManager {
    pub kind: PackageManagerKind,
    pub path: PathBuf,
}

/// Find the highest-priority package manager for `os`.
///
/// `lookup` resolves an executable name to its path, or `None` when it is
/// not on the search path. The first candidate that resolves wins, so the
/// result is deterministic even when several managers are installed.
pub fn detect_package_manager<F>(os: &OsFamily, lookup: F) -> Option<DetectedManager>
where
    F: Fn(&str) -> Option<PathBuf>,
{
    PackageManagerKind::candidates(os).iter().find_map(|kind| {
        lookup(kind.executable()).map(|path| DetectedManager { kind: *kind, path })
    })
}

/// Human readable list of supported platforms.
pub fn supported_platforms() -> Vec<String> {
    PackageManagerKind::ALL
        .iter()
        .map(|kind| kind.platform_label().to_string())
        .collect()
}
