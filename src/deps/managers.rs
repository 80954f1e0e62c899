//! One strategy per supported package manager.

use crate::detection::PackageManagerKind;
use crate::shell::{Invocation, Privilege};

use super::PackageManager;

const APT_PACKAGES: &[&str] = &[
    "build-essential",
    "cmake",
    "pkg-config",
    "libncurses-dev",
    "libunistring-dev",
    "libavformat-dev",
    "libavutil-dev",
    "libswscale-dev",
    "libqrcodegen-dev",
    "git",
];

const DNF_PACKAGES: &[&str] = &[
    "gcc-c++",
    "cmake",
    "pkgconfig",
    "ncurses-devel",
    "libunistring-devel",
    "ffmpeg-devel",
    "qrencode-devel",
    "git",
];

const MSYS2_PACKAGES: &[&str] = &[
    "mingw-w64-x86_64-gcc",
    "mingw-w64-x86_64-cmake",
    "mingw-w64-x86_64-pkg-config",
    "mingw-w64-x86_64-ncurses",
    "mingw-w64-x86_64-ffmpeg",
    "git",
];

const PACKAGED_LIBRARY: &[&str] = &["notcurses"];

/// Debian and Ubuntu.
#[derive(Debug, Clone, Copy, Default)]
pub struct Apt;

impl PackageManager for Apt {
    fn kind(&self) -> PackageManagerKind {
        PackageManagerKind::Apt
    }

    fn packages(&self) -> &'static [&'static str] {
        APT_PACKAGES
    }

    fn install_invocations(&self, privilege: Privilege) -> Vec<Invocation> {
        vec![
            Invocation::new("apt-get")
                .arg("update")
                .with_privilege(privilege),
            Invocation::new("apt-get")
                .args(["install", "-y"])
                .args(self.packages().iter().copied())
                .with_privilege(privilege),
        ]
    }
}

/// Fedora and RHEL derivatives.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dnf;

impl PackageManager for Dnf {
    fn kind(&self) -> PackageManagerKind {
        PackageManagerKind::Dnf
    }

    fn packages(&self) -> &'static [&'static str] {
        DNF_PACKAGES
    }

    fn install_invocations(&self, privilege: Privilege) -> Vec<Invocation> {
        vec![Invocation::new("dnf")
            .args(["install", "-y"])
            .args(self.packages().iter().copied())
            .with_privilege(privilege)]
    }
}

/// Arch Linux, which ships notcurses as a regular package.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pacman;

impl PackageManager for Pacman {
    fn kind(&self) -> PackageManagerKind {
        PackageManagerKind::Pacman
    }

    fn packages(&self) -> &'static [&'static str] {
        PACKAGED_LIBRARY
    }

    fn install_invocations(&self, privilege: Privilege) -> Vec<Invocation> {
        vec![pacman_sync(self.packages()).with_privilege(privilege)]
    }

    fn provides_library(&self) -> bool {
        true
    }
}

/// Homebrew on macOS.
#[derive(Debug, Clone, Copy, Default)]
pub struct Homebrew;

impl PackageManager for Homebrew {
    fn kind(&self) -> PackageManagerKind {
        PackageManagerKind::Homebrew
    }

    fn packages(&self) -> &'static [&'static str] {
        PACKAGED_LIBRARY
    }

    // brew refuses to run as root, so the privilege is ignored
    fn install_invocations(&self, _privilege: Privilege) -> Vec<Invocation> {
        vec![Invocation::new("brew")
            .arg("install")
            .args(self.packages().iter().copied())]
    }

    fn provides_library(&self) -> bool {
        true
    }

    fn uses_privilege(&self) -> bool {
        false
    }
}

/// MSYS2's pacman on Windows, installing the MinGW toolchain.
#[derive(Debug, Clone, Copy, Default)]
pub struct Msys2;

impl PackageManager for Msys2 {
    fn kind(&self) -> PackageManagerKind {
        PackageManagerKind::Msys2
    }

    fn packages(&self) -> &'static [&'static str] {
        MSYS2_PACKAGES
    }

    fn install_invocations(&self, _privilege: Privilege) -> Vec<Invocation> {
        vec![pacman_sync(self.packages())]
    }

    fn uses_privilege(&self) -> bool {
        false
    }
}

fn pacman_sync(packages: &[&str]) -> Invocation {
    Invocation::new("pacman")
        .args(["-S", "--needed", "--noconfirm"])
        .args(packages.iter().copied())
}
