//! Prerequisite installation through the host package manager.
//!
//! Each [`PackageManagerKind`] maps to a [`PackageManager`] strategy that
//! knows its package list and the invocations that install it.
//! [`install_dependencies`] runs those invocations in order and stops at
//! the first failure.

pub mod managers;

pub use managers::{Apt, Dnf, Homebrew, Msys2, Pacman};

use crate::detection::{PackageManagerKind, TargetEnvironment};
use crate::error::{InstallerError, Result};
use crate::shell::{CommandRunner, Invocation, OutputLine, Privilege};

/// Lines of captured output kept in an install error.
const ERROR_OUTPUT_LINES: usize = 20;

/// Install strategy for one package manager.
pub trait PackageManager {
    /// Which manager this strategy drives.
    fn kind(&self) -> PackageManagerKind;

    /// Packages installed by this strategy.
    fn packages(&self) -> &'static [&'static str];

    /// Invocations to run, in order.
    ///
    /// `privilege` is only applied by managers that install system-wide.
    fn install_invocations(&self, privilege: Privilege) -> Vec<Invocation>;

    /// Whether the packages include the native library itself, making a
    /// source build unnecessary.
    fn provides_library(&self) -> bool {
        false
    }

    /// Whether installs need root on this manager.
    fn uses_privilege(&self) -> bool {
        true
    }
}

/// Strategy for a detected manager.
pub fn strategy_for(kind: PackageManagerKind) -> Box<dyn PackageManager> {
    match kind {
        PackageManagerKind::Apt => Box::new(Apt),
        PackageManagerKind::Dnf => Box::new(Dnf),
        PackageManagerKind::Pacman => Box::new(Pacman),
        PackageManagerKind::Homebrew => Box::new(Homebrew),
        PackageManagerKind::Msys2 => Box::new(Msys2),
    }
}

/// Install the prerequisites for `env`.
///
/// Invocations run sequentially. A spawn failure or non-zero exit becomes
/// [`InstallerError::Install`]; nothing is retried.
pub fn install_dependencies(
    env: &TargetEnvironment,
    runner: &dyn CommandRunner,
    privilege: Privilege,
    on_output: &dyn Fn(OutputLine),
) -> Result<()> {
    let strategy = strategy_for(env.package_manager);
    let privilege = if strategy.uses_privilege() {
        privilege
    } else {
        Privilege::Direct
    };

    for invocation in strategy.install_invocations(privilege) {
        tracing::info!("Installing prerequisites: {}", invocation);
        run_install_step(runner, &invocation, on_output)?;
    }

    Ok(())
}

fn run_install_step(
    runner: &dyn CommandRunner,
    invocation: &Invocation,
    on_output: &dyn Fn(OutputLine),
) -> Result<()> {
    match runner.run(invocation, on_output) {
        Ok(result) if result.success => Ok(()),
        Ok(result) => Err(InstallerError::Install {
            command: invocation.command_line(),
            code: result.exit_code,
            output: result.output_tail(ERROR_OUTPUT_LINES),
        }),
        Err(e) => Err(InstallerError::Install {
            command: invocation.command_line(),
            code: None,
            output: e.to_string(),
        }),
    }
}
