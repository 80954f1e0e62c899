//! Locating or fetching the pinned source tree.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::detection::PinnedVersion;
use crate::error::{BuildStep, Result};
use crate::shell::{CommandRunner, Invocation, OutputLine};

use super::run_build_step;

/// Where a source tree came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOrigin {
    /// A user-supplied `source_dir`.
    Configured,
    /// A checkout left by an earlier run.
    Reused,
    /// Cloned during this run.
    Fetched,
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configured => f.write_str("configured"),
            Self::Reused => f.write_str("reused"),
            Self::Fetched => f.write_str("fetched"),
        }
    }
}

/// A source tree ready to configure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTree {
    pub path: PathBuf,
    pub origin: SourceOrigin,
}

impl SourceTree {
    /// Out-of-tree build directory inside the source tree.
    pub fn build_dir(&self) -> PathBuf {
        self.path.join("build")
    }
}

/// Checkout location for `pinned` under `work_dir`.
pub fn checkout_dir(work_dir: &Path, pinned: &PinnedVersion) -> PathBuf {
    work_dir.join(format!("notcurses-{}", pinned.version))
}

/// Resolve the source tree, cloning it when nothing usable is on disk.
///
/// An existing directory is used as-is. Its contents are not checked
/// against the pinned tag.
pub fn prepare_source(
    work_dir: &Path,
    source_dir: Option<&Path>,
    pinned: &PinnedVersion,
    runner: &dyn CommandRunner,
    on_output: &dyn Fn(OutputLine),
) -> Result<SourceTree> {
    if let Some(dir) = source_dir.filter(|dir| dir.is_dir()) {
        tracing::debug!("Using configured source at {}", dir.display());
        return Ok(SourceTree {
            path: dir.to_path_buf(),
            origin: SourceOrigin::Configured,
        });
    }

    if let Some(dir) = source_dir {
        tracing::warn!(
            "Configured source directory {} does not exist, fetching instead",
            dir.display()
        );
    }

    let path = checkout_dir(work_dir, pinned);
    if path.is_dir() {
        tracing::debug!("Reusing existing checkout at {}", path.display());
        return Ok(SourceTree {
            path,
            origin: SourceOrigin::Reused,
        });
    }

    // Any tree left on disk is at the pinned tag.
    let clone = Invocation::new("git")
        .args(["clone", "--branch", &pinned.tag()])
        .arg(&pinned.repository)
        .path_arg(&path);
    run_build_step(runner, &clone, BuildStep::Fetch, on_output)?;

    Ok(SourceTree {
        path,
        origin: SourceOrigin::Fetched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InstallerError;
    use crate::shell::{CommandResult, RecordingRunner};
    use tempfile::TempDir;

    #[test]
    fn checkout_dir_is_versioned() {
        let dir = checkout_dir(Path::new("/work"), &PinnedVersion::default());
        assert_eq!(dir, PathBuf::from("/work/notcurses-3.0.11"));
    }

    #[test]
    fn clones_at_pinned_tag() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();

        let tree = prepare_source(
            temp.path(),
            None,
            &PinnedVersion::default(),
            &runner,
            &|_| {},
        )
        .unwrap();

        assert_eq!(tree.origin, SourceOrigin::Fetched);
        assert_eq!(runner.count("git"), 1);
        let lines = runner.command_lines();
        assert!(lines[0].starts_with(
            "git clone --branch v3.0.11 https://github.com/dankamongmen/notcurses.git"
        ));
        assert!(lines[0].ends_with("notcurses-3.0.11"));
    }

    #[test]
    fn existing_checkout_is_reused_without_git() {
        let temp = TempDir::new().unwrap();
        let pinned = PinnedVersion::default();
        std::fs::create_dir_all(checkout_dir(temp.path(), &pinned)).unwrap();
        let runner = RecordingRunner::new();

        let tree = prepare_source(temp.path(), None, &pinned, &runner, &|_| {}).unwrap();

        assert_eq!(tree.origin, SourceOrigin::Reused);
        assert_eq!(runner.count("git"), 0);
    }

    #[test]
    fn configured_source_dir_wins() {
        let temp = TempDir::new().unwrap();
        let local = temp.path().join("my-notcurses");
        std::fs::create_dir(&local).unwrap();
        let runner = RecordingRunner::new();

        let tree = prepare_source(
            temp.path(),
            Some(local.as_path()),
            &PinnedVersion::default(),
            &runner,
            &|_| {},
        )
        .unwrap();

        assert_eq!(tree.path, local);
        assert_eq!(tree.origin, SourceOrigin::Configured);
        assert_eq!(tree.build_dir(), local.join("build"));
        assert!(runner.invocations().is_empty());
    }

    #[test]
    fn missing_configured_source_dir_falls_back_to_fetch() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();

        let tree = prepare_source(
            temp.path(),
            Some(temp.path().join("missing").as_path()),
            &PinnedVersion::default(),
            &runner,
            &|_| {},
        )
        .unwrap();

        assert_eq!(tree.origin, SourceOrigin::Fetched);
    }

    #[test]
    fn clone_failure_is_fetch_error() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        runner.queue(
            "git",
            CommandResult::failure(Some(128), "fatal: unable to access repository"),
        );

        let err = prepare_source(
            temp.path(),
            None,
            &PinnedVersion::default(),
            &runner,
            &|_| {},
        )
        .unwrap_err();

        assert!(matches!(
            err,
            InstallerError::Build {
                step: BuildStep::Fetch,
                code: Some(128),
                ..
            }
        ));
        assert_eq!(runner.count("git"), 1);
    }

    #[test]
    fn unknown_tag_fails_fetch_and_leaves_nothing_to_reuse() {
        let temp = TempDir::new().unwrap();
        let pinned = PinnedVersion::new("9.9.9", "https://example.com/notcurses.git");
        let runner = RecordingRunner::new();
        runner.queue(
            "git",
            CommandResult::failure(
                Some(128),
                "warning: Could not find remote branch v9.9.9 to clone.",
            ),
        );

        let err = prepare_source(temp.path(), None, &pinned, &runner, &|_| {}).unwrap_err();

        assert!(matches!(
            err,
            InstallerError::Build {
                step: BuildStep::Fetch,
                ..
            }
        ));
        assert!(err.command().unwrap().contains("--branch v9.9.9"));
        assert_eq!(runner.count("git"), 1);
        assert!(!checkout_dir(temp.path(), &pinned).exists());

        // A retry fetches again instead of reusing a half-made tree.
        prepare_source(temp.path(), None, &pinned, &runner, &|_| {}).unwrap();
        assert_eq!(runner.count("git"), 2);
    }
}
