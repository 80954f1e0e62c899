//! Pipeline stages and the forward-only run state.

use std::fmt;
use std::time::Duration;

use crate::detection::PackageManagerKind;

/// One stage of an install run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Probing,
    Installing,
    Building,
    Verifying,
}

impl Stage {
    /// Every stage in execution order.
    pub const ALL: [Stage; 4] = [
        Stage::Probing,
        Stage::Installing,
        Stage::Building,
        Stage::Verifying,
    ];

    /// 1-based position, for `[n/4]` counters.
    pub fn position(&self) -> usize {
        *self as usize + 1
    }

    /// What the stage does, shown next to its spinner.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Probing => "Probing environment",
            Self::Installing => "Installing dependencies",
            Self::Building => "Building notcurses",
            Self::Verifying => "Verifying installation",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Probing => "Probing",
            Self::Installing => "Installing",
            Self::Building => "Building",
            Self::Verifying => "Verifying",
        };
        f.write_str(name)
    }
}

/// Where a run currently is.
///
/// `Start → Probing → Installing → Building → Verifying → {Success, Failed}`.
/// Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Start,
    Running(Stage),
    Success,
    Failed(Stage),
}

impl RunState {
    /// Move into `stage`. Returns `false` (and stays put) for a backward
    /// or repeated transition, or once the run has finished.
    pub fn enter(&mut self, stage: Stage) -> bool {
        let allowed = match *self {
            Self::Start => true,
            Self::Running(current) => stage > current,
            Self::Success | Self::Failed(_) => false,
        };
        if allowed {
            *self = Self::Running(stage);
        }
        allowed
    }

    /// Mark the current stage as failed.
    pub fn fail(&mut self) {
        if let Self::Running(stage) = *self {
            *self = Self::Failed(stage);
        }
    }

    /// Mark the run as finished successfully.
    pub fn succeed(&mut self) {
        if matches!(self, Self::Start | Self::Running(_)) {
            *self = Self::Success;
        }
    }

    /// Whether the run has reached a terminal state.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Success | Self::Failed(_))
    }
}

/// Why a stage did not run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Turned off by a command-line flag.
    Flag(&'static str),
    /// The package manager installs the library itself.
    ProvidedBy(PackageManagerKind),
    /// The pinned version was already present before the run.
    AlreadyInstalled(String),
    /// `--dry-run`: nothing was installed to verify.
    DryRun,
    /// Neither `--test` nor a build asked for verification.
    NotRequested,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(flag) => write!(f, "{}", flag),
            Self::ProvidedBy(kind) => write!(f, "provided by {}", kind),
            Self::AlreadyInstalled(version) => write!(f, "notcurses {} already installed", version),
            Self::DryRun => f.write_str("dry run"),
            Self::NotRequested => f.write_str("not requested"),
        }
    }
}

/// How a stage ended in a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Completed {
        detail: Option<String>,
        duration: Duration,
    },
    Skipped(SkipReason),
}

impl StageOutcome {
    /// Whether the stage actually ran.
    pub fn ran(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_ordered() {
        assert!(Stage::Probing < Stage::Installing);
        assert!(Stage::Building < Stage::Verifying);
        assert_eq!(Stage::Probing.position(), 1);
        assert_eq!(Stage::Verifying.position(), 4);
    }

    #[test]
    fn run_state_moves_forward() {
        let mut state = RunState::Start;
        assert!(state.enter(Stage::Probing));
        assert!(state.enter(Stage::Building));
        assert_eq!(state, RunState::Running(Stage::Building));
    }

    #[test]
    fn run_state_rejects_backward_and_repeat() {
        let mut state = RunState::Start;
        state.enter(Stage::Building);
        assert!(!state.enter(Stage::Installing));
        assert!(!state.enter(Stage::Building));
        assert_eq!(state, RunState::Running(Stage::Building));
    }

    #[test]
    fn failure_is_terminal() {
        let mut state = RunState::Start;
        state.enter(Stage::Installing);
        state.fail();
        assert_eq!(state, RunState::Failed(Stage::Installing));
        assert!(state.is_finished());
        assert!(!state.enter(Stage::Verifying));
        state.succeed();
        assert_eq!(state, RunState::Failed(Stage::Installing));
    }

    #[test]
    fn success_is_terminal() {
        let mut state = RunState::Start;
        state.enter(Stage::Verifying);
        state.succeed();
        assert_eq!(state, RunState::Success);
        assert!(!state.enter(Stage::Verifying));
    }

    #[test]
    fn skip_reasons_display() {
        assert_eq!(SkipReason::Flag("--skip-deps").to_string(), "--skip-deps");
        assert_eq!(
            SkipReason::ProvidedBy(PackageManagerKind::Homebrew).to_string(),
            "provided by homebrew"
        );
        assert_eq!(
            SkipReason::AlreadyInstalled("3.0.11".into()).to_string(),
            "notcurses 3.0.11 already installed"
        );
    }
}
