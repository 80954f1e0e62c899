//! Recording command runner for testing.
//!
//! `RecordingRunner` implements [`CommandRunner`] without starting any
//! process. It records every invocation for later assertion and returns
//! scripted results keyed by the effective program name (the program
//! behind `sudo`, if any).
//!
//! # Example
//!
//! ```
//! use tui_install::shell::{CommandResult, CommandRunner, Invocation, RecordingRunner};
//!
//! let runner = RecordingRunner::new();
//! runner.respond("pkg-config", CommandResult::success("3.0.11\n"));
//!
//! let result = runner
//!     .run_captured(&Invocation::new("pkg-config").arg("--modversion").query())
//!     .unwrap();
//! assert_eq!(result.stdout, "3.0.11\n");
//! assert_eq!(runner.count("pkg-config"), 1);
//! ```

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::Mutex;

use super::command::{CommandResult, Invocation, OutputLine};
use super::runner::CommandRunner;

#[derive(Debug, Clone)]
enum Scripted {
    Result(CommandResult),
    SpawnError(String),
}

#[derive(Debug, Default)]
struct State {
    invocations: Vec<Invocation>,
    fixed: HashMap<String, Scripted>,
    queued: HashMap<String, VecDeque<Scripted>>,
}

/// Command runner that records invocations and returns scripted results.
///
/// Programs without a scripted result succeed with empty output.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    state: Mutex<State>,
}

impl RecordingRunner {
    /// Create a runner where every program succeeds silently.
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer `program` with `result`.
    pub fn respond(&self, program: &str, result: CommandResult) {
        self.lock()
            .fixed
            .insert(program.to_string(), Scripted::Result(result));
    }

    /// Answer the next call to `program` with `result`, before any fixed response.
    pub fn queue(&self, program: &str, result: CommandResult) {
        self.lock()
            .queued
            .entry(program.to_string())
            .or_default()
            .push_back(Scripted::Result(result));
    }

    /// Make `program` fail to start, as if it were missing from PATH.
    pub fn fail_to_spawn(&self, program: &str) {
        self.lock().fixed.insert(
            program.to_string(),
            Scripted::SpawnError(format!("{}: command not found", program)),
        );
    }

    /// All invocations seen so far, in order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.lock().invocations.clone()
    }

    /// Number of invocations whose effective program is `program`.
    pub fn count(&self, program: &str) -> usize {
        self.lock()
            .invocations
            .iter()
            .filter(|inv| inv.effective_program() == program)
            .count()
    }

    /// Whether any invocation's command line contains `needle`.
    pub fn ran(&self, needle: &str) -> bool {
        self.lock()
            .invocations
            .iter()
            .any(|inv| inv.command_line().contains(needle))
    }

    /// Rendered command lines, in order.
    pub fn command_lines(&self) -> Vec<String> {
        self.lock()
            .invocations
            .iter()
            .map(Invocation::command_line)
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A panic while holding the lock only happens inside a failing test
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CommandRunner for RecordingRunner {
    fn run(
        &self,
        invocation: &Invocation,
        on_output: &dyn Fn(OutputLine),
    ) -> io::Result<CommandResult> {
        let scripted = {
            let mut state = self.lock();
            state.invocations.push(invocation.clone());
            let program = invocation.effective_program().to_string();
            state
                .queued
                .get_mut(&program)
                .and_then(VecDeque::pop_front)
                .or_else(|| state.fixed.get(&program).cloned())
        };

        match scripted {
            Some(Scripted::SpawnError(msg)) => Err(io::Error::new(io::ErrorKind::NotFound, msg)),
            Some(Scripted::Result(result)) => {
                for line in result.stdout.lines() {
                    on_output(OutputLine::Stdout(line.to_string()));
                }
                for line in result.stderr.lines() {
                    on_output(OutputLine::Stderr(line.to_string()));
                }
                Ok(result)
            }
            None => Ok(CommandResult::success("")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::Privilege;
    use std::cell::RefCell;

    #[test]
    fn unscripted_programs_succeed() {
        let runner = RecordingRunner::new();
        let result = runner.run_captured(&Invocation::new("git")).unwrap();
        assert!(result.success);
        assert_eq!(runner.count("git"), 1);
    }

    #[test]
    fn counts_through_sudo() {
        let runner = RecordingRunner::new();
        let inv = Invocation::new("apt-get")
            .arg("update")
            .with_privilege(Privilege::Sudo);
        runner.run_captured(&inv).unwrap();

        assert_eq!(runner.count("apt-get"), 1);
        assert_eq!(runner.count("sudo"), 0);
        assert!(runner.ran("sudo apt-get update"));
    }

    #[test]
    fn queued_responses_come_first() {
        let runner = RecordingRunner::new();
        runner.respond("pkg-config", CommandResult::success("3.0.11"));
        runner.queue("pkg-config", CommandResult::failure(Some(1), "not found"));

        let inv = Invocation::new("pkg-config").query();
        assert!(!runner.run_captured(&inv).unwrap().success);
        assert!(runner.run_captured(&inv).unwrap().success);
        assert!(runner.run_captured(&inv).unwrap().success);
    }

    #[test]
    fn spawn_failures_are_errors() {
        let runner = RecordingRunner::new();
        runner.fail_to_spawn("cmake");
        let err = runner.run_captured(&Invocation::new("cmake")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn scripted_output_is_streamed() {
        let runner = RecordingRunner::new();
        runner.respond("cmake", CommandResult::success("[ 50%] Building\n[100%] Linking\n"));

        let seen = RefCell::new(Vec::new());
        runner
            .run(&Invocation::new("cmake"), &|line| {
                seen.borrow_mut().push(line.text().to_string())
            })
            .unwrap();

        assert_eq!(*seen.borrow(), vec!["[ 50%] Building", "[100%] Linking"]);
    }

    #[test]
    fn command_lines_are_recorded_in_order() {
        let runner = RecordingRunner::new();
        runner.run_captured(&Invocation::new("git").arg("clone")).unwrap();
        runner.run_captured(&Invocation::new("git").arg("checkout")).unwrap();
        assert_eq!(runner.command_lines(), vec!["git clone", "git checkout"]);
    }
}
