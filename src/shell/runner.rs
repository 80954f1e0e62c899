//! Command runners.
//!
//! Every subprocess the installer starts goes through a [`CommandRunner`].
//! Production code uses [`SystemRunner`]; tests use
//! [`RecordingRunner`](super::RecordingRunner) to script responses and
//! count invocations.

use std::io;

use super::command::{execute_streaming, CommandResult, Invocation, OutputLine};

/// Executes invocations on behalf of the pipeline stages.
pub trait CommandRunner {
    /// Run `invocation`, passing every output line to `on_output`.
    ///
    /// Returns `Err` only when the program could not be started; a
    /// non-zero exit is reported through [`CommandResult::success`].
    fn run(
        &self,
        invocation: &Invocation,
        on_output: &dyn Fn(OutputLine),
    ) -> io::Result<CommandResult>;

    /// Run without observing output as it arrives.
    fn run_captured(&self, invocation: &Invocation) -> io::Result<CommandResult> {
        self.run(invocation, &|_| {})
    }
}

/// Runs invocations as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a new system runner.
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        invocation: &Invocation,
        on_output: &dyn Fn(OutputLine),
    ) -> io::Result<CommandResult> {
        tracing::debug!("Running: {}", invocation);
        let result = execute_streaming(invocation, on_output);
        match &result {
            Ok(r) => tracing::debug!(
                "Finished `{}` with {:?} in {:.1?}",
                invocation.effective_program(),
                r.exit_code,
                r.duration
            ),
            Err(e) => tracing::debug!("Could not start `{}`: {}", invocation.program, e),
        }
        result
    }
}
