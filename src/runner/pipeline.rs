//! The install pipeline.
//!
//! Drives probe → install → build → verify through [`RunState`], deciding
//! per stage whether it runs or is skipped. All subprocesses go through the
//! injected [`CommandRunner`] and all output through the injected
//! [`UserInterface`].

use std::cell::{Cell, RefCell};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::build::{BuildOptions, BuildReport, SourceBuilder};
use crate::deps::{install_dependencies, strategy_for};
use crate::detection::{EnvironmentProber, PinnedVersion, TargetEnvironment};
use crate::error::Result;
use crate::shell::{CommandResult, CommandRunner, Invocation, OutputCallback, OutputLine, Privilege};
use crate::ui::{
    echo_output_callback, live_output_callback, OutputMode, RunSummary, SpinnerHandle, StageLine,
    StatusKind, UserInterface,
};
use crate::verify::{Verifier, VersionPolicy};

use super::stage::{RunState, SkipReason, Stage, StageOutcome};

/// Everything that shapes a run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub pinned: PinnedVersion,
    pub policy: VersionPolicy,
    pub build: BuildOptions,
    pub skip_deps: bool,
    pub skip_build: bool,
    /// Verify even when the build was skipped.
    pub test: bool,
    /// Ignore an already-installed library.
    pub force: bool,
    /// Print mutating commands instead of running them.
    pub dry_run: bool,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub environment: TargetEnvironment,
    pub stages: Vec<(Stage, StageOutcome)>,
    /// Version reported by the verifier, if it ran.
    pub detected_version: Option<String>,
    pub build: Option<BuildReport>,
    /// Commands that `--dry-run` held back, in order.
    pub planned: Vec<Invocation>,
    pub duration: Duration,
}

impl PipelineReport {
    /// How `stage` ended.
    pub fn outcome(&self, stage: Stage) -> Option<&StageOutcome> {
        self.stages
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, outcome)| outcome)
    }

    /// Convert into the UI's summary rows.
    pub fn summary(&self) -> RunSummary {
        let stages = self
            .stages
            .iter()
            .map(|(stage, outcome)| match outcome {
                StageOutcome::Completed { detail, duration } => StageLine {
                    name: stage.to_string(),
                    status: StatusKind::Completed,
                    detail: detail.clone(),
                    duration: Some(*duration),
                },
                StageOutcome::Skipped(reason) => StageLine {
                    name: stage.to_string(),
                    status: StatusKind::Skipped,
                    detail: Some(reason.to_string()),
                    duration: None,
                },
            })
            .collect();

        RunSummary {
            stages,
            total_duration: self.duration,
            detected_version: self.detected_version.clone(),
        }
    }
}

/// Runs the four install stages in order.
pub struct Pipeline {
    options: PipelineOptions,
    privilege: Privilege,
}

impl Pipeline {
    /// Create a pipeline that uses `sudo` when the host needs it.
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            options,
            privilege: Privilege::detect(),
        }
    }

    /// Override privilege detection.
    pub fn with_privilege(mut self, privilege: Privilege) -> Self {
        self.privilege = privilege;
        self
    }

    /// The options this pipeline runs with.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Run every stage. The first failure aborts the run.
    pub fn run<F>(
        &self,
        prober: &EnvironmentProber<F>,
        ui: &mut dyn UserInterface,
        runner: &dyn CommandRunner,
    ) -> Result<PipelineReport>
    where
        F: Fn(&str) -> Option<PathBuf>,
    {
        let start = Instant::now();
        let runner = DryRunRunner::new(runner, self.options.dry_run);
        let mut run = Run {
            state: RunState::Start,
            stages: Vec::new(),
            ui,
            runner: &runner,
        };

        let result = self.run_stages(prober, &mut run);
        match result {
            Ok((environment, build, detected_version)) => {
                run.state.succeed();
                Ok(PipelineReport {
                    environment,
                    stages: run.stages,
                    detected_version,
                    build,
                    planned: runner.into_planned(),
                    duration: start.elapsed(),
                })
            }
            Err(e) => {
                run.state.fail();
                tracing::debug!("Run ended in {:?}: {}", run.state, e);
                Err(e)
            }
        }
    }

    fn run_stages<F>(
        &self,
        prober: &EnvironmentProber<F>,
        run: &mut Run<'_>,
    ) -> Result<(TargetEnvironment, Option<BuildReport>, Option<String>)>
    where
        F: Fn(&str) -> Option<PathBuf>,
    {
        let opts = &self.options;

        let env = run.stage(Stage::Probing, |_| {
            let env = prober.probe(opts.pinned.clone())?;
            let detail = format!("{} via {}", prober.host().description, env.package_manager);
            Ok((env, Some(detail)))
        })?;

        let verifier = Verifier::new(opts.policy);
        let already_installed = if opts.force {
            None
        } else {
            let check = verifier.verify(&opts.pinned, run.runner);
            check.satisfied.then_some(check.detected).flatten()
        };
        if let Some(version) = &already_installed {
            run.ui
                .success(&format!("notcurses {} is already installed", version));
        }

        let install_skip = if opts.skip_deps {
            Some(SkipReason::Flag("--skip-deps"))
        } else {
            already_installed.clone().map(SkipReason::AlreadyInstalled)
        };
        match install_skip {
            Some(reason) => run.skip(Stage::Installing, reason),
            None => run.stage(Stage::Installing, |sink| {
                install_dependencies(&env, sink.runner, self.privilege, sink.output)?;
                Ok(((), None))
            })?,
        }

        let strategy = strategy_for(env.package_manager);
        let build_skip = if opts.skip_build {
            Some(SkipReason::Flag("--skip-build"))
        } else if let Some(version) = &already_installed {
            Some(SkipReason::AlreadyInstalled(version.clone()))
        } else if strategy.provides_library() {
            Some(SkipReason::ProvidedBy(env.package_manager))
        } else {
            None
        };
        let build = match build_skip {
            Some(reason) => {
                run.skip(Stage::Building, reason);
                None
            }
            None => Some(run.stage(Stage::Building, |sink| {
                let builder = SourceBuilder::new(&opts.build, self.privilege);
                let report = builder.build(&env, sink.runner, sink.output)?;
                let detail = format!("{} source, {} jobs", report.source.origin, report.jobs);
                Ok((report, Some(detail)))
            })?),
        };

        let verify_requested = opts.test || !opts.skip_build;
        let detected = if !verify_requested {
            run.skip(Stage::Verifying, SkipReason::NotRequested);
            None
        } else if opts.dry_run {
            run.skip(Stage::Verifying, SkipReason::DryRun);
            None
        } else {
            Some(run.stage(Stage::Verifying, |sink| {
                let found = verifier
                    .verify(&opts.pinned, sink.runner)
                    .into_result(&opts.pinned)?;
                let detail = format!("notcurses {}", found);
                Ok((found, Some(detail)))
            })?)
        };

        Ok((env, build, detected))
    }
}

/// What a stage body gets to work with.
struct StageSink<'a> {
    runner: &'a dyn CommandRunner,
    output: &'a dyn Fn(OutputLine),
}

/// Mutable state of one run.
struct Run<'a> {
    state: RunState,
    stages: Vec<(Stage, StageOutcome)>,
    ui: &'a mut dyn UserInterface,
    runner: &'a DryRunRunner<'a>,
}

impl Run<'_> {
    fn label(stage: Stage) -> String {
        format!("[{}/{}] {}", stage.position(), Stage::ALL.len(), stage.description())
    }

    fn enter(&mut self, stage: Stage) {
        let entered = self.state.enter(stage);
        debug_assert!(entered, "stage {stage} entered out of order");
        tracing::info!("Entering stage {}", stage);
    }

    fn skip(&mut self, stage: Stage, reason: SkipReason) {
        self.enter(stage);
        tracing::info!("Skipping {}: {}", stage, reason);
        let mut spinner = self.ui.start_spinner(&Self::label(stage));
        spinner.finish_skipped(&format!("{} ({})", stage.description(), reason));
        self.stages.push((stage, StageOutcome::Skipped(reason)));
    }

    fn stage<T>(
        &mut self,
        stage: Stage,
        body: impl FnOnce(&StageSink<'_>) -> Result<(T, Option<String>)>,
    ) -> Result<T> {
        self.enter(stage);
        let label = Self::label(stage);
        let started = Instant::now();
        let mut spinner = self.ui.start_spinner(&label);

        let callback = output_callback(
            &*spinner,
            self.ui.output_mode(),
            &label,
            stage == Stage::Building,
        );
        let noop = |_: OutputLine| {};
        let output: &dyn Fn(OutputLine) = match &callback {
            Some(cb) => &**cb,
            None => &noop,
        };
        let sink = StageSink {
            runner: self.runner,
            output,
        };

        let result = body(&sink);
        drop(callback);
        self.report_planned();

        match result {
            Ok((value, detail)) => {
                let message = match &detail {
                    Some(detail) => format!("{} ({})", stage.description(), detail),
                    None => stage.description().to_string(),
                };
                spinner.finish_success(&message);
                self.stages.push((
                    stage,
                    StageOutcome::Completed {
                        detail,
                        duration: started.elapsed(),
                    },
                ));
                Ok(value)
            }
            Err(e) => {
                spinner.finish_error(&format!("{} failed", stage.description()));
                Err(e)
            }
        }
    }

    fn report_planned(&mut self) {
        for invocation in self.runner.take_new() {
            self.ui.message(&format!("    would run: {}", invocation));
        }
    }
}

/// Pick how subprocess output is shown while a stage runs.
fn output_callback(
    spinner: &dyn SpinnerHandle,
    mode: OutputMode,
    label: &str,
    track_progress: bool,
) -> Option<OutputCallback> {
    spinner
        .progress_bar()
        .and_then(|bar| {
            let max_lines = match mode {
                OutputMode::Verbose => 3,
                OutputMode::Normal => 2,
                OutputMode::Quiet => return None,
            };
            Some(live_output_callback(
                bar,
                label.to_string(),
                max_lines,
                track_progress,
            ))
        })
        .or_else(|| mode.shows_command_output().then(echo_output_callback))
}

/// Holds back mutating invocations during `--dry-run`.
///
/// Read-only queries still reach the wrapped runner so probing and
/// verification see the real host.
struct DryRunRunner<'a> {
    inner: &'a dyn CommandRunner,
    enabled: bool,
    planned: RefCell<Vec<Invocation>>,
    reported: Cell<usize>,
}

impl<'a> DryRunRunner<'a> {
    fn new(inner: &'a dyn CommandRunner, enabled: bool) -> Self {
        Self {
            inner,
            enabled,
            planned: RefCell::new(Vec::new()),
            reported: Cell::new(0),
        }
    }

    /// Planned invocations not yet handed out.
    fn take_new(&self) -> Vec<Invocation> {
        let planned = self.planned.borrow();
        let fresh = planned[self.reported.get()..].to_vec();
        self.reported.set(planned.len());
        fresh
    }

    fn into_planned(self) -> Vec<Invocation> {
        self.planned.into_inner()
    }
}

impl CommandRunner for DryRunRunner<'_> {
    fn run(
        &self,
        invocation: &Invocation,
        on_output: &dyn Fn(OutputLine),
    ) -> io::Result<CommandResult> {
        if self.enabled && invocation.mutating {
            tracing::debug!("Dry run, not running: {}", invocation);
            self.planned.borrow_mut().push(invocation.clone());
            return Ok(CommandResult::success(""));
        }
        self.inner.run(invocation, on_output)
    }
}
