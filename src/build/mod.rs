//! Building the pinned notcurses release from source.
//!
//! The build runs as a fixed sequence: resolve the source tree
//! ([`source::prepare_source`]), configure with CMake, compile in parallel,
//! install, and on Linux refresh the dynamic linker cache. Each failing
//! step is reported as [`InstallerError::Build`] naming the [`BuildStep`].
//! The build directory is left on disk either way.

pub mod progress;
pub mod source;

pub use progress::{parse_build_progress, BuildProgress};
pub use source::{checkout_dir, prepare_source, SourceOrigin, SourceTree};

use std::path::PathBuf;

use crate::detection::{OsFamily, TargetEnvironment};
use crate::error::{BuildStep, InstallerError, Result};
use crate::shell::{CommandRunner, Invocation, OutputLine, Privilege};

/// Lines of captured output kept in a build error.
const ERROR_OUTPUT_LINES: usize = 30;

/// Resolved inputs for a source build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Directory holding checkouts.
    pub work_dir: PathBuf,

    /// Local source tree to build instead of fetching.
    pub source_dir: Option<PathBuf>,

    /// Parallel compile jobs.
    pub jobs: usize,

    /// Extra arguments for the configure step.
    pub cmake_args: Vec<String>,
}

/// Result of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub source: SourceTree,
    pub build_dir: PathBuf,
    pub jobs: usize,
}

/// Default compile parallelism.
///
/// `CMAKE_BUILD_PARALLEL_LEVEL` wins when it holds a positive number,
/// otherwise every CPU core is used.
pub fn default_jobs() -> usize {
    jobs_from_env(std::env::var("CMAKE_BUILD_PARALLEL_LEVEL").ok().as_deref())
}

fn jobs_from_env(value: Option<&str>) -> usize {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or_else(num_cpus::get)
}

/// Drives configure, compile and install for one source tree.
pub struct SourceBuilder<'a> {
    options: &'a BuildOptions,
    privilege: Privilege,
}

impl<'a> SourceBuilder<'a> {
    /// Create a builder. `privilege` applies to the install steps only.
    pub fn new(options: &'a BuildOptions, privilege: Privilege) -> Self {
        Self { options, privilege }
    }

    /// Fetch (or reuse) the source and build it.
    pub fn build(
        &self,
        env: &TargetEnvironment,
        runner: &dyn CommandRunner,
        on_output: &dyn Fn(OutputLine),
    ) -> Result<BuildReport> {
        let source = prepare_source(
            &self.options.work_dir,
            self.options.source_dir.as_deref(),
            &env.pinned,
            runner,
            on_output,
        )?;
        let build_dir = source.build_dir();
        tracing::info!(
            "Building notcurses {} from {} source at {}",
            env.pinned.version,
            source.origin,
            source.path.display()
        );

        for (step, invocation) in self.invocations(&source, &env.os) {
            run_build_step(runner, &invocation, step, on_output)?;
        }

        if env.os == OsFamily::Linux {
            self.refresh_linker_cache(runner);
        }

        Ok(BuildReport {
            source,
            build_dir,
            jobs: self.options.jobs,
        })
    }

    /// Configure, compile and install invocations for `source`.
    pub fn invocations(&self, source: &SourceTree, os: &OsFamily) -> Vec<(BuildStep, Invocation)> {
        let build_dir = source.build_dir();

        let configure = Invocation::new("cmake")
            .arg("-S")
            .path_arg(&source.path)
            .arg("-B")
            .path_arg(&build_dir)
            .arg("-DCMAKE_BUILD_TYPE=Release")
            .args(self.options.cmake_args.iter().cloned());

        let compile = Invocation::new("cmake")
            .arg("--build")
            .path_arg(&build_dir)
            .args(["--parallel".to_string(), self.options.jobs.to_string()]);

        let install = Invocation::new("cmake")
            .arg("--install")
            .path_arg(&build_dir)
            .with_privilege(self.install_privilege(os));

        vec![
            (BuildStep::Configure, configure),
            (BuildStep::Compile, compile),
            (BuildStep::Install, install),
        ]
    }

    fn install_privilege(&self, os: &OsFamily) -> Privilege {
        match os {
            OsFamily::Windows => Privilege::Direct,
            _ => self.privilege,
        }
    }

    fn refresh_linker_cache(&self, runner: &dyn CommandRunner) {
        let ldconfig = Invocation::new("ldconfig").with_privilege(self.privilege);
        match runner.run_captured(&ldconfig) {
            Ok(result) if result.success => {}
            Ok(result) => tracing::warn!(
                "`{}` exited with {:?}; new libraries may not be found until it runs",
                ldconfig,
                result.exit_code
            ),
            Err(e) => tracing::warn!("Could not run `{}`: {}", ldconfig, e),
        }
    }
}

/// Run one build invocation, mapping failure to the given step.
pub(crate) fn run_build_step(
    runner: &dyn CommandRunner,
    invocation: &Invocation,
    step: BuildStep,
    on_output: &dyn Fn(OutputLine),
) -> Result<()> {
    tracing::debug!("Build step {}: {}", step, invocation);
    match runner.run(invocation, on_output) {
        Ok(result) if result.success => Ok(()),
        Ok(result) => Err(InstallerError::Build {
            step,
            command: invocation.command_line(),
            code: result.exit_code,
            output: result.output_tail(ERROR_OUTPUT_LINES),
        }),
        Err(e) => Err(InstallerError::Build {
            step,
            command: invocation.command_line(),
            code: None,
            output: e.to_string(),
        }),
    }
}
