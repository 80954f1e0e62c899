//! Install command implementation.
//!
//! Running `tui-install` without a subcommand loads the configuration,
//! runs the install pipeline and reports the outcome.

use std::path::{Path, PathBuf};

use crate::cli::args::InstallArgs;
use crate::config::{load_config, InstallConfig, Overrides};
use crate::detection::EnvironmentProber;
use crate::error::{InstallerError, Result};
use crate::runner::{Pipeline, PipelineOptions, PipelineReport};
use crate::shell::{CommandRunner, SystemRunner};
use crate::ui::{format_duration, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// Framework repository shown in the next-steps panel.
const FRAMEWORK_REPOSITORY: &str = "https://github.com/entrepeneur4lyf/tui-framework.git";

const SEARCH_PATH_HINT: &str = "If notcurses was installed under /usr/local, make sure \
     PKG_CONFIG_PATH includes /usr/local/lib/pkgconfig and LD_LIBRARY_PATH includes /usr/local/lib";

/// The install command implementation.
pub struct InstallCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: InstallArgs,
}

impl InstallCommand {
    /// Create a new install command.
    pub fn new(project_root: &Path, config_path: Option<PathBuf>, args: InstallArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path,
            args,
        }
    }

    /// Resolve defaults, config file and flags.
    fn resolve_config(&self) -> Result<InstallConfig> {
        let loaded = load_config(self.config_path.as_deref(), &self.project_root)?;
        let overrides = Overrides {
            work_dir: self.args.work_dir.clone(),
            jobs: self.args.jobs,
        };
        InstallConfig::resolve(loaded.config, overrides, &self.project_root)
    }

    fn pipeline_options(&self, config: &InstallConfig) -> PipelineOptions {
        PipelineOptions {
            pinned: config.pinned.clone(),
            policy: config.policy,
            build: config.build_options(),
            skip_deps: self.args.skip_deps,
            skip_build: self.args.skip_build,
            test: self.args.test,
            force: self.args.force,
            dry_run: self.args.dry_run,
        }
    }

    /// Run against an explicit prober and runner.
    pub fn execute_with<F>(
        &self,
        ui: &mut dyn UserInterface,
        prober: &EnvironmentProber<F>,
        runner: &dyn CommandRunner,
    ) -> Result<CommandResult>
    where
        F: Fn(&str) -> Option<PathBuf>,
    {
        let config = self.resolve_config()?;
        ui.show_header(&format!("Installing notcurses {}", config.pinned.version));
        if self.args.dry_run {
            ui.message("Dry run: commands that change the system will be printed, not run");
        }
        if let Some(dir) = config.source_dir.as_deref().filter(|dir| !dir.is_dir()) {
            ui.warning(&format!(
                "source_dir {} does not exist; the pinned release will be fetched",
                dir.display()
            ));
        }

        let pipeline = Pipeline::new(self.pipeline_options(&config));
        match pipeline.run(prober, ui, runner) {
            Ok(report) => {
                self.report_success(ui, &report);
                Ok(CommandResult::success())
            }
            Err(e) => {
                report_failure(ui, &e);
                Ok(CommandResult::failure(1))
            }
        }
    }

    fn report_success(&self, ui: &mut dyn UserInterface, report: &PipelineReport) {
        ui.show_summary(&report.summary());

        if self.args.dry_run {
            ui.success(&format!(
                "Dry run complete: {} command(s) not run",
                report.planned.len()
            ));
            return;
        }

        match &report.detected_version {
            Some(version) => ui.success(&format!(
                "notcurses {} detected ({})",
                version,
                format_duration(report.duration)
            )),
            None => ui.success(&format!(
                "Finished in {}",
                format_duration(report.duration)
            )),
        }

        show_next_steps(ui);
    }
}

/// Print the failed stage, the error and whatever context it carries.
fn report_failure(ui: &mut dyn UserInterface, error: &InstallerError) {
    match error.stage() {
        Some(stage) => ui.error(&format!("{} failed: {}", stage, error)),
        None => ui.error(&error.to_string()),
    }

    if let Some(command) = error.command() {
        ui.show_error_block(command, error.output().unwrap_or_default(), None);
    }

    match error {
        InstallerError::UnsupportedPlatform { supported, .. } => {
            ui.show_list("Supported platforms:", supported);
        }
        InstallerError::Verification { .. } => {
            ui.show_hint(SEARCH_PATH_HINT);
        }
        _ => {}
    }
}

fn show_next_steps(ui: &mut dyn UserInterface) {
    ui.show_header("Next steps");
    ui.message("1. Clone the TUI Framework:");
    ui.message(&format!("     git clone {}", FRAMEWORK_REPOSITORY));
    ui.message("2. Test the framework:");
    ui.message("     cd tui-framework && cargo run --example backend_test --features notcurses");
    ui.show_hint(SEARCH_PATH_HINT);
}

impl Command for InstallCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        self.execute_with(ui, &EnvironmentProber::system(), &SystemRunner::new())
    }
}
