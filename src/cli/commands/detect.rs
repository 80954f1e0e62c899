//! Detect command implementation.
//!
//! `tui-install detect` runs only the probing stage and prints the
//! resulting descriptor.

use std::path::{Path, PathBuf};

use crate::cli::args::DetectArgs;
use crate::config::{load_config, InstallConfig, Overrides};
use crate::detection::{EnvironmentProber, TargetEnvironment};
use crate::error::{InstallerError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The detect command implementation.
pub struct DetectCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: DetectArgs,
}

impl DetectCommand {
    /// Create a new detect command.
    pub fn new(project_root: &Path, config_path: Option<PathBuf>, args: DetectArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path,
            args,
        }
    }

    /// Resolve the config so the reported pin matches what install uses.
    fn resolve_config(&self) -> Result<InstallConfig> {
        let loaded = load_config(self.config_path.as_deref(), &self.project_root)?;
        InstallConfig::resolve(loaded.config, Overrides::default(), &self.project_root)
    }

    /// Probe with an explicit prober.
    pub fn execute_with<F>(
        &self,
        ui: &mut dyn UserInterface,
        prober: &EnvironmentProber<F>,
    ) -> Result<CommandResult>
    where
        F: Fn(&str) -> Option<PathBuf>,
    {
        let config = self.resolve_config()?;
        let env = match prober.probe(config.pinned) {
            Ok(env) => env,
            Err(InstallerError::UnsupportedPlatform {
                detected,
                supported,
            }) => {
                ui.error(&format!("Unsupported platform: {}", detected));
                ui.show_list("Supported platforms:", &supported);
                return Ok(CommandResult::failure(1));
            }
            Err(e) => return Err(e),
        };

        if self.args.json {
            println!("{}", render_json(&env)?);
        } else {
            ui.message(&format!("Platform:        {}", prober.host().description));
            ui.message(&format!("Package manager: {}", env.package_manager));
            ui.message(&format!("Pinned version:  notcurses {}", env.pinned.version));
        }

        Ok(CommandResult::success())
    }
}

fn render_json(env: &TargetEnvironment) -> Result<String> {
    serde_json::to_string_pretty(env).map_err(|e| InstallerError::Other(e.into()))
}

impl Command for DetectCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        self.execute_with(ui, &EnvironmentProber::system())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{HostOs, OsFamily, PinnedVersion};
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn brew_host() -> EnvironmentProber<impl Fn(&str) -> Option<PathBuf>> {
        EnvironmentProber::with_lookup(HostOs::new(OsFamily::MacOs), |tool: &str| {
            (tool == "brew").then(|| PathBuf::from("/opt/homebrew/bin/brew"))
        })
    }

    #[test]
    fn prints_descriptor_fields() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        let result = DetectCommand::new(temp.path(), None, DetectArgs::default())
            .execute_with(&mut ui, &brew_host())
            .unwrap();

        assert!(result.success);
        assert!(ui.has_message("Package manager: homebrew"));
        assert!(ui.has_message("notcurses 3.0.11"));
    }

    #[test]
    fn unsupported_platform_fails() {
        let temp = TempDir::new().unwrap();
        let prober = EnvironmentProber::with_lookup(HostOs::new(OsFamily::Linux), |_: &str| None);
        let mut ui = MockUI::new();

        let result = DetectCommand::new(temp.path(), None, DetectArgs::default())
            .execute_with(&mut ui, &prober)
            .unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("Unsupported platform"));
        assert_eq!(ui.lists().len(), 1);
    }

    #[test]
    fn reports_version_pinned_in_config() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("tui-install.yml"), "version: \"3.0.9\"\n").unwrap();
        let mut ui = MockUI::new();

        let result = DetectCommand::new(temp.path(), None, DetectArgs::default())
            .execute_with(&mut ui, &brew_host())
            .unwrap();

        assert!(result.success);
        assert!(ui.has_message("Pinned version:  notcurses 3.0.9"));
        assert!(!ui.has_message("3.0.11"));
    }

    #[test]
    fn invalid_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("tui-install.yml"), "jobs: 0\n").unwrap();
        let mut ui = MockUI::new();

        let err = DetectCommand::new(temp.path(), None, DetectArgs::default())
            .execute_with(&mut ui, &brew_host())
            .unwrap_err();

        assert!(matches!(err, InstallerError::ConfigValidation { .. }));
    }

    #[test]
    fn json_uses_lowercase_names() {
        let env = TargetEnvironment {
            os: OsFamily::MacOs,
            package_manager: crate::detection::PackageManagerKind::Homebrew,
            pinned: PinnedVersion::default(),
        };
        let json = render_json(&env).unwrap();
        assert!(json.contains("\"os\": \"macos\""));
        assert!(json.contains("\"package_manager\": \"homebrew\""));
    }
}
