//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct. Running without a
//! subcommand performs the install.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Install the notcurses native library the TUI framework builds against.
#[derive(Debug, Parser)]
#[command(name = "tui-install")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub install: InstallArgs,

    /// Path to config file (default: ./tui-install.yml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Show verbose output, including subprocess output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the detected platform and package manager without installing
    Detect(DetectArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the install run.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InstallArgs {
    /// Skip installing system dependencies
    #[arg(long)]
    pub skip_deps: bool,

    /// Skip building notcurses from source
    #[arg(long)]
    pub skip_build: bool,

    /// Verify the installation even when the build is skipped
    #[arg(long)]
    pub test: bool,

    /// Install even if a matching notcurses is already present
    #[arg(long)]
    pub force: bool,

    /// Print the commands that would change the system without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Parallel compile jobs (default: number of CPUs)
    #[arg(short, long, env = "TUI_INSTALL_JOBS")]
    pub jobs: Option<usize>,

    /// Directory for source checkouts and build trees (default: .tui-install)
    #[arg(long, value_name = "DIR", env = "TUI_INSTALL_WORK_DIR")]
    pub work_dir: Option<PathBuf>,
}

/// Arguments for the `detect` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DetectArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
