//! Integration tests for the install pipeline through the public API.

use std::path::PathBuf;

use tui_install::build::BuildOptions;
use tui_install::detection::{EnvironmentProber, HostOs, OsFamily, PinnedVersion};
use tui_install::runner::{Pipeline, PipelineOptions, SkipReason, Stage, StageOutcome};
use tui_install::shell::{CommandResult, Privilege, RecordingRunner};
use tui_install::ui::MockUI;
use tui_install::verify::VersionPolicy;

fn linux_with(tool: &'static str) -> EnvironmentProber<impl Fn(&str) -> Option<PathBuf>> {
    EnvironmentProber::with_lookup(HostOs::new(OsFamily::Linux), move |name: &str| {
        (name == tool).then(|| PathBuf::from("/usr/bin").join(name))
    })
}

fn options(work_dir: PathBuf) -> PipelineOptions {
    PipelineOptions {
        pinned: PinnedVersion::default(),
        policy: VersionPolicy::AtLeast,
        build: BuildOptions {
            work_dir,
            source_dir: None,
            jobs: 4,
            cmake_args: Vec::new(),
        },
        skip_deps: false,
        skip_build: false,
        test: false,
        force: false,
        dry_run: false,
    }
}

#[cfg(unix)]
#[test]
fn dry_run_plan_on_apt_host() {
    let runner = RecordingRunner::new();
    let mut opts = options(PathBuf::from("/nonexistent/work"));
    opts.dry_run = true;
    let mut ui = MockUI::new();

    let report = Pipeline::new(opts)
        .with_privilege(Privilege::Sudo)
        .run(&linux_with("apt-get"), &mut ui, &runner)
        .unwrap();

    let plan = report
        .planned
        .iter()
        .map(|inv| inv.command_line())
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(plan, @r"
    sudo apt-get update
    sudo apt-get install -y build-essential cmake pkg-config libncurses-dev libunistring-dev libavformat-dev libavutil-dev libswscale-dev libqrcodegen-dev git
    git clone --branch v3.0.11 https://github.com/dankamongmen/notcurses.git /nonexistent/work/notcurses-3.0.11
    cmake -S /nonexistent/work/notcurses-3.0.11 -B /nonexistent/work/notcurses-3.0.11/build -DCMAKE_BUILD_TYPE=Release
    cmake --build /nonexistent/work/notcurses-3.0.11/build --parallel 4
    sudo cmake --install /nonexistent/work/notcurses-3.0.11/build
    sudo ldconfig
    ");

    // Only the read-only pkg-config pre-check reached the runner.
    assert_eq!(runner.command_lines(), vec!["pkg-config --modversion notcurses"]);
}

#[test]
fn pacman_host_skips_source_build() {
    let runner = RecordingRunner::new();
    runner.queue("pkg-config", CommandResult::failure(Some(1), ""));
    runner.respond("pkg-config", CommandResult::success("3.0.11\n"));
    let temp = tempfile::TempDir::new().unwrap();
    let mut ui = MockUI::new();

    let report = Pipeline::new(options(temp.path().to_path_buf()))
        .with_privilege(Privilege::Direct)
        .run(&linux_with("pacman"), &mut ui, &runner)
        .unwrap();

    assert!(runner.ran("pacman -S --needed --noconfirm notcurses"));
    assert_eq!(runner.count("git"), 0);
    assert_eq!(
        report.outcome(Stage::Building),
        Some(&StageOutcome::Skipped(SkipReason::ProvidedBy(
            tui_install::detection::PackageManagerKind::Pacman
        )))
    );
    assert_eq!(report.detected_version.as_deref(), Some("3.0.11"));
}

#[test]
fn exact_policy_rejects_newer_install() {
    let runner = RecordingRunner::new();
    runner.respond("pkg-config", CommandResult::success("3.0.12\n"));
    let temp = tempfile::TempDir::new().unwrap();
    let mut opts = options(temp.path().to_path_buf());
    opts.policy = VersionPolicy::Exact;
    opts.skip_deps = true;
    opts.skip_build = true;
    opts.test = true;
    let mut ui = MockUI::new();

    let err = Pipeline::new(opts)
        .with_privilege(Privilege::Direct)
        .run(&linux_with("dnf"), &mut ui, &runner)
        .unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Verifying));
    assert!(err.to_string().contains("found 3.0.12"));
}

#[test]
fn local_source_dir_is_built_in_place() {
    let runner = RecordingRunner::new();
    runner.queue("pkg-config", CommandResult::failure(Some(1), ""));
    runner.respond("pkg-config", CommandResult::success("3.0.11\n"));
    let temp = tempfile::TempDir::new().unwrap();
    let local = temp.path().join("notcurses-src");
    std::fs::create_dir(&local).unwrap();
    let mut opts = options(temp.path().join("work"));
    opts.build.source_dir = Some(local.clone());
    let mut ui = MockUI::new();

    let report = Pipeline::new(opts)
        .with_privilege(Privilege::Direct)
        .run(&linux_with("apt-get"), &mut ui, &runner)
        .unwrap();

    assert_eq!(runner.count("git"), 0);
    assert_eq!(report.build.unwrap().source.path, local);
}
