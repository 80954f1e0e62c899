//! Progress spinners.

use indicatif::{ProgressBar, ProgressStyle};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::build::{parse_build_progress, BuildProgress};
use crate::shell::{OutputCallback, OutputLine};

use super::theme::InstallerTheme;
use super::SpinnerHandle;

/// Longest live output line shown under a spinner.
const MAX_LINE_WIDTH: usize = 72;

/// A progress spinner for long-running stages.
pub struct ProgressSpinner {
    bar: ProgressBar,
    theme: InstallerTheme,
}

impl ProgressSpinner {
    /// Create a new spinner with a message.
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("{spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self {
            bar,
            theme: InstallerTheme::detect(),
        }
    }

    /// Create a spinner that doesn't draw anything.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            theme: InstallerTheme::plain(),
        }
    }

    fn finish_with(&mut self, msg: String) {
        self.bar.set_style(ProgressStyle::with_template("{msg}").unwrap_or_else(|_| {
            ProgressStyle::default_spinner()
        }));
        self.bar.finish_with_message(msg);
    }
}

impl SpinnerHandle for ProgressSpinner {
    fn set_message(&mut self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        let line = self.theme.format_success(msg);
        self.finish_with(line);
    }

    fn finish_error(&mut self, msg: &str) {
        let line = self.theme.format_error(msg);
        self.finish_with(line);
    }

    fn finish_skipped(&mut self, msg: &str) {
        let line = self.theme.format_skipped(msg);
        self.finish_with(line);
    }

    fn progress_bar(&self) -> Option<ProgressBar> {
        Some(self.bar.clone())
    }
}

#[derive(Default)]
struct LiveState {
    lines: VecDeque<String>,
    progress: Option<BuildProgress>,
}

/// Create an output callback that keeps a spinner's message current.
///
/// The message shows `base_message`, the latest build progress marker when
/// `track_progress` is set, and a ring buffer of the last `max_lines`
/// output lines.
pub fn live_output_callback(
    bar: ProgressBar,
    base_message: String,
    max_lines: usize,
    track_progress: bool,
) -> OutputCallback {
    let state = Arc::new(Mutex::new(LiveState::default()));
    let theme = InstallerTheme::detect();

    Box::new(move |line: OutputLine| {
        let text = line.text().trim_end();
        if text.is_empty() {
            return;
        }

        let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
        if track_progress {
            if let Some(progress) = parse_build_progress(text) {
                state.progress = Some(progress);
            }
        }

        state.lines.push_back(truncate(text));
        while state.lines.len() > max_lines {
            state.lines.pop_front();
        }

        let mut msg = base_message.clone();
        if let Some(progress) = state.progress {
            msg.push_str(&format!(" {}", theme.info.apply_to(format!("[{}]", progress))));
        }
        for line in &state.lines {
            msg.push_str("\n    ");
            msg.push_str(&theme.dim.apply_to(format!("» {}", line)).to_string());
        }

        bar.set_message(msg);
    })
}

/// Create an output callback that prints every line (verbose mode without a TTY).
pub fn echo_output_callback() -> OutputCallback {
    Box::new(|line: OutputLine| {
        let text = line.text().trim_end();
        if !text.is_empty() {
            println!("    {}", text);
        }
    })
}

fn truncate(text: &str) -> String {
    if text.chars().count() > MAX_LINE_WIDTH {
        let head: String = text.chars().take(MAX_LINE_WIDTH - 3).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
