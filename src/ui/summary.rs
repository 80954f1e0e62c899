//! End-of-run summary data and formatting helpers.

use std::time::Duration;

/// Final status of one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Completed,
    Skipped,
}

impl StatusKind {
    /// Single-character icon.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Completed => "✓",
            Self::Skipped => "○",
        }
    }
}

/// One row of the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageLine {
    pub name: String,
    pub status: StatusKind,
    /// Skip reason or short result detail.
    pub detail: Option<String>,
    pub duration: Option<Duration>,
}

/// Everything shown at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub stages: Vec<StageLine>,
    pub total_duration: Duration,
    /// Library version found by the verifier, if it ran.
    pub detected_version: Option<String>,
}

impl RunSummary {
    /// Text of the right-hand column for a row.
    pub fn detail_for(line: &StageLine) -> String {
        match (&line.detail, line.duration) {
            (Some(detail), _) => detail.clone(),
            (None, Some(duration)) => format_duration(duration),
            (None, None) => String::new(),
        }
    }
}

/// Format a duration for display.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{:.1}s", duration.as_secs_f64())
    } else {
        format!("{}ms", duration.as_millis())
    }
}
