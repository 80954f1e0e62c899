//! Build progress parsing.
//!
//! CMake's Makefile generator prefixes lines with `[ 42%]`, Ninja with
//! `[12/80]`. Either is turned into a [`BuildProgress`] for the spinner.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// `[ 42%]` captures group 1, `[12/80]` captures groups 1 and 2.
static PROGRESS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\s*(\d+)\s*(?:%|/\s*(\d+)\s*)\]").expect("PROGRESS_REGEX must compile")
});

/// Position within a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildProgress {
    pub current: usize,
    pub total: usize,
}

impl BuildProgress {
    /// Completion as a whole percentage, clamped to 100.
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        (self.current.saturating_mul(100) / self.total).min(100)
    }
}

impl fmt::Display for BuildProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 100 {
            write!(f, "{}%", self.current.min(100))
        } else {
            write!(f, "{}/{} ({}%)", self.current, self.total, self.percent())
        }
    }
}

/// Parse a progress marker from one line of build output.
pub fn parse_build_progress(line: &str) -> Option<BuildProgress> {
    let caps = PROGRESS_REGEX.captures(line)?;
    let current = caps[1].parse().ok()?;
    let total = match caps.get(2) {
        Some(total) => total.as_str().parse().ok()?,
        None => 100,
    };
    Some(BuildProgress { current, total })
}
