//! Numeric version parsing and comparison.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// First dotted run of digits.
static VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)*").expect("VERSION_REGEX must compile"));

/// A dotted numeric version such as `3.0.11`.
///
/// Comparison treats missing trailing components as zero, so `3.0`
/// equals `3.0.0`.
#[derive(Debug, Clone)]
pub struct Version {
    parts: Vec<u64>,
    raw: String,
}

impl Version {
    /// Extract the first dotted number from free-form text.
    ///
    /// Handles `pkg-config` output like `3.0.11\n` as well as strings with
    /// prefixes or suffixes (`v3.0.11`, `3.0.11-rc1`).
    pub fn extract(text: &str) -> Option<Self> {
        let found = VERSION_REGEX.find(text)?;
        let parts = found
            .as_str()
            .split('.')
            .map(str::parse)
            .collect::<Result<Vec<u64>, _>>()
            .ok()?;
        Some(Self {
            parts,
            raw: found.as_str().to_string(),
        })
    }

    /// Numeric components.
    pub fn parts(&self) -> &[u64] {
        &self.parts
    }

    fn component(&self, index: usize) -> u64 {
        self.parts.get(index).copied().unwrap_or(0)
    }
}

impl FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::extract(s).ok_or_else(|| format!("'{}' is not a version", s))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        (0..len)
            .map(|i| self.component(i).cmp(&other.component(i)))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

/// How a detected version is judged against the pin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VersionPolicy {
    /// Detected must be the pinned version or newer.
    #[default]
    AtLeast,
    /// Detected must equal the pinned version.
    Exact,
}

impl VersionPolicy {
    /// Whether `detected` satisfies `pinned` under this policy.
    pub fn accepts(&self, detected: &Version, pinned: &Version) -> bool {
        match self {
            Self::AtLeast => detected >= pinned,
            Self::Exact => detected == pinned,
        }
    }
}

impl fmt::Display for VersionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtLeast => f.write_str("at least"),
            Self::Exact => f.write_str("exactly"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    #[test]
    fn extracts_from_pkg_config_output() {
        let version = Version::extract("3.0.11\n").unwrap();
        assert_eq!(version.parts(), &[3, 0, 11]);
        assert_eq!(version.to_string(), "3.0.11");
    }

    #[test]
    fn extracts_with_prefix_and_suffix() {
        assert_eq!(v("v3.0.11").parts(), &[3, 0, 11]);
        assert_eq!(v("3.0.11-rc1").parts(), &[3, 0, 11]);
        assert_eq!(v("notcurses 3.0.9 (debian)").parts(), &[3, 0, 9]);
    }

    #[test]
    fn rejects_text_without_digits() {
        assert!(Version::extract("Package notcurses was not found").is_none());
        assert!("".parse::<Version>().is_err());
    }

    #[test]
    fn compares_numerically_not_lexically() {
        assert!(v("3.0.11") > v("3.0.9"));
        assert!(v("3.1.0") > v("3.0.11"));
        assert!(v("10.0") > v("9.9.9"));
    }

    #[test]
    fn missing_components_are_zero() {
        assert_eq!(v("3.0"), v("3.0.0"));
        assert!(v("3.0.11") > v("3.0"));
        assert!(v("3") < v("3.0.1"));
    }

    #[test]
    fn at_least_policy() {
        let pinned = v("3.0.11");
        assert!(VersionPolicy::AtLeast.accepts(&v("3.0.11"), &pinned));
        assert!(VersionPolicy::AtLeast.accepts(&v("3.0.12"), &pinned));
        assert!(VersionPolicy::AtLeast.accepts(&v("4.0"), &pinned));
        assert!(!VersionPolicy::AtLeast.accepts(&v("3.0.8"), &pinned));
    }

    #[test]
    fn exact_policy() {
        let pinned = v("3.0.11");
        assert!(VersionPolicy::Exact.accepts(&v("3.0.11"), &pinned));
        assert!(!VersionPolicy::Exact.accepts(&v("3.0.12"), &pinned));
    }

    #[test]
    fn policy_serde_is_kebab_case() {
        let policy: VersionPolicy = serde_yaml::from_str("at-least").unwrap();
        assert_eq!(policy, VersionPolicy::AtLeast);
        let policy: VersionPolicy = serde_yaml::from_str("exact").unwrap();
        assert_eq!(policy, VersionPolicy::Exact);
        assert_eq!(VersionPolicy::default(), VersionPolicy::AtLeast);
    }
}
