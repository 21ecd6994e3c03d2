//! The semantic version triple.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{Result, ToolsenseError};

/// First `major.minor[.patch]` run in free-form tool output.
static VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").expect("VERSION_REGEX must compile")
});

/// A `major.minor.patch` version.
///
/// Ordering is lexicographic over (major, minor, patch), which the derived
/// `Ord` provides through field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Create a version from its components.
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version string strictly.
    ///
    /// Accepts one to three dot-separated numeric components with an optional
    /// leading `v`; missing components default to 0.
    pub fn parse(input: &str) -> Result<Self> {
        let unparseable = || ToolsenseError::VersionUnparseable {
            input: input.to_string(),
        };

        let trimmed = input.trim();
        let trimmed = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(unparseable());
        }

        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.len() > 3 {
            return Err(unparseable());
        }

        let mut components = [0u64; 3];
        for (slot, part) in components.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(unparseable());
            }
            *slot = part.parse().map_err(|_| unparseable())?;
        }

        Ok(Self::new(components[0], components[1], components[2]))
    }

    /// Extract the first dotted version from free-form command output.
    ///
    /// Requires at least `major.minor`; an absent patch defaults to 0.
    pub fn extract(output: &str) -> Option<Self> {
        let caps = VERSION_REGEX.captures(output)?;
        let component = |idx: usize| -> Option<u64> {
            match caps.get(idx) {
                Some(m) => m.as_str().parse().ok(),
                None => Some(0),
            }
        };
        Some(Self::new(component(1)?, component(2)?, component(3)?))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = ToolsenseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Version::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn parse_full_triple() {
        assert_eq!(Version::parse("1.4.2").unwrap(), Version::new(1, 4, 2));
    }

    #[test]
    fn parse_missing_components_default_to_zero() {
        assert_eq!(Version::parse("2").unwrap(), Version::new(2, 0, 0));
        assert_eq!(Version::parse("2.1").unwrap(), Version::new(2, 1, 0));
    }

    #[test]
    fn parse_accepts_leading_v() {
        assert_eq!(Version::parse("v18.17.0").unwrap(), Version::new(18, 17, 0));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Version::parse("").is_err());
        assert!(Version::parse("abc").is_err());
        assert!(Version::parse("1..2").is_err());
        assert!(Version::parse("1.2.3.4").is_err());
        assert!(Version::parse("1.2.x").is_err());
        assert!(Version::parse("-1.0").is_err());
    }

    #[test]
    fn extract_from_tool_banner() {
        let output = "ripgrep 14.1.0 (rev e50df40a19)\n-SIMD -AVX (compiled)";
        assert_eq!(Version::extract(output), Some(Version::new(14, 1, 0)));
    }

    #[test]
    fn extract_two_component_version() {
        assert_eq!(
            Version::extract("jq-1.7"),
            Some(Version::new(1, 7, 0))
        );
    }

    #[test]
    fn extract_takes_first_match() {
        let output = "btop version: 1.3.2\nCompiled with: g++ (13.2.0)";
        assert_eq!(Version::extract(output), Some(Version::new(1, 3, 2)));
    }

    #[test]
    fn extract_no_match() {
        assert_eq!(Version::extract("no version here"), None);
        assert_eq!(Version::extract("release 7"), None);
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert!(Version::new(1, 9, 9) < Version::new(2, 0, 0));
        assert!(Version::new(1, 10, 0) > Version::new(1, 9, 99));
        assert!(Version::new(1, 0, 1) > Version::new(1, 0, 0));
    }

    #[test]
    fn ordering_is_total() {
        let samples = [
            Version::new(0, 0, 0),
            Version::new(0, 1, 0),
            Version::new(1, 0, 0),
            Version::new(1, 0, 1),
            Version::new(1, 4, 2),
            Version::new(2, 0, 0),
        ];
        for a in &samples {
            for b in &samples {
                let holds = [a < b, a == b, a > b];
                assert_eq!(holds.iter().filter(|h| **h).count(), 1, "{} vs {}", a, b);
                assert_eq!(a.cmp(b), b.cmp(a).reverse());
                if a == b {
                    assert_eq!(a.cmp(b), Ordering::Equal);
                }
            }
        }
    }

    #[test]
    fn display_is_dotted_triple() {
        assert_eq!(Version::new(3, 2, 1).to_string(), "3.2.1");
    }

    #[test]
    fn serde_uses_string_form() {
        let json = serde_json::to_string(&Version::new(1, 2, 3)).unwrap();
        assert_eq!(json, "\"1.2.3\"");
        let back: Version = serde_json::from_str("\"4.5\"").unwrap();
        assert_eq!(back, Version::new(4, 5, 0));
    }
}
