//! Version range operators and compatibility checks.
//!
//! Supported operators: `=`, `!=`, `>`, `>=`, `<`, `<=`, `~`, `^`.
//!
//! - `~bound` matches the same major and minor with `patch >= bound.patch`.
//! - `^bound` matches the same major with a greater minor, or the same minor
//!   and `patch >= bound.patch`.
//!
//! # Example
//!
//! ```
//! use toolsense::version::compare;
//!
//! assert!(compare("1.4.2", "~", "1.4.0").unwrap());
//! assert!(!compare("2.0.0", "^", "1.4.0").unwrap());
//! ```

use std::fmt;
use std::str::FromStr;

use super::Version;
use crate::error::{Result, ToolsenseError};

/// A version comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Tilde,
    Caret,
}

impl Operator {
    /// All operators, longest symbols first so prefix parsing is unambiguous.
    const BY_SYMBOL_LEN: [Operator; 8] = [
        Operator::Ne,
        Operator::Ge,
        Operator::Le,
        Operator::Eq,
        Operator::Gt,
        Operator::Lt,
        Operator::Tilde,
        Operator::Caret,
    ];

    /// The operator's textual symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Tilde => "~",
            Operator::Caret => "^",
        }
    }

    /// Evaluate `version <op> bound`.
    pub fn matches(self, version: &Version, bound: &Version) -> bool {
        match self {
            Operator::Eq => version == bound,
            Operator::Ne => version != bound,
            Operator::Gt => version > bound,
            Operator::Ge => version >= bound,
            Operator::Lt => version < bound,
            Operator::Le => version <= bound,
            Operator::Tilde => {
                version.major == bound.major
                    && version.minor == bound.minor
                    && version.patch >= bound.patch
            }
            Operator::Caret => {
                version.major == bound.major
                    && (version.minor > bound.minor
                        || (version.minor == bound.minor && version.patch >= bound.patch))
            }
        }
    }
}

impl FromStr for Operator {
    type Err = ToolsenseError;

    fn from_str(s: &str) -> Result<Self> {
        Operator::BY_SYMBOL_LEN
            .into_iter()
            .find(|op| op.symbol() == s.trim())
            .ok_or_else(|| ToolsenseError::InvalidOperator {
                input: s.to_string(),
            })
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// An operator applied to a bound, e.g. `>=2.0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraint {
    pub op: Operator,
    pub bound: Version,
}

impl Constraint {
    /// Create a constraint.
    pub fn new(op: Operator, bound: Version) -> Self {
        Self { op, bound }
    }

    /// Parse a constraint such as `>=2.0.0`, `~ 1.4` or `^1.4.0`.
    ///
    /// A malformed operator or bound yields [`ToolsenseError::InvalidOperator`].
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = || ToolsenseError::InvalidOperator {
            input: input.to_string(),
        };

        let op = Operator::BY_SYMBOL_LEN
            .into_iter()
            .find(|op| trimmed.starts_with(op.symbol()))
            .ok_or_else(invalid)?;
        let bound = Version::parse(&trimmed[op.symbol().len()..]).map_err(|_| invalid())?;

        Ok(Self { op, bound })
    }

    /// Whether `version` satisfies this constraint.
    pub fn matches(&self, version: &Version) -> bool {
        self.op.matches(version, &self.bound)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op, self.bound)
    }
}

/// Evaluate `version <operator> bound` from their textual forms.
///
/// The version must parse (else [`ToolsenseError::VersionUnparseable`]); an
/// unknown operator or unparseable bound fails with
/// [`ToolsenseError::InvalidOperator`] instead of silently passing.
pub fn compare(version: &str, operator: &str, bound: &str) -> Result<bool> {
    let op: Operator = operator.parse()?;
    let bound = Version::parse(bound).map_err(|_| ToolsenseError::InvalidOperator {
        input: format!("{}{}", operator, bound),
    })?;
    let version = Version::parse(version)?;
    Ok(op.matches(&version, &bound))
}

/// Outcome of checking a detected version against registry bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compatibility {
    /// Within bounds (or no bounds declared).
    Compatible,
    /// Outside bounds; names the violated constraint.
    Incompatible { violated: Constraint },
    /// No version could be detected, so bounds cannot be checked.
    Unknown,
}

impl Compatibility {
    pub fn is_compatible(&self) -> bool {
        matches!(self, Compatibility::Compatible)
    }
}

/// Classify `version` against optional `min` and `max` bounds (both inclusive).
pub fn check_bounds(
    version: Option<&Version>,
    min: Option<&Version>,
    max: Option<&Version>,
) -> Compatibility {
    let Some(version) = version else {
        return Compatibility::Unknown;
    };

    if let Some(min) = min {
        let constraint = Constraint::new(Operator::Ge, *min);
        if !constraint.matches(version) {
            return Compatibility::Incompatible {
                violated: constraint,
            };
        }
    }

    if let Some(max) = max {
        let constraint = Constraint::new(Operator::Le, *max);
        if !constraint.matches(version) {
            return Compatibility::Incompatible {
                violated: constraint,
            };
        }
    }

    Compatibility::Compatible
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn tilde_examples() {
        assert!(compare("1.4.2", "~", "1.4.0").unwrap());
        assert!(!compare("1.5.0", "~", "1.4.0").unwrap());
        assert!(!compare("1.4.0", "~", "1.4.1").unwrap());
    }

    #[test]
    fn caret_examples() {
        assert!(compare("1.9.0", "^", "1.4.0").unwrap());
        assert!(!compare("2.0.0", "^", "1.4.0").unwrap());
        assert!(compare("1.4.3", "^", "1.4.2").unwrap());
        assert!(!compare("1.4.1", "^", "1.4.2").unwrap());
        assert!(!compare("1.3.9", "^", "1.4.0").unwrap());
    }

    #[test]
    fn tilde_and_caret_are_reflexive() {
        for s in ["0.0.0", "1.4.2", "10.0.3"] {
            assert!(compare(s, "~", s).unwrap(), "~ reflexive for {}", s);
            assert!(compare(s, "^", s).unwrap(), "^ reflexive for {}", s);
        }
    }

    #[test]
    fn equality_operators() {
        assert!(compare("1.2.3", "=", "1.2.3").unwrap());
        assert!(!compare("1.2.3", "=", "1.2.4").unwrap());
        assert!(compare("1.2.3", "!=", "1.2.4").unwrap());
        assert!(!compare("1.2.3", "!=", "1.2.3").unwrap());
    }

    #[test]
    fn ordering_operators() {
        assert!(compare("2.0.0", ">", "1.9.9").unwrap());
        assert!(compare("2.0.0", ">=", "2.0.0").unwrap());
        assert!(compare("1.9.9", "<", "2.0.0").unwrap());
        assert!(compare("2.0.0", "<=", "2.0.0").unwrap());
        assert!(!compare("2.0.1", "<=", "2.0.0").unwrap());
    }

    #[test]
    fn unknown_operator_is_rejected() {
        let err = compare("1.0.0", "=>", "1.0.0").unwrap_err();
        assert!(matches!(err, ToolsenseError::InvalidOperator { .. }));
        assert!(compare("1.0.0", "", "1.0.0").is_err());
    }

    #[test]
    fn malformed_bound_is_invalid_operator() {
        let err = compare("1.0.0", ">=", "latest").unwrap_err();
        assert!(matches!(err, ToolsenseError::InvalidOperator { .. }));
    }

    #[test]
    fn malformed_version_is_unparseable() {
        let err = compare("unknown", ">=", "1.0.0").unwrap_err();
        assert!(matches!(err, ToolsenseError::VersionUnparseable { .. }));
    }

    #[test]
    fn constraint_parse_prefers_two_char_operators() {
        assert_eq!(Constraint::parse(">=2.0.0").unwrap().op, Operator::Ge);
        assert_eq!(Constraint::parse("<= 1.0").unwrap().op, Operator::Le);
        assert_eq!(Constraint::parse("!=3").unwrap().op, Operator::Ne);
        assert_eq!(Constraint::parse("~1.4").unwrap().bound, v("1.4.0"));
    }

    #[test]
    fn constraint_parse_rejects_missing_operator() {
        assert!(matches!(
            Constraint::parse("2.0.0"),
            Err(ToolsenseError::InvalidOperator { .. })
        ));
        assert!(Constraint::parse(">=").is_err());
    }

    #[test]
    fn constraint_display_round_trips() {
        let c = Constraint::parse("^1.4.0").unwrap();
        assert_eq!(c.to_string(), "^1.4.0");
    }

    #[test]
    fn bounds_check_min_only() {
        let min = v("2.0.0");
        assert_eq!(
            check_bounds(Some(&v("1.9.9")), Some(&min), None),
            Compatibility::Incompatible {
                violated: Constraint::new(Operator::Ge, min)
            }
        );
        assert!(check_bounds(Some(&v("2.0.0")), Some(&min), None).is_compatible());
    }

    #[test]
    fn bounds_check_max_is_inclusive() {
        let max = v("3.0.0");
        assert!(check_bounds(Some(&v("3.0.0")), None, Some(&max)).is_compatible());
        assert!(!check_bounds(Some(&v("3.0.1")), None, Some(&max)).is_compatible());
    }

    #[test]
    fn bounds_check_without_version_is_unknown() {
        assert_eq!(
            check_bounds(None, Some(&v("1.0.0")), None),
            Compatibility::Unknown
        );
    }

    #[test]
    fn no_bounds_is_compatible() {
        assert!(check_bounds(Some(&v("0.0.1")), None, None).is_compatible());
    }
}
