//! Installation records.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::PackageManager;

/// Longest `details` text kept in a record.
pub const MAX_DETAILS_LEN: usize = 500;

/// How an install attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallOutcome {
    Success,
    Failed,
    Cancelled,
}

impl InstallOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            InstallOutcome::Success => "success",
            InstallOutcome::Failed => "failed",
            InstallOutcome::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstallOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(InstallOutcome::Success),
            "failed" => Ok(InstallOutcome::Failed),
            "cancelled" => Ok(InstallOutcome::Cancelled),
            other => Err(format!("unknown install outcome '{}'", other)),
        }
    }
}

/// One install attempt. Records are appended to the log and never changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallationRecord {
    pub timestamp: DateTime<Utc>,
    pub tool: String,
    pub manager: PackageManager,
    pub package: String,
    pub outcome: InstallOutcome,
    #[serde(serialize_with = "serialize_secs")]
    pub duration: Duration,
    pub details: String,
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

impl InstallationRecord {
    pub fn new(
        tool: impl Into<String>,
        manager: PackageManager,
        package: impl Into<String>,
        outcome: InstallOutcome,
        duration: Duration,
        details: impl AsRef<str>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            tool: tool.into(),
            manager,
            package: package.into(),
            outcome,
            duration,
            details: sanitize_details(details.as_ref()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == InstallOutcome::Success
    }

    /// Render as one log line.
    pub fn to_log_line(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{:.1}|{}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.tool,
            self.manager,
            self.package,
            self.outcome,
            self.duration.as_secs_f64(),
            self.details
        )
    }

    /// Parse a log line written by [`InstallationRecord::to_log_line`].
    pub fn parse_log_line(line: &str) -> Option<Self> {
        let mut fields = line.splitn(7, '|');
        let timestamp = DateTime::parse_from_rfc3339(fields.next()?)
            .ok()?
            .with_timezone(&Utc);
        let tool = fields.next()?.to_string();
        let manager = fields.next()?.parse().ok()?;
        let package = fields.next()?.to_string();
        let outcome = fields.next()?.parse().ok()?;
        let secs: f64 = fields.next()?.parse().ok()?;
        let details = fields.next().unwrap_or_default().to_string();

        Some(Self {
            timestamp,
            tool,
            manager,
            package,
            outcome,
            duration: Duration::try_from_secs_f64(secs).ok()?,
            details,
        })
    }
}

/// Flatten details onto one line without field separators, and cap its length.
pub fn sanitize_details(details: &str) -> String {
    let flat: String = details
        .chars()
        .map(|c| if c == '|' || c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    let flat = flat.trim();
    if flat.chars().count() <= MAX_DETAILS_LEN {
        flat.to_string()
    } else {
        flat.chars().take(MAX_DETAILS_LEN).collect()
    }
}
