//! Core log analysis types: severities, grammar kinds and parsed records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::LogError;

// ── Severity ──────────────────────────────────────────────────

/// Normalized severity of a record.
///
/// `Unknown` means neither the grammar nor the classifier could decide. It is
/// counted in totals but left out of the error-rate denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
    Unknown,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Self::Error,
        Self::Warn,
        Self::Info,
        Self::Debug,
        Self::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }

    /// Map an explicit level token (`[error]`, `WARNING`, `crit`, ...) to a
    /// severity. Returns `None` for tokens that are not levels.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "trace" | "debug" => Some(Self::Debug),
            "info" | "notice" | "information" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" | "err" | "crit" | "critical" | "alert" | "emerg" | "emergency"
            | "fatal" | "panic" | "severe" => Some(Self::Error),
            _ => None,
        }
    }

    /// Map a syslog `<PRI>` value to a severity (the low three bits carry
    /// the RFC 3164 level).
    pub fn from_syslog_priority(pri: u8) -> Self {
        match pri & 0x07 {
            0..=3 => Self::Error, // Emergency, Alert, Critical, Error
            4 => Self::Warn,
            5 | 6 => Self::Info, // Notice, Informational
            _ => Self::Debug,
        }
    }

    /// Severity of an HTTP response status.
    pub fn from_status(status: u16) -> Self {
        if status >= 500 {
            Self::Error
        } else if status >= 400 {
            Self::Warn
        } else {
            Self::Info
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Format ────────────────────────────────────────────────────

/// The grammar family a log source is parsed with.
///
/// Adding a grammar means adding a variant here, a parse function in
/// `parsers`, and a slot in [`FormatKind::CANDIDATES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    /// BSD syslog: `Jan 17 10:15:32 host proc[pid]: msg`.
    Syslog,
    /// Combined/common access log (nginx, Apache).
    WebAccess,
    /// nginx error log: `2026/01/17 10:15:32 [error] pid#tid: msg`.
    WebError,
    /// Generic application log: `2026-01-17 10:15:32.123 ERROR [comp] msg`.
    Application,
    /// No grammar; matches nothing.
    Unknown,
}

impl FormatKind {
    /// Detection candidates in tie-break priority order.
    pub const CANDIDATES: [FormatKind; 4] = [
        Self::WebAccess,
        Self::WebError,
        Self::Syslog,
        Self::Application,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Syslog => "syslog",
            Self::WebAccess => "web_access",
            Self::WebError => "web_error",
            Self::Application => "application",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FormatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatKind {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "syslog" => Ok(Self::Syslog),
            "web_access" | "access" | "nginx_access" | "apache_access" => Ok(Self::WebAccess),
            "web_error" | "nginx_error" => Ok(Self::WebError),
            "application" | "app" => Ok(Self::Application),
            other => Err(LogError::UnknownFormat(other.to_string())),
        }
    }
}

/// Format selection for a run: auto-detect per source, or force one grammar
/// for every source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatHint {
    #[default]
    Auto,
    Forced(FormatKind),
}

impl FromStr for FormatHint {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        s.parse().map(Self::Forced)
    }
}

// ── Record ────────────────────────────────────────────────────

/// Request fields extracted from a web access line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub protocol: String,
    pub status: u16,
    /// Response size; `None` when the log wrote `-`.
    pub bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Grammar-specific fields of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum RecordDetail {
    Syslog {
        host: String,
        process: String,
        pid: Option<u32>,
        priority: Option<u8>,
    },
    WebAccess(HttpRequest),
    WebError {
        pid: u32,
        tid: u32,
        connection_id: Option<u64>,
    },
    Application {
        component: Option<String>,
    },
}

/// One parsed log line, normalized across grammars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Normalized instant; `None` if the timestamp text could not be parsed.
    pub timestamp: Option<DateTime<Utc>>,
    pub severity: Severity,
    /// Client address or other acting party, when the line names one.
    pub actor: Option<String>,
    pub message: String,
    pub detail: RecordDetail,
}

impl Record {
    pub fn format(&self) -> FormatKind {
        match self.detail {
            RecordDetail::Syslog { .. } => FormatKind::Syslog,
            RecordDetail::WebAccess(_) => FormatKind::WebAccess,
            RecordDetail::WebError { .. } => FormatKind::WebError,
            RecordDetail::Application { .. } => FormatKind::Application,
        }
    }

    pub fn http(&self) -> Option<&HttpRequest> {
        match &self.detail {
            RecordDetail::WebAccess(req) => Some(req),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_tokens_map_case_insensitively() {
        assert_eq!(Severity::from_token("ERROR"), Some(Severity::Error));
        assert_eq!(Severity::from_token("crit"), Some(Severity::Error));
        assert_eq!(Severity::from_token("Warning"), Some(Severity::Warn));
        assert_eq!(Severity::from_token("notice"), Some(Severity::Info));
        assert_eq!(Severity::from_token("TRACE"), Some(Severity::Debug));
        assert_eq!(Severity::from_token("database"), None);
    }

    #[test]
    fn syslog_priority_uses_low_bits() {
        assert_eq!(Severity::from_syslog_priority(134), Severity::Info); // local0.info
        assert_eq!(Severity::from_syslog_priority(131), Severity::Error); // local0.err
        assert_eq!(Severity::from_syslog_priority(132), Severity::Warn);
        assert_eq!(Severity::from_syslog_priority(15), Severity::Debug);
    }

    #[test]
    fn status_thresholds() {
        assert_eq!(Severity::from_status(200), Severity::Info);
        assert_eq!(Severity::from_status(304), Severity::Info);
        assert_eq!(Severity::from_status(404), Severity::Warn);
        assert_eq!(Severity::from_status(503), Severity::Error);
    }

    #[test]
    fn format_aliases_parse() {
        assert_eq!("nginx_access".parse::<FormatKind>().unwrap(), FormatKind::WebAccess);
        assert_eq!("web-error".parse::<FormatKind>().unwrap(), FormatKind::WebError);
        assert_eq!("APP".parse::<FormatKind>().unwrap(), FormatKind::Application);
        assert!("unknown".parse::<FormatKind>().is_err());
        assert!("json".parse::<FormatKind>().is_err());
    }

    #[test]
    fn format_hint_parses_auto_and_forced() {
        assert_eq!("auto".parse::<FormatHint>().unwrap(), FormatHint::Auto);
        assert_eq!(
            "syslog".parse::<FormatHint>().unwrap(),
            FormatHint::Forced(FormatKind::Syslog)
        );
        assert!(matches!(
            "xml".parse::<FormatHint>(),
            Err(LogError::UnknownFormat(_))
        ));
    }

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Warn).unwrap();
        assert_eq!(json, "\"warn\"");
    }
}
