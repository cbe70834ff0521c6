//! The analysis result handed to reporters.
//!
//! Everything here is plain serializable data; nothing refers back to the
//! pipeline that produced it.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::detect::Detection;
use crate::types::{FormatHint, FormatKind, Severity};
use crate::window::TimeWindow;

// ── Counters ──────────────────────────────────────────────────

/// Line accounting. `parsed + unparsed + out_of_window == total` always
/// holds; `empty` is a subset of `unparsed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCounts {
    pub total: u64,
    pub parsed: u64,
    pub unparsed: u64,
    pub empty: u64,
    pub out_of_window: u64,
}

impl LineCounts {
    pub fn add(&mut self, other: &LineCounts) {
        self.total += other.total;
        self.parsed += other.parsed;
        self.unparsed += other.unparsed;
        self.empty += other.empty;
        self.out_of_window += other.out_of_window;
    }

    /// Parsed lines as a percentage of in-window lines, two decimals.
    pub fn parse_rate(&self) -> f64 {
        let considered = self.total - self.out_of_window;
        if considered == 0 {
            return 0.0;
        }
        round2(self.parsed as f64 * 100.0 / considered as f64)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub error: u64,
    pub warn: u64,
    pub info: u64,
    pub debug: u64,
    pub unknown: u64,
}

impl SeverityCounts {
    pub fn add(&mut self, severity: Severity) {
        *self.slot(severity) += 1;
    }

    pub fn merge(&mut self, other: &SeverityCounts) {
        for severity in Severity::ALL {
            *self.slot(severity) += other.get(severity);
        }
    }

    pub fn get(&self, severity: Severity) -> u64 {
        match severity {
            Severity::Error => self.error,
            Severity::Warn => self.warn,
            Severity::Info => self.info,
            Severity::Debug => self.debug,
            Severity::Unknown => self.unknown,
        }
    }

    fn slot(&mut self, severity: Severity) -> &mut u64 {
        match severity {
            Severity::Error => &mut self.error,
            Severity::Warn => &mut self.warn,
            Severity::Info => &mut self.info,
            Severity::Debug => &mut self.debug,
            Severity::Unknown => &mut self.unknown,
        }
    }

    pub fn total(&self) -> u64 {
        self.error + self.warn + self.info + self.debug + self.unknown
    }

    /// Records with a decided severity (everything but `Unknown`).
    pub fn classified(&self) -> u64 {
        self.total() - self.unknown
    }

    /// Errors as a fraction of classified records; `None` when nothing was
    /// classified.
    pub fn error_fraction(&self) -> Option<f64> {
        let classified = self.classified();
        (classified > 0).then(|| self.error as f64 / classified as f64)
    }
}

// ── Rankings & timeline ───────────────────────────────────────

/// One row of a top-K table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub key: String,
    pub count: u64,
}

/// A repeated failure: `(status, path)` for web access, `("ERROR", pattern)`
/// for everything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FailureKey {
    pub kind: String,
    pub subject: String,
}

impl std::fmt::Display for FailureKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.subject)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEntry {
    #[serde(flatten)]
    pub key: FailureKey,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rankings {
    pub messages: Vec<RankedEntry>,
    pub actors: Vec<RankedEntry>,
    pub status_codes: Vec<RankedEntry>,
    pub paths: Vec<RankedEntry>,
    pub failures: Vec<FailureEntry>,
}

/// A histogram bucket. `start` is the bucket floor in the display offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub start: DateTime<FixedOffset>,
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub hourly: Vec<TimeBucket>,
    pub daily: Vec<TimeBucket>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub earliest: DateTime<FixedOffset>,
    pub latest: DateTime<FixedOffset>,
}

// ── Anomalies ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    HighErrorRate,
    TrafficSpike,
    SuspiciousActor,
    RepeatedFailure,
}

impl AnomalyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighErrorRate => "high_error_rate",
            Self::TrafficSpike => "traffic_spike",
            Self::SuspiciousActor => "suspicious_actor",
            Self::RepeatedFailure => "repeated_failure",
        }
    }
}

impl std::fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalySeverity {
    Low,
    Medium,
    High,
}

impl AnomalySeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for AnomalySeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A flagged finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    pub severity: AnomalySeverity,
    pub description: String,
    /// The measured value that tripped the rule (percentage, count, ...).
    pub metric: f64,
    /// Actor, bucket label or failure pair the finding is about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

// ── Sources & metadata ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    Ok,
    Failed,
    /// Not read because the line cap was reached first.
    Skipped,
}

/// Per-source outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReport {
    pub name: String,
    pub status: SourceStatus,
    pub format: FormatKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection: Option<Detection>,
    pub lines: LineCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceReport {
    pub fn failed(name: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            name: name.into(),
            status: SourceStatus::Failed,
            format: FormatKind::Unknown,
            detection: None,
            lines: LineCounts::default(),
            error: Some(error.to_string()),
        }
    }

    pub fn skipped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: SourceStatus::Skipped,
            format: FormatKind::Unknown,
            detection: None,
            lines: LineCounts::default(),
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub generated_at: DateTime<Utc>,
    pub format_hint: FormatHint,
    pub window: TimeWindow,
    pub timezone: String,
    pub top_k: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_lines: Option<u64>,
    pub max_lines_hit: bool,
    pub sources: Vec<SourceReport>,
}

impl RunMetadata {
    pub fn count_status(&self, status: SourceStatus) -> usize {
        self.sources.iter().filter(|s| s.status == status).count()
    }
}

// ── Result ────────────────────────────────────────────────────

/// Headline figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub lines: LineCounts,
    /// Percent of in-window lines that parsed.
    pub parse_rate: f64,
    pub severities: SeverityCounts,
    /// Percent of classified records that are errors.
    pub error_rate: f64,
    pub distinct_actors: usize,
    pub distinct_status_codes: usize,
    pub distinct_paths: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
    pub sources_ok: usize,
    pub sources_failed: usize,
    pub sources_skipped: usize,
}

/// Immutable outcome of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: Summary,
    pub rankings: Rankings,
    pub timeline: Timeline,
    pub anomalies: Vec<Anomaly>,
    pub metadata: RunMetadata,
}

impl AnalysisResult {
    /// True when every source failed to open or read.
    pub fn all_sources_failed(&self) -> bool {
        !self.metadata.sources.is_empty()
            && self
                .metadata
                .sources
                .iter()
                .all(|s| s.status == SourceStatus::Failed)
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
