//! Run configuration: the user-facing `RunOptions` and the validated
//! `RunConfig` the pipeline consumes.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::detect::{DEFAULT_MIN_MATCHES, DEFAULT_SAMPLE_SIZE};
use crate::error::{LogError, LogResult};
use crate::timestamp::{self, TimeContext};
use crate::types::FormatHint;
use crate::window::{self, BoundSide, TimeWindow};

/// Default number of entries per ranking table.
pub const DEFAULT_TOP_K: usize = 10;

/// Thresholds for the anomaly rules.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyThresholds {
    /// Error rate (fraction of classified records) above which a flag is
    /// raised.
    pub error_rate: f64,
    /// Hourly bucket count above this multiple of the mean is a spike.
    pub spike_factor: f64,
    /// Actor count above this multiple of the per-actor mean is suspicious.
    pub actor_factor: f64,
    /// Failure pairs seen at least this many times are reported.
    pub repeated_failure: u64,
}

pub const DEFAULT_ERROR_RATE: f64 = 0.10;
pub const DEFAULT_SPIKE_FACTOR: f64 = 3.0;
pub const DEFAULT_ACTOR_FACTOR: f64 = 5.0;
pub const DEFAULT_REPEATED_FAILURE: u64 = 5;

impl Default for AnomalyThresholds {
    fn default() -> Self {
        Self {
            error_rate: DEFAULT_ERROR_RATE,
            spike_factor: DEFAULT_SPIKE_FACTOR,
            actor_factor: DEFAULT_ACTOR_FACTOR,
            repeated_failure: DEFAULT_REPEATED_FAILURE,
        }
    }
}

/// Threshold overrides as the user writes them (`[analysis.thresholds]`).
/// Unset fields fall back to the defaults at resolve time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdOptions {
    pub error_rate: Option<f64>,
    pub spike_factor: Option<f64>,
    pub actor_factor: Option<f64>,
    pub repeated_failure: Option<u64>,
}

impl ThresholdOptions {
    /// Overlay `other` on top of `self` field by field.
    pub fn merge(self, other: ThresholdOptions) -> ThresholdOptions {
        ThresholdOptions {
            error_rate: other.error_rate.or(self.error_rate),
            spike_factor: other.spike_factor.or(self.spike_factor),
            actor_factor: other.actor_factor.or(self.actor_factor),
            repeated_failure: other.repeated_failure.or(self.repeated_failure),
        }
    }

    pub fn resolve(&self) -> AnomalyThresholds {
        AnomalyThresholds {
            error_rate: self.error_rate.unwrap_or(DEFAULT_ERROR_RATE),
            spike_factor: self.spike_factor.unwrap_or(DEFAULT_SPIKE_FACTOR),
            actor_factor: self.actor_factor.unwrap_or(DEFAULT_ACTOR_FACTOR),
            repeated_failure: self.repeated_failure.unwrap_or(DEFAULT_REPEATED_FAILURE),
        }
    }
}

/// Analysis options as a user writes them (TOML `[analysis]` table or CLI
/// flags). Every field is optional; `resolve` validates and fills defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    /// `auto` or a format name (`syslog`, `web_access`, `web_error`,
    /// `application`).
    pub format: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Display zone: `UTC`, `local` or a fixed offset.
    pub timezone: Option<String>,
    /// Offset assumed for timestamps without one.
    pub input_offset: Option<String>,
    pub top: Option<usize>,
    pub max_lines: Option<u64>,
    pub sample_size: Option<usize>,
    pub min_matches: Option<usize>,
    pub thresholds: ThresholdOptions,
}

impl RunOptions {
    /// Overlay `other` on top of `self`: any field set in `other` wins.
    pub fn merge(self, other: RunOptions) -> RunOptions {
        RunOptions {
            format: other.format.or(self.format),
            from: other.from.or(self.from),
            to: other.to.or(self.to),
            timezone: other.timezone.or(self.timezone),
            input_offset: other.input_offset.or(self.input_offset),
            top: other.top.or(self.top),
            max_lines: other.max_lines.or(self.max_lines),
            sample_size: other.sample_size.or(self.sample_size),
            min_matches: other.min_matches.or(self.min_matches),
            thresholds: self.thresholds.merge(other.thresholds),
        }
    }

    /// Validate against the current time.
    pub fn resolve(&self) -> LogResult<RunConfig> {
        self.resolve_at(Utc::now())
    }

    /// Validate with an explicit reference time (syslog year, relative
    /// bounds).
    pub fn resolve_at(&self, reference: DateTime<Utc>) -> LogResult<RunConfig> {
        let format = match self.format.as_deref() {
            Some(text) => text.parse()?,
            None => FormatHint::Auto,
        };

        let display_offset = match self.timezone.as_deref() {
            Some(text) => timestamp::parse_offset(text)?,
            None => timestamp::utc_offset(),
        };
        let input_offset = match self.input_offset.as_deref() {
            Some(text) => timestamp::parse_offset(text)?,
            None => timestamp::utc_offset(),
        };

        let bound = |text: Option<&str>, side| {
            text.map(|t| window::parse_bound(t, side, reference, display_offset))
                .transpose()
        };
        let window = TimeWindow::new(
            bound(self.from.as_deref(), BoundSide::From)?,
            bound(self.to.as_deref(), BoundSide::To)?,
        )?;

        let top_k = self.top.unwrap_or(DEFAULT_TOP_K);
        if top_k == 0 {
            return Err(LogError::Config("top must be at least 1".into()));
        }
        let sample_size = self.sample_size.unwrap_or(DEFAULT_SAMPLE_SIZE);
        if sample_size == 0 {
            return Err(LogError::Config("sample size must be at least 1".into()));
        }
        if self.max_lines == Some(0) {
            return Err(LogError::Config("max lines must be at least 1".into()));
        }
        let thresholds = self.thresholds.resolve();
        let t = &thresholds;
        if !(t.error_rate >= 0.0 && t.spike_factor > 0.0 && t.actor_factor > 0.0) {
            return Err(LogError::Config("anomaly thresholds must be positive".into()));
        }

        Ok(RunConfig {
            format,
            window,
            input_offset,
            display_offset,
            timezone_label: self.timezone.clone().unwrap_or_else(|| "UTC".to_string()),
            top_k,
            max_lines: self.max_lines,
            sample_size,
            min_matches: self.min_matches.unwrap_or(DEFAULT_MIN_MATCHES).max(1),
            thresholds,
            reference,
        })
    }
}

/// Validated run configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub format: FormatHint,
    pub window: TimeWindow,
    pub input_offset: FixedOffset,
    /// Offset used for bucket labels and displayed times.
    pub display_offset: FixedOffset,
    /// The zone as the user wrote it, for report headers.
    pub timezone_label: String,
    pub top_k: usize,
    pub max_lines: Option<u64>,
    pub sample_size: usize,
    pub min_matches: usize,
    pub thresholds: AnomalyThresholds,
    pub reference: DateTime<Utc>,
}

impl RunConfig {
    pub fn time_context(&self) -> TimeContext {
        TimeContext::new(self.reference, self.input_offset)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        let offset = timestamp::utc_offset();
        Self {
            format: FormatHint::Auto,
            window: TimeWindow::unbounded(),
            input_offset: offset,
            display_offset: offset,
            timezone_label: "UTC".to_string(),
            top_k: DEFAULT_TOP_K,
            max_lines: None,
            sample_size: DEFAULT_SAMPLE_SIZE,
            min_matches: DEFAULT_MIN_MATCHES,
            thresholds: AnomalyThresholds::default(),
            reference: Utc::now(),
        }
    }
}
