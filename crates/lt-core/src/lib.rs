//! Log analysis core for logtally.
//!
//! Detects which line grammar a log uses (syslog, web access, web error,
//! application), parses lines into normalized records, and folds them into
//! bounded streaming aggregates: counters, top-K rankings, hourly and daily
//! histograms and anomaly flags. Input comes through the `LogSource` trait so
//! tests can feed in-memory content.

pub mod aggregate;
pub mod anomaly;
pub mod config;
pub mod detect;
pub mod error;
pub mod mock;
pub mod parsers;
pub mod pattern;
pub mod pipeline;
pub mod result;
pub mod severity;
pub mod source;
pub mod timestamp;
pub mod topk;
pub mod types;
pub mod window;

// Re-export key types for convenience
pub use config::{AnomalyThresholds, RunConfig, RunOptions, ThresholdOptions};
pub use detect::{Detection, FormatDetector};
pub use error::{LogError, LogResult};
pub use mock::MockLogSource;
pub use pipeline::{Analyzer, run};
pub use result::{AnalysisResult, Anomaly, AnomalyKind, AnomalySeverity, SourceReport, SourceStatus};
pub use source::{FileLogSource, LogSource};
pub use types::{FormatHint, FormatKind, Record, Severity};
