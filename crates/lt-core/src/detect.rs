//! Format detection by scoring every candidate grammar over a line sample.

use serde::{Deserialize, Serialize};

use crate::timestamp::TimeContext;
use crate::types::{FormatHint, FormatKind};

/// Number of non-empty lines sampled per source by default.
pub const DEFAULT_SAMPLE_SIZE: usize = 20;

/// A candidate must parse at least this many sampled lines to be chosen.
pub const DEFAULT_MIN_MATCHES: usize = 1;

/// Outcome of format detection for one source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub format: FormatKind,
    /// Fraction of sampled lines the chosen grammar parsed; `None` when the
    /// format was forced and no scoring happened.
    pub score: Option<f64>,
    /// Number of non-empty lines examined.
    pub sampled: usize,
    pub forced: bool,
}

/// Chooses one grammar per source.
#[derive(Debug, Clone, Copy)]
pub struct FormatDetector {
    hint: FormatHint,
    min_matches: usize,
}

impl FormatDetector {
    pub fn new(hint: FormatHint) -> Self {
        Self {
            hint,
            min_matches: DEFAULT_MIN_MATCHES,
        }
    }

    pub fn with_min_matches(mut self, min_matches: usize) -> Self {
        self.min_matches = min_matches.max(1);
        self
    }

    /// Detect the grammar of a sample by trial-parsing it.
    pub fn detect<S: AsRef<str>>(&self, sample: &[S], ctx: &TimeContext) -> Detection {
        self.detect_with(sample, |kind, line| kind.parse(line, ctx).is_some())
    }

    /// Detection with a caller-supplied probe deciding whether `kind` parses
    /// `line`.
    ///
    /// When the hint is forced the probe is never called.
    pub fn detect_with<S, F>(&self, sample: &[S], mut probe: F) -> Detection
    where
        S: AsRef<str>,
        F: FnMut(FormatKind, &str) -> bool,
    {
        let lines: Vec<&str> = sample
            .iter()
            .map(AsRef::as_ref)
            .filter(|l| !l.trim().is_empty())
            .collect();

        if let FormatHint::Forced(format) = self.hint {
            return Detection {
                format,
                score: None,
                sampled: lines.len(),
                forced: true,
            };
        }

        if lines.is_empty() {
            return Detection {
                format: FormatKind::Unknown,
                score: Some(0.0),
                sampled: 0,
                forced: false,
            };
        }

        let scores: Vec<(FormatKind, usize)> = FormatKind::CANDIDATES
            .iter()
            .map(|&kind| {
                let matched = lines.iter().filter(|line| probe(kind, line)).count();
                (kind, matched)
            })
            .collect();

        // Strictly greater keeps the earlier (higher priority) candidate on ties.
        let mut best = scores[0];
        for &candidate in &scores[1..] {
            if candidate.1 > best.1 {
                best = candidate;
            }
        }

        let (format, matched) = if best.1 >= self.min_matches {
            best
        } else {
            scores
                .iter()
                .copied()
                .find(|(kind, _)| *kind == FormatKind::Application)
                .unwrap_or((FormatKind::Application, 0))
        };

        let score = matched as f64 / lines.len() as f64;
        tracing::debug!(
            format = %format,
            score,
            sampled = lines.len(),
            "format detected"
        );

        Detection {
            format,
            score: Some(score),
            sampled: lines.len(),
            forced: false,
        }
    }
}
