//! AI narrative summary for logtally results.
//!
//! Builds a compact prompt from an [`lt_core::AnalysisResult`], sends it to an
//! OpenAI-compatible chat completions endpoint or the Anthropic messages API,
//! and writes the reply as `summary.md`. Every failure here degrades to "no
//! summary"; reports are never affected.

pub mod client;
pub mod config;
pub mod error;
pub mod prompt;

pub use client::{SummaryClient, write_summary};
pub use config::{Provider, SummaryConfig};
pub use error::{SummaryError, SummaryResult};
