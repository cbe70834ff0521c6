//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::Parser;
use lt_core::{RunOptions, ThresholdOptions};
use lt_summary::SummaryConfig;

/// Analyze log files and write JSON, CSV and HTML reports.
#[derive(Parser, Debug, Clone)]
#[command(name = "logtally")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log files to analyze.
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<String>,

    /// Directory for generated reports.
    #[arg(short, long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Skip analysis.json.
    #[arg(long)]
    pub no_json: bool,

    /// Skip the CSV exports.
    #[arg(long)]
    pub no_csv: bool,

    /// Skip report.html.
    #[arg(long)]
    pub no_html: bool,

    /// Log format: auto, syslog, web_access, web_error or application.
    #[arg(long)]
    pub format: Option<String>,

    /// Stop after this many lines across all files.
    #[arg(long)]
    pub max_lines: Option<u64>,

    /// Window start: RFC 3339, YYYY-MM-DD[ HH:MM[:SS]] or relative (30m, 6h, 2d, 1w).
    #[arg(long)]
    pub from: Option<String>,

    /// Window end, same forms as --from. A bare date covers the whole day.
    #[arg(long)]
    pub to: Option<String>,

    /// Display zone for buckets and reports: UTC, local or an offset like +03:00.
    #[arg(long)]
    pub timezone: Option<String>,

    /// Offset assumed for timestamps that carry none.
    #[arg(long)]
    pub input_offset: Option<String>,

    /// Entries kept per ranking.
    #[arg(long)]
    pub top: Option<usize>,

    /// Non-empty lines sampled per file for format detection.
    #[arg(long)]
    pub sample_size: Option<usize>,

    /// Error rate (0.0-1.0) above which a high-error-rate anomaly is raised.
    #[arg(long)]
    pub error_rate_threshold: Option<f64>,

    /// Hourly count above this multiple of the mean counts as a spike.
    #[arg(long)]
    pub spike_factor: Option<f64>,

    /// Actor count above this multiple of the per-actor mean is suspicious.
    #[arg(long)]
    pub actor_factor: Option<f64>,

    /// Minimum repeats for a failure pair to be reported.
    #[arg(long)]
    pub repeated_failure: Option<u64>,

    /// TOML config file with [analysis] and [summary] tables.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Minimal console output.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Detailed console output and debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON.
    #[arg(long)]
    pub log_json: bool,

    /// AI summary provider: openai or anthropic.
    #[arg(long, env = "AI_PROVIDER")]
    pub ai_provider: Option<String>,

    /// API key for the AI summary provider.
    #[arg(long, env = "AI_API_KEY", hide_env_values = true)]
    pub ai_key: Option<String>,

    /// Model for the AI summary.
    #[arg(long)]
    pub ai_model: Option<String>,

    /// AI request timeout in seconds.
    #[arg(long)]
    pub ai_timeout: Option<u64>,

    /// Never request an AI summary.
    #[arg(long)]
    pub no_ai: bool,
}

/// Console verbosity selected by `-q` / `-v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    /// Default log directive when `RUST_LOG` is unset.
    pub fn default_log_level(&self) -> &'static str {
        match self.verbosity() {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "debug",
        }
    }

    /// Analysis options given on the command line. Unset flags stay `None`
    /// so the config file can supply them.
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            format: self.format.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            timezone: self.timezone.clone(),
            input_offset: self.input_offset.clone(),
            top: self.top,
            max_lines: self.max_lines,
            sample_size: self.sample_size,
            min_matches: None,
            thresholds: ThresholdOptions {
                error_rate: self.error_rate_threshold,
                spike_factor: self.spike_factor,
                actor_factor: self.actor_factor,
                repeated_failure: self.repeated_failure,
            },
        }
    }

    /// Summary settings given on the command line, layered over `file`.
    pub fn summary_config(&self, file: SummaryConfig) -> SummaryConfig {
        let flags = SummaryConfig {
            provider: self.ai_provider.clone(),
            api_key: self.ai_key.clone(),
            model: self.ai_model.clone(),
            ..Default::default()
        };
        let mut merged = flags.or(file);
        if let Some(secs) = self.ai_timeout {
            merged.timeout_secs = secs;
        }
        merged
    }
}
