//! One logtally run: config → analysis → reports → optional AI summary.

use std::path::PathBuf;

use anyhow::Context;
use lt_core::{AnalysisResult, FileLogSource};
use lt_report::ReportWriter;
use lt_summary::{SummaryClient, SummaryConfig};

use crate::cli::Cli;
use crate::config::FileConfig;

/// Process exit code when every input source failed.
pub const EXIT_ALL_FAILED: u8 = 1;
/// Process exit code for configuration and output errors.
pub const EXIT_ERROR: u8 = 2;

/// Everything a run produced.
#[derive(Debug)]
pub struct Outcome {
    pub result: AnalysisResult,
    /// Report files in the order they were written.
    pub files: Vec<PathBuf>,
    /// `summary.md`, when an AI summary was produced.
    pub summary: Option<PathBuf>,
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        if self.result.all_sources_failed() {
            EXIT_ALL_FAILED
        } else {
            0
        }
    }
}

/// Run the whole pipeline for `cli`.
///
/// Invalid configuration fails before any input is read. AI summary problems
/// are logged and never fail the run.
pub async fn execute(cli: &Cli) -> anyhow::Result<Outcome> {
    let file_config = match &cli.config {
        Some(path) => FileConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => FileConfig::default(),
    };

    let options = file_config.analysis.merge(cli.run_options());
    let config = options.resolve()?;
    tracing::info!(
        files = cli.files.len(),
        format = ?config.format,
        top_k = config.top_k,
        timezone = %config.timezone_label,
        "configuration resolved"
    );

    let files = cli.files.clone();
    let result = tokio::task::spawn_blocking(move || {
        lt_core::run(config, &FileLogSource, files.as_slice())
    })
    .await?;

    let mut writer = ReportWriter::new(&cli.output_dir);
    writer.json = !cli.no_json;
    writer.csv = !cli.no_csv;
    writer.html = !cli.no_html;
    let files = writer.generate_all(&result)?;

    let summary = if cli.no_ai {
        tracing::debug!("AI summary disabled by flag");
        None
    } else {
        summarize(&result, cli.summary_config(file_config.summary), writer.output_dir()).await
    };

    Ok(Outcome {
        result,
        files,
        summary,
    })
}

async fn summarize(
    result: &AnalysisResult,
    config: SummaryConfig,
    dir: &std::path::Path,
) -> Option<PathBuf> {
    if result.all_sources_failed() {
        tracing::info!("no readable sources, skipping AI summary");
        return None;
    }
    let client = match SummaryClient::from_config(&config) {
        Ok(Some(client)) => client,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, "AI summary disabled");
            return None;
        }
    };
    let text = client.summarize(result).await?;
    match lt_summary::write_summary(dir, &text).await {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::warn!(error = %e, "failed to write AI summary");
            None
        }
    }
}
