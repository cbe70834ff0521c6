//! Report writers for logtally.
//!
//! Consumes an [`AnalysisResult`] and writes `analysis.json`, the CSV exports
//! and `report.html` into an output directory. Writers never look at raw
//! input; everything comes from the result.

pub mod csv_export;
pub mod error;
pub mod html;
pub mod json;

use std::path::{Path, PathBuf};

use lt_core::AnalysisResult;

pub use error::{ReportError, ReportResult};

/// Which report families to produce and where.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
    pub json: bool,
    pub csv: bool,
    pub html: bool,
}

impl ReportWriter {
    /// Writer producing every report family into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            json: true,
            csv: true,
            html: true,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write every enabled report. Creates the output directory if needed.
    pub fn generate_all(&self, result: &AnalysisResult) -> ReportResult<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| ReportError::io(&self.output_dir, e))?;

        let mut written = Vec::new();
        if self.json {
            written.push(json::write(result, &self.output_dir)?);
        }
        if self.csv {
            written.extend(csv_export::write_all(result, &self.output_dir)?);
        }
        if self.html {
            written.push(html::write(result, &self.output_dir)?);
        }

        tracing::info!(
            dir = %self.output_dir.display(),
            files = written.len(),
            "reports written"
        );
        Ok(written)
    }
}
