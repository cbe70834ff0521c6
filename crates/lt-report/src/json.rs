//! `analysis.json`: the full result, pretty-printed.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use lt_core::AnalysisResult;

use crate::error::{ReportError, ReportResult};

pub const FILE_NAME: &str = "analysis.json";

pub fn write(result: &AnalysisResult, dir: &Path) -> ReportResult<PathBuf> {
    let path = dir.join(FILE_NAME);
    let file = File::create(&path).map_err(|e| ReportError::io(&path, e))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, result)?;
    out.write_all(b"\n")
        .and_then(|_| out.flush())
        .map_err(|e| ReportError::io(&path, e))?;
    Ok(path)
}
