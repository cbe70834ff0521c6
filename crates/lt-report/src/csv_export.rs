//! Tabular exports, one CSV file per table.

use std::path::{Path, PathBuf};

use lt_core::AnalysisResult;
use lt_core::result::RankedEntry;

use crate::error::ReportResult;

/// Write every CSV export into `dir`; returns the written paths.
pub fn write_all(result: &AnalysisResult, dir: &Path) -> ReportResult<Vec<PathBuf>> {
    let rankings = &result.rankings;
    Ok(vec![
        write_summary(result, dir)?,
        write_ranking(dir, "top_messages.csv", "pattern", &rankings.messages)?,
        write_ranking(dir, "top_actors.csv", "actor", &rankings.actors)?,
        write_ranking(dir, "top_status_codes.csv", "status_code", &rankings.status_codes)?,
        write_ranking(dir, "top_paths.csv", "path", &rankings.paths)?,
        write_hourly(result, dir)?,
        write_daily(result, dir)?,
        write_anomalies(result, dir)?,
    ])
}

fn write_summary(result: &AnalysisResult, dir: &Path) -> ReportResult<PathBuf> {
    let path = dir.join("summary.csv");
    let s = &result.summary;
    let mut rows: Vec<(&str, String)> = vec![
        ("total_lines", s.lines.total.to_string()),
        ("parsed_lines", s.lines.parsed.to_string()),
        ("unparsed_lines", s.lines.unparsed.to_string()),
        ("empty_lines", s.lines.empty.to_string()),
        ("out_of_window_lines", s.lines.out_of_window.to_string()),
        ("parse_rate_percent", format!("{:.2}", s.parse_rate)),
        ("errors", s.severities.error.to_string()),
        ("warnings", s.severities.warn.to_string()),
        ("info", s.severities.info.to_string()),
        ("debug", s.severities.debug.to_string()),
        ("unknown", s.severities.unknown.to_string()),
        ("error_rate_percent", format!("{:.2}", s.error_rate)),
        ("distinct_actors", s.distinct_actors.to_string()),
        ("distinct_status_codes", s.distinct_status_codes.to_string()),
        ("distinct_paths", s.distinct_paths.to_string()),
        ("sources_ok", s.sources_ok.to_string()),
        ("sources_failed", s.sources_failed.to_string()),
        ("sources_skipped", s.sources_skipped.to_string()),
        ("anomalies", result.anomalies.len().to_string()),
    ];
    if let Some(range) = &s.time_range {
        rows.push(("earliest", range.earliest.to_rfc3339()));
        rows.push(("latest", range.latest.to_rfc3339()));
    }

    let mut wtr = csv::Writer::from_path(&path)?;
    wtr.write_record(["metric", "value"])?;
    for (metric, value) in rows {
        wtr.write_record([metric, value.as_str()])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(path)
}

fn write_ranking(
    dir: &Path,
    file_name: &str,
    key_header: &str,
    entries: &[RankedEntry],
) -> ReportResult<PathBuf> {
    let path = dir.join(file_name);
    let mut wtr = csv::Writer::from_path(&path)?;
    wtr.write_record(["rank", key_header, "count"])?;
    for (i, entry) in entries.iter().enumerate() {
        wtr.write_record([(i + 1).to_string(), entry.key.clone(), entry.count.to_string()])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(path)
}

fn write_hourly(result: &AnalysisResult, dir: &Path) -> ReportResult<PathBuf> {
    let path = dir.join("timeline_hourly.csv");
    let mut wtr = csv::Writer::from_path(&path)?;
    wtr.write_record(["hour", "start", "count"])?;
    for bucket in &result.timeline.hourly {
        wtr.write_record([
            bucket.label.clone(),
            bucket.start.to_rfc3339(),
            bucket.count.to_string(),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(path)
}

fn write_daily(result: &AnalysisResult, dir: &Path) -> ReportResult<PathBuf> {
    let path = dir.join("timeline_daily.csv");
    let mut wtr = csv::Writer::from_path(&path)?;
    wtr.write_record(["day", "count"])?;
    for bucket in &result.timeline.daily {
        wtr.write_record([bucket.label.clone(), bucket.count.to_string()])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(path)
}

fn write_anomalies(result: &AnalysisResult, dir: &Path) -> ReportResult<PathBuf> {
    let path = dir.join("anomalies.csv");
    let mut wtr = csv::Writer::from_path(&path)?;
    wtr.write_record(["kind", "severity", "subject", "metric", "description"])?;
    for anomaly in &result.anomalies {
        wtr.write_record([
            anomaly.kind.to_string(),
            anomaly.severity.to_string(),
            anomaly.subject.clone().unwrap_or_default(),
            anomaly.metric.to_string(),
            anomaly.description.clone(),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(path)
}
