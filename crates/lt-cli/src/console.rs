//! Console summary printed after a run.


use lt_core::SourceStatus;

use crate::app::Outcome;
use crate::cli::Verbosity;

/// Render the console summary for `outcome`.
pub fn render(outcome: &Outcome, verbosity: Verbosity) -> String {
    let mut out = String::new();
    let total_files = outcome.files.len() + usize::from(outcome.summary.is_some());

    if verbosity == Verbosity::Quiet {
        let dir = outcome
            .files
            .first()
            .and_then(|p| p.parent())
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".into());
        out.push_str(&format!("Generated {total_files} output files in {dir}\n"));
        return out;
    }

    let s = &outcome.result.summary;
    out.push_str("Analysis complete\n");
    out.push_str(&format!("  lines read        {}\n", s.lines.total));
    out.push_str(&format!("  parsed            {}\n", s.lines.parsed));
    if s.lines.unparsed > 0 {
        out.push_str(&format!("  unparsed          {}\n", s.lines.unparsed));
    }
    if s.lines.out_of_window > 0 {
        out.push_str(&format!("  outside window    {}\n", s.lines.out_of_window));
    }
    out.push_str(&format!("  parse rate        {:.2}%\n", s.parse_rate));
    if s.severities.error > 0 {
        out.push_str(&format!("  errors            {}\n", s.severities.error));
    }
    if s.severities.warn > 0 {
        out.push_str(&format!("  warnings          {}\n", s.severities.warn));
    }
    out.push_str(&format!("  error rate        {:.2}%\n", s.error_rate));

    if verbosity == Verbosity::Verbose {
        out.push_str(&format!("  info              {}\n", s.severities.info));
        out.push_str(&format!("  debug             {}\n", s.severities.debug));
        out.push_str(&format!("  unknown           {}\n", s.severities.unknown));
        out.push_str(&format!("  distinct actors   {}\n", s.distinct_actors));
        out.push_str(&format!("  distinct paths    {}\n", s.distinct_paths));
        out.push_str("\nSources:\n");
        for source in &outcome.result.metadata.sources {
            match source.status {
                SourceStatus::Ok => {
                    out.push_str(&format!(
                        "  ok      {} ({}, {} lines)\n",
                        source.name, source.format, source.lines.total
                    ));
                }
                SourceStatus::Failed => {
                    out.push_str(&format!(
                        "  failed  {}: {}\n",
                        source.name,
                        source.error.as_deref().unwrap_or("unknown error")
                    ));
                }
                SourceStatus::Skipped => {
                    out.push_str(&format!("  skipped {} (line limit reached)\n", source.name));
                }
            }
        }
    } else if s.sources_failed > 0 {
        out.push_str(&format!("  failed sources    {}\n", s.sources_failed));
    }

    if !outcome.result.anomalies.is_empty() {
        out.push_str("\nAnomalies:\n");
        for anomaly in &outcome.result.anomalies {
            out.push_str(&format!("  [{}] {}\n", anomaly.severity, anomaly.description));
        }
    }

    out.push_str("\nGenerated files:\n");
    for path in outcome.files.iter().chain(outcome.summary.iter()) {
        out.push_str(&format!("  {}\n", path.display()));
    }
    out
}
