//! Prompt construction from an analysis result.
//!
//! Only aggregate figures go into the prompt: counts, anomalies and the top
//! of each ranking. Raw log lines never leave the machine.


use lt_core::AnalysisResult;
use lt_core::result::RankedEntry;

/// Entries per ranking included in the prompt.
const PROMPT_TOP_N: usize = 5;

pub const SYSTEM_PROMPT: &str = "You are an experienced site reliability engineer. \
You receive aggregate statistics from a log analysis run. Write a short incident-style \
summary in Markdown: overall health, the most important anomalies, likely causes and \
concrete next steps. Do not invent numbers that are not in the input.";

/// Build the user message for `result`, asking for a reply in `language`.
pub fn build(result: &AnalysisResult, language: &str) -> String {
    let s = &result.summary;
    let mut out = String::new();

    out.push_str("Log analysis figures:\n");
    out.push_str(&format!(
        "- lines: {} total, {} parsed, {} unparsed, {} outside the time window\n",
        s.lines.total, s.lines.parsed, s.lines.unparsed, s.lines.out_of_window
    ));
    out.push_str(&format!("- parse rate: {:.2}%\n", s.parse_rate));
    out.push_str(&format!(
        "- severities: {} error, {} warn, {} info, {} debug, {} unknown\n",
        s.severities.error, s.severities.warn, s.severities.info, s.severities.debug, s.severities.unknown
    ));
    out.push_str(&format!("- error rate: {:.2}%\n", s.error_rate));
    if let Some(range) = &s.time_range {
        out.push_str(&format!(
            "- time range: {} to {}\n",
            range.earliest.to_rfc3339(),
            range.latest.to_rfc3339()
        ));
    }
    out.push_str(&format!(
        "- sources: {} ok, {} failed, {} skipped\n",
        s.sources_ok, s.sources_failed, s.sources_skipped
    ));

    out.push_str("\nAnomalies:\n");
    if result.anomalies.is_empty() {
        out.push_str("- none detected\n");
    }
    for anomaly in &result.anomalies {
        out.push_str(&format!("- [{}] {}: {}\n", anomaly.severity, anomaly.kind, anomaly.description));
    }

    section(&mut out, "Top actors", &result.rankings.actors);
    section(&mut out, "Top status codes", &result.rankings.status_codes);
    section(&mut out, "Top messages", &result.rankings.messages);

    out.push_str(&format!("\nRespond in {language}."));
    out
}

fn section(out: &mut String, title: &str, entries: &[RankedEntry]) {
    if entries.is_empty() {
        return;
    }
    out.push_str(&format!("\n{title}:\n"));
    for entry in entries.iter().take(PROMPT_TOP_N) {
        out.push_str(&format!("- {} ({})\n", entry.key, entry.count));
    }
}
