//! `report.html`: a self-contained interactive report.

use std::path::{Path, PathBuf};

use lt_core::AnalysisResult;
use lt_core::result::{AnomalySeverity, RankedEntry, SourceStatus, TimeBucket};
use lt_core::types::Severity;

use crate::error::{ReportError, ReportResult};

pub const FILE_NAME: &str = "report.html";

const STYLE: &str = ":root{--bg:#f7fafc;--fg:#111827;--muted:#6b7280;--card:#ffffff;--border:#e5e7eb;--accent:#2563eb;--ok:#16a34a;--warn:#d97706;--err:#dc2626;--chip:#eef2f7} body{margin:0;background:var(--bg);color:var(--fg);font-family:Segoe UI,system-ui,-apple-system,Arial,sans-serif} .container{max-width:1200px;margin:0 auto;padding:24px} .header{margin-bottom:16px} .title{font-size:22px;font-weight:600} .sub{color:var(--muted);font-size:13px} .grid{display:grid;grid-template-columns:repeat(4,minmax(0,1fr));gap:12px} .card{background:var(--card);border:1px solid var(--border);border-radius:10px;padding:14px} .metric .label{color:var(--muted);font-size:12px} .metric .value{font-size:22px;font-weight:700} .value.err{color:var(--err)} .value.warn{color:var(--warn)} .value.ok{color:var(--ok)} .section{margin-top:18px} .section h3{margin:0 0 10px 0;font-size:16px;font-weight:600} .table{width:100%;border-collapse:separate;border-spacing:0;background:var(--card);border:1px solid var(--border);border-radius:10px;overflow:hidden} .table th{background:#f3f4f6;text-align:left;font-weight:600;padding:8px 10px;border-bottom:1px solid var(--border);cursor:pointer;user-select:none} .table td{padding:8px 10px;border-bottom:1px solid var(--border);vertical-align:top;word-break:break-word} .chip{display:inline-block;border:1px solid var(--border);border-radius:999px;padding:2px 10px;font-size:12px} .sev-high{background:#fee2e2;color:#7f1d1d} .sev-medium{background:#fde68a;color:#854d0e} .sev-low{background:#dbeafe;color:#1e3a8a} .filter{width:100%;box-sizing:border-box;padding:6px 10px;margin-bottom:8px;border:1px solid var(--border);border-radius:8px} .split{display:grid;grid-template-columns:repeat(2,minmax(0,1fr));gap:12px} .bar{fill:var(--accent)} .bar:hover{fill:var(--err)} .footer{margin-top:22px;color:var(--muted);font-size:12px} @media (max-width:900px){.grid{grid-template-columns:repeat(2,minmax(0,1fr))}.split{grid-template-columns:1fr}}";

const SCRIPT: &str = "document.addEventListener('DOMContentLoaded',function(){document.querySelectorAll('input.filter').forEach(function(input){input.addEventListener('input',function(){var q=input.value.toLowerCase();var table=document.getElementById(input.dataset.table);if(!table)return;table.querySelectorAll('tbody tr').forEach(function(tr){tr.style.display=tr.textContent.toLowerCase().indexOf(q)>=0?'':'none';});});});document.querySelectorAll('table.sortable th').forEach(function(th,idx){th.addEventListener('click',function(){var table=th.closest('table');var col=Array.prototype.indexOf.call(th.parentNode.children,th);var asc=th.dataset.dir!=='asc';th.parentNode.querySelectorAll('th').forEach(function(o){delete o.dataset.dir;});th.dataset.dir=asc?'asc':'desc';var body=table.tBodies[0];var rows=Array.prototype.slice.call(body.rows);rows.sort(function(a,b){var x=a.cells[col].dataset.v||a.cells[col].textContent;var y=b.cells[col].dataset.v||b.cells[col].textContent;var nx=parseFloat(x),ny=parseFloat(y);var c=(!isNaN(nx)&&!isNaN(ny))?nx-ny:x.localeCompare(y);return asc?c:-c;});rows.forEach(function(r){body.appendChild(r);});});});});";

pub fn write(result: &AnalysisResult, dir: &Path) -> ReportResult<PathBuf> {
    let path = dir.join(FILE_NAME);
    std::fs::write(&path, render(result)).map_err(|e| ReportError::io(&path, e))?;
    Ok(path)
}

/// Render the full document.
pub fn render(result: &AnalysisResult) -> String {
    let summary = &result.summary;
    let meta = &result.metadata;
    let mut s = String::with_capacity(32 * 1024);

    s.push_str("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"><title>Log Analysis Report</title><style>");
    s.push_str(STYLE);
    s.push_str("</style></head><body><div class=\"container\">");

    // ── Header ──
    let window = match (meta.window.from, meta.window.to) {
        (None, None) => "all time".to_string(),
        (from, to) => format!(
            "{} → {}",
            from.map_or_else(|| "…".to_string(), |t| t.to_rfc3339()),
            to.map_or_else(|| "…".to_string(), |t| t.to_rfc3339())
        ),
    };
    s.push_str("<div class=\"header\"><div class=\"title\">Log Analysis Report</div>");
    s.push_str(&format!(
        "<div class=\"sub\">Window: {} · Time zone: {} · Sources: {} · Generated {}</div>",
        html_escape(&window),
        html_escape(&meta.timezone),
        meta.sources.len(),
        meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(range) = &summary.time_range {
        s.push_str(&format!(
            "<div class=\"sub\">Records span {} to {}</div>",
            range.earliest.format("%Y-%m-%d %H:%M:%S %:z"),
            range.latest.format("%Y-%m-%d %H:%M:%S %:z")
        ));
    }
    if meta.max_lines_hit {
        s.push_str(&format!(
            "<div class=\"sub\">Input truncated at {} lines</div>",
            meta.max_lines.unwrap_or_default()
        ));
    }
    s.push_str("</div>");

    // ── Metric cards ──
    s.push_str("<div class=\"grid\">");
    metric(&mut s, "Total Lines", &summary.lines.total.to_string(), "");
    metric(&mut s, "Parsed", &summary.lines.parsed.to_string(), "");
    metric(&mut s, "Parse Rate", &format!("{:.2}%", summary.parse_rate), rate_class(100.0 - summary.parse_rate));
    metric(&mut s, "Errors", &summary.severities.error.to_string(), "err");
    metric(&mut s, "Warnings", &summary.severities.warn.to_string(), "warn");
    metric(&mut s, "Error Rate", &format!("{:.2}%", summary.error_rate), rate_class(summary.error_rate));
    metric(&mut s, "Distinct Actors", &summary.distinct_actors.to_string(), "");
    metric(&mut s, "Anomalies", &result.anomalies.len().to_string(), if result.anomalies.is_empty() { "ok" } else { "err" });
    s.push_str("</div>");

    // ── Anomalies ──
    s.push_str("<div class=\"section\"><h3>Anomalies</h3>");
    if result.anomalies.is_empty() {
        s.push_str("<div class=\"card sub\">No anomalies detected.</div>");
    } else {
        s.push_str("<table class=\"table sortable\" id=\"anomalies\"><thead><tr><th>Severity</th><th>Kind</th><th>Subject</th><th>Metric</th><th>Description</th></tr></thead><tbody>");
        for a in &result.anomalies {
            let cls = match a.severity {
                AnomalySeverity::High => "sev-high",
                AnomalySeverity::Medium => "sev-medium",
                AnomalySeverity::Low => "sev-low",
            };
            s.push_str(&format!(
                "<tr><td data-v=\"{}\"><span class=\"chip {}\">{}</span></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                a.severity as u8, cls, a.severity, a.kind,
                html_escape(a.subject.as_deref().unwrap_or("")),
                a.metric,
                html_escape(&a.description)
            ));
        }
        s.push_str("</tbody></table>");
    }
    s.push_str("</div>");

    // ── Severity ──
    s.push_str("<div class=\"section\"><h3>Severity</h3><table class=\"table sortable\" id=\"severity\"><thead><tr><th>Severity</th><th>Count</th><th>Share</th></tr></thead><tbody>");
    let parsed = summary.lines.parsed.max(1) as f64;
    for severity in Severity::ALL {
        let count = summary.severities.get(severity);
        s.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{:.2}%</td></tr>",
            severity,
            count,
            count as f64 * 100.0 / parsed
        ));
    }
    s.push_str("</tbody></table></div>");

    // ── Rankings ──
    ranking_table(&mut s, "top-messages", "Top Messages", "Pattern", &result.rankings.messages);
    s.push_str("<div class=\"section split\">");
    ranking_card(&mut s, "top-actors", "Top Actors", "Actor", &result.rankings.actors);
    ranking_card(&mut s, "top-status", "Top Status Codes", "Status", &result.rankings.status_codes);
    s.push_str("</div>");
    ranking_table(&mut s, "top-paths", "Top Paths", "Path", &result.rankings.paths);

    s.push_str("<div class=\"section\"><h3>Repeated Failures</h3><input class=\"filter\" data-table=\"failures\" placeholder=\"Filter…\"><table class=\"table sortable\" id=\"failures\"><thead><tr><th>Kind</th><th>Subject</th><th>Count</th></tr></thead><tbody>");
    for failure in &result.rankings.failures {
        s.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            html_escape(&failure.key.kind),
            html_escape(&failure.key.subject),
            failure.count
        ));
    }
    s.push_str("</tbody></table></div>");

    // ── Timeline ──
    s.push_str("<div class=\"section\"><h3>Hourly Activity</h3><div class=\"card\">");
    if result.timeline.hourly.is_empty() {
        s.push_str("<div class=\"sub\">No timestamped records.</div>");
    } else {
        s.push_str(&hourly_chart(&result.timeline.hourly));
    }
    s.push_str("</div></div>");

    s.push_str("<div class=\"section\"><h3>Daily Totals</h3><table class=\"table sortable\" id=\"daily\"><thead><tr><th>Day</th><th>Count</th></tr></thead><tbody>");
    for bucket in &result.timeline.daily {
        s.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>",
            html_escape(&bucket.label),
            bucket.count
        ));
    }
    s.push_str("</tbody></table></div>");

    // ── Sources ──
    s.push_str("<div class=\"section\"><h3>Sources</h3><table class=\"table sortable\" id=\"sources\"><thead><tr><th>Source</th><th>Status</th><th>Format</th><th>Score</th><th>Lines</th><th>Parsed</th><th>Error</th></tr></thead><tbody>");
    for src in &meta.sources {
        let status_cls = match src.status {
            SourceStatus::Ok => "sev-low",
            SourceStatus::Skipped => "sev-medium",
            SourceStatus::Failed => "sev-high",
        };
        let score = src
            .detection
            .and_then(|d| d.score)
            .map_or_else(|| "-".to_string(), |v| format!("{:.0}%", v * 100.0));
        s.push_str(&format!(
            "<tr><td>{}</td><td><span class=\"chip {}\">{:?}</span></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            html_escape(&src.name),
            status_cls,
            src.status,
            src.format,
            score,
            src.lines.total,
            src.lines.parsed,
            html_escape(src.error.as_deref().unwrap_or(""))
        ));
    }
    s.push_str("</tbody></table></div>");

    s.push_str("<div class=\"footer\">Generated by logtally</div></div><script>");
    s.push_str(SCRIPT);
    s.push_str("</script></body></html>");
    s
}

fn metric(s: &mut String, label: &str, value: &str, class: &str) {
    s.push_str(&format!(
        "<div class=\"card metric\"><div class=\"label\">{}</div><div class=\"value {}\">{}</div></div>",
        label,
        class,
        html_escape(value)
    ));
}

fn rate_class(bad_percent: f64) -> &'static str {
    if bad_percent > 25.0 {
        "err"
    } else if bad_percent > 10.0 {
        "warn"
    } else {
        "ok"
    }
}

fn ranking_rows(s: &mut String, id: &str, key_header: &str, entries: &[RankedEntry]) {
    s.push_str(&format!(
        "<input class=\"filter\" data-table=\"{id}\" placeholder=\"Filter…\"><table class=\"table sortable\" id=\"{id}\"><thead><tr><th>#</th><th>{key_header}</th><th>Count</th></tr></thead><tbody>"
    ));
    for (i, entry) in entries.iter().enumerate() {
        s.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            i + 1,
            html_escape(&entry.key),
            entry.count
        ));
    }
    s.push_str("</tbody></table>");
}

fn ranking_table(s: &mut String, id: &str, title: &str, key_header: &str, entries: &[RankedEntry]) {
    s.push_str(&format!("<div class=\"section\"><h3>{title}</h3>"));
    ranking_rows(s, id, key_header, entries);
    s.push_str("</div>");
}

fn ranking_card(s: &mut String, id: &str, title: &str, key_header: &str, entries: &[RankedEntry]) {
    s.push_str(&format!("<div class=\"card\"><h3>{title}</h3>"));
    ranking_rows(s, id, key_header, entries);
    s.push_str("</div>");
}

/// Inline SVG bar chart of hourly counts.
fn hourly_chart(buckets: &[TimeBucket]) -> String {
    const WIDTH: f64 = 1100.0;
    const HEIGHT: f64 = 200.0;
    const LABEL_SPACE: f64 = 20.0;

    let max = buckets.iter().map(|b| b.count).max().unwrap_or(1).max(1) as f64;
    let slot = WIDTH / buckets.len() as f64;
    let bar_width = (slot * 0.8).max(1.0);

    let mut svg = format!(
        "<svg viewBox=\"0 0 {WIDTH} {}\" width=\"100%\" role=\"img\" aria-label=\"Hourly activity\">",
        HEIGHT + LABEL_SPACE
    );
    for (i, bucket) in buckets.iter().enumerate() {
        let h = (bucket.count as f64 / max) * HEIGHT;
        svg.push_str(&format!(
            "<rect class=\"bar\" x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\"><title>{}: {}</title></rect>",
            i as f64 * slot,
            HEIGHT - h,
            bar_width,
            h,
            html_escape(&bucket.label),
            bucket.count
        ));
    }
    // Label the first and last bucket only; the rest are in tooltips.
    if let (Some(first), Some(last)) = (buckets.first(), buckets.last()) {
        svg.push_str(&format!(
            "<text x=\"0\" y=\"{:.0}\" font-size=\"12\" fill=\"#6b7280\">{}</text>",
            HEIGHT + 15.0,
            html_escape(&first.label)
        ));
        if buckets.len() > 1 {
            svg.push_str(&format!(
                "<text x=\"{WIDTH}\" y=\"{:.0}\" font-size=\"12\" fill=\"#6b7280\" text-anchor=\"end\">{}</text>",
                HEIGHT + 15.0,
                html_escape(&last.label)
            ));
        }
    }
    svg.push_str("</svg>");
    svg
}

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
