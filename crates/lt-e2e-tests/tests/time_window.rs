//! E2E tests for time windows, display zones and forced formats.

mod helpers;

use helpers::TestHarness;
use lt_core::{FormatHint, FormatKind};

const WINDOW_LOG: &[&str] = &[
    "2026-01-01 08:00:00 INFO [svc] started",
    "2026-01-02 23:30:00 ERROR [svc] disk full on /dev/sda1",
    "2026-01-03 00:00:01 ERROR [svc] disk full on /dev/sda1",
];

#[tokio::test]
async fn e2e_window_excludes_records_outside_the_range() {
    let h = TestHarness::new();
    let log = h.write_log("svc.log", WINDOW_LOG);
    let outcome = h
        .run(&["--no-ai", "--from", "2026-01-01", "--to", "2026-01-02", &log])
        .await;

    let s = &outcome.result.summary;
    assert_eq!(s.lines.total, 3);
    assert_eq!(s.lines.parsed, 2);
    assert_eq!(s.lines.out_of_window, 1);
    assert_eq!(s.severities.error, 1);
    assert_eq!(s.severities.info, 1);

    let daily: Vec<&str> = outcome
        .result
        .timeline
        .daily
        .iter()
        .map(|b| b.label.as_str())
        .collect();
    assert_eq!(daily, vec!["2026-01-01", "2026-01-02"]);
    let hourly_total: u64 = outcome.result.timeline.hourly.iter().map(|b| b.count).sum();
    assert_eq!(hourly_total, 2);
    let message_total: u64 = outcome.result.rankings.messages.iter().map(|e| e.count).sum();
    assert_eq!(message_total, 2);
}

#[tokio::test]
async fn e2e_display_zone_shifts_buckets() {
    let h = TestHarness::new();
    let log = h.write_log("svc.log", WINDOW_LOG);
    let outcome = h.run(&["--no-ai", "--timezone", "+03:00", &log]).await;

    // 2026-01-02 23:30 UTC is 2026-01-03 02:30 at +03:00.
    let daily: Vec<(&str, u64)> = outcome
        .result
        .timeline
        .daily
        .iter()
        .map(|b| (b.label.as_str(), b.count))
        .collect();
    assert_eq!(daily, vec![("2026-01-01", 1), ("2026-01-03", 2)]);
    assert_eq!(outcome.result.metadata.timezone, "+03:00");
}

#[tokio::test]
async fn e2e_forced_format_skips_detection() {
    let h = TestHarness::with_sample_logs();
    let access = h.log_path("access.log");
    let outcome = h.run(&["--no-ai", "--format", "syslog", &access]).await;

    let result = &outcome.result;
    assert_eq!(result.metadata.format_hint, FormatHint::Forced(FormatKind::Syslog));
    let source = &result.metadata.sources[0];
    assert_eq!(source.format, FormatKind::Syslog);
    assert!(source.detection.is_some_and(|d| d.forced));
    // Access lines do not match the syslog grammar.
    assert_eq!(source.lines.parsed, 0);
    assert_eq!(source.lines.unparsed, source.lines.total);
}
