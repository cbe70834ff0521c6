//! E2E tests for the analysis → report path over real files.

mod helpers;

use helpers::TestHarness;
use lt_core::{FormatKind, SourceStatus};

#[tokio::test]
async fn e2e_sample_logs_produce_every_report() {
    let h = TestHarness::with_sample_logs();
    let files = [
        h.log_path("auth.log"),
        h.log_path("access.log"),
        h.log_path("error.log"),
        h.log_path("app.log"),
    ];
    let mut args: Vec<&str> = vec!["--no-ai"];
    args.extend(files.iter().map(String::as_str));

    let outcome = h.run(&args).await;
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(outcome.files.len(), 10);
    for path in &outcome.files {
        assert!(path.starts_with(h.out_dir()), "{}", path.display());
        assert!(path.exists(), "{}", path.display());
    }
    assert!(outcome.summary.is_none());

    let formats: Vec<FormatKind> = outcome
        .result
        .metadata
        .sources
        .iter()
        .map(|s| s.format)
        .collect();
    assert_eq!(
        formats,
        vec![
            FormatKind::Syslog,
            FormatKind::WebAccess,
            FormatKind::WebError,
            FormatKind::Application,
        ]
    );
    assert!(outcome
        .result
        .metadata
        .sources
        .iter()
        .all(|s| s.status == SourceStatus::Ok));
}

#[tokio::test]
async fn e2e_line_accounting_holds_across_sources() {
    let h = TestHarness::with_sample_logs();
    let auth = h.log_path("auth.log");
    let app = h.log_path("app.log");
    let outcome = h.run(&["--no-ai", "--no-html", &auth, &app]).await;

    let lines = &outcome.result.summary.lines;
    assert!(lines.parsed <= lines.total);
    assert_eq!(lines.parsed + lines.unparsed + lines.out_of_window, lines.total);
    assert_eq!(lines.out_of_window, 0);
    // APP_SAMPLE carries one blank and one free-form line.
    assert_eq!(lines.empty, 1);
    assert_eq!(lines.unparsed, 2);

    let per_source: u64 = outcome
        .result
        .metadata
        .sources
        .iter()
        .map(|s| s.lines.total)
        .sum();
    assert_eq!(per_source, lines.total);
}

#[tokio::test]
async fn e2e_json_and_csv_agree() {
    let h = TestHarness::with_sample_logs();
    let access = h.log_path("access.log");
    let error = h.log_path("error.log");
    h.run(&["--no-ai", "--top", "3", &access, &error]).await;

    let json = h.analysis_json();
    assert_eq!(json["metadata"]["top_k"], 3);
    let actors = json["rankings"]["actors"].as_array().unwrap();
    assert!(actors.len() <= 3);
    assert_eq!(actors[0]["key"], "203.0.113.9");

    let rows = h.csv_rows("top_actors.csv");
    assert_eq!(rows.len(), actors.len());
    for (row, actor) in rows.iter().zip(actors) {
        assert_eq!(&row[1], actor["key"].as_str().unwrap());
        assert_eq!(row[2], actor["count"].to_string());
    }

    let counts: Vec<u64> = rows.iter().map(|r| r[2].parse().unwrap()).collect();
    assert!(counts.windows(2).all(|w| w[0] >= w[1]), "ranked descending");
}

#[tokio::test]
async fn e2e_html_report_is_self_contained() {
    let h = TestHarness::with_sample_logs();
    let access = h.log_path("access.log");
    h.run(&["--no-ai", "--no-json", "--no-csv", &access]).await;

    assert!(!h.out_dir().join("analysis.json").exists());
    let page = std::fs::read_to_string(h.out_dir().join("report.html")).unwrap();
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("<svg"));
    assert!(page.contains("/wp-login.php"));
    assert!(!page.contains("<link "), "no external stylesheets");
}
