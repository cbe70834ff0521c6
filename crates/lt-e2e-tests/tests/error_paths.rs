//! E2E tests for failing sources, bad configuration and the line cap.

mod helpers;

use helpers::TestHarness;
use lt_cli::app::EXIT_ALL_FAILED;
use lt_core::SourceStatus;
use lt_core::mock::{ACCESS_SAMPLE, SYSLOG_SAMPLE};

#[tokio::test]
async fn e2e_missing_file_does_not_stop_other_sources() {
    let h = TestHarness::with_sample_logs();
    let auth = h.log_path("auth.log");
    let missing = h.log_path("missing.log");
    let access = h.log_path("access.log");
    let outcome = h.run(&["--no-ai", &auth, &missing, &access]).await;

    assert_eq!(outcome.exit_code(), 0);
    let sources = &outcome.result.metadata.sources;
    assert_eq!(sources.len(), 3);
    assert_eq!(sources[0].status, SourceStatus::Ok);
    assert_eq!(sources[1].status, SourceStatus::Failed);
    assert!(sources[1].error.is_some());
    assert_eq!(sources[2].status, SourceStatus::Ok);
    assert_eq!(
        outcome.result.summary.lines.total,
        (SYSLOG_SAMPLE.len() + ACCESS_SAMPLE.len()) as u64
    );

    let json = h.analysis_json();
    assert_eq!(json["metadata"]["sources"][1]["status"], "failed");
    assert_eq!(json["summary"]["sources_failed"], 1);
}

#[tokio::test]
async fn e2e_all_sources_failed_exits_non_zero() {
    let h = TestHarness::new();
    let a = h.log_path("a.log");
    let b = h.log_path("b.log");
    let outcome = h.run(&["--no-ai", &a, &b]).await;

    assert_eq!(outcome.exit_code(), EXIT_ALL_FAILED);
    assert_eq!(outcome.result.summary.lines.total, 0);
    // Reports still describe the failed run.
    assert!(h.out_dir().join("analysis.json").exists());
}

#[tokio::test]
async fn e2e_directory_source_is_rejected() {
    let h = TestHarness::with_sample_logs();
    let dir = h.root().join("logs").display().to_string();
    let auth = h.log_path("auth.log");
    let outcome = h.run(&["--no-ai", &dir, &auth]).await;

    assert_eq!(outcome.result.metadata.sources[0].status, SourceStatus::Failed);
    assert_eq!(outcome.result.metadata.sources[1].status, SourceStatus::Ok);
}

#[tokio::test]
async fn e2e_invalid_configuration_is_rejected_before_reading() {
    let h = TestHarness::with_sample_logs();
    let auth = h.log_path("auth.log");

    for bad in [
        vec!["--top", "0"],
        vec!["--format", "csv"],
        vec!["--timezone", "Mars/Olympus"],
        vec!["--from", "2026-01-03", "--to", "2026-01-01"],
        vec!["--from", "last tuesday"],
    ] {
        let mut args = bad.clone();
        args.push("--no-ai");
        args.push(&auth);
        let err = h.run_err(&args).await;
        assert!(!err.to_string().is_empty(), "{bad:?}");
        assert!(!h.out_dir().exists(), "{bad:?} must not write reports");
    }
}

#[tokio::test]
async fn e2e_bad_config_file_is_an_error() {
    let h = TestHarness::with_sample_logs();
    let config = h.write_config("[analysis]\ntop = \"many\"\n");
    let auth = h.log_path("auth.log");
    let err = h.run_err(&["-c", &config, "--no-ai", &auth]).await;
    assert!(err.to_string().contains("failed to load config"));
}

#[tokio::test]
async fn e2e_max_lines_caps_the_run() {
    let h = TestHarness::with_sample_logs();
    let auth = h.log_path("auth.log");
    let access = h.log_path("access.log");
    let app = h.log_path("app.log");
    let outcome = h.run(&["--no-ai", "--max-lines", "12", &auth, &access, &app]).await;

    let result = &outcome.result;
    assert_eq!(result.summary.lines.total, 12);
    assert!(result.metadata.max_lines_hit);
    assert_eq!(result.metadata.sources[0].lines.total, SYSLOG_SAMPLE.len() as u64);
    assert_eq!(result.metadata.sources[1].lines.total, 2);
    assert_eq!(result.metadata.sources[2].status, SourceStatus::Skipped);
    assert_eq!(outcome.exit_code(), 0);
}

#[tokio::test]
async fn e2e_max_lines_equal_to_input_is_not_a_cap() {
    let h = TestHarness::with_sample_logs();
    let auth = h.log_path("auth.log");
    let access = h.log_path("access.log");
    let total = SYSLOG_SAMPLE.len() + ACCESS_SAMPLE.len();
    let outcome = h
        .run(&["--no-ai", "--max-lines", &total.to_string(), &auth, &access])
        .await;

    let result = &outcome.result;
    assert_eq!(result.summary.lines.total, total as u64);
    assert!(!result.metadata.max_lines_hit);
    assert!(result.metadata.sources.iter().all(|s| s.status == SourceStatus::Ok));
    assert_eq!(outcome.exit_code(), 0);
}
