//! Shared test harness for E2E integration tests.
//!
//! Writes real log files into a scratch directory and drives the same
//! `lt_cli::app::execute` entry point the binary uses.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use clap::Parser;
use tempfile::TempDir;

use lt_cli::app::{self, Outcome};
use lt_cli::cli::Cli;
use lt_core::mock::{ACCESS_SAMPLE, APP_SAMPLE, ERROR_SAMPLE, SYSLOG_SAMPLE};

/// Scratch workspace with a `logs/` input dir and an `out/` report dir.
pub struct TestHarness {
    dir: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("logs")).unwrap();
        Self { dir }
    }

    /// Harness with the four sample logs written to disk.
    pub fn with_sample_logs() -> Self {
        let h = Self::new();
        h.write_log("auth.log", SYSLOG_SAMPLE);
        h.write_log("access.log", ACCESS_SAMPLE);
        h.write_log("error.log", ERROR_SAMPLE);
        h.write_log("app.log", APP_SAMPLE);
        h
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn out_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    /// Path of `name` under `logs/`, whether or not it exists.
    pub fn log_path(&self, name: &str) -> String {
        self.dir.path().join("logs").join(name).display().to_string()
    }

    /// Write `lines` as `logs/<name>` and return its path.
    pub fn write_log(&self, name: &str, lines: &[&str]) -> String {
        let path = self.log_path(name);
        let mut content = lines.join("\n");
        content.push('\n');
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Write a config file at the harness root and return its path.
    pub fn write_config(&self, toml: &str) -> String {
        let path = self.dir.path().join("logtally.toml");
        std::fs::write(&path, toml).unwrap();
        path.display().to_string()
    }

    /// Parse `args` as the binary would, with `-o <out>` prepended.
    pub fn cli(&self, args: &[&str]) -> Cli {
        let out = self.out_dir().display().to_string();
        let argv = ["logtally", "-o", out.as_str()]
            .into_iter()
            .chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap()
    }

    /// Run the full pipeline.
    pub async fn run(&self, args: &[&str]) -> Outcome {
        app::execute(&self.cli(args)).await.unwrap()
    }

    /// Run expecting a configuration or output error.
    pub async fn run_err(&self, args: &[&str]) -> anyhow::Error {
        app::execute(&self.cli(args)).await.err().unwrap()
    }

    /// Parse `out/analysis.json`.
    pub fn analysis_json(&self) -> serde_json::Value {
        let text = std::fs::read_to_string(self.out_dir().join("analysis.json")).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    /// Read `out/<name>` as CSV records (header excluded).
    pub fn csv_rows(&self, name: &str) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(self.out_dir().join(name)).unwrap();
        rdr.records().map(Result::unwrap).collect()
    }
}
