//! Mock log source for testing: serves pre-loaded content by name.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Cursor, Read};

use crate::error::{LogError, LogResult};
use crate::source::LogSource;

enum MockFile {
    Content(Vec<u8>),
    /// Serves the content, then fails the next read.
    Broken(Vec<u8>),
    /// Fails to open.
    Unreadable(String),
}

/// A mock log source that serves pre-loaded content by name.
#[derive(Default)]
pub struct MockLogSource {
    files: HashMap<String, MockFile>,
}

impl MockLogSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given lines.
    pub fn add_file<S: AsRef<str>>(&mut self, name: impl Into<String>, lines: &[S]) {
        self.files
            .insert(name.into(), MockFile::Content(join_lines(lines)));
    }

    /// Add a file with raw bytes (may be invalid UTF-8).
    pub fn add_bytes(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(name.into(), MockFile::Content(bytes));
    }

    /// Add a file whose reader errors after serving `lines`.
    pub fn add_broken<S: AsRef<str>>(&mut self, name: impl Into<String>, lines: &[S]) {
        self.files
            .insert(name.into(), MockFile::Broken(join_lines(lines)));
    }

    /// Add a file that cannot be opened.
    pub fn add_unreadable(&mut self, name: impl Into<String>, reason: impl Into<String>) {
        self.files
            .insert(name.into(), MockFile::Unreadable(reason.into()));
    }

    /// Mock with a sample BSD syslog file at `/var/log/auth.log`.
    pub fn with_syslog_sample() -> Self {
        let mut m = Self::new();
        m.add_file("/var/log/auth.log", SYSLOG_SAMPLE);
        m
    }

    /// Mock with a sample access log at `/var/log/nginx/access.log`.
    pub fn with_access_sample() -> Self {
        let mut m = Self::new();
        m.add_file("/var/log/nginx/access.log", ACCESS_SAMPLE);
        m
    }

    /// Mock with a sample nginx error log at `/var/log/nginx/error.log`.
    pub fn with_error_sample() -> Self {
        let mut m = Self::new();
        m.add_file("/var/log/nginx/error.log", ERROR_SAMPLE);
        m
    }

    /// Mock with a sample application log at `/var/log/app.log`.
    pub fn with_app_sample() -> Self {
        let mut m = Self::new();
        m.add_file("/var/log/app.log", APP_SAMPLE);
        m
    }

    /// Every sample above in one source.
    pub fn with_all_samples() -> Self {
        let mut m = Self::new();
        m.add_file("/var/log/auth.log", SYSLOG_SAMPLE);
        m.add_file("/var/log/nginx/access.log", ACCESS_SAMPLE);
        m.add_file("/var/log/nginx/error.log", ERROR_SAMPLE);
        m.add_file("/var/log/app.log", APP_SAMPLE);
        m
    }
}

fn join_lines<S: AsRef<str>>(lines: &[S]) -> Vec<u8> {
    let mut out = Vec::new();
    for line in lines {
        out.extend_from_slice(line.as_ref().as_bytes());
        out.push(b'\n');
    }
    out
}

struct FailingRead;

impl Read for FailingRead {
    fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
        Err(std::io::Error::other("simulated read failure"))
    }
}

impl LogSource for MockLogSource {
    fn open(&self, name: &str) -> LogResult<Box<dyn BufRead + Send>> {
        match self.files.get(name) {
            Some(MockFile::Content(bytes)) => Ok(Box::new(Cursor::new(bytes.clone()))),
            Some(MockFile::Broken(bytes)) => Ok(Box::new(BufReader::new(
                Cursor::new(bytes.clone()).chain(FailingRead),
            ))),
            Some(MockFile::Unreadable(reason)) => Err(LogError::Io(format!("{name}: {reason}"))),
            None => Err(LogError::NotFound(name.to_string())),
        }
    }
}

// ── Samples ───────────────────────────────────────────────────

pub const SYSLOG_SAMPLE: &[&str] = &[
    "Jan 17 10:15:32 webserver sshd[1234]: Failed password for invalid user admin from 203.0.113.9 port 52113 ssh2",
    "Jan 17 10:15:35 webserver sshd[1234]: Failed password for invalid user admin from 203.0.113.9 port 52114 ssh2",
    "Jan 17 10:15:38 webserver sshd[1234]: Failed password for invalid user admin from 203.0.113.9 port 52115 ssh2",
    "Jan 17 10:15:41 webserver sshd[1234]: Failed password for root from 203.0.113.9 port 52116 ssh2",
    "Jan 17 10:15:44 webserver sshd[1234]: Failed password for root from 203.0.113.9 port 52117 ssh2",
    "Jan 17 10:16:02 webserver sshd[1301]: Accepted publickey for deploy from 192.168.1.20 port 40022 ssh2",
    "Jan 17 10:20:00 webserver CRON[2201]: (root) CMD (/usr/local/bin/backup.sh)",
    "Jan 17 11:02:13 webserver systemd[1]: Started Daily apt upgrade and clean activities.",
    "<132>Jan 17 11:05:00 webserver kernel: [ 8812.004] TCP: request_sock_TCP: Possible SYN flooding on port 80",
    "Jan 17 12:30:45 webserver sudo[3102]: deploy : TTY=pts/0 ; PWD=/home/deploy ; COMMAND=/bin/systemctl restart nginx",
];

pub const ACCESS_SAMPLE: &[&str] = &[
    r#"192.168.1.101 - - [17/Jan/2026:10:15:32 +0000] "GET /index.html HTTP/1.1" 200 1234 "-" "Mozilla/5.0""#,
    r#"192.168.1.101 - - [17/Jan/2026:10:15:33 +0000] "GET /static/app.js HTTP/1.1" 200 53211 "https://example.com/" "Mozilla/5.0""#,
    r#"192.168.1.102 - - [17/Jan/2026:10:16:01 +0000] "POST /api/login HTTP/1.1" 401 52 "-" "curl/8.0""#,
    r#"203.0.113.9 - - [17/Jan/2026:10:16:05 +0000] "GET /wp-login.php HTTP/1.1" 404 162 "-" "python-requests/2.31""#,
    r#"203.0.113.9 - - [17/Jan/2026:10:16:06 +0000] "GET /wp-login.php HTTP/1.1" 404 162 "-" "python-requests/2.31""#,
    r#"203.0.113.9 - - [17/Jan/2026:10:16:07 +0000] "GET /.env HTTP/1.1" 404 162 "-" "python-requests/2.31""#,
    r#"10.0.0.5 - - [17/Jan/2026:11:00:00 +0000] "GET /api/orders/1842 HTTP/1.1" 502 0 "-" "okhttp/4.9""#,
    r#"10.0.0.5 - - [17/Jan/2026:11:00:02 +0000] "GET /api/orders/1843 HTTP/1.1" 200 811 "-" "okhttp/4.9""#,
];

pub const ERROR_SAMPLE: &[&str] = &[
    "2026/01/17 10:15:32 [error] 1234#0: *1 connect() failed (111: Connection refused) while connecting to upstream, client: 10.0.0.5, server: example.com",
    "2026/01/17 10:15:40 [warn] 1234#0: *2 an upstream response is buffered to a temporary file, client: 192.168.1.101",
    "2026/01/17 10:16:00 [error] 1234#0: *3 open() \"/var/www/html/wp-login.php\" failed (2: No such file or directory), client: 203.0.113.9",
    "2026/01/17 11:00:00 [notice] 1#1: signal process started",
    "2026/01/17 11:00:01 [crit] 1234#0: *9 SSL_do_handshake() failed, client: 198.51.100.7",
];

pub const APP_SAMPLE: &[&str] = &[
    "2026-01-17 10:15:30.001 INFO [main] Application started on port 8080",
    "2026-01-17 10:15:32.123 ERROR [database] Connection pool exhausted, retrying...",
    "2026-01-17 10:15:33.456 WARN [database] Slow query took 2300ms",
    "2026-01-17 10:15:34.789 ERROR [database] Connection pool exhausted, retrying...",
    "2026-01-17 10:15:40,000 DEBUG [cache] Evicted 120 entries",
    "2026-01-17T10:16:00Z [INFO] [http] - Request from 192.168.1.101 completed",
    "",
    "this line is not an application log line",
];

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(source: &MockLogSource, name: &str) -> Vec<String> {
        source
            .open(name)
            .unwrap()
            .lines()
            .map(Result::unwrap)
            .collect()
    }

    #[test]
    fn mock_serves_lines() {
        let source = MockLogSource::with_syslog_sample();
        let lines = read_all(&source, "/var/log/auth.log");
        assert_eq!(lines.len(), SYSLOG_SAMPLE.len());
        assert!(lines[0].contains("Failed password"));
    }

    #[test]
    fn mock_not_found() {
        let source = MockLogSource::new();
        assert!(matches!(
            source.open("/nonexistent").err().unwrap(),
            LogError::NotFound(_)
        ));
    }

    #[test]
    fn mock_unreadable() {
        let mut source = MockLogSource::new();
        source.add_unreadable("/root/secret.log", "permission denied");
        let err = source.open("/root/secret.log").err().unwrap();
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn mock_broken_fails_after_content() {
        let mut source = MockLogSource::new();
        source.add_broken("flaky.log", &["one", "two"]);
        let mut reader = source.open("flaky.log").unwrap();
        let mut buf = String::new();
        reader.read_line(&mut buf).unwrap();
        assert_eq!(buf, "one\n");
        buf.clear();
        reader.read_line(&mut buf).unwrap();
        buf.clear();
        assert!(reader.read_line(&mut buf).is_err());
    }

    #[test]
    fn all_samples_registered() {
        let source = MockLogSource::with_all_samples();
        for name in [
            "/var/log/auth.log",
            "/var/log/nginx/access.log",
            "/var/log/nginx/error.log",
            "/var/log/app.log",
        ] {
            assert!(source.open(name).is_ok(), "{name}");
        }
    }
}
