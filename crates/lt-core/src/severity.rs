//! Keyword-based severity classification for grammars without explicit levels.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::Severity;

// Checked in order; the first category with a match wins.
static SEVERITY_PATTERNS: LazyLock<Vec<(Regex, Severity)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(
                // "fail", "exception" and "denied" count anywhere in a word
                r"(?i)\b(ERROR|ERRORS|ERR|FATAL|CRITICAL|CRIT|PANIC|EMERG(?:ENCY)?|ALERT|SEGFAULT|REFUSED|UNAUTHORIZED|FORBIDDEN)\b|FAIL|EXCEPTION|DENIED",
            )
            .unwrap(),
            Severity::Error,
        ),
        (
            Regex::new(
                r"(?i)\b(WARN(?:ING|INGS)?|DEPRECATED|RETRY(?:ING)?|RETRIES|TIMEOUT|TIMED OUT|SLOW|UNREACHABLE)\b",
            )
            .unwrap(),
            Severity::Warn,
        ),
        (
            Regex::new(
                r"(?i)\b(INFO|INFORMATION|NOTICE|STARTED|STARTING|STOPPED|ACCEPTED|SUCCESS(?:FUL|FULLY)?|CONNECTED|LISTENING|OPENED|CLOSED|ESTABLISHED|COMPLETED?)\b",
            )
            .unwrap(),
            Severity::Info,
        ),
        (
            Regex::new(r"(?i)\b(DEBUG|TRACE|VERBOSE)\b").unwrap(),
            Severity::Debug,
        ),
    ]
});

/// Classify free text by keyword. Returns [`Severity::Unknown`] when no
/// category matches.
pub fn classify(message: &str) -> Severity {
    SEVERITY_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(message))
        .map(|(_, severity)| *severity)
        .unwrap_or(Severity::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_keywords() {
        assert_eq!(classify("Failed password for invalid user admin"), Severity::Error);
        assert_eq!(classify("java.lang.NullPointerException"), Severity::Error);
        assert_eq!(classify("unhandled exception in worker"), Severity::Error);
        assert_eq!(classify("Permission denied (publickey)"), Severity::Error);
        assert_eq!(classify("connect() failed: Connection refused"), Severity::Error);
        assert_eq!(classify("FATAL: cannot continue"), Severity::Error);
    }

    #[test]
    fn warn_keywords() {
        assert_eq!(classify("Warning: low memory"), Severity::Warn);
        assert_eq!(classify("Retrying connection in 5 seconds"), Severity::Warn);
        assert_eq!(classify("upstream timeout while reading"), Severity::Warn);
    }

    #[test]
    fn info_and_debug_keywords() {
        assert_eq!(classify("Started Daily Cleanup"), Severity::Info);
        assert_eq!(classify("Accepted publickey for deploy"), Severity::Info);
        assert_eq!(classify("debug: cache hit ratio 0.93"), Severity::Debug);
    }

    #[test]
    fn error_wins_over_later_categories() {
        assert_eq!(classify("retrying after error"), Severity::Error);
        assert_eq!(classify("debug trace of failure path"), Severity::Error);
    }

    #[test]
    fn whole_words_only() {
        // "terror" and "errand" must not read as "error"
        assert_eq!(classify("terror errand"), Severity::Unknown);
    }

    #[test]
    fn default_is_unknown() {
        assert_eq!(classify("CRON[5678]: (root) CMD (/usr/bin/healthcheck)"), Severity::Unknown);
        assert_eq!(classify(""), Severity::Unknown);
    }
}
