//! BSD syslog parser (RFC 3164 style, optional `<PRI>` prefix).

use regex::Regex;
use std::sync::LazyLock;

use crate::parsers::find_ipv4;
use crate::severity;
use crate::timestamp::{self, TimeContext};
use crate::types::{Record, RecordDetail, Severity};

// [<PRI>]Mmm dd HH:MM:SS HOSTNAME TAG[PID]: MSG
static RE_SYSLOG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:<(?P<pri>\d{1,3})>)?(?P<ts>[A-Z][a-z]{2}\s+\d{1,2}\s+\d{2}:\d{2}:\d{2})\s+(?P<host>\S+)\s+(?P<process>[^\s\[\]:]+)(?:\[(?P<pid>\d+)\])?:\s*(?P<msg>.*)$",
    )
    .unwrap()
});

/// Try to parse a line as syslog.
///
/// Severity comes from `<PRI>` when present; otherwise the message text is
/// classified by keyword.
pub fn parse(line: &str, ctx: &TimeContext) -> Option<Record> {
    let caps = RE_SYSLOG.captures(line)?;
    let message = caps["msg"].trim_end();
    let priority = caps.name("pri").and_then(|m| m.as_str().parse::<u8>().ok());

    let severity = match priority {
        Some(pri) => Severity::from_syslog_priority(pri),
        None => severity::classify(message),
    };

    Some(Record {
        timestamp: timestamp::parse_syslog(&caps["ts"], ctx),
        severity,
        actor: find_ipv4(message),
        message: message.to_string(),
        detail: RecordDetail::Syslog {
            host: caps["host"].to_string(),
            process: caps["process"].to_string(),
            pid: caps.name("pid").and_then(|m| m.as_str().parse().ok()),
            priority,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ctx() -> TimeContext {
        TimeContext::utc(Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap())
    }

    #[test]
    fn parse_sshd_failure() {
        let line = "Jan 17 10:15:32 webserver sshd[1234]: Failed password for invalid user admin";
        let rec = parse(line, &ctx()).unwrap();
        assert_eq!(
            rec.timestamp,
            Some(Utc.with_ymd_and_hms(2026, 1, 17, 10, 15, 32).unwrap())
        );
        assert_eq!(rec.actor, None);
        assert_eq!(rec.severity, Severity::Error);
        assert!(rec.message.contains("Failed password"));
        assert_eq!(
            rec.detail,
            RecordDetail::Syslog {
                host: "webserver".into(),
                process: "sshd".into(),
                pid: Some(1234),
                priority: None,
            }
        );
    }

    #[test]
    fn parse_extracts_address_from_message() {
        let line = "Jan 17 10:15:40 webserver sshd[1234]: Failed password for root from 192.168.1.100 port 22 ssh2";
        let rec = parse(line, &ctx()).unwrap();
        assert_eq!(rec.actor.as_deref(), Some("192.168.1.100"));
    }

    #[test]
    fn parse_without_pid() {
        let line = "Jan 15 12:00:10 edge1 kernel: [12345.678] eth0: link up";
        let rec = parse(line, &ctx()).unwrap();
        match rec.detail {
            RecordDetail::Syslog { process, pid, .. } => {
                assert_eq!(process, "kernel");
                assert_eq!(pid, None);
            }
            other => panic!("unexpected detail {other:?}"),
        }
        assert_eq!(rec.message, "[12345.678] eth0: link up");
    }

    #[test]
    fn priority_overrides_keywords() {
        let line = "<131>Jan 15 12:00:05 edge1 myapp[1234]: Database connection established";
        let rec = parse(line, &ctx()).unwrap();
        assert_eq!(rec.severity, Severity::Error); // 131 & 7 = 3
    }

    #[test]
    fn no_keyword_is_unknown() {
        let line = "Jan 15 12:00:20 edge1 CRON[5678]: (root) CMD (/usr/bin/healthcheck)";
        let rec = parse(line, &ctx()).unwrap();
        assert_eq!(rec.severity, Severity::Unknown);
    }

    #[test]
    fn rejects_other_grammars() {
        let ctx = ctx();
        assert!(parse(
            r#"192.168.1.101 - - [17/Jan/2026:10:15:32 +0000] "GET / HTTP/1.1" 200 12"#,
            &ctx
        )
        .is_none());
        assert!(parse("2026-01-17 10:15:32 ERROR boom", &ctx).is_none());
        assert!(parse("2026/01/17 10:15:32 [error] 1#0: boom", &ctx).is_none());
        assert!(parse("just some words", &ctx).is_none());
    }
}
