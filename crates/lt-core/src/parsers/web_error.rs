//! nginx error log parser.

use regex::Regex;
use std::sync::LazyLock;

use crate::severity;
use crate::timestamp::{self, TimeContext};
use crate::types::{Record, RecordDetail, Severity};

// yyyy/mm/dd HH:MM:SS [LEVEL] PID#TID: [*CID ]MSG
static RE_ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<ts>\d{4}/\d{2}/\d{2}\s+\d{2}:\d{2}:\d{2})\s+\[(?P<level>[A-Za-z]+)\]\s+(?P<pid>\d+)#(?P<tid>\d+):\s*(?:\*(?P<cid>\d+)\s+)?(?P<msg>.*)$",
    )
    .unwrap()
});

static RE_CLIENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bclient:\s*(?P<client>[^,\s]+)").unwrap());

/// Try to parse a line as an nginx error log entry.
pub fn parse(line: &str, ctx: &TimeContext) -> Option<Record> {
    let caps = RE_ERROR.captures(line)?;
    let message = caps["msg"].trim_end();
    let severity =
        Severity::from_token(&caps["level"]).unwrap_or_else(|| severity::classify(message));

    Some(Record {
        timestamp: timestamp::parse_web_error(&caps["ts"], ctx),
        severity,
        actor: RE_CLIENT
            .captures(message)
            .map(|c| c["client"].to_string()),
        message: message.to_string(),
        detail: RecordDetail::WebError {
            pid: caps["pid"].parse().ok()?,
            tid: caps["tid"].parse().ok()?,
            connection_id: caps.name("cid").and_then(|m| m.as_str().parse().ok()),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ctx() -> TimeContext {
        TimeContext::utc(Utc.with_ymd_and_hms(2026, 10, 16, 0, 0, 0).unwrap())
    }

    #[test]
    fn parse_upstream_failure() {
        let line = "2026/01/17 10:15:32 [error] 1234#0: *1 connect() failed (111: Connection refused) while connecting to upstream, client: 10.1.2.3, server: example.com";
        let rec = parse(line, &ctx()).unwrap();
        assert_eq!(rec.severity, Severity::Error);
        assert_eq!(rec.actor.as_deref(), Some("10.1.2.3"));
        assert_eq!(
            rec.timestamp,
            Some(Utc.with_ymd_and_hms(2026, 1, 17, 10, 15, 32).unwrap())
        );
        assert_eq!(
            rec.detail,
            RecordDetail::WebError {
                pid: 1234,
                tid: 0,
                connection_id: Some(1),
            }
        );
        assert!(rec.message.starts_with("connect() failed"));
    }

    #[test]
    fn level_tokens() {
        let warn = parse("2026/01/17 10:15:32 [warn] 10#10: conflicting server name", &ctx()).unwrap();
        assert_eq!(warn.severity, Severity::Warn);
        let crit = parse("2026/01/17 10:15:32 [crit] 10#10: *7 SSL_do_handshake() failed", &ctx()).unwrap();
        assert_eq!(crit.severity, Severity::Error);
        let notice = parse("2026/01/17 10:15:32 [notice] 1#1: signal process started", &ctx()).unwrap();
        assert_eq!(notice.severity, Severity::Info);
        assert_eq!(notice.actor, None);
    }

    #[test]
    fn rejects_other_grammars() {
        assert!(parse("2026-01-17 10:15:32 [error] 1#0: boom", &ctx()).is_none());
        assert!(parse("Jan 17 10:15:32 host nginx[1]: [error] boom", &ctx()).is_none());
    }
}
