//! Generic application log parser: ISO-like timestamp, optional level token,
//! optional bracketed component.

use regex::Regex;
use std::sync::LazyLock;

use crate::parsers::find_ipv4;
use crate::severity;
use crate::timestamp::{self, TimeContext};
use crate::types::{Record, RecordDetail, Severity};

// TIMESTAMP [LEVEL|[LEVEL]] [[component]] [-|:] MSG
static RE_APP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<ts>\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(?:[.,]\d+)?(?:Z|[+-]\d{2}:?\d{2})?)(?:\s+|$)(?:\[?(?P<level>(?i:TRACE|DEBUG|INFO|NOTICE|WARNING|WARN|ERROR|ERR|FATAL|CRITICAL|CRIT|SEVERE))\]?(?:\s+|:\s*|$))?(?:\[(?P<component>[^\]]+)\]\s*)?(?:[-:]\s+)?(?P<msg>.*)$",
    )
    .unwrap()
});

/// Try to parse a line as an application log entry.
pub fn parse(line: &str, ctx: &TimeContext) -> Option<Record> {
    let caps = RE_APP.captures(line)?;
    let message = caps["msg"].trim();

    let severity = caps
        .name("level")
        .and_then(|m| Severity::from_token(m.as_str()))
        .unwrap_or_else(|| severity::classify(message));

    Some(Record {
        timestamp: timestamp::parse_iso(&caps["ts"], ctx),
        severity,
        actor: find_ipv4(message),
        message: message.to_string(),
        detail: RecordDetail::Application {
            component: caps
                .name("component")
                .map(|m| m.as_str().trim().to_string())
                .filter(|c| !c.is_empty()),
        },
    })
}
