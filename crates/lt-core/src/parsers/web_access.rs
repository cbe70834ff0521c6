//! Common/combined access log parser (nginx, Apache).

use regex::Regex;
use std::sync::LazyLock;

use crate::timestamp;
use crate::types::{HttpRequest, Record, RecordDetail, Severity};

// CLIENT IDENT USER [TIME] "METHOD PATH PROTO" STATUS BYTES ["REFERRER" "UA"]
static RE_ACCESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?P<client>\S+)\s+\S+\s+\S+\s+\[(?P<ts>[^\]]+)\]\s+"(?P<method>[A-Za-z]+)\s+(?P<path>\S+)(?:\s+(?P<proto>[^"\s]+))?"\s+(?P<status>\d{3})\s+(?P<bytes>\d+|-)(?:\s+"(?P<referrer>[^"]*)"\s+"(?P<ua>[^"]*)")?"#,
    )
    .unwrap()
});

/// Try to parse a line as a web access log entry.
pub fn parse(line: &str) -> Option<Record> {
    let caps = RE_ACCESS.captures(line)?;
    let status: u16 = caps["status"].parse().ok()?;
    let method = caps["method"].to_ascii_uppercase();
    let path = caps["path"].to_string();

    let optional = |name: &str| {
        caps.name(name)
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty() && *s != "-")
            .map(str::to_string)
    };

    Some(Record {
        timestamp: timestamp::parse_web_access(&caps["ts"]),
        severity: Severity::from_status(status),
        actor: Some(caps["client"].to_string()),
        message: format!("{method} {path}"),
        detail: RecordDetail::WebAccess(HttpRequest {
            method,
            path,
            protocol: caps.name("proto").map(|m| m.as_str().to_string()).unwrap_or_default(),
            status,
            bytes: caps["bytes"].parse().ok(),
            referrer: optional("referrer"),
            user_agent: optional("ua"),
        }),
    })
}
