//! Line grammars: syslog, web access, web error and application logs.
//!
//! Every parser is a pure function from one line to `Option<Record>`. Lines
//! are sanitized first so that control characters never reach the record.

pub mod application;
pub mod syslog;
pub mod web_access;
pub mod web_error;

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

use crate::timestamp::TimeContext;
use crate::types::{FormatKind, Record};

static RE_IPV4: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").unwrap());

impl FormatKind {
    /// Parse one line with this grammar.
    pub fn parse(&self, line: &str, ctx: &TimeContext) -> Option<Record> {
        parse_line(line, *self, ctx)
    }
}

/// Parse a single line using the specified format.
///
/// Returns `None` for empty lines, lines the grammar does not match, and
/// always for [`FormatKind::Unknown`].
pub fn parse_line(line: &str, format: FormatKind, ctx: &TimeContext) -> Option<Record> {
    let clean = sanitize(line);
    let clean = clean.trim();
    if clean.is_empty() {
        return None;
    }
    match format {
        FormatKind::Syslog => syslog::parse(clean, ctx),
        FormatKind::WebAccess => web_access::parse(clean),
        FormatKind::WebError => web_error::parse(clean, ctx),
        FormatKind::Application => application::parse(clean, ctx),
        FormatKind::Unknown => None,
    }
}

/// Replace tabs with spaces and drop every other control character.
///
/// Borrows when the line is already clean, which is the common case.
pub fn sanitize(line: &str) -> Cow<'_, str> {
    if !line.chars().any(char::is_control) {
        return Cow::Borrowed(line);
    }
    Cow::Owned(
        line.chars()
            .filter_map(|c| match c {
                '\t' => Some(' '),
                c if c.is_control() => None,
                c => Some(c),
            })
            .collect(),
    )
}

/// First IPv4 address mentioned in free text with every octet ≤ 255.
pub(crate) fn find_ipv4(text: &str) -> Option<String> {
    RE_IPV4
        .find_iter(text)
        .map(|m| m.as_str())
        .find(|candidate| is_ipv4(candidate))
        .map(str::to_string)
}

fn is_ipv4(candidate: &str) -> bool {
    candidate.split('.').all(|octet| octet.parse::<u8>().is_ok())
}
