//! Timestamp normalization for every supported log dialect.
//!
//! All parsers return `Option`: a malformed timestamp never aborts a line,
//! the record simply carries no time.
//!
//! Offset-less timestamps (syslog, web error, application without a zone
//! suffix) are interpreted in [`TimeContext::input_offset`], the same way
//! for every grammar. Syslog lines carry no year; see [`parse_syslog`].

use chrono::{
    DateTime, Datelike, FixedOffset, Local, NaiveDateTime, Offset, TimeZone, Utc,
};

use crate::error::{LogError, LogResult};
use crate::types::FormatKind;

/// Context needed to turn partial timestamps into instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeContext {
    /// "Now" for the run: supplies the syslog year and anchors relative
    /// window bounds.
    pub reference: DateTime<Utc>,
    /// Offset assumed for timestamps that do not carry one.
    pub input_offset: FixedOffset,
}

impl TimeContext {
    pub fn new(reference: DateTime<Utc>, input_offset: FixedOffset) -> Self {
        Self {
            reference,
            input_offset,
        }
    }

    /// Context with UTC as the assumed input offset.
    pub fn utc(reference: DateTime<Utc>) -> Self {
        Self::new(reference, utc_offset())
    }
}

impl Default for TimeContext {
    fn default() -> Self {
        Self::utc(Utc::now())
    }
}

pub(crate) fn utc_offset() -> FixedOffset {
    Utc.fix()
}

/// Normalize a timestamp captured by the given grammar.
pub fn normalize(text: &str, format: FormatKind, ctx: &TimeContext) -> Option<DateTime<Utc>> {
    match format {
        FormatKind::Syslog => parse_syslog(text, ctx),
        FormatKind::WebAccess => parse_web_access(text),
        FormatKind::WebError => parse_web_error(text, ctx),
        FormatKind::Application => parse_iso(text, ctx),
        FormatKind::Unknown => None,
    }
}

/// Parse `Mmm dd HH:MM:SS` (no year).
///
/// The year is the reference year; a month later than the reference month is
/// taken to belong to the previous year, so December lines read in January
/// do not land in the future.
pub fn parse_syslog(text: &str, ctx: &TimeContext) -> Option<DateTime<Utc>> {
    let mut parts = text.split_whitespace();
    let (month, day, time) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let reference = ctx.reference.with_timezone(&ctx.input_offset);
    let with_year = |year: i32| {
        NaiveDateTime::parse_from_str(
            &format!("{year} {month} {day} {time}"),
            "%Y %b %d %H:%M:%S",
        )
        .ok()
    };

    let year = reference.year();
    let mut naive = with_year(year);
    if naive.is_some_and(|n| n.month() > reference.month()) {
        naive = with_year(year - 1);
    }
    // Feb 29 outside a leap year: take the most recent leap year.
    if naive.is_none() && month.eq_ignore_ascii_case("feb") && day == "29" {
        naive = (1..=8).find_map(|back| with_year(year - back));
    }
    localize(naive?, ctx.input_offset)
}

/// Parse the access-log form `17/Jan/2026:10:15:32 +0000`.
pub fn parse_web_access(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(text.trim(), "%d/%b/%Y:%H:%M:%S %z")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse the nginx error-log form `2026/01/17 10:15:32`.
pub fn parse_web_error(text: &str, ctx: &TimeContext) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(text.trim(), "%Y/%m/%d %H:%M:%S").ok()?;
    localize(naive, ctx.input_offset)
}

/// Parse ISO-like `2026-01-17 10:15:32[.123][Z|+03:00]`.
///
/// Accepts `T` or a space between date and time and `,` as the fractional
/// separator (log4j style).
pub fn parse_iso(text: &str, ctx: &TimeContext) -> Option<DateTime<Utc>> {
    let canonical = text.trim().replacen(' ', "T", 1).replacen(',', ".", 1);

    if let Ok(dt) = DateTime::parse_from_rfc3339(&canonical) {
        return Some(dt.with_timezone(&Utc));
    }
    // Offset without a colon: +0300
    if let Ok(dt) = DateTime::parse_from_str(&canonical, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(&canonical, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    localize(naive, ctx.input_offset)
}

/// Attach an offset to a naive wall-clock time.
pub fn localize(naive: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<Utc>> {
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a user-supplied zone: `UTC`, `Z`, `local`, or a fixed offset such as
/// `+03:00`, `-0500`, `+5`, optionally prefixed with `UTC`/`GMT`.
pub fn parse_offset(text: &str) -> LogResult<FixedOffset> {
    let invalid = || LogError::InvalidTimeZone(text.to_string());
    let trimmed = text.trim();

    if trimmed.eq_ignore_ascii_case("utc") || trimmed.eq_ignore_ascii_case("z") {
        return Ok(utc_offset());
    }
    if trimmed.eq_ignore_ascii_case("local") {
        return Ok(Local::now().offset().fix());
    }

    let offset = ["UTC", "utc", "GMT", "gmt"]
        .iter()
        .find_map(|p| trimmed.strip_prefix(p))
        .unwrap_or(trimmed);
    let (sign, rest) = match offset.as_bytes().first() {
        Some(b'+') => (1, &offset[1..]),
        Some(b'-') => (-1, &offset[1..]),
        _ => return Err(invalid()),
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.is_empty() || digits.len() > 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let (hours, minutes) = if digits.len() <= 2 {
        (digits.parse::<i32>().map_err(|_| invalid())?, 0)
    } else {
        let split = digits.len() - 2;
        (
            digits[..split].parse::<i32>().map_err(|_| invalid())?,
            digits[split..].parse::<i32>().map_err(|_| invalid())?,
        )
    };
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}
