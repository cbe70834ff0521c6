//! Time window filtering and parsing of user-supplied bounds.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::{LogError, LogResult};
use crate::timestamp::localize;

static RE_RELATIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<n>\d+)\s*(?P<unit>[mhdw])$").unwrap());

/// Which side of the window a bound closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundSide {
    From,
    To,
}

/// Inclusive time window. A missing bound is open on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeWindow {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> LogResult<Self> {
        if let (Some(f), Some(t)) = (from, to) {
            if f > t {
                return Err(LogError::Config(format!(
                    "time window start {} is after its end {}",
                    f.to_rfc3339(),
                    t.to_rfc3339()
                )));
            }
        }
        Ok(Self { from, to })
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_bounded(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// Whether an instant falls inside the window (both ends inclusive).
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.from.is_none_or(|f| ts >= f) && self.to.is_none_or(|t| ts <= t)
    }
}

/// Parse a window bound.
///
/// Accepted forms: RFC 3339, `YYYY-MM-DD`, `YYYY-MM-DD HH:MM[:SS]` (naive
/// forms are read in `zone`), and `N{m,h,d,w}` meaning N units before
/// `reference`. A date-only `To` bound covers the whole day.
pub fn parse_bound(
    text: &str,
    side: BoundSide,
    reference: DateTime<Utc>,
    zone: FixedOffset,
) -> LogResult<DateTime<Utc>> {
    let trimmed = text.trim();
    let invalid = |reason: &str| LogError::InvalidTimeBound {
        value: text.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("empty value"));
    }

    if let Some(caps) = RE_RELATIVE.captures(trimmed) {
        let n: i64 = caps["n"].parse().map_err(|_| invalid("number out of range"))?;
        let delta = match &caps["unit"] {
            "m" => TimeDelta::try_minutes(n),
            "h" => TimeDelta::try_hours(n),
            "d" => TimeDelta::try_days(n),
            _ => TimeDelta::try_weeks(n),
        }
        .ok_or_else(|| invalid("duration out of range"))?;
        return reference
            .checked_sub_signed(delta)
            .ok_or_else(|| invalid("duration out of range"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        let time = match side {
            BoundSide::From => {
                NaiveTime::from_hms_opt(0, 0, 0).ok_or_else(|| invalid("invalid time"))?
            }
            BoundSide::To => NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
                .ok_or_else(|| invalid("invalid time"))?,
        };
        return localize(date.and_time(time), zone).ok_or_else(|| invalid("invalid local time"));
    }

    let canonical = trimmed.replacen('T', " ", 1);
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&canonical, fmt) {
            return localize(naive, zone).ok_or_else(|| invalid("invalid local time"));
        }
    }

    Err(invalid(
        "expected RFC 3339, YYYY-MM-DD, YYYY-MM-DD HH:MM[:SS] or a relative value like 2h",
    ))
}
