//! Streaming aggregation: records go in one at a time, only bounded summary
//! state is kept.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Timelike, Utc};
use std::collections::BTreeMap;

use crate::pattern::normalize_message;
use crate::result::{
    FailureEntry, FailureKey, LineCounts, RankedEntry, Rankings, SeverityCounts, TimeBucket,
    TimeRange, Timeline,
};
use crate::timestamp::localize;
use crate::topk::FrequencyTable;
use crate::types::{Record, Severity};

/// Running totals for one source, or for a whole run after merging.
#[derive(Debug, Clone)]
pub struct Aggregator {
    display_offset: FixedOffset,
    lines: LineCounts,
    severities: SeverityCounts,
    messages: FrequencyTable<String>,
    actors: FrequencyTable<String>,
    status_codes: FrequencyTable<u16>,
    paths: FrequencyTable<String>,
    failures: FrequencyTable<FailureKey>,
    hourly: BTreeMap<NaiveDateTime, u64>,
    daily: BTreeMap<NaiveDate, u64>,
    earliest: Option<DateTime<Utc>>,
    latest: Option<DateTime<Utc>>,
}

impl Aggregator {
    pub fn new(top_k: usize, display_offset: FixedOffset) -> Self {
        Self {
            display_offset,
            lines: LineCounts::default(),
            severities: SeverityCounts::default(),
            messages: FrequencyTable::new(top_k),
            actors: FrequencyTable::new(top_k),
            status_codes: FrequencyTable::new(top_k),
            paths: FrequencyTable::new(top_k),
            failures: FrequencyTable::new(top_k),
            hourly: BTreeMap::new(),
            daily: BTreeMap::new(),
            earliest: None,
            latest: None,
        }
    }

    // ── Signals ───────────────────────────────────────────────

    /// Fold one parsed, in-window record.
    pub fn record(&mut self, record: Record) {
        self.lines.total += 1;
        self.lines.parsed += 1;
        self.severities.add(record.severity);

        let pattern = normalize_message(&record.message);

        if let Some(actor) = &record.actor {
            self.actors.add(actor.clone());
        }

        match record.http() {
            Some(req) => {
                self.status_codes.add(req.status);
                self.paths.add(req.path.clone());
                if req.status >= 400 {
                    self.failures.add(FailureKey {
                        kind: req.status.to_string(),
                        subject: req.path.clone(),
                    });
                }
            }
            None if record.severity == Severity::Error => {
                self.failures.add(FailureKey {
                    kind: "ERROR".to_string(),
                    subject: pattern.clone(),
                });
            }
            None => {}
        }

        self.messages.add(pattern);

        if let Some(ts) = record.timestamp {
            self.observe_time(ts);
        }
    }

    /// A non-empty line the grammar did not match.
    pub fn unparsed(&mut self) {
        self.lines.total += 1;
        self.lines.unparsed += 1;
    }

    /// An empty or whitespace-only line.
    pub fn empty(&mut self) {
        self.lines.total += 1;
        self.lines.unparsed += 1;
        self.lines.empty += 1;
    }

    /// A parsed record whose timestamp fell outside the window.
    pub fn out_of_window(&mut self) {
        self.lines.total += 1;
        self.lines.out_of_window += 1;
    }

    fn observe_time(&mut self, ts: DateTime<Utc>) {
        self.earliest = Some(self.earliest.map_or(ts, |e| e.min(ts)));
        self.latest = Some(self.latest.map_or(ts, |l| l.max(ts)));

        let local = ts.with_timezone(&self.display_offset).naive_local();
        let hour = local
            .with_minute(0)
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_nanosecond(0));
        if let Some(hour) = hour {
            *self.hourly.entry(hour).or_default() += 1;
        }
        *self.daily.entry(local.date()).or_default() += 1;
    }

    // ── Merge & snapshot ──────────────────────────────────────

    /// Fold a per-source aggregate into this one.
    pub fn merge(&mut self, other: Aggregator) {
        self.lines.add(&other.lines);
        self.severities.merge(&other.severities);
        self.messages.merge(other.messages);
        self.actors.merge(other.actors);
        self.status_codes.merge(other.status_codes);
        self.paths.merge(other.paths);
        self.failures.merge(other.failures);
        for (hour, count) in other.hourly {
            *self.hourly.entry(hour).or_default() += count;
        }
        for (day, count) in other.daily {
            *self.daily.entry(day).or_default() += count;
        }
        self.earliest = match (self.earliest, other.earliest) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.latest = match (self.latest, other.latest) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }

    pub fn lines(&self) -> LineCounts {
        self.lines
    }

    pub fn severities(&self) -> SeverityCounts {
        self.severities
    }

    pub fn actors(&self) -> &FrequencyTable<String> {
        &self.actors
    }

    pub fn failures(&self) -> &FrequencyTable<FailureKey> {
        &self.failures
    }

    pub fn distinct_actors(&self) -> usize {
        self.actors.len()
    }

    pub fn distinct_status_codes(&self) -> usize {
        self.status_codes.len()
    }

    pub fn distinct_paths(&self) -> usize {
        self.paths.len()
    }

    pub fn time_range(&self) -> Option<TimeRange> {
        Some(TimeRange {
            earliest: self.earliest?.with_timezone(&self.display_offset),
            latest: self.latest?.with_timezone(&self.display_offset),
        })
    }

    pub fn rankings(&self) -> Rankings {
        fn entries<K: ToString + Eq + std::hash::Hash + Clone>(
            table: &FrequencyTable<K>,
        ) -> Vec<RankedEntry> {
            table
                .top()
                .into_iter()
                .map(|(key, count)| RankedEntry {
                    key: key.to_string(),
                    count,
                })
                .collect()
        }

        Rankings {
            messages: entries(&self.messages),
            actors: entries(&self.actors),
            status_codes: entries(&self.status_codes),
            paths: entries(&self.paths),
            failures: self
                .failures
                .top()
                .into_iter()
                .map(|(key, count)| FailureEntry { key, count })
                .collect(),
        }
    }

    pub fn timeline(&self) -> Timeline {
        let hourly = self
            .hourly
            .iter()
            .filter_map(|(hour, &count)| {
                Some(TimeBucket {
                    start: self.bucket_start(*hour)?,
                    label: hour.format("%Y-%m-%d %H:00").to_string(),
                    count,
                })
            })
            .collect();
        let daily = self
            .daily
            .iter()
            .filter_map(|(day, &count)| {
                Some(TimeBucket {
                    start: self.bucket_start(day.and_hms_opt(0, 0, 0)?)?,
                    label: day.format("%Y-%m-%d").to_string(),
                    count,
                })
            })
            .collect();
        Timeline { hourly, daily }
    }

    fn bucket_start(&self, naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        localize(naive, self.display_offset).map(|ts| ts.with_timezone(&self.display_offset))
    }
}
