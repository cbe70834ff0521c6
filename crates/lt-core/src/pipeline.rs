//! The analysis pipeline: detect, parse, window and aggregate each source,
//! then run anomaly detection once over the merged state.

use chrono::Utc;
use std::io::BufRead;

use crate::aggregate::Aggregator;
use crate::anomaly;
use crate::config::RunConfig;
use crate::detect::{Detection, FormatDetector};
use crate::parsers::{self, sanitize};
use crate::result::{AnalysisResult, RunMetadata, SourceReport, SourceStatus, Summary, round2};
use crate::source::LogSource;
use crate::timestamp::TimeContext;
use crate::types::FormatKind;

/// Runs sources through the pipeline one after another and accumulates a
/// run-wide aggregate.
pub struct Analyzer {
    config: RunConfig,
    ctx: TimeContext,
    detector: FormatDetector,
    run: Aggregator,
    sources: Vec<SourceReport>,
    lines_read: u64,
    cap_hit: bool,
}

/// Analyze every named source and produce the result.
pub fn run<S: AsRef<str>>(config: RunConfig, source: &dyn LogSource, names: &[S]) -> AnalysisResult {
    let mut analyzer = Analyzer::new(config);
    for name in names {
        analyzer.analyze_source(source, name.as_ref());
    }
    analyzer.finish()
}

impl Analyzer {
    pub fn new(config: RunConfig) -> Self {
        let ctx = config.time_context();
        let detector = FormatDetector::new(config.format).with_min_matches(config.min_matches);
        let run = Aggregator::new(config.top_k, config.display_offset);
        Self {
            config,
            ctx,
            detector,
            run,
            sources: Vec::new(),
            lines_read: 0,
            cap_hit: false,
        }
    }

    /// Open and analyze one source. Open failures are recorded in the
    /// source report; they never abort the run.
    pub fn analyze_source(&mut self, source: &dyn LogSource, name: &str) -> &SourceReport {
        if self.cap_hit || self.at_cap() {
            self.mark_cap_hit();
            return self.push_report(SourceReport::skipped(name));
        }
        match source.open(name) {
            Ok(reader) => self.analyze_reader(name, reader),
            Err(e) => {
                tracing::warn!(source = name, error = %e, "cannot open source");
                self.push_report(SourceReport::failed(name, e))
            }
        }
    }

    /// Analyze an already opened reader.
    pub fn analyze_reader<R: BufRead>(&mut self, name: &str, reader: R) -> &SourceReport {
        if self.cap_hit || self.at_cap() {
            self.mark_cap_hit();
            return self.push_report(SourceReport::skipped(name));
        }

        let mut lines = LineReader::new(reader);
        let mut agg = Aggregator::new(self.config.top_k, self.config.display_offset);
        let (sample, mut read_error) = self.read_sample(&mut lines, &mut agg);

        let detection = self.detect(&sample);
        let format = detection.format;

        for line in &sample {
            self.process_line(line, format, &mut agg);
        }
        drop(sample);

        if read_error.is_none() {
            loop {
                match self.next_line(&mut lines) {
                    Ok(Some(line)) => self.process_line(&line, format, &mut agg),
                    Ok(None) => break,
                    Err(e) => {
                        read_error = Some(e);
                        break;
                    }
                }
            }
        }

        let counts = agg.lines();
        self.run.merge(agg);

        let (status, error) = match read_error {
            Some(e) => {
                tracing::warn!(source = name, error = %e, "read failed mid-stream");
                (SourceStatus::Failed, Some(format!("{name}: {e}")))
            }
            None => (SourceStatus::Ok, None),
        };
        tracing::info!(
            source = name,
            format = %format,
            lines = counts.total,
            parsed = counts.parsed,
            unparsed = counts.unparsed,
            "source analyzed"
        );

        self.push_report(SourceReport {
            name: name.to_string(),
            status,
            format,
            detection: Some(detection),
            lines: counts,
            error,
        })
    }

    /// Read until the detection sample holds `sample_size` non-empty lines.
    /// Blank lines are counted as they come and never held.
    fn read_sample<R: BufRead>(
        &mut self,
        lines: &mut LineReader<R>,
        agg: &mut Aggregator,
    ) -> (Vec<String>, Option<std::io::Error>) {
        let mut sample = Vec::new();
        while sample.len() < self.config.sample_size {
            match self.next_line(lines) {
                Ok(Some(line)) if sanitize(&line).trim().is_empty() => agg.empty(),
                Ok(Some(line)) => sample.push(line),
                Ok(None) => return (sample, None),
                Err(e) => return (sample, Some(e)),
            }
        }
        (sample, None)
    }

    fn detect(&self, sample: &[String]) -> Detection {
        let sanitized: Vec<std::borrow::Cow<'_, str>> =
            sample.iter().map(|line| sanitize(line)).collect();
        self.detector.detect(&sanitized, &self.ctx)
    }

    fn process_line(&self, line: &str, format: FormatKind, agg: &mut Aggregator) {
        if sanitize(line).trim().is_empty() {
            agg.empty();
            return;
        }
        match parsers::parse_line(line, format, &self.ctx) {
            None => agg.unparsed(),
            Some(record) => match record.timestamp {
                Some(ts) if !self.config.window.contains(ts) => agg.out_of_window(),
                _ => agg.record(record),
            },
        }
    }

    fn next_line<R: BufRead>(&mut self, lines: &mut LineReader<R>) -> std::io::Result<Option<String>> {
        if self.at_cap() {
            if lines.has_more() {
                self.mark_cap_hit();
            }
            return Ok(None);
        }
        let line = lines.next_line()?;
        if line.is_some() {
            self.lines_read += 1;
        }
        Ok(line)
    }

    fn at_cap(&self) -> bool {
        self.config.max_lines.is_some_and(|max| self.lines_read >= max)
    }

    /// Input remained past the cap.
    fn mark_cap_hit(&mut self) {
        if !self.cap_hit {
            tracing::info!(max_lines = ?self.config.max_lines, "line cap reached, stopping input");
        }
        self.cap_hit = true;
    }

    fn push_report(&mut self, report: SourceReport) -> &SourceReport {
        self.sources.push(report);
        &self.sources[self.sources.len() - 1]
    }

    /// Run anomaly detection and freeze the result.
    pub fn finish(self) -> AnalysisResult {
        let anomalies = anomaly::detect(&self.run, &self.config.thresholds);
        let metadata = RunMetadata {
            generated_at: Utc::now(),
            format_hint: self.config.format,
            window: self.config.window,
            timezone: self.config.timezone_label.clone(),
            top_k: self.config.top_k,
            max_lines: self.config.max_lines,
            max_lines_hit: self.cap_hit,
            sources: self.sources,
        };

        let lines = self.run.lines();
        let severities = self.run.severities();
        let summary = Summary {
            lines,
            parse_rate: lines.parse_rate(),
            severities,
            error_rate: severities
                .error_fraction()
                .map_or(0.0, |f| round2(f * 100.0)),
            distinct_actors: self.run.distinct_actors(),
            distinct_status_codes: self.run.distinct_status_codes(),
            distinct_paths: self.run.distinct_paths(),
            time_range: self.run.time_range(),
            sources_ok: metadata.count_status(SourceStatus::Ok),
            sources_failed: metadata.count_status(SourceStatus::Failed),
            sources_skipped: metadata.count_status(SourceStatus::Skipped),
        };

        tracing::info!(
            total = lines.total,
            parsed = lines.parsed,
            anomalies = anomalies.len(),
            sources = metadata.sources.len(),
            "analysis complete"
        );

        AnalysisResult {
            summary,
            rankings: self.run.rankings(),
            timeline: self.run.timeline(),
            anomalies,
            metadata,
        }
    }
}

/// Reads `\n`-terminated lines of any length, decoding invalid UTF-8 lossily.
struct LineReader<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }

    fn next_line(&mut self) -> std::io::Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        while matches!(self.buf.last(), Some(b'\n' | b'\r')) {
            self.buf.pop();
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }

    /// Whether another line can be read. A failing reader counts as having more.
    fn has_more(&mut self) -> bool {
        self.reader.fill_buf().map_or(true, |buf| !buf.is_empty())
    }
}
