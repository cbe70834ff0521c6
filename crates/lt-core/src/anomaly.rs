//! Anomaly rules, run once over the final aggregate.

use crate::aggregate::Aggregator;
use crate::config::AnomalyThresholds;
use crate::result::{Anomaly, AnomalyKind, AnomalySeverity, round2};

/// Hourly buckets needed before spikes are meaningful.
const MIN_SPIKE_BUCKETS: usize = 3;

/// Evaluate every rule in order: error rate, traffic spikes, suspicious
/// actors, repeated failures.
pub fn detect(agg: &Aggregator, thresholds: &AnomalyThresholds) -> Vec<Anomaly> {
    let mut anomalies = Vec::new();
    high_error_rate(agg, thresholds, &mut anomalies);
    traffic_spikes(agg, thresholds, &mut anomalies);
    suspicious_actors(agg, thresholds, &mut anomalies);
    repeated_failures(agg, thresholds, &mut anomalies);
    tracing::debug!(count = anomalies.len(), "anomaly detection finished");
    anomalies
}

fn high_error_rate(agg: &Aggregator, t: &AnomalyThresholds, out: &mut Vec<Anomaly>) {
    let severities = agg.severities();
    let Some(fraction) = severities.error_fraction() else {
        return;
    };
    if fraction <= t.error_rate {
        return;
    }
    let percent = round2(fraction * 100.0);
    out.push(Anomaly {
        kind: AnomalyKind::HighErrorRate,
        severity: if fraction > t.error_rate * 2.5 {
            AnomalySeverity::High
        } else {
            AnomalySeverity::Medium
        },
        description: format!(
            "{percent}% of classified records are errors ({} of {})",
            severities.error,
            severities.classified()
        ),
        metric: percent,
        subject: None,
    });
}

fn traffic_spikes(agg: &Aggregator, t: &AnomalyThresholds, out: &mut Vec<Anomaly>) {
    let hourly = agg.timeline().hourly;
    if hourly.len() < MIN_SPIKE_BUCKETS {
        return;
    }
    let mean = hourly.iter().map(|b| b.count).sum::<u64>() as f64 / hourly.len() as f64;
    let limit = mean * t.spike_factor;

    for bucket in hourly.iter().filter(|b| b.count as f64 > limit) {
        let ratio = bucket.count as f64 / mean;
        out.push(Anomaly {
            kind: AnomalyKind::TrafficSpike,
            severity: if ratio > t.spike_factor * 2.0 {
                AnomalySeverity::High
            } else {
                AnomalySeverity::Medium
            },
            description: format!(
                "{} lines in hour {} ({:.1}x the hourly mean of {:.1})",
                bucket.count, bucket.label, ratio, mean
            ),
            metric: bucket.count as f64,
            subject: Some(bucket.label.clone()),
        });
    }
}

fn suspicious_actors(agg: &Aggregator, t: &AnomalyThresholds, out: &mut Vec<Anomaly>) {
    let actors = agg.actors();
    if actors.len() < 2 {
        return;
    }
    let mean = actors.total() as f64 / actors.len() as f64;
    let limit = mean * t.actor_factor;

    for (actor, count) in actors.ranked_all() {
        // Ranked descending, nothing further down can qualify.
        if count as f64 <= limit {
            break;
        }
        let ratio = count as f64 / mean;
        out.push(Anomaly {
            kind: AnomalyKind::SuspiciousActor,
            severity: if ratio > t.actor_factor * 2.0 {
                AnomalySeverity::High
            } else {
                AnomalySeverity::Medium
            },
            description: format!(
                "{actor} produced {count} records ({ratio:.1}x the per-actor mean of {mean:.1})"
            ),
            metric: count as f64,
            subject: Some(actor),
        });
    }
}

fn repeated_failures(agg: &Aggregator, t: &AnomalyThresholds, out: &mut Vec<Anomaly>) {
    for (key, count) in agg.failures().ranked_all() {
        if count < t.repeated_failure {
            break;
        }
        let server_side = key.kind == "ERROR" || key.kind.starts_with('5');
        out.push(Anomaly {
            kind: AnomalyKind::RepeatedFailure,
            severity: if server_side {
                AnomalySeverity::High
            } else {
                AnomalySeverity::Low
            },
            description: format!("{} repeated {count} times: {}", key.kind, key.subject),
            metric: count as f64,
            subject: Some(key.to_string()),
        });
    }
}
