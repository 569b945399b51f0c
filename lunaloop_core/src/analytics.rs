//! Historical analytics over the full log collection.
//!
//! Cycle history uses a narrower validity band (15..=50 days) than the live
//! prediction (15..=60): the trend chart only shows cycles that look like a
//! single complete cycle, while the prediction tolerates more irregularity.

use crate::cycle::period_start_dates;
use crate::dates::day_diff;
use crate::{AppSettings, FlowIntensity, LogEntry};
use chrono::NaiveDate;
use serde::Serialize;

/// Accepted start-to-start gaps for historical cycles
pub const MIN_HISTORY_CYCLE: i64 = 15;
pub const MAX_HISTORY_CYCLE: i64 = 50;

/// Number of cycles kept for the chart
pub const CHART_CYCLES: usize = 6;

/// Entries kept in each frequency table
pub const TOP_TAGS: usize = 3;

/// Minimum valid cycles before trends are meaningful
pub const MIN_CYCLES_FOR_TRENDS: usize = 2;

/// One historical cycle
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CycleHistoryPoint {
    /// Short month name of the cycle start
    pub month: String,
    /// Cycle length in days
    pub total: i64,
    /// Flow days logged within the cycle
    pub period: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Occurrences of a symptom or mood tag
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TagStat {
    pub name: String,
    pub count: usize,
    /// Share of all logs carrying the tag, rounded percent
    pub pct: u32,
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlowStats {
    pub light: usize,
    pub medium: usize,
    /// Heavy and Super days
    pub heavy: usize,
    /// Mean flow weight scaled to 0..=100
    pub score: f64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsData {
    pub avg_period: u32,
    pub avg_cycle: u32,
    /// Population standard deviation of valid cycle lengths, one decimal
    pub variability: f64,
    pub consistency_score: u32,
    pub cycle_status: String,
    pub chart_data: Vec<CycleHistoryPoint>,
    pub has_enough_data: bool,
    pub symptom_stats: Vec<TagStat>,
    pub mood_stats: Vec<TagStat>,
    pub flow_stats: FlowStats,
}

/// Valid historical cycles, oldest first, with flow days counted per cycle
pub fn cycle_history(logs: &[LogEntry]) -> Vec<CycleHistoryPoint> {
    let starts = period_start_dates(logs);

    starts
        .windows(2)
        .filter_map(|w| {
            let (start, next) = (w[0], w[1]);
            let total = day_diff(start, next);
            if !(MIN_HISTORY_CYCLE..=MAX_HISTORY_CYCLE).contains(&total) {
                return None;
            }

            let period = logs
                .iter()
                .filter(|l| l.is_period_day() && l.date >= start && l.date < next)
                .count();

            Some(CycleHistoryPoint {
                month: start.format("%b").to_string(),
                total,
                period,
                start_date: start,
                end_date: next,
            })
        })
        .collect()
}

/// Population standard deviation
pub fn std_deviation(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<i64>() as f64 / n;
    let variance = values
        .iter()
        .map(|&v| (v as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    variance.sqrt()
}

/// Unrounded consistency score for a set of cycle lengths
///
/// Fewer than two cycles score 100; callers check `has_enough_data`
/// separately.
pub fn consistency_score(lengths: &[i64]) -> f64 {
    if lengths.len() < MIN_CYCLES_FOR_TRENDS {
        return 100.0;
    }
    (100.0 - std_deviation(lengths) * 10.0).clamp(0.0, 100.0)
}

pub fn cycle_status(score: f64) -> &'static str {
    if score > 80.0 {
        "Regular"
    } else if score > 50.0 {
        "Variable"
    } else {
        "Irregular"
    }
}

fn percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as u32
}

/// Top tags by count; ties keep first-seen order
fn top_tags<'a>(tags: impl Iterator<Item = &'a str>, total_logs: usize) -> Vec<TagStat> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for tag in tags {
        match counts.iter_mut().find(|(name, _)| *name == tag) {
            Some((_, count)) => *count += 1,
            None => counts.push((tag, 1)),
        }
    }

    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(TOP_TAGS)
        .map(|(name, count)| TagStat {
            name: name.to_string(),
            count,
            pct: percent(count, total_logs),
        })
        .collect()
}

pub fn flow_stats(logs: &[LogEntry]) -> FlowStats {
    let mut stats = FlowStats::default();
    let mut weighted_sum = 0u32;
    let mut flow_days = 0u32;

    for flow in logs.iter().filter_map(|l| l.flow) {
        flow_days += 1;
        weighted_sum += flow.weight();
        match flow {
            FlowIntensity::Light => stats.light += 1,
            FlowIntensity::Medium => stats.medium += 1,
            FlowIntensity::Heavy | FlowIntensity::Super => stats.heavy += 1,
        }
    }

    if flow_days > 0 {
        stats.score = (f64::from(weighted_sum) / f64::from(flow_days)) / 3.0 * 100.0;
    }
    stats
}

fn rounded_mean(values: impl Iterator<Item = f64>) -> Option<u32> {
    let (sum, n) = values.fold((0.0, 0u32), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| (sum / f64::from(n)).round() as u32)
}

/// Aggregate every log into the analytics view
///
/// Averages come from valid historical cycles when any exist and fall back
/// to the declared settings otherwise.
pub fn compute_analytics(logs: &[LogEntry], settings: &AppSettings) -> AnalyticsData {
    let history = cycle_history(logs);
    let lengths: Vec<i64> = history.iter().map(|c| c.total).collect();

    let score = consistency_score(&lengths);
    let has_enough_data = history.len() >= MIN_CYCLES_FOR_TRENDS;
    let variability = if has_enough_data {
        (std_deviation(&lengths) * 10.0).round() / 10.0
    } else {
        0.0
    };

    let avg_cycle =
        rounded_mean(lengths.iter().map(|&l| l as f64)).unwrap_or(settings.cycle_length);
    let avg_period = rounded_mean(history.iter().map(|c| c.period as f64))
        .unwrap_or(settings.period_length);

    let symptom_stats = top_tags(
        logs.iter().flat_map(|l| l.symptoms.iter().map(String::as_str)),
        logs.len(),
    );
    let mood_stats = top_tags(logs.iter().filter_map(|l| l.mood.as_deref()), logs.len());

    let chart_start = history.len().saturating_sub(CHART_CYCLES);
    let chart_data = history[chart_start..].to_vec();

    tracing::debug!(
        "Analytics over {} logs: {} valid cycles, consistency {:.1}",
        logs.len(),
        history.len(),
        score
    );

    AnalyticsData {
        avg_period,
        avg_cycle,
        variability,
        consistency_score: score.round() as u32,
        cycle_status: cycle_status(score).to_string(),
        chart_data,
        has_enough_data,
        symptom_stats,
        mood_stats,
        flow_stats: flow_stats(logs),
    }
}
