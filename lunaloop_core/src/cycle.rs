//! Cycle inference: period starts, effective cycle length, phase and
//! next-period prediction.
//!
//! Phases use a fixed 14-day luteal anchor:
//! - ovulation day = cycle length - 14
//! - fertile window = the 5 days before ovulation plus ovulation day
//!
//! Cycle-length averaging drops gaps outside 15..=60 days so that missed
//! logging does not stretch the estimate.

use crate::dates::{add_days, day_diff, month_day};
use crate::{AppSettings, CycleData, CyclePhase, LogEntry};
use chrono::NaiveDate;

/// Days of the post-ovulation phase
pub const LUTEAL_PHASE_DAYS: i64 = 14;

/// Days before ovulation that belong to the fertile window
pub const FERTILE_DAYS_BEFORE_OVULATION: i64 = 5;

/// A flow day more than this many days after the previous one starts a new period
pub const NEW_PERIOD_GAP_DAYS: i64 = 7;

/// Accepted start-to-start gaps for the live prediction
pub const MIN_PREDICTION_CYCLE: i64 = 15;
pub const MAX_PREDICTION_CYCLE: i64 = 60;

/// Dates that begin a period, ascending
///
/// The first flow day is a start; after that a flow day starts a new period
/// when more than [`NEW_PERIOD_GAP_DAYS`] have passed since the previous
/// flow day.
pub fn period_start_dates(logs: &[LogEntry]) -> Vec<NaiveDate> {
    let mut flow_days: Vec<NaiveDate> = logs
        .iter()
        .filter(|l| l.is_period_day())
        .map(|l| l.date)
        .collect();
    flow_days.sort();

    let mut starts = Vec::new();
    let mut last_flow_day: Option<NaiveDate> = None;
    for day in flow_days {
        match last_flow_day {
            None => starts.push(day),
            Some(last) if day_diff(last, day) > NEW_PERIOD_GAP_DAYS => starts.push(day),
            Some(_) => {}
        }
        last_flow_day = Some(day);
    }
    starts
}

/// Rounded mean of plausible start-to-start gaps, or the declared length
pub fn effective_cycle_length(starts: &[NaiveDate], settings: &AppSettings) -> i64 {
    let valid: Vec<i64> = starts
        .windows(2)
        .rev()
        .map(|w| day_diff(w[0], w[1]))
        .filter(|diff| (MIN_PREDICTION_CYCLE..=MAX_PREDICTION_CYCLE).contains(diff))
        .collect();

    if valid.is_empty() {
        return i64::from(settings.cycle_length);
    }

    let total: i64 = valid.iter().sum();
    (total as f64 / valid.len() as f64).round() as i64
}

/// Classify a cycle day
///
/// Days past the cycle length are not wrapped: until a new period is
/// logged the user stays in the luteal phase and the prediction reports
/// the period as late.
pub fn phase_for_day(day: i64, cycle_length: i64, period_length: i64) -> CyclePhase {
    let day = day.max(1);
    let ovulation_day = cycle_length - LUTEAL_PHASE_DAYS;
    let fertile_window_start = ovulation_day - FERTILE_DAYS_BEFORE_OVULATION;

    if day <= period_length {
        CyclePhase::Menstrual
    } else if (fertile_window_start..=ovulation_day).contains(&day) {
        CyclePhase::Ovulation
    } else if day > ovulation_day {
        CyclePhase::Luteal
    } else {
        CyclePhase::Follicular
    }
}

/// Human-readable prediction for the given number of days until the next period
pub fn prediction_text(days_until_next: i64, next_period_date: NaiveDate) -> String {
    match days_until_next {
        d if d < 0 => format!("Late by {} days", d.abs()),
        0 => "Expected Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => month_day(next_period_date),
    }
}

/// Current cycle day, phase and next-period prediction as of `today`
///
/// With no period logged yet, the last start is assumed to be one declared
/// cycle length ago so first use still yields a plausible answer.
pub fn calculate_cycle_data(
    logs: &[LogEntry],
    settings: &AppSettings,
    today: NaiveDate,
) -> CycleData {
    let starts = period_start_dates(logs);
    let cycle_length = effective_cycle_length(&starts, settings);

    let last_period_start = starts
        .last()
        .copied()
        .unwrap_or_else(|| add_days(today, -i64::from(settings.cycle_length)));

    let days_since_start = day_diff(last_period_start, today);
    let current_day = days_since_start + 1;
    let next_period_date = add_days(last_period_start, cycle_length);
    let days_until_next = cycle_length - days_since_start;

    let phase = phase_for_day(current_day, cycle_length, i64::from(settings.period_length));

    tracing::debug!(
        "Cycle day {} of {} ({}), {} days until next period",
        current_day,
        cycle_length,
        phase,
        days_until_next
    );

    CycleData {
        current_day: current_day.max(1),
        total_cycle_length: cycle_length,
        phase,
        prediction: prediction_text(days_until_next, next_period_date),
        next_period_date,
        last_period_start,
        days_until_next,
    }
}
