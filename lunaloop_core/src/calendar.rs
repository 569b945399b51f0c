//! Forward calendar projections of period and ovulation days.

use crate::cycle::LUTEAL_PHASE_DAYS;
use crate::dates::add_days;
use crate::{CalendarProjection, CycleData, ProjectionKind};

/// Default number of cycles projected ahead
pub const DEFAULT_MONTHS_AHEAD: u32 = 3;

/// Project `months_ahead` cycles starting at the predicted next period
///
/// Each cycle contributes `period_length` period days followed by one
/// ovulation day at `start + (cycle length - 14)`. The output is neither
/// sorted nor deduplicated beyond that per-cycle order.
pub fn calendar_projections(
    cycle: &CycleData,
    period_length: u32,
    months_ahead: u32,
) -> Vec<CalendarProjection> {
    let cycle_length = cycle.total_cycle_length;
    let mut projections = Vec::with_capacity(months_ahead as usize * (period_length as usize + 1));
    let mut start = cycle.next_period_date;

    for _ in 0..months_ahead {
        for offset in 0..i64::from(period_length) {
            projections.push(CalendarProjection {
                date: add_days(start, offset),
                kind: ProjectionKind::Period,
            });
        }

        projections.push(CalendarProjection {
            date: add_days(start, cycle_length - LUTEAL_PHASE_DAYS),
            kind: ProjectionKind::Ovulation,
        });

        start = add_days(start, cycle_length);
    }

    projections
}
