use crate::core::clock::TimePolicy;
use chrono::{DateTime, FixedOffset, NaiveTime};

/// Minutes past the scheduled end, measured on the calendar day of `end`
/// in the organizational offset. Never negative; 0 without a schedule.
pub fn overtime_at_end(
    end: DateTime<FixedOffset>,
    scheduled_end: Option<NaiveTime>,
    policy: &TimePolicy,
) -> i64 {
    let Some(sched) = scheduled_end else {
        return 0;
    };

    let local_end = end.with_timezone(&policy.offset());
    let scheduled_instant = policy.at(local_end.date_naive(), sched);

    (end - scheduled_instant).num_minutes().max(0)
}

/// Actual duration minus scheduled duration, in minutes, floored at 0.
pub fn overtime_by_duration(
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    scheduled_start: NaiveTime,
    scheduled_end: NaiveTime,
) -> i64 {
    let actual = (end - start).num_minutes();
    let expected = (scheduled_end - scheduled_start).num_minutes();

    (actual - expected).max(0)
}
