use chrono::{Datelike, Duration, NaiveDate};

use crate::models::TimePeriod;

/// Previous calendar month relative to `today`, as `[first of previous month, first of this month)`.
pub fn previous_month(today: NaiveDate) -> TimePeriod {
    let first_of_current_month = today - Duration::days(i64::from(today.day0()));
    let last_month_end = first_of_current_month - Duration::days(1);
    let last_month_start = last_month_end - Duration::days(i64::from(last_month_end.day0()));

    TimePeriod {
        start: last_month_start,
        // end is exclusive
        end: last_month_end + Duration::days(1),
    }
}

/// The whole calendar month starting at `month_start` (any day of the month is accepted).
pub fn month_of(month_start: NaiveDate) -> TimePeriod {
    let start = month_start - Duration::days(i64::from(month_start.day0()));
    // 32 days past the 1st always lands in the following month
    let next = start + Duration::days(32);
    let end = next - Duration::days(i64::from(next.day0()));

    TimePeriod { start, end }
}

/// Pick the report period: a pinned month when configured, otherwise the month before `today`.
pub fn resolve_period(today: NaiveDate, pinned_month: Option<NaiveDate>) -> TimePeriod {
    match pinned_month {
        Some(month) => month_of(month),
        None => previous_month(today),
    }
}
