//! Day-granularity date arithmetic for billing cycles.

use time::{Date, Month, OffsetDateTime};

/// Adds whole calendar months, clamping the day to the target month's length
/// (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: Date, months: i32) -> Date {
    let zero_based = date.year() * 12 + (date.month() as i32 - 1) + months;
    let year = zero_based.div_euclid(12);
    let month = Month::try_from((zero_based.rem_euclid(12) + 1) as u8).expect("month in 1..=12");
    let day = date.day().min(month.length(year));
    Date::from_calendar_date(year, month, day).expect("clamped day is valid")
}

/// Whether at least one full calendar month has elapsed since `last`.
/// This is a month rollover, not a 30-day window.
pub fn month_elapsed(last: OffsetDateTime, now: OffsetDateTime) -> bool {
    now.date() >= add_months(last.date(), 1)
}

/// Whole days between two instants, at day granularity.
pub fn elapsed_days(from: OffsetDateTime, to: OffsetDateTime) -> i64 {
    (to.date() - from.date()).whole_days()
}

/// The due date of the current billing period: `due_day` of the current
/// month, clamped to the month's length.
pub fn due_date_for_period(today: Date, due_day: i32) -> Date {
    let month = today.month();
    let day = (due_day.clamp(1, 31) as u8).min(month.length(today.year()));
    Date::from_calendar_date(today.year(), month, day).expect("clamped day is valid")
}

/// Whole days past the current period's due date; zero when not overdue.
pub fn days_overdue(today: Date, due_day: i32) -> i32 {
    let due = due_date_for_period(today, due_day);
    let days = (today - due).whole_days();
    days.max(0) as i32
}

/// The next due date after the current period: `due_day` of the following
/// month, clamped.
pub fn next_due_date(today: Date, due_day: i32) -> Date {
    let next = add_months(today, 1);
    let day = (due_day.clamp(1, 31) as u8).min(next.month().length(next.year()));
    Date::from_calendar_date(next.year(), next.month(), day).expect("clamped day is valid")
}
