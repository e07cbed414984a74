//! Shared traits and calendar arithmetic for ledger entities.

use std::fmt;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exposes a stable identifier for entities held by the store.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Enumerates canonical recurrence cadences.
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Advances `from` by `interval` units of this frequency.
    ///
    /// Month and year steps are calendar-aware: the day-of-month is clamped
    /// to the length of the target month (2024-01-31 + 1 month =
    /// 2024-02-29). The time-of-day component is preserved.
    pub fn advance(self, from: DateTime<Utc>, interval: u32) -> DateTime<Utc> {
        match self {
            Frequency::Daily => from + Duration::days(interval as i64),
            Frequency::Weekly => from + Duration::weeks(interval as i64),
            Frequency::Monthly => with_date(from, shift_month(from.date_naive(), interval as i32)),
            Frequency::Yearly => with_date(from, shift_year(from.date_naive(), interval as i32)),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Yearly => "Yearly",
        };
        f.write_str(label)
    }
}

fn with_date(base: DateTime<Utc>, date: NaiveDate) -> DateTime<Utc> {
    date.and_time(base.time()).and_utc()
}

fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    let mut day = date.day();
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    day = day.min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).unwrap()
}

fn shift_year(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    let month = date.month();
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    let last_current = first_next - Duration::days(1);
    last_current.day()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn daily_and_weekly_are_fixed_duration() {
        assert_eq!(Frequency::Daily.advance(at(2024, 1, 1), 3), at(2024, 1, 4));
        assert_eq!(Frequency::Weekly.advance(at(2024, 1, 1), 2), at(2024, 1, 15));
    }

    #[test]
    fn monthly_clamps_to_month_end() {
        assert_eq!(Frequency::Monthly.advance(at(2024, 1, 31), 1), at(2024, 2, 29));
        assert_eq!(Frequency::Monthly.advance(at(2023, 1, 31), 1), at(2023, 2, 28));
        assert_eq!(Frequency::Monthly.advance(at(2024, 3, 31), 1), at(2024, 4, 30));
    }

    #[test]
    fn monthly_crosses_year_boundary() {
        assert_eq!(Frequency::Monthly.advance(at(2024, 11, 15), 3), at(2025, 2, 15));
    }

    #[test]
    fn yearly_clamps_leap_day() {
        assert_eq!(Frequency::Yearly.advance(at(2024, 2, 29), 1), at(2025, 2, 28));
    }

    #[test]
    fn advance_preserves_time_of_day() {
        let base = Utc.with_ymd_and_hms(2024, 1, 31, 9, 30, 0).unwrap();
        let next = Frequency::Monthly.advance(base, 1);
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 2, 29, 9, 30, 0).unwrap());
    }
}
