//! Calendar providers.
//!
//! A calendar yields the ordered sequence of dates on which duty can be
//! scheduled. Weekends, holidays and other blackout dates are already
//! removed by the provider; the scheduler only asks for "the next eligible
//! date after D".
//!
//! # Precedence
//! For [`WorkDayCalendar`] a date is eligible iff:
//! - It is a weekday (Monday to Friday), AND
//! - It is NOT a closed day or a holiday, AND
//! - It is not after `last_date` (when set).

use std::collections::BTreeSet;
use std::fmt::Debug;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Source of eligible scheduling dates.
///
/// Implementations must be pure: the same input date always yields the
/// same answer, so a sequence can be restarted at will.
pub trait Calendar: Debug {
    /// First eligible date strictly after `date`, or `None` when exhausted.
    fn next_date_after(&self, date: NaiveDate) -> Option<NaiveDate>;

    /// Up to `count` eligible dates strictly after `start`, in order.
    fn dates_after(&self, start: NaiveDate, count: usize) -> Vec<NaiveDate> {
        std::iter::successors(self.next_date_after(start), |&d| self.next_date_after(d))
            .take(count)
            .collect()
    }
}

/// Weekday calendar with closed days and holidays removed.
///
/// Without a `last_date` the calendar never runs out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkDayCalendar {
    /// Organization-specific closed days.
    pub closed_days: BTreeSet<NaiveDate>,
    /// Public holidays.
    pub holidays: BTreeSet<NaiveDate>,
    /// Last date that may be yielded. `None` = unbounded.
    pub last_date: Option<NaiveDate>,
}

impl WorkDayCalendar {
    /// Creates a plain Monday-to-Friday calendar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a closed day.
    pub fn with_closed_day(mut self, date: NaiveDate) -> Self {
        self.closed_days.insert(date);
        self
    }

    /// Adds a public holiday.
    pub fn with_holiday(mut self, date: NaiveDate) -> Self {
        self.holidays.insert(date);
        self
    }

    /// Stops the calendar after `date`.
    pub fn until(mut self, date: NaiveDate) -> Self {
        self.last_date = Some(date);
        self
    }

    /// Whether `date` is a working day.
    pub fn is_work_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
            && !self.closed_days.contains(&date)
            && !self.holidays.contains(&date)
    }
}

impl Calendar for WorkDayCalendar {
    fn next_date_after(&self, date: NaiveDate) -> Option<NaiveDate> {
        let mut candidate = date.succ_opt()?;
        loop {
            if self.last_date.is_some_and(|last| candidate > last) {
                return None;
            }
            if self.is_work_day(candidate) {
                return Some(candidate);
            }
            candidate = candidate.succ_opt()?;
        }
    }
}

/// Explicit list of eligible dates, e.g. fetched from an external service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateListCalendar {
    dates: Vec<NaiveDate>,
}

impl DateListCalendar {
    /// Creates a calendar from dates in any order. Duplicates are dropped.
    pub fn new(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        let mut dates: Vec<NaiveDate> = dates.into_iter().collect();
        dates.sort();
        dates.dedup();
        Self { dates }
    }

    /// All dates, ascending.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }
}

impl Calendar for DateListCalendar {
    fn next_date_after(&self, date: NaiveDate) -> Option<NaiveDate> {
        let idx = self.dates.partition_point(|d| *d <= date);
        self.dates.get(idx).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_work_days_skip_weekend() {
        let cal = WorkDayCalendar::new();
        // 2017-01-06 is a Friday
        assert_eq!(cal.next_date_after(date(2017, 1, 6)), Some(date(2017, 1, 9)));
        assert_eq!(cal.next_date_after(date(2017, 1, 2)), Some(date(2017, 1, 3)));
    }

    #[test]
    fn test_work_days_skip_closed_and_holidays() {
        let cal = WorkDayCalendar::new()
            .with_holiday(date(2017, 1, 6)) // Epiphany
            .with_closed_day(date(2017, 1, 4));

        let dates = cal.dates_after(date(2017, 1, 2), 4);
        assert_eq!(
            dates,
            vec![date(2017, 1, 3), date(2017, 1, 5), date(2017, 1, 9), date(2017, 1, 10)]
        );
    }

    #[test]
    fn test_work_days_horizon() {
        let cal = WorkDayCalendar::new().until(date(2017, 1, 5));
        let dates = cal.dates_after(date(2017, 1, 2), 10);
        assert_eq!(dates.len(), 3);
        assert_eq!(cal.next_date_after(date(2017, 1, 5)), None);
    }

    #[test]
    fn test_date_list_calendar() {
        let cal = DateListCalendar::new([date(2017, 2, 1), date(2017, 1, 10), date(2017, 1, 10)]);
        assert_eq!(cal.dates().len(), 2);
        assert_eq!(cal.next_date_after(date(2017, 1, 1)), Some(date(2017, 1, 10)));
        assert_eq!(cal.next_date_after(date(2017, 1, 10)), Some(date(2017, 2, 1)));
        assert_eq!(cal.next_date_after(date(2017, 2, 1)), None);
    }

    #[test]
    fn test_dates_after_count() {
        let cal = WorkDayCalendar::new();
        assert!(cal.dates_after(date(2017, 1, 2), 0).is_empty());
        assert_eq!(cal.dates_after(date(2017, 1, 2), 10).len(), 10);
    }
}
