//! Reporting window - the trailing range of calendar days scores cover

use chrono::{Duration, NaiveDate};

/// Half-open range of UTC calendar days `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportingWindow {
    /// Trailing window of `days` calendar days ending on `today` inclusive.
    ///
    /// `today` is always the last day of the window; its bucket is
    /// provisional and recomputed every refresh cycle.
    #[must_use]
    pub fn trailing(today: NaiveDate, days: u32) -> Self {
        let days = i64::from(days.max(1));
        Self {
            start: today - Duration::days(days - 1),
            end: today + Duration::days(1),
        }
    }

    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day < self.end
    }

    /// Iterate every day in the window, oldest first
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        let mut next = Some(self.start);
        std::iter::from_fn(move || {
            let day = next.filter(|d| *d < end)?;
            next = day.succ_opt();
            Some(day)
        })
    }

    #[must_use]
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days().max(0)
    }
}
