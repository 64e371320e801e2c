//! Calendar-month bucketing of a visit schedule
//!
//! Buckets are anchored on the 15th so that adding whole months never has to
//! clamp a short month.

use chrono::{Datelike, Months, NaiveDate};

use crate::visit::{earliest_visit_date, latest_visit_date, Visit};

/// Day of month every bucket is anchored on
pub const ANCHOR_DAY: u32 = 15;

/// Mid-month anchor for the month containing `date`
pub fn month_anchor(date: NaiveDate) -> NaiveDate {
    date.with_day(ANCHOR_DAY).unwrap_or(date)
}

/// True when both dates fall in the same calendar month and year
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Ordered month anchors from the first visit's month through the last
/// visit's month, inclusive. Cloning restarts the sequence.
#[derive(Debug, Clone)]
pub struct MonthAnchors {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl MonthAnchors {
    /// Anchors spanning `first` to `last` (empty when `last` precedes `first`)
    pub fn between(first: NaiveDate, last: NaiveDate) -> Self {
        let start = month_anchor(first);
        let end = month_anchor(last);
        Self {
            next: (start <= end).then_some(start),
            end,
        }
    }

    /// Anchors spanning the dated visits; empty when none are dated
    pub fn from_visits(visits: &[Visit]) -> Self {
        match (earliest_visit_date(visits), latest_visit_date(visits)) {
            (Some(first), Some(last)) => Self::between(first, last),
            _ => Self::empty(),
        }
    }

    fn empty() -> Self {
        Self {
            next: None,
            end: NaiveDate::MIN,
        }
    }
}

impl Iterator for MonthAnchors {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = current
            .checked_add_months(Months::new(1))
            .filter(|next| *next <= self.end);
        Some(current)
    }
}
