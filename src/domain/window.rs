use std::fmt;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{AnalyticsError, Result};

/// Calendar-date range, inclusive of both bounds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "RawWindow")]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(AnalyticsError::InvalidInput(format!(
                "window end {} precedes start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Every calendar day in the window, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |day| *day <= self.end)
    }

    /// First day of every calendar month the window touches, in order.
    pub fn month_starts(&self) -> Vec<NaiveDate> {
        let mut months = Vec::new();
        let mut cursor = first_of_month(self.start);
        while cursor <= self.end {
            months.push(cursor);
            match cursor.checked_add_months(Months::new(1)) {
                Some(next) => cursor = next,
                None => break,
            }
        }
        months
    }
}

/// Unchecked wire form; deserialization goes through [`DateWindow::new`].
#[derive(Deserialize)]
struct RawWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawWindow> for DateWindow {
    type Error = AnalyticsError;

    fn try_from(raw: RawWindow) -> Result<Self> {
        DateWindow::new(raw.start, raw.end)
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

pub(crate) fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(i64::from(date.day0()))
}
