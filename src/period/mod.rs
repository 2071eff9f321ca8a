//! Calendar-aligned periods used as aggregation boundaries.
//!
//! A period is always a whole calendar month or a whole calendar year. The
//! "previous" period is the same window moved back by one calendar unit, so
//! February is compared with January using each month's own day count.

use std::fmt;

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::window::{first_of_month, DateWindow};
use crate::errors::{AnalyticsError, Result};
use crate::format::month_name;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Month,
    Year,
}

impl ViewMode {
    /// Spanish noun used in insight text ("este mes", "el año pasado").
    pub fn noun(&self) -> &'static str {
        match self {
            ViewMode::Month => "mes",
            ViewMode::Year => "año",
        }
    }

    /// Moves `reference` by `steps` whole months or years. The day of month is
    /// clamped when the target month is shorter.
    pub fn shift(&self, reference: NaiveDate, steps: i32) -> NaiveDate {
        let months = match self {
            ViewMode::Month => steps,
            ViewMode::Year => steps.saturating_mul(12),
        };
        shift_months(reference, months)
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViewMode::Month => "month",
            ViewMode::Year => "year",
        })
    }
}

/// Window of the month or year containing `reference`.
pub fn resolve_period(reference: NaiveDate, mode: ViewMode) -> DateWindow {
    match mode {
        ViewMode::Month => {
            let start = first_of_month(reference);
            let length = days_in_month(reference.year(), reference.month());
            DateWindow {
                start,
                end: start + Duration::days(i64::from(length) - 1),
            }
        }
        ViewMode::Year => {
            let start = reference - Duration::days(i64::from(reference.ordinal0()));
            DateWindow {
                start,
                end: start + Duration::days(days_in_year(reference.year()) - 1),
            }
        }
    }
}

/// Comparable window immediately before the one containing `reference`.
pub fn resolve_previous_period(reference: NaiveDate, mode: ViewMode) -> DateWindow {
    resolve_period(mode.shift(reference, -1), mode)
}

/// Window for `month` (1-12) of `year`.
pub fn month_window(year: i32, month: u32) -> Result<DateWindow> {
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        AnalyticsError::InvalidInput(format!("invalid month {}-{:02}", year, month))
    })?;
    Ok(resolve_period(start, ViewMode::Month))
}

/// Window for the calendar year `year`.
pub fn year_window(year: i32) -> Result<DateWindow> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| AnalyticsError::InvalidInput(format!("invalid year {}", year)))?;
    Ok(resolve_period(start, ViewMode::Year))
}

/// Header label for a period: `"marzo 2024"` or `"2024"`.
pub fn period_label(reference: NaiveDate, mode: ViewMode) -> String {
    match mode {
        ViewMode::Month => format!("{} {}", month_name(reference.month()), reference.year()),
        ViewMode::Year => reference.year().to_string(),
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ if is_leap_year(year) => 29,
        _ => 28,
    }
}

fn days_in_year(year: i32) -> i64 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let magnitude = Months::new(months.unsigned_abs());
    let shifted = if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    };
    shifted.unwrap_or(date)
}
