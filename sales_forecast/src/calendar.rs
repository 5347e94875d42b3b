//! Calendar features, holiday calendars and month keys

use crate::error::{ForecastError, Result};
use crate::utils::parse_date;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Dates flagged as holidays when no calendar is configured
pub const DEFAULT_HOLIDAYS: [&str; 5] = [
    "2025-01-01",
    "2025-01-26",
    "2025-04-14",
    "2025-05-01",
    "2025-06-15",
];

/// Set of fixed holiday dates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayCalendar {
    dates: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    /// Calendar without any holidays
    pub fn empty() -> Self {
        Self {
            dates: BTreeSet::new(),
        }
    }

    pub fn from_dates<I: IntoIterator<Item = NaiveDate>>(dates: I) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    /// Parse a calendar from date strings
    pub fn from_strings<S: AsRef<str>>(dates: &[S]) -> Result<Self> {
        let parsed = dates
            .iter()
            .map(|d| {
                parse_date(d.as_ref()).map_err(|e| {
                    ForecastError::InvalidParameter(format!(
                        "invalid holiday '{}': {}",
                        d.as_ref(),
                        e
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_dates(parsed))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl Default for HolidayCalendar {
    fn default() -> Self {
        Self::from_dates(
            DEFAULT_HOLIDAYS
                .iter()
                .filter_map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
        )
    }
}

/// Date-derived model inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarFeatures {
    /// Monday = 0 … Sunday = 6
    pub day_of_week: u32,
    pub is_weekend: bool,
    pub is_holiday: bool,
}

impl CalendarFeatures {
    pub fn for_date(date: NaiveDate, holidays: &HolidayCalendar) -> Self {
        let weekday = date.weekday();
        Self {
            day_of_week: weekday.num_days_from_monday(),
            is_weekend: matches!(weekday, Weekday::Sat | Weekday::Sun),
            is_holiday: holidays.contains(date),
        }
    }
}

/// Calendar month, formatted `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ForecastError::InvalidParameter(format!(
                "month must be in 1..=12, got {}",
                month
            )));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
