//! Forecast horizons and the future window they select

use crate::calendar::MonthKey;
use crate::error::{ForecastError, Result};
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of months to forecast; the dashboard offers 1, 3 or 6
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ForecastHorizon {
    OneMonth,
    ThreeMonths,
    SixMonths,
}

impl ForecastHorizon {
    pub const ALL: [ForecastHorizon; 3] = [
        ForecastHorizon::OneMonth,
        ForecastHorizon::ThreeMonths,
        ForecastHorizon::SixMonths,
    ];

    pub fn months(self) -> u32 {
        match self {
            ForecastHorizon::OneMonth => 1,
            ForecastHorizon::ThreeMonths => 3,
            ForecastHorizon::SixMonths => 6,
        }
    }
}

impl Default for ForecastHorizon {
    fn default() -> Self {
        ForecastHorizon::OneMonth
    }
}

impl TryFrom<u32> for ForecastHorizon {
    type Error = ForecastError;

    fn try_from(months: u32) -> Result<Self> {
        match months {
            1 => Ok(ForecastHorizon::OneMonth),
            3 => Ok(ForecastHorizon::ThreeMonths),
            6 => Ok(ForecastHorizon::SixMonths),
            other => Err(ForecastError::InvalidParameter(format!(
                "forecast horizon must be 1, 3 or 6 months, got {}",
                other
            ))),
        }
    }
}

impl From<ForecastHorizon> for u32 {
    fn from(horizon: ForecastHorizon) -> Self {
        horizon.months()
    }
}

impl FromStr for ForecastHorizon {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        let months: u32 = s.trim().parse().map_err(|_| {
            ForecastError::InvalidParameter(format!("forecast horizon '{}' is not a number", s))
        })?;
        Self::try_from(months)
    }
}

impl fmt::Display for ForecastHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.months() {
            1 => write!(f, "1 month"),
            n => write!(f, "{} months", n),
        }
    }
}

/// Inclusive range of future days covered by a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl ForecastWindow {
    /// Window of `horizon` full months starting on the 1st of the month after `latest`
    pub fn after(latest: NaiveDate, horizon: ForecastHorizon) -> Result<Self> {
        let overflow = || ForecastError::DataError(format!("date {} is out of range", latest));

        let start = latest
            .with_day(1)
            .and_then(|d| d.checked_add_months(Months::new(1)))
            .ok_or_else(overflow)?;
        let end = start
            .checked_add_months(Months::new(horizon.months()))
            .and_then(|d| d.checked_sub_days(Days::new(1)))
            .ok_or_else(overflow)?;

        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Every day in the window, in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    pub fn num_days(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    /// Calendar months touched by the window
    pub fn months(&self) -> Vec<MonthKey> {
        let mut months: Vec<MonthKey> = self.days().map(MonthKey::of).collect();
        months.dedup();
        months
    }
}

/// Actual sales are compared over rows dated strictly after this day
pub fn lookback_cutoff(latest: NaiveDate, horizon: ForecastHorizon) -> Result<NaiveDate> {
    latest
        .checked_sub_months(Months::new(horizon.months()))
        .ok_or_else(|| ForecastError::DataError(format!("date {} is out of range", latest)))
}
