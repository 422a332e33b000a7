//! Calendar month keys and calendar-day parsing.
//!
//! Every aggregation window is a `(year, month)` pair. Membership is decided
//! on calendar fields only, never on timestamp ranges, so a transaction
//! recorded late on the last day of a month cannot leak into the next one
//! through a timezone shift.

use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

const MONTH_NAMES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// A `(year, month)` pair identifying an aggregation window.
///
/// Serialized as `YYYY-MM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> ResultEngine<Self> {
        if !(1..=9999).contains(&year) {
            return Err(EngineError::InvalidMonth(format!(
                "year out of range: {year}"
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidMonth(format!(
                "month must be in 1..=12, got {month}"
            )));
        }
        Ok(Self { year, month })
    }

    /// Builds a key from a year and a month given either as a number
    /// (`"3"`, `"03"`) or as a Spanish month name (`"marzo"`).
    pub fn from_parts(year: i32, month: &str) -> ResultEngine<Self> {
        let trimmed = month.trim();
        if let Ok(number) = trimmed.parse::<u32>() {
            return Self::new(year, number);
        }
        let lowered = trimmed.to_lowercase();
        let lowered = if lowered == "setiembre" {
            "septiembre".to_string()
        } else {
            lowered
        };
        let index = MONTH_NAMES
            .iter()
            .position(|name| *name == lowered)
            .ok_or_else(|| EngineError::InvalidMonth(format!("unknown month: {trimmed}")))?;
        Self::new(year, index as u32 + 1)
    }

    /// The month a calendar day belongs to.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// The immediately preceding calendar month (January rolls back to the
    /// previous year's December).
    #[must_use]
    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn first_day(self) -> NaiveDate {
        calendar_day(self.year, self.month, 1)
    }

    pub fn last_day(self) -> NaiveDate {
        self.next().first_day().pred_opt().unwrap_or(self.first_day())
    }

    /// Calendar-field membership test.
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Spanish month name, lowercase.
    pub fn month_name(self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }
}

// Year and month are validated on construction, so the fallback is never hit.
fn calendar_day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

impl core::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl core::str::FromStr for MonthKey {
    type Err = EngineError;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidMonth(format!("expected YYYY-MM, got {s}"));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(value: MonthKey) -> Self {
        value.to_string()
    }
}

/// Parses a calendar day from `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// A timestamp is reduced to the calendar day in its own offset, which is the
/// day the user saw when recording the expense.
pub fn parse_calendar_day(input: &str) -> ResultEngine<NaiveDate> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|_| EngineError::InvalidDate(format!("invalid date: {trimmed}")))
}
