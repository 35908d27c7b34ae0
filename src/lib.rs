//! Date text input core: parses free-typed text against a configurable
//! `DD/MM/YYYY`-style pattern, repairs impossible calendar dates, handles
//! single and `start - end` range input in one field, masks keystrokes
//! and validates required/format/order rules.

mod config;
mod consts;
mod field;
mod mask;
mod normalize;
mod pattern;
mod prelude;
mod range;
mod rules;
#[cfg(test)]
mod test_utils;
mod types;
mod validate;

pub use config::{ConfigError, ErrorMessages, FieldConfig};
pub use consts::*;
pub use field::{DateTextField, DateValue, FieldEvent, ModelValue};
pub use mask::{MaskedInput, apply_edit, format_date_input, paste_input};
pub use normalize::{NormalizationResult, last_day_of_month, normalize_date};
pub use pattern::{FormatPattern, PatternError, TokenGroup, TokenKind, convert, format, parse};
pub use range::{RangeProgress, RangeValue, display_text, join, split};
pub use rules::{RuleDescriptor, RuleKind};
pub use types::{Day, Month, days_in_month, is_leap_year};
pub use validate::{DateValidator, ErrorKind, ValidationMessage, ValidationOutcome, ValidationState};

use crate::prelude::*;
use std::str::FromStr;

/// A concrete calendar date in the proleptic Gregorian calendar.
/// Equality and ordering follow the (year, month, day) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", "year", "month.get()", "day.get()")]
pub struct CalendarDate {
    year: i32,
    month: Month,
    day: Day,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { year: i32, month: u8, day: u8 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

impl CalendarDate {
    /// Creates a date from loose components, validating month and day.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidMonth` or `ParseError::InvalidDay`.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, ParseError> {
        let month = Month::new(month)?;
        let day = Day::new(day, year, month)?;
        Ok(Self { year, month, day })
    }

    /// Like [`CalendarDate::new`] but discards the reason for failure.
    pub fn from_ymd_opt(year: i32, month: u8, day: u8) -> Option<Self> {
        Self::new(year, month, day).ok()
    }

    /// Builds a date from already validated parts.
    pub(crate) const fn from_parts(year: i32, month: Month, day: Day) -> Self {
        Self { year, month, day }
    }

    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Month number, 1-12
    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    /// Zero-based month index, 0-11
    pub const fn month0(&self) -> u8 {
        self.month.index()
    }

    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    pub const fn month_typed(&self) -> Month {
        self.month
    }

    /// Days since 1970-01-01 (negative before).
    pub fn day_number(&self) -> i64 {
        // Days-from-civil over 400-year eras, March-based years.
        let m = i64::from(self.month.get());
        let d = i64::from(self.day.get());
        let y = i64::from(self.year) - i64::from(m <= 2);
        let era = y.div_euclid(400);
        let yoe = y - era * 400;
        let mp = (m + 9) % 12;
        let doy = (153 * mp + 2) / 5 + d - 1;
        let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
        era * 146_097 + doe - 719_468
    }

    /// Signed number of days from `self` to `other`.
    pub fn days_until(&self, other: &Self) -> i64 {
        other.day_number() - self.day_number()
    }
}

impl FromStr for CalendarDate {
    type Err = ParseError;

    /// Parses ISO `YYYY-MM-DD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        // The year may carry a leading sign
        let parts: Vec<&str> = trimmed.rsplitn(3, '-').collect();
        let [day, month, year] = parts.as_slice() else {
            return Err(ParseError::InvalidFormat(trimmed.to_owned()));
        };

        let year = year
            .parse::<i32>()
            .map_err(|_| ParseError::InvalidFormat(trimmed.to_owned()))?;
        let month = month
            .parse::<u8>()
            .map_err(|_| ParseError::InvalidFormat(trimmed.to_owned()))?;
        let day = day
            .parse::<u8>()
            .map_err(|_| ParseError::InvalidFormat(trimmed.to_owned()))?;

        Self::new(year, month, day)
    }
}

impl serde::Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;

    #[test]
    fn test_new_validates_components() {
        assert!(CalendarDate::new(2024, 2, 29).is_ok());
        assert!(matches!(
            CalendarDate::new(2023, 2, 29),
            Err(ParseError::InvalidDay { year: 2023, month: 2, day: 29 })
        ));
        assert!(matches!(CalendarDate::new(2023, 13, 1), Err(ParseError::InvalidMonth(13))));
        assert!(CalendarDate::from_ymd_opt(2023, 0, 1).is_none());
    }

    #[test]
    fn test_accessors() {
        let d = date(1991, 8, 15);
        assert_eq!(d.year(), 1991);
        assert_eq!(d.month(), 8);
        assert_eq!(d.month0(), 7);
        assert_eq!(d.day(), 15);
    }

    #[test]
    fn test_display_iso() {
        assert_eq!(date(1991, 8, 15).to_string(), "1991-08-15");
        assert_eq!(date(7, 1, 2).to_string(), "0007-01-02");
    }

    #[test]
    fn test_from_str_iso() {
        assert_eq!("2024-02-29".parse::<CalendarDate>().unwrap(), date(2024, 2, 29));
        assert!(matches!("".parse::<CalendarDate>(), Err(ParseError::EmptyInput)));
        assert!(matches!(
            "2024/02/29".parse::<CalendarDate>(),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            "2024-02-30".parse::<CalendarDate>(),
            Err(ParseError::InvalidDay { .. })
        ));
        assert!(matches!(
            "2024-xx-01".parse::<CalendarDate>(),
            Err(ParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_ordering() {
        assert!(date(2024, 12, 31) < date(2025, 1, 1));
        assert!(date(2025, 1, 31) < date(2025, 2, 1));
        assert!(date(2025, 1, 1) < date(2025, 1, 2));
        assert_eq!(date(2025, 1, 1), date(2025, 1, 1));
    }

    #[test]
    fn test_day_number() {
        assert_eq!(date(1970, 1, 1).day_number(), 0);
        assert_eq!(date(1970, 1, 2).day_number(), 1);
        assert_eq!(date(1969, 12, 31).day_number(), -1);
        assert_eq!(date(2000, 3, 1).day_number(), 11_017);
        assert_eq!(date(2024, 2, 28).days_until(&date(2024, 3, 1)), 2);
        assert_eq!(date(2023, 2, 28).days_until(&date(2023, 3, 1)), 1);
        assert_eq!(date(2025, 1, 10).days_until(&date(2025, 1, 1)), -9);
    }

    #[test]
    fn test_serde_string_format() {
        let d = date(1991, 8, 15);
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, r#""1991-08-15""#);
        let parsed: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, d);

        let bc = date(-44, 3, 15);
        let json = serde_json::to_string(&bc).unwrap();
        assert_eq!(json, r#""-044-03-15""#);
        let parsed: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, bc);

        let result: Result<CalendarDate, _> = serde_json::from_str(r#""2024-02-30""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_str_signed_years() {
        assert_eq!("-0001-12-31".parse::<CalendarDate>(), Ok(date(-1, 12, 31)));
        assert_eq!("0000-02-29".parse::<CalendarDate>(), Ok(date(0, 2, 29)));
        assert!("2024--03-15".parse::<CalendarDate>().is_err());
        assert!("-03-15".parse::<CalendarDate>().is_err());
        assert!("2024-03-15-01".parse::<CalendarDate>().is_err());
    }
}
