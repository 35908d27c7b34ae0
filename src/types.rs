use crate::ParseError;
use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE, LEAP_YEAR_CYCLE,
    MAX_MONTH, MIN_DAY,
};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU8;

/// Calendar month, 1 (January) through 12 (December).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(NonZeroU8);

impl Month {
    /// # Errors
    /// Returns `ParseError::InvalidMonth` outside `1..=12`.
    pub fn new(value: u8) -> Result<Self, ParseError> {
        NonZeroU8::new(value)
            .filter(|m| m.get() <= MAX_MONTH)
            .map(Self)
            .ok_or(ParseError::InvalidMonth(value))
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// Zero-based position in the year, as calendar widgets count months.
    #[inline]
    pub const fn index(self) -> u8 {
        self.0.get() - 1
    }
}

impl TryFrom<u8> for Month {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.get()
    }
}

/// Day of month. [`Day::new`] checks it against the month's length; the
/// serde and `TryFrom` paths have no month to check against and only reject 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
#[serde(try_from = "u8", into = "u8")]
pub struct Day(NonZeroU8);

impl Day {
    /// # Errors
    /// Returns `ParseError::InvalidDay` when `value` is 0 or past the last
    /// day of `month` in `year`.
    pub fn new(value: u8, year: i32, month: Month) -> Result<Self, ParseError> {
        NonZeroU8::new(value)
            .filter(|d| d.get() <= days_in_month(year, month))
            .map(Self)
            .ok_or(ParseError::InvalidDay { year, month: month.get(), day: value })
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Day {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        NonZeroU8::new(value)
            .filter(|d| d.get() >= MIN_DAY)
            .map(Self)
            .ok_or(ParseError::InvalidDay { year: 0, month: 0, day: value })
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.get()
    }
}

pub const fn is_leap_year(year: i32) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: i32, month: Month) -> u8 {
    let m = month.get();
    if m == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[m as usize]
    }
}
