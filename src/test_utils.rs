use crate::{CalendarDate, FormatPattern, Month};

pub fn date(year: i32, month: u8, day: u8) -> CalendarDate {
    CalendarDate::new(year, month, day).unwrap()
}

pub fn month(value: u8) -> Month {
    Month::new(value).unwrap()
}

pub fn pattern(source: &str) -> FormatPattern {
    source.parse().unwrap()
}

/// The `DD/MM/YYYY` pattern most tests type against.
pub fn fr() -> FormatPattern {
    pattern("DD/MM/YYYY")
}
