use crate::{CalendarDate, Day, FormatPattern, Month, days_in_month};

/// Outcome of [`normalize_date`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NormalizationResult {
    pub normalized_date: Option<CalendarDate>,
    pub was_normalized: bool,
}

impl NormalizationResult {
    const fn unchanged(date: Option<CalendarDate>) -> Self {
        Self {
            normalized_date: date,
            was_normalized: false,
        }
    }
}

/// Last valid day of the given month, leap years included.
pub const fn last_day_of_month(year: i32, month: Month) -> u8 {
    days_in_month(year, month)
}

/// Recovers a calendar date from text whose day exceeds the month length,
/// clamping it to the month's last day (`31/02/2024` becomes `29/02/2024`).
///
/// Only day overflow is repaired. Missing or non-numeric segments, wrong
/// segment widths, day 0 and months outside 1-12 all yield no date.
pub fn normalize_date(text: &str, pattern: &FormatPattern) -> NormalizationResult {
    if let Some(parsed) = pattern.parse(text) {
        return NormalizationResult::unchanged(Some(parsed));
    }

    let Some(raw) = pattern.fields(text) else {
        return NormalizationResult::unchanged(None);
    };
    let Some(month) = pattern.month_of(raw) else {
        return NormalizationResult::unchanged(None);
    };
    if raw.day == 0 {
        return NormalizationResult::unchanged(None);
    }

    let last = last_day_of_month(raw.year, month);
    let clamped = u8::try_from(raw.day).map_or(last, |d| d.min(last));

    let Ok(day) = Day::new(clamped, raw.year, month) else {
        return NormalizationResult::unchanged(None);
    };
    let date = CalendarDate::from_parts(raw.year, month, day);
    let was_normalized = u32::from(date.day()) != raw.day
        || u32::from(date.month()) != raw.month
        || date.year() != raw.year;

    if was_normalized {
        tracing::debug!(
            "Normalized {text:?} to {} (day {} exceeds {} days)",
            pattern.format(&date),
            raw.day,
            last
        );
    }

    NormalizationResult {
        normalized_date: Some(date),
        was_normalized,
    }
}
