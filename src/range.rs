use serde::{Deserialize, Serialize};

use crate::RANGE_SEPARATOR;

/// What a field holds: one date, or a start/end pair whose end is `None`
/// while the user is still typing it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeValue<T> {
    Single(Option<T>),
    Pair { start: T, end: Option<T> },
}

/// Which boundaries of a range have been entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeProgress {
    Empty,
    StartOnly,
    Complete,
}

impl<T> RangeValue<T> {
    pub const fn empty() -> Self {
        Self::Single(None)
    }

    pub const fn start(&self) -> Option<&T> {
        match self {
            Self::Single(value) => value.as_ref(),
            Self::Pair { start, .. } => Some(start),
        }
    }

    /// End boundary; always `None` for a single value.
    pub const fn end(&self) -> Option<&T> {
        match self {
            Self::Single(_) => None,
            Self::Pair { end, .. } => end.as_ref(),
        }
    }

    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Single(None))
    }

    pub const fn progress(&self) -> RangeProgress {
        match self {
            Self::Single(None) => RangeProgress::Empty,
            Self::Single(Some(_)) | Self::Pair { end: None, .. } => RangeProgress::StartOnly,
            Self::Pair { end: Some(_), .. } => RangeProgress::Complete,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> RangeValue<U> {
        match self {
            Self::Single(value) => RangeValue::Single(value.map(f)),
            Self::Pair { start, end } => RangeValue::Pair {
                start: f(start),
                end: end.map(f),
            },
        }
    }

    /// Maps every present boundary, failing as a whole if any mapping fails.
    pub fn try_map<U>(self, mut f: impl FnMut(T) -> Option<U>) -> Option<RangeValue<U>> {
        Some(match self {
            Self::Single(value) => RangeValue::Single(match value {
                Some(v) => Some(f(v)?),
                None => None,
            }),
            Self::Pair { start, end } => RangeValue::Pair {
                start: f(start)?,
                end: match end {
                    Some(v) => Some(f(v)?),
                    None => None,
                },
            },
        })
    }

    pub const fn as_ref(&self) -> RangeValue<&T> {
        match self {
            Self::Single(value) => RangeValue::Single(value.as_ref()),
            Self::Pair { start, end } => RangeValue::Pair {
                start,
                end: end.as_ref(),
            },
        }
    }

    /// Present boundaries in start, end order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.start().into_iter().chain(self.end())
    }
}

impl<T: Ord> RangeValue<T> {
    /// A complete pair whose end precedes its start.
    pub fn is_misordered(&self) -> bool {
        matches!(self, Self::Pair { start, end: Some(end) } if end < start)
    }
}

impl RangeValue<String> {
    /// Reads field text as one value, or as a pair when `range` is set.
    pub fn from_text(text: &str, range: bool) -> Self {
        if text.trim().is_empty() {
            return Self::empty();
        }
        if !range {
            return Self::Single(Some(text.to_owned()));
        }
        let (start, end) = split(text);
        Self::Pair {
            start: start.to_owned(),
            end: end.map(str::to_owned),
        }
    }
}

/// Splits range text on the first [`RANGE_SEPARATOR`]. A missing or empty
/// end yields `None`, so `"01/01/2025 - "` is a start still awaiting its end.
pub fn split(text: &str) -> (&str, Option<&str>) {
    if let Some((start, end)) = text.split_once(RANGE_SEPARATOR) {
        return (start, Some(end).filter(|e| !e.is_empty()));
    }
    // Trailing space erased by a backspace
    if let Some(start) = text.strip_suffix(RANGE_SEPARATOR.trim_end()) {
        return (start, None);
    }
    (text, None)
}

/// Joins boundaries; without an end the separator is kept so the user sees
/// where to continue typing.
pub fn join(start: &str, end: Option<&str>) -> String {
    match end {
        Some(end) if !end.is_empty() => format!("{start}{RANGE_SEPARATOR}{end}"),
        _ => format!("{start}{RANGE_SEPARATOR}"),
    }
}

/// Text shown for a value: `"s - e"`, `"s - "`, a lone date, or `""`.
pub fn display_text(value: &RangeValue<String>) -> String {
    match value {
        RangeValue::Single(None) => String::new(),
        RangeValue::Single(Some(text)) => text.clone(),
        RangeValue::Pair { start, end } => join(start, end.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;

    #[test]
    fn test_split() {
        assert_eq!(split("01/01/2025 - 10/01/2025"), ("01/01/2025", Some("10/01/2025")));
        assert_eq!(split("01/01/2025 - "), ("01/01/2025", None));
        assert_eq!(split("01/01/2025 -"), ("01/01/2025", None));
        assert_eq!(split("01/01/2025"), ("01/01/2025", None));
        assert_eq!(split(""), ("", None));
    }

    #[test]
    fn test_split_uses_first_separator() {
        assert_eq!(split("a - b - c"), ("a", Some("b - c")));
    }

    #[test]
    fn test_join() {
        assert_eq!(join("01/01/2025", Some("10/01/2025")), "01/01/2025 - 10/01/2025");
        assert_eq!(join("01/01/2025", None), "01/01/2025 - ");
        assert_eq!(join("01/01/2025", Some("")), "01/01/2025 - ");
    }

    #[test]
    fn test_split_inverts_join() {
        let cases = [
            ("01/01/2025", Some("10/01/2025")),
            ("01/01/2025", None),
            ("0", Some("1")),
            ("12/", None),
        ];
        for (start, end) in cases {
            assert_eq!(split(&join(start, end)), (start, end));
        }
    }

    #[test]
    fn test_display_text() {
        assert_eq!(display_text(&RangeValue::empty()), "");
        assert_eq!(display_text(&RangeValue::Single(Some("01/01/2025".to_owned()))), "01/01/2025");
        assert_eq!(
            display_text(&RangeValue::Pair {
                start: "01/01/2025".to_owned(),
                end: None,
            }),
            "01/01/2025 - "
        );
        assert_eq!(
            display_text(&RangeValue::Pair {
                start: "01/01/2025".to_owned(),
                end: Some("02/01/2025".to_owned()),
            }),
            "01/01/2025 - 02/01/2025"
        );
    }

    #[test]
    fn test_from_text() {
        assert_eq!(RangeValue::from_text("  ", true), RangeValue::empty());
        assert_eq!(
            RangeValue::from_text("01/01/2025", false),
            RangeValue::Single(Some("01/01/2025".to_owned()))
        );
        assert_eq!(
            RangeValue::from_text("01/01/2025 - ", true),
            RangeValue::Pair {
                start: "01/01/2025".to_owned(),
                end: None,
            }
        );
    }

    #[test]
    fn test_progress() {
        assert_eq!(RangeValue::<u8>::empty().progress(), RangeProgress::Empty);
        assert_eq!(RangeValue::Single(Some(1)).progress(), RangeProgress::StartOnly);
        assert_eq!(RangeValue::Pair { start: 1, end: None }.progress(), RangeProgress::StartOnly);
        assert_eq!(RangeValue::Pair { start: 1, end: Some(2) }.progress(), RangeProgress::Complete);
    }

    #[test]
    fn test_misordered() {
        let ordered = RangeValue::Pair {
            start: date(2025, 1, 1),
            end: Some(date(2025, 1, 10)),
        };
        let reversed = RangeValue::Pair {
            start: date(2025, 1, 10),
            end: Some(date(2025, 1, 1)),
        };
        let same = RangeValue::Pair {
            start: date(2025, 1, 1),
            end: Some(date(2025, 1, 1)),
        };
        let open = RangeValue::Pair {
            start: date(2025, 1, 10),
            end: None,
        };
        assert!(!ordered.is_misordered());
        assert!(reversed.is_misordered());
        assert!(!same.is_misordered());
        assert!(!open.is_misordered());
    }

    #[test]
    fn test_try_map() {
        let value = RangeValue::Pair {
            start: "1",
            end: Some("x"),
        };
        assert_eq!(value.clone().try_map(|s| s.parse::<u8>().ok()), None);
        assert_eq!(
            value.map(str::len),
            RangeValue::Pair {
                start: 1,
                end: Some(1),
            }
        );
        let iter: Vec<_> = RangeValue::Pair { start: 1, end: Some(2) }.iter().copied().collect();
        assert_eq!(iter, vec![1, 2]);
    }

    #[test]
    fn test_serde() {
        let value = RangeValue::Pair {
            start: date(2025, 1, 1),
            end: None,
        };
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"Pair":{"start":"2025-01-01","end":null}}"#);
        let parsed: RangeValue<crate::CalendarDate> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, value);
    }
}
