use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    CalendarDate, DEFAULT_SEPARATOR, Month,
    consts::{ISO_FORMAT, TWO_DIGIT_YEAR_BASE},
    prelude::*,
};

/// The calendar field a run of pattern letters stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TokenKind {
    #[display(fmt = "day")]
    Day,
    #[display(fmt = "month")]
    Month,
    #[display(fmt = "year")]
    Year,
}

impl TokenKind {
    const fn from_letter(c: char) -> Option<Self> {
        match c {
            'D' | 'd' => Some(Self::Day),
            'M' => Some(Self::Month),
            'Y' | 'y' => Some(Self::Year),
            _ => None,
        }
    }
}

/// One run of identical letters, e.g. `YYYY` is `{ Year, 4 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenGroup {
    pub kind: TokenKind,
    pub width: usize,
}

impl TokenGroup {
    const fn has_supported_width(&self) -> bool {
        matches!((self.kind, self.width), (TokenKind::Day | TokenKind::Month, 2) | (TokenKind::Year, 2 | 4))
    }
}

/// Error type for pattern strings that cannot describe a date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("Empty date pattern")]
    Empty,

    #[error("Unknown token '{0}' in date pattern")]
    UnknownToken(char),

    #[error("Date pattern has no {0} field")]
    MissingGroup(TokenKind),

    #[error("Date pattern has more than one {0} field")]
    DuplicateGroup(TokenKind),

    /// Fields must be joined by exactly one separator, with nothing before or after.
    #[error("Misplaced separator in date pattern: {0}")]
    MisplacedSeparator(String),

    #[error("Inconsistent separators in date pattern: expected '{expected}', found '{found}'")]
    InconsistentSeparator { expected: char, found: char },

    /// Day and month take two letters; the year takes two or four.
    #[error("Unsupported width {width} for the {kind} field of a date pattern")]
    UnsupportedWidth { kind: TokenKind, width: usize },
}

/// An ordered day/month/year layout joined by a single literal separator.
///
/// The separator is the first non-letter character of the source string.
/// A pattern made only of letters (`DDMMYYYY`) uses [`DEFAULT_SEPARATOR`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormatPattern {
    source: String,
    groups: [TokenGroup; 3],
    separator: char,
}

/// Field values read from text before any calendar check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawFields {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl FormatPattern {
    /// Compiles a pattern string.
    ///
    /// # Errors
    /// Returns `PatternError` when the day, month and year groups are not
    /// each present exactly once, or separators are misplaced.
    pub fn new(source: &str) -> Result<Self, PatternError> {
        if source.is_empty() {
            return Err(PatternError::Empty);
        }

        let mut groups: Vec<TokenGroup> = Vec::with_capacity(3);
        let mut separator: Option<char> = None;
        // Literal seen since the last group
        let mut pending_literal = false;

        for c in source.chars() {
            if let Some(kind) = TokenKind::from_letter(c) {
                match groups.last_mut() {
                    Some(last) if last.kind == kind && !pending_literal => last.width += 1,
                    _ => {
                        if groups.iter().any(|g| g.kind == kind) {
                            return Err(PatternError::DuplicateGroup(kind));
                        }
                        if !groups.is_empty() && !pending_literal && separator.is_some() {
                            return Err(PatternError::MisplacedSeparator(source.to_owned()));
                        }
                        groups.push(TokenGroup { kind, width: 1 });
                    }
                }
                pending_literal = false;
            } else if c.is_alphabetic() {
                return Err(PatternError::UnknownToken(c));
            } else {
                if groups.is_empty() || pending_literal {
                    return Err(PatternError::MisplacedSeparator(source.to_owned()));
                }
                match separator {
                    Some(expected) if expected != c => {
                        return Err(PatternError::InconsistentSeparator { expected, found: c });
                    }
                    Some(_) => {}
                    None => {
                        // Letters-only prefix followed by a separator mixes both styles
                        if groups.len() > 1 {
                            return Err(PatternError::MisplacedSeparator(source.to_owned()));
                        }
                        separator = Some(c);
                    }
                }
                pending_literal = true;
            }
        }

        if pending_literal {
            return Err(PatternError::MisplacedSeparator(source.to_owned()));
        }

        for kind in [TokenKind::Day, TokenKind::Month, TokenKind::Year] {
            if !groups.iter().any(|g| g.kind == kind) {
                return Err(PatternError::MissingGroup(kind));
            }
        }

        if let Some(group) = groups.iter().find(|g| !g.has_supported_width()) {
            return Err(PatternError::UnsupportedWidth { kind: group.kind, width: group.width });
        }

        let [first, second, third] = groups.as_slice() else {
            return Err(PatternError::MisplacedSeparator(source.to_owned()));
        };

        Ok(Self {
            source: source.to_owned(),
            groups: [*first, *second, *third],
            separator: separator.unwrap_or(DEFAULT_SEPARATOR),
        })
    }

    /// The ISO `YYYY-MM-DD` pattern.
    pub fn iso() -> Self {
        Self {
            source: ISO_FORMAT.to_owned(),
            groups: [
                TokenGroup { kind: TokenKind::Year, width: 4 },
                TokenGroup { kind: TokenKind::Month, width: 2 },
                TokenGroup { kind: TokenKind::Day, width: 2 },
            ],
            separator: '-',
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub const fn separator(&self) -> char {
        self.separator
    }

    pub const fn groups(&self) -> &[TokenGroup; 3] {
        &self.groups
    }

    /// Number of digits a complete date holds.
    pub fn digit_count(&self) -> usize {
        self.groups.iter().map(|g| g.width).sum()
    }

    /// Length of a complete date in text (digits plus two separators).
    pub fn text_len(&self) -> usize {
        self.digit_count() + 2
    }

    /// Digit offsets after which a separator is written: `[2, 4]` for `DD/MM/YYYY`.
    pub const fn separator_offsets(&self) -> [usize; 2] {
        let first = self.groups[0].width;
        [first, first + self.groups[1].width]
    }

    /// Reads the three fields positionally. Every segment must be exactly
    /// as wide as its token group and made only of ASCII digits.
    pub(crate) fn fields(&self, text: &str) -> Option<RawFields> {
        let segments: Vec<&str> = text.trim().split(self.separator).collect();
        if segments.len() != self.groups.len() {
            return None;
        }

        let mut raw = RawFields { year: 0, month: 0, day: 0 };
        for (segment, group) in segments.iter().zip(self.groups.iter()) {
            if segment.len() != group.width || !segment.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let value: u32 = segment.parse().ok()?;
            match group.kind {
                TokenKind::Day => raw.day = value,
                TokenKind::Month => raw.month = value,
                TokenKind::Year => {
                    let year = i32::try_from(value).ok()?;
                    raw.year = if group.width == 2 { TWO_DIGIT_YEAR_BASE + year } else { year };
                }
            }
        }
        Some(raw)
    }

    /// Strict parse; `None` unless the text is a real calendar date in this layout.
    pub fn parse(&self, text: &str) -> Option<CalendarDate> {
        let raw = self.fields(text)?;
        let month = u8::try_from(raw.month).ok()?;
        let day = u8::try_from(raw.day).ok()?;
        CalendarDate::from_ymd_opt(raw.year, month, day)
    }

    /// Writes the date zero-padded to each group's width.
    pub fn format(&self, date: &CalendarDate) -> String {
        let mut out = String::with_capacity(self.text_len());
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                out.push(self.separator);
            }
            let width = group.width;
            let field = match group.kind {
                TokenKind::Day => format!("{:0width$}", date.day()),
                TokenKind::Month => format!("{:0width$}", date.month()),
                TokenKind::Year if width == 2 => format!("{:02}", date.year().rem_euclid(100)),
                TokenKind::Year => format!("{:0width$}", date.year()),
            };
            out.push_str(&field);
        }
        out
    }

    /// The month field, when it names a real month.
    pub(crate) fn month_of(&self, raw: RawFields) -> Option<Month> {
        u8::try_from(raw.month).ok().and_then(|m| Month::new(m).ok())
    }
}

impl fmt::Display for FormatPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for FormatPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Default for FormatPattern {
    fn default() -> Self {
        Self {
            source: crate::DEFAULT_FORMAT.to_owned(),
            groups: [
                TokenGroup { kind: TokenKind::Day, width: 2 },
                TokenGroup { kind: TokenKind::Month, width: 2 },
                TokenGroup { kind: TokenKind::Year, width: 4 },
            ],
            separator: DEFAULT_SEPARATOR,
        }
    }
}

impl Serialize for FormatPattern {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for FormatPattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parses `text` against `pattern`.
pub fn parse(text: &str, pattern: &FormatPattern) -> Option<CalendarDate> {
    pattern.parse(text)
}

/// Formats `date` with `pattern`; an absent date formats as `""`.
pub fn format(date: Option<&CalendarDate>, pattern: &FormatPattern) -> String {
    date.map(|d| pattern.format(d)).unwrap_or_default()
}

/// Re-expresses display text in the return format.
pub fn convert(text: &str, display: &FormatPattern, ret: &FormatPattern) -> Option<String> {
    display.parse(text).map(|d| ret.format(&d))
}
