/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// Smallest day of month
pub const MIN_DAY: u8 = 1;

/// Month number for February
pub const FEBRUARY: u8 = 2;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Month lengths in a common year, indexed by month number (slot 0 unused)
pub const DAYS_IN_MONTH: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Gregorian leap rule: every 4th year...
pub(crate) const LEAP_YEAR_CYCLE: i32 = 4;
/// ...except centuries...
pub(crate) const CENTURY_CYCLE: i32 = 100;
/// ...except every 400th year
pub(crate) const GREGORIAN_CYCLE: i32 = 400;

/// Century added to two-digit `YY` years
pub(crate) const TWO_DIGIT_YEAR_BASE: i32 = 2000;

/// Pattern used when none is configured
pub const DEFAULT_FORMAT: &str = "DD/MM/YYYY";
/// Field separator used when a pattern has no literal character
pub const DEFAULT_SEPARATOR: char = '/';
/// ISO 8601 calendar date pattern
pub const ISO_FORMAT: &str = "YYYY-MM-DD";

/// Token between the start and end date of a range field
pub const RANGE_SEPARATOR: &str = " - ";

/// Default message for an empty required field
pub const MSG_REQUIRED: &str = "La date est requise.";
/// Default message for unparseable text; `{format}` is the display pattern
pub const MSG_INVALID_FORMAT: &str = "Format de date invalide ({format})";
/// Default message for a range whose end precedes its start
pub const MSG_END_BEFORE_START: &str = "La date de fin doit être postérieure à la date de début.";
/// Default message for a range submitted without its end date
pub const MSG_END_REQUIRED: &str = "La date de fin est requise.";
/// Placeholder substituted in `MSG_INVALID_FORMAT`
pub const FORMAT_PLACEHOLDER: &str = "{format}";
