//! Keystroke masking for date fields.
//!
//! Raw text from the input widget is reduced to its digits and rebuilt with
//! the pattern's separators (and the range token in range mode). The caret
//! position is recomputed from the number of digits that preceded it, so it
//! stays next to the digit the user just typed. Offsets are in `char`s.

use std::ops::Range;

use crate::{FormatPattern, RANGE_SEPARATOR};

/// Reformatted text plus where the caret belongs in it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MaskedInput {
    pub formatted: String,
    pub cursor_pos: usize,
}

struct Layout {
    text: Vec<char>,
    /// `after[k]` is the offset right after the k-th digit
    after: Vec<usize>,
    digits: usize,
    max: usize,
}

fn layout(digits: &[char], pattern: &FormatPattern, range: bool, trailing_range_token: bool) -> Layout {
    let per_date = pattern.digit_count();
    let max = if range { per_date * 2 } else { per_date };
    let offsets = pattern.separator_offsets();

    let mut text = Vec::with_capacity(max + RANGE_SEPARATOR.len() + 4);
    let mut after = Vec::with_capacity(max + 1);
    after.push(0);

    for (i, &d) in digits.iter().take(max).enumerate() {
        if i > 0 && i == per_date {
            text.extend(RANGE_SEPARATOR.chars());
        } else if offsets.contains(&(i % per_date)) && i % per_date != 0 {
            text.push(pattern.separator());
        }
        text.push(d);
        after.push(text.len());
    }

    let count = after.len() - 1;
    if range && trailing_range_token && count == per_date {
        text.extend(RANGE_SEPARATOR.chars());
    }

    Layout {
        text,
        after,
        digits: count,
        max,
    }
}

fn digits_of(chars: &[char]) -> Vec<char> {
    chars.iter().copied().filter(char::is_ascii_digit).collect()
}

/// Formats typed text, inserting separators once each token group's digits
/// are present: `("0101", 4)` becomes `("01/01", 5)` for `DD/MM/YYYY`.
///
/// Digits beyond a complete date (two in range mode) are dropped. In range
/// mode a complete start date gets the trailing range token, and a caret at
/// the end of the input follows it.
pub fn format_date_input(raw: &str, raw_cursor: usize, pattern: &FormatPattern, range: bool) -> MaskedInput {
    let chars: Vec<char> = raw.chars().collect();
    let cursor = raw_cursor.min(chars.len());
    let digits = digits_of(&chars);
    let before = digits_of(&chars[..cursor]).len();

    let layout = layout(&digits, pattern, range, true);
    let k = before.min(layout.digits);
    let cursor_pos = if k == layout.digits && k < layout.max {
        layout.text.len()
    } else {
        layout.after[k]
    };

    tracing::trace!(raw, raw_cursor, cursor_pos, "masked date input");

    MaskedInput {
        formatted: layout.text.into_iter().collect(),
        cursor_pos,
    }
}

/// Reformats after an edit of `previous` produced `raw`.
///
/// A shorter text is a deletion. The range token is only kept while the raw
/// text still holds it whole, so it can be erased, and the caret stays where
/// the user left it instead of snapping back before a separator. Anything
/// else is handled as typing.
pub fn apply_edit(
    previous: &str,
    raw: &str,
    raw_cursor: usize,
    pattern: &FormatPattern,
    range: bool,
) -> MaskedInput {
    let chars: Vec<char> = raw.chars().collect();
    if chars.len() >= previous.chars().count() {
        return format_date_input(raw, raw_cursor, pattern, range);
    }

    let cursor = raw_cursor.min(chars.len());
    let digits = digits_of(&chars);
    let before = digits_of(&chars[..cursor]).len();

    let layout = layout(&digits, pattern, range, raw.contains(RANGE_SEPARATOR));
    let mut pos = layout.after[before.min(layout.digits)];
    while pos < cursor && pos < layout.text.len() && !layout.text[pos].is_ascii_digit() {
        pos += 1;
    }

    MaskedInput {
        formatted: layout.text.into_iter().collect(),
        cursor_pos: pos,
    }
}

/// Inserts pasted text over `selection` of `current` and reformats the whole
/// field as if it had been typed, caret after the pasted content.
pub fn paste_input(
    current: &str,
    selection: Range<usize>,
    pasted: &str,
    pattern: &FormatPattern,
    range: bool,
) -> MaskedInput {
    let chars: Vec<char> = current.chars().collect();
    let start = selection.start.min(chars.len());
    let end = selection.end.clamp(start, chars.len());

    let mut combined: String = chars[..start].iter().collect();
    combined.push_str(pasted);
    let cursor = combined.chars().count();
    combined.extend(&chars[end..]);

    format_date_input(&combined, cursor, pattern, range)
}
