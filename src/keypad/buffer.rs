//! Keystroke-level edits of an amount buffer.
//!
//! An amount buffer is the decimal string the user sees while typing, e.g. `"0"`, `"12."` or
//! `"1204.5"`. The functions here are pure: each takes the current buffer and returns the next
//! one. A keystroke that would break a buffer constraint returns the buffer unchanged.

use crate::model::group_thousands;
use tracing::trace;

/// The most digits the integer part of a buffer may hold.
pub const MAX_INTEGER_DIGITS: usize = 9;

/// The most digits allowed after the decimal point.
pub const MAX_FRACTION_DIGITS: usize = 2;

const POINT: char = '.';

/// Appends `digit` to the active side of `buffer`.
///
/// Digits go to the fractional side once a decimal point is present, otherwise to the integer
/// side. A digit typed onto a bare `"0"` replaces it.
///
/// ```
/// # use daybook::keypad::append_digit;
/// assert_eq!(append_digit("0", '5'), "5");
/// assert_eq!(append_digit("12.3", '4'), "12.34");
/// assert_eq!(append_digit("12.34", '5'), "12.34");
/// assert_eq!(append_digit("123456789", '0'), "123456789");
/// ```
pub fn append_digit(buffer: &str, digit: char) -> String {
    if !digit.is_ascii_digit() {
        trace!("Ignoring non-digit '{digit}'");
        return buffer.to_string();
    }

    if let Some((_, fraction)) = buffer.split_once(POINT) {
        if fraction.len() >= MAX_FRACTION_DIGITS {
            trace!("Fraction of '{buffer}' is full");
            return buffer.to_string();
        }
        return format!("{buffer}{digit}");
    }

    let (sign, integer) = split_sign(buffer);
    let integer = strip_leading_zeros(integer);
    let next = if integer.is_empty() || integer == "0" {
        digit.to_string()
    } else {
        format!("{integer}{digit}")
    };

    if next.len() > MAX_INTEGER_DIGITS {
        trace!("Integer part of '{buffer}' is at the {MAX_INTEGER_DIGITS} digit cap");
        return buffer.to_string();
    }
    format!("{sign}{next}")
}

/// Appends a decimal point unless `buffer` already has one.
///
/// An empty buffer becomes `"0."` so the integer part is never empty.
pub fn append_decimal_point(buffer: &str) -> String {
    if buffer.contains(POINT) {
        return buffer.to_string();
    }
    if buffer.is_empty() {
        return format!("0{POINT}");
    }
    format!("{buffer}{POINT}")
}

/// Removes the last character of `buffer`.
///
/// A buffer with one character or less collapses to `""` when `allow_empty` is set, otherwise
/// to `"0"`. A decimal point left at the end is removed along with the deleted character, and
/// leading zeros are stripped again.
///
/// ```
/// # use daybook::keypad::delete_last_char;
/// assert_eq!(delete_last_char("12.5", false), "12");
/// assert_eq!(delete_last_char("7", false), "0");
/// assert_eq!(delete_last_char("7", true), "");
/// ```
pub fn delete_last_char(buffer: &str, allow_empty: bool) -> String {
    let collapsed = || {
        if allow_empty {
            String::new()
        } else {
            String::from("0")
        }
    };

    let mut chars = buffer.chars();
    if chars.next_back().is_none() {
        return collapsed();
    }
    let remaining = chars.as_str();
    let remaining = remaining.strip_suffix(POINT).unwrap_or(remaining);

    let (sign, digits) = split_sign(remaining);
    if digits.is_empty() || buffer.chars().count() <= 1 {
        return collapsed();
    }

    let normalized = match digits.split_once(POINT) {
        Some((integer, fraction)) => {
            format!("{}{POINT}{fraction}", strip_leading_zeros(integer))
        }
        None => strip_leading_zeros(digits).to_string(),
    };
    if normalized == "0" {
        return String::from("0");
    }
    format!("{sign}{normalized}")
}

/// Formats `buffer` for display on the keypad screen.
///
/// The integer part is grouped with commas. `""` and `"0"` show as `"0.00"`; any other fraction
/// is shown exactly as typed, including a bare trailing point.
///
/// ```
/// # use daybook::keypad::format_for_display;
/// assert_eq!(format_for_display(""), "0.00");
/// assert_eq!(format_for_display("1234567"), "1,234,567");
/// assert_eq!(format_for_display("1234."), "1,234.");
/// assert_eq!(format_for_display("1234.5"), "1,234.5");
/// ```
pub fn format_for_display(buffer: &str) -> String {
    if buffer.is_empty() || buffer == "0" {
        return String::from("0.00");
    }

    let (sign, digits) = split_sign(buffer);
    match digits.split_once(POINT) {
        Some((integer, fraction)) => {
            format!("{sign}{}{POINT}{fraction}", group_thousands(integer))
        }
        None => format!("{sign}{}", group_thousands(digits)),
    }
}

/// Returns true if `buffer` has at least one digit typed into it.
pub(crate) fn has_digits(buffer: &str) -> bool {
    buffer.chars().any(|c| c.is_ascii_digit())
}

/// Strips redundant leading zeros from an integer part, keeping a single `"0"`.
fn strip_leading_zeros(integer: &str) -> &str {
    let stripped = integer.trim_start_matches('0');
    if stripped.is_empty() && !integer.is_empty() {
        "0"
    } else {
        stripped
    }
}

/// Evaluation may leave a negative result in the buffer, so edits carry the sign along.
fn split_sign(buffer: &str) -> (&str, &str) {
    match buffer.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", buffer),
    }
}
