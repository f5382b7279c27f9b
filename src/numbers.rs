// 🔢 Numeral Sounder - the Spanish word a numeral "ends on"
// 88 sounds like "ocho", 300 like "cientos", 7000 like "mil". Used so numerals
// can take part in rhyme matching; this is not a full number-to-words speller.

use crate::error::{DomainError, Result};
use crate::orthography::{is_digit, remove_trailing_punctuation};

// ============================================================================
// SOUND TABLE
// ============================================================================

/// Words with their own spelling, ordered by value
const SOUNDS: [(u64, &str); 17] = [
    (0, "cero"),
    (1, "uno"),
    (2, "dos"),
    (3, "tres"),
    (4, "cuatro"),
    (5, "cinco"),
    (6, "seis"),
    (7, "siete"),
    (8, "ocho"),
    (9, "nueve"),
    (10, "diez"),
    (11, "once"),
    (12, "doce"),
    (13, "trece"),
    (14, "catorce"),
    (15, "quince"),
    (20, "veinte"),
];

/// Shared ending of treinta, cuarenta ... noventa
const DECADES: &str = "enta";
const HUNDRED: &str = "cien";
const HUNDREDS: &str = "cientos";
const THOUSAND: &str = "mil";
const MILLION: &str = "millón";
const MILLIONS: &str = "millones";

/// Digits kept from a numeral too large for a signed 64-bit integer
const OVERFLOW_DIGITS: usize = 7;

fn lookup(n: u64) -> Option<&'static str> {
    SOUNDS
        .iter()
        .find(|(value, _)| *value == n)
        .map(|(_, word)| *word)
}

/// Word for a single digit (n < 10)
fn unit(n: u64) -> &'static str {
    SOUNDS[(n % 10) as usize].1
}

// ============================================================================
// BASE SOUND
// ============================================================================

/// Sound of a non-negative integer.
///
/// Round numbers (exact multiples of a million, a thousand or a hundred) take
/// their round word. Anything else drops its leading digit and is looked at
/// again, so every step removes one digit and the loop ends once the value
/// has at most two digits.
pub fn base_sound_of(mut n: u64) -> &'static str {
    loop {
        if let Some(word) = lookup(n) {
            return word;
        }

        if n < 100 {
            return if n % 10 == 0 { DECADES } else { unit(n) };
        }

        if n % 1_000_000 == 0 {
            return if n / 1_000_000 == 1 { MILLION } else { MILLIONS };
        }
        if n % 1000 == 0 {
            return THOUSAND;
        }
        if n % 100 == 0 {
            return if n == 100 { HUNDRED } else { HUNDREDS };
        }

        n %= leading_digit_weight(n);
    }
}

/// 10^(digits - 1): the place value of the leading digit
fn leading_digit_weight(n: u64) -> u64 {
    let mut weight = 1;
    while n / weight >= 10 {
        weight *= 10;
    }
    weight
}

/// Does the text look like a base-10 numeral? Plain digits, or a decimal
/// with a single `.` or `,` separator. Trailing punctuation is ignored.
pub fn is_numeral(text: &str) -> bool {
    let trimmed = remove_trailing_punctuation(text);
    let separators = trimmed.chars().filter(|&c| c == '.' || c == ',').count();

    trimmed.chars().any(is_digit)
        && separators <= 1
        && trimmed.chars().all(|c| is_digit(c) || c == '.' || c == ',')
}

/// Sound of a textual numeral.
///
/// For decimals the digits after the separator are the ones spoken last, so
/// they decide the sound ("88,88" → "ocho"); a bare trailing separator
/// ("88.") falls back to the integer part.
pub fn base_sound(numeral: &str) -> Result<&'static str> {
    if !is_numeral(numeral) {
        return Err(DomainError::not_a_number(numeral));
    }

    let trimmed = remove_trailing_punctuation(numeral);
    let digits = match trimmed.split_once(['.', ',']) {
        Some((_, fraction)) if !fraction.is_empty() => fraction,
        Some((integer, _)) => integer,
        None => trimmed,
    };

    Ok(base_sound_of(parse_digits(digits)))
}

/// Parse a run of ASCII digits, keeping only the trailing digits when the
/// value does not fit a signed 64-bit integer
fn parse_digits(digits: &str) -> u64 {
    if digits.is_empty() {
        return 0;
    }

    match digits.parse::<i64>() {
        Ok(value) => value as u64,
        Err(_) => {
            let tail = &digits[digits.len().saturating_sub(OVERFLOW_DIGITS)..];
            tail.parse::<u64>().unwrap_or(0)
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
