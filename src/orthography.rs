// 🔤 Orthographic Classifier - character predicates for Spanish spelling
// Letters, vowels, written accents, digits and punctuation trimming

// ============================================================================
// CHARACTER PREDICATES
// ============================================================================

/// Spanish letters outside the ASCII range, matched by code point
const EXTENDED_LETTERS: [char; 14] = [
    'á', 'é', 'í', 'ó', 'ú', 'ü', 'ñ', //
    'Á', 'É', 'Í', 'Ó', 'Ú', 'Ü', 'Ñ',
];

/// True for a-z, A-Z and the accented Spanish letters (á é í ó ú ü ñ, both cases)
pub fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || EXTENDED_LETTERS.contains(&c)
}

/// True for a e i o u and their accented forms.
///
/// `ü` is a letter but does not count as a vowel here.
pub fn is_vowel(c: char) -> bool {
    matches!(
        c,
        'a' | 'e' | 'i' | 'o' | 'u' | 'á' | 'é' | 'í' | 'ó' | 'ú'
    )
}

/// True only for the five vowels carrying a written accent
pub fn is_accented(c: char) -> bool {
    matches!(c, 'á' | 'é' | 'í' | 'ó' | 'ú')
}

/// Decimal digit 0-9
pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Does the text carry a written accent on any vowel?
pub fn has_accent(text: &str) -> bool {
    text.chars().any(|c| is_vowel(c) && is_accented(c))
}

/// Fold an accented vowel (or ü) to its plain form; other characters are unchanged
pub fn strip_accent(c: char) -> char {
    match c {
        'á' => 'a',
        'é' => 'e',
        'í' => 'i',
        'ó' => 'o',
        'ú' | 'ü' => 'u',
        other => other,
    }
}

// ============================================================================
// TEXT PREDICATES
// ============================================================================

/// Drop trailing characters that are neither letters nor digits.
///
/// Returns the prefix up to and including the last letter/digit, or an empty
/// string when there is none.
pub fn remove_trailing_punctuation(text: &str) -> &str {
    match text
        .char_indices()
        .rev()
        .find(|&(_, c)| is_letter(c) || is_digit(c))
    {
        Some((idx, c)) => &text[..idx + c.len_utf8()],
        None => "",
    }
}

/// A word is a non-empty run of letters once trailing punctuation is removed
pub fn is_word(text: &str) -> bool {
    let trimmed = remove_trailing_punctuation(text);
    !trimmed.is_empty() && trimmed.chars().all(is_letter)
}

/// A number is a non-empty run of decimal digits once trailing punctuation is removed
pub fn is_number(text: &str) -> bool {
    let trimmed = remove_trailing_punctuation(text);
    !trimmed.is_empty() && trimmed.chars().all(is_digit)
}

// ============================================================================
// WORD UTILITIES
// ============================================================================

/// Last whitespace-separated token of a sentence ("" when blank)
pub fn last_word(sentence: &str) -> &str {
    sentence.split_whitespace().next_back().unwrap_or("")
}

/// Upper-case the first character, leave the rest untouched
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
