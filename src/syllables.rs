// ✂️ Syllabifier - splits a Spanish word into syllables
//
// Two passes:
// 1. Chunking: a decision table keyed by the sound class of the next three
//    characters (vowel / silent h / consonant) decides how long the next
//    chunk is.
// 2. Re-merging: chunks that cannot stand alone (consonant-only) or that
//    continue a diphthong with the previous chunk are glued back on.

use crate::error::{DomainError, Result};

// ============================================================================
// SOUND CLASSES
// ============================================================================

/// Sound class of a single (lower-case) character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundClass {
    /// Syllable nucleus: a e i o u, accented forms and ü
    Vowel,
    /// The silent letter h
    Silent,
    /// Everything else
    Consonant,
}

impl SoundClass {
    pub fn of(c: char) -> Self {
        match c {
            'a' | 'e' | 'i' | 'o' | 'u' | 'á' | 'é' | 'í' | 'ó' | 'ú' | 'ü' => SoundClass::Vowel,
            'h' => SoundClass::Silent,
            _ => SoundClass::Consonant,
        }
    }
}

fn is_nucleus(c: char) -> bool {
    SoundClass::of(c) == SoundClass::Vowel
}

/// a, e, o (with or without accent)
fn is_open_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'o' | 'á' | 'é' | 'ó')
}

/// Two adjacent vowels are pronounced in separate syllables.
///
/// Open + open always breaks; open + closed breaks only when the closed vowel
/// is accented (í, ú); closed + closed breaks only when both are the same.
pub fn is_hiatus(first: char, second: char) -> bool {
    match (is_open_vowel(first), is_open_vowel(second)) {
        (true, true) => true,
        (true, false) => matches!(second, 'í' | 'ú'),
        (false, true) => matches!(first, 'í' | 'ú'),
        (false, false) => first == second,
    }
}

/// Consonant pairs that stay together as the onset of the next syllable
/// ({b,c,d,f,g,p,r,t}+r, {b,c,f,g,p,t,l,k}+l, ch)
pub fn is_inseparable_cluster(first: char, second: char) -> bool {
    match second {
        'r' => matches!(first, 'b' | 'c' | 'd' | 'f' | 'g' | 'p' | 'r' | 't'),
        'l' => matches!(first, 'b' | 'c' | 'f' | 'g' | 'p' | 't' | 'l' | 'k'),
        'h' => first == 'c',
        _ => false,
    }
}

/// que, qui, gue, gui: the u is silent and the three letters open a syllable
fn is_silent_u_digraph(window: &[char]) -> bool {
    matches!(window, ['q' | 'g', 'u', 'e' | 'i'])
}

// ============================================================================
// CHUNKING DECISION TABLE
// ============================================================================

/// Length (in chars) of the next chunk at the front of `rest`
fn next_chunk_len(rest: &[char]) -> usize {
    use SoundClass::{Consonant as C, Silent as H, Vowel as V};

    match rest {
        [] => 0,
        [_] => 1,
        [x, y] => {
            if is_nucleus(*x) && is_nucleus(*y) && is_hiatus(*x, *y) {
                1
            } else {
                2
            }
        }
        [x, y, z, ..] => {
            let (x, y, z) = (*x, *y, *z);
            match (SoundClass::of(x), SoundClass::of(y), SoundClass::of(z)) {
                (V, V, V) => {
                    if is_hiatus(x, y) {
                        1
                    } else if is_hiatus(y, z) {
                        2
                    } else {
                        3
                    }
                }
                (V, V, _) => {
                    if is_hiatus(x, y) {
                        1
                    } else {
                        2
                    }
                }
                // The h is transparent: the vowels around it may still join
                (V, H, V) => {
                    if is_hiatus(x, z) {
                        1
                    } else {
                        3
                    }
                }
                (V, C, V) => 1,
                (V, _, _) => {
                    if is_inseparable_cluster(y, z) {
                        1
                    } else {
                        2
                    }
                }
                (_, V, V) => {
                    if is_silent_u_digraph(&rest[..3]) || !is_hiatus(y, z) {
                        3
                    } else {
                        2
                    }
                }
                (_, V, _) => 2,
                (_, _, V) => {
                    if is_inseparable_cluster(x, y) {
                        3
                    } else {
                        1
                    }
                }
                (_, _, _) => 1,
            }
        }
    }
}

fn has_nucleus(chars: &[char]) -> bool {
    chars.iter().any(|&c| is_nucleus(c))
}

// ============================================================================
// SYLLABIFICATION
// ============================================================================

/// Split a word into its ordered syllables.
///
/// The word is lower-cased first; concatenating the result reproduces the
/// lower-cased word. An empty word yields no syllables. A non-empty word
/// without any vowel is rejected with [`DomainError::NoVowel`].
pub fn syllabify(word: &str) -> Result<Vec<String>> {
    let chars: Vec<char> = word.to_lowercase().chars().collect();

    if chars.is_empty() {
        return Ok(Vec::new());
    }

    if !has_nucleus(&chars) {
        return Err(DomainError::no_vowel(word));
    }

    let mut syllables: Vec<Vec<char>> = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let len = next_chunk_len(&chars[pos..]);
        let chunk = &chars[pos..pos + len];
        pos += len;

        match syllables.last_mut() {
            Some(last) if should_merge(last, chunk) => last.extend_from_slice(chunk),
            _ => syllables.push(chunk.to_vec()),
        }
    }

    Ok(syllables
        .into_iter()
        .map(|s| s.into_iter().collect())
        .collect())
}

/// Glue `chunk` onto the previous syllable instead of opening a new one?
fn should_merge(previous: &[char], chunk: &[char]) -> bool {
    // Consonant-only chunks cannot stand alone
    if !has_nucleus(chunk) {
        return true;
    }

    // A vowel touching a vowel without a hiatus continues the diphthong
    if let (Some(&tail), Some(&head)) = (previous.last(), chunk.first()) {
        if is_nucleus(tail) && is_nucleus(head) && !is_hiatus(tail, head) {
            return true;
        }
    }

    // Leading consonants wait for the first vowel. A new syllable is only
    // opened after one with a nucleus, so checking the last one is enough.
    !has_nucleus(previous)
}

// ============================================================================
// TESTS
// ============================================================================
