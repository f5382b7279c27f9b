// 🗣️ Word Parser - the analyzer's capability set behind one trait
//
// The store, the CLI and the server only talk to `dyn WordParser`. The Spanish
// rules live in orthography / syllables / stress / phonetic / numbers and are
// wired together here by `SpanishWordParser`.

use crate::error::{DomainError, Result};
use crate::numbers::{base_sound, is_numeral};
use crate::orthography::{self, last_word, remove_trailing_punctuation};
use crate::phonetic::{self, same_rhyme, RhymeFingerprint};
use crate::stress::{classify, StressClass};
use crate::syllables::syllabify;
use serde::{Deserialize, Serialize};

/// Fallback reply when nothing in the store rhymes
pub const DEFAULT_RHYME: &str = "Patada en los cojones";

/// The fixed fallback phrase
pub fn get_default_rhyme() -> &'static str {
    DEFAULT_RHYME
}

// ============================================================================
// WORD PARSER TRAIT
// ============================================================================

/// WordParser - what a language has to provide to be indexed and searched.
///
/// Only the primitive operations are required; fingerprints are derived from
/// them.
pub trait WordParser: Send + Sync {
    /// Is the character part of this language's alphabet?
    fn is_letter(&self, c: char) -> bool;

    /// Non-empty run of letters, ignoring trailing punctuation
    fn is_word(&self, text: &str) -> bool;

    /// Non-empty run of digits, ignoring trailing punctuation
    fn is_number(&self, text: &str) -> bool;

    /// Normalized stressed tail of a word
    fn phonetic_rhyme_part(&self, word: &str) -> Result<String>;

    fn stress_type(&self, word: &str) -> Result<StressClass>;

    /// Spoken word standing in for a numeral, or `NotANumber`
    fn number_sound(&self, numeral: &str) -> Result<String>;

    fn default_rhyme(&self) -> &str;

    /// Case-insensitive comparison of both phonetic rhyme parts
    fn rhyme(&self, first: &str, second: &str) -> Result<bool> {
        Ok(same_rhyme(
            &self.phonetic_rhyme_part(first)?,
            &self.phonetic_rhyme_part(second)?,
        ))
    }

    fn fingerprint(&self, word: &str) -> Result<RhymeFingerprint> {
        Ok(RhymeFingerprint::new(
            &self.phonetic_rhyme_part(word)?,
            self.stress_type(word)?,
        ))
    }

    /// Fingerprint of the word a sentence ends on.
    ///
    /// A trailing numeral is fingerprinted through its spoken sound. Anything
    /// that is neither word nor numeral is rejected with `NotAWord`.
    fn sentence_fingerprint(&self, sentence: &str) -> Result<RhymeFingerprint> {
        let token = last_word(sentence);
        if self.is_word(token) {
            return self.fingerprint(token);
        }

        match self.number_sound(token) {
            Ok(sound) => self.fingerprint(&sound),
            Err(DomainError::NotANumber { .. }) => Err(DomainError::not_a_word(token)),
            Err(e) => Err(e),
        }
    }
}

/// Get the parser used for indexing and searching
pub fn get_parser() -> Box<dyn WordParser> {
    Box::new(SpanishWordParser::new())
}

// ============================================================================
// SPANISH
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct SpanishWordParser;

impl SpanishWordParser {
    pub fn new() -> Self {
        SpanishWordParser
    }

    /// Every intermediate step of the rhyme computation for one token.
    ///
    /// Numerals are analyzed through their spoken sound (`spoken_as`).
    pub fn analyze(&self, token: &str) -> Result<WordAnalysis> {
        let trimmed = remove_trailing_punctuation(token.trim());
        let word = trimmed.to_lowercase();

        let spoken_as = if orthography::is_word(trimmed) {
            None
        } else if is_numeral(trimmed) {
            Some(base_sound(trimmed)?.to_string())
        } else {
            return Err(DomainError::not_a_word(token));
        };

        let text = spoken_as.as_deref().unwrap_or(&word);
        let syllables = syllabify(text)?;
        let stress = classify(&syllables)?;
        let rhyme_part = phonetic::rhyme_part(text)?;
        let phonetic_rhyme_part = phonetic::normalize(&rhyme_part);

        let fingerprint = RhymeFingerprint::new(&phonetic_rhyme_part, stress);

        Ok(WordAnalysis {
            word,
            spoken_as,
            syllables,
            stress,
            stress_name: stress.spanish_name().to_string(),
            rhyme_part,
            phonetic_rhyme_part,
            fingerprint: fingerprint.to_string(),
            key: fingerprint.key(),
        })
    }
}

impl WordParser for SpanishWordParser {
    fn is_letter(&self, c: char) -> bool {
        orthography::is_letter(c)
    }

    fn is_word(&self, text: &str) -> bool {
        orthography::is_word(text)
    }

    fn is_number(&self, text: &str) -> bool {
        orthography::is_number(text)
    }

    fn phonetic_rhyme_part(&self, word: &str) -> Result<String> {
        phonetic::phonetic_rhyme_part(word)
    }

    fn stress_type(&self, word: &str) -> Result<StressClass> {
        phonetic::stress_type(word)
    }

    fn number_sound(&self, numeral: &str) -> Result<String> {
        base_sound(numeral).map(str::to_string)
    }

    fn default_rhyme(&self) -> &str {
        DEFAULT_RHYME
    }
}

/// WordAnalysis - output of `SpanishWordParser::analyze`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordAnalysis {
    pub word: String,
    pub spoken_as: Option<String>,
    pub syllables: Vec<String>,
    pub stress: StressClass,
    pub stress_name: String,
    pub rhyme_part: String,
    pub phonetic_rhyme_part: String,
    pub fingerprint: String,
    pub key: String,
}

// ============================================================================
// DEFAULT RHYMES
// ============================================================================

/// Configurable list of fallback phrases.
///
/// The caller owns the rotation index, so picking is a pure function of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultRhymes {
    phrases: Vec<String>,
}

impl DefaultRhymes {
    /// Blank phrases are dropped
    pub fn new(phrases: Vec<String>) -> Self {
        DefaultRhymes {
            phrases: phrases
                .into_iter()
                .filter(|p| !p.trim().is_empty())
                .collect(),
        }
    }

    /// `phrases[rotation % len]`, or the fixed default when the list is empty
    pub fn pick(&self, rotation: usize) -> &str {
        if self.phrases.is_empty() {
            return DEFAULT_RHYME;
        }
        &self.phrases[rotation % self.phrases.len()]
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

impl Default for DefaultRhymes {
    fn default() -> Self {
        DefaultRhymes::new(vec![DEFAULT_RHYME.to_string()])
    }
}

// ============================================================================
// TESTS
// ============================================================================
