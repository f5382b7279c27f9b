// ⚠️ Domain errors raised by the phonetic analyzer

use thiserror::Error;

/// Contract violations detected while analyzing a word.
///
/// These are local computation errors: callers are expected to validate input
/// with `is_word` / `is_number` before asking for a fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A syllable (or a whole word) has no vowel to anchor the rhyme on.
    #[error("no vowel in syllable: {syllable:?}")]
    NoVowel { syllable: String },

    /// The numeral sounder was given something that is not a base-10 numeral.
    #[error("not a number: {input:?}")]
    NotANumber { input: String },

    /// A sentence ends on a token that is neither a word nor a numeral.
    #[error("cannot rhyme on {token:?}: not a word or a number")]
    NotAWord { token: String },
}

impl DomainError {
    pub fn no_vowel(syllable: impl Into<String>) -> Self {
        DomainError::NoVowel {
            syllable: syllable.into(),
        }
    }

    pub fn not_a_number(input: impl Into<String>) -> Self {
        DomainError::NotANumber {
            input: input.into(),
        }
    }

    pub fn not_a_word(token: impl Into<String>) -> Self {
        DomainError::NotAWord {
            token: token.into(),
        }
    }
}

/// Result alias for analyzer operations
pub type Result<T> = std::result::Result<T, DomainError>;
