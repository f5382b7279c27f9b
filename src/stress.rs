// 🎯 Stress Classifier - where the word is stressed, counted from the end
// Aguda / llana / esdrújula / sobreesdrújula via Spanish accentuation rules

use crate::error::{DomainError, Result};
use crate::orthography::{has_accent, is_accented, is_vowel};
use serde::{Deserialize, Serialize};

// ============================================================================
// STRESS CLASS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StressClass {
    /// Oxytone (aguda): stress on the final syllable
    Last,
    /// Paroxytone (llana): stress on the penultimate syllable
    SecondLast,
    /// Proparoxytone (esdrújula): stress on the antepenultimate syllable
    ThirdLast,
    /// Super-proparoxytone (sobreesdrújula): stress further back
    FourthLast,
}

impl StressClass {
    /// Stable name used in fingerprints and storage
    pub fn name(&self) -> &'static str {
        match self {
            StressClass::Last => "LAST",
            StressClass::SecondLast => "SECOND_LAST",
            StressClass::ThirdLast => "THIRD_LAST",
            StressClass::FourthLast => "FOURTH_LAST",
        }
    }

    /// Spanish grammar term
    pub fn spanish_name(&self) -> &'static str {
        match self {
            StressClass::Last => "aguda",
            StressClass::SecondLast => "llana",
            StressClass::ThirdLast => "esdrújula",
            StressClass::FourthLast => "sobreesdrújula",
        }
    }

    /// Parse a stored name back into a class
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "LAST" => Some(StressClass::Last),
            "SECOND_LAST" => Some(StressClass::SecondLast),
            "THIRD_LAST" => Some(StressClass::ThirdLast),
            "FOURTH_LAST" => Some(StressClass::FourthLast),
            _ => None,
        }
    }
}

impl std::fmt::Display for StressClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// VOWEL LOOKUP
// ============================================================================

/// Char index of the last vowel (ü excluded) in a syllable
pub fn last_vowel_index(syllable: &str) -> Result<usize> {
    let chars: Vec<char> = syllable.chars().collect();
    chars
        .iter()
        .rposition(|&c| is_vowel(c))
        .ok_or_else(|| DomainError::no_vowel(syllable))
}

/// Byte offset of the last vowel, for slicing
pub(crate) fn last_vowel_offset(syllable: &str) -> Result<usize> {
    syllable
        .char_indices()
        .filter(|&(_, c)| is_vowel(c))
        .map(|(idx, _)| idx)
        .last()
        .ok_or_else(|| DomainError::no_vowel(syllable))
}

fn last_vowel(syllable: &str) -> Result<char> {
    syllable
        .chars()
        .rev()
        .find(|&c| is_vowel(c))
        .ok_or_else(|| DomainError::no_vowel(syllable))
}

/// Index of the first syllable carrying a written accent
pub fn accented_syllable_index(syllables: &[String]) -> Option<usize> {
    syllables.iter().position(|s| has_accent(s))
}

// ============================================================================
// CLASSIFICATION RULES
// ============================================================================

/// Oxytone: final accented vowel, or -n/-s/vowel ending with the accent on the
/// last syllable's vowel, or any other consonant ending with no accent at all.
pub fn is_oxytone(syllables: &[String]) -> Result<bool> {
    let Some(syllable) = syllables.last() else {
        return Ok(true);
    };
    let Some(last) = syllable.chars().last() else {
        return Ok(true);
    };

    if is_accented(last) {
        return Ok(true);
    }

    let vowel_or_ns = last == 'n' || last == 's' || is_vowel(last);
    if vowel_or_ns {
        return Ok(is_accented(last_vowel(syllable)?));
    }

    Ok(!syllables.iter().any(|s| has_accent(s)))
}

/// Paroxytone: not oxytone, and either the penultimate syllable's vowel is
/// accented or no syllable carries an accent.
pub fn is_paroxytone(syllables: &[String]) -> Result<bool> {
    if syllables.len() < 2 || is_oxytone(syllables)? {
        return Ok(false);
    }

    let penultimate = &syllables[syllables.len() - 2];
    if is_accented(last_vowel(penultimate)?) {
        return Ok(true);
    }

    Ok(!syllables.iter().any(|s| has_accent(s)))
}

/// Proparoxytone: the accented syllable is third from the end
pub fn is_proparoxytone(syllables: &[String]) -> bool {
    match accented_syllable_index(syllables) {
        Some(idx) => syllables.len() - idx == 3,
        None => false,
    }
}

/// Classify a syllable sequence. Order matters: oxytone, paroxytone,
/// proparoxytone, then everything else.
pub fn classify(syllables: &[String]) -> Result<StressClass> {
    if syllables.len() <= 1 {
        return Ok(StressClass::Last);
    }

    if is_oxytone(syllables)? {
        Ok(StressClass::Last)
    } else if is_paroxytone(syllables)? {
        Ok(StressClass::SecondLast)
    } else if is_proparoxytone(syllables) {
        Ok(StressClass::ThirdLast)
    } else {
        Ok(StressClass::FourthLast)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syllables::syllabify;

    fn stress(word: &str) -> StressClass {
        classify(&syllabify(word).unwrap()).unwrap()
    }

    #[test]
    fn test_stress_names() {
        assert_eq!(StressClass::Last.name(), "LAST");
        assert_eq!(StressClass::ThirdLast.spanish_name(), "esdrújula");
        assert_eq!(StressClass::from_name("SECOND_LAST"), Some(StressClass::SecondLast));
        assert_eq!(StressClass::from_name("nope"), None);
        assert_eq!(StressClass::FourthLast.to_string(), "FOURTH_LAST");
    }

    #[test]
    fn test_serde_names_match_storage_names() {
        let json = serde_json::to_string(&StressClass::SecondLast).unwrap();
        assert_eq!(json, "\"SECOND_LAST\"");
    }

    #[test]
    fn test_oxytone() {
        assert_eq!(stress("pez"), StressClass::Last);
        assert_eq!(stress("correr"), StressClass::Last);
        assert_eq!(stress("melón"), StressClass::Last);
        assert_eq!(stress("mamá"), StressClass::Last);
        assert_eq!(stress("ciudad"), StressClass::Last);
        assert_eq!(stress("revés"), StressClass::Last);
    }

    #[test]
    fn test_paroxytone() {
        assert_eq!(stress("lío"), StressClass::SecondLast);
        assert_eq!(stress("carromato"), StressClass::SecondLast);
        assert_eq!(stress("árbol"), StressClass::SecondLast);
        assert_eq!(stress("lápiz"), StressClass::SecondLast);
        assert_eq!(stress("examen"), StressClass::SecondLast);
    }

    #[test]
    fn test_proparoxytone() {
        assert_eq!(stress("cáspita"), StressClass::ThirdLast);
        assert_eq!(stress("teléfono"), StressClass::ThirdLast);
        assert_eq!(stress("murciélago"), StressClass::ThirdLast);
    }

    #[test]
    fn test_super_proparoxytone() {
        assert_eq!(stress("recuérdamelo"), StressClass::FourthLast);
        assert_eq!(stress("dígamelo"), StressClass::FourthLast);
    }

    #[test]
    fn test_single_syllable_is_last() {
        assert_eq!(classify(&["sol".to_string()]).unwrap(), StressClass::Last);
        assert_eq!(classify(&[]).unwrap(), StressClass::Last);
    }

    #[test]
    fn test_last_vowel_index() {
        assert_eq!(last_vowel_index("cuér").unwrap(), 2);
        assert_eq!(last_vowel_index("güi").unwrap(), 2);
        assert!(last_vowel_index("ng").is_err());
        assert_eq!(last_vowel_offset("lón").unwrap(), 1);
        assert_eq!(last_vowel_offset("cuér").unwrap(), 2);
    }
}
