// 🔊 Phonetic Normalizer & Rhyme Comparator
// Extracts the stressed tail of a word ("rhyme part") and rewrites it so that
// spellings that sound the same compare equal.

use crate::error::Result;
use crate::orthography::{is_accented, remove_trailing_punctuation, strip_accent};
use crate::stress::{accented_syllable_index, classify, last_vowel_offset, StressClass};
use crate::syllables::syllabify;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ============================================================================
// RHYME PART
// ============================================================================

/// The stressed tail of a (punctuation-free) word, still in its written form.
///
/// - one syllable or oxytone: from the last vowel of the final syllable
/// - paroxytone: from the last vowel of the penultimate syllable, plus the
///   final syllable
/// - proparoxytone and beyond: from the accented vowel to the end
pub fn rhyme_part(word: &str) -> Result<String> {
    if word.is_empty() {
        return Ok(String::new());
    }

    let syllables = syllabify(word)?;
    let n = syllables.len();

    if n == 1 {
        let syllable = &syllables[0];
        return Ok(syllable[last_vowel_offset(syllable)?..].to_string());
    }

    match classify(&syllables)? {
        StressClass::Last => {
            let last = &syllables[n - 1];
            Ok(last[last_vowel_offset(last)?..].to_string())
        }
        StressClass::SecondLast => {
            let penultimate = &syllables[n - 2];
            let start = last_vowel_offset(penultimate)?;
            Ok(format!("{}{}", &penultimate[start..], syllables[n - 1]))
        }
        StressClass::ThirdLast | StressClass::FourthLast => {
            // Not paroxytone implies there is a written accent somewhere
            let idx = accented_syllable_index(&syllables).unwrap_or(n - 1);
            let stressed = &syllables[idx];
            let start = match stressed.char_indices().find(|&(_, c)| is_accented(c)) {
                Some((offset, _)) => offset,
                None => last_vowel_offset(stressed)?,
            };

            let mut part = stressed[start..].to_string();
            for syllable in &syllables[idx + 1..] {
                part.push_str(syllable);
            }
            Ok(part)
        }
    }
}

// ============================================================================
// PHONETIC NORMALIZATION
// ============================================================================

/// Rewrite a rhyme part into its canonical phonetic spelling.
///
/// Accents fold away, b→v, y→ll, h is dropped unless it follows c (ch),
/// g before e/i becomes j. Everything else passes through.
pub fn normalize(part: &str) -> String {
    let letters: Vec<char> = part.chars().collect();
    let mut result = String::with_capacity(part.len() + 2);

    for (i, &c) in letters.iter().enumerate() {
        match c {
            'b' => result.push('v'),
            'y' => result.push_str("ll"),
            'h' => {
                if i > 0 && letters[i - 1] == 'c' {
                    result.push('h');
                }
            }
            'g' => {
                // A silent h between g and the vowel does not harden the g
                let next = letters[i + 1..].iter().copied().find(|&n| n != 'h');
                let soft = matches!(next.map(strip_accent), Some('e' | 'i'));
                result.push(if soft { 'j' } else { 'g' });
            }
            other => result.push(strip_accent(other)),
        }
    }

    result
}

/// Phonetic rhyme part of a word: trailing punctuation is removed, the rhyme
/// part extracted (lower-case) and normalized.
pub fn phonetic_rhyme_part(word: &str) -> Result<String> {
    let trimmed = remove_trailing_punctuation(word).to_lowercase();
    Ok(normalize(&rhyme_part(&trimmed)?))
}

/// Stress class of a word; empty input (after trimming) is `Last`
pub fn stress_type(word: &str) -> Result<StressClass> {
    let trimmed = remove_trailing_punctuation(word).to_lowercase();
    if trimmed.is_empty() {
        return Ok(StressClass::Last);
    }
    classify(&syllabify(&trimmed)?)
}

/// Do two words rhyme? Case-insensitive equality of their phonetic rhyme parts.
pub fn rhyme(first: &str, second: &str) -> Result<bool> {
    Ok(same_rhyme(&phonetic_rhyme_part(first)?, &phonetic_rhyme_part(second)?))
}

/// The comparison behind `rhyme`, on parts that are already normalized
pub fn same_rhyme(first_part: &str, second_part: &str) -> bool {
    first_part.to_lowercase() == second_part.to_lowercase()
}

// ============================================================================
// RHYME FINGERPRINT
// ============================================================================

/// Normalized rhyme part plus stress class. Two words share an index entry
/// iff both fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RhymeFingerprint {
    pub rhyme: String,
    pub stress: StressClass,
}

impl RhymeFingerprint {
    /// Fingerprint from a phonetic rhyme part, folded to ASCII
    pub fn new(phonetic_part: &str, stress: StressClass) -> Self {
        RhymeFingerprint {
            rhyme: ascii_fold(phonetic_part),
            stress,
        }
    }

    /// Index key: SHA-256 of stress name + rhyme
    pub fn key(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.stress.name());
        hasher.update(&self.rhyme);
        format!("{:x}", hasher.finalize())
    }
}

impl std::fmt::Display for RhymeFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.stress, self.rhyme)
    }
}

/// Keep ASCII letters and digits only (ñ counts as n), lower-cased
pub fn ascii_fold(text: &str) -> String {
    // Lower-case first: accents are only stripped from lower-case vowels
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match strip_accent(c) {
            'ñ' => 'n',
            other => other,
        })
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Fingerprint of a single word
pub fn fingerprint(word: &str) -> Result<RhymeFingerprint> {
    Ok(RhymeFingerprint::new(&phonetic_rhyme_part(word)?, stress_type(word)?))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn part(word: &str) -> String {
        phonetic_rhyme_part(word).unwrap()
    }

    #[test]
    fn test_raw_rhyme_part_keeps_accents() {
        assert_eq!(rhyme_part("").unwrap(), "");
        assert_eq!(rhyme_part("pez").unwrap(), "ez");
        assert_eq!(rhyme_part("melón").unwrap(), "ón");
        assert_eq!(rhyme_part("lío").unwrap(), "ío");
        assert_eq!(rhyme_part("telecinco").unwrap(), "inco");
        assert_eq!(rhyme_part("cáspita").unwrap(), "áspita");
        assert_eq!(rhyme_part("recuérdamelo").unwrap(), "érdamelo");
    }

    #[test]
    fn test_phonetic_rhyme_part_by_stress() {
        assert_eq!(part(""), "");
        // monosyllables
        assert_eq!(part("pez"), "ez");
        // oxytone
        assert_eq!(part("correr"), "er");
        assert_eq!(part("melón"), "on");
        // paroxytone
        assert_eq!(part("lío"), "io");
        assert_eq!(part("carromato"), "ato");
        assert_eq!(part("Telecinco"), "inco");
        assert_eq!(part("abogado"), "ado");
        assert_eq!(part("auriculares"), "ares");
        assert_eq!(part("canoa"), "oa");
        // proparoxytone and beyond
        assert_eq!(part("cáspita"), "aspita");
        assert_eq!(part("recuérdamelo"), "erdamelo");
    }

    #[test]
    fn test_consonant_substitutions() {
        assert_eq!(part("suyo"), "ullo");
        assert_eq!(part("barullo"), "ullo");
        assert_eq!(part("barba"), "arva");
        assert_eq!(part("parva"), "arva");
        assert_eq!(part("gong"), "ong");
        assert_eq!(part("falange"), "anje");
        assert_eq!(part("alfanje"), "anje");
        assert_eq!(part("cacho"), "acho");
        // impossible word, but the silent h still drops
        assert_eq!(part("gargáreha"), "area");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for word in ["suyo", "falange", "cacho", "gargáreha", "recuérdamelo", "barba"] {
            let once = part(word);
            assert_eq!(normalize(&once), once, "normalizing {word} twice changed it");
        }
    }

    #[test]
    fn test_stress_type() {
        assert_eq!(stress_type("").unwrap(), StressClass::Last);
        assert_eq!(stress_type("pez").unwrap(), StressClass::Last);
        assert_eq!(stress_type("correr").unwrap(), StressClass::Last);
        assert_eq!(stress_type("lío").unwrap(), StressClass::SecondLast);
        assert_eq!(stress_type("carromato").unwrap(), StressClass::SecondLast);
        assert_eq!(stress_type("cáspita").unwrap(), StressClass::ThirdLast);
        assert_eq!(stress_type("recuérdamelo").unwrap(), StressClass::FourthLast);
        assert_eq!(stress_type("CÁSPITA!").unwrap(), StressClass::ThirdLast);
    }

    #[test]
    fn test_rhymes() {
        assert!(rhyme("", "").unwrap());
        assert!(rhyme("pez", "hez").unwrap());
        assert!(rhyme("tres", "revés").unwrap());
        assert!(rhyme("Telecinco", "hinco").unwrap());
        assert!(rhyme("nabo", "centavo").unwrap());
        assert!(rhyme("falange", "alfanje").unwrap());
        assert!(rhyme("parva", "escarba").unwrap());
        assert!(rhyme("tuyo", "murmullo").unwrap());
        assert!(rhyme("melón", "limón ").unwrap());
    }

    #[test]
    fn test_rhymes_with_punctuation() {
        assert!(rhyme("cantar.", "pescar").unwrap());
        assert!(rhyme("calor!", "motor?").unwrap());
        assert!(rhyme("calor  ", "motor&;'?=").unwrap());
    }

    #[test]
    fn test_non_rhymes() {
        assert!(!rhyme("pez", "mar").unwrap());
        assert!(!rhyme("cáspita", "pita").unwrap());
    }

    #[test]
    fn test_vowelless_word_is_a_domain_error() {
        assert!(phonetic_rhyme_part("pst").is_err());
        assert!(rhyme("pst", "pez").is_err());
        assert!(stress_type("25").is_err());
    }

    #[test]
    fn test_fingerprint() {
        let a = fingerprint("canción").unwrap();
        let b = fingerprint("camión!").unwrap();
        assert_eq!(a.rhyme, "on");
        assert_eq!(a.stress, StressClass::Last);
        assert_eq!(a, b);
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key().len(), 64);
        assert_eq!(a.to_string(), "LAST:on");

        // different rhyme and stress class → different key
        let c = fingerprint("sábana").unwrap();
        let d = fingerprint("banana").unwrap();
        assert_ne!(c.key(), d.key());
    }

    #[test]
    fn test_ascii_fold() {
        assert_eq!(ascii_fold("año"), "ano");
        assert_eq!(ascii_fold("Ñu-ü"), "nuu");
        assert_eq!(ascii_fold("ch"), "ch");
        assert_eq!(ascii_fold("MELÓN"), "melon");
        assert_eq!(ascii_fold("ÁÉÍÓÚÜÑ"), "aeiouun");
    }
}
