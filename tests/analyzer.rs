// 🧪 Analyzer behaviour through the public API
// Stress classes, phonetic rhyme parts, punctuation tolerance and numerals.

use rhyme_store::phonetic::normalize;
use rhyme_store::{
    base_sound, base_sound_of, is_letter, phonetic_rhyme_part, rhyme, stress_type,
    SpanishWordParser, StressClass, WordParser,
};

fn part(word: &str) -> String {
    phonetic_rhyme_part(word).unwrap()
}

#[test]
fn test_stress_classes() {
    assert_eq!(stress_type("pez").unwrap(), StressClass::Last);
    assert_eq!(stress_type("lío").unwrap(), StressClass::SecondLast);
    assert_eq!(stress_type("cáspita").unwrap(), StressClass::ThirdLast);
    assert_eq!(stress_type("recuérdamelo").unwrap(), StressClass::FourthLast);

    println!("✅ STRESS CLASSES TEST PASSED");
}

#[test]
fn test_phonetic_rhyme_parts() {
    assert_eq!(part(""), "");
    assert_eq!(part("correr"), "er");
    assert_eq!(part("melón"), "on");
    assert_eq!(part("lío"), "io");
    assert_eq!(part("cáspita"), "aspita");
}

#[test]
fn test_consonant_substitutions() {
    assert_eq!(part("suyo"), "ullo");
    assert_eq!(part("barba"), "arva");
    assert_eq!(part("falange"), "anje");
    assert!(rhyme("falange", "alfanje").unwrap());

    println!("✅ CONSONANT SUBSTITUTION TEST PASSED");
}

#[test]
fn test_punctuation_is_ignored() {
    assert!(rhyme("calor!", "motor?").unwrap());
    assert!(rhyme("calor  ", "motor&;'?=").unwrap());
}

#[test]
fn test_words_that_do_not_rhyme() {
    assert!(!rhyme("melón", "mesa").unwrap());
    // Same ending, different stress position
    assert!(!rhyme("cáspita", "pita").unwrap());
}

#[test]
fn test_letter_set() {
    for c in ['ñ', 'Ñ', 'á', 'é', 'í', 'ó', 'ú', 'ü', 'Á', 'É', 'Í', 'Ó', 'Ú', 'Ü'] {
        assert!(is_letter(c), "{c} should be a letter");
    }
    for c in ['!', '?', '.', ',', ';', '&', '\'', '=', ' ', '\t', '0', '5', '9', '¿', '¡'] {
        assert!(!is_letter(c), "{c:?} should not be a letter");
    }
}

#[test]
fn test_numeral_sounds() {
    assert_eq!(base_sound_of(100), "cien");
    assert_eq!(base_sound_of(200), "cientos");
    assert_eq!(base_sound_of(1000), "mil");
    assert_eq!(base_sound_of(20), "veinte");
    assert_eq!(base_sound_of(88), "ocho");

    assert_eq!(base_sound("100").unwrap(), "cien");
    assert_eq!(base_sound("88!").unwrap(), "ocho");
    assert!(base_sound("ochenta").is_err());

    println!("✅ NUMERAL SOUNDS TEST PASSED");
}

#[test]
fn test_normalization_is_idempotent_on_its_output() {
    for word in ["suyo", "barba", "falange", "hoguera", "chorizo", "cigüeña", "llegué", "mayo"] {
        let once = part(word);
        assert_eq!(normalize(&once), once, "{word}");
    }
}

#[test]
fn test_sentences_rhyme_on_their_last_word() {
    let parser = SpanishWordParser::new();

    let a = parser.sentence_fingerprint("Me gusta el melón").unwrap();
    let b = parser.sentence_fingerprint("Qué rico el limón!").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.key(), b.key());

    // A numeral sounds like its spoken word
    let spoken = parser.sentence_fingerprint("Tengo 88").unwrap();
    let written = parser.sentence_fingerprint("Vaya cocho").unwrap();
    assert_eq!(spoken, written);
}
