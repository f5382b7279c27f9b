// Rhyme Store - Core Library
// Spanish phonetic rhyme analysis plus a SQLite-backed rhyme index.
// Exposes all modules for use in CLI, API server, and tests

pub mod error;
pub mod orthography;    // Character & word predicates
pub mod syllables;      // Syllabifier
pub mod stress;         // Aguda / llana / esdrújula
pub mod phonetic;       // Rhyme part, normalization, fingerprints
pub mod numbers;        // Numeral sounder
pub mod parser;         // WordParser trait + SpanishWordParser
pub mod db;             // Rhyme index on SQLite
pub mod reply;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::DomainError;
pub use orthography::{capitalize, is_letter, is_number, is_word, last_word};
pub use stress::StressClass;
pub use phonetic::{fingerprint, phonetic_rhyme_part, rhyme, stress_type, RhymeFingerprint};
pub use numbers::{base_sound, base_sound_of};
pub use parser::{
    get_default_rhyme, get_parser,
    DefaultRhymes, SpanishWordParser, WordAnalysis, WordParser,
    DEFAULT_RHYME,
};
pub use db::{
    StoredSentence, Event,
    load_csv, setup_database, add_sentence, insert_sentences, delete_sentence,
    get_all_sentences, verify_count, find_rhymes, pick_rhyme, get_rhyme,
    insert_event, get_events_for_entity,
};
pub use reply::compose_reply;
pub use config::Settings;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
