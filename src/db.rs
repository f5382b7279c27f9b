// 🗄️ Rhyme Store - sentences indexed by the fingerprint of their last word
//
// A sentence is stored once (keyed by the hash of its normalized text) next to
// the fingerprint key of the word it ends on. Searching is an equality lookup
// on that key.

use crate::parser::WordParser;
use crate::phonetic::{ascii_fold, RhymeFingerprint};
use crate::stress::StressClass;
use crate::error::DomainError;
use crate::orthography::last_word;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, info, warn};

// ============================================================================
// TYPES
// ============================================================================

/// A sentence as stored in the index
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StoredSentence {
    pub sentence: String,
    pub last_word: String,
    /// ASCII phonetic rhyme part of the last word
    pub rhyme: String,
    pub stress: StressClass,
    /// Index key (`RhymeFingerprint::key`)
    pub fingerprint: String,
    pub created_at: DateTime<Utc>,
}

/// CSV row for bulk imports
#[derive(Debug, Deserialize)]
struct SentenceRecord {
    sentence: String,
}

/// Event for audit trail
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Event {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub entity_type: String,
    pub entity_id: String,
    pub data: serde_json::Value,
    pub actor: String,
}

impl Event {
    pub fn new(
        event_type: &str,
        entity_type: &str,
        entity_id: &str,
        data: serde_json::Value,
        actor: &str,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type: event_type.to_string(),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            data,
            actor: actor.to_string(),
        }
    }
}

impl ToSql for StressClass {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.name()))
    }
}

impl FromSql for StressClass {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let name = value.as_str()?;
        StressClass::from_name(name)
            .ok_or_else(|| FromSqlError::Other(format!("unknown stress class: {}", name).into()))
    }
}

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Lower-cased, ASCII-folded, `[a-z0-9]` only: "¡Me gusta el MELÓN!" and
/// "me gusta el melon" are the same sentence
pub fn normalize_sentence(sentence: &str) -> String {
    ascii_fold(sentence)
}

/// Deduplication hash of a sentence (SHA-256 of its normalized form)
pub fn sentence_hash(sentence: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_sentence(sentence));
    format!("{:x}", hasher.finalize())
}

// ============================================================================
// SCHEMA
// ============================================================================

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS sentences (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            sentence_hash TEXT UNIQUE NOT NULL,
            sentence TEXT NOT NULL,
            last_word TEXT NOT NULL,
            rhyme TEXT NOT NULL,
            stress TEXT NOT NULL,
            fingerprint TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    // Audit trail
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id TEXT UNIQUE NOT NULL,
            timestamp TEXT NOT NULL,
            event_type TEXT NOT NULL,
            entity_type TEXT NOT NULL,
            entity_id TEXT NOT NULL,
            data TEXT NOT NULL,
            actor TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_fingerprint ON sentences(fingerprint)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_entity ON events(entity_type, entity_id)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// WRITES
// ============================================================================

/// Index a sentence under the fingerprint of its last word.
///
/// Returns `false` for blank sentences and for sentences already stored.
/// Fails when the last word cannot be fingerprinted.
pub fn add_sentence(conn: &Connection, parser: &dyn WordParser, sentence: &str) -> Result<bool> {
    add_sentence_as(conn, parser, sentence, "rhyme_store")
}

fn add_sentence_as(
    conn: &Connection,
    parser: &dyn WordParser,
    sentence: &str,
    actor: &str,
) -> Result<bool> {
    let sentence = sentence.trim();
    if sentence.is_empty() {
        return Ok(false);
    }

    let fingerprint = parser
        .sentence_fingerprint(sentence)
        .with_context(|| format!("Cannot index sentence: {}", sentence))?;
    let hash = sentence_hash(sentence);
    let key = fingerprint.key();

    let result = conn.execute(
        "INSERT INTO sentences (
            sentence_hash, sentence, last_word, rhyme, stress, fingerprint, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            hash,
            sentence,
            last_word(sentence),
            fingerprint.rhyme,
            fingerprint.stress,
            key,
            Utc::now().to_rfc3339(),
        ],
    );

    match result {
        Ok(_) => {
            let event = Event::new(
                "rhyme_added",
                "sentence",
                &hash,
                serde_json::json!({
                    "sentence": sentence,
                    "fingerprint": fingerprint.to_string(),
                }),
                actor,
            );
            insert_event(conn, &event)?;

            info!("Added rhyme: {}", sentence);
            Ok(true)
        }
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            debug!("Skipping duplicate: {}", sentence);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Bulk import. Returns how many sentences were inserted; duplicates and
/// sentences that cannot be fingerprinted are skipped.
pub fn insert_sentences(
    conn: &Connection,
    parser: &dyn WordParser,
    sentences: &[String],
) -> Result<usize> {
    let mut inserted = 0;
    let mut duplicates = 0;
    let mut rejected = 0;

    for sentence in sentences {
        match add_sentence_as(conn, parser, sentence, "csv_importer") {
            Ok(true) => inserted += 1,
            Ok(false) => duplicates += 1,
            Err(e) if e.downcast_ref::<DomainError>().is_some() => {
                warn!("{:#}", e);
                rejected += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(inserted, duplicates, rejected, "Import finished");

    Ok(inserted)
}

/// Remove a stored sentence (matched by its normalized form)
pub fn delete_sentence(conn: &Connection, sentence: &str) -> Result<()> {
    let hash = sentence_hash(sentence);

    let deleted = conn.execute(
        "DELETE FROM sentences WHERE sentence_hash = ?1",
        params![hash],
    )?;

    if deleted == 0 {
        bail!("The sentence to remove does not exist: {}", sentence);
    }

    let event = Event::new(
        "rhyme_deleted",
        "sentence",
        &hash,
        serde_json::json!({ "sentence": sentence }),
        "rhyme_store",
    );
    insert_event(conn, &event)?;

    info!("Deleted rhyme: {}", sentence);
    Ok(())
}

/// Insert event into audit trail
pub fn insert_event(conn: &Connection, event: &Event) -> Result<()> {
    let data_json = serde_json::to_string(&event.data)?;

    conn.execute(
        "INSERT INTO events (
            event_id, timestamp, event_type, entity_type, entity_id, data, actor
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            event.event_id,
            event.timestamp.to_rfc3339(),
            event.event_type,
            event.entity_type,
            event.entity_id,
            data_json,
            event.actor,
        ],
    )?;

    Ok(())
}

// ============================================================================
// READS
// ============================================================================

fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Get events for a specific entity, newest first
pub fn get_events_for_entity(
    conn: &Connection,
    entity_type: &str,
    entity_id: &str,
) -> Result<Vec<Event>> {
    let mut stmt = conn.prepare(
        "SELECT event_id, timestamp, event_type, entity_type, entity_id, data, actor
         FROM events
         WHERE entity_type = ?1 AND entity_id = ?2
         ORDER BY id DESC",
    )?;

    let events = stmt
        .query_map(params![entity_type, entity_id], |row| {
            let timestamp_str: String = row.get(1)?;
            let data_json: String = row.get(5)?;

            Ok(Event {
                event_id: row.get(0)?,
                timestamp: parse_timestamp(1, &timestamp_str)?,
                event_type: row.get(2)?,
                entity_type: row.get(3)?,
                entity_id: row.get(4)?,
                data: serde_json::from_str(&data_json).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        5,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?,
                actor: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(events)
}

/// Every stored sentence, oldest first
pub fn get_all_sentences(conn: &Connection) -> Result<Vec<StoredSentence>> {
    let mut stmt = conn.prepare(
        "SELECT sentence, last_word, rhyme, stress, fingerprint, created_at
         FROM sentences
         ORDER BY id",
    )?;

    let sentences = stmt
        .query_map([], |row| {
            let created_at: String = row.get(5)?;

            Ok(StoredSentence {
                sentence: row.get(0)?,
                last_word: row.get(1)?,
                rhyme: row.get(2)?,
                stress: row.get(3)?,
                fingerprint: row.get(4)?,
                created_at: parse_timestamp(5, &created_at)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(sentences)
}

pub fn verify_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM sentences", [], |row| row.get(0))?;

    Ok(count)
}

/// All stored sentences sharing this fingerprint
pub fn find_rhymes(conn: &Connection, fingerprint: &RhymeFingerprint) -> Result<Vec<String>> {
    debug!("Searching rhymes for {}", fingerprint);

    let mut stmt = conn.prepare(
        "SELECT sentence FROM sentences
         WHERE fingerprint = ?1
         ORDER BY id",
    )?;

    let sentences = stmt
        .query_map(params![fingerprint.key()], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;

    Ok(sentences)
}

/// A random stored sentence rhyming with `sentence`, if any.
///
/// `None` when nothing rhymes or the sentence's last word cannot be
/// fingerprinted.
pub fn pick_rhyme(
    conn: &Connection,
    parser: &dyn WordParser,
    sentence: &str,
) -> Result<Option<String>> {
    debug!("Finding rhymes for {}", sentence);

    let fingerprint = match parser.sentence_fingerprint(sentence) {
        Ok(fingerprint) => fingerprint,
        Err(e) => {
            debug!("No fingerprint for {:?}: {}", sentence, e);
            return Ok(None);
        }
    };

    let found = conn
        .query_row(
            "SELECT sentence FROM sentences
             WHERE fingerprint = ?1
             ORDER BY RANDOM()
             LIMIT 1",
            params![fingerprint.key()],
            |row| row.get(0),
        )
        .optional()?;

    Ok(found)
}

/// Like `pick_rhyme`, answering `fallback` when nothing rhymes
pub fn get_rhyme(
    conn: &Connection,
    parser: &dyn WordParser,
    sentence: &str,
    fallback: &str,
) -> Result<String> {
    Ok(pick_rhyme(conn, parser, sentence)?.unwrap_or_else(|| fallback.to_string()))
}

// ============================================================================
// CSV IMPORT
// ============================================================================

/// Read sentences from a CSV file with a `sentence` column
pub fn load_csv(csv_path: &Path) -> Result<Vec<String>> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file: {}", csv_path.display()))?;

    let mut sentences = Vec::new();

    for result in rdr.deserialize() {
        let record: SentenceRecord = result.context("Failed to deserialize sentence")?;
        sentences.push(record.sentence);
    }

    Ok(sentences)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{SpanishWordParser, DEFAULT_RHYME};
    use std::io::Write;

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn
    }

    fn sentences(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_setup_is_repeatable() {
        let conn = test_db();
        setup_database(&conn).unwrap();
        assert_eq!(verify_count(&conn).unwrap(), 0);
    }

    #[test]
    fn test_normalized_sentence() {
        assert_eq!(normalize_sentence("¡Me gusta el MELÓN!"), "megustaelmelon");
        assert_eq!(sentence_hash("Me gusta el melón"), sentence_hash("me gusta el melon!"));
        assert_eq!(sentence_hash("hola").len(), 64);
    }

    #[test]
    fn test_add_and_skip_duplicates() {
        let conn = test_db();
        let parser = SpanishWordParser::new();

        assert!(add_sentence(&conn, &parser, "Me gusta el melón").unwrap());
        // Same sentence once normalized
        assert!(!add_sentence(&conn, &parser, "me gusta el MELON!").unwrap());
        // Upper-case accented letters fold the same way
        assert!(!add_sentence(&conn, &parser, "ME GUSTA EL MELÓN").unwrap());
        // Blank input is ignored
        assert!(!add_sentence(&conn, &parser, "   ").unwrap());

        assert_eq!(verify_count(&conn).unwrap(), 1);

        let stored = get_all_sentences(&conn).unwrap();
        assert_eq!(stored[0].sentence, "Me gusta el melón");
        assert_eq!(stored[0].last_word, "melón");
        assert_eq!(stored[0].rhyme, "on");
        assert_eq!(stored[0].stress, StressClass::Last);
        assert_eq!(stored[0].fingerprint, parser.fingerprint("limón").unwrap().key());

        println!("✅ Add/duplicate test PASSED");
    }

    #[test]
    fn test_add_rejects_unindexable_sentence() {
        let conn = test_db();
        let parser = SpanishWordParser::new();

        let err = add_sentence(&conn, &parser, "escríbeme a @nadie").unwrap_err();
        assert!(err.downcast_ref::<DomainError>().is_some());
        assert_eq!(verify_count(&conn).unwrap(), 0);
    }

    #[test]
    fn test_import_twice_is_idempotent() {
        let conn = test_db();
        let parser = SpanishWordParser::new();
        let batch = sentences(&[
            "Me gusta el melón",
            "Qué bonito camión",
            "Tengo 88",
            "esto no rima: @@@",
        ]);

        let inserted1 = insert_sentences(&conn, &parser, &batch).unwrap();
        let count1 = verify_count(&conn).unwrap();
        let inserted2 = insert_sentences(&conn, &parser, &batch).unwrap();
        let count2 = verify_count(&conn).unwrap();

        println!("First import: {} inserted, {} total", inserted1, count1);
        println!("Second import: {} inserted, {} total", inserted2, count2);

        assert_eq!(inserted1, 3, "The unindexable sentence is skipped");
        assert_eq!(count1, 3);
        assert_eq!(inserted2, 0, "Second import should insert nothing");
        assert_eq!(count2, 3);

        println!("✅ Idempotent import test PASSED");
    }

    #[test]
    fn test_delete() {
        let conn = test_db();
        let parser = SpanishWordParser::new();
        add_sentence(&conn, &parser, "Me gusta el melón").unwrap();

        delete_sentence(&conn, "ME GUSTA EL MELÓN").unwrap();
        assert_eq!(verify_count(&conn).unwrap(), 0);

        // Gone now
        assert!(delete_sentence(&conn, "Me gusta el melón").is_err());
    }

    #[test]
    fn test_find_rhymes_by_fingerprint() {
        let conn = test_db();
        let parser = SpanishWordParser::new();
        insert_sentences(
            &conn,
            &parser,
            &sentences(&["Me gusta el melón", "Qué bonito camión", "Vaya cocho"]),
        )
        .unwrap();

        let on = parser.fingerprint("canción").unwrap();
        assert_eq!(
            find_rhymes(&conn, &on).unwrap(),
            vec!["Me gusta el melón", "Qué bonito camión"]
        );

        let ocho = parser.fingerprint("ocho").unwrap();
        assert_eq!(find_rhymes(&conn, &ocho).unwrap(), vec!["Vaya cocho"]);

        let none = parser.fingerprint("cáspita").unwrap();
        assert!(find_rhymes(&conn, &none).unwrap().is_empty());
    }

    #[test]
    fn test_get_rhyme_picks_a_match() {
        let conn = test_db();
        let parser = SpanishWordParser::new();
        insert_sentences(
            &conn,
            &parser,
            &sentences(&["Me gusta el melón", "Qué bonito camión", "Vaya cocho"]),
        )
        .unwrap();

        for _ in 0..10 {
            let rhyme = get_rhyme(&conn, &parser, "Y yo soy un ratón", DEFAULT_RHYME).unwrap();
            assert!(rhyme == "Me gusta el melón" || rhyme == "Qué bonito camión");
        }

        // Numerals search through their sound
        let rhyme = get_rhyme(&conn, &parser, "Tengo 88", DEFAULT_RHYME).unwrap();
        assert_eq!(rhyme, "Vaya cocho");
    }

    #[test]
    fn test_get_rhyme_falls_back() {
        let conn = test_db();
        let parser = SpanishWordParser::new();
        add_sentence(&conn, &parser, "Me gusta el melón").unwrap();

        assert_eq!(
            get_rhyme(&conn, &parser, "Qué cáspita", DEFAULT_RHYME).unwrap(),
            DEFAULT_RHYME
        );
        assert_eq!(pick_rhyme(&conn, &parser, "Qué cáspita").unwrap(), None);
        // Not fingerprintable
        assert_eq!(get_rhyme(&conn, &parser, "", "nada").unwrap(), "nada");
        assert_eq!(get_rhyme(&conn, &parser, "hola @", "nada").unwrap(), "nada");
    }

    #[test]
    fn test_event_log() {
        let conn = test_db();
        let parser = SpanishWordParser::new();

        add_sentence(&conn, &parser, "Me gusta el melón").unwrap();
        delete_sentence(&conn, "Me gusta el melón").unwrap();

        let hash = sentence_hash("Me gusta el melón");
        let events = get_events_for_entity(&conn, "sentence", &hash).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, "rhyme_deleted");
        assert_eq!(events[1].event_type, "rhyme_added");
        assert_eq!(events[1].actor, "rhyme_store");
        assert_eq!(events[1].data["fingerprint"], "LAST:on");

        println!("✅ Event log test PASSED");
    }

    #[test]
    fn test_load_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sentence").unwrap();
        writeln!(file, "Me gusta el melón").unwrap();
        writeln!(file, "\"Uno, dos y tres\"").unwrap();
        file.flush().unwrap();

        let loaded = load_csv(file.path()).unwrap();
        assert_eq!(loaded, vec!["Me gusta el melón", "Uno, dos y tres"]);

        assert!(load_csv(Path::new("/definitely/not/here.csv")).is_err());
    }
}
