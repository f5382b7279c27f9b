use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use std::env;
use std::path::{Path, PathBuf};

// Use library instead of local modules
use rhyme_store::{
    add_sentence, base_sound, delete_sentence, get_all_sentences, get_rhyme, insert_sentences,
    load_csv, logging, setup_database, verify_count, Settings, SpanishWordParser, WordParser,
    VERSION,
};

const USAGE: &str = "\
Usage: rhyme-store [--config <file>] <command> [args]

Commands:
  import <csv>             Import sentences from a CSV with a `sentence` column
  add <sentence...>        Add one sentence to the index
  delete <sentence...>     Remove a sentence from the index
  list                     Show every stored sentence
  rhyme <sentence...>      Find a sentence that rhymes (or the default rhyme)
  analyze <word>           Show syllables, stress and rhyme part of a word
  check <word1> <word2>    Do two words rhyme?
  number <numeral>         Spoken sound of a numeral";

fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();

    let config_path = if args.first().map(String::as_str) == Some("--config") {
        if args.len() < 2 {
            bail!("--config needs a file path\n\n{}", USAGE);
        }
        let path = PathBuf::from(args.remove(1));
        args.remove(0);
        Some(path)
    } else {
        None
    };

    let settings = Settings::load(config_path.as_deref())?;
    logging::init(&settings.log.level)?;

    let Some((command, rest)) = args.split_first() else {
        println!("🎤 Rhyme Store v{}\n\n{}", VERSION, USAGE);
        return Ok(());
    };

    match command.as_str() {
        "import" => run_import(&settings, rest),
        "add" => run_add(&settings, &rest.join(" ")),
        "delete" => run_delete(&settings, &rest.join(" ")),
        "list" => run_list(&settings),
        "rhyme" => run_rhyme(&settings, &rest.join(" ")),
        "analyze" => run_analyze(rest),
        "check" => run_check(rest),
        "number" => run_number(rest),
        "help" | "--help" | "-h" => {
            println!("{}", USAGE);
            Ok(())
        }
        other => bail!("Unknown command: {}\n\n{}", other, USAGE),
    }
}

fn open_database(settings: &Settings) -> Result<Connection> {
    let db_path = &settings.database.path;
    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
    setup_database(&conn)?;
    Ok(conn)
}

fn require_text<'a>(text: &'a str, what: &str) -> Result<&'a str> {
    if text.trim().is_empty() {
        bail!("Missing {}\n\n{}", what, USAGE);
    }
    Ok(text)
}

fn run_import(settings: &Settings, args: &[String]) -> Result<()> {
    let Some(csv_path) = args.first() else {
        bail!("Missing CSV path\n\n{}", USAGE);
    };

    println!("🗄️  Rhyme Import - CSV → SQLite + WAL");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Load CSV
    println!("\n📂 Loading CSV...");
    let sentences = load_csv(Path::new(csv_path))?;
    println!("✓ Loaded {} sentences from CSV", sentences.len());

    // 2. Setup database
    println!("\n🔧 Setting up database...");
    let conn = open_database(settings)?;
    println!("✓ Database initialized with WAL mode");

    // 3. Index sentences
    println!("\n💾 Indexing sentences...");
    let parser = SpanishWordParser::new();
    let inserted = insert_sentences(&conn, &parser, &sentences)?;
    println!("✓ Inserted: {} sentences", inserted);
    println!("✓ Skipped: {}", sentences.len() - inserted);

    // 4. Verify count
    println!("\n🔍 Verifying database...");
    let count = verify_count(&conn)?;
    println!("✓ Database contains {} sentences", count);

    Ok(())
}

fn run_add(settings: &Settings, sentence: &str) -> Result<()> {
    let sentence = require_text(sentence, "sentence")?;
    let conn = open_database(settings)?;

    if add_sentence(&conn, &SpanishWordParser::new(), sentence)? {
        println!("✓ Added: {}", sentence);
    } else {
        println!("• Already stored: {}", sentence);
    }
    Ok(())
}

fn run_delete(settings: &Settings, sentence: &str) -> Result<()> {
    let sentence = require_text(sentence, "sentence")?;
    let conn = open_database(settings)?;

    delete_sentence(&conn, sentence)?;
    println!("✓ Deleted: {}", sentence);
    Ok(())
}

fn run_list(settings: &Settings) -> Result<()> {
    let conn = open_database(settings)?;
    let sentences = get_all_sentences(&conn)?;

    println!("📊 {} sentences\n", sentences.len());
    for stored in &sentences {
        println!("  {:<12} {:<10} {}", stored.stress.name(), stored.rhyme, stored.sentence);
    }
    Ok(())
}

fn run_rhyme(settings: &Settings, sentence: &str) -> Result<()> {
    let sentence = require_text(sentence, "sentence")?;
    let conn = open_database(settings)?;
    let defaults = settings.default_rhymes();

    let rhyme = get_rhyme(&conn, &SpanishWordParser::new(), sentence, defaults.pick(0))?;
    println!("{}", rhyme);
    Ok(())
}

fn run_analyze(args: &[String]) -> Result<()> {
    let Some(word) = args.first() else {
        bail!("Missing word\n\n{}", USAGE);
    };

    let analysis = SpanishWordParser::new().analyze(word)?;

    println!("🔎 {}", analysis.word);
    if let Some(spoken) = &analysis.spoken_as {
        println!("   spoken as:   {}", spoken);
    }
    println!("   syllables:   {}", analysis.syllables.join("-"));
    println!("   stress:      {} ({})", analysis.stress, analysis.stress_name);
    println!("   rhyme part:  {}", analysis.rhyme_part);
    println!("   phonetic:    {}", analysis.phonetic_rhyme_part);
    println!("   fingerprint: {}", analysis.fingerprint);
    Ok(())
}

fn run_check(args: &[String]) -> Result<()> {
    let [first, second] = args else {
        bail!("check needs exactly two words\n\n{}", USAGE);
    };

    let parser = SpanishWordParser::new();
    if parser.rhyme(first, second)? {
        println!("✅ {} / {} rhyme", first, second);
    } else {
        println!("❌ {} / {} do not rhyme", first, second);
    }
    Ok(())
}

fn run_number(args: &[String]) -> Result<()> {
    let Some(numeral) = args.first() else {
        bail!("Missing numeral\n\n{}", USAGE);
    };

    println!("{}", base_sound(numeral)?);
    Ok(())
}
