// ⚙️ Settings - optional TOML file overlaid with RHYMESTORE__* environment variables
//
// Every key has a default, so running without any file works:
//
//   [database]  path = "rhymes.db"
//   [server]    address = "0.0.0.0", port = 3000
//   [rhymes]    default_rhymes = ["Patada en los cojones"], max_reply_length = 140
//   [log]       level = "info"
//
// RHYMESTORE__SERVER__PORT=8080 overrides server.port; lists are comma separated.

use crate::parser::{DefaultRhymes, DEFAULT_RHYME};
use crate::reply::MAX_REPLY_LENGTH;
use anyhow::{bail, Context, Result};
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "rhyme-store.toml";
pub const ENV_PREFIX: &str = "RHYMESTORE";

// ============================================================================
// SETTINGS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
    pub rhymes: RhymeSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub path: PathBuf,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: PathBuf::from("rhymes.db"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub address: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            address: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RhymeSettings {
    pub default_rhymes: Vec<String>,
    pub max_reply_length: usize,
}

impl Default for RhymeSettings {
    fn default() -> Self {
        RhymeSettings {
            default_rhymes: vec![DEFAULT_RHYME.to_string()],
            max_reply_length: MAX_REPLY_LENGTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            level: "info".to_string(),
        }
    }
}

// ============================================================================
// LOADING
// ============================================================================

impl Settings {
    /// Load settings from `path` (or `rhyme-store.toml` in the working
    /// directory) plus the process environment.
    ///
    /// The default file may be missing; an explicitly given one may not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(path, None)
    }

    /// Same as `load`, reading `RHYMESTORE__*` variables from `env` instead of
    /// the process environment when given
    pub fn load_from(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let (file, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let settings: Settings = Config::builder()
            .add_source(File::from(file.as_path()).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("rhymes.default_rhymes")
                    .source(env),
            )
            .build()
            .with_context(|| format!("Failed to read settings from {}", file.display()))?
            .try_deserialize()
            .context("Failed to deserialize settings")?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.rhymes.max_reply_length == 0 {
            bail!("rhymes.max_reply_length must be greater than zero");
        }
        if self.server.address.trim().is_empty() {
            bail!("server.address cannot be empty");
        }
        Ok(())
    }

    /// "address:port" for the HTTP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.address, self.server.port)
    }

    pub fn default_rhymes(&self) -> DefaultRhymes {
        DefaultRhymes::new(self.rhymes.default_rhymes.clone())
    }
}

// ============================================================================
// TESTS
// ============================================================================
