//! Runtime settings at ~/.vegan-places/config.json.
//!
//! Every field has a default, so a missing file or a partial one is fine.
//! Command-line flags override what is loaded here.

use crate::contact::EmailJsConfig;
use crate::i18n::Language;
use crate::source::Source;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Venues CSV, path or URL.
    pub data: Source,
    /// Address overrides JSON, path or URL.
    pub overrides: Source,
    pub language: Language,
    pub emailjs: EmailJsConfig,
    /// Subscriber list; `None` means ~/.vegan-places/subscribers.json.
    pub subscribers: Option<PathBuf>,
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: Source::parse("places.csv"),
            overrides: Source::parse("telaviv_overrides.json"),
            language: Language::default(),
            emailjs: EmailJsConfig::default(),
            subscribers: None,
            host: "127.0.0.1".into(),
            port: 3000,
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".vegan-places")
            .join("config.json")
    }

    /// Load from the default location, or defaults when there is no file.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from a specific file. Unlike [`Config::load`], a missing file is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn subscribers_path(&self) -> PathBuf {
        self.subscribers
            .clone()
            .unwrap_or_else(crate::contact::SubscriberStore::default_path)
    }
}
