//! File-based subscriber list at ~/.vegan-places/subscribers.json.
//!
//! A JSON array of `{name, email, ts}`. Emails are stored trimmed and
//! lowercased; at most one record per email.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub name: String,
    pub email: String,
    /// Milliseconds since the epoch.
    pub ts: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot encode subscriber list: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The subscriber store.
pub struct SubscriberStore {
    path: PathBuf,
    entries: Vec<Subscriber>,
}

/// Trim and lowercase an email for comparison and storage.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl SubscriberStore {
    /// Load from the default location (~/.vegan-places/subscribers.json).
    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    /// Load from a specific path. A missing or unreadable file is an empty list.
    pub fn load_from(path: PathBuf) -> Self {
        let entries = Self::read_file(&path).unwrap_or_default();
        Self { path, entries }
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".vegan-places")
            .join("subscribers.json")
    }

    fn read_file(path: &Path) -> Option<Vec<Subscriber>> {
        let data = fs::read_to_string(path).ok()?;
        serde_json::from_str(&data).ok()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, email: &str) -> bool {
        let email = normalize_email(email);
        self.entries.iter().any(|s| s.email == email)
    }

    /// Record a subscriber and persist. Returns `false` (and writes nothing)
    /// when the email is already present.
    pub fn add(&mut self, name: &str, email: &str) -> Result<bool, StoreError> {
        if self.contains(email) {
            return Ok(false);
        }
        self.entries.push(Subscriber {
            name: name.trim().to_string(),
            email: normalize_email(email),
            ts: chrono::Utc::now().timestamp_millis(),
        });
        self.persist()?;
        Ok(true)
    }

    /// Drop a subscriber and persist. Returns whether one was removed.
    pub fn remove(&mut self, email: &str) -> Result<bool, StoreError> {
        let email = normalize_email(email);
        let before = self.entries.len();
        self.entries.retain(|s| s.email != email);
        if self.entries.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    fn persist(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json).map_err(io_err)
    }

    pub fn subscribers(&self) -> &[Subscriber] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
