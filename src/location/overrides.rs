//! Manual coordinate overrides keyed by normalized address.
//!
//! Loaded once from an optional JSON object (`{"address": [lat, lng]}`).
//! A missing or broken resource is ignored.

use super::text::normalize;
use super::types::Coordinate;
use crate::source::Source;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info};

fn pair(value: &Value) -> Option<Coordinate> {
    match value.as_array()?.as_slice() {
        [lat, lng] => Some(Coordinate::new(lat.as_f64()?, lng.as_f64()?)).filter(Coordinate::is_finite),
        _ => None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    entries: HashMap<String, Coordinate>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of `address → [lat, lng]`. Keys are normalized on
    /// the way in; entries that are not a finite pair are skipped one by one.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, Value> = serde_json::from_str(json)?;
        let entries = raw
            .into_iter()
            .filter_map(|(key, value)| match pair(&value) {
                Some(c) => Some((normalize(&key), c)),
                None => {
                    debug!(key = %key, "skipping malformed override");
                    None
                }
            })
            .filter(|(key, _)| !key.is_empty())
            .collect();
        Ok(Self { entries })
    }

    /// Best-effort load. Any failure is logged at debug level and yields `None`.
    pub fn load(source: &Source) -> Option<Self> {
        let text = match source.fetch_text() {
            Ok(t) => t,
            Err(e) => {
                debug!(source = %source, error = %e, "overrides unavailable");
                return None;
            }
        };
        match Self::from_json(&text) {
            Ok(table) => {
                info!(source = %source, count = table.len(), "loaded address overrides");
                Some(table)
            }
            Err(e) => {
                debug!(source = %source, error = %e, "overrides are not valid JSON");
                None
            }
        }
    }

    pub fn insert(&mut self, address: &str, coordinate: Coordinate) {
        self.entries.insert(normalize(address), coordinate);
    }

    /// Exact lookup on the normalized address.
    pub fn get(&self, address: &str) -> Option<Coordinate> {
        if self.entries.is_empty() {
            return None;
        }
        self.entries.get(&normalize(address)).copied()
    }

    /// Add every entry of `other`; later entries replace earlier ones.
    pub fn merge(&mut self, other: OverrideTable) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
