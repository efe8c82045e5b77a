//! Venue records and the CSV reader.
//!
//! Columns: name, address, link, region, latitude, longitude, hours.
//! Trailing columns are optional. Rows without a name or address are dropped.

use crate::i18n::Language;
use crate::location::Coordinate;
use crate::schedule::{self, Schedule};
use crate::source::{LoadError, Source};
use serde::Serialize;
use tracing::{debug, info};

/// One directory entry.
#[derive(Debug, Clone, Serialize)]
pub struct Venue {
    pub name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
    pub schedule: Option<Schedule>,
}

impl Venue {
    /// A venue with only the required fields.
    pub fn new(name: impl Into<String>, address: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            link: None,
            region: region.into(),
            lat: None,
            lng: None,
            hours: None,
            schedule: None,
        }
    }

    /// Set the raw hours and (re)attach the parsed schedule.
    pub fn with_hours(mut self, hours: impl Into<String>) -> Self {
        let hours = hours.into();
        self.schedule = schedule::parse_schedule(&hours);
        self.hours = Some(hours).filter(|h| !h.is_empty());
        self
    }

    /// Coordinates given in the data file, if both are present.
    pub fn explicit_coordinate(&self) -> Option<Coordinate> {
        Some(Coordinate::new(self.lat?, self.lng?))
    }

    /// Street part of the address (text before the first `", "`).
    pub fn street(&self) -> &str {
        self.address.split(", ").next().unwrap_or_default()
    }

    /// Everything after the street, if any.
    pub fn locality(&self) -> Option<String> {
        let rest: Vec<&str> = self.address.split(", ").skip(1).collect();
        if rest.is_empty() {
            None
        } else {
            Some(rest.join(", "))
        }
    }
}

/// Parse CSV text into venues. The first line is a header and is skipped.
/// `lang` picks the default region label for rows without one.
pub fn parse_csv(text: &str, lang: Language) -> Vec<Venue> {
    let mut venues = Vec::new();

    for (i, line) in text.trim().lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields = split_fields(line);
        let field = |idx: usize| fields.get(idx).map(String::as_str).unwrap_or_default();

        let name = field(0);
        let address = field(1);
        if name.is_empty() || address.is_empty() {
            debug!(line = i + 1, "skipping row without name or address");
            continue;
        }

        let region = match field(3) {
            "" => lang.messages().general_region,
            r => r,
        };
        let lat = field(4).parse::<f64>().ok().filter(|v| v.is_finite());
        let lng = field(5).parse::<f64>().ok().filter(|v| v.is_finite());

        let mut venue = Venue::new(name, address, region).with_hours(field(6));
        venue.link = Some(field(2).to_string()).filter(|l| !l.is_empty());
        venue.lat = lat;
        venue.lng = lng;
        venues.push(venue);
    }

    debug!(count = venues.len(), "parsed venues");
    venues
}

/// Split one CSV line. Commas inside double quotes do not separate fields;
/// the quotes themselves are dropped, and `""` inside a quoted field is a
/// literal quote. Fields are trimmed.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Fetch and parse the venues file.
pub fn load_venues(source: &Source, lang: Language) -> Result<Vec<Venue>, LoadError> {
    let text = source.fetch_text()?;
    let venues = parse_csv(&text, lang);
    info!(source = %source, count = venues.len(), "loaded venues");
    Ok(venues)
}
