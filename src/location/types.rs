//! Core types for the location subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

/// Which rule produced a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionSource {
    /// Latitude/longitude given in the data file.
    Explicit,
    /// Manual override table.
    Override,
    /// Linear interpolation along a street segment.
    Segment,
    /// Extrapolation from a street anchor along its bearing.
    Bearing,
    /// Curated street + number in Tel Aviv.
    KnownStreet,
    /// Curated full address in another city.
    KnownAddress,
    /// City centroid with random jitter.
    CityCentroid,
    /// Nothing matched.
    Fallback,
}

impl ResolutionSource {
    /// Whether the same address always resolves to the same point.
    pub fn is_deterministic(self) -> bool {
        self != Self::CityCentroid
    }
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit => write!(f, "Explicit"),
            Self::Override => write!(f, "Override"),
            Self::Segment => write!(f, "Segment"),
            Self::Bearing => write!(f, "Bearing"),
            Self::KnownStreet => write!(f, "Known street"),
            Self::KnownAddress => write!(f, "Known address"),
            Self::CityCentroid => write!(f, "City centroid"),
            Self::Fallback => write!(f, "Fallback"),
        }
    }
}

/// A resolved coordinate with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolved {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    pub source: ResolutionSource,
}

impl Resolved {
    pub fn new(coordinate: Coordinate, source: ResolutionSource) -> Self {
        Self { coordinate, source }
    }
}
