//! Address resolver: orchestrates the heuristic fallback chain.
//!
//! Override → Tel Aviv street segment → Tel Aviv street bearing →
//! curated Tel Aviv street → curated address → city centroid (jittered) → fallback.
//!
//! Resolution never fails; the worst case is the fixed fallback point.

use super::overrides::OverrideTable;
use super::streets;
use super::tables;
use super::types::{Coordinate, ResolutionSource, Resolved};
use crate::venue::Venue;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Jitter amplitude in degrees for a bare city name.
pub const CITY_ONLY_JITTER: f64 = 0.02;
/// Jitter amplitude in degrees when the address has a number or a comma.
pub const ADDRESS_JITTER: f64 = 0.005;

/// The address resolver with its override table and jitter source.
pub struct AddressResolver<R: Rng = StdRng> {
    overrides: OverrideTable,
    rng: R,
}

impl AddressResolver<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Deterministic jitter, for tests and reproducible CLI output.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for AddressResolver<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> AddressResolver<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            overrides: OverrideTable::new(),
            rng,
        }
    }

    pub fn with_overrides(mut self, overrides: OverrideTable) -> Self {
        self.overrides = overrides;
        self
    }

    /// Merge late-arriving overrides. Earlier resolutions are not revisited.
    pub fn merge_overrides(&mut self, overrides: OverrideTable) {
        self.overrides.merge(overrides);
    }

    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }

    /// Resolve a free-text address through the full fallback chain.
    pub fn resolve(&mut self, address: &str) -> Resolved {
        // 1. Manual overrides
        if let Some(c) = self.overrides.get(address) {
            debug!(address, "override hit");
            return Resolved::new(c, ResolutionSource::Override);
        }

        // 2-3. Street models (Tel Aviv only)
        if let Some(r) = streets::resolve_tel_aviv(address) {
            return r;
        }

        // 4a. Curated Tel Aviv street + number
        if let Some((street, c)) = tables::known_street_lookup(address) {
            debug!(address, street, "curated street");
            return Resolved::new(c, ResolutionSource::KnownStreet);
        }

        // 4b. Curated full addresses elsewhere
        if let Some((full, c)) = tables::known_address_lookup(address) {
            debug!(address, matched = full, "curated address");
            return Resolved::new(c, ResolutionSource::KnownAddress);
        }

        // 5. City centroid with jitter
        if let Some((city, centroid)) = tables::city_centroid_lookup(address) {
            let amplitude = jitter_amplitude(address);
            let c = Coordinate::new(
                centroid.lat + (self.rng.random::<f64>() - 0.5) * amplitude,
                centroid.lng + (self.rng.random::<f64>() - 0.5) * amplitude,
            );
            debug!(address, city, amplitude, "city centroid");
            return Resolved::new(c, ResolutionSource::CityCentroid);
        }

        debug!(address, "no rule matched, using fallback");
        Resolved::new(tables::FALLBACK, ResolutionSource::Fallback)
    }

    /// Coordinates for a venue: explicit data-file coordinates win,
    /// otherwise the address is resolved.
    pub fn resolve_venue(&mut self, venue: &Venue) -> Resolved {
        match venue.explicit_coordinate() {
            Some(c) => Resolved::new(c, ResolutionSource::Explicit),
            None => self.resolve(&venue.address),
        }
    }
}

/// Bare city names get a wider spread than street addresses.
fn jitter_amplitude(address: &str) -> f64 {
    let city_only = !address.chars().any(|c| c.is_ascii_digit()) && !address.contains(',');
    if city_only {
        CITY_ONLY_JITTER
    } else {
        ADDRESS_JITTER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn within(c: Coordinate, center: Coordinate, amplitude: f64) -> bool {
        let half = amplitude / 2.0 + 1e-9;
        (c.lat - center.lat).abs() <= half && (c.lng - center.lng).abs() <= half
    }

    #[test]
    fn test_override_wins() {
        let mut overrides = OverrideTable::new();
        overrides.insert("דיזינגוף 120, תל אביב", Coordinate::new(1.0, 2.0));
        let mut resolver = AddressResolver::seeded(1).with_overrides(overrides);

        let r = resolver.resolve("דיזינגוף  120, תל אביב");
        assert_eq!(r.source, ResolutionSource::Override);
        assert_eq!(r.coordinate, Coordinate::new(1.0, 2.0));
    }

    #[test]
    fn test_segment_before_curated_street() {
        // "דיזינגוף 130" is in the curated table, but the segment model answers first.
        let mut resolver = AddressResolver::seeded(1);
        let r = resolver.resolve("דיזינגוף 130, תל אביב");
        assert_eq!(r.source, ResolutionSource::Segment);
    }

    #[test]
    fn test_curated_street_without_city() {
        let mut resolver = AddressResolver::seeded(1);
        let r = resolver.resolve("פלורנטין 40");
        assert_eq!(r.source, ResolutionSource::KnownStreet);
        assert_eq!(r.coordinate, Coordinate::new(32.0577, 34.7667));
    }

    #[test]
    fn test_curated_address() {
        let mut resolver = AddressResolver::seeded(1);
        let r = resolver.resolve("הרצל 173, רחובות");
        assert_eq!(r.source, ResolutionSource::KnownAddress);
        assert_eq!(r.coordinate, Coordinate::new(31.8947, 34.8134));
    }

    #[test]
    fn test_city_only_jitter_radius() {
        let center = Coordinate::new(31.7683, 35.2137);
        let mut resolver = AddressResolver::seeded(7);
        for _ in 0..50 {
            let r = resolver.resolve("Jerusalem");
            assert_eq!(r.source, ResolutionSource::CityCentroid);
            assert!(!r.source.is_deterministic());
            assert!(within(r.coordinate, center, CITY_ONLY_JITTER));
        }
    }

    #[test]
    fn test_street_address_jitter_radius() {
        let center = Coordinate::new(32.5217, 34.9600);
        let mut resolver = AddressResolver::seeded(7);
        for _ in 0..50 {
            let r = resolver.resolve("הדקל 3, בנימינה");
            assert_eq!(r.source, ResolutionSource::CityCentroid);
            assert!(within(r.coordinate, center, ADDRESS_JITTER));
        }
    }

    #[test]
    fn test_segment_resolution_is_repeatable() {
        let mut resolver = AddressResolver::seeded(11);
        let first = resolver.resolve("דיזינגוף 120, תל אביב");
        assert!(first.source.is_deterministic());

        let haifa = resolver.resolve("Haifa");
        assert_eq!(haifa.source, ResolutionSource::CityCentroid);

        let second = resolver.resolve("דיזינגוף 120, תל אביב");
        assert_eq!(first, second);
    }

    #[test]
    fn test_same_seed_same_jitter() {
        let a = AddressResolver::seeded(42).resolve("Haifa");
        let b = AddressResolver::seeded(42).resolve("Haifa");
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_address_falls_back() {
        let mut resolver = AddressResolver::seeded(1);
        let r = resolver.resolve("Eilat");
        assert_eq!(r.source, ResolutionSource::Fallback);
        assert_eq!(r.coordinate, tables::FALLBACK);
    }

    #[test]
    fn test_late_overrides_merge() {
        let mut resolver = AddressResolver::seeded(1);
        assert_eq!(resolver.resolve("Eilat").source, ResolutionSource::Fallback);

        let mut late = OverrideTable::new();
        late.insert("eilat", Coordinate::new(29.55, 34.95));
        resolver.merge_overrides(late);
        assert_eq!(resolver.resolve("Eilat").source, ResolutionSource::Override);
    }

    #[test]
    fn test_explicit_venue_coordinates() {
        let mut venue = Venue::new("X", "Eilat", "South");
        venue.lat = Some(29.55);
        venue.lng = Some(34.95);
        let r = AddressResolver::seeded(1).resolve_venue(&venue);
        assert_eq!(r.source, ResolutionSource::Explicit);
        assert_eq!(r.coordinate, Coordinate::new(29.55, 34.95));
    }

    #[test]
    fn test_jitter_amplitude() {
        assert_eq!(jitter_amplitude("Haifa"), CITY_ONLY_JITTER);
        assert_eq!(jitter_amplitude("Main, Haifa"), ADDRESS_JITTER);
        assert_eq!(jitter_amplitude("Main 5 Haifa"), ADDRESS_JITTER);
    }
}
