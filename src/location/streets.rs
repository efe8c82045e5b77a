//! Tel Aviv street models.
//!
//! Two models, tried in order:
//! - segments: house-number range mapped linearly onto a start→end line;
//! - bearings: an anchor point plus a street direction, extrapolated by
//!   house number. Coarser, but covers more streets.
//!
//! Both are approximate; precision comes from the override table.

use super::text::{normalize, street_and_number};
use super::types::{Coordinate, ResolutionSource, Resolved};
use tracing::debug;

/// Degrees moved per house number in the bearing model.
pub const BEARING_STEP_DEG: f64 = 0.000012;
/// House numbers outside `1..=MAX_BEARING_NUMBER` are not extrapolated.
pub const MAX_BEARING_NUMBER: u32 = 800;

const CITY_NAMES: [&str; 2] = ["תל אביב", "tel aviv"];

/// A street stretch with a known house-number range.
pub struct StreetSegment {
    pub names: &'static [&'static str],
    pub min: u32,
    pub max: u32,
    pub start: Coordinate,
    pub end: Coordinate,
}

impl StreetSegment {
    pub fn covers(&self, number: u32) -> bool {
        (self.min..=self.max).contains(&number)
    }

    pub fn interpolate(&self, number: u32) -> Coordinate {
        let ratio = f64::from(number - self.min) / f64::from(self.max - self.min);
        Coordinate::new(
            self.start.lat + (self.end.lat - self.start.lat) * ratio,
            self.start.lng + (self.end.lng - self.start.lng) * ratio,
        )
    }
}

/// A street anchor with an approximate direction.
/// Bearing is in degrees from east, counter-clockwise: 0 = along increasing
/// longitude, 90 = along increasing latitude.
pub struct BearingModel {
    pub names: &'static [&'static str],
    pub anchor: Coordinate,
    pub bearing: f64,
    pub base: u32,
}

impl BearingModel {
    pub fn extrapolate(&self, number: u32) -> Option<Coordinate> {
        if !(1..=MAX_BEARING_NUMBER).contains(&number) {
            return None;
        }
        let distance = (f64::from(number) - f64::from(self.base)) * BEARING_STEP_DEG;
        let rad = self.bearing.to_radians();
        let dx = rad.cos() * distance;
        let dy = rad.sin() * distance;
        let scale = self.anchor.lat.to_radians().cos();
        let scale = if scale == 0.0 { 1.0 } else { scale };
        Some(Coordinate::new(self.anchor.lat + dy, self.anchor.lng + dx / scale))
    }
}

pub const TEL_AVIV_SEGMENTS: &[StreetSegment] = &[
    StreetSegment {
        names: &["אבן גבירול", "ibn gvirol"],
        min: 1, max: 200,
        start: Coordinate::new(32.0719, 34.7799), end: Coordinate::new(32.0942, 34.7825),
    },
    StreetSegment {
        names: &["דיזינגוף", "dizengoff", "דיזנגוף"],
        min: 1, max: 300,
        start: Coordinate::new(32.0639, 34.7710), end: Coordinate::new(32.0960, 34.7749),
    },
    StreetSegment {
        names: &["אלנבי", "allenby"],
        min: 1, max: 150,
        start: Coordinate::new(32.0614, 34.7700), end: Coordinate::new(32.0729, 34.7677),
    },
    StreetSegment {
        names: &["רוטשילד", "rothschild"],
        min: 1, max: 200,
        start: Coordinate::new(32.0590, 34.7721), end: Coordinate::new(32.0738, 34.7802),
    },
    StreetSegment {
        names: &["בן יהודה", "ben yehuda"],
        min: 1, max: 250,
        start: Coordinate::new(32.0667, 34.7660), end: Coordinate::new(32.1000, 34.7691),
    },
    StreetSegment {
        names: &["פרישמן", "frishman"],
        min: 1, max: 120,
        start: Coordinate::new(32.0803, 34.7681), end: Coordinate::new(32.0806, 34.7769),
    },
    StreetSegment {
        names: &["בוגרשוב", "bograshov"],
        min: 1, max: 120,
        start: Coordinate::new(32.0773, 34.7679), end: Coordinate::new(32.0775, 34.7758),
    },
];

pub const TEL_AVIV_BEARINGS: &[BearingModel] = &[
    BearingModel { names: &["דיזינגוף", "dizengoff", "דיזנגוף"], anchor: Coordinate::new(32.0809, 34.7736), bearing: 5.0, base: 1 },
    BearingModel { names: &["אבן גבירול", "ibn gvirol", "אבן גבריאל", "ibn gabirol"], anchor: Coordinate::new(32.0799, 34.7813), bearing: 1.0, base: 1 },
    BearingModel { names: &["אלנבי", "allenby"], anchor: Coordinate::new(32.0676, 34.7702), bearing: -5.0, base: 1 },
    BearingModel { names: &["המלך ג׳ורג", "המלך ג'ורג", "king george", "מלך ג׳ורג"], anchor: Coordinate::new(32.0707, 34.7741), bearing: -10.0, base: 1 },
    BearingModel { names: &["רוטשילד", "rothschild"], anchor: Coordinate::new(32.0648, 34.7767), bearing: -15.0, base: 1 },
    BearingModel { names: &["פרישמן", "frishman"], anchor: Coordinate::new(32.0803, 34.7728), bearing: -85.0, base: 1 },
    BearingModel { names: &["בוגרשוב", "bograshov"], anchor: Coordinate::new(32.0773, 34.7705), bearing: -85.0, base: 1 },
    BearingModel { names: &["בן יהודה", "ben yehuda"], anchor: Coordinate::new(32.0815, 34.7682), bearing: 4.0, base: 1 },
    BearingModel { names: &["שינקין", "sheinkin", "שינקיין"], anchor: Coordinate::new(32.0685, 34.7725), bearing: -80.0, base: 1 },
    BearingModel { names: &["ירמיהו", "yirmiyahu"], anchor: Coordinate::new(32.0900, 34.7821), bearing: 0.0, base: 1 },
    BearingModel { names: &["באזל", "basel"], anchor: Coordinate::new(32.0895, 34.7779), bearing: 100.0, base: 1 },
    BearingModel { names: &["לוונטין", "levontin", "לבונטין"], anchor: Coordinate::new(32.0615, 34.7754), bearing: -70.0, base: 1 },
    BearingModel { names: &["נחלת בנימין", "nahalat benyamin", "nahalat benjamin"], anchor: Coordinate::new(32.0662, 34.7706), bearing: -10.0, base: 1 },
    BearingModel { names: &["הארבעה", "haarbaa", "ha'arbaa"], anchor: Coordinate::new(32.0717, 34.7869), bearing: 90.0, base: 1 },
    BearingModel { names: &["ארלוזורוב", "arlozorov"], anchor: Coordinate::new(32.0884, 34.7827), bearing: 90.0, base: 1 },
    BearingModel { names: &["וושינגטון", "washington"], anchor: Coordinate::new(32.0568, 34.7702), bearing: 100.0, base: 1 },
    BearingModel { names: &["המסגר", "hamasguer"], anchor: Coordinate::new(32.0617, 34.7811), bearing: 15.0, base: 1 },
];

/// Whether the address names Tel Aviv, in either script.
pub fn is_tel_aviv(address: &str) -> bool {
    let lower = address.to_lowercase();
    CITY_NAMES.iter().any(|c| lower.contains(c))
}

fn alias_matches(names: &[&str], normalized_street: &str) -> bool {
    names.iter().any(|n| normalized_street.contains(&normalize(n)))
}

/// First segment whose alias matches and whose range covers the number.
pub fn segment_lookup(normalized_street: &str, number: u32) -> Option<Coordinate> {
    TEL_AVIV_SEGMENTS
        .iter()
        .filter(|seg| alias_matches(seg.names, normalized_street))
        .find(|seg| seg.covers(number))
        .map(|seg| seg.interpolate(number))
}

/// First bearing model whose alias matches, extrapolated by house number.
pub fn bearing_lookup(normalized_street: &str, number: u32) -> Option<Coordinate> {
    TEL_AVIV_BEARINGS
        .iter()
        .find(|m| alias_matches(m.names, normalized_street))?
        .extrapolate(number)
}

/// Street-model resolution for Tel Aviv addresses: segment first, then bearing.
pub fn resolve_tel_aviv(address: &str) -> Option<Resolved> {
    if !is_tel_aviv(address) {
        return None;
    }
    let (street, number) = street_and_number(address)?;
    let street = normalize(&street);

    if let Some(c) = segment_lookup(&street, number) {
        debug!(address, street = %street, number, "segment interpolation");
        return Some(Resolved::new(c, ResolutionSource::Segment));
    }

    let c = bearing_lookup(&street, number)?;
    debug!(address, street = %street, number, "bearing extrapolation");
    Some(Resolved::new(c, ResolutionSource::Bearing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_segment_endpoints_and_midpoint() {
        let seg = &TEL_AVIV_SEGMENTS[1]; // Dizengoff, 1..=300
        assert_eq!(seg.interpolate(1), seg.start);
        let end = seg.interpolate(300);
        assert_abs_diff_eq!(end.lat, seg.end.lat, epsilon = 1e-12);
        assert_abs_diff_eq!(end.lng, seg.end.lng, epsilon = 1e-12);

        let ratio = 149.0 / 299.0;
        let mid = seg.interpolate(150);
        assert_abs_diff_eq!(mid.lat, 32.0639 + (32.0960 - 32.0639) * ratio, epsilon = 1e-12);
        assert_abs_diff_eq!(mid.lng, 34.7710 + (34.7749 - 34.7710) * ratio, epsilon = 1e-12);
    }

    #[test]
    fn test_resolve_segment_hebrew() {
        let r = resolve_tel_aviv("דיזינגוף 120, תל אביב").unwrap();
        assert_eq!(r.source, ResolutionSource::Segment);
        assert_eq!(r.coordinate, TEL_AVIV_SEGMENTS[1].interpolate(120));
    }

    #[test]
    fn test_resolve_segment_latin_case_insensitive() {
        let r = resolve_tel_aviv("Rothschild 22, TEL AVIV").unwrap();
        assert_eq!(r.source, ResolutionSource::Segment);
        assert_eq!(r.coordinate, TEL_AVIV_SEGMENTS[3].interpolate(22));
    }

    #[test]
    fn test_out_of_range_segment_falls_to_bearing() {
        // Allenby segment stops at 150; the bearing model still places it.
        let r = resolve_tel_aviv("אלנבי 160, תל אביב").unwrap();
        assert_eq!(r.source, ResolutionSource::Bearing);
    }

    #[test]
    fn test_bearing_math() {
        let model = &TEL_AVIV_BEARINGS[9]; // Yirmiyahu, bearing 0: pure east-west
        let c = model.extrapolate(11).unwrap();
        let distance = 10.0 * BEARING_STEP_DEG;
        assert_abs_diff_eq!(c.lat, model.anchor.lat, epsilon = 1e-12);
        assert_abs_diff_eq!(
            c.lng,
            model.anchor.lng + distance / model.anchor.lat.to_radians().cos(),
            epsilon = 1e-12
        );

        let north = &TEL_AVIV_BEARINGS[14]; // Arlozorov, bearing 90: pure north-south
        let c = north.extrapolate(101).unwrap();
        assert_abs_diff_eq!(c.lat, north.anchor.lat + 100.0 * BEARING_STEP_DEG, epsilon = 1e-12);
        assert_abs_diff_eq!(c.lng, north.anchor.lng, epsilon = 1e-9);
    }

    #[test]
    fn test_bearing_rejects_out_of_range_numbers() {
        assert!(TEL_AVIV_BEARINGS[0].extrapolate(0).is_none());
        assert!(TEL_AVIV_BEARINGS[0].extrapolate(801).is_none());
        assert!(TEL_AVIV_BEARINGS[0].extrapolate(800).is_some());
        assert!(resolve_tel_aviv("שינקין 900, תל אביב").is_none());
    }

    #[test]
    fn test_quote_variants_match_king_george() {
        let a = resolve_tel_aviv("המלך ג'ורג 32, תל אביב").unwrap();
        let b = resolve_tel_aviv("המלך ג׳ורג 32, תל אביב").unwrap();
        assert_eq!(a.source, ResolutionSource::Bearing);
        assert_eq!(a.coordinate, b.coordinate);
    }

    #[test]
    fn test_other_cities_are_ignored() {
        assert!(resolve_tel_aviv("הרצל 173, רחובות").is_none());
        assert!(resolve_tel_aviv("תל אביב").is_none());
        assert!(resolve_tel_aviv("רחוב לא מוכר 5, תל אביב").is_none());
    }
}
