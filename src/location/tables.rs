//! Built-in reference data: curated addresses, city centroids and city labels.
//!
//! Every table is an ordered priority list; the first matching entry wins.

use super::types::Coordinate;
use crate::i18n::Language;

/// Last resort: central Tel Aviv.
pub const FALLBACK: Coordinate = Coordinate::new(32.0853, 34.7818);

/// Tel Aviv street + number strings, matched as substrings of the address.
pub const KNOWN_TEL_AVIV_STREETS: &[(&str, Coordinate)] = &[
    ("פרישמן 54", Coordinate::new(32.0867, 34.7749)),
    ("דיזינגוף 130", Coordinate::new(32.0842, 34.7748)),
    ("פלורנטין 40", Coordinate::new(32.0577, 34.7667)),
    ("המלך ג'ורג 32", Coordinate::new(32.0667, 34.7667)),
    ("אחד העם 11", Coordinate::new(32.0667, 34.7725)),
    ("לבונטין 7", Coordinate::new(32.0577, 34.7667)),
    ("אבן גבירול 88", Coordinate::new(32.0808, 34.7801)),
    ("אבן גבירול 129", Coordinate::new(32.0842, 34.7801)),
    ("אלנבי 78", Coordinate::new(32.0642, 34.7692)),
    ("ירמיהו 17", Coordinate::new(32.0892, 34.7825)),
    ("אחד העם 8", Coordinate::new(32.0667, 34.7725)),
    ("דרך שלמה 3", Coordinate::new(32.0667, 34.7667)),
    ("החלוצים 8", Coordinate::new(32.0808, 34.7875)),
    ("צ'לנוב 27", Coordinate::new(32.0692, 34.7667)),
    ("דיזינגוף 140", Coordinate::new(32.0842, 34.7748)),
    ("שדרות וושינגטון 30", Coordinate::new(32.0642, 34.7692)),
    ("המסגר 38", Coordinate::new(32.0667, 34.7725)),
    ("דיזינגוף 50", Coordinate::new(32.0808, 34.7748)),
];

/// Full addresses outside Tel Aviv. Matched on the street part (before the
/// first comma) as a substring of the address.
pub const KNOWN_ADDRESSES: &[(&str, Coordinate)] = &[
    ("הרצל 173, רחובות", Coordinate::new(31.8947, 34.8134)),
    ("כצנלסון 49, גבעתיים", Coordinate::new(32.0719, 34.8106)),
    ("ויצמן 140, כפר סבא", Coordinate::new(32.1747, 34.9049)),
    ("נבטים 28, כרכור", Coordinate::new(32.5000, 34.9333)),
    ("המייסדים 26, פרדס חנה", Coordinate::new(32.4700, 34.9583)),
    ("דרך המצפה 5, קציר", Coordinate::new(32.4500, 35.0167)),
    ("המייסדים 41, זכרון יעקב", Coordinate::new(32.5700, 34.9383)),
    ("נתנזון 22, חיפה", Coordinate::new(32.7940, 34.9896)),
    ("נחל צינה 41, מצפה רמון", Coordinate::new(30.6094, 34.8017)),
    ("דרך העצמאות 74, בנימינה", Coordinate::new(32.5217, 34.9600)),
    ("שדרות מוריה 105, חיפה", Coordinate::new(32.7940, 34.9896)),
    ("עמל 1, רעננה", Coordinate::new(32.1847, 34.8783)),
    ("ביאליק 76, רמת גן", Coordinate::new(32.0719, 34.8225)),
    ("כצנלסון 14, כפר סבא", Coordinate::new(32.1747, 34.9049)),
    ("הנחשול 30, ראשון לציון", Coordinate::new(31.9730, 34.7925)),
];

/// Bilingual city centroids, matched against the lowercased address.
pub const CITY_CENTROIDS: &[(&str, Coordinate)] = &[
    ("tel aviv", Coordinate::new(32.0853, 34.7818)),
    ("תל אביב", Coordinate::new(32.0853, 34.7818)),
    ("jerusalem", Coordinate::new(31.7683, 35.2137)),
    ("ירושלים", Coordinate::new(31.7683, 35.2137)),
    ("haifa", Coordinate::new(32.7940, 34.9896)),
    ("חיפה", Coordinate::new(32.7940, 34.9896)),
    ("beer sheva", Coordinate::new(31.2518, 34.7915)),
    ("באר שבע", Coordinate::new(31.2518, 34.7915)),
    ("netanya", Coordinate::new(32.3215, 34.8532)),
    ("נתניה", Coordinate::new(32.3215, 34.8532)),
    ("ashdod", Coordinate::new(31.8044, 34.6553)),
    ("אשדוד", Coordinate::new(31.8044, 34.6553)),
    ("petah tikva", Coordinate::new(32.0878, 34.8873)),
    ("פתח תקווה", Coordinate::new(32.0878, 34.8873)),
    ("rishon lezion", Coordinate::new(31.9730, 34.7925)),
    ("ראשון לציון", Coordinate::new(31.9730, 34.7925)),
    ("amirim", Coordinate::new(32.9775, 35.4294)),
    ("אמירים", Coordinate::new(32.9775, 35.4294)),
    ("givat hashloshha", Coordinate::new(32.0542, 34.9208)),
    ("גבעת השלושה", Coordinate::new(32.0542, 34.9208)),
    ("kfar saba", Coordinate::new(32.1747, 34.9049)),
    ("כפר סבא", Coordinate::new(32.1747, 34.9049)),
    ("nir yafe", Coordinate::new(32.5333, 34.9833)),
    ("ניר יפה", Coordinate::new(32.5333, 34.9833)),
];

/// Hebrew-only centroids for smaller towns, matched case-sensitively
/// against the raw address.
pub const HEBREW_CITY_CENTROIDS: &[(&str, Coordinate)] = &[
    ("תל אביב", Coordinate::new(32.0853, 34.7818)),
    ("ירושלים", Coordinate::new(31.7683, 35.2137)),
    ("חיפה", Coordinate::new(32.7940, 34.9896)),
    ("אמירים", Coordinate::new(32.9775, 35.4294)),
    ("גבעת השלושה", Coordinate::new(32.0542, 34.9208)),
    ("כפר סבא", Coordinate::new(32.1747, 34.9049)),
    ("ניר יפה", Coordinate::new(32.5333, 34.9833)),
    ("רחובות", Coordinate::new(31.8947, 34.8134)),
    ("גבעתיים", Coordinate::new(32.0719, 34.8106)),
    ("כרכור", Coordinate::new(32.5000, 34.9333)),
    ("פרדס חנה", Coordinate::new(32.4700, 34.9583)),
    ("קציר", Coordinate::new(32.4500, 35.0167)),
    ("זכרון יעקב", Coordinate::new(32.5700, 34.9383)),
    ("אשדות יעקב מאוחד", Coordinate::new(32.6833, 35.6167)),
    ("מצפה רמון", Coordinate::new(30.6094, 34.8017)),
    ("בנימינה", Coordinate::new(32.5217, 34.9600)),
    ("רעננה", Coordinate::new(32.1847, 34.8783)),
    ("רמת גן", Coordinate::new(32.0719, 34.8225)),
    ("ראשון לציון", Coordinate::new(31.9730, 34.7925)),
];

/// A city name recognised in addresses, with its display labels.
pub struct CityLabel {
    pub keys: &'static [&'static str],
    pub he: &'static str,
    pub en: &'static str,
}

impl CityLabel {
    pub fn label(&self, lang: Language) -> &'static str {
        match lang {
            Language::He => self.he,
            Language::En => self.en,
        }
    }
}

pub const CITY_LABELS: &[CityLabel] = &[
    CityLabel { keys: &["tel aviv", "תל אביב"], he: "תל אביב", en: "Tel Aviv" },
    CityLabel { keys: &["jerusalem", "ירושלים"], he: "ירושלים", en: "Jerusalem" },
    CityLabel { keys: &["haifa", "חיפה"], he: "חיפה", en: "Haifa" },
    CityLabel { keys: &["beer sheva", "באר שבע"], he: "באר שבע", en: "Beer Sheva" },
    CityLabel { keys: &["netanya", "נתניה"], he: "נתניה", en: "Netanya" },
    CityLabel { keys: &["ashdod", "אשדוד"], he: "אשדוד", en: "Ashdod" },
    CityLabel { keys: &["petah tikva", "פתח תקווה"], he: "פתח תקווה", en: "Petah Tikva" },
    CityLabel { keys: &["rishon lezion", "ראשון לציון"], he: "ראשון לציון", en: "Rishon LeZion" },
    CityLabel { keys: &["amirim", "אמירים"], he: "אמירים", en: "Amirim" },
    CityLabel { keys: &["givat hashloshha", "גבעת השלושה"], he: "גבעת השלושה", en: "Givat HaShloshha" },
    CityLabel { keys: &["kfar saba", "כפר סבא"], he: "כפר סבא", en: "Kfar Saba" },
    CityLabel { keys: &["nir yafe", "ניר יפה"], he: "ניר יפה", en: "Nir Yafe" },
];

/// First curated Tel Aviv street + number contained in the address.
pub fn known_street_lookup(address: &str) -> Option<(&'static str, Coordinate)> {
    KNOWN_TEL_AVIV_STREETS
        .iter()
        .find(|(street, _)| address.contains(street))
        .copied()
}

/// First curated full address whose street part is contained in the address.
pub fn known_address_lookup(address: &str) -> Option<(&'static str, Coordinate)> {
    KNOWN_ADDRESSES
        .iter()
        .find(|(full, _)| {
            let street = full.split(',').next().unwrap_or(full);
            address.contains(street)
        })
        .copied()
}

/// City centroid: bilingual table on the lowercased address first, then the
/// Hebrew table on the raw address.
pub fn city_centroid_lookup(address: &str) -> Option<(&'static str, Coordinate)> {
    let lower = address.to_lowercase();
    CITY_CENTROIDS
        .iter()
        .find(|(city, _)| lower.contains(city))
        .or_else(|| HEBREW_CITY_CENTROIDS.iter().find(|(city, _)| address.contains(city)))
        .copied()
}

/// Display name of the city an address belongs to.
///
/// Known cities map to their localized label; otherwise the last
/// comma-separated part, or the whole address when it has no comma.
pub fn city_of(address: &str, lang: Language) -> String {
    let lower = address.trim().to_lowercase();
    if let Some(city) = CITY_LABELS
        .iter()
        .find(|c| c.keys.iter().any(|k| lower.contains(k) || address.contains(k)))
    {
        return city.label(lang).to_string();
    }

    match address.rsplit_once(',') {
        Some((_, last)) => last.trim().to_string(),
        None => address.trim().to_string(),
    }
}
