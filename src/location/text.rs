//! Address text helpers shared by the override table and the street models.

use once_cell::sync::Lazy;
use regex::Regex;

/// Street name (Hebrew/Latin letters, spaces, quote marks, dots, dashes)
/// followed by a house number.
static STREET_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([\x{0590}-\x{05FF}a-zA-Z\s"׳'’.\-]+?)\s+([0-9]{1,4})"#).unwrap()
});

const QUOTE_MARKS: [char; 4] = ['"', '\'', '׳', '’'];

/// Strip quote marks, collapse whitespace, trim and lowercase.
/// Used for override keys and street names alike.
pub fn normalize(s: &str) -> String {
    s.replace(QUOTE_MARKS, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Pull the first `(street, house number)` pair out of an address,
/// e.g. `"דיזינגוף 120, תל אביב"` → `("דיזינגוף", 120)`.
pub fn street_and_number(address: &str) -> Option<(String, u32)> {
    let caps = STREET_NUMBER.captures(address)?;
    let number = caps[2].parse().ok()?;
    Some((caps[1].trim().to_string(), number))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  המלך ג'ורג   32 "), "המלך גורג 32");
        assert_eq!(normalize("King  George’s\t10"), "king georges 10");
        assert_eq!(normalize("צ׳לנוב \"27\""), "צלנוב 27");
    }

    #[test]
    fn test_street_and_number_hebrew() {
        assert_eq!(
            street_and_number("דיזינגוף 120, תל אביב"),
            Some(("דיזינגוף".to_string(), 120))
        );
        assert_eq!(
            street_and_number("אבן גבירול 88 תל אביב"),
            Some(("אבן גבירול".to_string(), 88))
        );
    }

    #[test]
    fn test_street_and_number_latin() {
        assert_eq!(
            street_and_number("Ben Yehuda 45, Tel Aviv"),
            Some(("Ben Yehuda".to_string(), 45))
        );
    }

    #[test]
    fn test_no_number() {
        assert_eq!(street_and_number("תל אביב"), None);
        assert_eq!(street_and_number("Amirim"), None);
    }
}
