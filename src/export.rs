//! schema.org JSON-LD for search engines, and the localized meta description.

use crate::i18n::Language;
use crate::location::{city_of, AddressResolver};
use crate::schedule::{Schedule, WEEK};
use crate::venue::Venue;
use chrono::Weekday;
use rand::Rng;
use serde::Serialize;

const LIST_NAME: &str = "מקומות טבעוניים בישראל";
const LIST_DESCRIPTION: &str = "רשימה מקיפה של מקומות טבעוניים בישראל";
const KEYWORDS: [&str; 4] = ["vegan", "טבעוני", "plant-based", "צמחוני"];
/// Cities named in the meta description before "and more".
const META_CITIES: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct ItemList {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "numberOfItems")]
    pub number_of_items: usize,
    #[serde(rename = "itemListElement")]
    pub items: Vec<Restaurant>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub position: usize,
    pub name: String,
    pub address: PostalAddress,
    pub geo: GeoCoordinates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub serves_cuisine: &'static str,
    pub dietary_restriction: &'static str,
    pub keywords: [&'static str; 4],
    pub aggregate_rating: AggregateRating,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_hours_specification: Option<Vec<OpeningHoursSpecification>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub street_address: String,
    pub address_country: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeoCoordinates {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRating {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub rating_value: &'static str,
    pub review_count: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHoursSpecification {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub day_of_week: &'static str,
    pub opens: String,
    pub closes: String,
}

/// Build the ItemList. `None` when there are no venues.
///
/// Every venue is included: resolution always yields a coordinate.
pub fn structured_data<R: Rng>(venues: &[Venue], resolver: &mut AddressResolver<R>) -> Option<ItemList> {
    if venues.is_empty() {
        return None;
    }

    let items: Vec<Restaurant> = venues
        .iter()
        .enumerate()
        .map(|(i, venue)| {
            let resolved = resolver.resolve_venue(venue);
            Restaurant {
                kind: "Restaurant",
                position: i + 1,
                name: venue.name.clone(),
                address: PostalAddress {
                    kind: "PostalAddress",
                    street_address: venue.address.clone(),
                    address_country: "IL",
                },
                geo: GeoCoordinates {
                    kind: "GeoCoordinates",
                    latitude: resolved.coordinate.lat,
                    longitude: resolved.coordinate.lng,
                },
                url: venue.link.clone(),
                serves_cuisine: "Vegan",
                dietary_restriction: "VeganDiet",
                keywords: KEYWORDS,
                aggregate_rating: AggregateRating {
                    kind: "AggregateRating",
                    rating_value: "4.5",
                    review_count: "1",
                },
                opening_hours: venue.hours.clone(),
                opening_hours_specification: venue.schedule.as_ref().and_then(opening_hours_specification),
            }
        })
        .collect();

    Some(ItemList {
        context: "https://schema.org",
        kind: "ItemList",
        name: LIST_NAME,
        description: LIST_DESCRIPTION,
        number_of_items: items.len(),
        items,
    })
}

/// One entry per (day, range) in Mon..Sun order; `None` when every day is closed.
pub fn opening_hours_specification(schedule: &Schedule) -> Option<Vec<OpeningHoursSpecification>> {
    let spec: Vec<OpeningHoursSpecification> = WEEK
        .iter()
        .flat_map(|&day| {
            schedule.ranges(day).iter().map(move |r| OpeningHoursSpecification {
                kind: "OpeningHoursSpecification",
                day_of_week: schema_day(day),
                opens: r.opens.clone(),
                closes: r.closes.clone(),
            })
        })
        .collect();
    (!spec.is_empty()).then_some(spec)
}

fn schema_day(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Page description naming the venue count and the first few distinct cities.
pub fn meta_description(venues: &[Venue], lang: Language) -> String {
    let mut cities: Vec<String> = Vec::new();
    for v in venues {
        let city = city_of(&v.address, lang);
        if !cities.contains(&city) {
            cities.push(city);
        }
    }
    let named = cities.iter().take(META_CITIES).cloned().collect::<Vec<_>>().join(", ");

    match lang {
        Language::He => format!(
            "מדריך למקומות טבעוניים בישראל - {} מסעדות וברים טבעוניים ב{} ועוד",
            venues.len(),
            named
        ),
        Language::En => format!(
            "Guide to vegan places in Israel - {} vegan restaurants and cafes in {} and more",
            venues.len(),
            named
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Coordinate;

    fn venues() -> Vec<Venue> {
        let mut a = Venue::new("Cafe A", "הרצל 173, רחובות", "מרכז").with_hours("Sun-Thu 08:00-16:00, 18:00-22:00; Fri closed");
        a.link = Some("https://a.example".into());
        vec![
            a,
            Venue::new("B", "Dizengoff 50, Tel Aviv", "מרכז").with_hours("by appointment"),
            Venue::new("C", "Haifa", "צפון"),
            Venue::new("D", "אמירים", "צפון"),
            Venue::new("E", "תל אביב", "מרכז"),
        ]
    }

    #[test]
    fn test_empty_directory_has_no_structured_data() {
        assert!(structured_data(&[], &mut AddressResolver::seeded(1)).is_none());
    }

    #[test]
    fn test_item_list_shape() {
        let list = structured_data(&venues(), &mut AddressResolver::seeded(1)).unwrap();
        assert_eq!(list.number_of_items, 5);

        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["@type"], "ItemList");
        let first = &json["itemListElement"][0];
        assert_eq!(first["@type"], "Restaurant");
        assert_eq!(first["position"], 1);
        assert_eq!(first["address"]["addressCountry"], "IL");
        assert_eq!(first["geo"]["latitude"], 31.8947);
        assert_eq!(first["url"], "https://a.example");
        assert_eq!(first["aggregateRating"]["ratingValue"], "4.5");
        assert_eq!(first["openingHoursSpecification"].as_array().unwrap().len(), 10);
        assert_eq!(first["openingHoursSpecification"][0]["dayOfWeek"], "Monday");

        let second = &json["itemListElement"][1];
        assert_eq!(second["openingHours"], "by appointment");
        assert!(second.get("openingHoursSpecification").is_none());
        assert!(second.get("url").is_none());
    }

    #[test]
    fn test_explicit_coordinates_are_exported() {
        let v = Venue { lat: Some(29.55), lng: Some(34.95), ..Venue::new("X", "Eilat", "South") };
        let list = structured_data(&[v], &mut AddressResolver::seeded(1)).unwrap();
        let geo = &list.items[0].geo;
        assert_eq!(Coordinate::new(geo.latitude, geo.longitude), Coordinate::new(29.55, 34.95));
    }

    #[test]
    fn test_opening_hours_specification_order() {
        let schedule = crate::schedule::parse_schedule("Sun 10:00-12:00; Mon 09:00-17:00").unwrap();
        let spec = opening_hours_specification(&schedule).unwrap();
        let days: Vec<&str> = spec.iter().map(|s| s.day_of_week).collect();
        assert_eq!(days, vec!["Monday", "Sunday"]);
    }

    #[test]
    fn test_meta_description() {
        let he = meta_description(&venues(), Language::He);
        assert_eq!(he, "מדריך למקומות טבעוניים בישראל - 5 מסעדות וברים טבעוניים ברחובות, תל אביב, חיפה ועוד");

        let en = meta_description(&venues(), Language::En);
        assert_eq!(
            en,
            "Guide to vegan places in Israel - 5 vegan restaurants and cafes in רחובות, Tel Aviv, Haifa and more"
        );
    }
}
