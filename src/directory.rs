//! The venue directory: filtering, region/city grouping and the view models
//! for the list and the map.
//!
//! View functions are pure. They take the venues, an explicit [`ViewState`]
//! and a [`StatusBoard`] (open/closed evaluated at one instant), and return
//! serializable structures; nothing here renders markup.

use crate::hours_label::{self, CondensedLabel};
use crate::i18n::Language;
use crate::location::{city_of, AddressResolver, Coordinate, ResolutionSource};
use crate::schedule;
use crate::source::{LoadError, Source};
use crate::venue::{self, Venue};
use chrono::{Datelike, NaiveDateTime};
use rand::Rng;
use serde::Serialize;
use std::borrow::Cow;
use tracing::debug;

/// Map view when there is nothing to fit: central Israel.
pub const DEFAULT_CENTER: Coordinate = Coordinate::new(31.5, 34.8);
pub const DEFAULT_ZOOM: u8 = 8;
/// Fraction of the bounds' span added on each side.
pub const BOUNDS_PADDING: f64 = 0.1;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("failed to load venues: {0}")]
    Load(#[from] LoadError),
}

impl DirectoryError {
    /// What the user sees instead of the list.
    pub fn user_message(&self, lang: Language) -> &'static str {
        match self {
            Self::Load(_) => lang.messages().load_error,
        }
    }
}

/// Everything the views depend on besides the venues themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub language: Language,
    pub search: String,
    pub open_only: bool,
    pub expanded: bool,
}

impl ViewState {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    /// Lowercased, trimmed search term; `None` when empty.
    fn search_term(&self) -> Option<String> {
        let term = self.search.trim().to_lowercase();
        (!term.is_empty()).then_some(term)
    }
}

/// Open/closed status of every venue at one instant, index-aligned with
/// the directory's venues.
#[derive(Debug, Clone, Serialize)]
pub struct StatusBoard {
    pub at: NaiveDateTime,
    open: Vec<Option<bool>>,
}

impl StatusBoard {
    pub fn compute(venues: &[Venue], at: NaiveDateTime) -> Self {
        let open = venues
            .iter()
            .map(|v| schedule::is_open_at(v.schedule.as_ref(), at))
            .collect();
        Self { at, open }
    }

    pub fn status(&self, index: usize) -> Option<bool> {
        self.open.get(index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn open_count(&self) -> usize {
        self.open.iter().filter(|s| **s == Some(true)).count()
    }
}

/// The loaded venues. Replaced wholesale on reload.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    venues: Vec<Venue>,
}

impl Directory {
    pub fn new(venues: Vec<Venue>) -> Self {
        Self { venues }
    }

    pub fn load(source: &Source, lang: Language) -> Result<Self, DirectoryError> {
        let venues = venue::load_venues(source, lang)?;
        Ok(Self::new(venues))
    }

    pub fn venues(&self) -> &[Venue] {
        &self.venues
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    pub fn status_board(&self, at: NaiveDateTime) -> StatusBoard {
        StatusBoard::compute(&self.venues, at)
    }

    /// Statuses from `board`, or recomputed at the same instant when the board
    /// was built for a different venue list.
    fn statuses<'a>(&self, board: &'a StatusBoard) -> Cow<'a, StatusBoard> {
        if board.len() == self.venues.len() {
            Cow::Borrowed(board)
        } else {
            debug!(board = board.len(), venues = self.venues.len(), "stale status board");
            Cow::Owned(self.status_board(board.at))
        }
    }

    /// Indices of venues passing the search and open-now filters.
    pub fn filter(&self, state: &ViewState, board: &StatusBoard) -> Vec<usize> {
        let board = self.statuses(board);
        let term = state.search_term();
        self.venues
            .iter()
            .enumerate()
            .filter(|(_, v)| term.as_deref().map_or(true, |t| matches_search(v, t)))
            .filter(|(i, _)| !state.open_only || board.status(*i) == Some(true))
            .map(|(i, _)| i)
            .collect()
    }

    /// Grouped list view of the filtered venues.
    pub fn list_view(&self, state: &ViewState, board: &StatusBoard) -> ListView {
        let lang = state.language;
        let messages = lang.messages();
        let statuses = self.statuses(board);
        let selected = self.filter(state, &statuses);

        let by_region = group_desc(selected, |&i| self.venues[i].region.clone());
        let regions: Vec<RegionView> = by_region
            .into_iter()
            .enumerate()
            .map(|(ri, (region, members))| {
                let by_city = group_desc(members, |&i| city_of(&self.venues[i].address, lang));
                let count = by_city.iter().map(|(_, m)| m.len()).sum();
                let cities = by_city
                    .into_iter()
                    .enumerate()
                    .map(|(ci, (city, members))| CityView {
                        id: format!("city-{}-{}-{}", ri, ci, slug(&city)),
                        count: members.len(),
                        name: city,
                        expanded: state.expanded,
                        venues: members
                            .into_iter()
                            .map(|i| VenueCard::build(&self.venues[i], statuses.status(i), statuses.at, lang))
                            .collect(),
                    })
                    .collect();
                RegionView {
                    id: format!("region-{}-{}", ri, slug(&region)),
                    name: region,
                    count,
                    expanded: state.expanded,
                    cities,
                }
            })
            .collect();

        let total = regions.iter().map(|r| r.count).sum();
        ListView {
            language: lang,
            rtl: lang.is_rtl(),
            title: messages.title,
            total,
            expanded: state.expanded,
            toggle_label: if state.expanded { messages.collapse_all } else { messages.expand_all },
            message: (total == 0).then_some(messages.no_places_found),
            regions,
        }
    }

    /// Map markers for every venue (filters do not apply to the map).
    pub fn map_view<R: Rng>(&self, lang: Language, resolver: &mut AddressResolver<R>) -> MapView {
        let markers: Vec<Marker> = self
            .venues
            .iter()
            .map(|v| {
                let resolved = resolver.resolve_venue(v);
                Marker {
                    name: v.name.clone(),
                    address: v.address.clone(),
                    link: v.link.clone(),
                    link_label: v.link.as_ref().map(|_| lang.messages().visit_website),
                    coordinate: resolved.coordinate,
                    source: resolved.source,
                    approximate: !resolved.source.is_deterministic(),
                }
            })
            .collect();

        debug!(markers = markers.len(), "map markers rebuilt");
        MapView {
            language: lang,
            rtl: lang.is_rtl(),
            tiles: TileLayer::for_language(lang),
            view: viewport(&markers),
            markers,
        }
    }
}

/// Case-insensitive substring match on name or address. `term` is already lowercased.
pub fn matches_search(venue: &Venue, term: &str) -> bool {
    venue.name.to_lowercase().contains(term) || venue.address.to_lowercase().contains(term)
}

/// Group items by key, keeping first-seen order, then stable-sort groups by
/// descending size.
fn group_desc<T, F>(items: Vec<T>, key: F) -> Vec<(String, Vec<T>)>
where
    F: Fn(&T) -> String,
{
    let mut groups: Vec<(String, Vec<T>)> = Vec::new();
    for item in items {
        let k = key(&item);
        match groups.iter_mut().find(|(g, _)| *g == k) {
            Some((_, members)) => members.push(item),
            None => groups.push((k, vec![item])),
        }
    }
    groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
    groups
}

/// Element id fragment: whitespace runs become `-`; only ASCII word
/// characters, `-` and Hebrew letters are kept.
pub fn slug(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|&c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || ('א'..='ת').contains(&c))
        .collect()
}

// ─── List view ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ListView {
    pub language: Language,
    pub rtl: bool,
    pub title: &'static str,
    pub total: usize,
    pub expanded: bool,
    pub toggle_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub regions: Vec<RegionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionView {
    pub id: String,
    pub name: String,
    pub count: usize,
    pub expanded: bool,
    pub cities: Vec<CityView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CityView {
    pub id: String,
    pub name: String,
    pub count: usize,
    pub expanded: bool,
    pub venues: Vec<VenueCard>,
}

/// One venue as shown in the list.
#[derive(Debug, Clone, Serialize)]
pub struct VenueCard {
    pub name: String,
    pub street: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_label: Option<&'static str>,
    /// `None` when the hours are unknown or unparseable.
    pub open: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condensed: Option<CondensedLabel>,
    /// Condensed label as text, or today's hours when there is no schedule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_label: Option<String>,
    pub tooltip: String,
}

impl VenueCard {
    fn build(venue: &Venue, open: Option<bool>, at: NaiveDateTime, lang: Language) -> Self {
        let messages = lang.messages();
        let schedule = venue.schedule.as_ref();
        let raw = venue.hours.as_deref();

        let condensed = schedule.map(|s| hours_label::condensed_weekly(s, lang));
        let hours_label = match &condensed {
            Some(c) => Some(c.to_string()),
            None => Some(hours_label::day_label(schedule, raw, at.weekday(), lang)),
        }
        .filter(|l| !l.is_empty());

        Self {
            name: venue.name.clone(),
            street: venue.street().to_string(),
            city: venue.locality(),
            link: venue.link.clone(),
            link_label: venue.link.as_ref().map(|_| messages.visit_website),
            open,
            status_label: open.map(|o| if o { messages.open_now } else { messages.closed_now }),
            condensed,
            hours_label,
            tooltip: hours_label::full_week(schedule, raw, lang),
        }
    }
}

// ─── Map view ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    pub language: Language,
    pub rtl: bool,
    pub tiles: TileLayer,
    pub markers: Vec<Marker>,
    pub view: Viewport,
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_label: Option<&'static str>,
    #[serde(flatten)]
    pub coordinate: Coordinate,
    pub source: ResolutionSource,
    /// Jittered around a city centroid; may move between renders.
    pub approximate: bool,
}

/// Base map tiles. Hebrew uses OpenStreetMap (local-script labels),
/// English uses CARTO light.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileLayer {
    pub url: &'static str,
    pub attribution: &'static str,
    pub max_zoom: u8,
}

impl TileLayer {
    pub fn for_language(lang: Language) -> Self {
        match lang {
            Language::He => Self {
                url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
                attribution: "© OpenStreetMap contributors",
                max_zoom: 19,
            },
            Language::En => Self {
                url: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png",
                attribution: "© OpenStreetMap contributors © CARTO",
                max_zoom: 19,
            },
        }
    }
}

/// What the map should show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Viewport {
    Bounds {
        south_west: Coordinate,
        north_east: Coordinate,
    },
    Center {
        center: Coordinate,
        zoom: u8,
    },
}

impl Viewport {
    pub fn default_view() -> Self {
        Self::Center {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

/// Padded bounds around all markers, or the default view when there are
/// none or the bounds are not finite.
pub fn viewport(markers: &[Marker]) -> Viewport {
    let Some(first) = markers.first() else {
        return Viewport::default_view();
    };

    let (mut south, mut west) = (first.coordinate.lat, first.coordinate.lng);
    let (mut north, mut east) = (south, west);
    for m in &markers[1..] {
        south = south.min(m.coordinate.lat);
        north = north.max(m.coordinate.lat);
        west = west.min(m.coordinate.lng);
        east = east.max(m.coordinate.lng);
    }

    let pad_lat = (north - south) * BOUNDS_PADDING;
    let pad_lng = (east - west) * BOUNDS_PADDING;
    let south_west = Coordinate::new(south - pad_lat, west - pad_lng);
    let north_east = Coordinate::new(north + pad_lat, east + pad_lng);

    if !south_west.is_finite() || !north_east.is_finite() {
        debug!("marker bounds not finite, using default view");
        return Viewport::default_view();
    }
    Viewport::Bounds { south_west, north_east }
}
