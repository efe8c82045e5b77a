//! Address resolution for Israeli venues.
//!
//! Turns free-text addresses into approximate coordinates with a layered
//! heuristic chain: manual overrides, Tel Aviv street models, curated
//! tables and city centroids. No geocoding service is called.

pub mod overrides;
pub mod resolver;
pub mod streets;
pub mod tables;
pub mod text;
pub mod types;

pub use overrides::OverrideTable;
pub use resolver::AddressResolver;
pub use tables::city_of;
pub use types::{Coordinate, ResolutionSource, Resolved};
