//! Vegan Places: a static venue directory for Israel.
//!
//! Two engines do the real work:
//! - [`schedule`] parses compact opening-hours strings and answers open/closed queries.
//! - [`location`] turns free-text Israeli addresses into approximate map coordinates
//!   without calling a geocoding service.
//!
//! Everything else (CSV loading, grouping, view models, structured data, the contact
//! flows and the HTTP server) is plumbing around those two.

pub mod config;
pub mod contact;
pub mod directory;
pub mod export;
pub mod hours_label;
pub mod i18n;
pub mod location;
pub mod schedule;
pub mod server;
pub mod source;
pub mod venue;
