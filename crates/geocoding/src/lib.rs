//! # Geocoding
//!
//! This crate provides a client for the Mapbox forward-geocoding API, which is
//! used to resolve a campground's location string to map coordinates.

/// Forward geocoding: location string to GeoJSON point.
mod forward_geocode;
pub use forward_geocode::*;
