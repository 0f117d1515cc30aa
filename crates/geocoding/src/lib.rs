//! # Geocoding
//!
//! This crate provides a forward-geocoding client for the YelpCamp application.
//! It resolves free-form location strings to coordinates and a canonical
//! place name through the Mapbox Geocoding API.

/// Client for the Mapbox Geocoding API.
pub mod client;

pub use client::{GeocodedLocation, GeocodingClient, GeocodingError};
