//! # Image Store
//!
//! This crate provides an image-hosting client for the YelpCamp application.
//! Listing images are uploaded to a Cloudinary account and referenced by the
//! hosted URL plus the provider's public id, which is needed to delete the
//! remote image when its listing goes away.

/// Client for the Cloudinary upload and admin APIs.
pub mod client;

pub use client::{ImageStoreClient, ImageStoreError, StoredImage};
