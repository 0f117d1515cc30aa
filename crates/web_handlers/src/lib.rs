//! # Web Handlers for the YelpCamp Web Application
//!
//! This crate provides the web handlers for the YelpCamp application.

/// Shared helpers for handlers (actor lookup)
mod actor;
pub use actor::*;

/// Authentication handlers (signup, login, logout)
mod auth_handlers;
pub use auth_handlers::*;

/// Password-reset handlers (forgot, reset)
mod reset_handlers;
pub use reset_handlers::*;

/// User profile handlers (get/update profile, public profile)
mod profile_handlers;
pub use profile_handlers::*;

/// Admin handlers (health, admin grant)
mod admin_handlers;
pub use admin_handlers::*;

/// Handlers for campground listing endpoints
mod campground_handlers;
pub use campground_handlers::*;

/// Handlers for comment endpoints
mod comment_handlers;
pub use comment_handlers::*;

/// Multipart form parsing for listing submissions
mod upload;
pub use upload::*;
