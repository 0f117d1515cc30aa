//! # Campground Services
//!
//! This crate provides the campground and comment stores for the YelpCamp
//! application, the ownership decision applied to every mutating request,
//! and the escaped substring search over listing names.

/// Ownership/authorization decision for mutating requests.
pub mod access;
/// Campground store: list, search, create, read, update, cascade delete.
pub mod campground_service;
/// Comment store: create, update, delete.
pub mod comment_service;
/// Search-pattern escaping for substring matches.
pub mod search;
/// Types and structures shared by the campground services.
pub mod types;

pub use access::{AccessDecision, DenyReason, authorize_mutation};
pub use campground_service::CampgroundService;
pub use comment_service::CommentService;
pub use types::CampgroundError;
