//! # Auth Services
//!
//! This crate provides authentication services for the YelpCamp application:
//! credential storage, JWT token handling, request-authentication middleware,
//! and the password-reset token lifecycle.

/// JWT token handling for access and refresh tokens.
pub mod jwt;
/// Middleware for request authentication and the authenticated-user extractor.
pub mod middleware;
/// Password-reset token generation and validity rules.
pub mod reset;
/// Service definitions for user management and authentication operations.
pub mod service;
/// Types and structures used in authentication services.
pub mod types;
