//! # Postgres
//!
//! This crate provides a client for the YelpCamp application to interact with a PostgreSQL database.

/// Database client for the YelpCamp application.
pub mod database;
