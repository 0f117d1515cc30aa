use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Fields of a campground listing as submitted by the user.
#[derive(Debug, Deserialize, Validate)]
pub struct CampgroundFields {
    /// Display name of the campground
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    /// Nightly price in dollars
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f64,

    /// Free-form description shown on the listing page
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    /// Location string the user typed; geocoded before persisting
    #[validate(length(min = 1, max = 255, message = "Location is required"))]
    pub location: String,
}

/// Request structure for creating or editing a comment
#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    /// Body of the comment
    #[validate(length(min = 1, max = 4000, message = "Comment text is required"))]
    pub text: String,
}

/// Author reference resolved at read time (no stored username snapshot).
#[derive(Debug, Serialize)]
pub struct AuthorRef {
    /// Stable identifier of the authoring user
    pub id: Uuid,
    /// Display name resolved by lookup when the record is read
    pub username: String,
}

/// A campground listing as returned to clients.
#[derive(Debug, Serialize)]
pub struct CampgroundResponse {
    /// Unique identifier of the campground
    pub id: Uuid,
    /// Display name of the campground
    pub name: String,
    /// Nightly price in dollars
    pub price: f64,
    /// Free-form description
    pub description: String,
    /// Hosted image URL
    pub image_url: String,
    /// Canonical geocoded address
    pub location: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Author of the listing
    pub author: AuthorRef,
    /// Time at which the listing was created
    pub created_at: DateTime<Utc>,
}

/// A campground listing together with its comments.
#[derive(Debug, Serialize)]
pub struct CampgroundDetail {
    /// The listing itself
    #[serde(flatten)]
    pub campground: CampgroundResponse,
    /// Comments on the listing, oldest first
    pub comments: Vec<CommentResponse>,
}

/// A comment as returned to clients.
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    /// Unique identifier of the comment
    pub id: Uuid,
    /// Campground the comment belongs to
    pub campground_id: Uuid,
    /// Body of the comment
    pub text: String,
    /// Author of the comment
    pub author: AuthorRef,
    /// Time at which the comment was created
    pub created_at: DateTime<Utc>,
}

/// Response structure for campground list/search endpoints.
#[derive(Debug, Serialize)]
pub struct ListCampgroundsResponse {
    /// Number of campgrounds returned
    pub total: i64,
    /// The campgrounds, newest first
    pub campgrounds: Vec<CampgroundResponse>,
}

/// Internal row representation of a campground.
#[derive(Debug)]
pub struct CampgroundRecord {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Nightly price in dollars
    pub price: f64,
    /// Free-form description
    pub description: String,
    /// Hosted image URL
    pub image_url: String,
    /// Provider-side image id used for remote deletion
    pub image_public_id: String,
    /// Canonical geocoded address
    pub location: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Stable id of the authoring user
    pub author_id: Uuid,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Custom error type for campground and comment operations
#[derive(Debug, thiserror::Error)]
pub enum CampgroundError {
    /// The campground does not exist
    #[error("Campground not found")]
    NotFound,

    /// The comment does not exist
    #[error("Comment not found")]
    CommentNotFound,

    /// The requester carries no authenticated identity
    #[error("You need to be logged in to do that")]
    NotLoggedIn,

    /// The requester is neither the author nor an admin
    #[error("You don't have permission to do that")]
    NotOwner,

    /// An error occurred while validating input data
    #[error("Validation error: {0}")]
    Validation(String),

    /// The geocoder could not resolve the location or failed outright
    #[error("Geocoding failed: {0}")]
    Geocoding(#[from] geocoding::GeocodingError),

    /// The image host rejected or failed the upload
    #[error("Image hosting failed: {0}")]
    ImageStore(#[from] image_store::ImageStoreError),

    /// An internal server error occurred
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl actix_web::ResponseError for CampgroundError {
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::HttpResponse;

        match self {
            CampgroundError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": "not_found",
                "message": "Campground not found"
            })),
            CampgroundError::CommentNotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": "not_found",
                "message": "Comment not found"
            })),
            CampgroundError::NotLoggedIn => HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "not_logged_in",
                "message": "You need to be logged in to do that"
            })),
            CampgroundError::NotOwner => HttpResponse::Forbidden().json(serde_json::json!({
                "error": "not_owner",
                "message": "You don't have permission to do that"
            })),
            CampgroundError::Validation(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "validation_error",
                "message": msg
            })),
            CampgroundError::Geocoding(geocoding::GeocodingError::NoResults) => {
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "location_not_found",
                    "message": "Could not find that location on the map"
                }))
            }
            CampgroundError::Geocoding(_) => HttpResponse::BadGateway().json(serde_json::json!({
                "error": "geocoding_failed",
                "message": "The location service is unavailable, please try again"
            })),
            CampgroundError::ImageStore(_) => HttpResponse::BadGateway().json(serde_json::json!({
                "error": "image_upload_failed",
                "message": "The image service is unavailable, please try again"
            })),
            CampgroundError::Database(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "internal_error",
                    "message": "An internal error occurred"
                }))
            }
        }
    }
}
