use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request structure for user sign-up
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    /// Desired username, shown on listings and comments
    #[validate(length(min = 3, max = 64, message = "Username must be 3-64 characters"))]
    pub username: String,

    /// Email address of the user
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,

    /// Password for the user account
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// First name of the user
    pub first_name: Option<String>,

    /// Last name of the user
    pub last_name: Option<String>,

    /// Avatar image URL
    #[validate(url(message = "Avatar must be a valid URL"))]
    pub avatar_url: Option<String>,
}

/// Request structure for user login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username of the account
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Password for the user account
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request structure for updating user profile
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// Email address of the user
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,

    /// First name of the user
    pub first_name: Option<String>,

    /// Last name of the user
    pub last_name: Option<String>,

    /// Avatar image URL
    #[validate(url(message = "Avatar must be a valid URL"))]
    pub avatar_url: Option<String>,
}

/// Request structure for starting a password reset
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    /// Email address of the account to reset
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
}

/// Request structure for completing a password reset
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    /// The new password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Confirmation of the new password
    pub confirm_password: String,
}

/// Response structure for user authentication
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Access token for the user
    pub access_token: String,
    /// Refresh token for the user
    pub refresh_token: String,
    /// User information
    pub user: UserInfo,
}

/// Information about the user, used in responses
#[derive(Debug, Serialize)]
pub struct UserInfo {
    /// Unique identifier for the user
    pub id: Uuid,
    /// Username of the user
    pub username: String,
    /// Email address of the user
    pub email: String,
    /// First name of the user
    pub first_name: Option<String>,
    /// Last name of the user
    pub last_name: Option<String>,
    /// Avatar image URL
    pub avatar_url: String,
    /// Whether the user holds the admin flag
    pub is_admin: bool,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            avatar_url: user.avatar_url.clone(),
            is_admin: user.is_admin,
        }
    }
}

/// User model representing the database schema
#[derive(Debug, sqlx::FromRow)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,
    /// Username of the user
    pub username: String,
    /// Email address of the user
    pub email: String,
    /// Hashed password of the user
    pub password_hash: String,
    /// First name of the user
    pub first_name: Option<String>,
    /// Last name of the user
    pub last_name: Option<String>,
    /// Avatar image URL
    pub avatar_url: String,
    /// Whether the user holds the admin flag
    pub is_admin: bool,
    /// Pending password-reset token, if one was issued
    pub reset_password_token: Option<String>,
    /// Expiry of the pending password-reset token
    pub reset_password_expires: Option<DateTime<Utc>>,
    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,
    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject of the token, the user ID
    pub sub: String,
    /// Username of the user
    pub username: String,
    /// Expiration timestamp of the token
    pub exp: usize,
    /// Issued at timestamp of the token
    pub iat: usize,
}

/// Custom error type for authentication-related errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The username is already taken
    #[error("Username already exists")]
    UsernameExists,

    /// The email address already exists in the system
    #[error("Email already exists")]
    EmailExists,

    /// The provided credentials are invalid
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The user was not found in the system
    #[error("User not found")]
    UserNotFound,

    /// The requester is not allowed to perform this operation
    #[error("You don't have permission to do that")]
    Forbidden,

    /// The password-reset token is unknown or past its expiry
    #[error("Password reset token is invalid or has expired")]
    ResetTokenInvalid,

    /// The new password and its confirmation do not match
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// An internal server error occurred
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An error occurred while hashing the password
    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// An error occurred while signing or verifying a token
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// An error occurred while validating input data
    #[error("Validation error: {0}")]
    Validation(String),

    /// The reset email could not be delivered
    #[error("Failed to send email: {0}")]
    EmailDelivery(String),
}

impl actix_web::ResponseError for AuthError {
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::HttpResponse;

        match self {
            AuthError::UsernameExists => HttpResponse::Conflict().json(serde_json::json!({
                "error": "username_exists",
                "message": "An account with this username already exists"
            })),
            AuthError::EmailExists => HttpResponse::Conflict().json(serde_json::json!({
                "error": "email_exists",
                "message": "An account with this email already exists"
            })),
            AuthError::InvalidCredentials => HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "invalid_credentials",
                "message": "Invalid username or password"
            })),
            AuthError::UserNotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": "user_not_found",
                "message": "User not found"
            })),
            AuthError::Forbidden => HttpResponse::Forbidden().json(serde_json::json!({
                "error": "forbidden",
                "message": "You don't have permission to do that"
            })),
            AuthError::ResetTokenInvalid => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "reset_token_invalid",
                "message": "Password reset token is invalid or has expired"
            })),
            AuthError::PasswordMismatch => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "password_mismatch",
                "message": "Passwords do not match"
            })),
            AuthError::Validation(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "validation_error",
                "message": msg
            })),
            AuthError::EmailDelivery(_) => HttpResponse::BadGateway().json(serde_json::json!({
                "error": "email_delivery_failed",
                "message": "Could not send the password reset email"
            })),
            _ => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "internal_error",
                "message": "An internal error occurred"
            })),
        }
    }
}
