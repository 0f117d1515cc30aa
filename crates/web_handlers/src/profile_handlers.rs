use actix_web::{Error, HttpResponse, Result, web};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use auth_services::middleware::AuthenticatedUser;
use auth_services::service::AuthService;
use auth_services::types::*;
use campground_services::CampgroundService;

/// Handles user profile retrieval by fetching user info based on the authenticated user.
pub async fn get_profile(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AuthError> {
    let auth_service = AuthService::new(pool.get_ref().clone());

    let user = auth_service
        .get_user_by_id(&user.0)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    Ok(HttpResponse::Ok().json(UserInfo::from(&user)))
}

/// Handles user profile update by validating the request and updating user info.
pub async fn update_profile(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    request: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AuthError> {
    // Validate the request
    request
        .validate()
        .map_err(|e| AuthError::Validation(format!("Validation error: {}", e)))?;

    let auth_service = AuthService::new(pool.get_ref().clone());

    let updated_user = auth_service.update_profile(&user.0, &request).await?;

    Ok(HttpResponse::Ok().json(UserInfo::from(&updated_user)))
}

/// Public profile page: the user's display info plus their listings.
pub async fn get_user(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, Error> {
    let user_id = path.into_inner();
    let auth_service = AuthService::new(pool.get_ref().clone());

    let user = auth_service
        .get_user_by_id(&user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    let campground_service = CampgroundService::new(pool.get_ref().clone());
    let campgrounds = campground_service.list_by_author(&user_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "user": {
            "id": user.id,
            "username": user.username,
            "first_name": user.first_name,
            "last_name": user.last_name,
            "avatar_url": user.avatar_url,
        },
        "campgrounds": campgrounds
    })))
}
