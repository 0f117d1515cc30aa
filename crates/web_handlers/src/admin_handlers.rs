use actix_web::{HttpResponse, Result, web};
use sqlx::PgPool;
use uuid::Uuid;

use auth_services::middleware::AuthenticatedUser;
use auth_services::service::AuthService;
use auth_services::types::{AuthError, UserInfo};

/// Health check endpoint for the API.
pub async fn api_health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "service": "yelpcamp",
        "status": "healthy",
        "timestamp": chrono::Utc::now()
    })))
}

/// Grants the admin flag to the target user.
///
/// Admin elevation is an explicit operation performed by an existing admin;
/// there is no registration-time admin code.
pub async fn grant_admin(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AuthError> {
    let target_id = path.into_inner();
    let auth_service = AuthService::new(pool.get_ref().clone());

    let updated = auth_service.grant_admin(&user.0, &target_id).await?;

    log::info!("User {} granted admin to {}", user.0, target_id);

    Ok(HttpResponse::Ok().json(UserInfo::from(&updated)))
}
