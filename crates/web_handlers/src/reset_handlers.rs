use actix_web::{HttpResponse, Result, web};
use bcrypt::hash;
use sqlx::PgPool;
use validator::Validate;

use auth_services::jwt::JwtService;
use auth_services::service::AuthService;
use auth_services::types::*;
use notification_services::NotificationService;

/// Starts a password reset: issues a single-use token for the account with
/// the given email and mails the reset link.
pub async fn forgot_password(
    pool: web::Data<PgPool>,
    notification_service: web::Data<NotificationService>,
    request: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, AuthError> {
    // Validate the request
    request
        .validate()
        .map_err(|e| AuthError::Validation(format!("Validation error: {}", e)))?;

    let auth_service = AuthService::new(pool.get_ref().clone());

    let (user, token) = auth_service.issue_reset_token(&request.email).await?;

    notification_service
        .send_password_reset_email(&user.email, &user.username, &token)
        .await
        .map_err(|e| AuthError::EmailDelivery(e.to_string()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!(
            "An e-mail has been sent to {} with further instructions.",
            user.email
        )
    })))
}

/// Completes a password reset: consumes the emailed token, stores the new
/// password, and establishes a fresh session.
pub async fn reset_password(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    request: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, AuthError> {
    // Validate the request
    request
        .validate()
        .map_err(|e| AuthError::Validation(format!("Validation error: {}", e)))?;

    if request.password != request.confirm_password {
        return Err(AuthError::PasswordMismatch);
    }

    let token = path.into_inner();
    let auth_service = AuthService::new(pool.get_ref().clone());
    let jwt_service = JwtService::new();

    // Consumes the token: a second submission of the same token fails
    let user = auth_service
        .reset_password(&token, &request.password)
        .await?;

    // Establish a session, same as a fresh login
    let access_token = jwt_service.generate_access_token(&user)?;
    let refresh_token = jwt_service.generate_refresh_token(&user.id)?;

    let refresh_token_hash = hash(&refresh_token, bcrypt::DEFAULT_COST)?;
    let _session_id = auth_service
        .create_session(&user.id, &refresh_token_hash)
        .await?;

    let response = AuthResponse {
        access_token,
        refresh_token,
        user: UserInfo::from(&user),
    };

    Ok(HttpResponse::Ok().json(response))
}
