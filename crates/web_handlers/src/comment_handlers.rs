use actix_web::{HttpResponse, Result, web};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use auth_services::middleware::AuthenticatedUser;
use campground_services::types::{CampgroundError, CommentRequest};
use campground_services::{CommentService, authorize_mutation};

use crate::actor::load_is_admin;

/// Creates a comment on a campground for the authenticated user.
pub async fn create_comment(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    request: web::Json<CommentRequest>,
) -> Result<HttpResponse, CampgroundError> {
    // Validate the request
    request
        .validate()
        .map_err(|e| CampgroundError::Validation(format!("Validation error: {}", e)))?;

    let campground_id = path.into_inner();
    let service = CommentService::new(pool.get_ref().clone());
    let comment = service
        .create(&campground_id, &user.0, request.text.trim())
        .await?;

    Ok(HttpResponse::Created().json(comment))
}

/// Updates a comment. Only the comment's author or an admin may do this.
pub async fn update_comment(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    path: web::Path<(Uuid, Uuid)>,
    request: web::Json<CommentRequest>,
) -> Result<HttpResponse, CampgroundError> {
    // Validate the request
    request
        .validate()
        .map_err(|e| CampgroundError::Validation(format!("Validation error: {}", e)))?;

    let (_campground_id, comment_id) = path.into_inner();
    let service = CommentService::new(pool.get_ref().clone());

    let author = service.get_author(&comment_id).await?;
    let is_admin = load_is_admin(pool.get_ref(), &user.0).await?;

    match authorize_mutation(Some(user.0), is_admin, author).into_result() {
        Ok(()) => {}
        Err(CampgroundError::NotFound) => return Err(CampgroundError::CommentNotFound),
        Err(e) => return Err(e),
    }

    let comment = service.update(&comment_id, request.text.trim()).await?;

    Ok(HttpResponse::Ok().json(comment))
}

/// Deletes a comment. Only the comment's author or an admin may do this.
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, CampgroundError> {
    let (_campground_id, comment_id) = path.into_inner();
    let service = CommentService::new(pool.get_ref().clone());

    let author = service.get_author(&comment_id).await?;
    let is_admin = load_is_admin(pool.get_ref(), &user.0).await?;

    match authorize_mutation(Some(user.0), is_admin, author).into_result() {
        Ok(()) => {}
        Err(CampgroundError::NotFound) => return Err(CampgroundError::CommentNotFound),
        Err(e) => return Err(e),
    }

    service.delete(&comment_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
