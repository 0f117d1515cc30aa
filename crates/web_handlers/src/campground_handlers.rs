use actix_multipart::Multipart;
use actix_web::{HttpResponse, Result, web};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use auth_services::middleware::AuthenticatedUser;
use campground_services::types::{CampgroundError, ListCampgroundsResponse};
use campground_services::{CampgroundService, authorize_mutation};
use geocoding::{GeocodedLocation, GeocodingClient};
use image_store::ImageStoreClient;

use crate::actor::load_is_admin;
use crate::upload::parse_campground_form;

/// Query parameters for the campground index
#[derive(Debug, Deserialize)]
pub struct CampgroundQuery {
    /// Substring to match against listing names, treated literally
    pub search: Option<String>,
}

/// Lists all campgrounds, or the ones matching the search query.
pub async fn list_campgrounds(
    pool: web::Data<PgPool>,
    query: web::Query<CampgroundQuery>,
) -> Result<HttpResponse, CampgroundError> {
    let service = CampgroundService::new(pool.get_ref().clone());

    let campgrounds = match query.search.as_deref() {
        Some(search) if !search.trim().is_empty() => service.search(search.trim()).await?,
        _ => service.list().await?,
    };

    let response = ListCampgroundsResponse {
        total: campgrounds.len() as i64,
        campgrounds,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Creates a campground for the authenticated user.
///
/// The location is geocoded and the image uploaded before anything is
/// persisted; a failure in either aborts the request with nothing stored.
pub async fn create_campground(
    pool: web::Data<PgPool>,
    geocoder: web::Data<GeocodingClient>,
    image_store: web::Data<ImageStoreClient>,
    user: AuthenticatedUser,
    payload: Multipart,
) -> Result<HttpResponse, CampgroundError> {
    let form = parse_campground_form(payload).await?;

    // Validate the fields
    form.fields
        .validate()
        .map_err(|e| CampgroundError::Validation(format!("Validation error: {}", e)))?;

    let image = form
        .image
        .ok_or_else(|| CampgroundError::Validation("An image is required".to_string()))?;

    let geo = geocoder.forward(&form.fields.location).await?;
    let stored_image = image_store.upload(&image.filename, image.bytes).await?;

    let service = CampgroundService::new(pool.get_ref().clone());
    let campground = service
        .create(&user.0, &form.fields, &geo, &stored_image)
        .await?;

    Ok(HttpResponse::Created().json(campground))
}

/// Shows one campground with its comments.
pub async fn show_campground(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, CampgroundError> {
    let id = path.into_inner();
    let service = CampgroundService::new(pool.get_ref().clone());
    let detail = service.get(&id).await?;

    Ok(HttpResponse::Ok().json(detail))
}

/// Updates a campground. Only the author or an admin may do this.
pub async fn update_campground(
    pool: web::Data<PgPool>,
    geocoder: web::Data<GeocodingClient>,
    image_store: web::Data<ImageStoreClient>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> Result<HttpResponse, CampgroundError> {
    let id = path.into_inner();
    let service = CampgroundService::new(pool.get_ref().clone());

    let record = service.get_record(&id).await?;
    let is_admin = load_is_admin(pool.get_ref(), &user.0).await?;

    authorize_mutation(
        Some(user.0),
        is_admin,
        record.as_ref().map(|r| r.author_id),
    )
    .into_result()?;

    let record = match record {
        Some(record) => record,
        None => return Err(CampgroundError::NotFound),
    };

    let form = parse_campground_form(payload).await?;
    form.fields
        .validate()
        .map_err(|e| CampgroundError::Validation(format!("Validation error: {}", e)))?;

    // Only re-geocode when the location string actually changed
    let geo = if form.fields.location != record.location {
        geocoder.forward(&form.fields.location).await?
    } else {
        GeocodedLocation {
            place_name: record.location.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
        }
    };

    // A replacement image is uploaded before the record is touched
    let new_image = match form.image {
        Some(image) => Some(image_store.upload(&image.filename, image.bytes).await?),
        None => None,
    };

    let updated = service
        .update(&id, &form.fields, &geo, new_image.as_ref())
        .await?;

    // Compensating cleanup: the old remote image is residue once the record
    // points at the new one. Failure is logged, not surfaced.
    if new_image.is_some() {
        if let Err(e) = image_store.destroy(&record.image_public_id).await {
            log::warn!(
                "Orphaned remote image {} after updating campground {}: {}",
                record.image_public_id,
                id,
                e
            );
        }
    }

    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes a campground and its comments. Only the author or an admin may
/// do this.
pub async fn delete_campground(
    pool: web::Data<PgPool>,
    image_store: web::Data<ImageStoreClient>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, CampgroundError> {
    let id = path.into_inner();
    let service = CampgroundService::new(pool.get_ref().clone());

    let record = service.get_record(&id).await?;
    let is_admin = load_is_admin(pool.get_ref(), &user.0).await?;

    authorize_mutation(
        Some(user.0),
        is_admin,
        record.as_ref().map(|r| r.author_id),
    )
    .into_result()?;

    // Comments and the listing go in one transaction; the remote image is
    // cleaned up best-effort after commit.
    let image_public_id = service.delete(&id).await?;

    if let Err(e) = image_store.destroy(&image_public_id).await {
        log::warn!(
            "Orphaned remote image {} after deleting campground {}: {}",
            image_public_id,
            id,
            e
        );
    }

    Ok(HttpResponse::NoContent().finish())
}
