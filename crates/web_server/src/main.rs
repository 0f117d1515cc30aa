//! Main entry point for the YelpCamp backend server.
//! This crate wires the database pool and external service clients into the
//! REST API endpoints.

use std::sync::Arc;

use actix_web::{App, HttpResponse, HttpServer, middleware::Logger, web};
use auth_services::middleware::AuthMiddleware;
use notification_services::{NotificationService, SesMailer};
use postgres::database::*;
use web_handlers::*;

async fn api_hello() -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to YelpCamp!",
        "status": "running"
    })))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    log::info!("Starting YelpCamp server...");

    // Create database connection pool
    let pool = match create_connection_pool().await {
        Ok(pool) => {
            log::info!("Database pool created successfully");

            if let Err(e) = test_connection(&pool).await {
                log::error!("Database connection test failed: {}", e);
            }
            pool
        }
        Err(e) => {
            log::error!("Failed to create database pool: {}", e);
            log::error!("Make sure PostgreSQL is running and DATABASE_URL is set");
            std::process::exit(1);
        }
    };

    // Geocoder client
    let mapbox_token = std::env::var("MAPBOX_TOKEN").unwrap_or_default();
    let geocoder = match geocoding::GeocodingClient::new(mapbox_token) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to initialize geocoding client: {}", e);
            std::process::exit(1);
        }
    };

    // Image hosting client
    let image_store = match image_store::ImageStoreClient::new(
        std::env::var("CLOUDINARY_CLOUD_NAME").unwrap_or_default(),
        std::env::var("CLOUDINARY_API_KEY").unwrap_or_default(),
        std::env::var("CLOUDINARY_API_SECRET").unwrap_or_default(),
        std::env::var("CLOUDINARY_UPLOAD_PRESET").unwrap_or_else(|_| "yelpcamp".to_string()),
    ) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to initialize image store client: {}", e);
            std::process::exit(1);
        }
    };

    // Mail delivery for password resets
    let mailer = match SesMailer::new().await {
        Ok(mailer) => {
            log::info!("Mailer initialized successfully");
            mailer
        }
        Err(e) => {
            log::error!("Failed to initialize mailer: {}", e);
            log::warn!("Check AWS credentials and SES setup");
            std::process::exit(1);
        }
    };
    let base_url =
        std::env::var("APP_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let notification_service = NotificationService::new(Arc::new(mailer), base_url);

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_addr = format!("0.0.0.0:{}", port);
    log::info!("Server will be available at: http://{}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(geocoder.clone()))
            .app_data(web::Data::new(image_store.clone()))
            .app_data(web::Data::new(notification_service.clone()))
            .wrap(Logger::default())
            .service(
                web::scope("/api")
                    // Public routes
                    .route("/hello", web::get().to(api_hello))
                    .service(
                        web::scope("/auth")
                            .route("/health", web::get().to(api_health))
                            .route("/signup", web::post().to(signup))
                            .route("/login", web::post().to(login))
                            .route("/logout", web::post().to(logout))
                            .route("/forgot", web::post().to(forgot_password))
                            .route("/reset/{token}", web::post().to(reset_password)),
                    )
                    // Public user profiles; the admin grant requires an admin
                    .route("/users/{id}", web::get().to(get_user))
                    .route("/users/{id}/admin", web::put().to(grant_admin))
                    // Own profile (requires authentication)
                    .service(
                        web::scope("/user")
                            .wrap(AuthMiddleware)
                            .route("/profile", web::get().to(get_profile))
                            .route("/profile", web::put().to(update_profile)),
                    )
                    // Campground and comment routes; reads are public,
                    // mutations authenticate through the bearer-token extractor
                    .service(
                        web::resource("/campgrounds")
                            .route(web::get().to(list_campgrounds))
                            .route(web::post().to(create_campground)),
                    )
                    .service(
                        web::resource("/campgrounds/{id}")
                            .route(web::get().to(show_campground))
                            .route(web::put().to(update_campground))
                            .route(web::delete().to(delete_campground)),
                    )
                    .route("/campgrounds/{id}/comments", web::post().to(create_comment))
                    .service(
                        web::resource("/campgrounds/{id}/comments/{comment_id}")
                            .route(web::put().to(update_comment))
                            .route(web::delete().to(delete_comment)),
                    ),
            )
            .route(
                "/health",
                web::get().to(|| async { HttpResponse::Ok().body("OK") }),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
