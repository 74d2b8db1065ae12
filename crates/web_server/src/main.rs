//! Main entry point for the Camp Atlas backend server.
//! This crate wires the middleware stack, the route table, and static assets
//! for the campground listing application.

use actix_files::Files;
use actix_session::{SessionMiddleware, config::PersistentSession, storage::CookieSessionStore};
use actix_web::{
    App, HttpResponse, HttpServer,
    cookie::{Key, time::Duration},
    dev::{ServiceRequest, ServiceResponse, fn_service},
    middleware::{DefaultHeaders, Logger},
    web,
};
use auth_services::middleware::RequireLogin;
use geocoding::Geocoder;
use image_storage::{ImageStoreHandle, S3ImageStore};
use postgres::database::*;
use std::path::Path;
use std::sync::Arc;
use web_handlers::*;

fn get_frontend_path() -> &'static str {
    // Check multiple possible locations for frontend files
    if Path::new("./frontend-build").exists() {
        log::info!("✅ Using Docker frontend path: ./frontend-build");
        "./frontend-build"
    } else if Path::new("../frontend/build").exists() {
        log::info!("✅ Using local frontend path: ../frontend/build");
        "../frontend/build"
    } else {
        log::info!("❌ Frontend files not found in either location");
        "./frontend-build" // fallback
    }
}

/// Cookie sessions signed with the `SECRET` environment variable. Cookies
/// expire after one week.
fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
    let secret = std::env::var("SECRET")
        .unwrap_or_else(|_| "thisshouldbeabettersecret-change-it-in-production".to_string());

    SessionMiddleware::builder(CookieSessionStore::default(), Key::derive_from(secret.as_bytes()))
        .cookie_name("session".to_string())
        .session_lifecycle(PersistentSession::default().session_ttl(Duration::weeks(1)))
        .build()
}

/// Security headers on every response, including a Content-Security-Policy
/// limited to the app's own origin plus its image and map-tile providers.
fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
        .add(("Referrer-Policy", "strict-origin-when-cross-origin"))
        .add((
            "Content-Security-Policy",
            "default-src 'self'; \
             connect-src 'self' https://api.mapbox.com https://*.tiles.mapbox.com https://events.mapbox.com; \
             script-src 'self'; \
             style-src 'self' 'unsafe-inline' https://fonts.googleapis.com; \
             img-src 'self' data: blob: https://images.unsplash.com https://*.amazonaws.com; \
             font-src 'self' https://fonts.gstatic.com; \
             worker-src 'self' blob:",
        ))
}

async fn not_found_body() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "Page not found"
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    log::info!("🚀 Starting Camp Atlas server...");

    // Create database connection pool
    let pool = match create_connection_pool().await {
        Ok(pool) => {
            log::info!("🗃️ Database pool created successfully");

            if let Err(e) = test_connection(&pool).await {
                log::error!("❌ Database connection test failed: {}", e);
            }
            pool
        }
        Err(e) => {
            log::error!("❌ Failed to create database pool: {}", e);
            log::error!("💡 Make sure PostgreSQL is running and DATABASE_URL is set");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_migrations(&pool).await {
        log::error!("❌ Failed to run database migrations: {}", e);
        std::process::exit(1);
    }
    log::info!("📜 Database schema is up to date");

    // Geocoder and image store shared across workers
    let geocoder = Geocoder::new();
    let image_store: ImageStoreHandle = Arc::new(S3ImageStore::from_env().await);
    log::info!("🖼️ Image store ready");

    let frontend_path = get_frontend_path();
    log::info!("📁 Frontend files location: {}", frontend_path);
    log::info!("🌐 Server will be available at: http://0.0.0.0:8080");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(geocoder.clone()))
            .app_data(web::Data::new(image_store.clone()))
            .wrap(Logger::default())
            .wrap(security_headers())
            .wrap(session_middleware())
            .service(
                web::scope("/campgrounds")
                    // Public routes
                    .route("", web::get().to(list_campgrounds))
                    .service(
                        web::scope("/new")
                            .wrap(RequireLogin)
                            .route("", web::get().to(new_campground_page)),
                    )
                    .route("/{id}", web::get().to(show_campground))
                    // Protected routes (require an authenticated session)
                    .service(
                        web::scope("")
                            .wrap(RequireLogin)
                            .route("", web::post().to(create_campground))
                            .route("/{id}/edit", web::get().to(edit_campground))
                            .route("/{id}", web::put().to(update_campground))
                            .route("/{id}", web::delete().to(delete_campground))
                            .route("/{id}/reviews", web::post().to(create_review))
                            .route(
                                "/{id}/reviews/{review_id}",
                                web::delete().to(delete_review),
                            ),
                    ),
            )
            .route("/register", web::get().to(register_page))
            .route("/register", web::post().to(register))
            .route("/login", web::get().to(login_page))
            .route("/login", web::post().to(login))
            .route("/logout", web::get().to(logout))
            .route(
                "/health",
                web::get().to(|| async { HttpResponse::Ok().body("OK") }),
            )
            .service(
                Files::new("/", frontend_path)
                    .index_file("index.html")
                    .default_handler(fn_service(|req: ServiceRequest| async {
                        let (req, _) = req.into_parts();
                        Ok(ServiceResponse::new(req, not_found_body().await))
                    })),
            )
            .default_service(web::route().to(not_found_body))
    })
    .bind("0.0.0.0:8080")?
    .run()
    .await
}
