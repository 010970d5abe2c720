//! Atelier Design Studio Backend
//!
//! A REST backend serving the studio site's portfolio, hero configuration,
//! service categories, media objects, and visitor intake.

mod api;
mod auth;
mod config;
mod db;
mod email;
mod errors;
mod media;
mod models;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;
use email::Mailer;
use media::MediaStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub media: Arc<MediaStore>,
    pub mailer: Option<Arc<Mailer>>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Atelier backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Media root: {:?}", config.media_root);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if admin credentials are not configured
    if config.admin_username.is_none() || config.admin_password.is_none() {
        tracing::warn!(
            "No admin credentials configured (ATELIER_ADMIN_USER / ATELIER_ADMIN_PASSWORD). Admin routes will reject every login!"
        );
    }
    if config.smtp.is_none() {
        tracing::info!("No SMTP host configured (ATELIER_SMTP_HOST). Email dispatch is disabled.");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Initialize media store
    let media = Arc::new(MediaStore::new(
        config.media_root.clone(),
        &config.public_base_url,
    ));
    media.ensure_dirs().await?;

    // Seed the fixed category set; a populated table is left untouched
    if repo.seed_service_categories().await? {
        tracing::info!("Seeded default service categories");
    }

    let mailer = config
        .smtp
        .clone()
        .map(|smtp| Arc::new(Mailer::new(smtp, config.contact_inbox.clone())));

    // Create application state
    let state = AppState {
        repo,
        media,
        mailer,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Uploads are validated against the 5 MB image ceiling in the media
    // store; the transport limit just needs to sit above it.
    let body_limit = DefaultBodyLimit::max(media::IMAGE_SIZE_LIMIT + 1024 * 1024);

    // API routes; admin gating happens in the handlers via RequireAdmin
    let api_routes = Router::new()
        // Auth
        .route("/auth/login", post(api::login))
        .route("/auth/logout", post(api::logout))
        // Projects
        .route(
            "/projects",
            get(api::list_projects).post(api::create_project),
        )
        .route("/projects/reorder", put(api::reorder_projects))
        .route("/projects/{id}", delete(api::delete_project))
        // Hero slots
        .route(
            "/hero-projects",
            get(api::get_hero_slots)
                .post(api::save_hero_slots)
                .delete(api::clear_hero_slots),
        )
        .route("/hero-projects/upload", post(api::upload_hero_asset))
        // Service categories
        .route(
            "/service-categories",
            get(api::list_service_categories).put(api::set_category_images),
        )
        // Videos
        .route("/video/{filename}", get(api::stream_video))
        // Visitor intake
        .route("/contact", post(api::submit_contact))
        .route("/contacts", get(api::list_contacts))
        .route("/contacts/{id}", delete(api::delete_contact))
        .route(
            "/bookings",
            get(api::list_bookings)
                .post(api::submit_booking)
                .delete(api::bulk_delete_bookings),
        )
        .route("/bookings/{id}", delete(api::delete_booking));

    // Health check and media serving (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/media/{*path}", get(api::serve_media));

    Router::new()
        .nest("/api", api_routes)
        .merge(public_routes)
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
