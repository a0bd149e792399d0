//! Stock Ledger Server
//!
//! A role-gated REST JSON API for an equipment catalog, the stock movement
//! ledger recorded by technicians, and quotes built from that ledger.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/logout", post(api::auth::logout))
        .route("/auth/me", get(api::auth::me))
        .route("/auth/register", post(api::auth::register))
        // Users
        .route("/users", get(api::users::list_users).post(api::users::create_user))
        .route(
            "/users/:id",
            get(api::users::get_user)
                .put(api::users::update_user)
                .delete(api::users::delete_user),
        )
        // Clients
        .route("/clients", get(api::clients::list_clients).post(api::clients::create_client))
        .route(
            "/clients/:id",
            put(api::clients::update_client).delete(api::clients::delete_client),
        )
        .route("/clients/:id/equipments", get(api::clients::list_client_equipment))
        // Equipment
        .route(
            "/equipments",
            get(api::equipment::list_equipment).post(api::equipment::create_equipment),
        )
        .route(
            "/equipments/:id",
            get(api::equipment::get_equipment)
                .put(api::equipment::update_equipment)
                .delete(api::equipment::delete_equipment),
        )
        // Movements
        .route(
            "/movements",
            get(api::movements::list_movements).post(api::movements::record_movements),
        )
        // Quotes
        .route("/quotes", post(api::quotes::build_quote))
        .with_state(state.clone());

    // Page surfaces, all behind the gate
    let surfaces = Router::new()
        .route("/", get(api::surfaces::home))
        .route("/login", get(api::surfaces::login_page))
        .route("/register", get(api::surfaces::register_page))
        .route("/admin", get(api::surfaces::admin))
        .route("/admin/*rest", get(api::surfaces::admin))
        .route("/moderator", get(api::surfaces::moderator))
        .route("/moderator/*rest", get(api::surfaces::moderator))
        .route("/technician", get(api::surfaces::technician))
        .route("/technician/*rest", get(api::surfaces::technician))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::gate::surface_gate))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(surfaces)
        .merge(openapi)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
