//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, clients, equipment, health, movements, quotes, surfaces, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stock Ledger API",
        version = "1.0.0",
        description = "Equipment catalog, stock movement ledger and quote REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::logout,
        auth::me,
        auth::register,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Clients
        clients::list_clients,
        clients::create_client,
        clients::update_client,
        clients::delete_client,
        clients::list_client_equipment,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        // Movements
        movements::record_movements,
        movements::list_movements,
        // Quotes
        quotes::build_quote,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterResponse,
            // Users
            crate::models::enums::Role,
            crate::models::user::User,
            crate::models::user::UserInfo,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            // Clients
            crate::models::client::Client,
            crate::models::client::ClientRef,
            crate::models::client::ClientPayload,
            // Equipment
            crate::models::enums::EquipmentType,
            crate::models::equipment::Equipment,
            crate::models::equipment::ClientEquipment,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            // Movements
            crate::models::enums::MovementType,
            crate::models::movement::Movement,
            crate::models::movement::MovementDetails,
            crate::models::movement::MovementEquipment,
            crate::models::movement::MovementTechnician,
            crate::models::movement::MovementInput,
            crate::models::movement::RecordMovements,
            crate::models::movement::MovementQuery,
            // Quotes
            crate::models::quote::QuoteRequest,
            crate::models::quote::CustomGroup,
            crate::models::quote::CustomItem,
            crate::models::quote::Quote,
            crate::models::quote::QuoteGroup,
            crate::models::quote::QuoteLine,
            // Surfaces
            surfaces::View,
            surfaces::SurfaceResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User management"),
        (name = "clients", description = "Client registry"),
        (name = "equipment", description = "Equipment catalog"),
        (name = "movements", description = "Stock movement ledger"),
        (name = "quotes", description = "Quotes built from the ledger")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
