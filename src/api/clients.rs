//! Client registry endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        client::{Client, ClientPayload},
        equipment::ClientEquipment,
    },
    AppState,
};

use super::AuthenticatedUser;

/// List clients, highest id first
#[utoipa::path(
    get,
    path = "/clients",
    tag = "clients",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of clients", body = Vec<Client>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_clients(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Client>>> {
    let clients = state.services.clients.list().await?;
    Ok(Json(clients))
}

#[utoipa::path(
    post,
    path = "/clients",
    tag = "clients",
    security(("bearer_auth" = [])),
    request_body = ClientPayload,
    responses(
        (status = 201, description = "Client created", body = Client),
        (status = 400, description = "Blank name"),
        (status = 403, description = "Admin or moderator role required")
    )
)]
pub async fn create_client(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<ClientPayload>,
) -> AppResult<(StatusCode, Json<Client>)> {
    claims.require_catalog_write()?;

    let client = state.services.clients.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

#[utoipa::path(
    put,
    path = "/clients/{id}",
    tag = "clients",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Client ID")
    ),
    request_body = ClientPayload,
    responses(
        (status = 200, description = "Client renamed", body = Client),
        (status = 404, description = "Client not found")
    )
)]
pub async fn update_client(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<ClientPayload>,
) -> AppResult<Json<Client>> {
    claims.require_catalog_write()?;

    let client = state.services.clients.rename(id, &payload).await?;
    Ok(Json(client))
}

/// Delete a client; its equipment becomes unassigned
#[utoipa::path(
    delete,
    path = "/clients/{id}",
    tag = "clients",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Client ID")
    ),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 404, description = "Client not found")
    )
)]
pub async fn delete_client(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_catalog_write()?;

    state.services.clients.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Equipment owned by a client with its current stock
#[utoipa::path(
    get,
    path = "/clients/{id}/equipments",
    tag = "clients",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Client ID")
    ),
    responses(
        (status = 200, description = "Client equipment", body = Vec<ClientEquipment>),
        (status = 404, description = "Client not found")
    )
)]
pub async fn list_client_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<ClientEquipment>>> {
    let equipment = state.services.clients.equipment(id).await?;
    Ok(Json(equipment))
}
