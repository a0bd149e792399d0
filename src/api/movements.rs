//! Movement ledger endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::movement::{Movement, MovementDetails, MovementQuery, RecordMovements},
    AppState,
};

use super::AuthenticatedUser;

/// Record a movement batch for the signed-in technician
#[utoipa::path(
    post,
    path = "/movements",
    tag = "movements",
    security(("bearer_auth" = [])),
    request_body = RecordMovements,
    responses(
        (status = 201, description = "Movements recorded", body = Vec<Movement>),
        (status = 400, description = "Nothing left after screening, mixed types or unknown equipment"),
        (status = 403, description = "Technician role required")
    )
)]
pub async fn record_movements(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(batch): Json<RecordMovements>,
) -> AppResult<(StatusCode, Json<Vec<Movement>>)> {
    claims.require_technician()?;

    let movements = state
        .services
        .movements
        .record_batch(claims.user_id, batch)
        .await?;
    Ok((StatusCode::CREATED, Json(movements)))
}

/// List ledger rows, newest first. Technicians only see their own rows.
#[utoipa::path(
    get,
    path = "/movements",
    tag = "movements",
    security(("bearer_auth" = [])),
    params(MovementQuery),
    responses(
        (status = 200, description = "Ledger rows", body = Vec<MovementDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_movements(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<MovementQuery>,
) -> AppResult<Json<Vec<MovementDetails>>> {
    let movements = state.services.movements.list(&claims, &query).await?;
    Ok(Json(movements))
}
