//! Quote ("devis") endpoint

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::quote::{Quote, QuoteRequest},
    AppState,
};

use super::AuthenticatedUser;

/// Build a quote from the ledger rows matching the request filters
#[utoipa::path(
    post,
    path = "/quotes",
    tag = "quotes",
    security(("bearer_auth" = [])),
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Quote document", body = Quote),
        (status = 403, description = "Admin or moderator role required"),
        (status = 404, description = "Client not found")
    )
)]
pub async fn build_quote(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<QuoteRequest>,
) -> AppResult<Json<Quote>> {
    claims.require_catalog_write()?;

    let quote = state.services.quotes.build_quote(&request).await?;
    Ok(Json(quote))
}
