//! API handlers for the stock ledger REST endpoints

pub mod auth;
pub mod clients;
pub mod equipment;
pub mod health;
pub mod movements;
pub mod openapi;
pub mod quotes;
pub mod surfaces;
pub mod users;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::{auth::session_token, error::AppError, models::user::UserClaims, AppState};

/// Extractor for the authenticated user, from a Bearer token or the session cookie
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers)
            .ok_or_else(|| AppError::Authentication("Missing session token".to_string()))?;

        let claims = state.services.users.verify_token(&token)?;

        Ok(AuthenticatedUser(claims))
    }
}
