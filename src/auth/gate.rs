//! Path-prefix gate in front of the page surfaces.
//!
//! The gate is stateless: it reads the role out of the session token and
//! either lets the request through or redirects it. Invalid or expired
//! tokens count as no session.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    auth::session_token,
    models::{enums::Role, user::UserClaims},
    AppState,
};

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const HOME_PATH: &str = "/";

/// Outcome of the gate for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect(&'static str),
}

/// Role-restricted path prefixes, checked in order
const RESTRICTED_PREFIXES: [(&str, Role); 3] = [
    ("/admin", Role::Admin),
    ("/moderator", Role::Moderator),
    ("/technician", Role::Technician),
];

fn is_auth_page(path: &str) -> bool {
    path == LOGIN_PATH || path == REGISTER_PATH
}

/// Decide what happens to a request for `path` made with `role` (None when there is no session)
pub fn evaluate(path: &str, role: Option<Role>) -> GateDecision {
    let Some(role) = role else {
        return if is_auth_page(path) {
            GateDecision::Allow
        } else {
            GateDecision::Redirect(LOGIN_PATH)
        };
    };

    if is_auth_page(path) {
        return GateDecision::Redirect(HOME_PATH);
    }

    for (prefix, required) in RESTRICTED_PREFIXES {
        if path.starts_with(prefix) && role != required {
            return GateDecision::Redirect(HOME_PATH);
        }
    }

    GateDecision::Allow
}

/// Middleware applying [`evaluate`] to every surface request.
///
/// Allowed requests carry the decoded [`UserClaims`] as a request extension.
pub async fn surface_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let claims = session_token(request.headers())
        .and_then(|token| UserClaims::from_token(&token, &state.config.auth.jwt_secret).ok());

    let path = request.uri().path().to_string();
    match evaluate(&path, claims.as_ref().map(|c| c.role)) {
        GateDecision::Allow => {
            if let Some(claims) = claims {
                request.extensions_mut().insert(claims);
            }
            next.run(request).await
        }
        GateDecision::Redirect(target) => {
            tracing::debug!("Gate redirected {} to {}", path, target);
            Redirect::to(target).into_response()
        }
    }
}
