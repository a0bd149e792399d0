//! Page surfaces behind the gate.
//!
//! Each handler answers with a small descriptor of the view a front end
//! renders at that path. Access control happens in
//! [`crate::auth::gate::surface_gate`] before these run.

use axum::{Extension, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{
    enums::Role,
    user::{UserClaims, UserInfo},
};

/// Views a front end can render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Login,
    Register,
    AdminDashboard,
    ModeratorPanel,
    TechnicianView,
}

impl View {
    /// Default view for a role at `/`
    pub fn home_for(role: Role) -> Self {
        match role {
            Role::Admin => View::AdminDashboard,
            Role::Moderator => View::ModeratorPanel,
            Role::Technician => View::TechnicianView,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SurfaceResponse {
    pub view: View,
    /// Signed-in user, absent on the login and register pages
    pub user: Option<UserInfo>,
}

fn surface(view: View, claims: Option<&UserClaims>) -> Json<SurfaceResponse> {
    Json(SurfaceResponse {
        view,
        user: claims.map(UserClaims::user_info),
    })
}

pub async fn home(Extension(claims): Extension<UserClaims>) -> Json<SurfaceResponse> {
    surface(View::home_for(claims.role), Some(&claims))
}

pub async fn login_page() -> Json<SurfaceResponse> {
    surface(View::Login, None)
}

pub async fn register_page() -> Json<SurfaceResponse> {
    surface(View::Register, None)
}

pub async fn admin(Extension(claims): Extension<UserClaims>) -> Json<SurfaceResponse> {
    surface(View::AdminDashboard, Some(&claims))
}

pub async fn moderator(Extension(claims): Extension<UserClaims>) -> Json<SurfaceResponse> {
    surface(View::ModeratorPanel, Some(&claims))
}

pub async fn technician(Extension(claims): Extension<UserClaims>) -> Json<SurfaceResponse> {
    surface(View::TechnicianView, Some(&claims))
}
