//! Authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    auth::SESSION_COOKIE,
    error::{AppError, AppResult},
    models::{
        enums::Role,
        user::{CreateUser, User, UserInfo},
    },
    AppState,
};

use super::AuthenticatedUser;

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: UserInfo,
}

#[derive(Serialize, ToSchema)]
pub struct RegisterResponse {
    pub user: User,
}

/// Browser session cookie; the JWT inside carries its own expiry
fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Authenticate with username and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let users = &state.services.users;
    let (token, user) = users.authenticate(&request.username, &request.password).await?;
    let expires_in = users.token_lifetime();

    let jar = jar.add(session_cookie(token.clone()));

    Ok((
        jar,
        Json(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in,
            user: UserInfo::from(&user),
        }),
    ))
}

/// Clear the session cookie
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Session cleared")
    )
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/").build());
    (jar, StatusCode::NO_CONTENT)
}

/// Current session user
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<User>> {
    let user = state.services.users.get_by_id(claims.user_id).await?;
    Ok(Json(user))
}

/// Register a new account.
///
/// Needs an administrator session unless open registration is configured.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Administrator privileges required"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    caller: Option<AuthenticatedUser>,
    Json(user): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    if !state.services.users.open_registration() {
        match caller {
            Some(AuthenticatedUser(claims)) if claims.role == Role::Admin => {}
            Some(_) => {
                return Err(AppError::Authorization(
                    "Administrator privileges required".to_string(),
                ))
            }
            None => {
                return Err(AppError::Authentication(
                    "Registration requires an administrator session".to_string(),
                ))
            }
        }
    }

    let created = state.services.users.create_user(user).await?;
    Ok((StatusCode::CREATED, Json(RegisterResponse { user: created })))
}
