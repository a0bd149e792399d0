//! In-process tests of the page surface gate.
//!
//! The pool connects lazily and none of these requests reach the database.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use stock_ledger::{
    config::AppConfig,
    create_router,
    models::{enums::Role, user::UserClaims},
    repository::Repository,
    services::Services,
    AppState,
};

fn app(config: &AppConfig) -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database.url)
        .unwrap();
    let services = Services::new(Repository::new(pool), config);
    create_router(AppState {
        config: Arc::new(config.clone()),
        services: Arc::new(services),
    })
}

fn token(config: &AppConfig, role: Role) -> String {
    let now = Utc::now().timestamp();
    UserClaims {
        sub: "someone".to_string(),
        user_id: 42,
        role,
        exp: now + 3600,
        iat: now,
    }
    .create_token(&config.auth.jwt_secret)
    .unwrap()
}

async fn get(app: Router, path: &str, bearer: Option<&str>) -> axum::response::Response {
    let mut request = Request::builder().uri(path);
    if let Some(token) = bearer {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    app.oneshot(request.body(Body::empty()).unwrap()).await.unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn technician_requesting_admin_is_redirected_home() {
    let config = AppConfig::default();
    let token = token(&config, Role::Technician);

    let response = get(app(&config), "/admin", Some(&token)).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/");

    let response = get(app(&config), "/admin/users", Some(&token)).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn anonymous_requests_go_to_login() {
    let config = AppConfig::default();

    let response = get(app(&config), "/", None).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");

    let response = get(app(&config), "/technician", None).await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn login_page_is_open_without_session() {
    let config = AppConfig::default();
    let response = get(app(&config), "/login", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn signed_in_users_leave_auth_pages() {
    let config = AppConfig::default();
    let token = token(&config, Role::Moderator);
    let response = get(app(&config), "/register", Some(&token)).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn token_signed_with_another_secret_counts_as_no_session() {
    let config = AppConfig::default();
    let mut other = config.clone();
    other.auth.jwt_secret = "another-secret".to_string();
    let forged = token(&other, Role::Admin);

    let response = get(app(&config), "/admin", Some(&forged)).await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn home_renders_the_role_view() {
    let config = AppConfig::default();
    let token = token(&config, Role::Technician);

    let response = get(app(&config), "/", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["view"], "technician_view");
    assert_eq!(json["user"]["role"], "TECHNICIAN");
}

#[tokio::test]
async fn session_cookie_is_accepted() {
    let config = AppConfig::default();
    let token = token(&config, Role::Admin);

    let request = Request::builder()
        .uri("/admin")
        .header(header::COOKIE, format!("session={}", token))
        .body(Body::empty())
        .unwrap();
    let response = app(&config).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn api_requires_a_session() {
    let config = AppConfig::default();
    let response = get(app(&config), "/api/v1/movements", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn technician_cannot_build_quotes() {
    let config = AppConfig::default();
    let token = token(&config, Role::Technician);

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/quotes")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = app(&config).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
