//! API integration tests against a running server.
//!
//! Expects a server on localhost:8080 started with a bootstrap administrator
//! `admin` / `admin` (BOOTSTRAP_ADMIN_USERNAME / BOOTSTRAP_ADMIN_PASSWORD).

use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::{json, Value};

const ROOT_URL: &str = "http://localhost:8080";
const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Suffix keeping names unique across runs
fn unique(prefix: &str) -> String {
    format!("{}{}", prefix, chrono::Utc::now().timestamp_micros())
}

async fn login(client: &Client, username: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");

    assert!(response.status().is_success(), "login failed for {}", username);
    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

async fn admin_token(client: &Client) -> String {
    login(client, "admin", "admin").await
}

/// Register a user through the admin session and return its id
async fn create_user(client: &Client, admin: &str, username: &str, role: &str) -> i64 {
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .bearer_auth(admin)
        .json(&json!({ "username": username, "password": "secret", "role": role }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["user"]["id"].as_i64().expect("No user id")
}

async fn create_client(client: &Client, token: &str, name: &str) -> i64 {
    let response = client
        .post(format!("{}/clients", BASE_URL))
        .bearer_auth(token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No client id")
}

async fn create_equipment(client: &Client, token: &str, body: Value) -> Value {
    let response = client
        .post(format!("{}/equipments", BASE_URL))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    for (username, password) in [("admin", "wrong"), ("nobody-at-all", "admin")] {
        let response = client
            .post(format!("{}/auth/login", BASE_URL))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to send request");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["message"], "Invalid credentials");
    }
}

#[tokio::test]
#[ignore]
async fn test_get_current_user() {
    let client = Client::new();
    let token = admin_token(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["username"], "admin");
    assert_eq!(body["role"], "ADMIN");
    assert!(body.get("password").is_none());
}

#[tokio::test]
#[ignore]
async fn test_duplicate_registration_conflicts() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let username = unique("dup");

    create_user(&client, &admin, &username, "TECHNICIAN").await;

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({ "username": username, "password": "other", "role": "MODERATOR" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Username already exists");

    let users: Value = client
        .get(format!("{}/users", BASE_URL))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let matching = users
        .as_array()
        .expect("users is an array")
        .iter()
        .filter(|u| u["username"] == username.as_str())
        .count();
    assert_eq!(matching, 1);
}

#[tokio::test]
#[ignore]
async fn test_registration_requires_admin_session() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({ "username": unique("anon"), "password": "secret", "role": "ADMIN" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_equipment_lists_its_client() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let client_name = unique("Client ");
    let client_id = create_client(&client, &admin, &client_name).await;

    let equipment = create_equipment(
        &client,
        &admin,
        json!({ "name": unique("Badge "), "type": "CONTROLE D'ACCES", "clientId": client_id, "price": 45.5 }),
    )
    .await;
    let equipment_id = equipment["id"].as_i64().expect("No equipment id");

    let list: Value = client
        .get(format!("{}/equipments", BASE_URL))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let listed = list
        .as_array()
        .expect("equipment list is an array")
        .iter()
        .find(|e| e["id"].as_i64() == Some(equipment_id))
        .expect("created equipment is listed");
    assert_eq!(listed["client"]["id"].as_i64(), Some(client_id));
    assert_eq!(listed["client"]["name"], client_name.as_str());

    // The sentinel clears the client
    let updated: Value = client
        .put(format!("{}/equipments/{}", BASE_URL, equipment_id))
        .bearer_auth(&admin)
        .json(&json!({ "clientId": "NULL" }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(updated["client"].is_null());
    assert!(updated["client_id"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_unknown_client_reference_rejected() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let response = client
        .post(format!("{}/equipments", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({ "name": "Orphan", "type": "INCENDIES", "clientId": 2_000_000_000 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_repeated_rename_is_idempotent() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let client_id = create_client(&client, &admin, &unique("Before ")).await;
    let new_name = unique("After ");

    for _ in 0..2 {
        let response = client
            .put(format!("{}/clients/{}", BASE_URL, client_id))
            .bearer_auth(&admin)
            .json(&json!({ "name": new_name }))
            .send()
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success());
    }

    let clients: Value = client
        .get(format!("{}/clients", BASE_URL))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let matching: Vec<&Value> = clients
        .as_array()
        .expect("clients is an array")
        .iter()
        .filter(|c| c["name"] == new_name.as_str())
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0]["id"].as_i64(), Some(client_id));
}

#[tokio::test]
#[ignore]
async fn test_only_positive_quantities_are_stored() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let tech_name = unique("tech");
    create_user(&client, &admin, &tech_name, "TECHNICIAN").await;
    let tech = login(&client, &tech_name, "secret").await;

    let a = create_equipment(&client, &admin, json!({ "name": unique("Cable "), "type": "CABLES/ACCESSOIRES" })).await;
    let b = create_equipment(&client, &admin, json!({ "name": unique("Plug "), "type": "CABLES/ACCESSOIRES" })).await;

    let response = client
        .post(format!("{}/movements", BASE_URL))
        .bearer_auth(&tech)
        .json(&json!({
            "type": "ENTREE",
            "agence": "Rabat",
            "movements": [
                { "equipment_id": a["id"], "quantity": 5 },
                { "equipment_id": b["id"], "quantity": 0 },
                { "equipment_id": b["id"], "quantity": -2 }
            ]
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(created.as_array().map(Vec::len), Some(1));

    let rows: Value = client
        .get(format!("{}/movements", BASE_URL))
        .bearer_auth(&tech)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let rows = rows.as_array().expect("movements is an array");
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|r| r["quantity"].as_i64().unwrap_or(0) > 0));
    assert!(rows.iter().all(|r| r["technician"]["username"] == tech_name.as_str()));

    // Nothing left after screening
    let response = client
        .post(format!("{}/movements", BASE_URL))
        .bearer_auth(&tech)
        .json(&json!({ "type": "SORTIE", "movements": [{ "equipment_id": a["id"], "quantity": 0 }] }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_technician_redirected_from_admin() {
    let client = Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client");
    let admin = admin_token(&client).await;
    let tech_name = unique("tech");
    create_user(&client, &admin, &tech_name, "TECHNICIAN").await;
    let tech = login(&client, &tech_name, "secret").await;

    let response = client
        .get(format!("{}/admin", ROOT_URL))
        .bearer_auth(&tech)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_redirection());
    assert_eq!(
        response.headers().get("location").and_then(|v| v.to_str().ok()),
        Some("/")
    );
}

#[tokio::test]
#[ignore]
async fn test_sortie_scenario_quote() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let acme = create_client(&client, &admin, &unique("Acme ")).await;
    let camera_name = unique("Camera ");
    let camera = create_equipment(
        &client,
        &admin,
        json!({ "name": camera_name, "type": "VIDEO SURVEILLANCE", "price": 1200, "clientId": acme }),
    )
    .await;

    let tech_name = unique("T");
    create_user(&client, &admin, &tech_name, "TECHNICIAN").await;
    let tech = login(&client, &tech_name, "secret").await;

    let response = client
        .post(format!("{}/movements", BASE_URL))
        .bearer_auth(&tech)
        .json(&json!({
            "type": "SORTIE",
            "agence": "Casablanca",
            "movements": [{ "equipment_id": camera["id"], "quantity": 3 }]
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let rows: Value = client
        .get(format!("{}/movements", BASE_URL))
        .bearer_auth(&admin)
        .query(&[("client_id", acme)])
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let rows = rows.as_array().expect("movements is an array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["quantity"], 3);
    assert_eq!(rows[0]["type"], "SORTIE");
    assert_eq!(rows[0]["agence"], "Casablanca");
    assert_eq!(rows[0]["equipment"]["name"], camera_name.as_str());
    assert_eq!(rows[0]["equipment"]["client"]["id"].as_i64(), Some(acme));
    assert_eq!(rows[0]["technician"]["username"], tech_name.as_str());

    let quote: Value = client
        .post(format!("{}/quotes", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({ "client_id": acme, "objet": "Installation" }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let groups = quote["groups"].as_array().expect("groups is an array");
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["label"], "VIDEO SURVEILLANCE");
    assert_eq!(groups[0]["subtotal"].as_f64(), Some(3600.0));
    assert_eq!(quote["total_ttc"].as_f64(), Some(4320.0));
    assert!(quote["number"].as_str().unwrap_or_default().starts_with("DEV"));
}

#[tokio::test]
#[ignore]
async fn test_update_rejects_short_trimmed_username() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let username = unique("rename");
    let id = create_user(&client, &admin, &username, "MODERATOR").await;

    for candidate in ["   ", "  ab "] {
        let response = client
            .put(format!("{}/users/{}", BASE_URL, id))
            .bearer_auth(&admin)
            .json(&json!({ "username": candidate }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let user: Value = client
        .get(format!("{}/users/{}", BASE_URL, id))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(user["username"], username.as_str());
}

#[tokio::test]
#[ignore]
async fn test_blank_reference_clears_equipment_ref() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let equipment = create_equipment(
        &client,
        &admin,
        json!({ "name": unique("Sensor "), "ref": "SNS-1", "type": "INCENDIES" }),
    )
    .await;
    assert_eq!(equipment["ref"], "SNS-1");

    let updated: Value = client
        .put(format!("{}/equipments/{}", BASE_URL, equipment["id"]))
        .bearer_auth(&admin)
        .json(&json!({ "ref": "" }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(updated["ref"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_oversized_custom_quote_is_rejected() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let response = client
        .post(format!("{}/quotes", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({
            "start_date": "1970-01-01",
            "end_date": "1970-01-01",
            "custom_groups": [{
                "type": "Extras",
                "items": [{ "description": "Huge", "unit_price": 1e28, "quantity": 100 }]
            }]
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
