//! End-to-end tests for the registry API
//!
//! Each test builds the real router over a fresh in-memory SQLite
//! database and drives it with `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use serde_json::{json, Value};
use tower::ServiceExt;

use harbor_registry::auth::jwt::{create_token, JwtConfig};
use harbor_registry::auth::password::hash_password;
use harbor_registry::create_api_router;
use harbor_registry::infrastructure::database::entities::user::{self, UserRole};
use harbor_registry::infrastructure::database::migrator::Migrator;

const PASSWORD: &str = "secret123!";

struct TestApp {
    router: Router,
    admin_token: String,
    operator_token: String,
    guard_token: String,
}

async fn seed_user(
    db: &DatabaseConnection,
    username: &str,
    role: UserRole,
    jwt: &JwtConfig,
) -> String {
    let now = Utc::now();
    let id = uuid::Uuid::new_v4().to_string();
    let model = user::ActiveModel {
        id: Set(id.clone()),
        username: Set(username.to_string()),
        email: Set(format!("{}@example.com", username)),
        password_hash: Set(hash_password(PASSWORD).unwrap()),
        role: Set(role),
        is_superuser: Set(false),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        last_login_at: Set(None),
    };
    model.insert(db).await.unwrap();

    create_token(&id, username, role, false, jwt).unwrap()
}

async fn setup() -> TestApp {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let jwt = JwtConfig {
        secret: "test-secret".to_string(),
        expiration_hours: 1,
        issuer: "harbor-registry".to_string(),
    };

    let admin_token = seed_user(&db, "portmaster", UserRole::Admin, &jwt).await;
    let operator_token = seed_user(&db, "dockhand", UserRole::Operator, &jwt).await;
    let guard_token = seed_user(&db, "watchman", UserRole::Guard, &jwt).await;

    TestApp {
        router: create_api_router(db, jwt),
        admin_token,
        operator_token,
        guard_token,
    }
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Value, Option<String>) {
    let response = app.router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body, location)
}

fn ship_payload(name: &str, imo: &str) -> Value {
    json!({ "name": name, "imo": imo, "flag": "Panamá", "type": "cargo" })
}

async fn create_ship(app: &TestApp, token: &str, name: &str, imo: &str) -> Value {
    let (status, body, _) = send(
        app,
        request("POST", "/api/v1/ships", Some(token), Some(ship_payload(name, imo))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"].clone()
}

async fn list_ships(app: &TestApp, token: &str) -> Vec<Value> {
    let (status, body, _) = send(app, request("GET", "/api/v1/ships", Some(token), None)).await;
    assert_eq!(status, StatusCode::OK);
    body["data"].as_array().unwrap().clone()
}

#[tokio::test]
async fn home_is_public() {
    let app = setup().await;
    let (status, body, _) = send(&app, request("GET", "/", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_ships"], 0);
}

#[tokio::test]
async fn unauthenticated_requests_redirect_to_login() {
    let app = setup().await;
    let (status, _, location) = send(&app, request("GET", "/api/v1/ships", None, None)).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/api/v1/auth/login"));
}

#[tokio::test]
async fn login_returns_token_with_role() {
    let app = setup().await;
    let (status, body, _) = send(
        &app,
        request(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": "portmaster", "password": PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["token"].as_str().unwrap().len() > 20);
    assert_eq!(body["data"]["user"]["role"], "admin");
}

#[tokio::test]
async fn login_rejects_bad_password() {
    let app = setup().await;
    let (status, body, _) = send(
        &app,
        request(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": "portmaster", "password": "wrong" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn register_defaults_to_guard_role() {
    let app = setup().await;
    let (status, body, _) = send(
        &app,
        request(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({
                "username": "newcomer",
                "email": "newcomer@example.com",
                "password": "long-enough-pw"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], "guard");
    assert_eq!(body["data"]["is_superuser"], false);
}

#[tokio::test]
async fn create_requires_imo() {
    let app = setup().await;
    let (status, body, _) = send(
        &app,
        request(
            "POST",
            "/api/v1/ships",
            Some(&app.operator_token),
            Some(json!({ "name": "Nameless", "imo": "" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("imo"));
}

#[tokio::test]
async fn create_rejects_unknown_vessel_type() {
    let app = setup().await;
    let (status, body, _) = send(
        &app,
        request(
            "POST",
            "/api/v1/ships",
            Some(&app.operator_token),
            Some(json!({ "name": "Nautilus", "imo": "1234567", "type": "submarine" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("type"));
    assert!(list_ships(&app, &app.guard_token).await.is_empty());
}

#[tokio::test]
async fn create_applies_defaults() {
    let app = setup().await;
    let (status, body, _) = send(
        &app,
        request(
            "POST",
            "/api/v1/ships",
            Some(&app.operator_token),
            Some(json!({ "name": "Esmeraldas Trader", "imo": "7654321" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["flag"], "Ecuador");
    assert_eq!(body["data"]["type"], "cargo");
    assert_eq!(body["data"]["registered_by"], "dockhand");
}

#[tokio::test]
async fn guard_cannot_mutate_and_store_is_unchanged() {
    let app = setup().await;
    let ship = create_ship(&app, &app.operator_token, "Calypso", "1111111").await;
    let id = ship["id"].as_str().unwrap();

    // create
    let (status, _, location) = send(
        &app,
        request(
            "POST",
            "/api/v1/ships",
            Some(&app.guard_token),
            Some(ship_payload("Intruder", "2222222")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/"));

    // edit
    let (status, _, _) = send(
        &app,
        request(
            "PUT",
            &format!("/api/v1/ships/{}", id),
            Some(&app.guard_token),
            Some(ship_payload("Renamed", "1111111")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    // delete
    let (status, _, _) = send(
        &app,
        request(
            "POST",
            &format!("/api/v1/ships/{}/delete", id),
            Some(&app.guard_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let ships = list_ships(&app, &app.guard_token).await;
    assert_eq!(ships.len(), 1);
    assert_eq!(ships[0]["name"], "Calypso");
}

#[tokio::test]
async fn operator_cannot_delete() {
    let app = setup().await;
    let ship = create_ship(&app, &app.operator_token, "Calypso", "1111111").await;
    let id = ship["id"].as_str().unwrap();

    let (status, _, location) = send(
        &app,
        request(
            "POST",
            &format!("/api/v1/ships/{}/delete", id),
            Some(&app.operator_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/"));
    assert_eq!(list_ships(&app, &app.guard_token).await.len(), 1);
}

#[tokio::test]
async fn list_is_ordered_newest_first() {
    let app = setup().await;
    for (name, imo) in [("First", "0000001"), ("Second", "0000002"), ("Third", "0000003")] {
        create_ship(&app, &app.operator_token, name, imo).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let ships = list_ships(&app, &app.guard_token).await;
    let names: Vec<&str> = ships.iter().map(|s| s["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Third", "Second", "First"]);
}

#[tokio::test]
async fn edit_preserves_audit_fields() {
    let app = setup().await;
    let ship = create_ship(&app, &app.operator_token, "Orion", "3333333").await;
    let id = ship["id"].as_str().unwrap();

    let (_, before, _) = send(
        &app,
        request("GET", &format!("/api/v1/ships/{}", id), Some(&app.guard_token), None),
    )
    .await;

    // Unchanged payload submitted by a *different* user
    let (status, _, _) = send(
        &app,
        request(
            "PUT",
            &format!("/api/v1/ships/{}", id),
            Some(&app.admin_token),
            Some(json!({ "name": "Orion", "imo": "3333333", "flag": "Panamá", "type": "cargo" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, after, _) = send(
        &app,
        request("GET", &format!("/api/v1/ships/{}", id), Some(&app.guard_token), None),
    )
    .await;

    assert_eq!(before["data"]["registered_by"], "dockhand");
    assert_eq!(after["data"]["registered_by"], "dockhand");
    assert_eq!(before["data"]["registered_at"], after["data"]["registered_at"]);
}

#[tokio::test]
async fn edit_rejects_another_ships_imo_but_not_its_own() {
    let app = setup().await;
    create_ship(&app, &app.operator_token, "Alpha", "4444444").await;
    let beta = create_ship(&app, &app.operator_token, "Beta", "5555555").await;
    let beta_id = beta["id"].as_str().unwrap();

    // Collision with Alpha
    let (status, body, _) = send(
        &app,
        request(
            "PUT",
            &format!("/api/v1/ships/{}", beta_id),
            Some(&app.operator_token),
            Some(ship_payload("Beta", "4444444")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("IMO"));

    // Keeping its own IMO is not a self-collision
    let (status, _, _) = send(
        &app,
        request(
            "PUT",
            &format!("/api/v1/ships/{}", beta_id),
            Some(&app.operator_token),
            Some(ship_payload("Beta Renamed", "5555555")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn dashboard_groups_by_type_and_gates_personal_count() {
    let app = setup().await;
    let (status, _, _) = send(
        &app,
        request(
            "POST",
            "/api/v1/ships",
            Some(&app.operator_token),
            Some(json!({ "name": "Box Carrier", "imo": "6000001", "type": "cargo" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _, _) = send(
        &app,
        request(
            "POST",
            "/api/v1/ships",
            Some(&app.admin_token),
            Some(json!({ "name": "Deep Haul", "imo": "6000002", "type": "tanker" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Guard sees totals but no personal count
    let (status, body, _) = send(
        &app,
        request("GET", "/api/v1/dashboard", Some(&app.guard_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_ships"], 2);
    assert_eq!(body["data"]["ships_by_type"]["cargo"], 1);
    assert_eq!(body["data"]["ships_by_type"]["tanker"], 1);
    assert!(body["data"]["ships_by_type"].get("fishing").is_none());
    assert!(body["data"].get("my_registrations").is_none());

    // Operator additionally sees their own registration count
    let (_, body, _) = send(
        &app,
        request("GET", "/api/v1/dashboard", Some(&app.operator_token), None),
    )
    .await;
    assert_eq!(body["data"]["my_registrations"], 1);
}

#[tokio::test]
async fn role_change_requires_admin() {
    let app = setup().await;
    let (_, users, _) = send(&app, request("GET", "/api/v1/users", Some(&app.admin_token), None)).await;
    let watchman = users["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["username"] == "watchman")
        .unwrap()
        .clone();
    let watchman_id = watchman["id"].as_str().unwrap();

    // Operator is redirected away
    let (status, _, location) = send(
        &app,
        request(
            "PUT",
            &format!("/api/v1/users/{}/role", watchman_id),
            Some(&app.operator_token),
            Some(json!({ "role": "operator" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/"));

    // Admin can promote
    let (status, body, _) = send(
        &app,
        request(
            "PUT",
            &format!("/api/v1/users/{}/role", watchman_id),
            Some(&app.admin_token),
            Some(json!({ "role": "operator" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "operator");
}

/// The full lifecycle scenario: registration, duplicate rejection,
/// guard rejection, two-step admin delete, 404 afterwards.
#[tokio::test]
async fn full_lifecycle_scenario() {
    let app = setup().await;

    // Admin registers the ship
    let (status, body, _) = send(
        &app,
        request(
            "POST",
            "/api/v1/ships",
            Some(&app.admin_token),
            Some(json!({ "name": "MSC Esperanza", "imo": "9484525", "flag": "Panamá", "type": "cargo" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["registered_by"], "portmaster");
    assert_eq!(body["notice"]["tag"], "success");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    // Operator tries the same IMO again
    let (status, body, _) = send(
        &app,
        request(
            "POST",
            "/api/v1/ships",
            Some(&app.operator_token),
            Some(ship_payload("Impostor", "9484525")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("IMO"));
    assert_eq!(list_ships(&app, &app.guard_token).await.len(), 1);

    // Guard cannot delete it
    let (status, _, _) = send(
        &app,
        request(
            "POST",
            &format!("/api/v1/ships/{}/delete", id),
            Some(&app.guard_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(list_ships(&app, &app.guard_token).await.len(), 1);

    // Admin confirms, then deletes
    let (status, body, _) = send(
        &app,
        request(
            "GET",
            &format!("/api/v1/ships/{}/delete", id),
            Some(&app.admin_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "MSC Esperanza");

    let (status, body, _) = send(
        &app,
        request(
            "POST",
            &format!("/api/v1/ships/{}/delete", id),
            Some(&app.admin_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notice"]["tag"], "warning");

    // Gone for good
    let (status, _, _) = send(
        &app,
        request("GET", &format!("/api/v1/ships/{}", id), Some(&app.admin_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
