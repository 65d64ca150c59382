use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use worker_missions::config::Config;

fn test_config() -> Config {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.security.sign_key = "api-test-signing-key".to_string();
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config
}

async fn spawn_app() -> Router {
    let state = worker_missions::api::create_app_state_from_config(test_config(), None)
        .await
        .expect("Failed to create app state");
    worker_missions::api::router(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

/// Registers a worker and returns `(worker_id, token)`.
async fn register(app: &Router, name: &str, email: &str, limit: f64) -> (String, String) {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/worker/add",
            &json!({
                "name": name,
                "weightLimit": limit,
                "email": email,
                "password": "hunter22",
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    (
        body["worker"]["id"].as_str().unwrap().to_string(),
        body["token"].as_str().unwrap().to_string(),
    )
}

async fn add_item(app: &Router, name: &str, weight: f64) -> String {
    let (status, body) = send(
        app,
        json_request("POST", "/item/add", &json!({ "name": name, "weight": weight })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["item"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_protected_routes_require_bearer_token() {
    let app = spawn_app().await;

    for uri in ["/worker/all", "/item/all"] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "not_authenticated");

        let (status, _) = send(&app, get_with_token(uri, "not-a-token")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let request = Request::builder()
            .uri(uri)
            .header("Authorization", "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_register_then_list_workers() {
    let app = spawn_app().await;
    let (worker_id, token) = register(&app, "Ann", "Ann@Example.com", 80.0).await;

    let (status, body) = send(&app, get_with_token("/worker/all", &token)).await;
    assert_eq!(status, StatusCode::OK);

    let workers = body["allWorkers"].as_array().unwrap();
    assert_eq!(workers.len(), 1);
    assert_eq!(workers[0]["id"], worker_id.as_str());
    assert_eq!(workers[0]["email"], "ann@example.com");
    assert_eq!(workers[0]["state"], "resting");
    assert_eq!(workers[0]["weightLimit"], 80.0);
    assert!(workers[0].get("password").is_none());
    assert!(workers[0].get("passwordHash").is_none());
    assert!(workers[0].get("tokens").is_none());
}

#[tokio::test]
async fn test_register_validation() {
    let app = spawn_app().await;
    register(&app, "Ann", "ann@example.com", 100.0).await;

    let cases = [
        json!({ "name": "Bob", "email": "bob@example.com", "password": "MyPassword1" }),
        json!({ "name": "Bob", "email": "bob@example.com", "password": "short" }),
        json!({ "name": "Bob", "email": "not-an-email", "password": "hunter22" }),
        json!({ "name": "Bob", "email": "ANN@example.com", "password": "hunter22" }),
        json!({ "name": "Bob", "email": "bob@example.com", "password": "hunter22", "weightLimit": -5 }),
        json!({ "email": "bob@example.com", "password": "hunter22" }),
    ];

    for case in cases {
        let (status, body) = send(&app, json_request("POST", "/worker/add", &case)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{case} -> {body}");
        assert_eq!(body["error"], "validation_error");
    }
}

#[tokio::test]
async fn test_default_weight_limit() {
    let app = spawn_app().await;
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/worker/add",
            &json!({ "name": "Dee", "email": "dee@example.com", "password": "hunter22" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], 1);
    assert_eq!(body["worker"]["weightLimit"], 100.0);
}

#[tokio::test]
async fn test_login_and_logout() {
    let app = spawn_app().await;
    let (worker_id, first_token) = register(&app, "Ann", "ann@example.com", 100.0).await;

    let (status, body) = send(
        &app,
        json_request("POST", "/worker/login", &json!({ "email": "ann@example.com", "password": "wrong-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "not_authenticated");

    let (status, _) = send(
        &app,
        json_request("POST", "/worker/login", &json!({ "email": "nobody@example.com", "password": "hunter22" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, json_request("POST", "/worker/login", &json!({ "email": "ann@example.com" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        json_request("POST", "/worker/login", &json!({ "email": "ann@example.com", "password": "hunter22" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], 1);
    assert_eq!(body["worker"]["id"], worker_id.as_str());
    let second_token = body["token"].as_str().unwrap().to_string();
    assert_ne!(first_token, second_token);

    // Both sessions are live
    assert_eq!(send(&app, get_with_token("/item/all", &first_token)).await.0, StatusCode::OK);
    assert_eq!(send(&app, get_with_token("/item/all", &second_token)).await.0, StatusCode::OK);

    let logout = Request::builder()
        .method("POST")
        .uri("/worker/logout")
        .header("Authorization", format!("Bearer {first_token}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, logout).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], 1);

    assert_eq!(
        send(&app, get_with_token("/item/all", &first_token)).await.0,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(send(&app, get_with_token("/item/all", &second_token)).await.0, StatusCode::OK);
}

#[tokio::test]
async fn test_login_with_password_padded_by_spaces() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/worker/add",
            &json!({ "name": "Ann", "email": "ann@example.com", "password": "  hunter22 " }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let worker_id = body["worker"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        json_request("POST", "/worker/login", &json!({ "email": "ann@example.com", "password": "  hunter22 " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["worker"]["id"], worker_id.as_str());

    let (status, _) = send(
        &app,
        json_request("POST", "/worker/login", &json!({ "email": "ann@example.com", "password": "hunter22" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_from_another_key_is_rejected() {
    let app = spawn_app().await;
    let (worker_id, _) = register(&app, "Ann", "ann@example.com", 100.0).await;

    let forged = worker_missions::services::TokenSigner::new("some-other-key", chrono::Duration::hours(1))
        .issue(&worker_missions::domain::WorkerId::new(worker_id))
        .unwrap();

    let (status, _) = send(&app, get_with_token("/worker/all", &forged)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_worker_details_and_current_state() {
    let app = spawn_app().await;
    let (worker_id, _) = register(&app, "Ann", "ann@example.com", 100.0).await;

    let (status, body) = send(&app, get(&format!("/worker/details/{worker_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ann");

    let (status, body) = send(&app, get("/worker/details/missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    // workerId in a GET body
    let (status, body) = send(
        &app,
        json_request("GET", "/worker/currentState", &json!({ "workerId": worker_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "resting");

    // workerId as a query parameter
    let (status, body) = send(&app, get(&format!("/worker/currentState?workerId={worker_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "resting");

    let (status, body) = send(&app, get("/worker/currentState")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = send(&app, get("/worker/currentState?workerId=missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_items() {
    let app = spawn_app().await;
    let (_, token) = register(&app, "Ann", "ann@example.com", 100.0).await;

    let crate_id = add_item(&app, "Crate", 12.5).await;

    let (status, body) = send(&app, json_request("POST", "/item/add", &json!({ "name": "Crate", "weight": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, _) = send(&app, json_request("POST", "/item/add", &json!({ "name": "Anvil", "weight": -1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, json_request("POST", "/item/add", &json!({ "name": "Feather" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["item"]["weight"], 0.0);

    let (status, body) = send(&app, get(&format!("/item/details/{crate_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Crate");

    let (status, _) = send(&app, get("/item/details/missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, get_with_token("/item/all", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_mission_endpoints() {
    let app = spawn_app().await;
    let (worker_id, _) = register(&app, "Ann", "ann@example.com", 100.0).await;
    let light = add_item(&app, "Light", 60.0).await;
    let heavy = add_item(&app, "Heavy", 50.0).await;

    let (status, body) = send(
        &app,
        json_request("POST", "/mission/add", &json!({ "worker": worker_id, "items": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let mission_id = body["mission"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["mission"]["state"], "in_progress");
    assert_eq!(body["mission"]["worker"]["id"], worker_id.as_str());
    assert_eq!(body["mission"]["worker"]["state"], "onMission");

    let (status, body) = send(
        &app,
        json_request("PATCH", "/mission/loadItem", &json!({ "missionId": mission_id, "itemId": light })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["mission"]["items"][0]["name"], "Light");

    let (status, body) = send(
        &app,
        json_request("PATCH", "/mission/loadItem", &json!({ "missionId": mission_id, "itemId": heavy })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "capacity_exceeded");
    assert!(body["message"].as_str().unwrap().contains("100"));
    assert!(body["message"].as_str().unwrap().contains("110"));

    let (_, body) = send(&app, get(&format!("/worker/currentState?workerId={worker_id}"))).await;
    assert_eq!(body["status"], "loading");

    let (status, _) = send(
        &app,
        json_request("PATCH", "/mission/loadItem", &json!({ "missionId": mission_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request("PATCH", "/mission/loadItem", &json!({ "missionId": "missing", "itemId": light })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        json_request("PATCH", "/mission/endMission", &json!({ "missionId": mission_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mission"]["state"], "finished");
    assert_eq!(body["mission"]["worker"]["state"], "resting");

    let (status, body) = send(&app, get(&format!("/mission/details/{mission_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, get("/mission/all")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["missions"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, get("/worker/mostCompleted")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!([{ "workerId": worker_id, "name": "Ann", "completedMissions": 1 }])
    );
}

#[tokio::test]
async fn test_create_mission_errors() {
    let app = spawn_app().await;
    let (worker_id, _) = register(&app, "Ann", "ann@example.com", 10.0).await;
    let heavy = add_item(&app, "Heavy", 50.0).await;

    let (status, _) = send(
        &app,
        json_request("POST", "/mission/add", &json!({ "worker": "missing", "items": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        json_request("POST", "/mission/add", &json!({ "worker": worker_id, "items": ["missing"] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        json_request("POST", "/mission/add", &json!({ "worker": worker_id, "items": [heavy] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "capacity_exceeded");

    let (status, body) = send(&app, json_request("POST", "/mission/add", &json!({ "items": [] }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    // Rejected creations leave the worker resting
    let (_, body) = send(&app, get(&format!("/worker/currentState?workerId={worker_id}"))).await;
    assert_eq!(body["status"], "resting");
}

#[tokio::test]
async fn test_fail_mission_endpoint() {
    let app = spawn_app().await;
    let (worker_id, _) = register(&app, "Ann", "ann@example.com", 100.0).await;

    let (_, body) = send(
        &app,
        json_request("POST", "/mission/add", &json!({ "worker": worker_id, "items": [] })),
    )
    .await;
    let mission_id = body["mission"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        json_request("PATCH", "/mission/failMission", &json!({ "missionId": mission_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mission"]["state"], "failed");
    assert_eq!(body["mission"]["worker"]["state"], "resting");

    let (status, body) = send(
        &app,
        json_request("PATCH", "/mission/failMission", &json!({ "missionId": mission_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_malformed_json_is_a_validation_error() {
    let app = spawn_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/item/add")
        .header("Content-Type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_metrics_disabled_without_recorder() {
    let app = spawn_app().await;
    let response = app.clone().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
