use animedex::api::AppState;
use animedex::config::Config;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

async fn spawn_app() -> (Arc<AppState>, Router) {
    let db_path =
        std::env::temp_dir().join(format!("animedex-api-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    let state = animedex::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    let router = animedex::api::router(state.clone());
    (state, router)
}

async fn create_user(state: &AppState, username: &str) -> (i64, String) {
    let user = state
        .store()
        .create_user(username)
        .await
        .expect("failed to create user");
    (i64::from(user.id.value()), user.api_key)
}

fn naruto() -> Value {
    json!({
        "title": "Naruto",
        "description": "A young ninja seeks recognition",
        "genre": "Action",
        "onGoing": true,
        "yearOfRelease": 2002,
        "imageOfAnime": "http://x/y.png"
    })
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

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_body(method: &str, uri: &str, api_key: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(key) = api_key {
        builder = builder.header("Authorization", format!("Bearer {key}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn delete(uri: &str, api_key: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("Authorization", format!("Bearer {api_key}"))
        .body(Body::empty())
        .unwrap()
}

async fn create_anime(app: &Router, api_key: &str, anime: Value) -> Value {
    let (status, body) = send(
        app,
        with_body("POST", "/animes", Some(api_key), &json!({ "anime": anime })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["anime"].clone()
}

#[tokio::test]
async fn test_list_is_public_and_starts_empty() {
    let (_, app) = spawn_app().await;

    let (status, body) = send(&app, get("/animes")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "animes": [] }));
}

#[tokio::test]
async fn test_mutations_require_a_valid_token() {
    let (state, app) = spawn_app().await;
    let (_, key) = create_user(&state, "alice").await;
    let anime = create_anime(&app, &key, naruto()).await;
    let uri = format!("/animes/{}", anime["id"]);

    let payload = json!({ "anime": naruto() });
    let (status, _) = send(&app, with_body("POST", "/animes", None, &payload)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, with_body("POST", "/animes", Some("wrong-key"), &payload)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let patch = json!({ "anime": { "title": "X" } });
    let (status, _) = send(&app, with_body("PATCH", &uri, None, &patch)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .method("DELETE")
        .uri(&uri)
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["anime"]["title"], "Naruto");
}

#[tokio::test]
async fn test_x_api_key_header_is_accepted() {
    let (state, app) = spawn_app().await;
    let (_, key) = create_user(&state, "alice").await;

    let request = Request::builder()
        .method("POST")
        .uri("/animes")
        .header("Content-Type", "application/json")
        .header("X-Api-Key", key)
        .body(Body::from(json!({ "anime": naruto() }).to_string()))
        .unwrap();
    let (status, _) = send(&app, request).await;

    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_ownership_scenario() {
    let (state, app) = spawn_app().await;
    let (alice_id, alice) = create_user(&state, "alice").await;
    let (_, bob) = create_user(&state, "bob").await;

    let created = create_anime(&app, &alice, naruto()).await;
    assert_eq!(created["status"], "On-going");
    assert_eq!(created["titleAndYear"], "Naruto (2002)");
    assert_eq!(created["owner"]["id"], alice_id);
    let uri = format!("/animes/{}", created["id"]);

    let (status, _) = send(
        &app,
        with_body("PATCH", &uri, Some(&bob), &json!({ "anime": { "title": "X" } })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = send(&app, get(&uri)).await;
    assert_eq!(body["anime"]["title"], "Naruto");

    let (status, body) = send(
        &app,
        with_body(
            "PATCH",
            &uri,
            Some(&alice),
            &json!({ "anime": { "onGoing": false } }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["anime"]["status"], "Finished Airing");
    assert_eq!(body["anime"]["onGoing"], false);
    assert_eq!(body["anime"]["title"], "Naruto");
}

#[tokio::test]
async fn test_create_ignores_client_owner() {
    let (state, app) = spawn_app().await;
    let (alice_id, alice) = create_user(&state, "alice").await;
    let (bob_id, _) = create_user(&state, "bob").await;

    let mut anime = naruto();
    anime["owner"] = json!(bob_id);
    anime["id"] = json!(999);

    let created = create_anime(&app, &alice, anime).await;

    assert_eq!(created["owner"]["id"], alice_id);
    assert_eq!(created["owner"]["username"], "alice");
    assert_ne!(created["id"], 999);
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let (state, app) = spawn_app().await;
    let (_, alice) = create_user(&state, "alice").await;

    let input = naruto();
    let created = create_anime(&app, &alice, input.clone()).await;

    let (status, body) = send(&app, get(&format!("/animes/{}", created["id"]))).await;
    assert_eq!(status, StatusCode::OK);

    let fetched = &body["anime"];
    for field in [
        "title",
        "description",
        "genre",
        "onGoing",
        "yearOfRelease",
        "imageOfAnime",
    ] {
        assert_eq!(fetched[field], input[field], "field {field} changed");
    }
    assert_eq!(fetched["id"], created["id"]);
    assert!(fetched["createdAt"].is_string());
    assert!(fetched["updatedAt"].is_string());
    assert_eq!(fetched["owner"]["username"], "alice");
}

#[tokio::test]
async fn test_create_validation_errors() {
    let (state, app) = spawn_app().await;
    let (_, alice) = create_user(&state, "alice").await;

    let (status, body) = send(
        &app,
        with_body(
            "POST",
            "/animes",
            Some(&alice),
            &json!({ "anime": { "title": "Naruto" } }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"description"));
    assert!(fields.contains(&"yearOfRelease"));
    assert!(!fields.contains(&"title"));

    let mut anime = naruto();
    anime["yearOfRelease"] = json!(1850);
    let (status, _) = send(
        &app,
        with_body("POST", "/animes", Some(&alice), &json!({ "anime": anime })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        with_body("POST", "/animes", Some(&alice), &json!({ "title": "no envelope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let request = Request::builder()
        .method("POST")
        .uri("/animes")
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {alice}"))
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send(&app, get("/animes")).await;
    assert_eq!(body["animes"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_update_skips_blank_fields_and_owner() {
    let (state, app) = spawn_app().await;
    let (alice_id, alice) = create_user(&state, "alice").await;
    let (bob_id, _) = create_user(&state, "bob").await;

    let created = create_anime(&app, &alice, naruto()).await;
    let uri = format!("/animes/{}", created["id"]);

    let patch = json!({
        "anime": {
            "title": "",
            "description": "   ",
            "genre": "Adventure",
            "owner": bob_id
        },
        "owner": bob_id
    });
    let (status, _) = send(&app, with_body("PATCH", &uri, Some(&alice), &patch)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, get(&uri)).await;
    let anime = &body["anime"];
    assert_eq!(anime["title"], "Naruto");
    assert_eq!(anime["description"], "A young ninja seeks recognition");
    assert_eq!(anime["genre"], "Adventure");
    assert_eq!(anime["owner"]["id"], alice_id);
}

#[tokio::test]
async fn test_update_rejects_invalid_values() {
    let (state, app) = spawn_app().await;
    let (_, alice) = create_user(&state, "alice").await;

    let created = create_anime(&app, &alice, naruto()).await;
    let uri = format!("/animes/{}", created["id"]);

    let patch = json!({ "anime": { "yearOfRelease": 3001 } });
    let (status, body) = send(&app, with_body("PATCH", &uri, Some(&alice), &patch)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "yearOfRelease");

    let (_, body) = send(&app, get(&uri)).await;
    assert_eq!(body["anime"]["yearOfRelease"], 2002);
}

#[tokio::test]
async fn test_update_missing_record_is_not_found() {
    let (state, app) = spawn_app().await;
    let (_, alice) = create_user(&state, "alice").await;

    let patch = json!({ "anime": { "title": "Ghost" } });
    let (status, _) = send(&app, with_body("PATCH", "/animes/4242", Some(&alice), &patch)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        with_body("PATCH", "/animes/not-an-id", Some(&alice), &patch),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_flow() {
    let (state, app) = spawn_app().await;
    let (_, alice) = create_user(&state, "alice").await;
    let (_, bob) = create_user(&state, "bob").await;

    let created = create_anime(&app, &alice, naruto()).await;
    let uri = format!("/animes/{}", created["id"]);

    let (status, _) = send(&app, delete(&uri, &bob)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, delete(&uri, &alice)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, delete(&uri, &alice)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_get_unknown_ids() {
    let (_, app) = spawn_app().await;

    let (status, _) = send(&app, get("/animes/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, get("/animes/6244858502aa548fd4fa911e")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_in_insertion_order_with_owners() {
    let (state, app) = spawn_app().await;
    let (_, alice) = create_user(&state, "alice").await;
    let (_, bob) = create_user(&state, "bob").await;

    create_anime(&app, &alice, naruto()).await;

    let mut frieren = naruto();
    frieren["title"] = json!("Frieren");
    frieren["onGoing"] = json!(false);
    frieren["yearOfRelease"] = json!(2023);
    create_anime(&app, &bob, frieren).await;

    let (status, body) = send(&app, get("/animes")).await;
    assert_eq!(status, StatusCode::OK);

    let animes = body["animes"].as_array().unwrap();
    assert_eq!(animes.len(), 2);
    assert_eq!(animes[0]["titleAndYear"], "Naruto (2002)");
    assert_eq!(animes[0]["owner"]["username"], "alice");
    assert_eq!(animes[1]["titleAndYear"], "Frieren (2023)");
    assert_eq!(animes[1]["status"], "Finished Airing");
    assert_eq!(animes[1]["owner"]["username"], "bob");
}

#[tokio::test]
async fn test_health() {
    let (_, app) = spawn_app().await;

    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}
