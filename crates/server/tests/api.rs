use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use migration::MigratorTrait;

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = engine::Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    server::app(engine, db)
}

fn basic_auth(username: &str, password: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{username}:{password}"))
    )
}

fn post_json(uri: &str, auth: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_authed(uri: &str, auth: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, auth)
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register_alice(app: &Router) {
    let response = app
        .clone()
        .oneshot(post_json(
            "/user/register",
            None,
            json!({
                "username": "alice",
                "password": "correcthorse",
                "display_name": "Alice",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn register_then_fetch_profile() {
    let app = app().await;
    register_alice(&app).await;

    let auth = basic_auth("alice", "correcthorse");
    let response = app.clone().oneshot(get_authed("/user/me", &auth)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let profile = json_body(response).await;
    assert_eq!(profile["username"], "alice");
    assert_eq!(profile["display_name"], "Alice");
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = app().await;
    register_alice(&app).await;

    let auth = basic_auth("alice", "wrongwrongwrong");
    let response = app.clone().oneshot(get_authed("/user/me", &auth)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn group_expense_and_balances_flow() {
    let app = app().await;
    register_alice(&app).await;
    let auth = basic_auth("alice", "correcthorse");

    // Create a group; the creator lands on the roster automatically.
    let response = app
        .clone()
        .oneshot(post_json(
            "/groups",
            Some(&auth),
            json!({ "name": "Trip", "description": null }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let group_id = json_body(response).await["id"].as_str().unwrap().to_string();

    // Add two placeholder participants.
    for name in ["B", "C"] {
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/groups/{group_id}/participants"),
                Some(&auth),
                json!({ "name": name }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(get_authed(
            &format!("/groups/{group_id}/participants"),
            &auth,
        ))
        .await
        .unwrap();
    let roster = json_body(response).await;
    let participants = roster["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 3);
    let id_of = |name: &str| {
        participants
            .iter()
            .find(|p| p["name"] == name)
            .unwrap()["id"]
            .as_str()
            .unwrap()
            .to_string()
    };
    let (a, b, c) = (id_of("Alice"), id_of("B"), id_of("C"));

    // Dinner, 90.00, paid by Alice, split equally.
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/groups/{group_id}/expenses"),
            Some(&auth),
            json!({
                "title": "Dinner",
                "amount_minor": 9000,
                "occurred_on": "2026-03-14",
                "payer_id": a,
                "split_mode": "equal",
                "participants": [
                    { "participant_id": a, "amount_minor": null },
                    { "participant_id": b, "amount_minor": null },
                    { "participant_id": c, "amount_minor": null },
                ],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(get_authed(&format!("/groups/{group_id}/balances"), &auth))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let balances = json_body(response).await;
    let balance_of = |id: &str| {
        balances["balances"]
            .as_array()
            .unwrap()
            .iter()
            .find(|entry| entry["participant_id"] == id)
            .unwrap()["balance_minor"]
            .as_i64()
            .unwrap()
    };
    assert_eq!(balance_of(&a), 6000);
    assert_eq!(balance_of(&b), -3000);
    assert_eq!(balance_of(&c), -3000);

    // The overview counts both aggregates and the caller's balance.
    let response = app.clone().oneshot(get_authed("/groups", &auth)).await.unwrap();
    let overview = json_body(response).await;
    let row = &overview["groups"].as_array().unwrap()[0];
    assert_eq!(row["participant_count"], 3);
    assert_eq!(row["expense_count"], 1);
    assert_eq!(row["my_balance_minor"], 6000);
}

#[tokio::test]
async fn manual_split_mismatch_is_unprocessable() {
    let app = app().await;
    register_alice(&app).await;
    let auth = basic_auth("alice", "correcthorse");

    let response = app
        .clone()
        .oneshot(post_json(
            "/groups",
            Some(&auth),
            json!({ "name": "Taxi", "description": null }),
        ))
        .await
        .unwrap();
    let group_id = json_body(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(get_authed(
            &format!("/groups/{group_id}/participants"),
            &auth,
        ))
        .await
        .unwrap();
    let roster = json_body(response).await;
    let alice_id = roster["participants"].as_array().unwrap()[0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/groups/{group_id}/expenses"),
            Some(&auth),
            json!({
                "title": "Taxi",
                "amount_minor": 5000,
                "occurred_on": "2026-03-14",
                "payer_id": alice_id,
                "split_mode": "manual",
                "participants": [
                    { "participant_id": alice_id, "amount_minor": 4000 },
                ],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("expected"));
}
