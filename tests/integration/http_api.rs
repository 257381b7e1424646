//! The JSON API driven through the router, request by request.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use coolstuff::api::build_router;

use crate::fixtures;

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn full_round_over_http() {
    let app = build_router(fixtures::shared_registry());

    let (status, created) = call(
        &app,
        "POST",
        "/api/game",
        Some(json!({"game_code": "abcd", "host_name": "Host"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let host_id = created["player_id"].as_str().unwrap().to_string();

    let (status, joined) = call(
        &app,
        "POST",
        "/api/game/ABCD/join",
        Some(json!({"name": "Alice"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let alice_id = joined["player_id"].as_str().unwrap().to_string();

    let (status, _) = call(&app, "POST", "/api/game/ABCD/advance", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, resp) = call(
        &app,
        "POST",
        "/api/game/ABCD/action",
        Some(json!({"player_id": host_id, "bid": 50})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp, json!({"ok": true, "resolved": false}));

    let (_, view) = call(
        &app,
        "GET",
        &format!("/api/game/ABCD/state?player_id={host_id}"),
        None,
    )
    .await;
    assert_eq!(view["phase"], "play");
    assert_eq!(view["has_submitted"], true);
    assert_eq!(view["my_action"], json!({"sit_out": false, "sell_item": null}));
    assert!(view["current_item"]["value"].is_null());

    let (_, resp) = call(
        &app,
        "POST",
        "/api/game/ABCD/action",
        Some(json!({"player_id": alice_id, "sit_out": true})),
    )
    .await;
    assert_eq!(resp["resolved"], true);

    let (_, view) = call(
        &app,
        "GET",
        &format!("/api/game/ABCD/state?player_id={alice_id}"),
        None,
    )
    .await;
    assert_eq!(view["phase"], "reveal");
    assert_eq!(view["resolved"]["winner_name"], "Host");
    assert_eq!(view["my_budget"], 1000);

    let (status, _) = call(&app, "POST", "/api/game/ABCD/advance", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, view) = call(&app, "GET", "/api/game/ABCD/state", None).await;
    assert_eq!(view["current_round"], 1);
    assert!(view["my_budget"].is_null());
}

#[tokio::test]
async fn error_codes_over_http() {
    let app = build_router(fixtures::shared_registry());

    call(&app, "POST", "/api/game", Some(json!({"game_code": "ABCD"}))).await;

    let (status, body) = call(&app, "POST", "/api/game", Some(json!({"game_code": "abcd"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "code_taken");

    let (status, body) = call(
        &app,
        "POST",
        "/api/game/ABCD/action",
        Some(json!({"player_id": "ghost", "bid": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "wrong_phase");

    let (status, body) = call(
        &app,
        "POST",
        "/api/game/ABCD/join",
        Some(json!({"name": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "name_required");

    let (status, body) = call(&app, "POST", "/api/game/ABCD/resolve", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "wrong_phase");

    let (status, body) = call(&app, "POST", "/api/game/WXYZ/join", Some(json!({"name": "Bob"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn negative_bid_is_invalid() {
    let app = build_router(fixtures::shared_registry());
    let (_, created) = call(&app, "POST", "/api/game", Some(json!({"game_code": "ABCD"}))).await;
    let host_id = created["player_id"].as_str().unwrap().to_string();
    call(&app, "POST", "/api/game/ABCD/join", Some(json!({"name": "Alice"}))).await;
    call(&app, "POST", "/api/game/ABCD/advance", None).await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/game/ABCD/action",
        Some(json!({"player_id": host_id, "bid": -5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_bid");
}

#[tokio::test]
async fn malformed_bids_map_to_invalid_bid() {
    let app = build_router(fixtures::shared_registry());
    let (_, created) = call(&app, "POST", "/api/game", Some(json!({"game_code": "ABCD"}))).await;
    let host_id = created["player_id"].as_str().unwrap().to_string();
    call(&app, "POST", "/api/game/ABCD/join", Some(json!({"name": "Alice"}))).await;
    call(&app, "POST", "/api/game/ABCD/advance", None).await;

    for bid in [json!("50"), json!(50.5), json!(u64::MAX)] {
        let (status, body) = call(
            &app,
            "POST",
            "/api/game/ABCD/action",
            Some(json!({"player_id": host_id, "bid": bid})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "bid {bid}");
        assert_eq!(body["error"], "invalid_bid", "bid {bid}");
    }

    let (_, view) = call(
        &app,
        "GET",
        &format!("/api/game/ABCD/state?player_id={host_id}"),
        None,
    )
    .await;
    assert_eq!(view["has_submitted"], false);
    assert_eq!(view["submitted_count"], 0);
}

#[tokio::test]
async fn missing_player_id_is_unknown_player() {
    let app = build_router(fixtures::shared_registry());
    call(&app, "POST", "/api/game", Some(json!({"game_code": "ABCD"}))).await;
    call(&app, "POST", "/api/game/ABCD/join", Some(json!({"name": "Alice"}))).await;
    call(&app, "POST", "/api/game/ABCD/advance", None).await;

    let (status, body) = call(&app, "POST", "/api/game/ABCD/action", Some(json!({"bid": 5}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_player");
}
