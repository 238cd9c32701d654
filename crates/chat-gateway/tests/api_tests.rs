//! REST handler tests driven through `tower::ServiceExt::oneshot`

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chat_gateway::{create_app, create_gateway_state};
use common::{test_config, token_for};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app() -> Router {
    let config = test_config(&[]);
    let state = create_gateway_state(&config).await.unwrap();
    create_app(state, &config)
}

fn request(method: Method, uri: &str, user: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token_for(user)));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn health_needs_no_auth() {
    let app = app().await;
    let (status, body) = call(&app, request(Method::GET, "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "service": "chat-server"}));
}

#[tokio::test]
async fn routes_require_bearer_token() {
    let app = app().await;

    let (status, body) = call(&app, request(Method::GET, "/rooms", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "MISSING_AUTHORIZATION");

    let bad = Request::builder()
        .uri("/rooms")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let (status, body) = call(&app, bad).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn create_and_fetch_room() {
    let app = app().await;

    let (status, room) = call(
        &app,
        request(
            Method::POST,
            "/rooms",
            Some("alice"),
            Some(json!({"name": "general", "type": "group", "memberIds": ["bob", "carol"]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(room["createdBy"], "alice");
    assert_eq!(room["members"].as_array().unwrap().len(), 3);

    let id = room["id"].as_str().unwrap();
    let (status, fetched) =
        call(&app, request(Method::GET, &format!("/rooms/{id}"), Some("bob"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "general");

    let (_, listed) = call(&app, request(Method::GET, "/rooms", Some("carol"), None)).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (_, listed) = call(&app, request(Method::GET, "/rooms", Some("dave"), None)).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn group_room_with_only_the_creator() {
    let app = app().await;

    let (status, room) = call(
        &app,
        request(
            Method::POST,
            "/rooms",
            Some("alice"),
            Some(json!({"name": "notes", "kind": "group", "memberIds": []})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(room["members"].as_array().unwrap().len(), 1);

    let (_, listed) = call(&app, request(Method::GET, "/rooms", Some("alice"), None)).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn room_validation_errors() {
    let app = app().await;

    let (status, body) = call(
        &app,
        request(
            Method::POST,
            "/rooms",
            Some("alice"),
            Some(json!({"name": "dm", "kind": "direct", "memberIds": ["bob", "carol"]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_DIRECT_ROOM");

    let (status, body) = call(
        &app,
        request(
            Method::POST,
            "/rooms",
            Some("alice"),
            Some(json!({"name": "", "kind": "group", "memberIds": ["bob"]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, body) = call(
        &app,
        request(
            Method::POST,
            "/rooms",
            Some("alice"),
            Some(json!({"name": "x", "kind": "channel", "memberIds": ["bob"]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_BODY");
}

#[tokio::test]
async fn unknown_and_malformed_room_ids() {
    let app = app().await;

    let unknown = uuid::Uuid::new_v4();
    let (status, body) =
        call(&app, request(Method::GET, &format!("/rooms/{unknown}"), Some("alice"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, body) =
        call(&app, request(Method::GET, "/rooms/not-a-uuid/messages", Some("alice"), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_PATH_PARAMETER");

    let (status, body) = call(
        &app,
        request(
            Method::POST,
            "/messages",
            Some("alice"),
            Some(json!({"roomId": unknown, "content": "hi"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "UNKNOWN_ROOM");
}

#[tokio::test]
async fn message_history_pages() {
    let app = app().await;
    let (_, room) = call(
        &app,
        request(
            Method::POST,
            "/rooms",
            Some("alice"),
            Some(json!({"name": "general", "kind": "group", "memberIds": ["bob"]})),
        ),
    )
    .await;
    let room_id = room["id"].as_str().unwrap().to_string();

    for i in 0..3 {
        let (status, message) = call(
            &app,
            request(
                Method::POST,
                "/messages",
                Some("alice"),
                Some(json!({"conversationId": room_id, "content": format!("m{i}"), "type": "text"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(message["senderId"], "alice");
    }

    let (status, page) = call(
        &app,
        request(
            Method::GET,
            &format!("/rooms/{room_id}/messages?limit=2"),
            Some("bob"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let contents: Vec<_> = page
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(contents, vec!["m1", "m2"]);

    let (status, body) = call(
        &app,
        request(
            Method::POST,
            "/messages",
            Some("alice"),
            Some(json!({"roomId": room_id, "content": "  "})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "EMPTY_CONTENT");

    let (status, _) = call(
        &app,
        request(
            Method::GET,
            &format!("/rooms/{room_id}/messages?limit=abc"),
            Some("bob"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn presence_and_typing_lookups() {
    let app = app().await;

    let (status, body) =
        call(&app, request(Method::GET, "/users/bob/presence", Some("alice"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"userId": "bob", "online": false}));

    let (status, body) =
        call(&app, request(Method::GET, "/rooms/general/typing", Some("alice"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"roomId": "general", "userIds": []}));
}
