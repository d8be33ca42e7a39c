// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::spawn_app;
use satmoko_studio::config::settings::DEFAULT_MAX_UPLOAD_BYTES;
use axum::http::StatusCode;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn image_response() -> Value {
    json!({
        "candidates": [{ "content": { "parts": [
            { "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" } }
        ] } }]
    })
}

#[tokio::test]
async fn test_chat_charges_and_returns_reply() {
    let app = spawn_app().await;
    let token = app.active_member("chat@member.io", 10).await;
    Mock::given(method("POST"))
        .and(path("/models/text-model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Hello there" }] } }]
        })))
        .mount(&app.ai)
        .await;

    let response = app
        .server
        .post("/v1/generate/chat")
        .authorization_bearer(&token)
        .json(&json!({ "message": "hi" }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["data"]["result"], "Hello there");
    assert_eq!(body["data"]["cost"], 1);
    assert_eq!(body["data"]["balance"], 9);
    assert_eq!(app.balance("chat@member.io").await, 9);
}

#[tokio::test]
async fn test_image_rotates_key_after_quota_error() {
    let app = spawn_app().await;
    let token = app.active_member("img@member.io", 20).await;
    Mock::given(method("POST"))
        .and(path("/models/image-model:generateContent"))
        .and(header("x-goog-api-key", "key-a"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED" }
        })))
        .expect(1)
        .mount(&app.ai)
        .await;
    Mock::given(method("POST"))
        .and(path("/models/image-model:generateContent"))
        .and(header("x-goog-api-key", "key-b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_response()))
        .expect(1)
        .mount(&app.ai)
        .await;

    let response = app
        .server
        .post("/v1/generate/image")
        .authorization_bearer(&token)
        .json(&json!({ "prompt": "a lighthouse", "aspect_ratio": "16:9" }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["data"]["result"]["mime_type"], "image/png");
    assert_eq!(app.balance("img@member.io").await, 15);
    assert_eq!(app.services.rotator.current(), "key-b");
}

#[tokio::test]
async fn test_insufficient_credits_is_payment_required() {
    let app = spawn_app().await;
    let token = app.active_member("poor@member.io", 2).await;

    let response = app
        .server
        .post("/v1/generate/image")
        .authorization_bearer(&token)
        .json(&json!({ "prompt": "a castle" }))
        .await;

    response.assert_status(StatusCode::PAYMENT_REQUIRED);
    assert_eq!(response.json::<Value>()["success"], false);
    assert_eq!(app.balance("poor@member.io").await, 2);
}

#[tokio::test]
async fn test_failed_generation_refunds_credits() {
    let app = spawn_app().await;
    let token = app.active_member("refund@member.io", 10).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "Prompt blocked", "status": "INVALID_ARGUMENT" }
        })))
        .expect(1)
        .mount(&app.ai)
        .await;

    let response = app
        .server
        .post("/v1/generate/image")
        .authorization_bearer(&token)
        .json(&json!({ "prompt": "something" }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    assert_eq!(app.balance("refund@member.io").await, 10);
}

#[tokio::test]
async fn test_video_is_polled_until_done() {
    let app = spawn_app().await;
    let token = app.active_member("video@member.io", 60).await;
    Mock::given(method("POST"))
        .and(path("/models/video-model:predictLongRunning"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "name": "models/video-model/operations/op1" })),
        )
        .mount(&app.ai)
        .await;
    Mock::given(method("GET"))
        .and(path("/models/video-model/operations/op1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "models/video-model/operations/op1",
            "done": true,
            "response": { "generateVideoResponse": { "generatedSamples": [
                { "video": { "uri": "https://files.example/clip.mp4" } }
            ] } }
        })))
        .mount(&app.ai)
        .await;

    let response = app
        .server
        .post("/v1/generate/video")
        .authorization_bearer(&token)
        .json(&json!({ "prompt": "waves at dusk", "aspect_ratio": "16:9" }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["data"]["result"]["uri"], "https://files.example/clip.mp4");
    assert_eq!(body["data"]["cost"], 50);
    assert_eq!(app.balance("video@member.io").await, 10);
}

#[tokio::test]
async fn test_storyboard_rejects_too_many_scenes() {
    let app = spawn_app().await;
    let token = app.active_member("story@member.io", 100).await;

    app.server
        .post("/v1/generate/storyboard")
        .authorization_bearer(&token)
        .json(&json!({ "premise": "a heist", "scenes": 9 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(app.balance("story@member.io").await, 100);
}

#[tokio::test]
async fn test_admin_generations_are_free() {
    let app = spawn_app().await;
    let token = app.admin_token().await;
    Mock::given(method("POST"))
        .and(path("/models/image-model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_response()))
        .mount(&app.ai)
        .await;

    let response = app
        .server
        .post("/v1/generate/image")
        .authorization_bearer(&token)
        .json(&json!({ "prompt": "admin test" }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["data"]["cost"], 0);
    assert!(body["data"]["balance"].is_null());
}

#[tokio::test]
async fn test_prices_follow_settings_table() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    app.server
        .put("/v1/admin/settings/cost_image")
        .authorization_bearer(&admin)
        .json(&json!({ "value": "7" }))
        .await
        .assert_status_ok();

    let response = app.server.get("/v1/prices").authorization_bearer(&admin).await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["data"]["image"], 7);
    assert_eq!(body["data"]["video"], 50);
}

#[tokio::test]
async fn test_deactivated_member_cannot_keep_generating() {
    let app = spawn_app().await;
    let token = app.active_member("revoked@member.io", 20).await;
    let admin = app.admin_token().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_response()))
        .expect(0)
        .mount(&app.ai)
        .await;

    app.server
        .patch("/v1/admin/members/revoked@member.io")
        .authorization_bearer(&admin)
        .json(&json!({ "status": "inactive" }))
        .await
        .assert_status_ok();

    app.server
        .post("/v1/generate/image")
        .authorization_bearer(&token)
        .json(&json!({ "prompt": "a lighthouse" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    assert_eq!(app.balance("revoked@member.io").await, 20);
}

#[tokio::test]
async fn test_expired_member_session_is_refused() {
    let app = spawn_app().await;
    let token = app.active_member("lapsed@member.io", 20).await;
    let admin = app.admin_token().await;

    app.server
        .patch("/v1/admin/members/lapsed@member.io")
        .authorization_bearer(&admin)
        .json(&json!({ "valid_until": "2020-01-01T00:00:00Z" }))
        .await
        .assert_status_ok();

    app.server
        .post("/v1/generate/chat")
        .authorization_bearer(&token)
        .json(&json!({ "message": "still there?" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    assert_eq!(app.balance("lapsed@member.io").await, 20);
}

#[tokio::test]
async fn test_outpaint_accepts_large_inline_image() {
    let app = spawn_app().await;
    let token = app.active_member("big@member.io", 50).await;
    Mock::given(method("POST"))
        .and(path("/models/image-model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_response()))
        .expect(1)
        .mount(&app.ai)
        .await;

    let data = "A".repeat(3 * 1024 * 1024);
    let response = app
        .server
        .post("/v1/generate/outpaint")
        .authorization_bearer(&token)
        .json(&json!({ "image": { "mime_type": "image/png", "data": data } }))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["data"]["result"]["mime_type"],
        "image/png"
    );
}

#[tokio::test]
async fn test_upload_above_limit_is_rejected() {
    let app = spawn_app().await;
    let token = app.active_member("huge@member.io", 50).await;

    let data = "A".repeat(DEFAULT_MAX_UPLOAD_BYTES + 1);
    app.server
        .post("/v1/generate/outpaint")
        .authorization_bearer(&token)
        .json(&json!({ "image": { "mime_type": "image/png", "data": data } }))
        .await
        .assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(app.balance("huge@member.io").await, 50);
}
