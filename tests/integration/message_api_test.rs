// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{spawn_app, ADMIN_EMAIL};
use axum::http::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_member_message_reaches_the_admin() {
    let app = spawn_app().await;
    let member = app.active_member("talk@member.io", 0).await;
    let admin = app.admin_token().await;

    let sent = app
        .server
        .post("/v1/messages")
        .authorization_bearer(&member)
        .json(&json!({ "content": "Please top me up" }))
        .await;
    sent.assert_status(StatusCode::CREATED);
    let sent = sent.json::<Value>();
    assert_eq!(sent["data"]["receiver_email"], ADMIN_EMAIL);
    let id = sent["data"]["id"].as_str().unwrap().to_string();

    let unread = app
        .server
        .get("/v1/messages/unread-count")
        .authorization_bearer(&admin)
        .await;
    assert_eq!(unread.json::<Value>()["data"]["unread"], 1);

    app.server
        .post(&format!("/v1/messages/{}/read", id))
        .authorization_bearer(&admin)
        .await
        .assert_status_ok();

    let unread = app
        .server
        .get("/v1/messages/unread-count")
        .authorization_bearer(&admin)
        .await;
    assert_eq!(unread.json::<Value>()["data"]["unread"], 0);

    app.server
        .post("/v1/messages")
        .authorization_bearer(&admin)
        .json(&json!({ "to": "talk@member.io", "content": "Done" }))
        .await
        .assert_status(StatusCode::CREATED);

    let conversation = app
        .server
        .get("/v1/messages/conversation")
        .add_query_param("with", ADMIN_EMAIL)
        .authorization_bearer(&member)
        .await;
    conversation.assert_status_ok();
    let thread = conversation.json::<Value>()["data"].as_array().unwrap().clone();
    assert_eq!(thread.len(), 2);
    assert_eq!(thread[0]["content"], "Please top me up");
    assert_eq!(thread[1]["content"], "Done");
}

#[tokio::test]
async fn test_members_cannot_message_each_other() {
    let app = spawn_app().await;
    let alice = app.active_member("alice@member.io", 0).await;
    app.active_member("bob@member.io", 0).await;

    app.server
        .post("/v1/messages")
        .authorization_bearer(&alice)
        .json(&json!({ "to": "bob@member.io", "content": "psst" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_only_the_receiver_marks_read() {
    let app = spawn_app().await;
    let member = app.active_member("reader@member.io", 0).await;

    let sent = app
        .server
        .post("/v1/messages")
        .authorization_bearer(&member)
        .json(&json!({ "content": "hello" }))
        .await;
    let id = sent.json::<Value>()["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    app.server
        .post(&format!("/v1/messages/{}/read", id))
        .authorization_bearer(&member)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_message_is_rejected() {
    let app = spawn_app().await;
    let member = app.active_member("blank@member.io", 0).await;

    app.server
        .post("/v1/messages")
        .authorization_bearer(&member)
        .json(&json!({ "content": "   " }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
