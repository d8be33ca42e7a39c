// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{spawn_app, ADMIN_EMAIL, MEMBER_PASSWORD};
use axum::http::StatusCode;
use satmoko_studio::domain::repositories::member_repository::MemberRepository;
use serde_json::{json, Value};

#[tokio::test]
async fn test_health_check_works() {
    let app = spawn_app().await;

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    response.assert_text("OK");
}

#[tokio::test]
async fn test_new_signup_is_pending_until_activated() {
    let app = spawn_app().await;
    app.signup("new@member.io").await;

    let refused = app
        .server
        .post("/v1/auth/login")
        .json(&json!({ "email": "new@member.io", "password": MEMBER_PASSWORD }))
        .await;
    refused.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(refused.json::<Value>()["success"], false);

    let admin = app.admin_token().await;
    app.server
        .patch("/v1/admin/members/new@member.io")
        .authorization_bearer(&admin)
        .json(&json!({ "status": "active" }))
        .await
        .assert_status_ok();

    let token = app.login("new@member.io", MEMBER_PASSWORD).await;
    let me = app.server.get("/v1/me").authorization_bearer(&token).await;
    me.assert_status_ok();
    let body = me.json::<Value>();
    assert_eq!(body["data"]["role"], "member");
    assert_eq!(body["data"]["member"]["status"], "active");
    assert!(body["data"]["member"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_duplicate_signup_is_conflict() {
    let app = spawn_app().await;
    app.signup("dup@member.io").await;

    let response = app
        .server
        .post("/v1/auth/signup")
        .json(&json!({
            "email": "DUP@member.io",
            "full_name": "Again",
            "password": MEMBER_PASSWORD,
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app = spawn_app().await;
    app.active_member("pw@member.io", 0).await;

    app.server
        .post("/v1/auth/login")
        .json(&json!({ "email": "pw@member.io", "password": "not-the-password" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_need_a_session() {
    let app = spawn_app().await;

    app.server.get("/v1/me").await.assert_status(StatusCode::UNAUTHORIZED);
    app.server
        .get("/v1/me")
        .authorization_bearer("garbage")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_login_gets_admin_role() {
    let app = spawn_app().await;
    let token = app.admin_token().await;

    let me = app.server.get("/v1/me").authorization_bearer(&token).await;

    me.assert_status_ok();
    let body = me.json::<Value>();
    assert_eq!(body["data"]["role"], "admin");
    assert_eq!(body["data"]["email"], ADMIN_EMAIL);
}

#[tokio::test]
async fn test_members_cannot_reach_admin_routes() {
    let app = spawn_app().await;
    let token = app.active_member("plain@member.io", 0).await;

    app.server
        .get("/v1/admin/members")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_heartbeat_records_last_seen() {
    let app = spawn_app().await;
    let token = app.active_member("beat@member.io", 0).await;

    app.server
        .post("/v1/me/heartbeat")
        .authorization_bearer(&token)
        .await
        .assert_status_ok();

    let member = app
        .services
        .members
        .find_by_email("beat@member.io")
        .await
        .unwrap()
        .unwrap();
    assert!(member.last_seen.is_some());
}
