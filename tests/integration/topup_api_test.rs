// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{spawn_app, spawn_app_on, MEMBER_PASSWORD};
use axum::http::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_checkout_then_confirm_credits_once() {
    let app = spawn_app().await;
    let token = app.active_member("buyer@member.io", 0).await;

    let checkout = app
        .server
        .post("/v1/topups/checkout")
        .authorization_bearer(&token)
        .json(&json!({ "amount": 30 }))
        .await;
    checkout.assert_status(StatusCode::CREATED);
    let body = checkout.json::<Value>();
    assert_eq!(body["data"]["request"]["status"], "pending");
    assert_eq!(body["data"]["request"]["price"], 3000);
    let payment_token = body["data"]["payment"]["token"]
        .as_str()
        .unwrap()
        .to_string();
    let tid = body["data"]["request"]["tid"].as_str().unwrap().to_string();

    for _ in 0..2 {
        let confirmed = app
            .server
            .post("/v1/topups/confirm")
            .authorization_bearer(&token)
            .json(&json!({ "tid": tid, "token": payment_token }))
            .await;
        confirmed.assert_status_ok();
        assert_eq!(confirmed.json::<Value>()["data"]["status"], "approved");
    }

    assert_eq!(app.balance("buyer@member.io").await, 30);
}

#[tokio::test]
async fn test_confirming_someone_elses_tid_is_not_found() {
    let app = spawn_app().await;
    let owner = app.active_member("owner@member.io", 0).await;
    let other = app.active_member("other@member.io", 0).await;

    let checkout = app
        .server
        .post("/v1/topups/checkout")
        .authorization_bearer(&owner)
        .json(&json!({ "amount": 5 }))
        .await;
    let body = checkout.json::<Value>();
    let tid = body["data"]["request"]["tid"].as_str().unwrap();
    let payment_token = body["data"]["payment"]["token"].as_str().unwrap();

    app.server
        .post("/v1/topups/confirm")
        .authorization_bearer(&other)
        .json(&json!({ "tid": tid, "token": payment_token }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    assert_eq!(app.balance("owner@member.io").await, 0);
}

#[tokio::test]
async fn test_confirm_after_gateway_restart_still_credits() {
    let app = spawn_app().await;
    let token = app.active_member("restart@member.io", 0).await;

    let body = app
        .server
        .post("/v1/topups/checkout")
        .authorization_bearer(&token)
        .json(&json!({ "amount": 12 }))
        .await
        .json::<Value>();
    let tid = body["data"]["request"]["tid"].as_str().unwrap();
    let payment_token = body["data"]["payment"]["token"].as_str().unwrap();

    // 同一数据库、同一商户密钥，网关实例重建
    let restarted = spawn_app_on(app.db.clone()).await;
    let token = restarted.login("restart@member.io", MEMBER_PASSWORD).await;
    restarted
        .server
        .post("/v1/topups/confirm")
        .authorization_bearer(&token)
        .json(&json!({ "tid": tid, "token": payment_token }))
        .await
        .assert_status_ok();

    assert_eq!(restarted.balance("restart@member.io").await, 12);
}

#[tokio::test]
async fn test_manual_request_cannot_be_self_confirmed() {
    let app = spawn_app().await;
    let token = app.active_member("forger@member.io", 0).await;

    let created = app
        .server
        .post("/v1/topups")
        .authorization_bearer(&token)
        .json(&json!({
            "amount": 50,
            "price": 5000,
            "receipt_url": "https://receipts.example/r2.png",
        }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let tid = created.json::<Value>()["data"]["tid"]
        .as_str()
        .unwrap()
        .to_string();

    app.server
        .post("/v1/topups/confirm")
        .authorization_bearer(&token)
        .json(&json!({ "tid": tid, "token": "00ff" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    assert_eq!(app.balance("forger@member.io").await, 0);
}

#[tokio::test]
async fn test_manual_request_is_approved_only_once() {
    let app = spawn_app().await;
    let token = app.active_member("manual@member.io", 0).await;
    let admin = app.admin_token().await;

    let created = app
        .server
        .post("/v1/topups")
        .authorization_bearer(&token)
        .json(&json!({
            "amount": 40,
            "price": 4000,
            "receipt_url": "https://receipts.example/r1.png",
        }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let id = created.json::<Value>()["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let pending = app
        .server
        .get("/v1/admin/topups")
        .add_query_param("status", "pending")
        .authorization_bearer(&admin)
        .await;
    pending.assert_status_ok();
    assert_eq!(pending.json::<Value>()["data"].as_array().unwrap().len(), 1);

    app.server
        .post(&format!("/v1/admin/topups/{}/approve", id))
        .authorization_bearer(&admin)
        .await
        .assert_status_ok();
    app.server
        .post(&format!("/v1/admin/topups/{}/approve", id))
        .authorization_bearer(&admin)
        .await
        .assert_status(StatusCode::CONFLICT);

    assert_eq!(app.balance("manual@member.io").await, 40);

    let mine = app
        .server
        .get("/v1/topups")
        .authorization_bearer(&token)
        .await;
    assert_eq!(mine.json::<Value>()["data"][0]["status"], "approved");
}

#[tokio::test]
async fn test_rejected_request_cannot_be_approved() {
    let app = spawn_app().await;
    let token = app.active_member("reject@member.io", 0).await;
    let admin = app.admin_token().await;

    let created = app
        .server
        .post("/v1/topups")
        .authorization_bearer(&token)
        .json(&json!({ "amount": 10, "price": 1000 }))
        .await;
    let id = created.json::<Value>()["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let rejected = app
        .server
        .post(&format!("/v1/admin/topups/{}/reject", id))
        .authorization_bearer(&admin)
        .await;
    rejected.assert_status_ok();
    assert_eq!(rejected.json::<Value>()["data"]["status"], "rejected");

    app.server
        .post(&format!("/v1/admin/topups/{}/approve", id))
        .authorization_bearer(&admin)
        .await
        .assert_status(StatusCode::CONFLICT);
    assert_eq!(app.balance("reject@member.io").await, 0);
}

#[tokio::test]
async fn test_invalid_amount_and_status_filter_are_bad_requests() {
    let app = spawn_app().await;
    let token = app.active_member("bad@member.io", 0).await;
    let admin = app.admin_token().await;

    app.server
        .post("/v1/topups/checkout")
        .authorization_bearer(&token)
        .json(&json!({ "amount": 0 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .get("/v1/admin/topups")
        .add_query_param("status", "maybe")
        .authorization_bearer(&admin)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
