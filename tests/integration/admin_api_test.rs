// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::spawn_app;
use axum::http::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_list_members_filters_by_status_and_search() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.active_member("ana@member.io", 0).await;
    app.signup("ben@member.io").await;

    let pending = app
        .server
        .get("/v1/admin/members")
        .add_query_param("status", "pending")
        .authorization_bearer(&admin)
        .await;
    pending.assert_status_ok();
    let pending = pending.json::<Value>()["data"].as_array().unwrap().clone();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["email"], "ben@member.io");

    let search = app
        .server
        .get("/v1/admin/members")
        .add_query_param("search", "ANA")
        .authorization_bearer(&admin)
        .await;
    let found = search.json::<Value>()["data"].as_array().unwrap().clone();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["email"], "ana@member.io");
}

#[tokio::test]
async fn test_add_credits_and_delete_member() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.active_member("gift@member.io", 5).await;

    let added = app
        .server
        .post("/v1/admin/members/gift@member.io/credits")
        .authorization_bearer(&admin)
        .json(&json!({ "amount": 15 }))
        .await;
    added.assert_status_ok();
    assert_eq!(added.json::<Value>()["data"]["credits"], 20);

    app.server
        .delete("/v1/admin/members/gift@member.io")
        .authorization_bearer(&admin)
        .await
        .assert_status_ok();
    app.server
        .get("/v1/admin/members/gift@member.io")
        .authorization_bearer(&admin)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_export_members_as_csv() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.active_member("csv@member.io", 3).await;

    let response = app
        .server
        .get("/v1/admin/export/members")
        .add_query_param("format", "csv")
        .authorization_bearer(&admin)
        .await;

    response.assert_status_ok();
    let content_type = response.header("content-type");
    assert!(content_type.to_str().unwrap().starts_with("text/csv"));
    let disposition = response.header("content-disposition");
    assert!(disposition.to_str().unwrap().contains("members-"));

    let body = response.text();
    let mut lines = body.lines();
    assert_eq!(
        lines.next(),
        Some("email,full_name,status,credits,valid_until,created_at,last_seen")
    );
    assert!(lines.any(|l| l.starts_with("csv@member.io,Test Member,active,3,")));
}

#[tokio::test]
async fn test_unknown_export_format_is_bad_request() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    app.server
        .get("/v1/admin/export/members")
        .add_query_param("format", "xlsx")
        .authorization_bearer(&admin)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stats_count_members_and_pending_topups() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let member = app.active_member("stat@member.io", 0).await;
    app.signup("wait@member.io").await;
    app.server
        .post("/v1/topups")
        .authorization_bearer(&member)
        .json(&json!({ "amount": 10, "price": 1000 }))
        .await
        .assert_status(StatusCode::CREATED);

    let stats = app
        .server
        .get("/v1/admin/stats")
        .authorization_bearer(&admin)
        .await;

    stats.assert_status_ok();
    let data = stats.json::<Value>()["data"].clone();
    assert_eq!(data["members_total"], 2);
    assert_eq!(data["active"], 1);
    assert_eq!(data["pending"], 1);
    assert_eq!(data["pending_topups"], 1);
}

#[tokio::test]
async fn test_settings_round_trip_through_admin_routes() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let member = app.active_member("set@member.io", 0).await;

    app.server
        .put("/v1/admin/settings/announcement")
        .authorization_bearer(&admin)
        .json(&json!({ "value": "Maintenance tonight" }))
        .await
        .assert_status_ok();

    let read = app
        .server
        .get("/v1/settings/announcement")
        .authorization_bearer(&member)
        .await;
    read.assert_status_ok();
    assert_eq!(read.json::<Value>()["data"]["value"], "Maintenance tonight");

    app.server
        .put("/v1/admin/settings/announcement")
        .authorization_bearer(&member)
        .json(&json!({ "value": "hijack" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}
