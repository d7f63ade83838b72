// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Resource service tests: admin gating, team square toggles, pokémon and
//! notification queries.

use chrono::Duration;
use mockito::Matcher;
use pmteam_client::error::AppError;
use pmteam_client::models::{PageRequest, ReportAction};
use serde_json::json;

mod common;
use common::{app_for, logged_in_app, token_body};

const PUBLIC_TEAMS: &str = r#"{
    "items": [
        {"id": 7, "name": "Sun Room", "likes_count": 3, "favorites_count": 0,
         "is_liked": false, "is_favorited": false, "creator_username": "erika"}
    ],
    "total": 1, "page": 1, "per_page": 10, "pages": 1, "has_next": false
}"#;

async fn mock_public_teams(server: &mut mockito::ServerGuard) -> mockito::Mock {
    server
        .mock("GET", "/team/public")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(PUBLIC_TEAMS)
        .create_async()
        .await
}

// ─── Admin ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_admin_calls_rejected_locally_for_non_admin() {
    //* Given
    let mut server = mockito::Server::new_async().await;
    let users = server
        .mock("GET", "/admin/users")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let t = logged_in_app(&server.url(), "access-old", false);

    //* When
    let list = t.app.admin.users(PageRequest::default()).await;
    let resolve = t
        .app
        .admin
        .resolve_report(3, ReportAction::Warn, None)
        .await;
    let overview = t.app.auth.admin_data().await;

    //* Then
    let expected = AppError::Permission(AppError::ADMIN_REQUIRED.to_string());
    assert_eq!(list.unwrap_err(), expected);
    assert_eq!(resolve.unwrap_err(), expected);
    assert_eq!(overview.unwrap_err(), expected);
    users.assert_async().await;
}

#[tokio::test]
async fn test_expired_admin_session_refreshes_and_retries() {
    //* Given
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/admin/users")
        .match_query(Matcher::Any)
        .match_header("authorization", "Bearer access-admin")
        .with_status(401)
        .with_body(r#"{"message": "Token has expired"}"#)
        .expect(1)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/auth/refresh")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(token_body("access-new", "refresh-2", 3600))
        .expect(1)
        .create_async()
        .await;
    let users = server
        .mock("GET", "/admin/users")
        .match_query(Matcher::Any)
        .match_header("authorization", "Bearer access-new")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"items": [{"id": 7, "username": "misty", "is_admin": true}],
                "total": 1, "page": 1, "per_page": 10}"#,
        )
        .expect(1)
        .create_async()
        .await;
    let t = logged_in_app(&server.url(), "access-admin", true);
    t.clock.advance(Duration::hours(2));

    //* When
    let page = t.app.admin.users(PageRequest::default()).await.unwrap();

    //* Then
    assert_eq!(page.items.len(), 1);
    refresh.assert_async().await;
    users.assert_async().await;
    assert!(t.app.session.is_authenticated());
    assert!(t.app.session.is_admin());
}

#[tokio::test]
async fn test_admin_calls_rejected_locally_after_logout() {
    //* Given
    let mut server = mockito::Server::new_async().await;
    let users = server
        .mock("GET", "/admin/users")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let t = logged_in_app(&server.url(), "access-admin", true);
    t.app.session.logout();

    //* When
    let err = t.app.admin.users(PageRequest::default()).await.unwrap_err();

    //* Then
    assert_eq!(err, AppError::Permission(AppError::ADMIN_REQUIRED.to_string()));
    users.assert_async().await;
}

#[tokio::test]
async fn test_admin_resolve_report_sends_action() {
    //* Given
    let mut server = mockito::Server::new_async().await;
    let resolve = server
        .mock("POST", "/admin/reports/3/resolve")
        .match_header("authorization", "Bearer access-admin")
        .match_body(Matcher::Json(json!({"action": "delete", "note": "spam"})))
        .with_status(200)
        .with_body(r#"{"message": "Report resolved"}"#)
        .expect(1)
        .create_async()
        .await;
    let t = logged_in_app(&server.url(), "access-admin", true);

    //* When
    let response = t
        .app
        .admin
        .resolve_report(3, ReportAction::Delete, Some("spam"))
        .await
        .unwrap();

    //* Then
    assert_eq!(response.message, "Report resolved");
    resolve.assert_async().await;
}

#[tokio::test]
async fn test_admin_server_403_maps_to_permission() {
    //* Given
    let mut server = mockito::Server::new_async().await;
    server
        .mock("DELETE", "/admin/users/9")
        .with_status(403)
        .with_body(r#"{"message": "Cannot delete yourself"}"#)
        .create_async()
        .await;
    let t = logged_in_app(&server.url(), "access-admin", true);

    //* When
    let err = t.app.admin.delete_user(9).await.unwrap_err();

    //* Then
    assert_eq!(err, AppError::Permission("Cannot delete yourself".to_string()));
}

// ─── Team square ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_square_like_reverts_on_error() {
    //* Given
    let mut server = mockito::Server::new_async().await;
    mock_public_teams(&mut server).await;
    let like = server
        .mock("POST", "/team/7/like")
        .with_status(500)
        .with_body(r#"{"message": "Database unavailable"}"#)
        .expect(1)
        .create_async()
        .await;
    let t = logged_in_app(&server.url(), "access-old", false);
    t.app.square.load_page(1).await.unwrap();

    //* When
    let err = t.app.square.toggle_like(7).await.unwrap_err();

    //* Then
    assert!(matches!(err, AppError::Api { status: 500, .. }));
    let team = &t.app.square.teams()[0];
    assert!(!team.is_liked);
    assert_eq!(team.likes_count, 3);
    like.assert_async().await;
}

#[tokio::test]
async fn test_square_favorite_applies_on_success() {
    //* Given
    let mut server = mockito::Server::new_async().await;
    mock_public_teams(&mut server).await;
    server
        .mock("POST", "/team/7/favorite")
        .with_status(200)
        .with_body(r#"{"message": "Added to favorites"}"#)
        .create_async()
        .await;
    let unfavorite = server
        .mock("DELETE", "/team/7/favorite")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let t = logged_in_app(&server.url(), "access-old", false);
    t.app.square.load_page(1).await.unwrap();

    //* When
    let added = t.app.square.toggle_favorite(7).await.unwrap();
    let removed = t.app.square.toggle_favorite(7).await.unwrap();

    //* Then
    assert!(added.active);
    assert_eq!(added.count, 1);
    assert!(!removed.active);
    assert_eq!(removed.count, 0);
    unfavorite.assert_async().await;
}

#[tokio::test]
async fn test_square_toggle_requires_login() {
    //* Given
    let mut server = mockito::Server::new_async().await;
    mock_public_teams(&mut server).await;
    let like = server
        .mock("POST", "/team/7/like")
        .expect(0)
        .create_async()
        .await;
    let t = app_for(&server.url());
    t.app.square.load_page(1).await.unwrap();

    //* When
    let err = t.app.square.toggle_like(7).await.unwrap_err();

    //* Then
    assert!(err.is_unauthorized());
    assert_eq!(t.app.square.teams()[0].likes_count, 3);
    like.assert_async().await;
}

#[tokio::test]
async fn test_square_search_resets_to_first_page() {
    //* Given
    let mut server = mockito::Server::new_async().await;
    let search = server
        .mock("GET", "/team/public")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("search".into(), "rain".into()),
        ]))
        .with_status(200)
        .with_body(PUBLIC_TEAMS)
        .expect(1)
        .create_async()
        .await;
    let t = app_for(&server.url());

    //* When
    t.app.square.search("rain").await.unwrap();

    //* Then
    search.assert_async().await;
    assert_eq!(t.app.square.pagination().page, 1);
    assert_eq!(t.app.square.filters().search.as_deref(), Some("rain"));
    assert_eq!(t.app.square.teams().len(), 1);
}

// ─── Pokémon data and notifications ──────────────────────────────────────────

#[tokio::test]
async fn test_item_list_normalises_generation() {
    //* Given
    let mut server = mockito::Server::new_async().await;
    let items = server
        .mock("GET", "/pokemon/item/list")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("generation_id".into(), "9".into()),
            Matcher::UrlEncoded("categories".into(), "held-items,berries".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"items": []}"#)
        .expect(1)
        .create_async()
        .await;
    let t = logged_in_app(&server.url(), "access-old", false);

    //* When
    t.app
        .pokemon
        .item_list(Some("Gen 9"), &["held-items", "berries"])
        .await
        .unwrap();

    //* Then
    items.assert_async().await;
}

#[tokio::test]
async fn test_notifications_unread_filter_and_count() {
    //* Given
    let mut server = mockito::Server::new_async().await;
    let list = server
        .mock("GET", "/notifications")
        .match_query(Matcher::UrlEncoded("is_read".into(), "false".into()))
        .with_status(200)
        .with_body(
            r#"{"items": [{"id": 1, "type": "report_handled", "content": "Handled", "is_read": false}],
                "total": 1, "page": 1, "per_page": 10}"#,
        )
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", "/notifications/unread_count")
        .with_status(200)
        .with_body(r#"{"unread_count": 4}"#)
        .create_async()
        .await;
    let t = logged_in_app(&server.url(), "access-old", false);

    //* When
    let page = t
        .app
        .notifications
        .list(PageRequest::default(), Some(false))
        .await
        .unwrap();
    let unread = t.app.notifications.unread_count().await.unwrap();

    //* Then
    list.assert_async().await;
    assert_eq!(page.items[0].kind, "report_handled");
    assert_eq!(unread, 4);
}
