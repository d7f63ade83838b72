// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token refresh tests against a local mock API.
//!
//! Cover the single-flight refresh: concurrent 401s share one refresh call,
//! a failed refresh tears the session down, and a retried request never
//! refreshes again.

use futures_util::future::join_all;
use mockito::Matcher;
use pmteam_client::error::AppError;
use pmteam_client::services::ApiRequest;
use pmteam_client::storage::keys;
use pmteam_client::storage::KeyValueStore;
use serde_json::{json, Value};

mod common;
use common::{logged_in_app, token_body};

const CONCURRENT_REQUESTS: usize = 5;

#[tokio::test]
async fn test_concurrent_401s_share_one_refresh() {
    //* Given
    let mut server = mockito::Server::new_async().await;

    let rejected = server
        .mock("GET", "/team/1")
        .match_header("authorization", "Bearer access-old")
        .with_status(401)
        .with_body(r#"{"message": "Token has expired"}"#)
        .expect(CONCURRENT_REQUESTS)
        .create_async()
        .await;
    let accepted = server
        .mock("GET", "/team/1")
        .match_header("authorization", "Bearer access-new")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 1, "name": "Rain"}"#)
        .expect(CONCURRENT_REQUESTS)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/auth/refresh")
        .match_body(Matcher::Json(json!({"refresh_token": "refresh-1"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(token_body("access-new", "refresh-2", 3600))
        .expect(1)
        .create_async()
        .await;

    let t = logged_in_app(&server.url(), "access-old", false);

    //* When
    let results = join_all(
        (0..CONCURRENT_REQUESTS)
            .map(|_| t.app.api.execute::<Value>(ApiRequest::get("/team/1"))),
    )
    .await;

    //* Then
    for result in results {
        assert_eq!(result.unwrap()["name"], "Rain");
    }
    rejected.assert_async().await;
    accepted.assert_async().await;
    refresh.assert_async().await;

    assert_eq!(t.app.session.access_token().as_deref(), Some("access-new"));
    assert_eq!(t.app.session.refresh_token().as_deref(), Some("refresh-2"));
    assert_eq!(t.storage.get(keys::REFRESH_TOKEN).as_deref(), Some("refresh-2"));
    // Claims the new token does not carry are kept from before.
    assert_eq!(
        t.app.session.current_user().unwrap().username.as_deref(),
        Some("misty")
    );
}

/// Requests that queued behind the refresh get its error message. A 401 that
/// lands after the session was torn down finds no refresh token and fails
/// with the "No refresh token available" message instead; which requests
/// land late depends on scheduling, so both messages are accepted.
#[tokio::test]
async fn test_failed_refresh_rejects_all_and_clears_session() {
    //* Given
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/team/user")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"message": "Token has expired"}"#)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/auth/refresh")
        .with_status(401)
        .with_body(r#"{"message": "Refresh token expired"}"#)
        .expect(1)
        .create_async()
        .await;

    let t = logged_in_app(&server.url(), "access-old", false);

    //* When
    let results = join_all((0..CONCURRENT_REQUESTS).map(|_| {
        t.app.api.execute::<Value>(
            ApiRequest::get("/team/user").query([("page", "1"), ("per_page", "10")]),
        )
    }))
    .await;

    //* Then
    let refresh_failed = AppError::Auth("Refresh token expired".to_string());
    let torn_down = AppError::Auth(AppError::NO_REFRESH_TOKEN.to_string());
    let errors: Vec<AppError> = results.into_iter().map(|r| r.unwrap_err()).collect();
    for err in &errors {
        assert!(
            *err == refresh_failed || *err == torn_down,
            "unexpected error {:?}",
            err
        );
    }
    assert!(errors.contains(&refresh_failed));
    refresh.assert_async().await;

    assert!(!t.app.session.is_authenticated());
    assert!(t.app.session.current_user().is_none());
    assert!(t.storage.is_empty());
}

#[tokio::test]
async fn test_out_of_range_token_lifetime_fails_refresh() {
    //* Given
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/team/1")
        .with_status(401)
        .with_body(r#"{"message": "Token has expired"}"#)
        .expect(1)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/auth/refresh")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(token_body("access-new", "refresh-2", i64::MAX))
        .expect(1)
        .create_async()
        .await;

    let t = logged_in_app(&server.url(), "access-old", false);

    //* When
    let err = t
        .app
        .api
        .execute::<Value>(ApiRequest::get("/team/1"))
        .await
        .unwrap_err();

    //* Then
    assert!(matches!(err, AppError::Decode(_)), "got {:?}", err);
    refresh.assert_async().await;
    assert!(!t.app.session.is_authenticated());
    assert!(t.app.session.access_token().is_none());
    assert!(t.storage.is_empty());
}

#[tokio::test]
async fn test_refresh_error_message_reaches_caller() {
    //* Given
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/notifications/unread_count")
        .with_status(401)
        .create_async()
        .await;
    server
        .mock("POST", "/auth/refresh")
        .with_status(401)
        .with_body(r#"{"message": "Refresh token revoked"}"#)
        .create_async()
        .await;

    let t = logged_in_app(&server.url(), "access-old", false);

    //* When
    let err = t.app.notifications.unread_count().await.unwrap_err();

    //* Then
    assert_eq!(err, AppError::Auth("Refresh token revoked".to_string()));
}

#[tokio::test]
async fn test_retry_flag_never_refreshes() {
    //* Given
    let mut server = mockito::Server::new_async().await;

    let rejected = server
        .mock("GET", "/team/1")
        .with_status(401)
        .with_body(r#"{"message": "Token has expired"}"#)
        .expect(1)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/auth/refresh")
        .expect(0)
        .create_async()
        .await;

    let t = logged_in_app(&server.url(), "access-old", false);

    //* When
    let request = ApiRequest::get("/team/1").into_retry("access-old".to_string());
    let err = t.app.api.execute::<Value>(request).await.unwrap_err();

    //* Then
    assert_eq!(err, AppError::Unauthorized("Token has expired".to_string()));
    rejected.assert_async().await;
    refresh.assert_async().await;
    assert!(t.app.session.is_authenticated());
}

#[tokio::test]
async fn test_retry_401_is_final() {
    //* Given
    let mut server = mockito::Server::new_async().await;

    let team = server
        .mock("GET", "/team/1")
        .with_status(401)
        .expect(2)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/auth/refresh")
        .with_status(200)
        .with_body(token_body("access-new", "refresh-2", 3600))
        .expect(1)
        .create_async()
        .await;

    let t = logged_in_app(&server.url(), "access-old", false);

    //* When
    let err = t
        .app
        .api
        .execute::<Value>(ApiRequest::get("/team/1"))
        .await
        .unwrap_err();

    //* Then
    assert!(err.is_unauthorized());
    team.assert_async().await;
    refresh.assert_async().await;
}

#[tokio::test]
async fn test_missing_refresh_token_logs_out() {
    //* Given
    let mut server = mockito::Server::new_async().await;
    let refresh = server
        .mock("POST", "/auth/refresh")
        .expect(0)
        .create_async()
        .await;

    let t = common::app_for(&server.url());

    //* When
    let err = t.app.auth.refresh().await.unwrap_err();

    //* Then
    assert_eq!(err, AppError::Auth(AppError::NO_REFRESH_TOKEN.to_string()));
    refresh.assert_async().await;
}

#[tokio::test]
async fn test_anonymous_request_sends_no_bearer() {
    //* Given
    let mut server = mockito::Server::new_async().await;
    let register = server
        .mock("POST", "/auth/register")
        .match_header("authorization", Matcher::Missing)
        .with_status(201)
        .with_body(r#"{"message": "Registration successful"}"#)
        .expect(1)
        .create_async()
        .await;

    let t = logged_in_app(&server.url(), "access-old", false);

    //* When
    let message = t
        .app
        .auth
        .register("brock", "brock@example.com", "onix")
        .await
        .unwrap();

    //* Then
    assert_eq!(message, "Registration successful");
    register.assert_async().await;
}
