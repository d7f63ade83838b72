// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use pmteam_client::config::Config;
use pmteam_client::storage::{keys, KeyValueStore, MemoryStore};
use pmteam_client::time_utils::{to_epoch_millis, ManualClock};
use pmteam_client::AppState;
use serde::Serialize;
use std::sync::Arc;

/// Key used to sign test tokens. The client never verifies signatures.
#[allow(dead_code)]
pub const TEST_SIGNING_KEY: &[u8] = b"test-signing-key";

/// Fixed start instant so expiry arithmetic is reproducible.
#[allow(dead_code)]
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap()
}

#[derive(Serialize)]
struct Claims<'a> {
    sub: &'a str,
    username: &'a str,
    email: String,
    email_verified: bool,
    is_admin: bool,
    exp: i64,
}

/// Mint an HS256 access token with the claims the API puts in its tokens.
#[allow(dead_code)]
pub fn mint_token(sub: &str, username: &str, is_admin: bool) -> String {
    let claims = Claims {
        sub,
        username,
        email: format!("{}@example.com", username),
        email_verified: true,
        is_admin,
        exp: (start_time() + Duration::hours(1)).timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_SIGNING_KEY),
    )
    .unwrap()
}

/// Body of a login/refresh response carrying only tokens; claims come from
/// the access token.
#[allow(dead_code)]
pub fn token_body(access_token: &str, refresh_token: &str, expires_in: i64) -> String {
    serde_json::json!({
        "access_token": access_token,
        "refresh_token": refresh_token,
        "expires_in": expires_in,
    })
    .to_string()
}

/// Test harness: application state over in-memory storage and a manual
/// clock.
#[allow(dead_code)]
pub struct TestApp {
    pub app: AppState,
    pub storage: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
}

/// Build an app pointed at `server_url` over the given storage.
#[allow(dead_code)]
pub fn app_with_storage(server_url: &str, storage: Arc<MemoryStore>) -> TestApp {
    let clock = Arc::new(ManualClock::new(start_time()));
    let config = Config::with_base_url(server_url).unwrap();
    let app = AppState::new(config, storage.clone(), clock.clone()).unwrap();
    TestApp {
        app,
        storage,
        clock,
    }
}

/// Build a logged-out app pointed at `server_url`.
#[allow(dead_code)]
pub fn app_for(server_url: &str) -> TestApp {
    app_with_storage(server_url, Arc::new(MemoryStore::new()))
}

/// Build an app whose session is rehydrated from a stored, unexpired
/// session.
#[allow(dead_code)]
pub fn logged_in_app(server_url: &str, access_token: &str, is_admin: bool) -> TestApp {
    let storage = Arc::new(MemoryStore::new());
    seed_session(&storage, access_token, "refresh-1", is_admin);
    app_with_storage(server_url, storage)
}

/// Write a complete session tuple expiring one hour after [`start_time`].
#[allow(dead_code)]
pub fn seed_session(storage: &MemoryStore, access_token: &str, refresh_token: &str, is_admin: bool) {
    let expiry = start_time() + Duration::hours(1);
    storage
        .set_all(&[
            (keys::ACCESS_TOKEN, access_token.to_string()),
            (keys::REFRESH_TOKEN, refresh_token.to_string()),
            (keys::TOKEN_EXPIRY, to_epoch_millis(expiry).to_string()),
            (keys::USER_ID, "7".to_string()),
            (keys::USERNAME, "misty".to_string()),
            (keys::EMAIL, "misty@example.com".to_string()),
            (keys::EMAIL_VERIFIED, "true".to_string()),
            (keys::IS_ADMIN, is_admin.to_string()),
        ])
        .unwrap();
}
