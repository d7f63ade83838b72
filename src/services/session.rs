// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential store.
//!
//! Holds the single in-memory [`Session`] and mirrors every field to durable
//! storage. All mutations (establish, rotate, profile sync, logout) happen
//! inside one write-lock section, so readers never observe a token without
//! its expiry.

use crate::error::{AppError, Result};
use crate::models::auth::ProfileResponse;
use crate::models::{CurrentUser, Session, TokenClaims, TokenResponse};
use crate::storage::{keys, KeyValueStore};
use crate::time_utils::{format_utc_rfc3339, from_epoch_millis, to_epoch_millis, Clock};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Process-wide session holder shared by the request pipeline, the services
/// and the route guard.
pub struct SessionStore {
    session: RwLock<Session>,
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    /// Rebuild the session from durable storage.
    ///
    /// An incomplete tuple (any of access token, refresh token or expiry
    /// missing) is never kept: the session is forced to logged-out and the
    /// storage wiped.
    pub fn rehydrate(storage: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        let store = Self {
            session: RwLock::new(Session::default()),
            storage,
            clock,
        };

        let non_empty = |key: &str| store.storage.get(key).filter(|v| !v.is_empty());
        let access_token = non_empty(keys::ACCESS_TOKEN);
        let refresh_token = non_empty(keys::REFRESH_TOKEN);
        let expiry = non_empty(keys::TOKEN_EXPIRY).and_then(|raw| from_epoch_millis(&raw));

        match (access_token, refresh_token, expiry) {
            (Some(access_token), Some(refresh_token), Some(expiry)) => {
                let user = CurrentUser {
                    id: non_empty(keys::USER_ID),
                    username: non_empty(keys::USERNAME),
                    email: non_empty(keys::EMAIL),
                    email_verified: non_empty(keys::EMAIL_VERIFIED).as_deref() == Some("true"),
                    is_admin: non_empty(keys::IS_ADMIN).as_deref() == Some("true"),
                };
                tracing::debug!(
                    expires_at = %format_utc_rfc3339(expiry),
                    "Session rehydrated from storage"
                );
                *store.write() = Session {
                    access_token,
                    refresh_token,
                    token_expiry: Some(expiry),
                    current_user: Some(user),
                };
            }
            (access, refresh, expiry) => {
                if access.is_some() || refresh.is_some() || expiry.is_some() {
                    tracing::info!("Stored session incomplete, clearing");
                }
                store.logout();
            }
        }

        store
    }

    /// True iff an access token is present and unexpired right now.
    ///
    /// Evaluated against the clock on every call.
    pub fn is_authenticated(&self) -> bool {
        self.read().is_valid_at(self.clock.now())
    }

    /// True if the signed-in user carries the admin claim.
    pub fn is_admin(&self) -> bool {
        self.read().is_admin()
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.read().current_user.clone()
    }

    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    /// The bearer credential, if any (regardless of expiry).
    pub fn access_token(&self) -> Option<String> {
        Some(self.read().access_token.clone()).filter(|t| !t.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        Some(self.read().refresh_token.clone()).filter(|t| !t.is_empty())
    }

    pub fn token_expiry(&self) -> Option<DateTime<Utc>> {
        self.read().token_expiry
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Install a fresh session after login.
    pub(crate) fn establish(&self, tokens: &TokenResponse) -> Result<Session> {
        let user = tokens.derive_user(decode_claims(&tokens.access_token).as_ref(), None);
        self.install(tokens, user)
    }

    /// Rotate tokens after a refresh, re-deriving claims from the new token
    /// and keeping anything the new token does not carry.
    pub(crate) fn rotate(&self, tokens: &TokenResponse) -> Result<Session> {
        let previous = self.current_user();
        let user = tokens.derive_user(
            decode_claims(&tokens.access_token).as_ref(),
            previous.as_ref(),
        );
        self.install(tokens, user)
    }

    /// Fails with [`AppError::Decode`] if `expires_in` does not fit in a
    /// timestamp; nothing is installed in that case.
    fn install(&self, tokens: &TokenResponse, user: CurrentUser) -> Result<Session> {
        let expiry = Duration::try_seconds(tokens.expires_in)
            .and_then(|ttl| self.clock.now().checked_add_signed(ttl))
            .ok_or_else(|| {
                AppError::Decode(format!("Token lifetime out of range: {}", tokens.expires_in))
            })?;
        let session = Session {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            token_expiry: Some(expiry),
            current_user: Some(user),
        };

        {
            let mut guard = self.write();
            *guard = session.clone();
            self.persist(&guard);
        }
        Ok(session)
    }

    /// Clear the session and wipe durable storage. Never fails; calling it
    /// on an empty session is a no-op apart from the storage wipe.
    pub fn logout(&self) {
        let mut guard = self.write();
        *guard = Session::default();
        if let Err(e) = self.storage.remove_all(&keys::ALL) {
            tracing::warn!(error = %e, "Failed to wipe stored session");
        }
    }

    /// Mirror the username from a successful profile update.
    pub fn apply_profile_update(&self, username: &str) {
        let mut guard = self.write();
        if let Some(user) = guard.current_user.as_mut() {
            user.username = Some(username.to_string());
            self.persist(&guard);
        }
    }

    /// Mirror claims from `GET /auth/profile`.
    pub fn sync_profile(&self, profile: &ProfileResponse) {
        let mut guard = self.write();
        if let Some(user) = guard.current_user.as_mut() {
            if profile.user_id.is_some() {
                user.id.clone_from(&profile.user_id);
            }
            if profile.username.is_some() {
                user.username.clone_from(&profile.username);
            }
            if profile.email.is_some() {
                user.email.clone_from(&profile.email);
            }
            user.email_verified = profile.email_verified;
            user.is_admin = profile.is_admin;
            self.persist(&guard);
        }
    }

    fn persist(&self, session: &Session) {
        let Some(expiry) = session.token_expiry else {
            return;
        };
        let user = session.current_user.clone().unwrap_or_default();
        let entries = [
            (keys::ACCESS_TOKEN, session.access_token.clone()),
            (keys::REFRESH_TOKEN, session.refresh_token.clone()),
            (keys::TOKEN_EXPIRY, to_epoch_millis(expiry).to_string()),
            (keys::USER_ID, user.id.unwrap_or_default()),
            (keys::USERNAME, user.username.unwrap_or_default()),
            (keys::EMAIL, user.email.unwrap_or_default()),
            (keys::EMAIL_VERIFIED, user.email_verified.to_string()),
            (keys::IS_ADMIN, user.is_admin.to_string()),
        ];
        if let Err(e) = self.storage.set_all(&entries) {
            tracing::warn!(error = %e, "Failed to persist session");
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Read the claims out of an access token without verifying it.
///
/// The client never holds the signing key; the server verifies every token
/// it receives. This is only used to fill in user claims missing from a
/// response body.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    match decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation) {
        Ok(data) => Some(data.claims),
        Err(e) => {
            tracing::debug!(error = %e, "Access token is not a decodable JWT");
            None
        }
    }
}
