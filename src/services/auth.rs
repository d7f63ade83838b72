// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account operations on top of the credential store: login, registration,
//! email verification, profile and logout.

use crate::error::{AppError, Result};
use crate::models::auth::{
    LoginRequest, MessageResponse, ProfileUpdateResponse, RegisterRequest, VerifyEmailResponse,
};
use crate::models::{ProfileResponse, ProfileUpdate, Session, TokenResponse};
use crate::services::api::{ApiClient, ApiRequest};
use crate::services::session::SessionStore;
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        self.api.session()
    }

    /// Log in and establish a session.
    ///
    /// On failure the existing session is left untouched and the server
    /// message is returned as [`AppError::Auth`].
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let request = ApiRequest::post("/auth/login")
            .anonymous()
            .json(&LoginRequest { email, password })?;

        let tokens: TokenResponse = self.api.execute(request).await.map_err(|e| match e {
            AppError::Unauthorized(msg) | AppError::Validation(msg) => AppError::Auth(msg),
            other => other,
        })?;

        let session = self.session().establish(&tokens)?;
        tracing::info!(
            user_id = session.current_user.as_ref().and_then(|u| u.id.as_deref()),
            expires_in = tokens.expires_in,
            "Logged in"
        );
        Ok(session)
    }

    /// Clear the session and durable storage. Never fails.
    pub fn logout(&self) {
        self.session().logout();
        tracing::info!("Logged out");
    }

    /// Rotate tokens, joining an in-flight refresh if one is running.
    pub async fn refresh(&self) -> Result<Session> {
        self.api.refresh().await
    }

    /// Create an account. The session is not touched; the user still has to
    /// verify their email and log in.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<String> {
        let request = ApiRequest::post("/auth/register")
            .anonymous()
            .json(&RegisterRequest {
                username,
                email,
                password,
            })?;
        let response: MessageResponse = self.api.execute(request).await?;
        Ok(response.message)
    }

    pub async fn verify_email(&self, token: &str) -> Result<VerifyEmailResponse> {
        let request = ApiRequest::get("/auth/verify-email")
            .anonymous()
            .query([("token", token)]);
        self.api.execute(request).await
    }

    pub async fn resend_verification_email(&self, email: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
        }

        let request = ApiRequest::post("/auth/resend-verification-email")
            .anonymous()
            .json(&Body { email })?;
        let response: MessageResponse = self.api.execute(request).await?;
        Ok(response.message)
    }

    /// Fetch the profile and mirror its claims into the session.
    pub async fn fetch_profile(&self) -> Result<ProfileResponse> {
        let profile: ProfileResponse = self.api.execute(ApiRequest::get("/auth/profile")).await?;
        self.session().sync_profile(&profile);
        Ok(profile)
    }

    /// Update the profile, then explicitly sync the new username into the
    /// session.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<ProfileUpdateResponse> {
        let request = ApiRequest::put("/auth/profile").json(update)?;
        let response: ProfileUpdateResponse = self.api.execute(request).await?;
        self.session().apply_profile_update(&response.username);
        Ok(response)
    }

    /// Admin overview message. Rejected locally when the session carries no
    /// admin claim.
    pub async fn admin_data(&self) -> Result<String> {
        if !self.session().is_admin() {
            return Err(AppError::Permission(AppError::ADMIN_REQUIRED.to_string()));
        }
        let response: MessageResponse = self
            .api
            .execute(ApiRequest::get("/auth/admin-data"))
            .await?;
        Ok(response.message)
    }
}
