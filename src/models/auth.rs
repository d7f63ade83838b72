//! Request/response bodies for the `/auth` endpoints and the access-token
//! claims.

use super::{opt_string_or_number, CurrentUser};
use serde::{Deserialize, Serialize};

/// `POST /auth/login` body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `POST /auth/register` body.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// `POST /auth/refresh` body.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Token response from login and refresh.
///
/// Claim fields are optional: login returns most of them, refresh usually
/// none, in which case they are decoded from the access token.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
    #[serde(default)]
    pub is_admin: Option<bool>,
}

/// Claims carried in the access token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenClaims {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub sub: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
    #[serde(default)]
    pub is_admin: Option<bool>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenResponse {
    /// Derive the user claims: response fields first, then the decoded token,
    /// then whatever was known before.
    pub fn derive_user(
        &self,
        claims: Option<&TokenClaims>,
        previous: Option<&CurrentUser>,
    ) -> CurrentUser {
        let claims = claims.cloned().unwrap_or_default();
        CurrentUser {
            id: self
                .user_id
                .clone()
                .or(claims.sub)
                .or_else(|| previous.and_then(|p| p.id.clone())),
            username: self
                .username
                .clone()
                .or(claims.username)
                .or_else(|| previous.and_then(|p| p.username.clone())),
            email: self
                .email
                .clone()
                .or(claims.email)
                .or_else(|| previous.and_then(|p| p.email.clone())),
            email_verified: self
                .email_verified
                .or(claims.email_verified)
                .or_else(|| previous.map(|p| p.email_verified))
                .unwrap_or(false),
            is_admin: self
                .is_admin
                .or(claims.is_admin)
                .or_else(|| previous.map(|p| p.is_admin))
                .unwrap_or(false),
        }
    }
}

/// `GET /auth/profile` response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProfileResponse {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
}

/// `PUT /auth/profile` body. Only the username is editable.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    pub username: String,
}

/// `PUT /auth/profile` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdateResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub username: String,
}

/// Generic `{"message": ...}` acknowledgement.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// `GET /auth/verify-email` response.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyEmailResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub email: Option<String>,
}
