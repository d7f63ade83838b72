//! Session model mirrored in memory and in durable storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims for the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User ID (the JWT `sub` claim)
    pub id: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub email_verified: bool,
    pub is_admin: bool,
}

/// Authenticated session.
///
/// An empty `access_token` means no session. `access_token` and
/// `token_expiry` are only ever assigned together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub token_expiry: Option<DateTime<Utc>>,
    pub current_user: Option<CurrentUser>,
}

impl Session {
    /// True iff there is an access token and it has not expired at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.access_token.is_empty() && self.token_expiry.is_some_and(|expiry| now < expiry)
    }

    pub fn is_admin(&self) -> bool {
        self.current_user.as_ref().is_some_and(|u| u.is_admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_session_validity_requires_token_and_future_expiry() {
        let now = Utc::now();
        let mut session = Session {
            access_token: "tok".to_string(),
            refresh_token: "ref".to_string(),
            token_expiry: Some(now + Duration::seconds(10)),
            current_user: None,
        };
        assert!(session.is_valid_at(now));
        assert!(!session.is_valid_at(now + Duration::seconds(10)));

        session.access_token.clear();
        assert!(!session.is_valid_at(now));
        assert!(!Session::default().is_valid_at(now));
    }
}
