// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable key/value storage for the session.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::AppError;

/// Storage key names. All are string-valued.
pub mod keys {
    pub const ACCESS_TOKEN: &str = "accessToken";
    pub const REFRESH_TOKEN: &str = "refreshToken";
    /// Milliseconds since the Unix epoch
    pub const TOKEN_EXPIRY: &str = "tokenExpiry";
    pub const USER_ID: &str = "userId";
    pub const USERNAME: &str = "username";
    pub const EMAIL: &str = "email";
    /// `"true"` / `"false"`
    pub const EMAIL_VERIFIED: &str = "emailVerified";
    /// `"true"` / `"false"`
    pub const IS_ADMIN: &str = "is_admin";

    /// Every key the session owns, wiped together on logout.
    pub const ALL: [&str; 8] = [
        ACCESS_TOKEN,
        REFRESH_TOKEN,
        TOKEN_EXPIRY,
        USER_ID,
        USERNAME,
        EMAIL,
        EMAIL_VERIFIED,
        IS_ADMIN,
    ];
}

/// String key/value store that survives restarts.
///
/// Writes are batched so the session can be persisted as one unit.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set_all(&self, entries: &[(&str, String)]) -> Result<(), AppError>;

    fn remove_all(&self, keys: &[&str]) -> Result<(), AppError>;

    fn set(&self, key: &str, value: String) -> Result<(), AppError> {
        self.set_all(&[(key, value)])
    }
}
