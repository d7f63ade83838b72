// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the client.

pub mod admin;
pub mod auth;
pub mod notification;
pub mod pokemon;
pub mod session;
pub mod team;

pub use admin::{Report, ReportAction, SensitiveWord, UserSummary};
pub use auth::{ProfileResponse, ProfileUpdate, TokenClaims, TokenResponse};
pub use notification::Notification;
pub use pokemon::{Generation, PokemonListing, PokemonQuery};
pub use session::{CurrentUser, Session};
pub use team::{Page, PageRequest, PublicTeamFilters, TeamSummary, UserTeamFilters};

use serde::{Deserialize, Deserializer};

/// IDs arrive as JSON strings (JWT `sub`) or numbers (profile `user_id`).
pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Str(String),
        Num(i64),
    }

    Ok(Option::<Id>::deserialize(deserializer)?.map(|id| match id {
        Id::Str(s) => s,
        Id::Num(n) => n.to_string(),
    }))
}
