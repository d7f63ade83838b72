//! Team and pagination models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Paginated list envelope returned by every list endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub has_next: Option<bool>,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    10
}

impl<T> Page<T> {
    /// Total pages, computed from `total` when the server omits it.
    pub fn total_pages(&self) -> u32 {
        self.pages.unwrap_or_else(|| {
            if self.per_page == 0 {
                0
            } else {
                u32::try_from(self.total.div_ceil(u64::from(self.per_page))).unwrap_or(u32::MAX)
            }
        })
    }
}

/// `page`/`per_page` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub(crate) fn to_query(self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// A team as listed by the API.
///
/// Fields the client does not interpret (pokémon sets, tags, review
/// comments) are kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TeamSummary {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub generation: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub review_status: Option<String>,
    #[serde(default)]
    pub creator_username: Option<String>,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub favorites_count: u64,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub is_favorited: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Filters for `GET /team/user`.
#[derive(Debug, Clone, Default)]
pub struct UserTeamFilters {
    pub generation: Option<String>,
    pub status: Option<String>,
    pub format: Option<String>,
    pub is_public: Option<bool>,
}

impl UserTeamFilters {
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(generation) = &self.generation {
            query.push(("generation", generation.clone()));
        }
        if let Some(status) = &self.status {
            query.push(("status", status.clone()));
        }
        if let Some(format) = &self.format {
            query.push(("format", format.clone()));
        }
        if let Some(is_public) = self.is_public {
            query.push(("is_public", is_public.to_string()));
        }
        query
    }
}

/// Filters for `GET /team/public`. Empty strings are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicTeamFilters {
    pub search: Option<String>,
    pub generation: Option<String>,
    pub format: Option<String>,
}

impl PublicTeamFilters {
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        [
            ("search", &self.search),
            ("generation", &self.generation),
            ("format", &self.format),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (key, v.to_string()))
        })
        .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ReportRequest<'a> {
    pub reason: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ImportRequest<'a> {
    pub token: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PrivacyUpdate {
    pub is_public: bool,
}
