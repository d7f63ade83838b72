//! Admin moderation models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How a handled report is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportAction {
    Warn,
    Delete,
    Ignore,
}

/// A user report against a team.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Report {
    pub id: u64,
    pub team_id: u64,
    pub reason: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub action: Option<ReportAction>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SensitiveWord {
    pub id: u64,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A registered user as seen by admins.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UserSummary {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ReviewRequest<'a> {
    pub approved: bool,
    pub reason: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ResolveReportRequest<'a> {
    pub action: ReportAction,
    pub note: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SensitiveWordRequest<'a> {
    pub content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct AdminStatusUpdate {
    pub is_admin: bool,
}
