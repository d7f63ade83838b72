//! Notification model.

use serde::{Deserialize, Serialize};

/// A notification delivered to the current user (report handled, team
/// rejected, ...).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Notification {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub related_id: Option<u64>,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub is_read: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UnreadCount {
    pub unread_count: u64,
}
