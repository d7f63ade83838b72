// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use crate::error::Result;
use crate::models::notification::UnreadCount;
use crate::models::{Notification, Page, PageRequest};
use crate::services::api::{segment, ApiClient, ApiRequest};

#[derive(Clone)]
pub struct NotificationService {
    api: ApiClient,
}

impl NotificationService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// List notifications, optionally only read or unread ones.
    pub async fn list(
        &self,
        page: PageRequest,
        is_read: Option<bool>,
    ) -> Result<Page<Notification>> {
        let mut request = ApiRequest::get("/notifications").query(page.to_query());
        if let Some(is_read) = is_read {
            request = request.query([("is_read", is_read.to_string())]);
        }
        self.api.execute(request).await
    }

    pub async fn mark_read(&self, notification_id: u64) -> Result<()> {
        self.api
            .execute_unit(ApiRequest::put(format!(
                "/notifications/{}/mark-read",
                segment(notification_id)
            )))
            .await
    }

    pub async fn unread_count(&self) -> Result<u64> {
        let count: UnreadCount = self
            .api
            .execute(ApiRequest::get("/notifications/unread_count"))
            .await?;
        Ok(count.unread_count)
    }

    pub async fn mark_all_read(&self) -> Result<()> {
        self.api
            .execute_unit(ApiRequest::post("/notifications/mark_all_read"))
            .await
    }
}
