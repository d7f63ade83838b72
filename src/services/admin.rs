// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Moderation endpoints. Every call checks the session's admin claim first
//! and fails locally without touching the network if it is missing. An
//! expired access token is not checked here; the pipeline refreshes it.

use crate::error::{AppError, Result};
use crate::models::admin::{
    AdminStatusUpdate, ResolveReportRequest, ReviewRequest, SensitiveWordRequest,
};
use crate::models::auth::MessageResponse;
use crate::models::{Page, PageRequest, Report, ReportAction, SensitiveWord, TeamSummary, UserSummary};
use crate::services::api::{segment, ApiClient, ApiRequest};

#[derive(Clone)]
pub struct AdminService {
    api: ApiClient,
}

impl AdminService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn require_admin(&self) -> Result<()> {
        if self.api.session().is_admin() {
            Ok(())
        } else {
            tracing::warn!("Admin call rejected for non-admin session");
            Err(AppError::Permission(AppError::ADMIN_REQUIRED.to_string()))
        }
    }

    // ─── Team review ─────────────────────────────────────────────────────────

    pub async fn pending_teams(&self, page: PageRequest) -> Result<Page<TeamSummary>> {
        self.require_admin()?;
        self.api
            .execute(ApiRequest::get("/admin/teams/pending").query(page.to_query()))
            .await
    }

    pub async fn review_team(
        &self,
        team_id: u64,
        approved: bool,
        reason: Option<&str>,
    ) -> Result<MessageResponse> {
        self.require_admin()?;
        let request = ApiRequest::post(format!("/admin/teams/{}/review", segment(team_id)))
            .json(&ReviewRequest { approved, reason })?;
        self.api.execute(request).await
    }

    // ─── Reports ─────────────────────────────────────────────────────────────

    pub async fn pending_reports(&self, page: PageRequest) -> Result<Page<Report>> {
        self.require_admin()?;
        self.api
            .execute(ApiRequest::get("/admin/reports/pending").query(page.to_query()))
            .await
    }

    pub async fn resolve_report(
        &self,
        report_id: u64,
        action: ReportAction,
        note: Option<&str>,
    ) -> Result<MessageResponse> {
        self.require_admin()?;
        let request = ApiRequest::post(format!("/admin/reports/{}/resolve", segment(report_id)))
            .json(&ResolveReportRequest { action, note })?;
        self.api.execute(request).await
    }

    pub async fn report_history(&self, page: PageRequest) -> Result<Page<Report>> {
        self.require_admin()?;
        self.api
            .execute(ApiRequest::get("/admin/reports/history").query(page.to_query()))
            .await
    }

    // ─── Sensitive words ─────────────────────────────────────────────────────

    pub async fn sensitive_words(&self, page: PageRequest) -> Result<Page<SensitiveWord>> {
        self.require_admin()?;
        self.api
            .execute(ApiRequest::get("/admin/sensitive-words").query(page.to_query()))
            .await
    }

    pub async fn add_sensitive_word(&self, content: &str) -> Result<MessageResponse> {
        self.require_admin()?;
        let request =
            ApiRequest::post("/admin/sensitive-words").json(&SensitiveWordRequest { content })?;
        self.api.execute(request).await
    }

    pub async fn remove_sensitive_word(&self, word_id: u64) -> Result<()> {
        self.require_admin()?;
        self.api
            .execute_unit(ApiRequest::delete(format!(
                "/admin/sensitive-words/{}",
                segment(word_id)
            )))
            .await
    }

    /// Ask the server to reload its sensitive word filter.
    pub async fn refresh_sensitive_words(&self) -> Result<()> {
        self.require_admin()?;
        self.api
            .execute_unit(ApiRequest::post("/admin/sensitive-words/refresh-cache"))
            .await
    }

    // ─── Users ───────────────────────────────────────────────────────────────

    pub async fn users(&self, page: PageRequest) -> Result<Page<UserSummary>> {
        self.require_admin()?;
        self.api
            .execute(ApiRequest::get("/admin/users").query(page.to_query()))
            .await
    }

    pub async fn set_admin_status(&self, user_id: u64, is_admin: bool) -> Result<MessageResponse> {
        self.require_admin()?;
        let request = ApiRequest::put(format!("/admin/users/{}/admin-status", segment(user_id)))
            .json(&AdminStatusUpdate { is_admin })?;
        self.api.execute(request).await
    }

    pub async fn delete_user(&self, user_id: u64) -> Result<()> {
        self.require_admin()?;
        self.api
            .execute_unit(ApiRequest::delete(format!("/admin/users/{}", segment(user_id))))
            .await
    }
}
