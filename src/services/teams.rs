// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team CRUD, favorites, likes, reports and sharing.

use crate::error::Result;
use crate::models::auth::MessageResponse;
use crate::models::team::{ImportRequest, PrivacyUpdate, ReportRequest};
use crate::models::{Page, PageRequest, PublicTeamFilters, TeamSummary, UserTeamFilters};
use crate::services::api::{segment, ApiClient, ApiRequest};
use serde_json::Value;

#[derive(Clone)]
pub struct TeamService {
    api: ApiClient,
}

impl TeamService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    // ─── Own teams ───────────────────────────────────────────────────────────

    pub async fn user_teams(
        &self,
        page: PageRequest,
        filters: &UserTeamFilters,
    ) -> Result<Page<TeamSummary>> {
        let request = ApiRequest::get("/team/user")
            .query(page.to_query())
            .query(filters.to_query());
        self.api.execute(request).await
    }

    pub async fn favorite_teams(&self, page: PageRequest) -> Result<Page<TeamSummary>> {
        self.api
            .execute(ApiRequest::get("/team/favorites").query(page.to_query()))
            .await
    }

    /// Create a team. The payload is passed through; team validity is the
    /// server's business.
    pub async fn create_team(&self, team: &Value) -> Result<Value> {
        self.api
            .execute(ApiRequest::post("/team").json(team)?)
            .await
    }

    pub async fn get_team(&self, team_id: u64) -> Result<Value> {
        self.api
            .execute(ApiRequest::get(format!("/team/{}", segment(team_id))))
            .await
    }

    pub async fn update_team(&self, team_id: u64, changes: &Value) -> Result<Value> {
        self.api
            .execute(ApiRequest::put(format!("/team/{}", segment(team_id))).json(changes)?)
            .await
    }

    pub async fn set_privacy(&self, team_id: u64, is_public: bool) -> Result<Value> {
        self.api
            .execute(
                ApiRequest::put(format!("/team/{}", segment(team_id)))
                    .json(&PrivacyUpdate { is_public })?,
            )
            .await
    }

    pub async fn delete_team(&self, team_id: u64) -> Result<MessageResponse> {
        self.api
            .execute(ApiRequest::delete(format!("/team/{}", segment(team_id))))
            .await
    }

    pub async fn copy_team(&self, team_id: u64) -> Result<Value> {
        self.api
            .execute(ApiRequest::post(format!("/team/{}/copy", segment(team_id))))
            .await
    }

    /// Import a shared team by its share token.
    pub async fn import_team(&self, token: &str) -> Result<Value> {
        self.api
            .execute(ApiRequest::post("/team/import").json(&ImportRequest { token })?)
            .await
    }

    pub async fn report_team(&self, team_id: u64, reason: &str) -> Result<MessageResponse> {
        self.api
            .execute(
                ApiRequest::post(format!("/team/{}/report", segment(team_id)))
                    .json(&ReportRequest { reason })?,
            )
            .await
    }

    // ─── Team square ─────────────────────────────────────────────────────────

    pub async fn public_teams(
        &self,
        page: PageRequest,
        filters: &PublicTeamFilters,
    ) -> Result<Page<TeamSummary>> {
        let request = ApiRequest::get("/team/public")
            .query(page.to_query())
            .query(filters.to_query());
        self.api.execute(request).await
    }

    pub async fn add_favorite(&self, team_id: u64) -> Result<()> {
        self.api
            .execute_unit(ApiRequest::post(format!("/team/{}/favorite", segment(team_id))))
            .await
    }

    pub async fn remove_favorite(&self, team_id: u64) -> Result<()> {
        self.api
            .execute_unit(ApiRequest::delete(format!("/team/{}/favorite", segment(team_id))))
            .await
    }

    pub async fn add_like(&self, team_id: u64) -> Result<()> {
        self.api
            .execute_unit(ApiRequest::post(format!("/team/{}/like", segment(team_id))))
            .await
    }

    pub async fn remove_like(&self, team_id: u64) -> Result<()> {
        self.api
            .execute_unit(ApiRequest::delete(format!("/team/{}/like", segment(team_id))))
            .await
    }
}
