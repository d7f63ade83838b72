// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team square: the paginated public team list with optimistic like and
//! favorite toggles.

use crate::error::{AppError, Result};
use crate::models::{Page, PageRequest, PublicTeamFilters, TeamSummary};
use crate::services::session::SessionStore;
use crate::services::teams::TeamService;
use std::sync::{Arc, Mutex, MutexGuard};

/// Pagination as last reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquarePagination {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub pages: u32,
    pub has_next: bool,
}

impl Default for SquarePagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
            total: 0,
            pages: 0,
            has_next: false,
        }
    }
}

/// Local state of a toggled flag after the server accepted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleState {
    pub active: bool,
    pub count: u64,
}

#[derive(Debug, Default)]
struct SquareState {
    teams: Vec<TeamSummary>,
    pagination: SquarePagination,
    filters: PublicTeamFilters,
}

#[derive(Clone, Copy)]
enum Toggle {
    Like,
    Favorite,
}

impl Toggle {
    fn read(self, team: &TeamSummary) -> ToggleState {
        match self {
            Toggle::Like => ToggleState {
                active: team.is_liked,
                count: team.likes_count,
            },
            Toggle::Favorite => ToggleState {
                active: team.is_favorited,
                count: team.favorites_count,
            },
        }
    }

    fn write(self, team: &mut TeamSummary, state: ToggleState) {
        match self {
            Toggle::Like => {
                team.is_liked = state.active;
                team.likes_count = state.count;
            }
            Toggle::Favorite => {
                team.is_favorited = state.active;
                team.favorites_count = state.count;
            }
        }
    }
}

pub struct TeamSquare {
    teams: TeamService,
    session: Arc<SessionStore>,
    state: Mutex<SquareState>,
}

impl TeamSquare {
    pub fn new(teams: TeamService, session: Arc<SessionStore>) -> Self {
        Self {
            teams,
            session,
            state: Mutex::new(SquareState::default()),
        }
    }

    pub fn teams(&self) -> Vec<TeamSummary> {
        self.lock().teams.clone()
    }

    pub fn pagination(&self) -> SquarePagination {
        self.lock().pagination
    }

    pub fn filters(&self) -> PublicTeamFilters {
        self.lock().filters.clone()
    }

    /// Load a page with the current filters.
    pub async fn load_page(&self, page: u32) -> Result<()> {
        let (request, filters) = {
            let state = self.lock();
            (
                PageRequest::new(page, state.pagination.per_page),
                state.filters.clone(),
            )
        };

        let result: Page<TeamSummary> = self.teams.public_teams(request, &filters).await?;

        let mut state = self.lock();
        state.pagination = SquarePagination {
            page: result.page,
            per_page: result.per_page,
            total: result.total,
            pages: result.pages.unwrap_or(0),
            has_next: result.has_next.unwrap_or(false),
        };
        state.teams = result.items;
        Ok(())
    }

    /// Set the search text and reload from the first page.
    pub async fn search(&self, query: &str) -> Result<()> {
        self.lock().filters.search = Some(query.to_string());
        self.load_page(1).await
    }

    /// Set generation/format filters and reload from the first page.
    pub async fn filter(&self, generation: Option<String>, format: Option<String>) -> Result<()> {
        {
            let mut state = self.lock();
            state.filters.generation = generation;
            state.filters.format = format;
        }
        self.load_page(1).await
    }

    pub async fn toggle_like(&self, team_id: u64) -> Result<ToggleState> {
        self.toggle(team_id, Toggle::Like).await
    }

    pub async fn toggle_favorite(&self, team_id: u64) -> Result<ToggleState> {
        self.toggle(team_id, Toggle::Favorite).await
    }

    /// Flip the flag and count locally, call the API, and revert on error.
    async fn toggle(&self, team_id: u64, toggle: Toggle) -> Result<ToggleState> {
        if !self.session.is_authenticated() {
            return Err(AppError::Unauthorized("Login required".to_string()));
        }

        let original = {
            let mut state = self.lock();
            let team = state
                .teams
                .iter_mut()
                .find(|t| t.id == team_id)
                .ok_or_else(|| AppError::NotFound(format!("Team {} is not listed", team_id)))?;
            let original = toggle.read(team);
            let updated = ToggleState {
                active: !original.active,
                count: if original.active {
                    original.count.saturating_sub(1)
                } else {
                    original.count + 1
                },
            };
            toggle.write(team, updated);
            original
        };

        let result = match (toggle, original.active) {
            (Toggle::Like, true) => self.teams.remove_like(team_id).await,
            (Toggle::Like, false) => self.teams.add_like(team_id).await,
            (Toggle::Favorite, true) => self.teams.remove_favorite(team_id).await,
            (Toggle::Favorite, false) => self.teams.add_favorite(team_id).await,
        };

        let mut state = self.lock();
        let team = state.teams.iter_mut().find(|t| t.id == team_id);
        match result {
            Ok(()) => Ok(team.map_or(
                ToggleState {
                    active: !original.active,
                    count: original.count,
                },
                |t| toggle.read(t),
            )),
            Err(e) => {
                tracing::warn!(team_id, error = %e, "Toggle rejected, reverting");
                if let Some(team) = team {
                    toggle.write(team, original);
                }
                Err(e)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, SquareState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
