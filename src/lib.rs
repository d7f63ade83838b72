// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! pmteam-client: authenticated API client for the Pokémon team builder
//!
//! This crate owns the user's session, sends every API call through a
//! pipeline that transparently refreshes expired access tokens (one refresh
//! at a time, however many requests hit a 401), and guards navigation
//! between screens based on the session's claims.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;
pub mod time_utils;

use config::Config;
use error::Result;
use middleware::RouteGuard;
use routes::{Navigator, RouteTable};
use services::{
    AdminService, ApiClient, AuthService, NotificationService, PokemonService, SessionStore,
    TeamService, TeamSquare,
};
use std::sync::Arc;
use storage::KeyValueStore;
use time_utils::Clock;

/// Shared application state: one session and everything built on it.
pub struct AppState {
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub api: ApiClient,
    pub auth: AuthService,
    pub teams: TeamService,
    pub square: TeamSquare,
    pub pokemon: PokemonService,
    pub notifications: NotificationService,
    pub admin: AdminService,
    pub navigator: Navigator,
}

impl AppState {
    /// Rehydrate the session from `storage` and wire up the services.
    pub fn new(config: Config, storage: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Result<Self> {
        let session = Arc::new(SessionStore::rehydrate(storage, clock));
        let api = ApiClient::new(&config, session.clone())?;
        let teams = TeamService::new(api.clone());

        Ok(Self {
            auth: AuthService::new(api.clone()),
            square: TeamSquare::new(teams.clone(), session.clone()),
            teams,
            pokemon: PokemonService::new(api.clone()),
            notifications: NotificationService::new(api.clone()),
            admin: AdminService::new(api.clone()),
            navigator: Navigator::new(RouteTable::default(), RouteGuard::new(session.clone())),
            api,
            session,
            config,
        })
    }
}
