// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - API access and client-side state.

pub mod admin;
pub mod api;
pub mod auth;
pub mod notifications;
pub mod pokemon;
pub mod session;
pub mod square;
pub mod teams;

pub use admin::AdminService;
pub use api::{ApiClient, ApiRequest, BearerAuth, RequestDecorator, ResponseObserver, TracingObserver};
pub use auth::AuthService;
pub use notifications::NotificationService;
pub use pokemon::PokemonService;
pub use session::SessionStore;
pub use square::{SquarePagination, TeamSquare, ToggleState};
pub use teams::TeamService;
