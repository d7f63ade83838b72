// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Navigation guard.
//!
//! Evaluated before every navigation against the in-memory session only;
//! never makes a network call.

use crate::routes::{ResolvedRoute, RouteName};
use crate::services::session::SessionStore;
use std::fmt;
use std::sync::Arc;

/// User-facing notice attached to a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    PermissionDenied,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::PermissionDenied => f.write_str("You do not have permission to access this page"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect {
        to: RouteName,
        notice: Option<Notice>,
    },
}

pub struct RouteGuard {
    session: Arc<SessionStore>,
}

impl RouteGuard {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    /// Decide whether `route` may be entered. Rules are checked in order and
    /// the first match wins.
    pub fn evaluate(&self, route: &ResolvedRoute) -> GuardDecision {
        let authenticated = self.session.is_authenticated();

        let decision = if matches!(route.name, RouteName::Login | RouteName::Register)
            && authenticated
        {
            GuardDecision::Redirect {
                to: RouteName::Home,
                notice: None,
            }
        } else if route.meta.requires_auth && !authenticated {
            GuardDecision::Redirect {
                to: RouteName::Login,
                notice: None,
            }
        } else if route.meta.requires_admin && !(authenticated && self.session.is_admin()) {
            GuardDecision::Redirect {
                to: RouteName::Home,
                notice: Some(Notice::PermissionDenied),
            }
        } else {
            GuardDecision::Allow
        };

        if let GuardDecision::Redirect { to, notice } = decision {
            tracing::info!(
                from = %route.name,
                to = %to,
                permission_denied = notice.is_some(),
                "Navigation redirected"
            );
        }
        decision
    }
}
