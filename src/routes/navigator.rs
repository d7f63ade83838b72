// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use crate::error::{AppError, Result};
use crate::middleware::{GuardDecision, Notice, RouteGuard};
use crate::routes::{ResolvedRoute, RouteName, RouteTable};

/// Outcome of a navigation: where the user ended up and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub destination: ResolvedRoute,
    /// The route originally asked for, when the guard redirected
    pub redirected_from: Option<RouteName>,
    pub notice: Option<Notice>,
}

impl Navigation {
    pub fn was_redirected(&self) -> bool {
        self.redirected_from.is_some()
    }
}

pub struct Navigator {
    table: RouteTable,
    guard: RouteGuard,
}

impl Navigator {
    pub fn new(table: RouteTable, guard: RouteGuard) -> Self {
        Self { table, guard }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Resolve `path`, run the guard and report the final destination.
    ///
    /// Redirect targets (home, login) are entered without a second guard
    /// pass; neither can itself redirect in the state that sent the user
    /// there.
    pub fn navigate(&self, path: &str) -> Result<Navigation> {
        let requested = self
            .table
            .resolve(path)
            .ok_or_else(|| AppError::NotFound(format!("No route for {}", path)))?;

        match self.guard.evaluate(&requested) {
            GuardDecision::Allow => Ok(Navigation {
                destination: requested,
                redirected_from: None,
                notice: None,
            }),
            GuardDecision::Redirect { to, notice } => {
                let destination = self
                    .table
                    .path_of(to)
                    .and_then(|target| self.table.resolve(target))
                    .ok_or_else(|| AppError::NotFound(format!("No route named {}", to)))?;
                Ok(Navigation {
                    destination,
                    redirected_from: Some(requested.name),
                    notice,
                })
            }
        }
    }
}
