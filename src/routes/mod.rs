// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Screen routes of the team builder front end.
//!
//! A declarative table of `path → view` entries carrying `requires_auth` /
//! `requires_admin` flags. Child routes inherit their parent's flags.

pub mod navigator;

pub use navigator::{Navigation, Navigator};

use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    Home,
    Login,
    Register,
    VerifyEmail,
    Profile,
    MyTeams,
    Favorites,
    Admin,
    TeamReview,
    Reports,
    SensitiveWords,
    TeamBuilder,
    TeamBuilderEdit,
    TeamView,
    TeamShare,
    TeamSquare,
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Access requirements of a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub requires_admin: bool,
}

impl RouteMeta {
    pub const PUBLIC: Self = Self {
        requires_auth: false,
        requires_admin: false,
    };
    pub const AUTH: Self = Self {
        requires_auth: true,
        requires_admin: false,
    };
    pub const ADMIN: Self = Self {
        requires_auth: true,
        requires_admin: true,
    };

    fn inherit(self, parent: Self) -> Self {
        Self {
            requires_auth: self.requires_auth || parent.requires_auth,
            requires_admin: self.requires_admin || parent.requires_admin,
        }
    }
}

/// One table entry. Child paths are relative to the parent.
#[derive(Debug, Clone)]
pub struct Route {
    pub name: RouteName,
    pub path: &'static str,
    pub meta: RouteMeta,
    pub children: Vec<Route>,
}

impl Route {
    pub fn new(name: RouteName, path: &'static str, meta: RouteMeta) -> Self {
        Self {
            name,
            path,
            meta,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Route>) -> Self {
        self.children = children;
        self
    }
}

/// A path matched against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub name: RouteName,
    /// Normalised path: no query string, no trailing slash
    pub path: String,
    pub params: BTreeMap<String, String>,
    /// Effective flags, including those inherited from parents
    pub meta: RouteMeta,
}

/// Flattened entry: full pattern split into segments plus effective flags.
#[derive(Debug, Clone)]
struct Entry {
    name: RouteName,
    pattern: String,
    segments: Vec<String>,
    meta: RouteMeta,
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<Entry>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        let mut entries = Vec::new();
        for route in routes {
            flatten(route, "", RouteMeta::PUBLIC, &mut entries);
        }
        Self { entries }
    }

    /// Match a path. Query string, fragment and trailing slash are ignored.
    pub fn resolve(&self, path: &str) -> Option<ResolvedRoute> {
        let path = normalize_path(path);
        let segments = split(&path);

        self.entries.iter().find_map(|entry| {
            if entry.segments.len() != segments.len() {
                return None;
            }
            let mut params = BTreeMap::new();
            for (pattern, actual) in entry.segments.iter().zip(&segments) {
                match pattern.strip_prefix(':') {
                    Some(param) => {
                        params.insert(param.to_string(), (*actual).to_string());
                    }
                    None if pattern == actual => {}
                    None => return None,
                }
            }
            Some(ResolvedRoute {
                name: entry.name,
                path: path.clone(),
                params,
                meta: entry.meta,
            })
        })
    }

    /// Full path pattern of a named route.
    pub fn path_of(&self, name: RouteName) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.pattern.as_str())
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(default_routes())
    }
}

/// The team builder's screens.
pub fn default_routes() -> Vec<Route> {
    use RouteName::*;

    vec![
        Route::new(Home, "/", RouteMeta::PUBLIC),
        Route::new(Login, "/login", RouteMeta::PUBLIC),
        Route::new(Register, "/register", RouteMeta::PUBLIC),
        Route::new(VerifyEmail, "/verify-email/:token", RouteMeta::PUBLIC),
        Route::new(Profile, "/profile", RouteMeta::AUTH),
        Route::new(MyTeams, "/my-teams", RouteMeta::AUTH),
        Route::new(Favorites, "/favorites", RouteMeta::AUTH),
        Route::new(Admin, "/admin", RouteMeta::ADMIN).with_children(vec![
            Route::new(TeamReview, "review", RouteMeta::PUBLIC),
            Route::new(Reports, "reports", RouteMeta::PUBLIC),
            Route::new(SensitiveWords, "sensitive-words", RouteMeta::PUBLIC),
        ]),
        Route::new(TeamBuilder, "/team-builder", RouteMeta::AUTH),
        Route::new(TeamBuilderEdit, "/team-builder/:teamId", RouteMeta::AUTH),
        Route::new(TeamView, "/teams/:teamId", RouteMeta::PUBLIC),
        Route::new(TeamShare, "/team/share/:token", RouteMeta::PUBLIC),
        Route::new(TeamSquare, "/square", RouteMeta::PUBLIC),
    ]
}

fn flatten(route: Route, parent_path: &str, parent_meta: RouteMeta, out: &mut Vec<Entry>) {
    let pattern = if route.path.starts_with('/') {
        normalize_path(route.path)
    } else {
        normalize_path(&format!("{}/{}", parent_path.trim_end_matches('/'), route.path))
    };
    let meta = route.meta.inherit(parent_meta);

    out.push(Entry {
        name: route.name,
        segments: split(&pattern).into_iter().map(str::to_string).collect(),
        pattern: pattern.clone(),
        meta,
    });
    for child in route.children {
        flatten(child, &pattern, meta, out);
    }
}

fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments = split(path);
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

fn split(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}
