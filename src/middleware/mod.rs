// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (navigation guard).

pub mod guard;

pub use guard::{GuardDecision, Notice, RouteGuard};
