// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated HTTP pipeline for the team builder API.
//!
//! Handles:
//! - Bearer credentials on outgoing requests (via [`RequestDecorator`]s)
//! - Response observation (via [`ResponseObserver`]s)
//! - Transparent token refresh on 401, single-flight across all callers
//! - Exactly one retry per original request
//!
//! Refresh state machine: `Idle` → `Refreshing(followers)` → `Idle`. The
//! first caller to see a 401 in `Idle` becomes the leader and performs the
//! refresh; callers arriving while `Refreshing` are queued and released in
//! enqueue order with the leader's outcome. The check-and-set happens under
//! a plain mutex that is never held across an `.await`.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::auth::RefreshRequest;
use crate::models::{Session, TokenResponse};
use crate::services::session::SessionStore;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;

// ─── Requests ────────────────────────────────────────────────────────────────

/// A request description that can be sent more than once.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base URL, starting with `/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Attach the bearer credential
    authenticated: bool,
    /// A 401 may trigger a token refresh
    refreshable: bool,
    /// Set on the single retry after a refresh
    retry: bool,
    /// Token to send instead of the session's current one
    bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            authenticated: true,
            refreshable: true,
            retry: false,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| AppError::Decode(format!("Failed to encode request body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Send without credentials and never refresh on 401 (login, register,
    /// refresh itself).
    pub fn anonymous(mut self) -> Self {
        self.authenticated = false;
        self.refreshable = false;
        self
    }

    /// Mark as the post-refresh retry. A 401 on a retry is final.
    pub fn into_retry(mut self, token: String) -> Self {
        self.retry = true;
        self.bearer = Some(token);
        self
    }

    pub fn is_retry(&self) -> bool {
        self.retry
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// The credential this request carries, if pinned.
    pub fn bearer(&self) -> Option<&str> {
        self.bearer.as_deref()
    }
}

// ─── Interceptors ────────────────────────────────────────────────────────────

/// Runs before a request is sent, in registration order.
pub trait RequestDecorator: Send + Sync {
    fn decorate(&self, request: &ApiRequest, builder: RequestBuilder) -> RequestBuilder;
}

/// Runs after a response (or transport failure) is received, in
/// registration order. `status` is `None` for transport failures.
pub trait ResponseObserver: Send + Sync {
    fn observe(&self, request: &ApiRequest, status: Option<StatusCode>, elapsed: Duration);
}

/// Adds `Authorization: Bearer <token>` to authenticated requests.
///
/// Uses the token pinned on the request when present (retries), otherwise
/// the session's current token.
pub struct BearerAuth {
    session: Arc<SessionStore>,
}

impl BearerAuth {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }
}

impl RequestDecorator for BearerAuth {
    fn decorate(&self, request: &ApiRequest, builder: RequestBuilder) -> RequestBuilder {
        if !request.is_authenticated() {
            return builder;
        }
        match request
            .bearer()
            .map(str::to_string)
            .or_else(|| self.session.access_token())
        {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// Structured request logging.
pub struct TracingObserver;

impl ResponseObserver for TracingObserver {
    fn observe(&self, request: &ApiRequest, status: Option<StatusCode>, elapsed: Duration) {
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        match status {
            Some(status) if status.is_server_error() => tracing::warn!(
                method = %request.method,
                path = %request.path,
                status = status.as_u16(),
                elapsed_ms,
                retry = request.is_retry(),
                "API request failed"
            ),
            Some(status) => tracing::debug!(
                method = %request.method,
                path = %request.path,
                status = status.as_u16(),
                elapsed_ms,
                retry = request.is_retry(),
                "API request completed"
            ),
            None => tracing::warn!(
                method = %request.method,
                path = %request.path,
                elapsed_ms,
                "API request did not complete"
            ),
        }
    }
}

// ─── Refresh coordination ────────────────────────────────────────────────────

type RefreshOutcome = Result<String>;

enum RefreshState {
    Idle,
    Refreshing(Vec<oneshot::Sender<RefreshOutcome>>),
}

/// Single-flight guard around the refresh call.
struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

enum Role {
    Leader,
    Follower(oneshot::Receiver<RefreshOutcome>),
    /// The session already carries a newer token than the one rejected.
    AlreadyRotated(String),
}

impl RefreshCoordinator {
    fn new() -> Self {
        Self {
            state: Mutex::new(RefreshState::Idle),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Decide this caller's role. `rejected` is the token that drew the 401,
    /// or `None` for an explicit refresh.
    fn join(&self, session: &SessionStore, rejected: Option<&str>) -> Role {
        let mut state = self.lock();
        match &mut *state {
            RefreshState::Refreshing(followers) => {
                let (tx, rx) = oneshot::channel();
                followers.push(tx);
                Role::Follower(rx)
            }
            RefreshState::Idle => {
                if let (Some(rejected), Some(current)) = (rejected, session.access_token()) {
                    if rejected != current {
                        return Role::AlreadyRotated(current);
                    }
                }
                *state = RefreshState::Refreshing(Vec::new());
                Role::Leader
            }
        }
    }

    /// Return to `Idle` and hand the outcome to every follower, oldest first.
    fn settle(&self, outcome: &RefreshOutcome) {
        let followers = match std::mem::replace(&mut *self.lock(), RefreshState::Idle) {
            RefreshState::Refreshing(followers) => followers,
            RefreshState::Idle => Vec::new(),
        };
        if !followers.is_empty() {
            tracing::debug!(count = followers.len(), "Releasing queued requests");
        }
        for follower in followers {
            // A follower that gave up waiting has dropped its receiver.
            let _ = follower.send(outcome.clone());
        }
    }
}

/// Held by the leader for the duration of the refresh call. If the leader's
/// future is dropped before settling, followers are released with an error
/// and the machine returns to `Idle`.
struct LeaderGuard<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl LeaderGuard<'_> {
    fn settle(mut self, outcome: &RefreshOutcome) {
        self.settled = true;
        self.coordinator.settle(outcome);
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.coordinator.settle(&Err(AppError::Network(
                "Token refresh was abandoned".to_string(),
            )));
        }
    }
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// HTTP client for the team builder API with transparent token refresh.
///
/// Cheap to clone; clones share the session and the refresh state.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
    decorators: Arc<Vec<Arc<dyn RequestDecorator>>>,
    observers: Arc<Vec<Arc<dyn ResponseObserver>>>,
    refresh: Arc<RefreshCoordinator>,
}

impl ApiClient {
    /// Create a client with the default interceptors: bearer auth and
    /// tracing.
    pub fn new(config: &Config, session: Arc<SessionStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AppError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            decorators: Arc::new(vec![Arc::new(BearerAuth::new(session.clone()))]),
            observers: Arc::new(vec![Arc::new(TracingObserver)]),
            session,
            refresh: Arc::new(RefreshCoordinator::new()),
        })
    }

    /// Append a request decorator; it runs after those already registered.
    pub fn with_decorator(mut self, decorator: Arc<dyn RequestDecorator>) -> Self {
        Arc::make_mut(&mut self.decorators).push(decorator);
        self
    }

    /// Append a response observer; it runs after those already registered.
    pub fn with_observer(mut self, observer: Arc<dyn ResponseObserver>) -> Self {
        Arc::make_mut(&mut self.observers).push(observer);
        self
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request and decode the JSON response.
    ///
    /// A 401 on a refreshable, non-retry request refreshes the session (or
    /// waits on the in-flight refresh) and retries once with the new token.
    /// If the refresh fails the session is torn down and the refresh error is
    /// returned instead of the 401.
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let body = self.execute_raw(request).await?;
        parse_body(&body)
    }

    /// Like [`execute`](Self::execute) but discards the response body.
    pub async fn execute_unit(&self, request: ApiRequest) -> Result<()> {
        self.execute_raw(request).await.map(|_| ())
    }

    async fn execute_raw(&self, mut request: ApiRequest) -> Result<String> {
        if request.authenticated && request.bearer.is_none() {
            request.bearer = self.session.access_token();
        }

        match self.send_once(&request).await {
            Err(err) if err.is_unauthorized() && request.refreshable && !request.retry => {
                tracing::debug!(path = %request.path, "Unauthorized, refreshing access token");
                let token = self.refresh_access_token(request.bearer.as_deref()).await?;
                let retry = request.into_retry(token);
                self.send_once(&retry).await
            }
            other => other,
        }
    }

    /// Refresh the session explicitly, joining an in-flight refresh if there
    /// is one.
    pub async fn refresh(&self) -> Result<Session> {
        self.refresh_access_token(None).await?;
        Ok(self.session.snapshot())
    }

    async fn refresh_access_token(&self, rejected: Option<&str>) -> Result<String> {
        match self.refresh.join(&self.session, rejected) {
            Role::AlreadyRotated(token) => {
                tracing::debug!("Token already rotated, retrying without refresh");
                Ok(token)
            }
            Role::Follower(rx) => {
                tracing::debug!("Refresh in flight, waiting on leader");
                rx.await.unwrap_or_else(|_| {
                    Err(AppError::Network("Token refresh was abandoned".to_string()))
                })
            }
            Role::Leader => {
                let guard = LeaderGuard {
                    coordinator: &self.refresh,
                    settled: false,
                };
                let outcome = self.perform_refresh().await;
                guard.settle(&outcome);
                outcome
            }
        }
    }

    /// The leader's half: call `/auth/refresh`, rotate or tear down.
    async fn perform_refresh(&self) -> Result<String> {
        let Some(refresh_token) = self.session.refresh_token() else {
            tracing::warn!("No refresh token available, logging out");
            self.session.logout();
            return Err(AppError::Auth(AppError::NO_REFRESH_TOKEN.to_string()));
        };

        tracing::info!("Refreshing access token");
        let request = ApiRequest::post("/auth/refresh")
            .anonymous()
            .json(&RefreshRequest {
                refresh_token: &refresh_token,
            })?;

        let result = self.send_once(&request).await.and_then(|body| {
            let tokens = parse_body::<TokenResponse>(&body)?;
            self.session.rotate(&tokens)?;
            Ok(tokens)
        });

        match result {
            Ok(tokens) => {
                tracing::info!(expires_in = tokens.expires_in, "Access token refreshed");
                Ok(tokens.access_token)
            }
            Err(e) => {
                let err = match e {
                    AppError::Unauthorized(msg)
                    | AppError::Validation(msg)
                    | AppError::Permission(msg)
                    | AppError::NotFound(msg) => AppError::Auth(msg),
                    other => other,
                };
                tracing::warn!(error = %err, "Token refresh failed, forcing logout");
                self.session.logout();
                Err(err)
            }
        }
    }

    /// One HTTP round trip, no refresh handling. Returns the body text of a
    /// successful response.
    async fn send_once(&self, request: &ApiRequest) -> Result<String> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.http.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        for decorator in self.decorators.iter() {
            builder = decorator.decorate(request, builder);
        }

        let started = Instant::now();
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                self.notify(request, None, started.elapsed());
                return Err(e.into());
            }
        };

        let status = response.status();
        self.notify(request, Some(status), started.elapsed());

        let body = response.text().await?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(AppError::from_response(status, &body))
        }
    }

    fn notify(&self, request: &ApiRequest, status: Option<StatusCode>, elapsed: Duration) {
        for observer in self.observers.iter() {
            observer.observe(request, status, elapsed);
        }
    }
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    let text = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(text).map_err(|e| AppError::Decode(format!("JSON parse error: {}", e)))
}

/// Percent-encode one path segment.
pub(crate) fn segment(raw: impl ToString) -> String {
    urlencoding::encode(&raw.to_string()).into_owned()
}
