//! REST endpoints for running intake sessions over HTTP.
//!
//! Each `POST /api/intake/sessions` creates an independent session. Turns on
//! one session are serialized by that session's mutex. Sessions nobody has
//! touched for `idle_timeout` are dropped, lazily on access and by
//! [`spawn_pruner`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use uuid::Uuid;

use super::manager::IntakeManager;
use super::session::Session;

/// Default idle time before an HTTP session is dropped.
pub const DEFAULT_SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(3600);

/// A stored session and when it last saw a turn.
#[derive(Debug)]
pub struct SessionSlot {
    pub session: Session,
    last_active: Instant,
}

impl SessionSlot {
    fn new(session: Session) -> Self {
        Self {
            session,
            last_active: Instant::now(),
        }
    }

    fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    fn is_idle(&self, timeout: Duration) -> bool {
        self.last_active.elapsed() >= timeout
    }
}

/// Live sessions, keyed by id. Nothing is persisted.
pub type SessionStore = Arc<RwLock<HashMap<Uuid, Arc<Mutex<SessionSlot>>>>>;

/// Shared state for intake routes.
#[derive(Clone)]
pub struct IntakeRouteState {
    pub manager: Arc<IntakeManager>,
    pub sessions: SessionStore,
    pub idle_timeout: Duration,
}

impl IntakeRouteState {
    pub fn new(manager: Arc<IntakeManager>) -> Self {
        Self {
            manager,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout: DEFAULT_SESSION_IDLE_TIMEOUT,
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Fetch a live session. An idle one is removed and reported missing.
    async fn lookup(&self, id: Uuid) -> Option<Arc<Mutex<SessionSlot>>> {
        let slot = self.sessions.read().await.get(&id).cloned()?;
        if slot.lock().await.is_idle(self.idle_timeout) {
            self.sessions.write().await.remove(&id);
            tracing::info!(session_id = %id, "Idle intake session expired");
            return None;
        }
        Some(slot)
    }

    /// Drop every idle session. Sessions mid-turn are kept.
    ///
    /// Returns how many were removed.
    pub async fn prune_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, slot| match slot.try_lock() {
            Ok(slot) => !slot.is_idle(self.idle_timeout),
            Err(_) => true,
        });
        let removed = before - sessions.len();
        if removed > 0 {
            tracing::info!(removed, remaining = sessions.len(), "Pruned idle intake sessions");
        }
        removed
    }
}

/// Spawn a background task that prunes idle sessions every `every`.
pub fn spawn_pruner(state: IntakeRouteState, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.tick().await; // first tick fires immediately
        loop {
            interval.tick().await;
            state.prune_idle().await;
        }
    })
}

#[derive(Debug, Deserialize)]
struct SubmitRequest {
    #[serde(default)]
    text: String,
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// POST /api/intake/sessions
///
/// Starts a session and returns the greeting.
async fn create_session(State(state): State<IntakeRouteState>) -> impl IntoResponse {
    state.prune_idle().await;
    let outcome = state.manager.start_session().await;
    let id = outcome.session.id;
    state
        .sessions
        .write()
        .await
        .insert(id, Arc::new(Mutex::new(SessionSlot::new(outcome.session))));

    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "session_id": id,
            "history": outcome.history,
            "input": outcome.cleared_input,
        })),
    )
}

/// POST /api/intake/sessions/{id}/messages
async fn submit_message(
    State(state): State<IntakeRouteState>,
    Path(id): Path<String>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> impl IntoResponse {
    let session_id = match Uuid::parse_str(&id) {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "Invalid session ID"})),
            );
        }
    };

    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            return (
                rejection.status(),
                Json(serde_json::json!({"error": rejection.body_text()})),
            );
        }
    };

    let Some(slot) = state.lookup(session_id).await else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Session not found"})),
        );
    };

    let mut slot = slot.lock().await;
    let outcome = state.manager.submit(slot.session.clone(), &body.text).await;
    slot.session = outcome.session;
    slot.touch();

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "session_id": session_id,
            "history": outcome.history,
            "step": slot.session.step,
            "input": outcome.cleared_input,
        })),
    )
}

/// GET /api/intake/sessions/{id}
///
/// Current step and collected data, without the transcript.
async fn get_session(
    State(state): State<IntakeRouteState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let session_id = match Uuid::parse_str(&id) {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "Invalid session ID"})),
            );
        }
    };

    match state.lookup(session_id).await {
        Some(slot) => {
            let slot = slot.lock().await;
            let session = &slot.session;
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "session_id": session.id,
                    "started_at": session.started_at,
                    "step": session.step,
                    "candidate": session.candidate,
                    "questions_asked": session.questions_asked,
                    "tech_responses": session.tech_responses,
                    "completed": session.is_complete(),
                })),
            )
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Session not found"})),
        ),
    }
}

/// DELETE /api/intake/sessions/{id}
async fn delete_session(
    State(state): State<IntakeRouteState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let session_id = match Uuid::parse_str(&id) {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "Invalid session ID"})),
            );
        }
    };

    if state.sessions.write().await.remove(&session_id).is_some() {
        tracing::info!(session_id = %session_id, "Intake session discarded");
        (
            StatusCode::OK,
            Json(serde_json::json!({"status": "deleted"})),
        )
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Session not found"})),
        )
    }
}

/// Build the intake REST routes.
pub fn intake_routes(state: IntakeRouteState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/intake/sessions", post(create_session))
        .route(
            "/api/intake/sessions/{id}",
            get(get_session).delete(delete_session),
        )
        .route("/api/intake/sessions/{id}/messages", post(submit_message))
        .with_state(state)
}
