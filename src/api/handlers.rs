//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream, StreamExt};
use tracing::{error, info, warn};

use crate::state::{AppState, Mode, SettingsUpdate, TimerSnapshot};
use super::responses::{ApiResponse, HealthResponse, StatusResponse};

fn respond(
    result: Result<TimerSnapshot, String>,
    action: &str,
    message: &str,
) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok(snapshot) => {
            info!("{} endpoint called - {} {}", action, snapshot.mode, snapshot.display);
            Ok(Json(ApiResponse::from_snapshot(message.to_string(), snapshot)))
        }
        Err(e) => {
            error!("Failed to {}: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /toggle - Start or pause the countdown
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let result = state.toggle();
    let message = match &result {
        Ok(snapshot) if snapshot.running => "Timer started",
        _ => "Timer paused",
    };
    respond(result, "toggle", message)
}

/// Handle POST /reset - Rewind the current interval
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond(state.reset(), "reset", "Timer reset")
}

/// Handle POST /mode/:mode - Switch to focus or break
pub async fn mode_handler(
    State(state): State<Arc<AppState>>,
    Path(mode): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let mode: Mode = match mode.parse() {
        Ok(mode) => mode,
        Err(e) => {
            warn!("{}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let message = match mode {
        Mode::Focus => "Switched to focus",
        Mode::Break => "Switched to break",
    };
    respond(state.switch_mode(mode), "switch mode", message)
}

/// Handle PATCH /settings - Edit one or more settings
pub async fn settings_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<ApiResponse>, StatusCode> {
    respond(state.update_settings(&update), "update settings", "Settings updated")
}

/// Handle POST /settings/reset - Restore default settings
pub async fn settings_reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond(state.reset_settings(), "reset settings", "Settings restored to defaults")
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.snapshot() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let ticking = match state.is_ticking() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get tick source state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let notification_permission = match state.notification_permission() {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to get notification permission: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        ticking,
        notification_permission,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

fn snapshot_event(snapshot: &TimerSnapshot) -> Event {
    Event::default()
        .event("timer")
        .json_data(snapshot)
        .unwrap_or_else(|e| Event::default().event("error").data(e.to_string()))
}

/// Handle GET /events - Stream timer snapshots as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.subscribe();
    let initial = snapshot_event(&rx.borrow_and_update());

    let updates = stream::unfold(rx, |mut rx| async move {
        rx.changed().await.ok()?;
        let event = snapshot_event(&rx.borrow_and_update());
        Some((Ok(event), rx))
    });

    Sse::new(stream::once(async move { Ok(initial) }).chain(updates))
        .keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
