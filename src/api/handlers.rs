//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use chrono::Utc;
use futures::stream::{self, Stream, StreamExt};
use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, warn};

use crate::{
    state::{presets, AppState, TimerState},
    utils::time::{format_completed_at, format_relative_time},
};
use super::responses::{
    ApiResponse, DurationRequest, HealthResponse, PresetsResponse, StatusResponse, TimerView,
};

/// Turn the outcome of a timer command into an HTTP response
fn command_response(
    result: Result<TimerState, String>,
    action: &str,
) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok(timer) => {
            info!("{} endpoint called - timer {} at {}", action, timer.status.as_str(), timer.display());
            let message = format!("Timer {} ({} {})", timer.status.as_str(), timer.label, timer.display());
            Ok(Json(ApiResponse::new(message, timer)))
        }
        Err(e) => {
            error!("Failed to {} timer: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /timer - Return the current timer snapshot
pub async fn timer_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerView>, StatusCode> {
    match state.get_timer_state() {
        Ok(timer) => Ok(Json(timer.into())),
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timer/start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    command_response(state.start(), "start")
}

/// Handle POST /timer/pause - Pause a running countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    command_response(state.pause(), "pause")
}

/// Handle POST /timer/reset - Stop and rewind to the full duration
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    command_response(state.reset(), "reset")
}

/// Handle POST /timer/duration - Change the duration, ignored while running
pub async fn duration_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DurationRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    command_response(state.set_duration(request.minutes), "set duration of")
}

/// Handle POST /timer/custom - Load a user-entered duration under the custom label
pub async fn custom_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DurationRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    command_response(state.apply_custom(request.minutes), "apply custom duration to")
}

/// Handle POST /timer/preset/:id - Load a preset from the registry
pub async fn preset_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let Some(preset) = presets::find(&id) else {
        warn!("Unknown preset requested: {}", id);
        return Err(StatusCode::NOT_FOUND);
    };
    command_response(state.apply_preset(preset), "apply preset to")
}

/// Handle GET /presets - List the available presets
pub async fn presets_handler() -> Json<PresetsResponse> {
    Json(PresetsResponse { presets: presets::PRESETS })
}

/// Handle GET /events - Stream timer snapshots and refresh pulses
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, serde_json::Error>>> {
    let mut timer_rx = state.subscribe_timer();
    let refresh_rx = state.subscribe_refresh();
    debug!("Event stream subscriber connected");

    let current = timer_rx.borrow_and_update().clone();
    let updates = stream::unfold((timer_rx, refresh_rx), |(mut timer_rx, mut refresh_rx)| async move {
        next_event(&mut timer_rx, &mut refresh_rx)
            .await
            .map(|event| (event, (timer_rx, refresh_rx)))
    });

    Sse::new(stream::once(async move { timer_event(current) }).chain(updates))
        .keep_alive(KeepAlive::default())
}

fn timer_event(timer: TimerState) -> Result<Event, serde_json::Error> {
    let data = serde_json::to_string(&TimerView::from(timer))?;
    Ok(Event::default().event("timer").data(data))
}

/// Wait for the next snapshot or refresh pulse; `None` once either channel closes
async fn next_event(
    timer_rx: &mut watch::Receiver<TimerState>,
    refresh_rx: &mut broadcast::Receiver<u64>,
) -> Option<Result<Event, serde_json::Error>> {
    loop {
        tokio::select! {
            changed = timer_rx.changed() => {
                changed.ok()?;
                let timer = timer_rx.borrow_and_update().clone();
                return Some(timer_event(timer));
            }
            pulse = refresh_rx.recv() => match pulse {
                Ok(pulse) => {
                    return Some(Ok(Event::default().event("refresh").data(pulse.to_string())));
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!("Event stream skipped {} refresh pulses", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Handle GET /status - Return timer and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.get_timer_state() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();
    let now = Utc::now();

    Ok(Json(StatusResponse {
        timer: timer.into(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
        last_action_ago: last_action_time.map(|t| format_relative_time(t, now)),
        last_completed: state.get_last_completed().map(format_completed_at),
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
