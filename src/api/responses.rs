//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{Preset, TimerState};

/// Timer snapshot with the values views render directly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerView {
    #[serde(flatten)]
    pub state: TimerState,
    /// Remaining time as `MM:SS`
    pub display: String,
    /// Elapsed fraction for the progress ring
    pub progress: f64,
}

impl From<TimerState> for TimerView {
    fn from(state: TimerState) -> Self {
        Self {
            display: state.display(),
            progress: state.progress(),
            state,
        }
    }
}

/// API response structure for timer command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl ApiResponse {
    /// Create a response reporting the timer's status after a command
    pub fn new(message: String, timer: TimerState) -> Self {
        Self {
            status: timer.status.as_str().to_string(),
            message,
            timestamp: Utc::now(),
            timer: timer.into(),
        }
    }
}

/// Body for endpoints that take a duration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationRequest {
    pub minutes: i64,
}

/// Preset listing
#[derive(Debug, Clone, Serialize)]
pub struct PresetsResponse {
    pub presets: &'static [Preset],
}

/// Status response with timer and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerView,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
    /// Relative form of `last_action_time`, e.g. `3m ago`
    pub last_action_ago: Option<String>,
    pub last_completed: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
