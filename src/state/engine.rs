//! Countdown state machine
//!
//! The engine knows nothing about clocks; something else calls [`TimerEngine::tick`]
//! once per elapsed second while the countdown is running.

use tracing::{debug, info};

use super::{
    presets::{self, Preset},
    timer_state::{clamp_minutes, TimerState, TimerStatus},
};
use crate::services::NotificationSink;

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The timer was not running, nothing changed
    Ignored,
    /// Still running with this many seconds left
    Counting(u32),
    /// The countdown just reached zero
    Expired,
}

/// Owns the timer state and applies view commands to it
pub struct TimerEngine {
    state: TimerState,
    sink: Box<dyn NotificationSink>,
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl TimerEngine {
    /// Create an idle engine loaded with the default preset
    pub fn new(sink: Box<dyn NotificationSink>) -> Self {
        let preset = presets::default_preset();
        Self {
            state: TimerState::new(i64::from(preset.minutes), preset.label),
            sink,
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn snapshot(&self) -> TimerState {
        self.state.clone()
    }

    pub fn status(&self) -> TimerStatus {
        self.state.status
    }

    /// Change the countdown length, refused while running
    pub fn set_duration(&mut self, minutes: i64) {
        if self.state.is_running() {
            debug!("Ignoring duration change to {}min while running", minutes);
            return;
        }
        self.load(minutes);
    }

    /// Load a duration and label, stopping any running countdown
    pub fn select_preset(&mut self, minutes: i64, label: &str) {
        if self.state.is_running() {
            info!("Preset selected while running, stopping countdown");
        }
        self.state.label = label.to_string();
        self.load(minutes);
    }

    /// Load an entry from the preset registry
    pub fn apply_preset(&mut self, preset: &Preset) {
        self.select_preset(i64::from(preset.minutes), preset.label);
    }

    pub fn start(&mut self) {
        if self.state.is_running() {
            return;
        }
        if self.state.remaining_seconds == 0 {
            self.state.remaining_seconds = self.state.total_duration_seconds;
        }
        self.state.status = TimerStatus::Running;
        info!("Timer started with {} remaining", self.state.display());
    }

    pub fn pause(&mut self) {
        if !self.state.is_running() {
            return;
        }
        self.state.status = TimerStatus::Paused;
        info!("Timer paused at {}", self.state.display());
    }

    pub fn reset(&mut self) {
        self.state.status = TimerStatus::Idle;
        self.state.remaining_seconds = self.state.total_duration_seconds;
        info!("Timer reset to {}", self.state.display());
    }

    /// Apply one elapsed second
    pub fn tick(&mut self) -> Tick {
        if !self.state.is_running() {
            return Tick::Ignored;
        }

        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        if self.state.remaining_seconds > 0 {
            return Tick::Counting(self.state.remaining_seconds);
        }

        self.state.status = TimerStatus::Expired;
        info!("Timer expired: {}", self.state.label);

        // Playback problems must never leak into the timer state.
        if let Err(e) = self.sink.notify_expired() {
            debug!("Ignoring notification failure: {}", e);
        }
        Tick::Expired
    }

    fn load(&mut self, minutes: i64) {
        let total = clamp_minutes(minutes) * 60;
        self.state.total_duration_seconds = total;
        self.state.remaining_seconds = total;
        self.state.status = TimerStatus::Idle;
        debug!("Timer loaded with {}s ({})", total, self.state.label);
    }
}
