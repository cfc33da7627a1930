//! Timer state structure and derived display values

use serde::{Deserialize, Serialize};

/// Shortest duration a timer may be set to, in minutes
pub const MIN_MINUTES: i64 = 1;
/// Longest duration a timer may be set to, in minutes
pub const MAX_MINUTES: i64 = 60;

/// Lifecycle status of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    Expired,
}

impl TimerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Idle => "idle",
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
            TimerStatus::Expired => "expired",
        }
    }
}

/// Snapshot of the countdown as seen by views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub total_duration_seconds: u32,
    pub remaining_seconds: u32,
    pub status: TimerStatus,
    pub label: String,
}

impl TimerState {
    /// Create an idle timer with a full countdown of `minutes`
    pub fn new(minutes: i64, label: impl Into<String>) -> Self {
        let total = clamp_minutes(minutes) * 60;
        Self {
            total_duration_seconds: total,
            remaining_seconds: total,
            status: TimerStatus::Idle,
            label: label.into(),
        }
    }

    /// Check if the countdown is currently running
    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    /// Remaining time formatted as `MM:SS`
    pub fn display(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_seconds / 60,
            self.remaining_seconds % 60
        )
    }

    /// Fraction of the countdown already elapsed, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.total_duration_seconds == 0 {
            return 0.0;
        }
        1.0 - f64::from(self.remaining_seconds) / f64::from(self.total_duration_seconds)
    }
}

/// Clamp a requested duration into the supported range and return whole minutes
pub fn clamp_minutes(minutes: i64) -> u32 {
    // Range is 1..=60, the cast cannot truncate.
    minutes.clamp(MIN_MINUTES, MAX_MINUTES) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_pads_minutes_and_seconds() {
        let mut state = TimerState::new(5, "Break");
        assert_eq!(state.display(), "05:00");

        state.remaining_seconds = 61;
        assert_eq!(state.display(), "01:01");

        state.remaining_seconds = 0;
        assert_eq!(state.display(), "00:00");
    }

    #[test]
    fn display_shows_full_hour() {
        assert_eq!(TimerState::new(60, "Focus").display(), "60:00");
    }

    #[test]
    fn progress_tracks_elapsed_fraction() {
        let mut state = TimerState::new(1, "Focus");
        assert_eq!(state.progress(), 0.0);

        state.remaining_seconds = 15;
        assert!((state.progress() - 0.75).abs() < f64::EPSILON);

        state.remaining_seconds = 0;
        assert_eq!(state.progress(), 1.0);
    }

    #[test]
    fn clamp_minutes_respects_bounds() {
        assert_eq!(clamp_minutes(-10), 1);
        assert_eq!(clamp_minutes(0), 1);
        assert_eq!(clamp_minutes(30), 30);
        assert_eq!(clamp_minutes(90), 60);
        assert_eq!(clamp_minutes(i64::MAX), 60);
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&TimerStatus::Expired).unwrap();
        assert_eq!(json, "\"expired\"");
        assert_eq!(TimerStatus::Paused.as_str(), "paused");
    }
}
