//! State management module
//! 
//! This module contains the countdown engine, its preset registry and the
//! shared application state that drives it.

pub mod app_state;
pub mod engine;
pub mod presets;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use engine::{Tick, TimerEngine};
pub use presets::Preset;
pub use timer_state::{TimerState, TimerStatus};
