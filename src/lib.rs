//! Focus Timer - A state-managed HTTP server hosting a Pomodoro countdown
//! 
//! This library provides the countdown engine, its preset registry, the
//! background tasks that drive it and the HTTP API views use to control it.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
