//! Background tasks module
//! 
//! This module contains background tasks that run alongside the HTTP server.

pub mod countdown;
pub mod live_ticker;

// Re-export main functions
pub use countdown::countdown_task;
pub use live_ticker::live_ticker_task;
