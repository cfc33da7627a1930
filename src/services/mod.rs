//! External collaborators module
//! 
//! This module contains the side effects the timer triggers outside the process,
//! such as alerting the user when a countdown expires.

pub mod notification;

// Re-export main types
pub use notification::*;
