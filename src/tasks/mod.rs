//! Background tasks module
//! 
//! This module contains background tasks that run alongside the HTTP server.

pub mod scheduler_loop;
pub mod settings_watch;

// Re-export main functions
pub use scheduler_loop::{scheduler_task, spawn_scheduler, SchedulerHandle};
pub use settings_watch::settings_watch_task;
