//! Look Away - a daemon that reminds you to rest your eyes
//! 
//! At a fixed interval the scheduler shows a reminder; starting the break runs
//! a cancellable countdown, after which the next reminder is scheduled. The
//! reminder can be skipped and scheduling paused or resumed over HTTP.

pub mod config;
pub mod settings;
pub mod scheduler;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use scheduler::{Event, Scheduler};
pub use settings::{Settings, SharedSettings};
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
