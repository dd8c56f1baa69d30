//! State management module
//! 
//! This module contains the scheduler's own state, the snapshot it publishes,
//! and the state shared with the HTTP API.

pub mod scheduler_state;
pub mod status;
pub mod app_state;

// Re-export main types
pub use scheduler_state::{CountdownHandles, CycleStats, PendingPrompt, Phase, SchedulerState};
pub use status::SchedulerStatus;
pub use app_state::AppState;
