//! Collaborators the scheduler runs against inside the daemon
//! 
//! This module contains the notice board that stands in for the editor's
//! notification UI and the tokio-backed timer driver.

pub mod notice_board;
pub mod tokio_timers;

// Re-export main types
pub use notice_board::{NoticeBoard, NoticeLevel, NoticeSnapshot};
pub use tokio_timers::TokioTimers;
