//! Notification surface seam
//!
//! The surface is presentation only: it never decides anything and never
//! calls back into the scheduler. User responses (prompt answers, progress
//! cancellation) reach the scheduler as events.

use std::{fmt, time::Duration};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::handles::{ProgressId, PromptId, StatusHandle};

/// Actions offered on the reminder prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReminderAction {
    StartBreak,
    Skip,
}

impl ReminderAction {
    pub const ALL: [ReminderAction; 2] = [ReminderAction::StartBreak, ReminderAction::Skip];

    pub fn label(&self) -> &'static str {
        match self {
            ReminderAction::StartBreak => "Start Break",
            ReminderAction::Skip => "Skip",
        }
    }
}

impl fmt::Display for ReminderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How long a status-bar text stays visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLifetime {
    /// Until the handle is disposed
    Persistent,
    /// Until the duration elapses or the handle is disposed
    Transient(Duration),
}

pub trait NotificationSurface {
    /// Show a warning offering `actions`. The answer arrives later as
    /// `Event::ReminderAnswered` tagged with the returned id, at most once.
    fn show_warning(&mut self, text: &str, actions: &[ReminderAction]) -> PromptId;

    /// Withdraw a warning that no longer needs an answer
    fn retract_warning(&mut self, prompt: PromptId);

    fn show_info(&mut self, text: &str);

    fn set_status_text(&mut self, text: &str, lifetime: StatusLifetime) -> StatusHandle;

    fn dispose_status(&mut self, handle: StatusHandle);

    /// Open a cancellable progress session. Cancelling it sets `token` and
    /// delivers `Event::ProgressCancelled` with the returned id.
    fn begin_progress(&mut self, title: &str, token: CancellationToken) -> ProgressId;

    fn report_progress(&mut self, progress: ProgressId, increment: f64, message: &str);

    fn resolve_progress(&mut self, progress: ProgressId);
}
