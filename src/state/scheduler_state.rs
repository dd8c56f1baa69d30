//! Scheduler state structure and handle ownership

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scheduler::{ProgressSession, PromptId, StatusHandle, TimerHandle};

/// Observable phase of the reminder cycle, derived from which handles are live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing live; disabled, paused, or not yet scheduled
    Idle,
    /// Next-reminder timer armed
    Waiting,
    /// Reminder prompt displayed, waiting for an answer
    ReminderShown,
    /// Break countdown in progress
    Countdown,
    /// Deactivated; no further events are handled
    Terminated,
}

/// Everything one countdown owns. Created together, torn down together.
#[derive(Debug, Clone)]
pub struct CountdownHandles {
    pub tick: TimerHandle,
    pub safety: TimerHandle,
    pub status: StatusHandle,
    pub progress: ProgressSession,
    /// Length of this break, fixed when it started
    pub duration_seconds: u32,
}

/// Counters for the current process lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleStats {
    pub reminders_shown: u64,
    pub breaks_started: u64,
    pub breaks_completed: u64,
    pub breaks_skipped: u64,
    pub breaks_cancelled: u64,
}

/// A reminder prompt waiting for an answer, with the break length it offered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPrompt {
    pub id: PromptId,
    pub duration_seconds: u32,
}

/// Mutable scheduler state. Owned exclusively by one scheduler.
#[derive(Debug, Default)]
pub struct SchedulerState {
    pub paused: bool,
    pub showing_reminder: bool,
    pub remaining_seconds: u32,
    pub terminated: bool,
    pub next_reminder: Option<TimerHandle>,
    /// Wall-clock estimate of when the next reminder fires
    pub next_reminder_at: Option<DateTime<Utc>>,
    pub pending_prompt: Option<PendingPrompt>,
    pub countdown: Option<CountdownHandles>,
    pub stats: CycleStats,
}

impl SchedulerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        if self.terminated {
            Phase::Terminated
        } else if self.countdown.is_some() {
            Phase::Countdown
        } else if self.pending_prompt.is_some() {
            Phase::ReminderShown
        } else if self.next_reminder.is_some() {
            Phase::Waiting
        } else {
            Phase::Idle
        }
    }

    /// Number of timers this state currently holds
    pub fn live_timer_count(&self) -> usize {
        let countdown_timers = if self.countdown.is_some() { 2 } else { 0 };
        countdown_timers + usize::from(self.next_reminder.is_some())
    }
}
