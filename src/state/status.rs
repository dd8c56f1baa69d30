//! Scheduler status snapshot published after every event

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CycleStats, Phase, SchedulerState};

/// Read-only copy of the scheduler state for observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerStatus {
    pub phase: Phase,
    pub paused: bool,
    pub showing_reminder: bool,
    pub remaining_seconds: Option<u32>,
    pub next_reminder_at: Option<DateTime<Utc>>,
    pub stats: CycleStats,
}

impl SchedulerStatus {
    /// Status before the scheduler has handled anything
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            paused: false,
            showing_reminder: false,
            remaining_seconds: None,
            next_reminder_at: None,
            stats: CycleStats::default(),
        }
    }
}

impl Default for SchedulerStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&SchedulerState> for SchedulerStatus {
    fn from(state: &SchedulerState) -> Self {
        let phase = state.phase();
        Self {
            phase,
            paused: state.paused,
            showing_reminder: state.showing_reminder,
            remaining_seconds: (phase == Phase::Countdown).then_some(state.remaining_seconds),
            next_reminder_at: state.next_reminder_at,
            stats: state.stats,
        }
    }
}
