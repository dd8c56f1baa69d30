//! Reminder scheduler
//!
//! A single-threaded state machine that sequences
//! `Idle -> Waiting -> ReminderShown -> Countdown -> Waiting`. Every input is an
//! [`Event`] passed to [`Scheduler::handle`], one at a time; each call runs to
//! completion and leaves every handle it superseded cleared.
//!
//! The scheduler talks to the outside world only through three seams:
//! [`NotificationSurface`] for presentation, [`SettingsSource`] for settings
//! (read fresh at every decision) and [`TimerDriver`] for timers.

pub mod countdown;
pub mod handles;
pub mod surface;
pub mod timers;


use std::time::Duration;
use chrono::Utc;
use tracing::{debug, info};

use crate::{
    settings::SettingsSource,
    state::{PendingPrompt, Phase, SchedulerState, SchedulerStatus},
};

// Re-export main types
pub use handles::{ProgressId, ProgressSession, PromptId, StatusHandle, TimerHandle};
pub use surface::{NotificationSurface, ReminderAction, StatusLifetime};
pub use timers::{ManualTimers, TimerDriver};
pub use tokio_util::sync::CancellationToken;

pub const MSG_SKIPPED: &str = "Reminder skipped. Next reminder will appear at the scheduled time.";
pub const MSG_CANCELLED: &str = "Break cancelled. Next reminder will appear at the scheduled time.";
pub const MSG_COMPLETE: &str = "✅ Break complete!";
pub const MSG_PAUSED: &str = "Look Away reminders paused. Use \"Resume Reminders\" to start again.";
pub const MSG_RESUMED: &str = "Look Away reminders resumed.";

/// Everything that can happen to the scheduler
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A timer armed through the [`TimerDriver`] fired
    TimerFired(TimerHandle),
    /// The user answered (or dismissed, `None`) a reminder prompt
    ReminderAnswered {
        prompt: PromptId,
        action: Option<ReminderAction>,
    },
    /// The user cancelled a progress session
    ProgressCancelled(ProgressId),
    Skip,
    Pause,
    Resume,
    /// The settings group changed
    SettingsChanged,
    Shutdown,
}

/// Whether the event loop should keep feeding events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Text of the reminder prompt
pub fn reminder_text(duration_seconds: u32) -> String {
    format!(
        "👀 Look Away! Look at something 20 feet away for {} seconds.",
        duration_seconds
    )
}

pub struct Scheduler<N, S, T> {
    state: SchedulerState,
    surface: N,
    settings: S,
    timers: T,
}

impl<N, S, T> Scheduler<N, S, T>
where
    N: NotificationSurface,
    S: SettingsSource,
    T: TimerDriver,
{
    pub fn new(surface: N, settings: S, timers: T) -> Self {
        Self {
            state: SchedulerState::new(),
            surface,
            settings,
            timers,
        }
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    pub fn status(&self) -> SchedulerStatus {
        SchedulerStatus::from(&self.state)
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    /// Start the first reminder cycle
    pub fn activate(&mut self) {
        info!("Look Away scheduler activated");
        self.schedule_next_reminder();
    }

    /// Handle one event to completion
    pub fn handle(&mut self, event: Event) -> Flow {
        if self.state.terminated {
            debug!("Scheduler terminated, ignoring {:?}", event);
            return Flow::Stop;
        }

        match event {
            Event::TimerFired(handle) => self.on_timer_fired(handle),
            Event::ReminderAnswered { prompt, action } => self.on_reminder_answered(prompt, action),
            Event::ProgressCancelled(progress) => self.on_progress_cancelled(progress),
            Event::Skip => self.skip(),
            Event::Pause => self.pause(),
            Event::Resume => self.resume(),
            Event::SettingsChanged => self.settings_changed(),
            Event::Shutdown => {
                self.deactivate();
                return Flow::Stop;
            }
        }
        Flow::Continue
    }

    /// Arm the next-reminder timer for a full interval, replacing any armed one.
    /// Does nothing while disabled, paused or mid-cycle.
    pub fn schedule_next_reminder(&mut self) {
        let settings = self.settings.current();

        if !settings.enabled || self.state.paused {
            debug!(
                "Not scheduling a reminder (enabled={}, paused={})",
                settings.enabled, self.state.paused
            );
            return;
        }
        if self.state.showing_reminder {
            debug!("Reminder cycle in progress, next reminder is scheduled when it ends");
            return;
        }

        self.clear_next_reminder();

        let interval = settings.interval();
        let handle = self.timers.arm_once(interval);
        self.state.next_reminder = Some(handle);
        self.state.next_reminder_at = chrono::Duration::from_std(interval)
            .ok()
            .map(|delay| Utc::now() + delay);

        info!("Next reminder in {} minutes", settings.interval_minutes);
        debug!("Armed next-reminder timer {:?} for {:?}", handle, interval);
    }

    /// Tear everything down without telling the user. Further events are ignored.
    pub fn deactivate(&mut self) {
        self.clear_all();
        self.state.showing_reminder = false;
        self.state.terminated = true;
        info!("Look Away scheduler deactivated");
    }

    fn clear_next_reminder(&mut self) {
        if let Some(handle) = self.state.next_reminder.take() {
            debug!("Clearing next-reminder timer {:?}", handle);
            self.timers.clear(handle);
        }
        self.state.next_reminder_at = None;
    }

    /// Clear every live timer and handle
    fn clear_all(&mut self) {
        self.clear_next_reminder();
        if let Some(pending) = self.state.pending_prompt.take() {
            self.surface.retract_warning(pending.id);
        }
        if let Some(countdown) = self.release_countdown() {
            self.surface.resolve_progress(countdown.progress.id);
        }
    }

    fn on_timer_fired(&mut self, handle: TimerHandle) {
        if self.state.next_reminder == Some(handle) {
            self.clear_next_reminder();
            self.on_reminder_due();
            return;
        }

        let countdown_timer = self
            .state
            .countdown
            .as_ref()
            .map(|countdown| (countdown.tick == handle, countdown.safety == handle));

        match countdown_timer {
            Some((true, _)) => self.on_tick(),
            Some((_, true)) => self.on_safety_elapsed(),
            _ => debug!("Ignoring stale timer {:?}", handle),
        }
    }

    fn on_reminder_due(&mut self) {
        if self.state.showing_reminder || self.state.paused {
            debug!("Reminder due while showing or paused, rescheduling");
            self.schedule_next_reminder();
            return;
        }

        let duration_seconds = self.settings.current().duration_seconds;
        self.state.showing_reminder = true;
        self.state.stats.reminders_shown += 1;

        let prompt = self
            .surface
            .show_warning(&reminder_text(duration_seconds), &ReminderAction::ALL);
        self.state.pending_prompt = Some(PendingPrompt {
            id: prompt,
            duration_seconds,
        });
        info!("Reminder shown ({:?})", prompt);
    }

    fn on_reminder_answered(&mut self, prompt: PromptId, action: Option<ReminderAction>) {
        let Some(pending) = self.state.pending_prompt.filter(|pending| pending.id == prompt) else {
            debug!("Ignoring answer to stale prompt {:?}", prompt);
            return;
        };
        self.state.pending_prompt = None;

        match action {
            // The break offered by the prompt, even if settings moved since
            Some(ReminderAction::StartBreak) => self.start_break(pending.duration_seconds),
            Some(ReminderAction::Skip) => self.skip_reminder(),
            None => {
                info!("Reminder dismissed");
                self.state.showing_reminder = false;
                self.schedule_next_reminder();
            }
        }
    }

    fn skip_reminder(&mut self) {
        info!("Reminder skipped");
        self.state.showing_reminder = false;
        self.state.stats.breaks_skipped += 1;
        self.surface.show_info(MSG_SKIPPED);
        self.schedule_next_reminder();
    }

    fn skip(&mut self) {
        if let Some(pending) = self.state.pending_prompt.take() {
            self.surface.retract_warning(pending.id);
            self.skip_reminder();
        } else if let Some(countdown) = self.state.countdown.as_ref() {
            countdown.progress.token.cancel();
            self.cancel_break();
        } else {
            debug!("Skip with no reminder showing, nothing to do");
        }
    }

    fn pause(&mut self) {
        if self.state.paused {
            debug!("Already paused");
            return;
        }
        self.state.paused = true;
        self.clear_next_reminder();
        self.surface.show_info(MSG_PAUSED);
        info!("Reminders paused");
    }

    fn resume(&mut self) {
        if !self.state.paused {
            debug!("Not paused, resume ignored");
            return;
        }
        self.state.paused = false;
        self.schedule_next_reminder();
        self.surface.show_info(MSG_RESUMED);
        info!("Reminders resumed");
    }

    fn settings_changed(&mut self) {
        info!("Settings changed, restarting the reminder cycle");
        self.clear_all();
        self.state.showing_reminder = false;
        self.schedule_next_reminder();
    }
}

impl<N, S> Scheduler<N, S, ManualTimers>
where
    N: NotificationSurface,
    S: SettingsSource,
{
    /// Move the virtual clock forward by `by`, handling every timer that falls
    /// due on the way in order. Returns the number of timers fired.
    pub fn advance(&mut self, by: Duration) -> usize {
        let until = self.timers.now() + by;
        let mut fired = 0;

        while let Some(handle) = self.timers.pop_due(until) {
            fired += 1;
            if self.handle(Event::TimerFired(handle)) == Flow::Stop {
                break;
            }
        }
        self.timers.set_now(until);
        fired
    }
}
