//! Break countdown sequencing
//!
//! A countdown owns a repeating one-second tick timer, a safety timer armed
//! for `duration + 1` seconds, a persistent status-bar text and a cancellable
//! progress session. Whichever of completion, cancellation or the safety timer
//! comes first releases all of them and schedules the next reminder.

use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{
    handles::ProgressSession,
    surface::{NotificationSurface, StatusLifetime},
    timers::TimerDriver,
    Scheduler, MSG_CANCELLED, MSG_COMPLETE,
};
use crate::{
    settings::SettingsSource,
    state::CountdownHandles,
};

pub const BREAK_TITLE: &str = "👀 Look Away Break";
pub const TICK_PERIOD: Duration = Duration::from_millis(1000);
const COMPLETE_STATUS_LIFETIME: Duration = Duration::from_millis(3000);

pub fn remaining_message(remaining_seconds: u32) -> String {
    format!("{} seconds remaining...", remaining_seconds)
}

pub fn countdown_status_text(remaining_seconds: u32) -> String {
    format!("👀 Look away! {} seconds remaining...", remaining_seconds)
}

impl<N, S, T> Scheduler<N, S, T>
where
    N: NotificationSurface,
    S: SettingsSource,
    T: TimerDriver,
{
    pub(super) fn start_break(&mut self, duration_seconds: u32) {
        info!("Starting countdown for {} seconds", duration_seconds);

        if let Some(stale) = self.release_countdown() {
            warn!("Releasing a countdown that was still live");
            self.surface.resolve_progress(stale.progress.id);
        }

        self.state.remaining_seconds = duration_seconds;
        self.state.stats.breaks_started += 1;

        let status = self.surface.set_status_text(
            &countdown_status_text(duration_seconds),
            StatusLifetime::Persistent,
        );

        let token = CancellationToken::new();
        let progress = self.surface.begin_progress(BREAK_TITLE, token.clone());
        self.surface
            .report_progress(progress, 0.0, &remaining_message(duration_seconds));

        let tick = self.timers.arm_repeating(TICK_PERIOD);
        let safety = self
            .timers
            .arm_once(Duration::from_secs(u64::from(duration_seconds) + 1));
        debug!("Countdown timers armed: tick={:?} safety={:?}", tick, safety);

        self.state.countdown = Some(CountdownHandles {
            tick,
            safety,
            status,
            progress: ProgressSession::new(progress, token),
            duration_seconds,
        });
    }

    pub(super) fn on_tick(&mut self) {
        let Some(countdown) = self.state.countdown.as_mut() else {
            return;
        };
        if countdown.progress.token.is_cancelled() {
            debug!("Tick after cancellation was requested, waiting for cancellation");
            return;
        }

        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        let remaining = self.state.remaining_seconds;

        let increment = 100.0 / f64::from(countdown.duration_seconds);
        countdown.progress.reported_percent += increment;
        self.surface
            .report_progress(countdown.progress.id, increment, &remaining_message(remaining));

        if remaining == 0 {
            self.finish_break();
            return;
        }

        // Redrawn by replacing the handle
        self.surface.dispose_status(countdown.status);
        countdown.status = self
            .surface
            .set_status_text(&countdown_status_text(remaining), StatusLifetime::Persistent);
    }

    fn finish_break(&mut self) {
        let Some(countdown) = self.release_countdown() else {
            return;
        };

        let final_increment = (100.0 - countdown.progress.reported_percent).max(0.0);
        self.surface
            .report_progress(countdown.progress.id, final_increment, "Complete!");
        self.surface.resolve_progress(countdown.progress.id);

        self.surface.show_info(MSG_COMPLETE);
        self.surface
            .set_status_text(MSG_COMPLETE, StatusLifetime::Transient(COMPLETE_STATUS_LIFETIME));

        info!("Break complete");
        self.state.showing_reminder = false;
        self.state.stats.breaks_completed += 1;
        self.schedule_next_reminder();
    }

    pub(super) fn cancel_break(&mut self) {
        let Some(countdown) = self.release_countdown() else {
            return;
        };
        self.surface.resolve_progress(countdown.progress.id);

        info!("Countdown cancelled by user");
        self.state.showing_reminder = false;
        self.state.stats.breaks_cancelled += 1;
        self.surface.show_info(MSG_CANCELLED);
        self.schedule_next_reminder();
    }

    pub(super) fn on_progress_cancelled(&mut self, progress: super::ProgressId) {
        let live = self
            .state
            .countdown
            .as_ref()
            .is_some_and(|countdown| countdown.progress.id == progress);

        if !live {
            debug!("Ignoring cancellation of stale progress {:?}", progress);
            return;
        }
        self.cancel_break();
    }

    pub(super) fn on_safety_elapsed(&mut self) {
        let Some(countdown) = self.release_countdown() else {
            return;
        };
        warn!(
            "Countdown did not finish within {} seconds, forcing cleanup",
            u64::from(countdown.duration_seconds) + 1
        );
        self.surface.resolve_progress(countdown.progress.id);

        self.state.showing_reminder = false;
        self.schedule_next_reminder();
    }

    /// Take the live countdown, clearing both timers and the status text.
    /// The progress session is left for the caller to report on and resolve.
    pub(super) fn release_countdown(&mut self) -> Option<CountdownHandles> {
        let countdown = self.state.countdown.take()?;

        self.timers.clear(countdown.tick);
        self.timers.clear(countdown.safety);
        self.surface.dispose_status(countdown.status);
        debug!(
            "Released countdown: tick={:?} safety={:?}",
            countdown.tick, countdown.safety
        );
        Some(countdown)
    }
}
