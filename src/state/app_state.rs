//! State shared with the HTTP handlers

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tracing::info;

use super::SchedulerStatus;
use crate::{
    scheduler::Event,
    services::NoticeBoard,
    settings::{Settings, SharedSettings},
};

/// Everything the API needs to observe and drive the scheduler
#[derive(Debug)]
pub struct AppState {
    /// Event channel into the scheduler loop
    pub events: mpsc::UnboundedSender<Event>,
    /// Latest scheduler snapshot; also keeps the status channel open
    pub status_rx: watch::Receiver<SchedulerStatus>,
    pub notices: NoticeBoard,
    pub settings: SharedSettings,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    pub fn new(
        port: u16,
        host: String,
        events: mpsc::UnboundedSender<Event>,
        status_rx: watch::Receiver<SchedulerStatus>,
        notices: NoticeBoard,
        settings: SharedSettings,
    ) -> Self {
        Self {
            events,
            status_rx,
            notices,
            settings,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Queue an event for the scheduler and record it as the last action
    pub fn send_event(&self, action: &str, event: Event) -> Result<(), String> {
        self.events
            .send(event)
            .map_err(|e| format!("Scheduler is not running: {}", e))?;

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
        Ok(())
    }

    /// Store validated settings, notifying the scheduler when they changed
    pub fn update_settings(&self, settings: Settings) -> Result<bool, String> {
        let changed = self.settings.replace(settings)?;
        if changed {
            info!("Settings updated through the API");
            self.send_event("settings", Event::SettingsChanged)?;
        }
        Ok(changed)
    }

    /// Current scheduler snapshot
    pub fn get_status(&self) -> SchedulerStatus {
        self.status_rx.borrow().clone()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
