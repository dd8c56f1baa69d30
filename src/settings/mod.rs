//! Reminder settings and the source the scheduler reads them from
//!
//! Settings are never cached by the scheduler: every scheduling decision calls
//! [`SettingsSource::current`] so that an edit takes effect on the next decision.

pub mod file;

use std::{
    sync::{Arc, RwLock},
    time::Duration,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

// Re-export main functions
pub use file::{merge_settings_document, read_settings_file};

/// Name of the settings group all reminder keys live under
pub const SETTINGS_GROUP: &str = "lookaway";

pub const DEFAULT_INTERVAL_MINUTES: f64 = 20.0;
pub const DEFAULT_DURATION_SECONDS: u32 = 20;

/// Snapshot of the reminder settings group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Whether reminders are scheduled at all
    pub enabled: bool,
    /// Minutes between the end of one reminder cycle and the next reminder
    pub interval_minutes: f64,
    /// Length of the look-away countdown
    pub duration_seconds: u32,
}

impl Settings {
    pub fn new(enabled: bool, interval_minutes: f64, duration_seconds: u32) -> Self {
        Self {
            enabled,
            interval_minutes,
            duration_seconds,
        }
    }

    /// Time between arming the next-reminder timer and the reminder firing
    pub fn interval(&self) -> Duration {
        Duration::from_millis((self.interval_minutes * 60_000.0).round() as u64)
    }

    /// Check the value ranges, returning a description of the first bad key
    pub fn validate(&self) -> Result<(), String> {
        if !self.interval_minutes.is_finite() || self.interval_minutes <= 0.0 {
            return Err(format!(
                "intervalMinutes must be a positive number, got {}",
                self.interval_minutes
            ));
        }
        if self.duration_seconds == 0 {
            return Err("durationSeconds must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Replace out-of-range values with their defaults
    pub fn sanitized(mut self) -> Self {
        if !self.interval_minutes.is_finite() || self.interval_minutes <= 0.0 {
            warn!(
                "Ignoring invalid intervalMinutes {}, using {}",
                self.interval_minutes, DEFAULT_INTERVAL_MINUTES
            );
            self.interval_minutes = DEFAULT_INTERVAL_MINUTES;
        }
        if self.duration_seconds == 0 {
            warn!(
                "Ignoring invalid durationSeconds 0, using {}",
                DEFAULT_DURATION_SECONDS
            );
            self.duration_seconds = DEFAULT_DURATION_SECONDS;
        }
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(true, DEFAULT_INTERVAL_MINUTES, DEFAULT_DURATION_SECONDS)
    }
}

/// Read-only view of the settings group
pub trait SettingsSource {
    /// Current settings, with invalid values already replaced by defaults
    fn current(&self) -> Settings;
}

impl SettingsSource for Settings {
    fn current(&self) -> Settings {
        self.clone().sanitized()
    }
}

/// Settings cell shared between the scheduler, the settings watcher and the API
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<Settings>>,
}

impl SharedSettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// Raw stored settings, as last written
    pub fn get(&self) -> Result<Settings, String> {
        self.inner
            .read()
            .map(|settings| settings.clone())
            .map_err(|e| format!("Failed to lock settings: {}", e))
    }

    /// Store new settings, returning whether anything changed
    pub fn replace(&self, settings: Settings) -> Result<bool, String> {
        let mut current = self.inner.write()
            .map_err(|e| format!("Failed to lock settings: {}", e))?;

        if *current == settings {
            return Ok(false);
        }
        *current = settings;
        Ok(true)
    }
}

impl SettingsSource for SharedSettings {
    fn current(&self) -> Settings {
        match self.get() {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                warn!("{}, falling back to defaults", e);
                Settings::default()
            }
        }
    }
}
