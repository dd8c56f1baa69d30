//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};
use clap::Parser;

use crate::settings::{Settings, DEFAULT_DURATION_SECONDS, DEFAULT_INTERVAL_MINUTES};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "look-away")]
#[command(about = "A reminder daemon that periodically asks you to look away from the screen")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Minutes between reminders
    #[arg(short, long, default_value_t = DEFAULT_INTERVAL_MINUTES)]
    pub interval_minutes: f64,

    /// Length of the look-away break in seconds
    #[arg(short, long, default_value_t = DEFAULT_DURATION_SECONDS)]
    pub duration_seconds: u32,

    /// Start with reminders disabled
    #[arg(long)]
    pub disabled: bool,

    /// JSON settings file whose "lookaway" group overrides the flags above
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// How often the settings file is checked for changes, in seconds
    #[arg(long, default_value = "2")]
    pub poll_seconds: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Settings given on the command line
    pub fn base_settings(&self) -> Settings {
        Settings::new(!self.disabled, self.interval_minutes, self.duration_seconds)
    }

    pub fn poll_period(&self) -> Duration {
        Duration::from_secs(self.poll_seconds.max(1))
    }
}
