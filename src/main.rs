//! Look Away - a daemon that reminds you to rest your eyes
//!
//! This is the main entry point for the look-away application.

use std::sync::Arc;
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use look_away::{
    api::create_router,
    config::Config,
    scheduler::Event,
    services::NoticeBoard,
    settings::{read_settings_file, SharedSettings},
    state::AppState,
    tasks::{settings_watch_task, spawn_scheduler},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("look_away={},tower_http=info", config.log_level()))
        .init();

    info!("Starting look-away v{}", env!("CARGO_PKG_VERSION"));

    // Settings file values take precedence over the flags
    let base = config.base_settings();
    let loaded = match &config.settings {
        Some(path) => match read_settings_file(path, &base).await {
            Ok(settings) => Some(settings),
            Err(e) => {
                warn!("Using command line settings: {:#}", e);
                None
            }
        },
        None => None,
    };
    let initial = loaded.clone().unwrap_or_else(|| base.clone());
    if let Err(e) = initial.validate() {
        warn!("{}, the default will be used", e);
    }
    info!(
        "Configuration: host={}, port={}, enabled={}, interval={}min, duration={}s",
        config.host, config.port, initial.enabled, initial.interval_minutes, initial.duration_seconds
    );

    let settings = SharedSettings::new(initial);
    let notices = NoticeBoard::new();

    // Start the reminder scheduler loop
    let scheduler = spawn_scheduler(notices.clone(), settings.clone());

    // Keep the settings file in sync
    if let Some(path) = config.settings.clone() {
        tokio::spawn(settings_watch_task(
            path,
            base,
            loaded,
            settings.clone(),
            scheduler.events.clone(),
            config.poll_period(),
        ));
    }

    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        scheduler.events.clone(),
        scheduler.status_rx.clone(),
        notices,
        settings,
    ));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /skip             - Skip the current reminder or break");
    info!("  POST /pause            - Pause reminders");
    info!("  POST /resume           - Resume reminders");
    info!("  POST /reminder/start   - Start the offered break");
    info!("  POST /reminder/skip    - Skip the offered break");
    info!("  POST /reminder/dismiss - Dismiss the reminder");
    info!("  POST /break/cancel     - Cancel the running break");
    info!("  GET  /settings         - Current settings");
    info!("  PUT  /settings         - Replace settings");
    info!("  GET  /status           - Scheduler status and notices");
    info!("  GET  /health           - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Deactivate the scheduler so no timer outlives the process
    if scheduler.events.send(Event::Shutdown).is_ok() {
        if let Err(e) = scheduler.task.await {
            warn!("Scheduler task ended abnormally: {}", e);
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
