//! Settings file watcher background task

use std::{path::PathBuf, time::Duration};
use tokio::{sync::mpsc, time::interval};
use tracing::{debug, info, warn};

use crate::{
    scheduler::Event,
    settings::{read_settings_file, Settings, SharedSettings},
};

/// Background task that polls the settings file and reports changes to the
/// `lookaway` group as `Event::SettingsChanged`.
///
/// Only a change in the file itself counts; settings replaced through the API
/// are left alone until the file changes again. `loaded` is the result of the
/// initial read, if any.
pub async fn settings_watch_task(
    path: PathBuf,
    base: Settings,
    loaded: Option<Settings>,
    settings: SharedSettings,
    events: mpsc::UnboundedSender<Event>,
    period: Duration,
) {
    info!("Watching settings file {}", path.display());

    let mut last_loaded = loaded;
    let mut last_error: Option<String> = None;
    let mut interval = interval(period);

    loop {
        interval.tick().await;

        let from_file = match read_settings_file(&path, &base).await {
            Ok(from_file) => {
                last_error = None;
                from_file
            }
            Err(e) => {
                let message = format!("{:#}", e);
                if last_error.as_deref() != Some(message.as_str()) {
                    warn!("Keeping current settings: {}", message);
                    last_error = Some(message);
                }
                continue;
            }
        };

        if last_loaded.as_ref() == Some(&from_file) {
            continue;
        }
        if let Err(e) = from_file.validate() {
            warn!("Settings file has an invalid value, defaults will be used for it: {}", e);
        }
        last_loaded = Some(from_file.clone());

        match settings.replace(from_file) {
            Ok(true) => {
                info!("Settings file changed");
                if events.send(Event::SettingsChanged).is_err() {
                    debug!("Scheduler gone, stopping settings watcher");
                    break;
                }
            }
            Ok(false) => debug!("Settings file rewritten without changes"),
            Err(e) => warn!("Failed to apply settings file: {}", e),
        }
    }
}
