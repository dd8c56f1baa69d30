//! Reminder scheduler event loop task

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    scheduler::{Event, Flow, NotificationSurface, Scheduler, TimerDriver},
    services::{NoticeBoard, TokioTimers},
    settings::{SettingsSource, SharedSettings},
    state::{Phase, SchedulerStatus},
};

/// Handles to a running scheduler loop
#[derive(Debug)]
pub struct SchedulerHandle {
    pub events: mpsc::UnboundedSender<Event>,
    pub status_rx: watch::Receiver<SchedulerStatus>,
    pub task: JoinHandle<()>,
}

/// Build a scheduler over the notice board and tokio timers and spawn its loop
pub fn spawn_scheduler(notices: NoticeBoard, settings: SharedSettings) -> SchedulerHandle {
    let (events, events_rx) = mpsc::unbounded_channel();
    let (status_tx, status_rx) = watch::channel(SchedulerStatus::new());

    let scheduler = Scheduler::new(notices, settings, TokioTimers::new(events.clone()));
    let task = tokio::spawn(async move {
        scheduler_task(scheduler, events_rx, status_tx).await;
    });

    SchedulerHandle {
        events,
        status_rx,
        task,
    }
}

/// Background task that owns the scheduler and feeds it events one at a time
pub async fn scheduler_task<N, S, T>(
    mut scheduler: Scheduler<N, S, T>,
    mut events: mpsc::UnboundedReceiver<Event>,
    status_tx: watch::Sender<SchedulerStatus>,
) where
    N: NotificationSurface,
    S: SettingsSource,
    T: TimerDriver,
{
    info!("Starting reminder scheduler task");

    scheduler.activate();
    publish_status(&scheduler, &status_tx);

    while let Some(event) = events.recv().await {
        debug!("Scheduler received {:?}", event);
        let flow = scheduler.handle(event);
        publish_status(&scheduler, &status_tx);

        if flow == Flow::Stop {
            break;
        }
    }

    if scheduler.phase() != Phase::Terminated {
        // Every sender is gone; nothing can reach the scheduler any more
        scheduler.deactivate();
        publish_status(&scheduler, &status_tx);
    }

    info!("Reminder scheduler task stopped");
}

fn publish_status<N, S, T>(scheduler: &Scheduler<N, S, T>, status_tx: &watch::Sender<SchedulerStatus>)
where
    N: NotificationSurface,
    S: SettingsSource,
    T: TimerDriver,
{
    if let Err(e) = status_tx.send(scheduler.status()) {
        warn!("Failed to publish scheduler status: {}", e);
    }
}
