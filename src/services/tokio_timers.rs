//! Timer driver backed by tokio tasks

use std::{collections::HashMap, time::Duration};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval_at, sleep, Instant, MissedTickBehavior},
};
use tracing::debug;

use crate::scheduler::{Event, TimerDriver, TimerHandle};

/// Each armed timer is a task that enqueues `Event::TimerFired` on the
/// scheduler's event channel. Clearing a timer aborts its task; a fire that was
/// already enqueued is left for the scheduler to discard as stale.
#[derive(Debug)]
pub struct TokioTimers {
    events: mpsc::UnboundedSender<Event>,
    next_id: u64,
    tasks: HashMap<TimerHandle, JoinHandle<()>>,
}

impl TokioTimers {
    pub fn new(events: mpsc::UnboundedSender<Event>) -> Self {
        Self {
            events,
            next_id: 0,
            tasks: HashMap::new(),
        }
    }

    /// Timers armed and not yet finished or cleared
    pub fn live_count(&self) -> usize {
        self.tasks.values().filter(|task| !task.is_finished()).count()
    }

    fn next_handle(&mut self) -> TimerHandle {
        // One-shot timers that fired are forgotten here
        self.tasks.retain(|_, task| !task.is_finished());
        self.next_id += 1;
        TimerHandle(self.next_id)
    }
}

impl TimerDriver for TokioTimers {
    fn arm_once(&mut self, delay: Duration) -> TimerHandle {
        let handle = self.next_handle();
        let events = self.events.clone();

        let task = tokio::spawn(async move {
            sleep(delay).await;
            if events.send(Event::TimerFired(handle)).is_err() {
                debug!("Event channel closed, dropping fire of {:?}", handle);
            }
        });
        self.tasks.insert(handle, task);
        handle
    }

    fn arm_repeating(&mut self, period: Duration) -> TimerHandle {
        let handle = self.next_handle();
        let events = self.events.clone();

        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if events.send(Event::TimerFired(handle)).is_err() {
                    debug!("Event channel closed, stopping {:?}", handle);
                    break;
                }
            }
        });
        self.tasks.insert(handle, task);
        handle
    }

    fn clear(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
        }
    }
}

impl Drop for TokioTimers {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
