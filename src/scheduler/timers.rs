//! Timer driver seam and the virtual-clock driver

use std::{collections::BTreeMap, time::Duration};

use super::handles::TimerHandle;

/// Arms and clears timers on behalf of the scheduler.
///
/// Drivers never call back into the scheduler; a fired timer is delivered as
/// `Event::TimerFired(handle)` through whatever event queue the driver feeds.
/// Clearing a handle that already fired or was already cleared is a no-op.
pub trait TimerDriver {
    /// Fire once after `delay`
    fn arm_once(&mut self, delay: Duration) -> TimerHandle;
    /// Fire every `period`, first after one full period
    fn arm_repeating(&mut self, period: Duration) -> TimerHandle;
    fn clear(&mut self, handle: TimerHandle);
}

#[derive(Debug, Clone, Copy)]
struct ManualTimer {
    due: Duration,
    period: Option<Duration>,
}

/// Timer driver over a virtual clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualTimers {
    now: Duration,
    next_id: u64,
    armed: BTreeMap<TimerHandle, ManualTimer>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since the driver was created
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn live_count(&self) -> usize {
        self.armed.len()
    }

    pub fn is_live(&self, handle: TimerHandle) -> bool {
        self.armed.contains_key(&handle)
    }

    /// Time left until `handle` next fires
    pub fn due_in(&self, handle: TimerHandle) -> Option<Duration> {
        self.armed
            .get(&handle)
            .map(|timer| timer.due.saturating_sub(self.now))
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to its
    /// due time. Repeating timers are re-armed one period later.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerHandle> {
        let (handle, timer) = self
            .armed
            .iter()
            .filter(|(_, timer)| timer.due <= until)
            .min_by_key(|(handle, timer)| (timer.due, **handle))
            .map(|(handle, timer)| (*handle, *timer))?;

        self.now = self.now.max(timer.due);
        match timer.period {
            Some(period) => {
                if let Some(entry) = self.armed.get_mut(&handle) {
                    entry.due += period;
                }
            }
            None => {
                self.armed.remove(&handle);
            }
        }
        Some(handle)
    }

    /// Move the clock forward without firing anything
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    fn arm(&mut self, delay: Duration, period: Option<Duration>) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.armed.insert(
            handle,
            ManualTimer {
                due: self.now + delay,
                period,
            },
        );
        handle
    }
}

impl TimerDriver for ManualTimers {
    fn arm_once(&mut self, delay: Duration) -> TimerHandle {
        self.arm(delay, None)
    }

    fn arm_repeating(&mut self, period: Duration) -> TimerHandle {
        self.arm(period, Some(period))
    }

    fn clear(&mut self, handle: TimerHandle) {
        self.armed.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_timers_in_due_order() {
        let mut timers = ManualTimers::new();
        let late = timers.arm_once(Duration::from_secs(5));
        let early = timers.arm_once(Duration::from_secs(2));

        assert_eq!(timers.pop_due(Duration::from_secs(10)), Some(early));
        assert_eq!(timers.now(), Duration::from_secs(2));
        assert_eq!(timers.pop_due(Duration::from_secs(10)), Some(late));
        assert_eq!(timers.pop_due(Duration::from_secs(10)), None);
    }

    #[test]
    fn repeating_timer_rearms() {
        let mut timers = ManualTimers::new();
        let tick = timers.arm_repeating(Duration::from_secs(1));

        for _ in 0..3 {
            assert_eq!(timers.pop_due(Duration::from_secs(3)), Some(tick));
        }
        assert_eq!(timers.pop_due(Duration::from_secs(3)), None);
        assert_eq!(timers.due_in(tick), Some(Duration::from_secs(1)));
    }

    #[test]
    fn clear_is_idempotent() {
        let mut timers = ManualTimers::new();
        let handle = timers.arm_once(Duration::from_secs(1));
        timers.clear(handle);
        timers.clear(handle);
        assert!(!timers.is_live(handle));
        assert_eq!(timers.pop_due(Duration::from_secs(2)), None);
    }
}
