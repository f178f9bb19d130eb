//! Virtual clock implementing [`TimerHost`].
//!
//! Nothing fires on its own; callers pop due firings and route them back to
//! the registry, which keeps ordering fully deterministic.

use std::collections::BTreeMap;

use vitrine_carousel_core::{InstanceId, TimerHandle, TimerHost};

#[derive(Debug, Clone, Copy)]
struct Timer {
    owner: InstanceId,
    due: u64,
    period: Option<u32>,
}

#[derive(Debug, Default)]
pub struct VirtualTimers {
    now: u64,
    next: u32,
    timers: BTreeMap<u32, Timer>,
    intervals_set: usize,
    timeouts_set: usize,
}

impl VirtualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn set_now(&mut self, now: u64) {
        self.now = now;
    }

    /// Live timers of any kind.
    pub fn live_count(&self) -> usize {
        self.timers.len()
    }

    pub fn live_intervals(&self, owner: InstanceId) -> usize {
        self.timers
            .values()
            .filter(|t| t.owner == owner && t.period.is_some())
            .count()
    }

    pub fn live_timeouts(&self, owner: InstanceId) -> usize {
        self.timers
            .values()
            .filter(|t| t.owner == owner && t.period.is_none())
            .count()
    }

    pub fn intervals_set(&self) -> usize {
        self.intervals_set
    }

    pub fn timeouts_set(&self) -> usize {
        self.timeouts_set
    }

    /// Earliest firing due at or before `until`, advancing the clock to it.
    /// Intervals are rescheduled one period later; timeouts are consumed.
    pub fn pop_due(&mut self, until: u64) -> Option<(InstanceId, TimerHandle)> {
        let (&handle, timer) = self
            .timers
            .iter()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(h, t)| (t.due, **h))?;
        let timer = *timer;
        self.now = self.now.max(timer.due);
        match timer.period {
            Some(period) => {
                if let Some(t) = self.timers.get_mut(&handle) {
                    t.due += u64::from(period.max(1));
                }
            }
            None => {
                self.timers.remove(&handle);
            }
        }
        Some((timer.owner, TimerHandle(handle)))
    }

    fn insert(&mut self, owner: InstanceId, delay: u32, period: Option<u32>) -> TimerHandle {
        self.next += 1;
        self.timers.insert(
            self.next,
            Timer {
                owner,
                due: self.now + u64::from(delay),
                period,
            },
        );
        TimerHandle(self.next)
    }
}

impl TimerHost for VirtualTimers {
    fn set_interval(&mut self, owner: InstanceId, period_ms: u32) -> TimerHandle {
        self.intervals_set += 1;
        self.insert(owner, period_ms, Some(period_ms))
    }

    fn set_timeout(&mut self, owner: InstanceId, delay_ms: u32) -> TimerHandle {
        self.timeouts_set += 1;
        self.insert(owner, delay_ms, None)
    }

    fn clear(&mut self, handle: TimerHandle) {
        self.timers.remove(&handle.0);
    }
}
