//! Autoplay scheduler: one repeating timer per instance, plus the one-shot
//! grace timer used by "pause then resume".
//!
//! The scheduler never picks a target and never decides why it is paused.
//! It only owns timer handles and guarantees that at most one autoplay
//! interval (and at most one grace timeout) is live at any moment.

use log::trace;

use crate::host::TimerHost;
use crate::ids::{InstanceId, TimerHandle};

/// What a timer firing means for the owning instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Firing {
    /// The autoplay interval elapsed.
    Tick,
    /// The grace period after manual navigation ended.
    GraceOver,
    /// Not one of ours (cleared earlier, or from a previous arm).
    Stale,
}

#[derive(Debug)]
pub struct AutoplayScheduler {
    owner: InstanceId,
    interval_ms: u32,
    grace_ms: u32,
    live: Option<TimerHandle>,
    grace: Option<TimerHandle>,
}

impl AutoplayScheduler {
    pub fn new(owner: InstanceId, interval_ms: u32, grace_ms: u32) -> Self {
        Self {
            owner,
            interval_ms,
            grace_ms,
            live: None,
            grace: None,
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Start the repeating timer, replacing any live one.
    pub fn arm(&mut self, timers: &mut dyn TimerHost) {
        self.disarm(timers);
        let handle = timers.set_interval(self.owner, self.interval_ms);
        trace!("autoplay armed owner={:?} handle={:?}", self.owner, handle);
        self.live = Some(handle);
    }

    pub fn disarm(&mut self, timers: &mut dyn TimerHost) {
        if let Some(handle) = self.live.take() {
            timers.clear(handle);
        }
    }

    /// Disarm then arm: the next tick is a full interval away.
    pub fn reset(&mut self, timers: &mut dyn TimerHost) {
        self.disarm(timers);
        self.arm(timers);
    }

    pub fn is_armed(&self) -> bool {
        self.live.is_some()
    }

    /// Bring the timer in line with `should_run` without restarting a live one.
    pub fn sync(&mut self, should_run: bool, timers: &mut dyn TimerHost) {
        match (should_run, self.is_armed()) {
            (true, false) => self.arm(timers),
            (false, true) => self.disarm(timers),
            _ => {}
        }
    }

    /// Start (or restart) the grace timeout. The interval is disarmed by the
    /// caller's next `sync`, since the grace window counts as a suspension.
    pub fn start_grace(&mut self, timers: &mut dyn TimerHost) {
        self.cancel_grace(timers);
        self.grace = Some(timers.set_timeout(self.owner, self.grace_ms));
    }

    pub fn in_grace(&self) -> bool {
        self.grace.is_some()
    }

    pub fn cancel_grace(&mut self, timers: &mut dyn TimerHost) {
        if let Some(handle) = self.grace.take() {
            timers.clear(handle);
        }
    }

    /// Classify a firing and consume one-shot handles.
    pub fn classify(&mut self, handle: TimerHandle) -> Firing {
        if self.live == Some(handle) {
            Firing::Tick
        } else if self.grace == Some(handle) {
            self.grace = None;
            Firing::GraceOver
        } else {
            Firing::Stale
        }
    }

    /// Release every handle. Later firings classify as stale.
    pub fn teardown(&mut self, timers: &mut dyn TimerHost) {
        self.disarm(timers);
        self.cancel_grace(timers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[derive(Default)]
    struct CountingTimers {
        next: u32,
        live: BTreeSet<u32>,
        intervals: u32,
        timeouts: u32,
    }

    impl TimerHost for CountingTimers {
        fn set_interval(&mut self, _owner: InstanceId, _period_ms: u32) -> TimerHandle {
            self.next += 1;
            self.intervals += 1;
            self.live.insert(self.next);
            TimerHandle(self.next)
        }
        fn set_timeout(&mut self, _owner: InstanceId, _delay_ms: u32) -> TimerHandle {
            self.next += 1;
            self.timeouts += 1;
            self.live.insert(self.next);
            TimerHandle(self.next)
        }
        fn clear(&mut self, handle: TimerHandle) {
            self.live.remove(&handle.0);
        }
    }

    #[test]
    fn double_arm_keeps_one_live_timer() {
        let mut timers = CountingTimers::default();
        let mut s = AutoplayScheduler::new(InstanceId(0), 5000, 3000);
        s.arm(&mut timers);
        s.arm(&mut timers);
        assert_eq!(timers.intervals, 2);
        assert_eq!(timers.live.len(), 1);
        assert!(s.is_armed());
    }

    #[test]
    fn old_handle_is_stale_after_reset() {
        let mut timers = CountingTimers::default();
        let mut s = AutoplayScheduler::new(InstanceId(0), 5000, 3000);
        s.arm(&mut timers);
        let first = TimerHandle(timers.next);
        s.reset(&mut timers);
        assert_eq!(s.classify(first), Firing::Stale);
        assert_eq!(s.classify(TimerHandle(timers.next)), Firing::Tick);
    }

    #[test]
    fn sync_does_not_restart_live_timer() {
        let mut timers = CountingTimers::default();
        let mut s = AutoplayScheduler::new(InstanceId(0), 5000, 3000);
        s.sync(true, &mut timers);
        s.sync(true, &mut timers);
        assert_eq!(timers.intervals, 1);
        s.sync(false, &mut timers);
        assert!(timers.live.is_empty());
    }

    #[test]
    fn grace_is_single_slot_and_one_shot() {
        let mut timers = CountingTimers::default();
        let mut s = AutoplayScheduler::new(InstanceId(0), 5000, 3000);
        s.start_grace(&mut timers);
        s.start_grace(&mut timers);
        assert_eq!(timers.timeouts, 2);
        assert_eq!(timers.live.len(), 1);
        let h = TimerHandle(timers.next);
        assert_eq!(s.classify(h), Firing::GraceOver);
        assert!(!s.in_grace());
        assert_eq!(s.classify(h), Firing::Stale);
    }

    #[test]
    fn teardown_releases_everything() {
        let mut timers = CountingTimers::default();
        let mut s = AutoplayScheduler::new(InstanceId(3), 5000, 3000);
        s.arm(&mut timers);
        s.start_grace(&mut timers);
        s.teardown(&mut timers);
        assert!(timers.live.is_empty());
        assert!(!s.is_armed());
        assert!(!s.in_grace());
    }
}
