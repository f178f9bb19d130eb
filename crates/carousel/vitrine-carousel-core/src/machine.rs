//! Carousel state machine: position, bounds policy and transition phases.
//!
//! Pure state; no host access. `Single` wraps circularly, `Multi` clamps to
//! `[0, slide_count - per_view]` except that `next()` at the end loops to 0.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ids::CompletionToken;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// One slide fills the viewport.
    Single,
    /// Several cards visible at once.
    Multi,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle(usize),
    Transitioning {
        from: usize,
        to: usize,
        token: CompletionToken,
    },
    Settled(usize),
}

/// A position change. `from == to` is a valid no-op transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: usize,
    pub to: usize,
}

#[derive(Clone, Debug)]
pub struct CarouselState {
    mode: Mode,
    slide_count: usize,
    current: usize,
    per_view: usize,
    playing: bool,
    shuffle: bool,
    phase: Phase,
}

impl CarouselState {
    pub fn new(mode: Mode, slide_count: usize) -> Self {
        Self {
            mode,
            slide_count,
            current: 0,
            per_view: 1,
            playing: true,
            shuffle: false,
            phase: Phase::Idle(0),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn per_view(&self) -> usize {
        self.per_view
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn shuffle_enabled(&self) -> bool {
        self.shuffle
    }

    /// No slides: every navigation call is a no-op.
    pub fn is_inert(&self) -> bool {
        self.slide_count == 0
    }

    pub fn max_index(&self) -> usize {
        match self.mode {
            Mode::Single => self.slide_count.saturating_sub(1),
            Mode::Multi => self.slide_count.saturating_sub(self.per_view),
        }
    }

    /// Map any requested index into the valid range for this mode.
    pub fn normalize(&self, target: i64) -> usize {
        match self.mode {
            Mode::Single => target.rem_euclid(self.slide_count.max(1) as i64) as usize,
            Mode::Multi => target.clamp(0, self.max_index() as i64) as usize,
        }
    }

    pub fn go_to(&mut self, target: i64) -> Option<Transition> {
        if self.is_inert() {
            return None;
        }
        let from = self.current;
        self.current = self.normalize(target);
        Some(Transition {
            from,
            to: self.current,
        })
    }

    pub fn next(&mut self) -> Option<Transition> {
        match self.mode {
            Mode::Single => self.go_to(self.current as i64 + 1),
            Mode::Multi => {
                if self.current < self.max_index() {
                    self.go_to(self.current as i64 + 1)
                } else {
                    self.go_to(0)
                }
            }
        }
    }

    pub fn prev(&mut self) -> Option<Transition> {
        // Multi clamps at 0, so this is a no-op transition there.
        self.go_to(self.current as i64 - 1)
    }

    /// Uniform pick from `[0, slide_count)` excluding the current index.
    pub fn shuffle_target<R: Rng>(&self, rng: &mut R) -> Option<usize> {
        if self.slide_count < 2 {
            return None;
        }
        loop {
            let candidate = rng.random_range(0..self.slide_count);
            if candidate != self.current {
                return Some(candidate);
            }
        }
    }

    /// Target chosen by an autoplay tick: shuffle when armed, else `next()`.
    pub fn autoplay_step<R: Rng>(&mut self, rng: &mut R) -> Option<Transition> {
        if self.mode == Mode::Single && self.shuffle {
            match self.shuffle_target(rng) {
                Some(target) => return self.go_to(target as i64),
                None => debug!("shuffle skipped: fewer than two slides"),
            }
        }
        self.next()
    }

    /// Enter `Transitioning`. A newer transition supersedes an in-flight one.
    pub fn begin(&mut self, transition: Transition, token: CompletionToken) {
        self.phase = Phase::Transitioning {
            from: transition.from,
            to: transition.to,
            token,
        };
    }

    /// Settle if `token` belongs to the in-flight transition.
    pub fn complete(&mut self, token: CompletionToken) -> Option<usize> {
        match self.phase {
            Phase::Transitioning { to, token: live, .. } if live == token => {
                self.phase = Phase::Settled(to);
                Some(to)
            }
            _ => None,
        }
    }

    /// Settle at the current index regardless of any in-flight transition.
    pub fn settle(&mut self) -> usize {
        self.phase = Phase::Settled(self.current);
        self.current
    }

    /// Update how many slides are visible. Returns true when the current
    /// index had to be pulled back into range.
    pub fn set_per_view(&mut self, per_view: usize) -> bool {
        if self.mode == Mode::Single {
            return false;
        }
        self.per_view = per_view.max(1);
        let max = self.max_index();
        if self.current > max {
            self.current = max;
            return true;
        }
        false
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    pub fn toggle_playing(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    /// Shuffle exists only in single mode; returns the new flag if it changed.
    pub fn toggle_shuffle(&mut self) -> Option<bool> {
        if self.mode != Mode::Single {
            return None;
        }
        self.shuffle = !self.shuffle;
        Some(self.shuffle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn multi(count: usize, per_view: usize) -> CarouselState {
        let mut s = CarouselState::new(Mode::Multi, count);
        s.set_per_view(per_view);
        s
    }

    #[test]
    fn single_wraps_forward() {
        let mut s = CarouselState::new(Mode::Single, 8);
        for _ in 0..7 {
            s.next();
        }
        assert_eq!(s.current(), 7);
        assert_eq!(s.next(), Some(Transition { from: 7, to: 0 }));
    }

    #[test]
    fn single_wraps_both_ways() {
        let mut s = CarouselState::new(Mode::Single, 8);
        assert_eq!(s.go_to(8).unwrap().to, 0);
        assert_eq!(s.go_to(-1).unwrap().to, 7);
        assert_eq!(s.go_to(-9).unwrap().to, 7);
        s.go_to(0);
        assert_eq!(s.prev().unwrap().to, 7);
    }

    #[test]
    fn single_stays_in_range_over_long_sequences() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut s = CarouselState::new(Mode::Single, 5);
        for _ in 0..500 {
            if rng.random_bool(0.5) {
                s.next();
            } else {
                s.prev();
            }
            assert!(s.current() < 5);
        }
    }

    #[test]
    fn multi_clamps_and_loops() {
        let mut s = multi(6, 3);
        assert_eq!(s.max_index(), 3);
        assert_eq!(s.go_to(10).unwrap().to, 3);
        assert_eq!(s.next(), Some(Transition { from: 3, to: 0 }));
    }

    #[test]
    fn multi_prev_at_zero_is_noop() {
        let mut s = multi(6, 3);
        assert_eq!(s.prev(), Some(Transition { from: 0, to: 0 }));
        assert_eq!(s.current(), 0);
    }

    #[test]
    fn multi_stays_in_range_over_long_sequences() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut s = multi(9, 4);
        for _ in 0..500 {
            match rng.random_range(0..3) {
                0 => s.next(),
                1 => s.prev(),
                _ => s.go_to(rng.random_range(-20..20)),
            };
            assert!(s.current() <= s.max_index());
        }
    }

    #[test]
    fn goto_current_is_a_noop_transition() {
        let mut s = CarouselState::new(Mode::Single, 4);
        s.go_to(2);
        assert_eq!(s.go_to(2), Some(Transition { from: 2, to: 2 }));
    }

    #[test]
    fn inert_when_empty() {
        let mut s = CarouselState::new(Mode::Single, 0);
        assert!(s.is_inert());
        assert_eq!(s.next(), None);
        assert_eq!(s.prev(), None);
        assert_eq!(s.go_to(3), None);
        let mut m = CarouselState::new(Mode::Multi, 0);
        assert_eq!(m.next(), None);
    }

    #[test]
    fn shuffle_never_repeats_current() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut s = CarouselState::new(Mode::Single, 8);
        assert_eq!(s.toggle_shuffle(), Some(true));
        for _ in 0..1000 {
            let before = s.current();
            let t = s.autoplay_step(&mut rng).unwrap();
            assert_ne!(t.to, before);
        }
    }

    #[test]
    fn shuffle_with_one_slide_falls_back_to_next() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut s = CarouselState::new(Mode::Single, 1);
        s.toggle_shuffle();
        assert_eq!(s.shuffle_target(&mut rng), None);
        assert_eq!(s.autoplay_step(&mut rng), Some(Transition { from: 0, to: 0 }));
    }

    #[test]
    fn shuffle_not_available_in_multi() {
        let mut s = multi(6, 2);
        assert_eq!(s.toggle_shuffle(), None);
        assert!(!s.shuffle_enabled());
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut s = CarouselState::new(Mode::Single, 4);
        let t1 = s.next().unwrap();
        s.begin(t1, CompletionToken(1));
        let t2 = s.next().unwrap();
        s.begin(t2, CompletionToken(2));
        assert_eq!(s.complete(CompletionToken(1)), None);
        assert_eq!(s.complete(CompletionToken(2)), Some(2));
        assert_eq!(s.phase(), Phase::Settled(2));
    }

    #[test]
    fn shrinking_viewport_keeps_index_valid() {
        let mut s = multi(6, 2);
        s.go_to(4);
        assert!(s.set_per_view(4));
        assert_eq!(s.current(), 2);
        assert!(!s.set_per_view(1));
    }
}
