//! Renderer that records tween requests and completes them on demand.

use vitrine_carousel_core::{Animation, Completion, Renderer};

use crate::tree::NodeId;

#[derive(Debug)]
pub struct RecordingRenderer {
    available: bool,
    log: Vec<Animation<NodeId>>,
    in_flight: Vec<Animation<NodeId>>,
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self {
            available: true,
            log: Vec::new(),
            in_flight: Vec::new(),
        }
    }

    /// A backend that declines every request, as when no tween library loaded.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Every accepted request, oldest first.
    pub fn log(&self) -> &[Animation<NodeId>] {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Completions the host still owes the engine.
    pub fn pending_completions(&self) -> Vec<Completion> {
        self.in_flight.iter().filter_map(|a| a.completion).collect()
    }

    /// Finish every in-flight tween, returning them in request order.
    pub fn finish_all(&mut self) -> Vec<Animation<NodeId>> {
        std::mem::take(&mut self.in_flight)
    }
}

impl Renderer<NodeId> for RecordingRenderer {
    fn animate_to(&mut self, animation: Animation<NodeId>) -> bool {
        if !self.available {
            return false;
        }
        self.log.push(animation.clone());
        self.in_flight.push(animation);
        true
    }
}
