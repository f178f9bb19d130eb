//! Lifecycle events and the effect hook registry.
//!
//! Decorative effect code (entrance animations, parallax, counters) subscribes
//! here. The engine does not know what, if anything, is listening.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{IdAllocator, InstanceId, SubscriptionId};

/// Discrete signals emitted by an instance, in emission order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
#[non_exhaustive]
pub enum CarouselEvent {
    /// Emitted before the renderer is commanded.
    PositionChanging { from: usize, to: usize },
    /// The move to `index` finished (animated or snapped).
    PositionChanged { index: usize },
    PlayStateChanged { playing: bool },
    ShuffleChanged { enabled: bool },
    FullscreenRequested { entering: bool },
    /// Bound, preloaded and accepting input.
    Ready,
}

pub type HookFn = Box<dyn FnMut(InstanceId, &CarouselEvent)>;

#[derive(Default)]
pub struct EffectHooks {
    ids: IdAllocator,
    subscribers: Vec<(SubscriptionId, HookFn)>,
}

impl fmt::Debug for EffectHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectHooks")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl EffectHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, hook: F) -> SubscriptionId
    where
        F: FnMut(InstanceId, &CarouselEvent) + 'static,
    {
        let id = self.ids.alloc_subscription();
        self.subscribers.push((id, Box::new(hook)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Deliver to every subscriber in subscription order.
    pub fn emit(&mut self, owner: InstanceId, event: &CarouselEvent) {
        for (_, hook) in self.subscribers.iter_mut() {
            hook(owner, event);
        }
    }
}
