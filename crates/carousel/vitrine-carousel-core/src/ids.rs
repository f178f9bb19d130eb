//! Identifiers and simple allocators for carousel entities.

use serde::{Deserialize, Serialize};

/// Opaque handle for one bound carousel.
/// Never derived from page-level element identifiers, which may repeat.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

/// Token tying a renderer completion back to the transition that requested it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CompletionToken(pub u32);

/// Handle returned when subscribing to effect hooks.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u32);

/// Timer handle issued by the host's timer implementation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(pub u32);

/// Monotonic allocator for InstanceId, CompletionToken and SubscriptionId.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_instance: u32,
    next_token: u32,
    next_subscription: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_instance(&mut self) -> InstanceId {
        let id = InstanceId(self.next_instance);
        self.next_instance = self.next_instance.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_token(&mut self) -> CompletionToken {
        let id = CompletionToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_subscription(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription = self.next_subscription.wrapping_add(1);
        id
    }
}
