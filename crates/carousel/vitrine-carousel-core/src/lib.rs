//! Vitrine Carousel Core (host-agnostic)
//!
//! Scoped carousel engine: one independent instance per carousel root found on
//! the page, each with its own navigation state, autoplay timer, gesture and
//! keyboard handling, and responsive paging. Page access, animation and timers
//! are provided by the host through the traits in [`host`].

pub mod config;
pub mod error;
pub mod events;
pub mod geometry;
pub mod host;
pub mod ids;
pub mod input;
pub mod instance;
pub mod machine;
pub mod registry;
pub mod scheduler;

// Re-exports for consumers (adapters)
pub use config::{Config, MultiConfig, MultiSelectors, SingleConfig, SingleSelectors, SlideSpec};
pub use error::{BindError, CarouselError, ConfigError};
pub use events::{CarouselEvent, EffectHooks};
pub use geometry::Geometry;
pub use host::{Animation, Completion, Host, Property, Renderer, TimerHost, UiTree};
pub use ids::{CompletionToken, IdAllocator, InstanceId, SubscriptionId, TimerHandle};
pub use input::{Control, InputAdapter, InputEvent, Intent, Key};
pub use instance::{CarouselInstance, Origin};
pub use machine::{CarouselState, Mode, Phase, Transition};
pub use registry::{Registry, DEFAULT_SHUFFLE_SEED};
pub use scheduler::{AutoplayScheduler, Firing};
