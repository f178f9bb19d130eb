//! Host seams: page tree, animation backend and timers.
//!
//! The engine never touches a real page. Adapters (WASM/DOM, in-memory test
//! pages) implement these traits and hand them to the registry for the
//! duration of one operation through [`Host`].

use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::ids::{CompletionToken, InstanceId, TimerHandle};

/// Element lookup and mutation over a page tree.
///
/// Everything except [`UiTree::query_document`] is scoped to a subtree root.
/// Only the registry calls `query_document`, once, during discovery.
pub trait UiTree {
    type Node: Clone + Eq + Hash + Debug;

    /// Every match in the whole page, in document order.
    fn query_document(&self, selector: &str) -> Vec<Self::Node>;
    /// First descendant of `root` matching `selector`.
    fn query(&self, root: &Self::Node, selector: &str) -> Option<Self::Node>;
    /// All descendants of `root` matching `selector`, in document order.
    fn query_all(&self, root: &Self::Node, selector: &str) -> Vec<Self::Node>;
    /// `node` itself or its nearest ancestor matching `selector`.
    fn closest(&self, node: &Self::Node, selector: &str) -> Option<Self::Node>;
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Laid-out width in px; 0.0 when the node is not rendered.
    fn width(&self, node: &Self::Node) -> f32;
    /// Flex/grid gap in px, when the tree can report one.
    fn gap(&self, node: &Self::Node) -> Option<f32>;

    fn set_class(&mut self, node: &Self::Node, class: &str, on: bool);
    fn set_text(&mut self, node: &Self::Node, text: &str);
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str);
    fn append_child(&mut self, parent: &Self::Node, tag: &str, classes: &[&str])
        -> Option<Self::Node>;
    fn clear_children(&mut self, node: &Self::Node);

    fn request_fullscreen(&mut self, node: &Self::Node);
    fn exit_fullscreen(&mut self);
    fn is_fullscreen(&self) -> bool;
}

/// Animated property understood by renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Property {
    /// Horizontal translation as a percentage of the element width.
    TranslateXPercent,
    TranslateXPx,
    WidthPercent,
    Opacity,
    Scale,
}

impl Property {
    /// CSS declaration used for a non-animated snap.
    pub fn css(self, value: f32) -> (&'static str, String) {
        match self {
            Property::TranslateXPercent => ("transform", format!("translateX({value}%)")),
            Property::TranslateXPx => ("transform", format!("translateX({value}px)")),
            Property::WidthPercent => ("width", format!("{value}%")),
            Property::Opacity => ("opacity", format!("{value}")),
            Property::Scale => ("transform", format!("scale({value})")),
        }
    }
}

/// Completion address: which instance asked, and for which transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Completion {
    pub owner: InstanceId,
    pub token: CompletionToken,
}

/// One tween request.
#[derive(Clone, Debug, PartialEq)]
pub struct Animation<N> {
    pub target: N,
    pub property: Property,
    pub value: f32,
    pub duration_ms: u32,
    pub easing: String,
    /// When set, the host must call `Registry::on_animation_complete` once done.
    pub completion: Option<Completion>,
}

/// Animation backend. Easing and interpolation live entirely on the host side.
pub trait Renderer<N> {
    /// Start (or retarget) a tween. Returns `false` when the backend cannot
    /// animate; the engine then snaps and settles on its own.
    fn animate_to(&mut self, animation: Animation<N>) -> bool;
}

/// Timer backend. Firings come back through `Registry::on_timer`.
pub trait TimerHost {
    fn set_interval(&mut self, owner: InstanceId, period_ms: u32) -> TimerHandle;
    fn set_timeout(&mut self, owner: InstanceId, delay_ms: u32) -> TimerHandle;
    fn clear(&mut self, handle: TimerHandle);
}

/// Borrowed host services for one engine operation.
pub struct Host<'a, T: UiTree> {
    pub tree: &'a mut T,
    pub renderer: Option<&'a mut dyn Renderer<T::Node>>,
    pub timers: &'a mut dyn TimerHost,
}

impl<'a, T: UiTree> Host<'a, T> {
    /// Host without an animation backend: every move is an immediate snap.
    pub fn new(tree: &'a mut T, timers: &'a mut dyn TimerHost) -> Self {
        Self {
            tree,
            renderer: None,
            timers,
        }
    }

    pub fn with_renderer(mut self, renderer: &'a mut dyn Renderer<T::Node>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }

    /// Run `animation`, or apply its end state directly when no backend takes it.
    /// Returns whether the renderer accepted (and will report completion).
    pub(crate) fn animate_or_snap(&mut self, animation: Animation<T::Node>) -> bool {
        let snap_target = animation.target.clone();
        let (property, value) = (animation.property, animation.value);
        let accepted = match self.renderer.as_deref_mut() {
            Some(renderer) => renderer.animate_to(animation),
            None => false,
        };
        if !accepted {
            self.snap(&snap_target, property, value);
        }
        accepted
    }

    pub(crate) fn snap(&mut self, node: &T::Node, property: Property, value: f32) {
        let (name, css) = property.css(value);
        self.tree.set_style(node, name, &css);
    }
}
