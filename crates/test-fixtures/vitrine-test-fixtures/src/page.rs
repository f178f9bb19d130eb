//! A whole test page: tree, clock and renderer, plus markup builders.

use vitrine_carousel_core::{Config, Host, InstanceId, Registry, UiTree};

use crate::renderer::RecordingRenderer;
use crate::timers::VirtualTimers;
use crate::tree::{MemoryTree, NodeId};

#[derive(Debug)]
pub struct Page {
    pub tree: MemoryTree,
    pub timers: VirtualTimers,
    pub renderer: RecordingRenderer,
    attach_renderer: bool,
}

impl Page {
    pub fn new(tree: MemoryTree) -> Self {
        Self {
            tree,
            timers: VirtualTimers::new(),
            renderer: RecordingRenderer::new(),
            attach_renderer: true,
        }
    }

    /// Page whose host exposes no animation backend at all.
    pub fn without_renderer(tree: MemoryTree) -> Self {
        Self {
            attach_renderer: false,
            ..Self::new(tree)
        }
    }

    pub fn host(&mut self) -> Host<'_, MemoryTree> {
        let host = Host::new(&mut self.tree, &mut self.timers);
        if self.attach_renderer {
            host.with_renderer(&mut self.renderer)
        } else {
            host
        }
    }

    /// Registry with `config`, bound against this page.
    pub fn bind(&mut self, config: Config) -> (Registry<NodeId>, Vec<InstanceId>) {
        let mut registry = Registry::new(config);
        let ids = registry.discover_and_bind(&mut self.host());
        (registry, ids)
    }

    /// Run the clock forward `ms`, routing every firing due on the way.
    pub fn advance(&mut self, registry: &mut Registry<NodeId>, ms: u64) {
        let until = self.timers.now() + ms;
        while let Some((owner, handle)) = self.timers.pop_due(until) {
            // Firings for torn-down owners are dropped, as a real host would.
            let _ = registry.on_timer(owner, handle, &mut self.host());
        }
        self.timers.set_now(until);
    }

    /// Complete every in-flight tween: apply its end value and report back.
    pub fn finish_animations(&mut self, registry: &mut Registry<NodeId>) {
        for animation in self.renderer.finish_all() {
            let (name, css) = animation.property.css(animation.value);
            self.tree.set_style(&animation.target, name, &css);
            if let Some(done) = animation.completion {
                let _ = registry.on_animation_complete(done.owner, done.token, &mut self.host());
            }
        }
    }
}

/// Full-bleed image carousel markup with `slides` slide children.
pub fn image_carousel(tree: &mut MemoryTree, slides: usize) -> NodeId {
    let doc = tree.document();
    let root = tree.element(doc, "section#imageCarousel");
    tree.element(root, "div#carouselLoading");
    let viewport = tree.element(root, "div.overflow-hidden");
    tree.set_width(viewport, 1200.0);
    let track = tree.element(viewport, "div#carouselTrack");
    for _ in 0..slides {
        let slide = tree.element(track, "div.carousel-slide");
        tree.set_width(slide, 1200.0);
    }
    for control in [
        "button#prevBtn",
        "button#nextBtn",
        "button#playPauseBtn",
        "button#shuffleBtn",
        "button#fullscreenBtn",
    ] {
        tree.element(root, control);
    }
    tree.element(root, "span#currentIndex");
    tree.element(root, "span#totalImages");
    tree.element(root, "div#progressBar");
    tree.element(root, "div#thumbnailNav");
    root
}

#[derive(Debug, Clone, Copy)]
pub struct SectionLayout {
    pub cards: usize,
    pub card_width: f32,
    /// `None` when the track cannot report a gap.
    pub gap: Option<f32>,
    pub viewport_width: f32,
}

impl Default for SectionLayout {
    fn default() -> Self {
        Self {
            cards: 6,
            card_width: 300.0,
            gap: Some(32.0),
            viewport_width: 1000.0,
        }
    }
}

/// Property-card section using the same ids every section on the page uses.
pub fn property_section(tree: &mut MemoryTree, layout: SectionLayout) -> NodeId {
    let doc = tree.document();
    let section = tree.element(doc, "section.py-20");
    let container = tree.element(section, "div.carousel-container");
    let viewport = tree.element(container, "div.overflow-hidden");
    tree.set_width(viewport, layout.viewport_width);
    let track = tree.element(viewport, "div#carouselTrack.flex");
    tree.set_gap(track, layout.gap);
    for _ in 0..layout.cards {
        let card = tree.element(track, "div.property-card");
        tree.set_width(card, layout.card_width);
    }
    tree.element(container, "button#prevBtn");
    tree.element(container, "button#nextBtn");
    tree.element(section, "div#dotsContainer");
    section
}

/// Track of the carousel rooted at `root`.
pub fn track_of(tree: &MemoryTree, root: NodeId) -> NodeId {
    tree.find_in(root, "#carouselTrack")
        .unwrap_or_else(|| panic!("no track under {root:?}"))
}
