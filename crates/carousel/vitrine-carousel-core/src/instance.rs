//! One bound carousel.
//!
//! An instance owns the element handles found under its own root, its state
//! machine, autoplay scheduler, input adapter and shuffle rng. Every lookup
//! goes through the owning root, so identical ids in another root are never
//! seen. State changes only through [`CarouselInstance::apply`] and the host
//! callbacks the registry routes here.

use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use log::{debug, trace};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::{Config, MultiConfig, SingleConfig};
use crate::error::BindError;
use crate::events::CarouselEvent;
use crate::geometry::Geometry;
use crate::host::{Animation, Completion, Host, Property, UiTree};
use crate::ids::{CompletionToken, IdAllocator, InstanceId, TimerHandle};
use crate::input::{Control, InputAdapter, InputEvent, Intent, Key};
use crate::machine::{CarouselState, Mode, Phase, Transition};
use crate::scheduler::{AutoplayScheduler, Firing};

/// Where an intent came from. Manual navigation gets a fresh idle period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    Manual,
    Autoplay,
}

#[derive(Debug)]
struct SingleParts<N> {
    track: N,
    thumbnails: Vec<N>,
    counter: Option<N>,
    total: Option<N>,
    progress: Option<N>,
    play_pause: Option<N>,
    shuffle: Option<N>,
    loading: Option<N>,
    controls: Vec<(N, Control)>,
}

#[derive(Debug)]
struct MultiParts<N> {
    container: N,
    viewport: N,
    track: N,
    cards: Vec<N>,
    dots: Vec<N>,
    controls: Vec<(N, Control)>,
}

#[derive(Debug)]
enum Parts<N> {
    Single(SingleParts<N>),
    Multi(MultiParts<N>),
}

#[derive(Debug)]
pub struct CarouselInstance<N> {
    id: InstanceId,
    root: N,
    parts: Parts<N>,
    state: CarouselState,
    scheduler: AutoplayScheduler,
    input: InputAdapter,
    tokens: IdAllocator,
    rng: Pcg32,
    config: Rc<Config>,
    ready: bool,
    torn_down: bool,
    preload: Vec<String>,
    /// Completion of the loading overlay fade, if one is running.
    loading_fade: Option<CompletionToken>,
    events: Vec<CarouselEvent>,
}

fn find_controls<T: UiTree>(
    tree: &T,
    root: &T::Node,
    wanted: &[(&str, Control)],
) -> Vec<(T::Node, Control)> {
    wanted
        .iter()
        .filter_map(|(sel, control)| tree.query(root, sel).map(|n| (n, *control)))
        .collect()
}

fn build_thumbnails<T: UiTree>(
    tree: &mut T,
    nav: &T::Node,
    cfg: &SingleConfig,
    count: usize,
) -> Vec<T::Node> {
    tree.clear_children(nav);
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let Some(thumb) = tree.append_child(nav, "div", &["thumbnail"]) else {
            continue;
        };
        tree.set_attribute(&thumb, "data-slide", &i.to_string());
        match cfg.slides.get(i) {
            Some(slide) => {
                tree.set_attribute(&thumb, "title", &slide.title);
                tree.set_style(&thumb, "background-image", &format!("url({})", slide.image));
            }
            None => tree.set_attribute(&thumb, "title", &format!("Slide {}", i + 1)),
        }
        out.push(thumb);
    }
    out
}

fn build_dots<T: UiTree>(
    tree: &mut T,
    container: &T::Node,
    cfg: &MultiConfig,
    count: usize,
) -> Vec<T::Node> {
    tree.clear_children(container);
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let Some(dot) = tree.append_child(container, "button", &[cfg.dot_class.as_str()]) else {
            continue;
        };
        tree.set_attribute(&dot, "type", "button");
        tree.set_attribute(&dot, "aria-label", &format!("Go to slide {}", i + 1));
        out.push(dot);
    }
    out
}

impl<N: Clone + Eq + Hash + Debug> CarouselInstance<N> {
    fn assemble(
        id: InstanceId,
        root: N,
        parts: Parts<N>,
        state: CarouselState,
        config: Rc<Config>,
        seed: u64,
        fullscreen_key: Option<char>,
    ) -> Self {
        Self {
            id,
            root,
            parts,
            state,
            scheduler: AutoplayScheduler::new(id, config.autoplay_interval_ms, config.resume_grace_ms),
            input: InputAdapter::new(config.swipe_threshold, config.coordinate_limit, fullscreen_key),
            tokens: IdAllocator::new(),
            rng: Pcg32::seed_from_u64(seed.wrapping_add(u64::from(id.0))),
            config,
            ready: false,
            torn_down: false,
            preload: Vec::new(),
            loading_fade: None,
            events: Vec::new(),
        }
    }

    /// Bind the full-bleed carousel under `root`. Only the track is required.
    pub(crate) fn bind_single<T: UiTree<Node = N>>(
        id: InstanceId,
        root: N,
        config: Rc<Config>,
        seed: u64,
        host: &mut Host<'_, T>,
    ) -> Result<Self, BindError> {
        let cfg = &config.single;
        let sel = &cfg.selectors;
        let tree = &mut *host.tree;

        let track = tree
            .query(&root, &sel.track)
            .ok_or_else(|| BindError::missing(&sel.track))?;
        let count = if cfg.slides.is_empty() {
            tree.children(&track).len()
        } else {
            cfg.slides.len()
        };
        let controls = find_controls(
            tree,
            &root,
            &[
                (sel.prev.as_str(), Control::Prev),
                (sel.next.as_str(), Control::Next),
                (sel.play_pause.as_str(), Control::PlayPause),
                (sel.shuffle.as_str(), Control::Shuffle),
                (sel.fullscreen.as_str(), Control::Fullscreen),
            ],
        );
        let thumbnails = match tree.query(&root, &sel.thumbnail_nav) {
            Some(nav) => build_thumbnails(tree, &nav, cfg, count),
            None => Vec::new(),
        };
        let parts = SingleParts {
            track,
            thumbnails,
            counter: tree.query(&root, &sel.counter),
            total: tree.query(&root, &sel.total),
            progress: tree.query(&root, &sel.progress),
            play_pause: tree.query(&root, &sel.play_pause),
            shuffle: tree.query(&root, &sel.shuffle),
            loading: tree.query(&root, &sel.loading),
            controls,
        };

        let mut state = CarouselState::new(Mode::Single, count);
        state.set_playing(cfg.start_playing);
        let preload: Vec<String> = cfg
            .slides
            .iter()
            .map(|s| s.image.clone())
            .filter(|s| !s.is_empty())
            .collect();
        let fullscreen_key = Some(cfg.fullscreen_key);

        let mut inst = Self::assemble(
            id,
            root,
            Parts::Single(parts),
            state,
            config.clone(),
            seed,
            fullscreen_key,
        );
        inst.preload = preload;
        inst.render_indicators(host, false);
        if inst.preload.is_empty() {
            inst.become_ready(host);
        }
        Ok(inst)
    }

    /// Bind one paginated carousel inside `section`.
    pub(crate) fn bind_multi<T: UiTree<Node = N>>(
        id: InstanceId,
        section: N,
        config: Rc<Config>,
        seed: u64,
        host: &mut Host<'_, T>,
    ) -> Result<Self, BindError> {
        let cfg = &config.multi;
        let sel = &cfg.selectors;
        let tree = &mut *host.tree;

        let container = tree
            .query(&section, &sel.container)
            .ok_or_else(|| BindError::missing(&sel.container))?;
        let track = tree
            .query(&section, &sel.track)
            .ok_or_else(|| BindError::missing(&sel.track))?;
        let dots_container = tree
            .query(&section, &sel.dots)
            .ok_or_else(|| BindError::missing(&sel.dots))?;
        let viewport = tree
            .query(&container, &sel.viewport)
            .unwrap_or_else(|| container.clone());
        let cards = tree.query_all(&track, &sel.card);
        let controls = find_controls(
            tree,
            &section,
            &[
                (sel.prev.as_str(), Control::Prev),
                (sel.next.as_str(), Control::Next),
            ],
        );
        let dots = build_dots(tree, &dots_container, cfg, cards.len());

        let mut state = CarouselState::new(Mode::Multi, cards.len());
        state.set_playing(cfg.start_playing);
        let parts = MultiParts {
            container,
            viewport,
            track,
            cards,
            dots,
            controls,
        };

        let mut inst =
            Self::assemble(id, section, Parts::Multi(parts), state, config.clone(), seed, None);
        let per_view = inst.measure(&*host.tree).map(|g| g.per_view()).unwrap_or(1);
        inst.state.set_per_view(per_view);
        inst.snap_track(host);
        inst.render_indicators(host, false);
        inst.become_ready(host);
        Ok(inst)
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    pub fn root(&self) -> &N {
        &self.root
    }

    pub fn current_index(&self) -> usize {
        self.state.current()
    }

    pub fn slide_count(&self) -> usize {
        self.state.slide_count()
    }

    pub fn per_view(&self) -> usize {
        self.state.per_view()
    }

    pub fn max_index(&self) -> usize {
        self.state.max_index()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    pub fn shuffle_enabled(&self) -> bool {
        self.state.shuffle_enabled()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_hovered(&self) -> bool {
        self.input.is_hovered()
    }

    pub fn is_autoplay_armed(&self) -> bool {
        self.scheduler.is_armed()
    }

    pub fn in_resume_grace(&self) -> bool {
        self.scheduler.in_grace()
    }

    /// Images the host should preload before calling `preload_finished`.
    pub fn preload_urls(&self) -> &[String] {
        &self.preload
    }

    /// Region whose hover gates keyboard input and suspends autoplay.
    pub fn interaction_region(&self) -> &N {
        match &self.parts {
            Parts::Single(_) => &self.root,
            Parts::Multi(p) => &p.container,
        }
    }

    /// Element that receives touch/pointer drags.
    pub fn drag_surface(&self) -> &N {
        match &self.parts {
            Parts::Single(p) => &p.track,
            Parts::Multi(p) => &p.track,
        }
    }

    pub fn controls(&self) -> &[(N, Control)] {
        match &self.parts {
            Parts::Single(p) => &p.controls,
            Parts::Multi(p) => &p.controls,
        }
    }

    /// Directly selectable indicators: thumbnails or pagination dots.
    pub fn selectables(&self) -> Vec<(N, usize)> {
        let nodes = match &self.parts {
            Parts::Single(p) => &p.thumbnails,
            Parts::Multi(p) => &p.dots,
        };
        nodes.iter().cloned().zip(0..).collect()
    }

    /// Cards of a multi-card track; clicks arrive as `InputEvent::SelectCard`.
    pub fn cards(&self) -> &[N] {
        match &self.parts {
            Parts::Single(_) => &[],
            Parts::Multi(p) => p.cards.as_slice(),
        }
    }

    pub(crate) fn drain_events(&mut self) -> Vec<CarouselEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: CarouselEvent) {
        self.events.push(event);
    }

    fn measure<T: UiTree<Node = N>>(&self, tree: &T) -> Option<Geometry> {
        match &self.parts {
            Parts::Multi(p) => Some(Geometry::measure(
                tree,
                &p.viewport,
                &p.track,
                p.cards.first(),
                self.config.multi.fallback_gap,
            )),
            Parts::Single(_) => None,
        }
    }

    /// Autoplay runs only while nothing holds it back.
    fn should_run(&self) -> bool {
        self.ready
            && !self.torn_down
            && !self.state.is_inert()
            && self.state.is_playing()
            && !self.input.is_hovered()
            && !self.input.is_dragging()
            && !self.scheduler.in_grace()
    }

    fn sync_autoplay<T: UiTree<Node = N>>(&mut self, host: &mut Host<'_, T>) {
        let run = self.should_run();
        self.scheduler.sync(run, &mut *host.timers);
    }

    fn reset_autoplay<T: UiTree<Node = N>>(&mut self, host: &mut Host<'_, T>) {
        if self.should_run() {
            self.scheduler.reset(&mut *host.timers);
        } else {
            self.scheduler.disarm(&mut *host.timers);
        }
    }

    /// Suspend now, re-arm after the grace interval.
    fn pause_then_resume<T: UiTree<Node = N>>(&mut self, host: &mut Host<'_, T>) {
        self.scheduler.start_grace(&mut *host.timers);
        self.sync_autoplay(host);
    }

    fn become_ready<T: UiTree<Node = N>>(&mut self, host: &mut Host<'_, T>) {
        if self.ready || self.torn_down {
            return;
        }
        self.ready = true;
        if let Some(loading) = self.loading_overlay() {
            let token = self.tokens.alloc_token();
            // The faded overlay must not swallow clicks meant for the controls.
            host.tree.set_style(&loading, "pointer-events", "none");
            host.tree.set_attribute(&loading, "aria-hidden", "true");
            let fading = host.animate_or_snap(Animation {
                target: loading.clone(),
                property: Property::Opacity,
                value: 0.0,
                duration_ms: 500,
                easing: self.config.single.easing.clone(),
                completion: Some(Completion {
                    owner: self.id,
                    token,
                }),
            });
            if fading {
                self.loading_fade = Some(token);
            } else {
                host.tree.set_style(&loading, "display", "none");
            }
        }
        self.emit(CarouselEvent::Ready);
        self.sync_autoplay(host);
    }

    fn loading_overlay(&self) -> Option<N> {
        match &self.parts {
            Parts::Single(p) => p.loading.clone(),
            Parts::Multi(_) => None,
        }
    }

    /// Track property and value that show `index`.
    fn track_motion<T: UiTree<Node = N>>(&self, tree: &T, index: usize) -> (N, Property, f32) {
        match &self.parts {
            Parts::Single(p) => (p.track.clone(), Property::TranslateXPercent, 0.0 - index as f32 * 100.0),
            Parts::Multi(p) => {
                let offset = self.measure(tree).map(|g| g.offset_for(index)).unwrap_or(0.0);
                (p.track.clone(), Property::TranslateXPx, offset)
            }
        }
    }

    fn snap_track<T: UiTree<Node = N>>(&mut self, host: &mut Host<'_, T>) {
        let (track, property, value) = self.track_motion(&*host.tree, self.state.current());
        host.snap(&track, property, value);
    }

    /// Emit `PositionChanging`, command the renderer, settle if it declines.
    fn present<T: UiTree<Node = N>>(
        &mut self,
        transition: Transition,
        animate: bool,
        host: &mut Host<'_, T>,
    ) {
        trace!(
            "carousel {:?}: {} -> {} (animate={})",
            self.id,
            transition.from,
            transition.to,
            animate
        );
        self.emit(CarouselEvent::PositionChanging {
            from: transition.from,
            to: transition.to,
        });
        let token = self.tokens.alloc_token();
        self.state.begin(transition, token);

        let (track, property, value) = self.track_motion(&*host.tree, transition.to);
        let (duration_ms, easing) = match self.state.mode() {
            Mode::Single => (self.config.single.transition_ms, self.config.single.easing.clone()),
            Mode::Multi => (self.config.multi.transition_ms, self.config.multi.easing.clone()),
        };
        let accepted = if animate {
            host.animate_or_snap(Animation {
                target: track,
                property,
                value,
                duration_ms,
                easing,
                completion: Some(Completion {
                    owner: self.id,
                    token,
                }),
            })
        } else {
            host.snap(&track, property, value);
            false
        };
        if !accepted {
            if !animate || !host.has_renderer() {
                trace!("carousel {:?}: settled without animation", self.id);
            } else {
                debug!("carousel {:?}: renderer declined, snapping", self.id);
            }
            let index = self.state.settle();
            self.emit(CarouselEvent::PositionChanged { index });
        }
        self.render_indicators(host, animate);
    }

    /// Active-state indication: counter, thumbnails, dots, progress, buttons.
    fn render_indicators<T: UiTree<Node = N>>(&self, host: &mut Host<'_, T>, animate: bool) {
        let current = self.state.current();
        let count = self.state.slide_count();
        match &self.parts {
            Parts::Single(p) => {
                let cfg = &self.config.single;
                if let Some(counter) = &p.counter {
                    let shown = if count == 0 { 0 } else { current + 1 };
                    host.tree.set_text(counter, &shown.to_string());
                }
                if let Some(total) = &p.total {
                    host.tree.set_text(total, &count.to_string());
                }
                for (i, thumb) in p.thumbnails.iter().enumerate() {
                    host.tree.set_class(thumb, &cfg.active_class, i == current);
                }
                if let (Some(bar), true) = (&p.progress, count > 0) {
                    let width = (current + 1) as f32 * 100.0 / count as f32;
                    if animate {
                        host.animate_or_snap(Animation {
                            target: bar.clone(),
                            property: Property::WidthPercent,
                            value: width,
                            duration_ms: cfg.progress_ms,
                            easing: cfg.easing.clone(),
                            completion: None,
                        });
                    } else {
                        host.snap(bar, Property::WidthPercent, width);
                    }
                }
                if let Some(btn) = &p.play_pause {
                    let playing = self.state.is_playing();
                    let label = if playing { &cfg.pause_label } else { &cfg.play_label };
                    host.tree.set_text(btn, label);
                    host.tree.set_class(btn, &cfg.active_class, playing);
                }
                if let Some(btn) = &p.shuffle {
                    host.tree
                        .set_class(btn, &cfg.active_class, self.state.shuffle_enabled());
                }
            }
            Parts::Multi(p) => {
                let cfg = &self.config.multi;
                for (i, dot) in p.dots.iter().enumerate() {
                    let active = i == current;
                    for class in &cfg.dot_active_classes {
                        host.tree.set_class(dot, class, active);
                    }
                    for class in &cfg.dot_inactive_classes {
                        host.tree.set_class(dot, class, !active);
                    }
                }
                // Card emphasis is decoration; skip it entirely without a renderer.
                if host.has_renderer() {
                    for (i, card) in p.cards.iter().enumerate() {
                        let active = i == current;
                        let (scale, opacity) = if active {
                            (cfg.active_scale, cfg.active_opacity)
                        } else {
                            (cfg.inactive_scale, cfg.inactive_opacity)
                        };
                        for (property, value) in [(Property::Scale, scale), (Property::Opacity, opacity)] {
                            host.animate_or_snap(Animation {
                                target: card.clone(),
                                property,
                                value,
                                duration_ms: cfg.card_fade_ms,
                                easing: cfg.easing.clone(),
                                completion: None,
                            });
                        }
                    }
                }
            }
        }
    }

    fn navigated<T: UiTree<Node = N>>(
        &mut self,
        transition: Option<Transition>,
        origin: Origin,
        host: &mut Host<'_, T>,
    ) {
        let Some(transition) = transition else {
            debug!("carousel {:?}: navigation ignored, no slides", self.id);
            return;
        };
        self.present(transition, true, host);
        match (self.state.mode(), origin) {
            (Mode::Single, _) => self.reset_autoplay(host),
            (Mode::Multi, Origin::Manual) => self.pause_then_resume(host),
            (Mode::Multi, Origin::Autoplay) => {}
        }
    }

    /// Apply one intent. Ignored until the instance is ready.
    pub fn apply<T: UiTree<Node = N>>(
        &mut self,
        intent: Intent,
        origin: Origin,
        host: &mut Host<'_, T>,
    ) {
        if !self.ready || self.torn_down {
            debug!("carousel {:?}: {:?} ignored, not ready", self.id, intent);
            return;
        }
        match intent {
            Intent::Next => {
                let t = self.state.next();
                self.navigated(t, origin, host);
            }
            Intent::Prev => {
                let t = self.state.prev();
                self.navigated(t, origin, host);
            }
            Intent::GoTo(index) => {
                let t = self.state.go_to(i64::try_from(index).unwrap_or(i64::MAX));
                self.navigated(t, origin, host);
            }
            Intent::TogglePlay => {
                let playing = self.state.toggle_playing();
                self.emit(CarouselEvent::PlayStateChanged { playing });
                self.render_indicators(host, false);
                self.sync_autoplay(host);
            }
            Intent::ToggleShuffle => {
                if let Some(enabled) = self.state.toggle_shuffle() {
                    self.emit(CarouselEvent::ShuffleChanged { enabled });
                    self.render_indicators(host, false);
                }
            }
            Intent::ToggleFullscreen => {
                if self.state.mode() != Mode::Single {
                    return;
                }
                let entering = !host.tree.is_fullscreen();
                if entering {
                    host.tree.request_fullscreen(&self.root);
                } else {
                    host.tree.exit_fullscreen();
                }
                self.emit(CarouselEvent::FullscreenRequested { entering });
            }
        }
    }

    /// Route raw input from this instance's own region.
    pub fn handle<T: UiTree<Node = N>>(&mut self, event: InputEvent, host: &mut Host<'_, T>) {
        if self.torn_down {
            return;
        }
        match event {
            InputEvent::PointerEnter => {
                self.input.pointer_enter();
                self.sync_autoplay(host);
            }
            InputEvent::PointerLeave => {
                self.input.pointer_leave();
                self.sync_autoplay(host);
            }
            InputEvent::DragStart { x, y } => {
                if self.ready && self.input.drag_start(x, y) {
                    self.sync_autoplay(host);
                }
            }
            InputEvent::DragEnd { x, y } => {
                if !self.input.is_dragging() {
                    return;
                }
                match self.input.drag_end(x, y) {
                    Some(intent) => self.apply(intent, Origin::Manual, host),
                    None => self.drag_released(host),
                }
            }
            InputEvent::DragCancel => {
                if self.input.is_dragging() {
                    self.input.drag_cancel();
                    self.drag_released(host);
                }
            }
            InputEvent::Control(control) => {
                let intent = self.input.control(control);
                self.apply(intent, Origin::Manual, host);
            }
            InputEvent::Select(index) => {
                let intent = self.input.select(index);
                self.apply(intent, Origin::Manual, host);
            }
            InputEvent::SelectCard(index) => {
                if let Some(intent) = self.input.select_card(index, self.state.current()) {
                    self.apply(intent, Origin::Manual, host);
                }
            }
        }
    }

    /// A drag ended without navigating.
    fn drag_released<T: UiTree<Node = N>>(&mut self, host: &mut Host<'_, T>) {
        match self.state.mode() {
            Mode::Single => self.sync_autoplay(host),
            Mode::Multi => self.pause_then_resume(host),
        }
    }

    /// Keyboard input. Returns whether this instance acted on the key.
    pub fn key<T: UiTree<Node = N>>(&mut self, key: Key, host: &mut Host<'_, T>) -> bool {
        if !self.ready || self.torn_down {
            return false;
        }
        match self.input.key(key) {
            Some(intent) => {
                self.apply(intent, Origin::Manual, host);
                true
            }
            None => false,
        }
    }

    pub(crate) fn on_timer<T: UiTree<Node = N>>(&mut self, handle: TimerHandle, host: &mut Host<'_, T>) {
        match self.scheduler.classify(handle) {
            Firing::Tick => {
                if self.should_run() {
                    let t = self.state.autoplay_step(&mut self.rng);
                    self.navigated(t, Origin::Autoplay, host);
                } else {
                    self.sync_autoplay(host);
                }
            }
            Firing::GraceOver => self.sync_autoplay(host),
            Firing::Stale => debug!("carousel {:?}: stale timer {:?} ignored", self.id, handle),
        }
    }

    pub(crate) fn on_animation_complete<T: UiTree<Node = N>>(
        &mut self,
        token: CompletionToken,
        host: &mut Host<'_, T>,
    ) {
        if self.loading_fade == Some(token) {
            self.loading_fade = None;
            if let Some(loading) = self.loading_overlay() {
                host.tree.set_style(&loading, "display", "none");
            }
            return;
        }
        match self.state.complete(token) {
            Some(index) => self.emit(CarouselEvent::PositionChanged { index }),
            None => debug!("carousel {:?}: superseded completion {:?}", self.id, token),
        }
    }

    /// Re-measure layout and snap, without animation, to a valid position.
    pub(crate) fn on_resize<T: UiTree<Node = N>>(&mut self, host: &mut Host<'_, T>) {
        if self.torn_down {
            return;
        }
        let before = self.state.current();
        if let Some(geometry) = self.measure(&*host.tree) {
            if self.state.set_per_view(geometry.per_view()) {
                let to = self.state.current();
                self.present(Transition { from: before, to }, false, host);
                return;
            }
        }
        self.snap_track(host);
        self.render_indicators(host, false);
    }

    pub(crate) fn preload_finished<T: UiTree<Node = N>>(&mut self, host: &mut Host<'_, T>) {
        self.become_ready(host);
    }

    /// Release timers and stop reacting. Late host callbacks become no-ops.
    pub(crate) fn teardown<T: UiTree<Node = N>>(&mut self, host: &mut Host<'_, T>) {
        self.scheduler.teardown(&mut *host.timers);
        self.input.drag_cancel();
        self.input.pointer_leave();
        self.torn_down = true;
        self.ready = false;
        self.loading_fade = None;
        self.events.clear();
    }
}
