//! Browser bindings for the Vitrine carousel engine.
//!
//! `VitrineCarousels` owns a core `Registry` together with browser
//! implementations of its host seams (DOM tree, GSAP renderer, window timers)
//! and wires DOM listeners to each bound instance's own elements.

mod console;
mod dom;
mod gsap;
mod listeners;
mod timers;

use std::cell::{Cell, RefCell, RefMut};
use std::rc::{Rc, Weak};

use js_sys::Function;
use log::{debug, warn, LevelFilter};
use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlImageElement, KeyboardEvent, TouchEvent, Window};

use vitrine_carousel_core::{
    CompletionToken, Config, Host, InputEvent, InstanceId, Intent, Key, Mode, Registry,
    SubscriptionId, TimerHandle,
};

pub use dom::{DomTree, NodeArena, NodeRef};
pub use gsap::GsapRenderer;
pub use timers::BrowserTimers;

use listeners::Listener;

/// Window resizes are coalesced into one re-measure after this quiet period.
const RESIZE_DEBOUNCE_MS: i32 = 150;

type PairCallback = Closure<dyn FnMut(u32, u32)>;

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn js_error(e: JsValue) -> JsError {
    JsError::new(&format!("{e:?}"))
}

struct Inner {
    window: Window,
    document: Document,
    registry: Registry<NodeRef>,
    tree: DomTree,
    timers: BrowserTimers,
    renderer: GsapRenderer,
    listeners: Vec<Listener>,
    page_wired: bool,
    resize_pending: Option<i32>,
    // Referenced from JS by timers, tweens and the resize debounce.
    _on_timer: PairCallback,
    _on_complete: PairCallback,
    on_resize: Closure<dyn FnMut()>,
}

/// Run `f` on the live state, unless it is gone or already borrowed.
fn with_inner<R>(weak: &Weak<RefCell<Inner>>, f: impl FnOnce(&mut Inner) -> R) -> Option<R> {
    let rc = weak.upgrade()?;
    let mut inner = match rc.try_borrow_mut() {
        Ok(inner) => inner,
        Err(_) => {
            warn!("carousel callback re-entered while busy; dropped");
            return None;
        }
    };
    let out = f(&mut inner);
    Some(out)
}

fn touch_point(e: &Event) -> Option<(f32, f32)> {
    let touch = e.dyn_ref::<TouchEvent>()?.changed_touches().get(0)?;
    Some((touch.screen_x() as f32, touch.screen_y() as f32))
}

impl Inner {
    fn parts(&mut self) -> (&mut Registry<NodeRef>, Host<'_, DomTree>) {
        let host = Host::new(&mut self.tree, &mut self.timers).with_renderer(&mut self.renderer);
        (&mut self.registry, host)
    }

    fn timer_fired(&mut self, owner: u32, handle: u32) {
        let handle = TimerHandle(handle);
        self.timers.fired(handle);
        let (registry, mut host) = self.parts();
        if let Err(e) = registry.on_timer(InstanceId(owner), handle, &mut host) {
            debug!("timer {handle:?}: {e}");
        }
    }

    fn animation_done(&mut self, owner: u32, token: u32) {
        let (registry, mut host) = self.parts();
        if let Err(e) =
            registry.on_animation_complete(InstanceId(owner), CompletionToken(token), &mut host)
        {
            debug!("tween completion: {e}");
        }
    }

    fn dispatch(&mut self, id: InstanceId, event: InputEvent) {
        let (registry, mut host) = self.parts();
        if let Err(e) = registry.dispatch(id, event, &mut host) {
            debug!("{event:?}: {e}");
        }
    }

    fn key(&mut self, key: Key) -> usize {
        let (registry, mut host) = self.parts();
        registry.on_key(key, &mut host)
    }

    fn schedule_resize(&mut self) {
        if let Some(pending) = self.resize_pending.take() {
            self.window.clear_timeout_with_handle(pending);
        }
        match self.window.set_timeout_with_callback_and_timeout_and_arguments_0(
            self.on_resize.as_ref().unchecked_ref(),
            RESIZE_DEBOUNCE_MS,
        ) {
            Ok(pending) => self.resize_pending = Some(pending),
            Err(e) => warn!("resize debounce not scheduled: {e:?}"),
        }
    }

    fn resize(&mut self) {
        self.resize_pending = None;
        let (registry, mut host) = self.parts();
        registry.on_resize(&mut host);
    }

    fn preload_finished(&mut self, id: InstanceId) {
        let (registry, mut host) = self.parts();
        if let Err(e) = registry.preload_finished(id, &mut host) {
            debug!("preload: {e}");
        }
    }

    fn listen<F>(
        &mut self,
        weak: &Weak<RefCell<Inner>>,
        target: &Element,
        kind: &'static str,
        id: InstanceId,
        mut translate: F,
    ) -> Result<(), JsValue>
    where
        F: FnMut(&Event) -> Option<InputEvent> + 'static,
    {
        let weak = weak.clone();
        let listener = Listener::attach(target, kind, move |e: Event| {
            if let Some(event) = translate(&e) {
                with_inner(&weak, |inner| inner.dispatch(id, event));
            }
        })?;
        self.listeners.push(listener);
        Ok(())
    }

    /// Keyboard and resize listeners shared by every instance.
    fn wire_page(&mut self, weak: &Weak<RefCell<Inner>>) -> Result<(), JsValue> {
        let w = weak.clone();
        let keydown = Listener::attach(&self.document, "keydown", move |e: Event| {
            let Some(ke) = e.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let key = Key::from_dom(&ke.key());
            let handled = with_inner(&w, |inner| inner.key(key)).unwrap_or(0);
            if handled > 0 && key == Key::Space {
                e.prevent_default();
            }
        })?;
        let w = weak.clone();
        let resize = Listener::attach(&self.window, "resize", move |_: Event| {
            with_inner(&w, |inner| inner.schedule_resize());
        })?;
        self.listeners.push(keydown);
        self.listeners.push(resize);
        self.page_wired = true;
        Ok(())
    }

    /// Listeners on one instance's own elements, then image preloading.
    fn wire_instance(&mut self, weak: &Weak<RefCell<Inner>>, id: InstanceId) -> Result<(), JsValue> {
        let Some(inst) = self.registry.get(id) else {
            return Ok(());
        };
        let region = self.tree.element(*inst.interaction_region());
        let surface = self.tree.element(*inst.drag_surface());
        let controls: Vec<_> = inst
            .controls()
            .iter()
            .filter_map(|(node, control)| self.tree.element(*node).map(|el| (el, *control)))
            .collect();
        let selectables: Vec<_> = inst
            .selectables()
            .into_iter()
            .filter_map(|(node, index)| self.tree.element(node).map(|el| (el, index)))
            .collect();
        let cards: Vec<_> = inst
            .cards()
            .iter()
            .enumerate()
            .filter_map(|(index, node)| self.tree.element(*node).map(|el| (el, index)))
            .collect();
        let urls = inst.preload_urls().to_vec();

        if let Some(region) = region {
            self.listen(weak, &region, "mouseenter", id, |_| Some(InputEvent::PointerEnter))?;
            self.listen(weak, &region, "mouseleave", id, |_| Some(InputEvent::PointerLeave))?;
        }
        if let Some(surface) = surface {
            self.listen(weak, &surface, "touchstart", id, |e| {
                touch_point(e).map(|(x, y)| InputEvent::DragStart { x, y })
            })?;
            self.listen(weak, &surface, "touchend", id, |e| {
                touch_point(e).map(|(x, y)| InputEvent::DragEnd { x, y })
            })?;
            self.listen(weak, &surface, "touchcancel", id, |_| Some(InputEvent::DragCancel))?;
        }
        for (el, control) in controls {
            self.listen(weak, &el, "click", id, move |_| Some(InputEvent::Control(control)))?;
        }
        for (el, index) in selectables {
            self.listen(weak, &el, "click", id, move |_| Some(InputEvent::Select(index)))?;
        }
        for (el, index) in cards {
            self.listen(weak, &el, "click", id, move |_| Some(InputEvent::SelectCard(index)))?;
        }
        if !urls.is_empty() {
            self.preload(weak, id, &urls);
        }
        Ok(())
    }

    /// Load every image; the instance becomes ready once each has loaded or failed.
    fn preload(&mut self, weak: &Weak<RefCell<Inner>>, id: InstanceId, urls: &[String]) {
        let remaining = Rc::new(Cell::new(urls.len()));
        for url in urls {
            let img = match HtmlImageElement::new() {
                Ok(img) => img,
                Err(e) => {
                    debug!("cannot preload {url}: {e:?}");
                    remaining.set(remaining.get() - 1);
                    continue;
                }
            };
            let settle = || {
                let weak = weak.clone();
                let remaining = remaining.clone();
                Closure::once(move || {
                    let left = remaining.get().saturating_sub(1);
                    remaining.set(left);
                    if left == 0 {
                        with_inner(&weak, |inner| inner.preload_finished(id));
                    }
                })
            };
            let onload = settle();
            let onerror = settle();
            img.set_onload(Some(onload.as_ref().unchecked_ref()));
            img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            img.set_src(url);
            onload.forget();
            onerror.forget();
        }
        if remaining.get() == 0 {
            self.preload_finished(id);
        }
    }

    fn teardown(&mut self) {
        for listener in self.listeners.drain(..) {
            listener.detach();
        }
        self.page_wired = false;
        if let Some(pending) = self.resize_pending.take() {
            self.window.clear_timeout_with_handle(pending);
        }
        let (registry, mut host) = self.parts();
        registry.teardown(&mut host);
        self.tree.forget_nodes();
    }
}

/// Snapshot returned by `VitrineCarousels.state(id)`.
#[derive(Serialize)]
struct InstanceState {
    id: u32,
    mode: Mode,
    current_index: usize,
    slide_count: usize,
    per_view: usize,
    max_index: usize,
    playing: bool,
    shuffle: bool,
    ready: bool,
    hovered: bool,
}

#[wasm_bindgen]
pub struct VitrineCarousels {
    inner: Rc<RefCell<Inner>>,
}

impl VitrineCarousels {
    fn borrow(&self) -> Result<RefMut<'_, Inner>, JsError> {
        self.inner
            .try_borrow_mut()
            .map_err(|_| JsError::new("VitrineCarousels is busy (called from an event callback?)"))
    }

    fn apply(&self, id: u32, intent: Intent) -> Result<(), JsError> {
        let mut inner = self.borrow()?;
        let (registry, mut host) = inner.parts();
        registry
            .apply(InstanceId(id), intent, &mut host)
            .map_err(|e| JsError::new(&e.to_string()))
    }
}

#[wasm_bindgen]
impl VitrineCarousels {
    /// Create the engine. Pass a config object or undefined/null for defaults.
    /// Example:
    ///   new VitrineCarousels({ autoplay_interval_ms: 4000 })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<VitrineCarousels, JsError> {
        console_error_panic_hook::set_once();
        console::init(LevelFilter::Info);

        let mut cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        cfg.validate()
            .map_err(|e| JsError::new(&format!("config error: {e}")))?;
        if cfg.shuffle_seed.is_none() {
            cfg.shuffle_seed = Some((js_sys::Math::random() * 9_007_199_254_740_992.0) as u64);
        }

        let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsError::new("no document"))?;
        let arena = NodeArena::default();

        let inner = Rc::new_cyclic(|weak: &Weak<RefCell<Inner>>| {
            let w = weak.clone();
            let on_timer: PairCallback = Closure::wrap(Box::new(move |owner: u32, handle: u32| {
                with_inner(&w, |inner| inner.timer_fired(owner, handle));
            }) as Box<dyn FnMut(u32, u32)>);
            let w = weak.clone();
            let on_complete: PairCallback = Closure::wrap(Box::new(move |owner: u32, token: u32| {
                with_inner(&w, |inner| inner.animation_done(owner, token));
            }) as Box<dyn FnMut(u32, u32)>);
            let w = weak.clone();
            let on_resize = Closure::wrap(Box::new(move || {
                with_inner(&w, |inner| inner.resize());
            }) as Box<dyn FnMut()>);

            let timer_fn: Function = on_timer.as_ref().unchecked_ref::<Function>().clone();
            let complete_fn: Function = on_complete.as_ref().unchecked_ref::<Function>().clone();
            RefCell::new(Inner {
                window: window.clone(),
                document: document.clone(),
                registry: Registry::new(cfg),
                tree: DomTree::new(window.clone(), document.clone(), arena.clone()),
                timers: BrowserTimers::new(window.clone(), timer_fn),
                renderer: GsapRenderer::new(window.clone(), arena.clone(), complete_fn),
                listeners: Vec::new(),
                page_wired: false,
                resize_pending: None,
                _on_timer: on_timer,
                _on_complete: on_complete,
                on_resize,
            })
        });

        Ok(VitrineCarousels { inner })
    }

    /// Scan the page and bind every carousel found. Returns the new instance
    /// ids; calling again before `teardown` binds nothing.
    #[wasm_bindgen]
    pub fn bind(&mut self) -> Result<Vec<u32>, JsError> {
        let weak = Rc::downgrade(&self.inner);
        let mut inner = self.borrow()?;
        let ids = {
            let (registry, mut host) = inner.parts();
            registry.discover_and_bind(&mut host)
        };
        if !ids.is_empty() && !inner.page_wired {
            inner.wire_page(&weak).map_err(js_error)?;
        }
        for id in &ids {
            inner.wire_instance(&weak, *id).map_err(js_error)?;
        }
        Ok(ids.iter().map(|id| id.0).collect())
    }

    #[wasm_bindgen]
    pub fn ids(&self) -> Result<Vec<u32>, JsError> {
        let inner = self.borrow()?;
        Ok(inner.registry.ids().iter().map(|id| id.0).collect())
    }

    #[wasm_bindgen]
    pub fn next(&mut self, id: u32) -> Result<(), JsError> {
        self.apply(id, Intent::Next)
    }

    #[wasm_bindgen]
    pub fn prev(&mut self, id: u32) -> Result<(), JsError> {
        self.apply(id, Intent::Prev)
    }

    #[wasm_bindgen(js_name = go_to)]
    pub fn go_to(&mut self, id: u32, index: u32) -> Result<(), JsError> {
        self.apply(id, Intent::GoTo(index as usize))
    }

    #[wasm_bindgen(js_name = toggle_play)]
    pub fn toggle_play(&mut self, id: u32) -> Result<(), JsError> {
        self.apply(id, Intent::TogglePlay)
    }

    #[wasm_bindgen(js_name = toggle_shuffle)]
    pub fn toggle_shuffle(&mut self, id: u32) -> Result<(), JsError> {
        self.apply(id, Intent::ToggleShuffle)
    }

    #[wasm_bindgen(js_name = toggle_fullscreen)]
    pub fn toggle_fullscreen(&mut self, id: u32) -> Result<(), JsError> {
        self.apply(id, Intent::ToggleFullscreen)
    }

    /// Current state of one instance as a plain object.
    #[wasm_bindgen]
    pub fn state(&self, id: u32) -> Result<JsValue, JsError> {
        let inner = self.borrow()?;
        let inst = inner
            .registry
            .get(InstanceId(id))
            .ok_or_else(|| JsError::new(&format!("unknown carousel instance {id}")))?;
        let snapshot = InstanceState {
            id,
            mode: inst.mode(),
            current_index: inst.current_index(),
            slide_count: inst.slide_count(),
            per_view: inst.per_view(),
            max_index: inst.max_index(),
            playing: inst.is_playing(),
            shuffle: inst.shuffle_enabled(),
            ready: inst.is_ready(),
            hovered: inst.is_hovered(),
        };
        swb::to_value(&snapshot).map_err(|e| JsError::new(&format!("state error: {e}")))
    }

    /// Subscribe to lifecycle events. The callback is called as
    /// `callback(id: number, event: { type: string, ... })`.
    /// Returns a subscription id for `off_event`.
    ///
    /// Callbacks run synchronously inside engine calls and must not call back
    /// into this object.
    #[wasm_bindgen(js_name = on_event)]
    pub fn on_event(&mut self, callback: Function) -> Result<u32, JsError> {
        let mut inner = self.borrow()?;
        let sub = inner.registry.subscribe(move |id, event| {
            let payload = match swb::to_value(event) {
                Ok(v) => v,
                Err(e) => {
                    warn!("event {event:?} not forwarded: {e}");
                    return;
                }
            };
            if let Err(e) = callback.call2(&JsValue::NULL, &JsValue::from(id.0), &payload) {
                warn!("event callback threw: {e:?}");
            }
        });
        Ok(sub.0)
    }

    #[wasm_bindgen(js_name = off_event)]
    pub fn off_event(&mut self, subscription: u32) -> Result<bool, JsError> {
        let mut inner = self.borrow()?;
        Ok(inner.registry.unsubscribe(SubscriptionId(subscription)))
    }

    /// Re-measure every instance now, without waiting for the resize debounce.
    #[wasm_bindgen]
    pub fn resize(&mut self) -> Result<(), JsError> {
        let mut inner = self.borrow()?;
        inner.resize();
        Ok(())
    }

    /// Remove every listener and timer. A later `bind` scans the page again.
    #[wasm_bindgen]
    pub fn teardown(&mut self) -> Result<(), JsError> {
        let mut inner = self.borrow()?;
        inner.teardown();
        Ok(())
    }
}

impl Drop for VitrineCarousels {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.teardown();
        }
    }
}

/// Set the console log level ("error", "warn", "info", "debug", "trace", "off").
#[wasm_bindgen(js_name = set_log_level)]
pub fn set_log_level(level: &str) -> Result<(), JsError> {
    let filter = console::parse_level(level)
        .ok_or_else(|| JsError::new(&format!("unknown log level `{level}`")))?;
    console::init(filter);
    console::set_level(filter);
    Ok(())
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
