//! Instance registry: the single place allowed to search the whole page.
//!
//! Discovery runs once. Each candidate root becomes an independent
//! [`CarouselInstance`] addressed by an [`InstanceId`]; everything after that
//! (input, timers, completions, resize) is routed by id or by hover state.

use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use hashbrown::HashSet;
use log::debug;

use crate::config::Config;
use crate::error::CarouselError;
use crate::events::{CarouselEvent, EffectHooks};
use crate::host::{Host, UiTree};
use crate::ids::{CompletionToken, IdAllocator, InstanceId, SubscriptionId, TimerHandle};
use crate::input::{InputEvent, Intent, Key};
use crate::instance::{CarouselInstance, Origin};

/// Shuffle seed used when the config does not provide one.
pub const DEFAULT_SHUFFLE_SEED: u64 = 0x5eed_ca70_05e1;

#[derive(Debug)]
pub struct Registry<N> {
    config: Rc<Config>,
    seed: u64,
    ids: IdAllocator,
    instances: Vec<CarouselInstance<N>>,
    hooks: EffectHooks,
    scanned: bool,
}

impl<N: Clone + Eq + Hash + Debug> Registry<N> {
    /// `config` is used as given; run `Config::validate` on untrusted input.
    /// Out-of-range input bounds degrade to "unclamped" rather than panic.
    pub fn new(config: Config) -> Self {
        let seed = config.shuffle_seed.unwrap_or(DEFAULT_SHUFFLE_SEED);
        Self {
            config: Rc::new(config),
            seed,
            ids: IdAllocator::new(),
            instances: Vec::new(),
            hooks: EffectHooks::new(),
            scanned: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn hooks_mut(&mut self) -> &mut EffectHooks {
        &mut self.hooks
    }

    pub fn subscribe<F>(&mut self, hook: F) -> SubscriptionId
    where
        F: FnMut(InstanceId, &CarouselEvent) + 'static,
    {
        self.hooks.subscribe(hook)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.hooks.unsubscribe(id)
    }

    /// Scan the page once and bind every valid root. Returns the newly bound
    /// ids; later calls bind nothing and return an empty list.
    ///
    /// Roots missing a required element are logged and skipped.
    pub fn discover_and_bind<T: UiTree<Node = N>>(&mut self, host: &mut Host<'_, T>) -> Vec<InstanceId> {
        if self.scanned {
            debug!("discover_and_bind: page already scanned");
            return Vec::new();
        }
        self.scanned = true;
        let mut bound = Vec::new();

        let single = &self.config.single.selectors;
        let single_root = host.tree.query_document(&single.root).into_iter().next();
        if let Some(root) = single_root {
            let id = self.ids.alloc_instance();
            match CarouselInstance::bind_single(id, root, self.config.clone(), self.seed, host) {
                Ok(inst) => {
                    self.adopt(inst);
                    bound.push(id);
                }
                Err(e) => debug!("single carousel skipped: {e}"),
            }
        }

        let dots_sel = self.config.multi.selectors.dots.clone();
        let section_sel = self.config.multi.selectors.section.clone();
        let mut seen: HashSet<N> = HashSet::new();
        for dots in host.tree.query_document(&dots_sel) {
            let Some(section) = host.tree.closest(&dots, &section_sel) else {
                debug!("multi carousel skipped: `{dots_sel}` outside any `{section_sel}`");
                continue;
            };
            if !seen.insert(section.clone()) {
                continue;
            }
            let id = self.ids.alloc_instance();
            match CarouselInstance::bind_multi(id, section, self.config.clone(), self.seed, host) {
                Ok(inst) => {
                    self.adopt(inst);
                    bound.push(id);
                }
                Err(e) => debug!("multi carousel skipped: {e}"),
            }
        }
        bound
    }

    fn adopt(&mut self, inst: CarouselInstance<N>) {
        self.instances.push(inst);
        let idx = self.instances.len() - 1;
        self.flush(idx);
    }

    /// Deliver pending events of one instance to the hooks.
    fn flush(&mut self, idx: usize) {
        let inst = &mut self.instances[idx];
        let owner = inst.id();
        for event in inst.drain_events() {
            self.hooks.emit(owner, &event);
        }
    }

    fn index_of(&self, id: InstanceId) -> Result<usize, CarouselError> {
        self.instances
            .iter()
            .position(|i| i.id() == id)
            .ok_or(CarouselError::UnknownInstance(id))
    }

    fn with_instance<'a, T, R, F>(
        &mut self,
        id: InstanceId,
        host: &mut Host<'a, T>,
        f: F,
    ) -> Result<R, CarouselError>
    where
        T: UiTree<Node = N>,
        F: FnOnce(&mut CarouselInstance<N>, &mut Host<'a, T>) -> R,
    {
        let idx = self.index_of(id)?;
        let out = f(&mut self.instances[idx], host);
        self.flush(idx);
        Ok(out)
    }

    pub fn get(&self, id: InstanceId) -> Option<&CarouselInstance<N>> {
        self.instances.iter().find(|i| i.id() == id)
    }

    pub fn ids(&self) -> Vec<InstanceId> {
        self.instances.iter().map(|i| i.id()).collect()
    }

    pub fn instances(&self) -> impl Iterator<Item = &CarouselInstance<N>> {
        self.instances.iter()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Raw input captured on one instance's own elements.
    pub fn dispatch<T: UiTree<Node = N>>(
        &mut self,
        id: InstanceId,
        event: InputEvent,
        host: &mut Host<'_, T>,
    ) -> Result<(), CarouselError> {
        self.with_instance(id, host, |inst, host| inst.handle(event, host))
    }

    /// Programmatic navigation, treated like a manual action.
    pub fn apply<T: UiTree<Node = N>>(
        &mut self,
        id: InstanceId,
        intent: Intent,
        host: &mut Host<'_, T>,
    ) -> Result<(), CarouselError> {
        self.with_instance(id, host, |inst, host| inst.apply(intent, Origin::Manual, host))
    }

    /// Page-level key press. Only instances under the pointer see it.
    /// Returns how many instances acted on the key.
    pub fn on_key<T: UiTree<Node = N>>(&mut self, key: Key, host: &mut Host<'_, T>) -> usize {
        let mut handled = 0;
        for idx in 0..self.instances.len() {
            if !self.instances[idx].is_hovered() {
                continue;
            }
            if self.instances[idx].key(key, host) {
                handled += 1;
            }
            self.flush(idx);
        }
        handled
    }

    pub fn on_timer<T: UiTree<Node = N>>(
        &mut self,
        owner: InstanceId,
        handle: TimerHandle,
        host: &mut Host<'_, T>,
    ) -> Result<(), CarouselError> {
        self.with_instance(owner, host, |inst, host| inst.on_timer(handle, host))
    }

    pub fn on_animation_complete<T: UiTree<Node = N>>(
        &mut self,
        owner: InstanceId,
        token: CompletionToken,
        host: &mut Host<'_, T>,
    ) -> Result<(), CarouselError> {
        self.with_instance(owner, host, |inst, host| inst.on_animation_complete(token, host))
    }

    /// Layout changed; every instance re-measures and snaps.
    pub fn on_resize<T: UiTree<Node = N>>(&mut self, host: &mut Host<'_, T>) {
        for idx in 0..self.instances.len() {
            self.instances[idx].on_resize(host);
            self.flush(idx);
        }
    }

    /// Image preloading for `id` finished, successfully or not.
    pub fn preload_finished<T: UiTree<Node = N>>(
        &mut self,
        id: InstanceId,
        host: &mut Host<'_, T>,
    ) -> Result<(), CarouselError> {
        self.with_instance(id, host, |inst, host| inst.preload_finished(host))
    }

    /// Release every timer and forget all instances. A later
    /// `discover_and_bind` scans the page again.
    pub fn teardown<T: UiTree<Node = N>>(&mut self, host: &mut Host<'_, T>) {
        for inst in self.instances.iter_mut() {
            inst.teardown(host);
        }
        debug!("registry torn down ({} instances)", self.instances.len());
        self.instances.clear();
        self.scanned = false;
    }
}
