//! `TimerHost` over `window.setInterval` / `window.setTimeout`.
//!
//! Every timer calls the same JS function with `(owner, handle)`; the owning
//! `VitrineCarousels` routes that back into the registry.

use hashbrown::HashMap;
use js_sys::Function;
use log::warn;
use wasm_bindgen::JsValue;
use web_sys::Window;

use vitrine_carousel_core::{InstanceId, TimerHandle, TimerHost};

#[derive(Clone, Copy, Debug)]
struct Scheduled {
    browser_id: i32,
    repeating: bool,
}

pub struct BrowserTimers {
    window: Window,
    callback: Function,
    next: u32,
    live: HashMap<TimerHandle, Scheduled>,
}

impl BrowserTimers {
    pub fn new(window: Window, callback: Function) -> Self {
        Self {
            window,
            callback,
            next: 0,
            live: HashMap::new(),
        }
    }

    /// Bookkeeping for a firing: one-shot timers are gone once they ran.
    pub fn fired(&mut self, handle: TimerHandle) {
        if matches!(self.live.get(&handle), Some(s) if !s.repeating) {
            self.live.remove(&handle);
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    fn schedule(&mut self, owner: InstanceId, ms: u32, repeating: bool) -> TimerHandle {
        self.next = self.next.wrapping_add(1);
        let handle = TimerHandle(self.next);
        let (a, b) = (JsValue::from(owner.0), JsValue::from(handle.0));
        let ms = ms.min(i32::MAX as u32) as i32;
        let result = if repeating {
            self.window
                .set_interval_with_callback_and_timeout_and_arguments_2(&self.callback, ms, &a, &b)
        } else {
            self.window
                .set_timeout_with_callback_and_timeout_and_arguments_2(&self.callback, ms, &a, &b)
        };
        match result {
            Ok(browser_id) => {
                self.live.insert(
                    handle,
                    Scheduled {
                        browser_id,
                        repeating,
                    },
                );
            }
            Err(e) => warn!("timer for {owner:?} not scheduled: {e:?}"),
        }
        handle
    }
}

impl TimerHost for BrowserTimers {
    fn set_interval(&mut self, owner: InstanceId, period_ms: u32) -> TimerHandle {
        self.schedule(owner, period_ms, true)
    }

    fn set_timeout(&mut self, owner: InstanceId, delay_ms: u32) -> TimerHandle {
        self.schedule(owner, delay_ms, false)
    }

    fn clear(&mut self, handle: TimerHandle) {
        let Some(s) = self.live.remove(&handle) else {
            return;
        };
        if s.repeating {
            self.window.clear_interval_with_handle(s.browser_id);
        } else {
            self.window.clear_timeout_with_handle(s.browser_id);
        }
    }
}
