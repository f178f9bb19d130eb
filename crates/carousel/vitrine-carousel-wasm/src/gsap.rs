//! `Renderer` backed by the page's global `gsap`.
//!
//! When GSAP is not loaded, or a call throws, `animate_to` declines and the
//! engine snaps with plain CSS instead.

use js_sys::{Array, Function, Object, Reflect};
use log::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Window};

use vitrine_carousel_core::{Animation, Property, Renderer};

use crate::dom::{NodeArena, NodeRef};

pub struct GsapRenderer {
    window: Window,
    arena: NodeArena,
    on_complete: Function,
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(key), value).map(|_| ())
}

/// GSAP vars entry for one animated property.
fn tween_value(property: Property, value: f32) -> (&'static str, JsValue) {
    let v = value as f64;
    match property {
        Property::TranslateXPercent => ("x", JsValue::from_str(&format!("{value}%"))),
        Property::TranslateXPx => ("x", JsValue::from_f64(v)),
        Property::WidthPercent => ("width", JsValue::from_str(&format!("{value}%"))),
        Property::Opacity => ("opacity", JsValue::from_f64(v)),
        Property::Scale => ("scale", JsValue::from_f64(v)),
    }
}

impl GsapRenderer {
    pub fn new(window: Window, arena: NodeArena, on_complete: Function) -> Self {
        Self {
            window,
            arena,
            on_complete,
        }
    }

    fn gsap_to(&self) -> Option<(JsValue, Function)> {
        let gsap = Reflect::get(&self.window, &JsValue::from_str("gsap")).ok()?;
        if !gsap.is_object() {
            return None;
        }
        let to = Reflect::get(&gsap, &JsValue::from_str("to"))
            .ok()?
            .dyn_into::<Function>()
            .ok()?;
        Some((gsap, to))
    }

    fn tween(&self, el: &Element, animation: &Animation<NodeRef>) -> Result<(), JsValue> {
        let Some((gsap, to)) = self.gsap_to() else {
            return Err(JsValue::from_str("gsap not loaded"));
        };
        let vars = Object::new();
        let (key, value) = tween_value(animation.property, animation.value);
        set(&vars, key, &value)?;
        set(
            &vars,
            "duration",
            &JsValue::from_f64(animation.duration_ms as f64 / 1000.0),
        )?;
        set(&vars, "ease", &JsValue::from_str(&animation.easing))?;
        set(&vars, "overwrite", &JsValue::from_str("auto"))?;
        if let Some(c) = animation.completion {
            set(&vars, "onComplete", &self.on_complete)?;
            let params = Array::of2(&JsValue::from(c.owner.0), &JsValue::from(c.token.0));
            set(&vars, "onCompleteParams", &params)?;
        }
        to.call2(&gsap, el, &vars)?;
        Ok(())
    }
}

impl Renderer<NodeRef> for GsapRenderer {
    fn animate_to(&mut self, animation: Animation<NodeRef>) -> bool {
        if animation.duration_ms == 0 {
            return false;
        }
        let Some(el) = self.arena.get(animation.target) else {
            return false;
        };
        match self.tween(&el, &animation) {
            Ok(()) => true,
            Err(e) => {
                debug!("gsap declined {:?}: {e:?}", animation.property);
                false
            }
        }
    }
}
