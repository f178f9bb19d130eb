//! `UiTree` over the live browser DOM.
//!
//! Elements are interned into an arena shared with the renderer so the engine
//! can hold plain `Copy + Hash` handles.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, NodeList, Window};

use vitrine_carousel_core::UiTree;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeRef(u32);

/// Interned elements; index = `NodeRef`.
#[derive(Clone, Default)]
pub struct NodeArena(Rc<RefCell<Vec<Element>>>);

impl NodeArena {
    pub fn intern(&self, el: Element) -> NodeRef {
        let mut nodes = self.0.borrow_mut();
        if let Some(i) = nodes.iter().position(|n| *n == el) {
            return NodeRef(i as u32);
        }
        nodes.push(el);
        NodeRef((nodes.len() - 1) as u32)
    }

    pub fn get(&self, node: NodeRef) -> Option<Element> {
        self.0.borrow().get(node.0 as usize).cloned()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Drop every interned element. Outstanding `NodeRef`s stop resolving.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

pub struct DomTree {
    window: Window,
    document: Document,
    arena: NodeArena,
}

fn parse_px(value: &str) -> Option<f32> {
    value.trim().trim_end_matches("px").parse::<f32>().ok()
}

impl DomTree {
    pub fn new(window: Window, document: Document, arena: NodeArena) -> Self {
        Self {
            window,
            document,
            arena,
        }
    }

    pub fn element(&self, node: NodeRef) -> Option<Element> {
        self.arena.get(node)
    }

    /// Release interned elements once no instance refers to them.
    pub fn forget_nodes(&self) {
        self.arena.clear();
    }

    fn collect(&self, list: NodeList) -> Vec<NodeRef> {
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|n| n.dyn_into::<Element>().ok())
            .map(|el| self.arena.intern(el))
            .collect()
    }

    fn html(&self, node: &NodeRef) -> Option<HtmlElement> {
        self.element(*node)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }
}

impl UiTree for DomTree {
    type Node = NodeRef;

    fn query_document(&self, selector: &str) -> Vec<NodeRef> {
        match self.document.query_selector_all(selector) {
            Ok(list) => self.collect(list),
            Err(e) => {
                debug!("invalid selector `{selector}`: {e:?}");
                Vec::new()
            }
        }
    }

    fn query(&self, root: &NodeRef, selector: &str) -> Option<NodeRef> {
        let el = self.element(*root)?;
        el.query_selector(selector)
            .ok()
            .flatten()
            .map(|found| self.arena.intern(found))
    }

    fn query_all(&self, root: &NodeRef, selector: &str) -> Vec<NodeRef> {
        self.element(*root)
            .and_then(|el| el.query_selector_all(selector).ok())
            .map(|list| self.collect(list))
            .unwrap_or_default()
    }

    fn closest(&self, node: &NodeRef, selector: &str) -> Option<NodeRef> {
        let el = self.element(*node)?;
        el.closest(selector)
            .ok()
            .flatten()
            .map(|found| self.arena.intern(found))
    }

    fn children(&self, node: &NodeRef) -> Vec<NodeRef> {
        let Some(el) = self.element(*node) else {
            return Vec::new();
        };
        let kids = el.children();
        (0..kids.length())
            .filter_map(|i| kids.item(i))
            .map(|child| self.arena.intern(child))
            .collect()
    }

    fn width(&self, node: &NodeRef) -> f32 {
        match self.html(node) {
            Some(h) => h.offset_width() as f32,
            None => self
                .element(*node)
                .map(|el| el.get_bounding_client_rect().width() as f32)
                .unwrap_or(0.0),
        }
    }

    fn gap(&self, node: &NodeRef) -> Option<f32> {
        let el = self.element(*node)?;
        let style = self.window.get_computed_style(&el).ok().flatten()?;
        let gap = style.get_property_value("column-gap").ok()?;
        parse_px(&gap)
    }

    fn set_class(&mut self, node: &NodeRef, class: &str, on: bool) {
        if let Some(el) = self.element(*node) {
            let _ = el.class_list().toggle_with_force(class, on);
        }
    }

    fn set_text(&mut self, node: &NodeRef, text: &str) {
        if let Some(el) = self.element(*node) {
            el.set_text_content(Some(text));
        }
    }

    fn set_attribute(&mut self, node: &NodeRef, name: &str, value: &str) {
        if let Some(el) = self.element(*node) {
            let _ = el.set_attribute(name, value);
        }
    }

    fn set_style(&mut self, node: &NodeRef, property: &str, value: &str) {
        if let Some(h) = self.html(node) {
            let _ = h.style().set_property(property, value);
        }
    }

    fn append_child(&mut self, parent: &NodeRef, tag: &str, classes: &[&str]) -> Option<NodeRef> {
        let parent = self.element(*parent)?;
        let child = self.document.create_element(tag).ok()?;
        child.set_class_name(&classes.join(" "));
        parent.append_child(&child).ok()?;
        Some(self.arena.intern(child))
    }

    fn clear_children(&mut self, node: &NodeRef) {
        if let Some(el) = self.element(*node) {
            el.set_inner_html("");
        }
    }

    fn request_fullscreen(&mut self, node: &NodeRef) {
        if let Some(el) = self.element(*node) {
            if let Err(e) = el.request_fullscreen() {
                debug!("fullscreen request refused: {e:?}");
            }
        }
    }

    fn exit_fullscreen(&mut self) {
        self.document.exit_fullscreen();
    }

    fn is_fullscreen(&self) -> bool {
        self.document.fullscreen_element().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::parse_px;

    #[test]
    fn computed_gap_values() {
        assert_eq!(parse_px("32px"), Some(32.0));
        assert_eq!(parse_px(" 1.5px "), Some(1.5));
        assert_eq!(parse_px("normal"), None);
    }
}
