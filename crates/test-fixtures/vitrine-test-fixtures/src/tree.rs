//! In-memory page tree with just enough selector support for carousel markup.
//!
//! Selectors are single compound selectors: `tag`, `#id`, `.class` or any
//! combination such as `div#carouselTrack.flex`. Ids are not required to be
//! unique, which is the point: pages with repeated sections can be modelled.

use std::cell::Cell;
use std::collections::BTreeMap;

use serde::Deserialize;
use vitrine_carousel_core::UiTree;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Default, Clone, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn parse(text: &str) -> Self {
        let mut out = Compound::default();
        let mut kind = ' ';
        let mut buf = String::new();
        for c in text.trim().chars().chain(std::iter::once('\0')) {
            if matches!(c, '#' | '.' | '\0') {
                if !buf.is_empty() {
                    match kind {
                        '#' => out.id = Some(buf.clone()),
                        '.' => out.classes.push(buf.clone()),
                        _ => out.tag = Some(buf.to_ascii_lowercase()),
                    }
                }
                kind = c;
                buf.clear();
            } else {
                buf.push(c);
            }
        }
        out
    }

    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty()
    }
}

#[derive(Debug, Default, Clone)]
struct Element {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: String,
    width: f32,
    gap: Option<f32>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    fn matches(&self, sel: &Compound) -> bool {
        if sel.is_empty() {
            return false;
        }
        sel.tag.as_deref().map_or(true, |t| t == self.tag)
            && sel.id.as_deref().map_or(true, |id| self.id.as_deref() == Some(id))
            && sel.classes.iter().all(|c| self.classes.contains(c))
    }
}

/// Declarative element description, as stored in JSON page fixtures.
#[derive(Debug, Clone, Deserialize)]
pub struct ElementSpec {
    /// Compound selector syntax: `section#properties.py-20`.
    pub el: String,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub gap: Option<f32>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub children: Vec<ElementSpec>,
}

#[derive(Debug)]
pub struct MemoryTree {
    nodes: Vec<Element>,
    fullscreen: Option<NodeId>,
    document_queries: Cell<usize>,
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![Element {
                tag: "#document".into(),
                ..Element::default()
            }],
            fullscreen: None,
            document_queries: Cell::new(0),
        }
    }

    pub fn document(&self) -> NodeId {
        NodeId(0)
    }

    /// Build a whole page from specs appended under the document.
    pub fn from_specs(specs: &[ElementSpec]) -> Self {
        let mut tree = Self::new();
        let doc = tree.document();
        for spec in specs {
            tree.insert_spec(doc, spec);
        }
        tree
    }

    pub fn insert_spec(&mut self, parent: NodeId, spec: &ElementSpec) -> NodeId {
        let node = self.element(parent, &spec.el);
        if let Some(w) = spec.width {
            self.set_width(node, w);
        }
        self.set_gap(node, spec.gap);
        if let Some(text) = &spec.text {
            self.nodes[node.0].text = text.clone();
        }
        for child in &spec.children {
            self.insert_spec(node, child);
        }
        node
    }

    /// Append an element described as `tag#id.class.class`.
    pub fn element(&mut self, parent: NodeId, spec: &str) -> NodeId {
        let c = Compound::parse(spec);
        let id = NodeId(self.nodes.len());
        self.nodes.push(Element {
            tag: c.tag.unwrap_or_else(|| "div".into()),
            id: c.id,
            classes: c.classes,
            parent: Some(parent),
            ..Element::default()
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn set_width(&mut self, node: NodeId, width: f32) {
        self.nodes[node.0].width = width;
    }

    pub fn set_gap(&mut self, node: NodeId, gap: Option<f32>) {
        self.nodes[node.0].gap = gap;
    }

    /// Number of unscoped lookups made so far.
    pub fn document_queries(&self) -> usize {
        self.document_queries.get()
    }

    pub fn find(&self, selector: &str) -> Option<NodeId> {
        self.query(&self.document(), selector)
    }

    pub fn find_in(&self, root: NodeId, selector: &str) -> Option<NodeId> {
        self.query(&root, selector)
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes[node.0].classes.iter().any(|c| c == class)
    }

    pub fn text(&self, node: NodeId) -> &str {
        &self.nodes[node.0].text
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0].attributes.get(name).map(String::as_str)
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes[node.0].styles.get(property).map(String::as_str)
    }

    pub fn fullscreen_element(&self) -> Option<NodeId> {
        self.fullscreen
    }

    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[root.0].children.iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.nodes[n.0].children.iter().rev().copied());
        }
        out
    }
}

impl UiTree for MemoryTree {
    type Node = NodeId;

    fn query_document(&self, selector: &str) -> Vec<NodeId> {
        self.document_queries.set(self.document_queries.get() + 1);
        self.query_all(&self.document(), selector)
    }

    fn query(&self, root: &NodeId, selector: &str) -> Option<NodeId> {
        let sel = Compound::parse(selector);
        self.descendants(*root)
            .into_iter()
            .find(|n| self.nodes[n.0].matches(&sel))
    }

    fn query_all(&self, root: &NodeId, selector: &str) -> Vec<NodeId> {
        let sel = Compound::parse(selector);
        self.descendants(*root)
            .into_iter()
            .filter(|n| self.nodes[n.0].matches(&sel))
            .collect()
    }

    fn closest(&self, node: &NodeId, selector: &str) -> Option<NodeId> {
        let sel = Compound::parse(selector);
        let mut cur = Some(*node);
        while let Some(n) = cur {
            if self.nodes[n.0].matches(&sel) {
                return Some(n);
            }
            cur = self.nodes[n.0].parent;
        }
        None
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.nodes[node.0].children.clone()
    }

    fn width(&self, node: &NodeId) -> f32 {
        self.nodes[node.0].width
    }

    fn gap(&self, node: &NodeId) -> Option<f32> {
        self.nodes[node.0].gap
    }

    fn set_class(&mut self, node: &NodeId, class: &str, on: bool) {
        let classes = &mut self.nodes[node.0].classes;
        let present = classes.iter().any(|c| c == class);
        if on && !present {
            classes.push(class.to_string());
        } else if !on && present {
            classes.retain(|c| c != class);
        }
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        self.nodes[node.0].text = text.to_string();
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        self.nodes[node.0]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) {
        self.nodes[node.0]
            .styles
            .insert(property.to_string(), value.to_string());
    }

    fn append_child(&mut self, parent: &NodeId, tag: &str, classes: &[&str]) -> Option<NodeId> {
        let node = self.element(*parent, tag);
        self.nodes[node.0].classes = classes.iter().map(|c| c.to_string()).collect();
        Some(node)
    }

    fn clear_children(&mut self, node: &NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    fn request_fullscreen(&mut self, node: &NodeId) {
        self.fullscreen = Some(*node);
    }

    fn exit_fullscreen(&mut self) {
        self.fullscreen = None;
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_selectors() {
        let mut t = MemoryTree::new();
        let doc = t.document();
        let s = t.element(doc, "section.py-20");
        let track = t.element(s, "div#carouselTrack.flex");
        assert_eq!(t.find("#carouselTrack"), Some(track));
        assert_eq!(t.find("div.flex"), Some(track));
        assert_eq!(t.find("span.flex"), None);
        assert_eq!(t.closest(&track, "section"), Some(s));
    }

    #[test]
    fn scoped_lookup_ignores_siblings() {
        let mut t = MemoryTree::new();
        let doc = t.document();
        let a = t.element(doc, "section");
        let b = t.element(doc, "section");
        let _ta = t.element(a, "div#track");
        let tb = t.element(b, "div#track");
        assert_eq!(t.find_in(b, "#track"), Some(tb));
        assert_eq!(t.query_document("#track").len(), 2);
        assert_eq!(t.document_queries(), 1);
    }

    #[test]
    fn cleared_children_are_detached() {
        let mut t = MemoryTree::new();
        let doc = t.document();
        let nav = t.element(doc, "div#nav");
        t.append_child(&nav, "div", &["thumbnail"]);
        t.clear_children(&nav);
        assert!(t.children(&nav).is_empty());
        assert_eq!(t.find(".thumbnail"), None);
    }
}
