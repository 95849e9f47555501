//! Headless in-memory scene host.
//!
//! Holds a tree of elements with fixed rectangles, records every parameter
//! write and decoration, and keeps listener/watch bookkeeping so the engine
//! can be driven without a browser. Scenes can be built in code or loaded
//! from JSON.

use std::collections::BTreeMap;

use glam::Vec2;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::{
    DecorationId, Decoration, ElementHandle, GeometryProvider, ListenerKind,
    ParamValue, Rect, SceneQuery, Selector, StyleSink,
};
use crate::error::EffectError;

/// Declarative description of an element subtree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementSpec {
    /// Tag name (`div` when omitted).
    pub tag: String,
    /// Optional id.
    pub id: Option<String>,
    /// Class list.
    pub classes: Vec<String>,
    /// Screen rectangle.
    pub rect: Rect,
    /// Child elements.
    pub children: Vec<ElementSpec>,
}

impl ElementSpec {
    /// Element with the given tag.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            ..Self::default()
        }
    }

    /// Add a class.
    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_owned());
        self
    }

    /// Set the id.
    #[must_use]
    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_owned());
        self
    }

    /// Set the rectangle.
    #[must_use]
    pub fn rect(mut self, left: f32, top: f32, width: f32, height: f32) -> Self {
        self.rect = Rect::new(left, top, width, height);
        self
    }

    /// Add a child.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }
}

/// JSON layout of a whole scene.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSpec {
    /// Root rectangle (the viewport).
    pub viewport: Rect,
    /// Top-level elements under the root.
    pub elements: Vec<ElementSpec>,
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    rect: Rect,
    parent: Option<ElementHandle>,
    children: Vec<ElementHandle>,
    attached: bool,
    params: BTreeMap<&'static str, ParamValue>,
    listeners: Vec<ListenerKind>,
}

/// In-memory [`SceneQuery`] + [`StyleSink`] implementation.
#[derive(Debug, Clone)]
pub struct MemoryScene {
    nodes: FxHashMap<ElementHandle, Node>,
    root: ElementHandle,
    next_element: u64,
    decorations: BTreeMap<u64, (ElementHandle, Decoration)>,
    next_decoration: u64,
    watching: Option<ElementHandle>,
    writes: u64,
}

impl MemoryScene {
    /// Empty scene whose root covers `viewport`.
    #[must_use]
    pub fn new(viewport: Rect) -> Self {
        let root = ElementHandle(0);
        let mut nodes = FxHashMap::default();
        let _ = nodes.insert(
            root,
            Node {
                tag: "body".to_owned(),
                id: None,
                classes: Vec::new(),
                rect: viewport,
                parent: None,
                children: Vec::new(),
                attached: true,
                params: BTreeMap::new(),
                listeners: Vec::new(),
            },
        );
        Self {
            nodes,
            root,
            next_element: 1,
            decorations: BTreeMap::new(),
            next_decoration: 1,
            watching: None,
            writes: 0,
        }
    }

    /// Build a scene from its declarative description.
    #[must_use]
    pub fn from_spec(spec: &SceneSpec) -> Self {
        let mut scene = Self::new(spec.viewport);
        for element in &spec.elements {
            let _ = scene.append(scene.root, element);
        }
        scene
    }

    /// Parse a JSON [`SceneSpec`].
    pub fn from_json(json: &str) -> Result<Self, EffectError> {
        let spec: SceneSpec = serde_json::from_str(json)
            .map_err(|e| EffectError::SceneParse(e.to_string()))?;
        Ok(Self::from_spec(&spec))
    }

    /// Attach a subtree under `parent`, returning the handle of its root.
    /// A detached or unknown parent yields a detached subtree.
    pub fn append(&mut self, parent: ElementHandle, spec: &ElementSpec) -> ElementHandle {
        let handle = ElementHandle(self.next_element);
        self.next_element += 1;
        let attached = self.nodes.get(&parent).is_some_and(|p| p.attached);
        let tag = if spec.tag.is_empty() {
            "div".to_owned()
        } else {
            spec.tag.to_ascii_lowercase()
        };
        let _ = self.nodes.insert(
            handle,
            Node {
                tag,
                id: spec.id.clone(),
                classes: spec.classes.clone(),
                rect: spec.rect,
                parent: Some(parent),
                children: Vec::new(),
                attached,
                params: BTreeMap::new(),
                listeners: Vec::new(),
            },
        );
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(handle);
        }
        for child in &spec.children {
            let _ = self.append(handle, child);
        }
        handle
    }

    /// Detach an element and its subtree. Returns `false` for the root or
    /// an unknown element.
    pub fn detach(&mut self, element: ElementHandle) -> bool {
        if element == self.root {
            return false;
        }
        let Some(parent) = self.nodes.get(&element).and_then(|n| n.parent) else {
            return false;
        };
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|c| *c != element);
        }
        let mut stack = vec![element];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(&current) {
                node.attached = false;
                stack.extend(node.children.iter().copied());
            }
        }
        if let Some(node) = self.nodes.get_mut(&element) {
            node.parent = None;
        }
        true
    }

    /// Move/resize an element (simulates layout reflow).
    pub fn set_rect(&mut self, element: ElementHandle, rect: Rect) {
        if let Some(node) = self.nodes.get_mut(&element) {
            node.rect = rect;
        }
    }

    /// Last value written to a parameter.
    #[must_use]
    pub fn parameter(&self, element: ElementHandle, name: &str) -> Option<ParamValue> {
        self.nodes.get(&element)?.params.get(name).copied()
    }

    /// Numeric payload of a parameter.
    #[must_use]
    pub fn number(&self, element: ElementHandle, name: &str) -> Option<f32> {
        self.parameter(element, name).map(|v| v.number())
    }

    /// All parameters currently set on an element, sorted by name.
    pub fn parameters(
        &self,
        element: ElementHandle,
    ) -> impl Iterator<Item = (&'static str, ParamValue)> + '_ {
        self.nodes
            .get(&element)
            .into_iter()
            .flat_map(|n| n.params.iter().map(|(k, v)| (*k, *v)))
    }

    /// Decorations currently injected into an element.
    #[must_use]
    pub fn decorations(&self, element: ElementHandle) -> Vec<&Decoration> {
        self.decorations
            .values()
            .filter(|(parent, _)| *parent == element)
            .map(|(_, d)| d)
            .collect()
    }

    /// Total number of live decorations.
    #[must_use]
    pub fn decoration_count(&self) -> usize {
        self.decorations.len()
    }

    /// Listener groups currently wired for an element (one entry per
    /// `listen` call that has not been undone).
    #[must_use]
    pub fn listeners(&self, element: ElementHandle) -> &[ListenerKind] {
        self.nodes
            .get(&element)
            .map(|n| n.listeners.as_slice())
            .unwrap_or_default()
    }

    /// Whether a scene watch is installed.
    #[must_use]
    pub fn is_watching(&self) -> bool {
        self.watching.is_some()
    }

    /// Number of parameter writes received so far.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    /// Deepest attached element containing a screen point (root excluded).
    #[must_use]
    pub fn hit_test(&self, point: Vec2) -> Option<ElementHandle> {
        let mut found = None;
        let mut current = self.root;
        loop {
            let next = self.nodes.get(&current).and_then(|node| {
                node.children.iter().rev().copied().find(|child| {
                    self.nodes
                        .get(child)
                        .is_some_and(|c| c.attached && c.rect.contains(point))
                })
            });
            match next {
                Some(child) => {
                    found = Some(child);
                    current = child;
                }
                None => return found,
            }
        }
    }

    fn node_matches(&self, element: ElementHandle, selector: &Selector) -> bool {
        let Some(node) = self.nodes.get(&element) else {
            return false;
        };
        if !selector
            .subject()
            .matches(&node.tag, node.id.as_deref(), &node.classes)
        {
            return false;
        }
        let mut cursor = node.parent;
        for compound in selector.ancestors() {
            loop {
                let Some(ancestor) = cursor.and_then(|h| self.nodes.get(&h).map(|n| (h, n)))
                else {
                    return false;
                };
                cursor = ancestor.1.parent;
                if compound.matches(&ancestor.1.tag, ancestor.1.id.as_deref(), &ancestor.1.classes) {
                    break;
                }
            }
        }
        true
    }
}

impl GeometryProvider for MemoryScene {
    fn rect(&self, element: ElementHandle) -> Option<Rect> {
        self.nodes
            .get(&element)
            .filter(|n| n.attached)
            .map(|n| n.rect)
    }
}

impl SceneQuery for MemoryScene {
    fn root(&self) -> ElementHandle {
        self.root
    }

    fn parent(&self, element: ElementHandle) -> Option<ElementHandle> {
        self.nodes.get(&element)?.parent
    }

    fn query_matching(
        &self,
        scope: ElementHandle,
        selector: &Selector,
    ) -> Vec<ElementHandle> {
        let mut out = Vec::new();
        if !self.contains(scope) {
            return out;
        }
        let mut stack = vec![scope];
        while let Some(current) = stack.pop() {
            if self.node_matches(current, selector) {
                out.push(current);
            }
            if let Some(node) = self.nodes.get(&current) {
                // reversed so the first child is visited first
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    fn contains(&self, element: ElementHandle) -> bool {
        self.nodes.get(&element).is_some_and(|n| n.attached)
    }

    fn listen(&mut self, element: ElementHandle, kinds: &[ListenerKind]) {
        if let Some(node) = self.nodes.get_mut(&element) {
            node.listeners.extend_from_slice(kinds);
        }
    }

    fn unlisten(&mut self, element: ElementHandle, kinds: &[ListenerKind]) {
        if let Some(node) = self.nodes.get_mut(&element) {
            for kind in kinds {
                if let Some(pos) = node.listeners.iter().position(|k| k == kind) {
                    let _ = node.listeners.remove(pos);
                }
            }
        }
    }

    fn watch(&mut self, root: ElementHandle) {
        self.watching = Some(root);
    }

    fn unwatch(&mut self) {
        self.watching = None;
    }
}

impl StyleSink for MemoryScene {
    fn set_parameter(
        &mut self,
        element: ElementHandle,
        name: &'static str,
        value: ParamValue,
    ) {
        if let Some(node) = self.nodes.get_mut(&element) {
            let _ = node.params.insert(name, value);
            self.writes += 1;
        }
    }

    fn clear_parameter(&mut self, element: ElementHandle, name: &'static str) {
        if let Some(node) = self.nodes.get_mut(&element) {
            let _ = node.params.remove(name);
        }
    }

    fn inject(
        &mut self,
        parent: ElementHandle,
        decoration: &Decoration,
    ) -> Option<DecorationId> {
        if !self.nodes.contains_key(&parent) {
            return None;
        }
        let id = self.next_decoration;
        self.next_decoration += 1;
        let _ = self.decorations.insert(id, (parent, decoration.clone()));
        Some(DecorationId(id))
    }

    fn remove_decoration(&mut self, id: DecorationId) {
        let _ = self.decorations.remove(&id.0);
    }
}
